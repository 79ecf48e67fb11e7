use super::{reject, EmailMessage, EmailProvider, ProviderError, ProviderResponse, FROM_NAME};
use crate::config::MailgunConfig;
use async_trait::async_trait;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::Deserialize;

/// Form-encoded Mailgun sender. Attachments are not forwarded.
pub struct MailgunProvider {
    config: MailgunConfig,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct MailgunResponse {
    #[serde(default)]
    id: Option<String>,
}

impl MailgunProvider {
    pub fn new(config: MailgunConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }
}

#[async_trait]
impl EmailProvider for MailgunProvider {
    fn name(&self) -> &'static str {
        "mailgun"
    }

    async fn send(&self, email: &EmailMessage) -> Result<ProviderResponse, ProviderError> {
        if email.attachment.is_some() {
            tracing::debug!(to = %email.to, "Mailgun provider drops attachments");
        }

        let from = format!("{} <noreply@{}>", FROM_NAME, self.config.domain);
        let form = [
            ("from", from.as_str()),
            ("to", email.to.as_str()),
            ("subject", email.subject.as_str()),
            ("text", email.body.as_str()),
        ];

        let response = self
            .client
            .post(format!(
                "{}/v3/{}/messages",
                self.config.base_url, self.config.domain
            ))
            .basic_auth("api", Some(self.config.api_key.expose_secret()))
            .form(&form)
            .send()
            .await
            .map_err(|e| ProviderError::Connection(format!("Failed to connect to Mailgun: {}", e)))?;

        if !response.status().is_success() {
            return Err(reject("mailgun", response).await);
        }

        let id = response
            .json::<MailgunResponse>()
            .await
            .ok()
            .and_then(|r| r.id);

        tracing::info!(to = %email.to, provider_id = ?id, "Email sent via Mailgun");
        Ok(ProviderResponse::accepted(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::Secret;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(server: &MockServer) -> MailgunProvider {
        MailgunProvider::new(MailgunConfig {
            api_key: Secret::new("key-test".to_string()),
            domain: "mg.example.com".to_string(),
            base_url: server.uri(),
        })
    }

    #[tokio::test]
    async fn posts_form_with_basic_auth() {
        let server = MockServer::start().await;
        // base64("api:key-test")
        Mock::given(method("POST"))
            .and(path("/v3/mg.example.com/messages"))
            .and(header("authorization", "Basic YXBpOmtleS10ZXN0"))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .and(body_string_contains("to=ana%40example.com"))
            .and(body_string_contains("subject=Payment+Reminder"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"id": "<1@mg>", "message": "Queued"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let response = provider(&server)
            .send(&EmailMessage::new("ana@example.com", "Payment Reminder", "Body"))
            .await
            .unwrap();
        assert_eq!(response.provider_id.as_deref(), Some("<1@mg>"));
    }

    #[tokio::test]
    async fn server_error_is_send_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let err = provider(&server)
            .send(&EmailMessage::new("ana@example.com", "Hi", "Body"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::SendFailed(_)));
        assert_eq!(
            err.to_string(),
            "Send failed: mailgun send failed with status: 500 boom"
        );
    }
}
