use super::{reject, EmailMessage, EmailProvider, ProviderError, ProviderResponse, FROM_NAME};
use crate::config::ResendConfig;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

const FROM_ADDRESS: &str = "noreply@resend.dev";

pub struct ResendProvider {
    config: ResendConfig,
    client: Client,
}

#[derive(Debug, Serialize)]
struct ResendRequest<'a> {
    from: String,
    to: Vec<&'a str>,
    subject: &'a str,
    text: &'a str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    attachments: Vec<ResendAttachment<'a>>,
}

#[derive(Debug, Serialize)]
struct ResendAttachment<'a> {
    filename: &'a str,
    /// Base64 of the raw bytes.
    content: String,
}

#[derive(Debug, Deserialize)]
struct ResendResponse {
    #[serde(default)]
    id: Option<String>,
}

impl ResendProvider {
    pub fn new(config: ResendConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }
}

#[async_trait]
impl EmailProvider for ResendProvider {
    fn name(&self) -> &'static str {
        "resend"
    }

    async fn send(&self, email: &EmailMessage) -> Result<ProviderResponse, ProviderError> {
        let attachments = email
            .attachment
            .iter()
            .filter(|a| !a.content.is_empty())
            .map(|a| ResendAttachment {
                filename: &a.filename,
                content: STANDARD.encode(&a.content),
            })
            .collect();

        let request = ResendRequest {
            from: format!("{} <{}>", FROM_NAME, FROM_ADDRESS),
            to: vec![email.to.as_str()],
            subject: &email.subject,
            text: &email.body,
            attachments,
        };

        let response = self
            .client
            .post(format!("{}/emails", self.config.base_url))
            .bearer_auth(self.config.api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::Connection(format!("Failed to connect to Resend: {}", e)))?;

        if !response.status().is_success() {
            return Err(reject("resend", response).await);
        }

        // The id is informational; an unreadable body still means accepted.
        let id = response
            .json::<ResendResponse>()
            .await
            .ok()
            .and_then(|r| r.id);

        tracing::info!(to = %email.to, provider_id = ?id, "Email sent via Resend");
        Ok(ProviderResponse::accepted(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::Secret;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(server: &MockServer) -> ResendProvider {
        ResendProvider::new(ResendConfig {
            api_key: Secret::new("re_test".to_string()),
            base_url: server.uri(),
        })
    }

    #[tokio::test]
    async fn posts_json_with_bearer_key() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/emails"))
            .and(header("authorization", "Bearer re_test"))
            .and(body_partial_json(json!({
                "from": "Invoice Generator <noreply@resend.dev>",
                "to": ["ana@example.com"],
                "subject": "Hello",
                "text": "Body"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "em_1"})))
            .expect(1)
            .mount(&server)
            .await;

        let response = provider(&server)
            .send(&EmailMessage::new("ana@example.com", "Hello", "Body"))
            .await
            .unwrap();
        assert_eq!(response.provider_id.as_deref(), Some("em_1"));
    }

    #[tokio::test]
    async fn attachment_is_base64_encoded() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/emails"))
            .and(body_partial_json(json!({
                "attachments": [{"filename": "invoice-INV-2026-0001.pdf", "content": "JVBERg=="}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "em_2"})))
            .expect(1)
            .mount(&server)
            .await;

        let message = EmailMessage::new("ana@example.com", "Invoice", "Attached")
            .with_attachment("invoice-INV-2026-0001.pdf", b"%PDF".to_vec());
        provider(&server).send(&message).await.unwrap();
    }

    #[tokio::test]
    async fn rejected_key_is_an_authentication_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let err = provider(&server)
            .send(&EmailMessage::new("ana@example.com", "Hello", "Body"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Authentication(_)));
        assert!(err.to_string().contains("401"));
    }
}
