use super::{EmailMessage, EmailProvider, ProviderError, ProviderResponse};
use async_trait::async_trait;

/// Development fallback: logs the message and reports success.
pub struct ConsoleProvider;

#[async_trait]
impl EmailProvider for ConsoleProvider {
    fn name(&self) -> &'static str {
        "console"
    }

    async fn send(&self, email: &EmailMessage) -> Result<ProviderResponse, ProviderError> {
        tracing::info!(
            to = %email.to,
            subject = %email.subject,
            body = %email.body,
            attachment = email.attachment.as_ref().map(|a| a.filename.as_str()),
            attachment_bytes = email.attachment.as_ref().map(|a| a.content.len()),
            "Email simulated, no provider configured"
        );
        Ok(ProviderResponse::accepted(None))
    }
}
