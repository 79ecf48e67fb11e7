//! Email delivery providers.
//!
//! Every provider speaks to an HTTP API (or only logs), so the handlers only
//! see the [`EmailProvider`] trait.

pub mod console;
pub mod mailgun;
pub mod resend;

use crate::config::EmailConfig;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

pub use console::ConsoleProvider;
pub use mailgun::MailgunProvider;
pub use resend::ResendProvider;

/// Sender shown on every outgoing message.
pub const FROM_NAME: &str = "Invoice Generator";

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Send failed: {0}")]
    SendFailed(String),

    #[error("Authentication error: {0}")]
    Authentication(String),
}

/// Result of a delivery attempt that the provider accepted.
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    pub provider_id: Option<String>,
}

impl ProviderResponse {
    pub fn accepted(provider_id: Option<String>) -> Self {
        Self { provider_id }
    }
}

#[derive(Debug, Clone)]
pub struct Attachment {
    pub filename: String,
    pub content: Vec<u8>,
}

/// Plain-text message with at most one attachment.
#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
    pub attachment: Option<Attachment>,
}

impl EmailMessage {
    pub fn new(to: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
            attachment: None,
        }
    }

    pub fn with_attachment(mut self, filename: impl Into<String>, content: Vec<u8>) -> Self {
        self.attachment = Some(Attachment {
            filename: filename.into(),
            content,
        });
        self
    }
}

#[async_trait]
pub trait EmailProvider: Send + Sync {
    /// Short name used in logs and metric labels.
    fn name(&self) -> &'static str;

    async fn send(&self, email: &EmailMessage) -> Result<ProviderResponse, ProviderError>;
}

/// Pick the first configured provider: Resend, then Mailgun, then console.
pub fn from_config(config: &EmailConfig) -> Arc<dyn EmailProvider> {
    if let Some(resend) = &config.resend {
        tracing::info!("Using Resend email provider");
        return Arc::new(ResendProvider::new(resend.clone()));
    }
    if let Some(mailgun) = &config.mailgun {
        tracing::info!(domain = %mailgun.domain, "Using Mailgun email provider");
        return Arc::new(MailgunProvider::new(mailgun.clone()));
    }
    tracing::warn!("No email provider configured, messages will only be logged");
    Arc::new(ConsoleProvider)
}

/// Map a non-success HTTP reply to the matching error.
pub(crate) async fn reject(provider: &str, response: reqwest::Response) -> ProviderError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let detail = format!("{} send failed with status: {} {}", provider, status.as_u16(), body);
    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        ProviderError::Authentication(detail.trim_end().to_string())
    } else {
        ProviderError::SendFailed(detail.trim_end().to_string())
    }
}
