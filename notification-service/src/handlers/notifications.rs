use axum::extract::State;
use service_core::error::{ApiJson, AppError};
use service_core::response::{ok, Confirmation, Envelope};
use validator::Validate;

use crate::models::{ReminderRequest, SendEmailRequest};
use crate::services::metrics::record_send;
use crate::services::EmailMessage;
use crate::startup::AppState;

/// Hand a message to the configured provider. `failure` prefixes the
/// provider error in the response.
async fn deliver(
    state: &AppState,
    kind: &str,
    message: EmailMessage,
    failure: &str,
) -> Result<(), AppError> {
    let provider = state.email_provider.name();
    match state.email_provider.send(&message).await {
        Ok(_) => {
            record_send(provider, kind, true);
            Ok(())
        }
        Err(e) => {
            record_send(provider, kind, false);
            tracing::error!(provider, kind, to = %message.to, error = %e, "Email delivery failed");
            Err(AppError::EmailError(format!("{}: {}", failure, e)))
        }
    }
}

#[tracing::instrument(skip(state, request))]
pub async fn send_email(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<SendEmailRequest>,
) -> Result<Envelope<Confirmation>, AppError> {
    request.validate()?;

    let mut message = EmailMessage::new(request.to.clone(), request.subject, request.body);
    if let Some(attachment) = &request.attachment {
        let content = attachment.decode()?;
        message = message.with_attachment(attachment.filename.clone(), content);
    }
    deliver(&state, "email", message, "Failed to send email").await?;

    Ok(ok(Confirmation {
        message: "Email sent successfully".to_string(),
        to: Some(request.to),
    }))
}

#[tracing::instrument(skip(state, request))]
pub async fn send_reminder(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ReminderRequest>,
) -> Result<Envelope<Confirmation>, AppError> {
    request.validate()?;

    let message = EmailMessage::new(
        request.customer_email.clone(),
        request.subject(),
        request.body(),
    );
    deliver(&state, "reminder", message, "Failed to send reminder").await?;

    tracing::info!(
        invoice_id = ?request.invoice_id,
        invoice_number = %request.invoice_number,
        "Payment reminder sent"
    );
    Ok(ok(Confirmation {
        message: "Payment reminder sent successfully".to_string(),
        to: Some(request.customer_email),
    }))
}
