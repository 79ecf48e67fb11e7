use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Deserialize;
use service_core::error::AppError;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct SendEmailRequest {
    #[validate(length(min = 1, message = "to, subject, and body are required"))]
    #[serde(default)]
    pub to: String,
    #[validate(length(min = 1, message = "to, subject, and body are required"))]
    #[serde(default)]
    pub subject: String,
    #[validate(length(min = 1, message = "to, subject, and body are required"))]
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub attachment: Option<AttachmentInput>,
}

/// File to attach, with `content` base64-encoded.
#[derive(Debug, Deserialize)]
pub struct AttachmentInput {
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub content: String,
}

impl AttachmentInput {
    pub fn decode(&self) -> Result<Vec<u8>, AppError> {
        if self.filename.trim().is_empty() {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "attachment filename is required"
            )));
        }
        STANDARD
            .decode(self.content.trim())
            .map_err(|_| AppError::BadRequest(anyhow::anyhow!("attachment content must be base64")))
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct ReminderRequest {
    #[serde(default)]
    pub invoice_id: Option<String>,
    #[validate(length(min = 1, message = "customer_email and invoice_number are required"))]
    #[serde(default)]
    pub customer_email: String,
    #[serde(default)]
    pub customer_name: String,
    #[validate(length(min = 1, message = "customer_email and invoice_number are required"))]
    #[serde(default)]
    pub invoice_number: String,
    #[serde(default)]
    pub amount: Decimal,
    #[serde(default)]
    pub due_date: String,
}

impl ReminderRequest {
    pub fn subject(&self) -> String {
        format!("Payment Reminder - Invoice {}", self.invoice_number)
    }

    pub fn body(&self) -> String {
        format!(
            "Dear {name},

This is a friendly reminder that payment for Invoice {number} is due.

Invoice Details:
- Invoice Number: {number}
- Amount: ${amount:.2}
- Due Date: {due}

Please process the payment at your earliest convenience.

If you have already made the payment, please disregard this message.

Thank you for your business!

Best regards,
InvoicePro Systems
",
            name = self.customer_name,
            number = self.invoice_number,
            amount = self
                .amount
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
            due = self.due_date,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn send_request_needs_all_fields() {
        let request: SendEmailRequest =
            serde_json::from_str(r#"{"to": "ana@example.com", "subject": "Hi"}"#).unwrap();
        let err = AppError::from(request.validate().unwrap_err());
        assert_eq!(err.client_message(), "to, subject, and body are required");
    }

    #[test]
    fn reminder_body_formats_amount_with_two_places() {
        let request: ReminderRequest = serde_json::from_str(
            r#"{
                "customer_email": "ana@example.com",
                "customer_name": "Ana",
                "invoice_number": "INV-2026-0007",
                "amount": 1250.5,
                "due_date": "2026-11-01"
            }"#,
        )
        .unwrap();
        request.validate().unwrap();

        assert_eq!(request.subject(), "Payment Reminder - Invoice INV-2026-0007");
        let body = request.body();
        assert!(body.starts_with("Dear Ana,\n\n"));
        assert!(body.contains("payment for Invoice INV-2026-0007 is due."));
        assert!(body.contains("- Amount: $1250.50\n"));
        assert!(body.contains("- Due Date: 2026-11-01\n"));
        assert!(body.ends_with("Best regards,\nInvoicePro Systems\n"));
    }

    #[test]
    fn attachment_content_is_base64_decoded() {
        let attachment = AttachmentInput {
            filename: "invoice-INV-1.pdf".to_string(),
            content: "JVBERi0=".to_string(),
        };
        assert_eq!(attachment.decode().unwrap(), b"%PDF-".to_vec());

        let garbled = AttachmentInput {
            filename: "a.pdf".to_string(),
            content: "not base64!".to_string(),
        };
        assert_eq!(
            garbled.decode().unwrap_err().client_message(),
            "attachment content must be base64"
        );
    }

    #[test]
    fn whole_amounts_are_padded_to_cents() {
        let request: ReminderRequest = serde_json::from_str(
            r#"{"customer_email": "ana@example.com", "invoice_number": "INV-1", "amount": 99}"#,
        )
        .unwrap();
        assert_eq!(request.amount, dec!(99));
        assert!(request.body().contains("- Amount: $99.00\n"));
    }

    #[test]
    fn reminder_without_invoice_number_is_rejected() {
        let request: ReminderRequest =
            serde_json::from_str(r#"{"customer_email": "ana@example.com"}"#).unwrap();
        let err = AppError::from(request.validate().unwrap_err());
        assert_eq!(
            err.client_message(),
            "customer_email and invoice_number are required"
        );
    }
}
