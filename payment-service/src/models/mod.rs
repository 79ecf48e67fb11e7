use rust_decimal::Decimal;
use serde::Deserialize;
use validator::{Validate, ValidationError};

fn positive_amount(amount: &Decimal) -> Result<(), ValidationError> {
    if *amount <= Decimal::ZERO {
        let mut err = ValidationError::new("range");
        err.message = Some("amount must be greater than 0".into());
        return Err(err);
    }
    Ok(())
}

/// `POST /payments` body.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RecordPaymentRequest {
    #[validate(length(min = 1, message = "invoice_id is required"))]
    #[serde(default)]
    pub invoice_id: String,
    #[validate(custom(function = "positive_amount"))]
    #[serde(default)]
    pub amount: Decimal,
    #[validate(length(min = 1, message = "payment_method is required"))]
    #[serde(default)]
    pub payment_method: String,
    /// Defaults to today.
    #[serde(default)]
    pub payment_date: Option<String>,
    #[serde(default)]
    pub reference_number: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_by: Option<String>,
}
