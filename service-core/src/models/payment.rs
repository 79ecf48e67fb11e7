use super::null_as_default;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Payment row. Recording one also moves the owning invoice's
/// `paid_amount` and `payment_status`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Payment {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub invoice_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub amount: Decimal,
    #[serde(default, deserialize_with = "null_as_default")]
    pub payment_method: String,
    #[serde(default)]
    pub payment_date: Option<String>,
    #[serde(default)]
    pub reference_number: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Insert payload for the payments table.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewPayment {
    pub invoice_id: String,
    pub amount: Decimal,
    pub payment_method: String,
    pub payment_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
}
