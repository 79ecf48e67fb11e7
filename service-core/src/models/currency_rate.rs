use super::null_as_default;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Multiplicative rate for converting `from_currency` into `to_currency`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CurrencyRate {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    pub from_currency: String,
    pub to_currency: String,
    pub rate: Decimal,
    #[serde(default)]
    pub updated_at: Option<String>,
}
