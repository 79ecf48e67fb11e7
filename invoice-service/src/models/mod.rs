//! Request and response shapes for the invoice HTTP API.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use service_core::error::AppError;
use validator::{Validate, ValidationError};

/// Line item as sent by clients. `total` is always recomputed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemInput {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub quantity: u32,
    #[serde(default)]
    pub unit_price: Decimal,
}

fn no_negative_prices(items: &[ItemInput]) -> Result<(), ValidationError> {
    if items.iter().any(|item| item.unit_price.is_sign_negative()) {
        let mut err = ValidationError::new("negative_unit_price");
        err.message = Some("unit_price must not be negative".into());
        return Err(err);
    }
    Ok(())
}

#[allow(clippy::ptr_arg)]
fn at_least_one_item(items: &Vec<ItemInput>) -> Result<(), ValidationError> {
    if items.is_empty() {
        let mut err = ValidationError::new("required");
        err.message = Some("customer_id and items are required".into());
        return Err(err);
    }
    no_negative_prices(items)
}

#[allow(clippy::ptr_arg)]
fn optional_items(items: &Vec<ItemInput>) -> Result<(), ValidationError> {
    no_negative_prices(items)
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateInvoiceRequest {
    #[validate(length(min = 1, message = "customer_id and items are required"))]
    #[serde(default)]
    pub customer_id: String,
    #[validate(custom(function = "at_least_one_item"))]
    #[serde(default)]
    pub items: Vec<ItemInput>,
    /// Tax rate in percent.
    #[serde(default)]
    pub tax: Decimal,
    #[serde(default)]
    pub discount: Decimal,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
}

/// Fields a client may change on an existing invoice. Any of `items`, `tax`
/// or `discount` triggers a totals recompute.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateInvoiceRequest {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[validate(custom(function = "optional_items"))]
    #[serde(default)]
    pub items: Option<Vec<ItemInput>>,
    #[serde(default)]
    pub tax: Option<Decimal>,
    #[serde(default)]
    pub discount: Option<Decimal>,
}

impl UpdateInvoiceRequest {
    pub fn changes_totals(&self) -> bool {
        self.items.is_some() || self.tax.is_some() || self.discount.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.notes.is_none()
            && self.due_date.is_none()
            && !self.changes_totals()
    }
}

/// `GET /invoices` query. `all` or empty means no filter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvoiceListParams {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
}

/// `GET /invoices/filter` query.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvoiceFilterParams {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

/// Drop `None`, blanks and the `all` sentinel.
pub fn active_filter(value: Option<&str>) -> Option<&str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConvertParams {
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Conversion {
    pub amount: Decimal,
    pub from: String,
    pub to: String,
    pub rate: Decimal,
    pub converted_amount: Decimal,
}

/// Parse a client-supplied `YYYY-MM-DD` (a full timestamp is also accepted).
pub fn parse_due_date(value: &str) -> Result<NaiveDate, AppError> {
    service_core::models::parse_date(value)
        .ok_or_else(|| AppError::BadRequest(anyhow::anyhow!("invalid due_date: {}", value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_requires_customer_and_items() {
        let request: CreateInvoiceRequest =
            serde_json::from_value(json!({ "customer_id": "c-1", "items": [] })).unwrap();
        assert!(request.validate().is_err());

        let request: CreateInvoiceRequest = serde_json::from_value(json!({
            "items": [{ "description": "Design", "quantity": 1, "unit_price": 10 }]
        }))
        .unwrap();
        assert!(request.validate().is_err());

        let request: CreateInvoiceRequest = serde_json::from_value(json!({
            "customer_id": "c-1",
            "items": [{ "description": "Design", "quantity": 1, "unit_price": 10 }]
        }))
        .unwrap();
        assert!(request.validate().is_ok());
    }

    #[test]
    fn negative_unit_price_is_rejected() {
        let request: UpdateInvoiceRequest = serde_json::from_value(json!({
            "items": [{ "description": "Refund", "quantity": 1, "unit_price": -5 }]
        }))
        .unwrap();
        assert!(request.validate().is_err());
        assert!(request.changes_totals());
    }

    #[test]
    fn all_sentinel_disables_filter() {
        assert_eq!(active_filter(Some("all")), None);
        assert_eq!(active_filter(Some("ALL")), None);
        assert_eq!(active_filter(Some("  ")), None);
        assert_eq!(active_filter(None), None);
        assert_eq!(active_filter(Some("paid")), Some("paid"));
    }

    #[test]
    fn due_date_must_parse() {
        assert_eq!(
            parse_due_date("2026-05-01").unwrap(),
            NaiveDate::from_ymd_opt(2026, 5, 1).unwrap()
        );
        assert!(parse_due_date("soon").is_err());
    }
}
