//! Invoice records.

use super::{lenient_date, null_as_default};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Settlement state of an invoice, tracked separately from the document
/// `status` (pending, sent, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum PaymentStatus {
    #[default]
    Unpaid,
    PartiallyPaid,
    Paid,
    Overdue,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Unpaid => "unpaid",
            PaymentStatus::PartiallyPaid => "partially_paid",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Overdue => "overdue",
        }
    }

    pub fn from_string(s: &str) -> Self {
        match s {
            "partially_paid" => PaymentStatus::PartiallyPaid,
            "paid" => PaymentStatus::Paid,
            "overdue" => PaymentStatus::Overdue,
            _ => PaymentStatus::Unpaid,
        }
    }
}

impl From<String> for PaymentStatus {
    fn from(value: String) -> Self {
        PaymentStatus::from_string(&value)
    }
}

/// One billable line. `total` is derived from quantity and unit price on
/// every write.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Item {
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub quantity: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub unit_price: Decimal,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total: Decimal,
}

impl Item {
    pub fn line_total(&self) -> Decimal {
        Decimal::from(self.quantity) * self.unit_price
    }
}

/// Invoice row, optionally enriched with the customer's display fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Invoice {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub customer_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub invoice_number: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<Item>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub subtotal: Decimal,
    /// Tax rate in percent.
    #[serde(default, deserialize_with = "null_as_default")]
    pub tax: Decimal,
    #[serde(default, deserialize_with = "null_as_default")]
    pub discount: Decimal,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total: Decimal,
    #[serde(default, deserialize_with = "null_as_default")]
    pub paid_amount: Decimal,
    #[serde(default, deserialize_with = "null_as_default")]
    pub currency: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub payment_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
}

impl Invoice {
    pub fn tax_amount(&self) -> Decimal {
        self.subtotal * self.tax / Decimal::ONE_HUNDRED
    }

    pub fn outstanding(&self) -> Decimal {
        self.total - self.paid_amount
    }

    /// Past due and not fully settled. Invoices without a due date are never
    /// overdue.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.payment_status != PaymentStatus::Paid
            && self.due_date.map(|due| due < today).unwrap_or(false)
    }
}

/// Clamp `paid` to `total` and derive the matching payment status.
pub fn settle(paid: Decimal, total: Decimal) -> (Decimal, PaymentStatus) {
    if paid >= total {
        (total, PaymentStatus::Paid)
    } else if paid > Decimal::ZERO {
        (paid, PaymentStatus::PartiallyPaid)
    } else {
        (paid, PaymentStatus::Unpaid)
    }
}

/// Patch written to an invoice when a payment is recorded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InvoiceSettlement {
    pub paid_amount: Decimal,
    pub payment_status: PaymentStatus,
    pub payment_date: String,
}
