//! Records shared across services, as stored in the table store.

pub mod currency_rate;
pub mod customer;
pub mod invoice;
pub mod payment;

pub use currency_rate::CurrencyRate;
pub use customer::{Customer, CustomerContact, CustomerFields};
pub use invoice::{settle, Invoice, InvoiceSettlement, Item, PaymentStatus};
pub use payment::{NewPayment, Payment};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};

/// Table names in the remote store.
pub mod tables {
    pub const CUSTOMERS: &str = "customers";
    pub const INVOICES: &str = "invoices";
    pub const INVOICE_ITEMS: &str = "invoice_items";
    pub const PAYMENTS: &str = "payments";
    pub const CURRENCY_RATES: &str = "currency_rates";
}

/// Parse the timestamp shapes the store emits: RFC 3339, naive
/// `YYYY-MM-DDTHH:MM:SS[.f]` (with `T` or a space), or a bare date.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt);
        }
    }
    parse_date(value).and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Date part of a date or timestamp string.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    value
        .get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}

/// Treat an explicit JSON `null` like a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Accept `YYYY-MM-DD` or a full timestamp for date columns; unparseable
/// values read as absent.
pub(crate) fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_date))
}
