//! Dashboard aggregation over invoice rows. Everything here is a pure
//! function of the rows and the reference date.
//!
//! Overdue means `due_date < today` with an open balance
//! (`payment_status != paid`). The stored `overdue` status is not consulted
//! for that test; it only counts as unpaid money.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use service_core::models::{parse_timestamp, CustomerContact, Invoice, PaymentStatus};
use std::collections::{BTreeMap, HashMap};

pub const DEFAULT_REVENUE_LIMIT: usize = 30;
pub const DEFAULT_TOP_CUSTOMERS_LIMIT: usize = 10;
pub const ALL_CURRENCIES: &str = "ALL";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_revenue: Decimal,
    pub paid_amount: Decimal,
    pub unpaid_amount: Decimal,
    pub overdue_amount: Decimal,
    pub total_invoices: usize,
    pub paid_invoices: usize,
    pub unpaid_invoices: usize,
    pub partially_paid_invoices: usize,
    pub overdue_invoices: usize,
    pub currency: String,
}

pub fn dashboard_stats(invoices: &[Invoice], today: NaiveDate, currency: &str) -> DashboardStats {
    let mut stats = DashboardStats {
        currency: currency.to_string(),
        ..DashboardStats::default()
    };

    for invoice in invoices {
        stats.total_revenue += invoice.total;
        stats.total_invoices += 1;

        match invoice.payment_status {
            PaymentStatus::Paid => {
                stats.paid_amount += invoice.total;
                stats.paid_invoices += 1;
            }
            PaymentStatus::PartiallyPaid => {
                stats.paid_amount += invoice.paid_amount;
                stats.unpaid_amount += invoice.outstanding();
                stats.partially_paid_invoices += 1;
            }
            PaymentStatus::Unpaid | PaymentStatus::Overdue => {
                stats.unpaid_amount += invoice.total;
                stats.unpaid_invoices += 1;
            }
        }

        if invoice.is_overdue(today) {
            stats.overdue_amount += invoice.outstanding();
            stats.overdue_invoices += 1;
        }
    }

    stats
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Period {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl Period {
    /// Unknown values fall back to daily.
    pub fn from_string(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "weekly" => Period::Weekly,
            "monthly" => Period::Monthly,
            _ => Period::Daily,
        }
    }

    /// `YYYY-MM-DD`, ISO `YYYY-Www` or `YYYY-MM`.
    pub fn bucket(&self, date: NaiveDate) -> String {
        match self {
            Period::Daily => date.format("%Y-%m-%d").to_string(),
            Period::Weekly => {
                let week = date.iso_week();
                format!("{}-W{:02}", week.year(), week.week())
            }
            Period::Monthly => date.format("%Y-%m").to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenuePoint {
    pub period: String,
    pub revenue: Decimal,
    pub invoice_count: usize,
}

/// Paid revenue bucketed by `created_at`, oldest bucket first. `limit`
/// keeps the most recent buckets; zero keeps all of them.
pub fn revenue_by_period(invoices: &[Invoice], period: Period, limit: usize) -> Vec<RevenuePoint> {
    let mut buckets: BTreeMap<String, (Decimal, usize)> = BTreeMap::new();

    for invoice in invoices {
        if invoice.payment_status != PaymentStatus::Paid {
            continue;
        }
        let Some(created) = invoice.created_at.as_deref().and_then(parse_timestamp) else {
            continue;
        };
        let entry = buckets
            .entry(period.bucket(created.date()))
            .or_insert((Decimal::ZERO, 0));
        entry.0 += invoice.total;
        entry.1 += 1;
    }

    let mut points: Vec<RevenuePoint> = buckets
        .into_iter()
        .map(|(period, (revenue, invoice_count))| RevenuePoint {
            period,
            revenue,
            invoice_count,
        })
        .collect();

    if limit > 0 && points.len() > limit {
        let excess = points.len() - limit;
        points.drain(..excess);
    }
    points
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopCustomer {
    pub customer_id: String,
    pub customer_name: String,
    pub customer_email: String,
    pub total_revenue: Decimal,
    pub invoice_count: usize,
}

/// Customers by invoiced total, highest first; ties go to the lower
/// customer id. `limit` of zero keeps everyone.
pub fn top_customers(
    invoices: &[Invoice],
    customers: &[CustomerContact],
    limit: usize,
) -> Vec<TopCustomer> {
    let mut totals: HashMap<&str, (Decimal, usize)> = HashMap::new();
    for invoice in invoices {
        let entry = totals
            .entry(invoice.customer_id.as_str())
            .or_insert((Decimal::ZERO, 0));
        entry.0 += invoice.total;
        entry.1 += 1;
    }

    let contacts: HashMap<&str, &CustomerContact> =
        customers.iter().map(|c| (c.id.as_str(), c)).collect();

    let mut ranked: Vec<TopCustomer> = totals
        .into_iter()
        .map(|(id, (total_revenue, invoice_count))| {
            let contact = contacts.get(id);
            TopCustomer {
                customer_id: id.to_string(),
                customer_name: contact
                    .map(|c| c.name.clone())
                    .unwrap_or_else(|| "Unknown".to_string()),
                customer_email: contact.map(|c| c.email.clone()).unwrap_or_default(),
                total_revenue,
                invoice_count,
            }
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.total_revenue
            .cmp(&a.total_revenue)
            .then_with(|| a.customer_id.cmp(&b.customer_id))
    });
    if limit > 0 {
        ranked.truncate(limit);
    }
    ranked
}

/// Overdue invoices, earliest due date first.
pub fn overdue_invoices(invoices: Vec<Invoice>, today: NaiveDate) -> Vec<Invoice> {
    let mut overdue: Vec<Invoice> = invoices
        .into_iter()
        .filter(|invoice| invoice.is_overdue(today))
        .collect();
    overdue.sort_by(|a, b| a.due_date.cmp(&b.due_date).then_with(|| a.id.cmp(&b.id)));
    overdue
}
