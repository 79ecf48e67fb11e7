//! Reads backing the dashboard reports.

use service_core::error::AppError;
use service_core::models::{tables, CustomerContact, Invoice, PaymentStatus};
use service_core::store::{Filter, SelectQuery, Store};
use std::collections::BTreeSet;
use tracing::instrument;

#[derive(Clone)]
pub struct AnalyticsRepository {
    store: Store,
}

impl AnalyticsRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// All invoices, or those in one currency.
    #[instrument(skip(self))]
    pub async fn invoices(&self, currency: Option<&str>) -> Result<Vec<Invoice>, AppError> {
        let mut query = SelectQuery::from(tables::INVOICES);
        if let Some(currency) = currency {
            query = query.filter(Filter::eq("currency", currency));
        }
        Ok(self.store.select(query).await?)
    }

    #[instrument(skip(self))]
    pub async fn paid_invoices(&self) -> Result<Vec<Invoice>, AppError> {
        let query = SelectQuery::from(tables::INVOICES)
            .filter(Filter::eq("payment_status", PaymentStatus::Paid.as_str()));
        Ok(self.store.select(query).await?)
    }

    /// Invoices due before `today` (`YYYY-MM-DD`). Settled ones are dropped
    /// by the report itself, which also sees rows without a stored status.
    #[instrument(skip(self))]
    pub async fn overdue_candidates(&self, today: &str) -> Result<Vec<Invoice>, AppError> {
        let query = SelectQuery::from(tables::INVOICES).filter(Filter::lt("due_date", today));
        Ok(self.store.select(query).await?)
    }

    #[instrument(skip(self, ids))]
    pub async fn customers<'a, I>(&self, ids: I) -> Result<Vec<CustomerContact>, AppError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let ids: BTreeSet<&str> = ids.into_iter().filter(|id| !id.is_empty()).collect();
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = SelectQuery::from(tables::CUSTOMERS)
            .columns(&["id", "name", "email"])
            .filter(Filter::in_list("id", ids));
        Ok(self.store.select(query).await?)
    }
}
