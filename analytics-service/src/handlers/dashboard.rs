use crate::services::metrics::observe_rows;
use crate::services::reports::{
    dashboard_stats, overdue_invoices, revenue_by_period, top_customers, DashboardStats, Period,
    RevenuePoint, TopCustomer, ALL_CURRENCIES, DEFAULT_REVENUE_LIMIT, DEFAULT_TOP_CUSTOMERS_LIMIT,
};
use crate::startup::AppState;
use axum::extract::{Query, State};
use chrono::Utc;
use serde::Deserialize;
use service_core::error::AppError;
use service_core::models::Invoice;
use service_core::response::{ok, Envelope};
use std::collections::HashMap;

#[derive(Debug, Default, Deserialize)]
pub struct StatsParams {
    #[serde(default)]
    pub currency: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RevenueParams {
    #[serde(default)]
    pub period: Option<String>,
    #[serde(default)]
    pub limit: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TopCustomersParams {
    #[serde(default)]
    pub limit: Option<String>,
}

/// Unparseable limits fall back to `default`; zero or negative keeps every
/// row.
pub fn parse_limit(raw: Option<&str>, default: usize) -> usize {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => default,
        Some(value) => match value.parse::<i64>() {
            Ok(n) if n > 0 => usize::try_from(n).unwrap_or(usize::MAX),
            Ok(_) => 0,
            Err(_) => default,
        },
    }
}

#[tracing::instrument(skip(state))]
pub async fn stats(
    State(state): State<AppState>,
    Query(params): Query<StatsParams>,
) -> Result<Envelope<DashboardStats>, AppError> {
    let currency = params
        .currency
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case(ALL_CURRENCIES))
        .map(str::to_uppercase);

    let invoices = state.repository.invoices(currency.as_deref()).await?;
    observe_rows("stats", invoices.len());

    let stats = dashboard_stats(
        &invoices,
        Utc::now().date_naive(),
        currency.as_deref().unwrap_or(ALL_CURRENCIES),
    );
    Ok(ok(stats))
}

#[tracing::instrument(skip(state))]
pub async fn revenue(
    State(state): State<AppState>,
    Query(params): Query<RevenueParams>,
) -> Result<Envelope<Vec<RevenuePoint>>, AppError> {
    let period = params
        .period
        .as_deref()
        .map(Period::from_string)
        .unwrap_or_default();
    let limit = parse_limit(params.limit.as_deref(), DEFAULT_REVENUE_LIMIT);

    let invoices = state.repository.paid_invoices().await?;
    observe_rows("revenue", invoices.len());
    Ok(ok(revenue_by_period(&invoices, period, limit)))
}

#[tracing::instrument(skip(state))]
pub async fn top_customers_report(
    State(state): State<AppState>,
    Query(params): Query<TopCustomersParams>,
) -> Result<Envelope<Vec<TopCustomer>>, AppError> {
    let limit = parse_limit(params.limit.as_deref(), DEFAULT_TOP_CUSTOMERS_LIMIT);

    let invoices = state.repository.invoices(None).await?;
    observe_rows("top_customers", invoices.len());
    let customers = state
        .repository
        .customers(invoices.iter().map(|i| i.customer_id.as_str()))
        .await?;

    Ok(ok(top_customers(&invoices, &customers, limit)))
}

#[tracing::instrument(skip(state))]
pub async fn overdue(State(state): State<AppState>) -> Result<Envelope<Vec<Invoice>>, AppError> {
    let today = Utc::now().date_naive();
    let candidates = state
        .repository
        .overdue_candidates(&today.to_string())
        .await?;
    observe_rows("overdue", candidates.len());

    let mut invoices = overdue_invoices(candidates, today);
    let customers: HashMap<String, _> = state
        .repository
        .customers(invoices.iter().map(|i| i.customer_id.as_str()))
        .await?
        .into_iter()
        .map(|c| (c.id.clone(), c))
        .collect();
    for invoice in invoices.iter_mut() {
        if let Some(contact) = customers.get(&invoice.customer_id) {
            invoice.customer_name = Some(contact.name.clone());
            invoice.customer_email = Some(contact.email.clone());
        }
    }

    Ok(ok(invoices))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_falls_back_to_default_when_unparseable() {
        assert_eq!(parse_limit(None, 30), 30);
        assert_eq!(parse_limit(Some(""), 30), 30);
        assert_eq!(parse_limit(Some("abc"), 10), 10);
        assert_eq!(parse_limit(Some(" 5 "), 30), 5);
    }

    #[test]
    fn non_positive_limit_keeps_everything() {
        assert_eq!(parse_limit(Some("0"), 10), 0);
        assert_eq!(parse_limit(Some("-1"), 10), 0);
    }
}
