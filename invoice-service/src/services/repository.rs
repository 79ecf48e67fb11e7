//! Invoice persistence over the table store.

use crate::models::{
    active_filter, parse_due_date, CreateInvoiceRequest, InvoiceFilterParams, InvoiceListParams,
    UpdateInvoiceRequest,
};
use crate::services::calculation::{
    compute_totals, format_invoice_number, invoice_number_pattern, price_items,
};
use chrono::{Datelike, Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use service_core::error::AppError;
use service_core::models::{
    settle, tables, CurrencyRate, Customer, CustomerContact, Invoice, Item, Payment,
    PaymentStatus,
};
use service_core::store::{Direction, Filter, SelectQuery, Store};
use std::collections::{BTreeSet, HashMap};
use tracing::{info, instrument, warn};

/// Days until an invoice falls due when the client gives no date.
pub const DEFAULT_PAYMENT_TERM_DAYS: i64 = 30;

#[derive(Debug, Serialize)]
struct NewInvoice {
    customer_id: String,
    invoice_number: String,
    items: Vec<Item>,
    subtotal: Decimal,
    tax: Decimal,
    discount: Decimal,
    total: Decimal,
    paid_amount: Decimal,
    currency: String,
    status: String,
    payment_status: PaymentStatus,
    due_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    notes: Option<String>,
}

#[derive(Debug, Default, Serialize)]
struct InvoicePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    due_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    items: Option<Vec<Item>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    subtotal: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tax: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    discount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    total: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    paid_amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    payment_status: Option<PaymentStatus>,
}

/// Case-insensitive match over the identifying fields and notes.
pub fn matches_search(invoice: &Invoice, needle: &str) -> bool {
    let needle = needle.to_lowercase();
    [
        Some(invoice.id.as_str()),
        Some(invoice.customer_id.as_str()),
        Some(invoice.invoice_number.as_str()),
        invoice.notes.as_deref(),
    ]
    .into_iter()
    .flatten()
    .any(|field| field.to_lowercase().contains(&needle))
}

#[derive(Clone)]
pub struct InvoiceRepository {
    store: Store,
}

impl InvoiceRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Invoices newest first, optionally narrowed by payment status and
    /// currency, with customer name and email attached.
    #[instrument(skip(self))]
    pub async fn list(&self, params: &InvoiceListParams) -> Result<Vec<Invoice>, AppError> {
        let mut query =
            SelectQuery::from(tables::INVOICES).order_by("created_at", Direction::Desc);
        if let Some(status) = active_filter(params.status.as_deref()) {
            query = query.filter(Filter::eq("payment_status", status));
        }
        if let Some(currency) = active_filter(params.currency.as_deref()) {
            query = query.filter(Filter::eq("currency", currency));
        }

        let mut invoices: Vec<Invoice> = self.store.select(query).await?;
        self.attach_customers(&mut invoices).await?;
        Ok(invoices)
    }

    /// Document status and `created_at` range go to the store; `search` is
    /// applied to the returned rows.
    #[instrument(skip(self))]
    pub async fn filter(&self, params: &InvoiceFilterParams) -> Result<Vec<Invoice>, AppError> {
        let mut query =
            SelectQuery::from(tables::INVOICES).order_by("created_at", Direction::Desc);
        if let Some(status) = active_filter(params.status.as_deref()) {
            query = query.filter(Filter::eq("status", status));
        }
        if let Some(start) = active_filter(params.start_date.as_deref()) {
            query = query.filter(Filter::gte("created_at", start));
        }
        if let Some(end) = active_filter(params.end_date.as_deref()) {
            query = query.filter(Filter::lte("created_at", end));
        }

        let mut invoices: Vec<Invoice> = self.store.select(query).await?;
        if let Some(needle) = params.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            invoices.retain(|invoice| matches_search(invoice, needle));
        }
        self.attach_customers(&mut invoices).await?;
        Ok(invoices)
    }

    /// One invoice with its items and customer contact. Items come from the
    /// legacy `invoice_items` table when the inline list is empty.
    #[instrument(skip(self), fields(invoice_id = %id))]
    pub async fn get(&self, id: &str) -> Result<Option<Invoice>, AppError> {
        let invoice: Option<Invoice> = self
            .store
            .select_one(SelectQuery::from(tables::INVOICES).filter(Filter::eq("id", id)))
            .await?;
        let Some(mut invoice) = invoice else {
            return Ok(None);
        };

        if invoice.items.is_empty() {
            invoice.items = self
                .store
                .select(SelectQuery::from(tables::INVOICE_ITEMS).filter(Filter::eq("invoice_id", id)))
                .await?;
        }

        let mut one = vec![invoice];
        self.attach_customers(&mut one).await?;
        Ok(one.pop())
    }

    #[instrument(skip(self), fields(customer_id = %id))]
    pub async fn customer(&self, id: &str) -> Result<Option<Customer>, AppError> {
        let customer = self
            .store
            .select_one(SelectQuery::from(tables::CUSTOMERS).filter(Filter::eq("id", id)))
            .await?;
        Ok(customer)
    }

    /// Price the items, number the invoice and insert it.
    ///
    /// The number is the count of this year's numbers plus one. Count and
    /// insert are separate store calls, so concurrent creates can share a
    /// number.
    #[instrument(skip(self, request), fields(customer_id = %request.customer_id))]
    pub async fn create(
        &self,
        request: &CreateInvoiceRequest,
        today: NaiveDate,
    ) -> Result<Invoice, AppError> {
        let customer = self.customer(&request.customer_id).await?.ok_or_else(|| {
            AppError::BadRequest(anyhow::anyhow!("Customer not found"))
        })?;

        let due_date = match request.due_date.as_deref().filter(|d| !d.trim().is_empty()) {
            Some(raw) => parse_due_date(raw)?,
            None => today + Duration::days(DEFAULT_PAYMENT_TERM_DAYS),
        };

        let items = price_items(&request.items);
        let totals = compute_totals(&items, request.tax, request.discount);

        let year = today.year();
        let existing = self
            .store
            .count(
                SelectQuery::from(tables::INVOICES)
                    .filter(Filter::like("invoice_number", invoice_number_pattern(year))),
            )
            .await?;

        let row = NewInvoice {
            customer_id: customer.id.clone(),
            invoice_number: format_invoice_number(year, existing),
            items,
            subtotal: totals.subtotal,
            tax: request.tax,
            discount: request.discount,
            total: totals.total,
            paid_amount: Decimal::ZERO,
            currency: non_blank(request.currency.as_deref()).unwrap_or("USD").to_uppercase(),
            status: non_blank(request.status.as_deref())
                .unwrap_or("pending")
                .to_string(),
            payment_status: PaymentStatus::Unpaid,
            due_date,
            notes: request.notes.clone(),
        };

        let mut invoice: Invoice = self.store.insert(tables::INVOICES, &row).await?;
        invoice.customer_name = Some(customer.name);
        invoice.customer_email = Some(customer.email);

        info!(
            invoice_id = %invoice.id,
            invoice_number = %invoice.invoice_number,
            total = %invoice.total,
            "Invoice created"
        );
        Ok(invoice)
    }

    /// Apply the requested changes. Changing items, tax or discount
    /// recomputes the totals from the merged values and re-derives the
    /// payment status against the new total.
    #[instrument(skip(self, request), fields(invoice_id = %id))]
    pub async fn update(
        &self,
        id: &str,
        request: &UpdateInvoiceRequest,
    ) -> Result<Option<Invoice>, AppError> {
        if request.is_empty() {
            return self.get(id).await;
        }

        let mut patch = InvoicePatch {
            status: request.status.clone(),
            notes: request.notes.clone(),
            ..InvoicePatch::default()
        };
        if let Some(raw) = request.due_date.as_deref().filter(|d| !d.trim().is_empty()) {
            patch.due_date = Some(parse_due_date(raw)?);
        }

        if request.changes_totals() {
            let Some(current) = self.get(id).await? else {
                return Ok(None);
            };
            let items = match &request.items {
                Some(inputs) => price_items(inputs),
                None => current.items.clone(),
            };
            let tax = request.tax.unwrap_or(current.tax);
            let discount = request.discount.unwrap_or(current.discount);
            let totals = compute_totals(&items, tax, discount);

            if current.paid_amount > Decimal::ZERO {
                let (paid, status) = settle(current.paid_amount, totals.total);
                patch.paid_amount = Some(paid);
                patch.payment_status = Some(status);
            }
            patch.items = Some(items);
            patch.subtotal = Some(totals.subtotal);
            patch.tax = Some(tax);
            patch.discount = Some(discount);
            patch.total = Some(totals.total);
        }

        let mut rows: Vec<Invoice> = self
            .store
            .update(tables::INVOICES, &[Filter::eq("id", id)], &patch)
            .await?;
        self.attach_customers(&mut rows).await?;
        Ok(rows.pop())
    }

    /// Remove legacy item rows, then the invoice. `false` when no invoice
    /// has this id.
    #[instrument(skip(self), fields(invoice_id = %id))]
    pub async fn delete(&self, id: &str) -> Result<bool, AppError> {
        let items = self
            .store
            .delete(tables::INVOICE_ITEMS, &[Filter::eq("invoice_id", id)])
            .await?;
        let removed = self
            .store
            .delete(tables::INVOICES, &[Filter::eq("id", id)])
            .await?;
        if removed == 0 && items > 0 {
            warn!(invoice_id = %id, items, "Removed item rows of a missing invoice");
        }
        Ok(removed > 0)
    }

    /// Payments recorded against an invoice, most recent first.
    #[instrument(skip(self), fields(invoice_id = %invoice_id))]
    pub async fn payments(&self, invoice_id: &str) -> Result<Vec<Payment>, AppError> {
        let payments = self
            .store
            .select(
                SelectQuery::from(tables::PAYMENTS)
                    .filter(Filter::eq("invoice_id", invoice_id))
                    .order_by("payment_date", Direction::Desc),
            )
            .await?;
        Ok(payments)
    }

    #[instrument(skip(self))]
    pub async fn currency_rates(&self) -> Result<Vec<CurrencyRate>, AppError> {
        let rates = self
            .store
            .select(
                SelectQuery::from(tables::CURRENCY_RATES)
                    .order_by("from_currency", Direction::Asc),
            )
            .await?;
        Ok(rates)
    }

    #[instrument(skip(self))]
    pub async fn rate(&self, from: &str, to: &str) -> Result<Option<CurrencyRate>, AppError> {
        let rate = self
            .store
            .select_one(
                SelectQuery::from(tables::CURRENCY_RATES)
                    .filter(Filter::eq("from_currency", from))
                    .filter(Filter::eq("to_currency", to)),
            )
            .await?;
        Ok(rate)
    }

    /// Resolve `customer_name` / `customer_email` with one lookup for all
    /// distinct customers.
    async fn attach_customers(&self, invoices: &mut [Invoice]) -> Result<(), AppError> {
        let ids: BTreeSet<&str> = invoices
            .iter()
            .map(|invoice| invoice.customer_id.as_str())
            .filter(|id| !id.is_empty())
            .collect();
        if ids.is_empty() {
            return Ok(());
        }

        let contacts: Vec<CustomerContact> = self
            .store
            .select(
                SelectQuery::from(tables::CUSTOMERS)
                    .columns(&["id", "name", "email"])
                    .filter(Filter::in_list("id", ids)),
            )
            .await?;
        let by_id: HashMap<String, CustomerContact> = contacts
            .into_iter()
            .map(|contact| (contact.id.clone(), contact))
            .collect();

        for invoice in invoices.iter_mut() {
            if let Some(contact) = by_id.get(&invoice.customer_id) {
                invoice.customer_name = Some(contact.name.clone());
                invoice.customer_email = Some(contact.email.clone());
            }
        }
        Ok(())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
