use crate::models::{
    CreateInvoiceRequest, InvoiceFilterParams, InvoiceListParams, UpdateInvoiceRequest,
};
use crate::services::metrics::{record_invoiced, record_pdf, record_write};
use crate::services::pdf::pdf_filename;
use crate::startup::AppState;
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use rust_decimal::prelude::ToPrimitive;
use service_core::error::{ApiJson, AppError};
use service_core::models::{Invoice, Payment};
use service_core::response::{created, ok, Confirmation, Envelope};
use validator::Validate;

fn not_found() -> AppError {
    AppError::NotFound(anyhow::anyhow!("Invoice not found"))
}

#[tracing::instrument(skip(state))]
pub async fn list_invoices(
    State(state): State<AppState>,
    Query(params): Query<InvoiceListParams>,
) -> Result<Envelope<Vec<Invoice>>, AppError> {
    let invoices = state.repository.list(&params).await?;
    Ok(ok(invoices))
}

#[tracing::instrument(skip(state))]
pub async fn filter_invoices(
    State(state): State<AppState>,
    Query(params): Query<InvoiceFilterParams>,
) -> Result<Envelope<Vec<Invoice>>, AppError> {
    let invoices = state.repository.filter(&params).await?;
    Ok(ok(invoices))
}

#[tracing::instrument(skip(state))]
pub async fn get_invoice(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Envelope<Invoice>, AppError> {
    let invoice = state.repository.get(&id).await?.ok_or_else(not_found)?;
    Ok(ok(invoice))
}

#[tracing::instrument(skip(state, request))]
pub async fn create_invoice(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateInvoiceRequest>,
) -> Result<Envelope<Invoice>, AppError> {
    request.validate()?;

    let invoice = state
        .repository
        .create(&request, Utc::now().date_naive())
        .await?;
    record_write("create");
    record_invoiced(&invoice.currency, invoice.total.to_f64().unwrap_or(0.0));
    Ok(created(invoice))
}

#[tracing::instrument(skip(state, request))]
pub async fn update_invoice(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<UpdateInvoiceRequest>,
) -> Result<Envelope<Invoice>, AppError> {
    request.validate()?;

    let invoice = state
        .repository
        .update(&id, &request)
        .await?
        .ok_or_else(not_found)?;
    record_write("update");
    tracing::info!(invoice_id = %invoice.id, "Invoice updated");
    Ok(ok(invoice))
}

#[tracing::instrument(skip(state))]
pub async fn delete_invoice(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Envelope<Confirmation>, AppError> {
    if !state.repository.delete(&id).await? {
        return Err(not_found());
    }
    record_write("delete");
    tracing::info!(invoice_id = %id, "Invoice deleted");
    Ok(ok(Confirmation::new("Invoice deleted successfully")))
}

#[tracing::instrument(skip(state))]
pub async fn invoice_payments(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Envelope<Vec<Payment>>, AppError> {
    state.repository.get(&id).await?.ok_or_else(not_found)?;
    let payments = state.repository.payments(&id).await?;
    Ok(ok(payments))
}

/// `application/pdf` download of one invoice.
#[tracing::instrument(skip(state))]
pub async fn invoice_pdf(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let invoice = state.repository.get(&id).await?.ok_or_else(not_found)?;
    let customer = state.repository.customer(&invoice.customer_id).await?;

    let rendered = state
        .pdf
        .render(&invoice, customer.as_ref(), Utc::now().naive_utc())
        .map_err(|e| {
            record_pdf("error");
            tracing::error!(invoice_id = %id, error = %e, "PDF rendering failed");
            e
        })?;
    record_pdf("ok");
    tracing::info!(invoice_id = %id, pages = rendered.pages, "Invoice PDF rendered");

    let disposition = format!(
        "attachment; filename={}",
        pdf_filename(&invoice.invoice_number)
    );
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        rendered.bytes,
    )
        .into_response())
}
