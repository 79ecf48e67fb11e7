use crate::models::RecordPaymentRequest;
use crate::services::record_payment;
use crate::startup::AppState;
use axum::extract::{Path, State};
use chrono::Utc;
use service_core::error::{ApiJson, AppError};
use service_core::models::Payment;
use service_core::response::{created, ok, Envelope};
use validator::Validate;

#[tracing::instrument(skip(state))]
pub async fn list_payments(
    State(state): State<AppState>,
) -> Result<Envelope<Vec<Payment>>, AppError> {
    let payments = state.repository.list().await?;
    Ok(ok(payments))
}

#[tracing::instrument(skip(state))]
pub async fn invoice_payments(
    State(state): State<AppState>,
    Path(invoice_id): Path<String>,
) -> Result<Envelope<Vec<Payment>>, AppError> {
    let payments = state.repository.list_for_invoice(&invoice_id).await?;
    Ok(ok(payments))
}

#[tracing::instrument(skip(state, request))]
pub async fn create_payment(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RecordPaymentRequest>,
) -> Result<Envelope<Payment>, AppError> {
    request.validate()?;

    let payment = record_payment(&state.repository, &request, Utc::now().date_naive()).await?;
    Ok(created(payment))
}
