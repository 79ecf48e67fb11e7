use axum::extract::{Path, State};
use service_core::error::{ApiJson, AppError};
use service_core::models::{Customer, CustomerFields};
use service_core::response::{created, ok, Confirmation, Envelope};
use validator::Validate;

use crate::services::metrics::record_write;
use crate::startup::AppState;

fn not_found() -> AppError {
    AppError::NotFound(anyhow::anyhow!("Customer not found"))
}

#[tracing::instrument(skip(state))]
pub async fn list_customers(
    State(state): State<AppState>,
) -> Result<Envelope<Vec<Customer>>, AppError> {
    let customers = state.repository.list().await?;
    Ok(ok(customers))
}

#[tracing::instrument(skip(state))]
pub async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Envelope<Customer>, AppError> {
    let customer = state.repository.get(&id).await?.ok_or_else(not_found)?;
    Ok(ok(customer))
}

#[tracing::instrument(skip(state, fields))]
pub async fn create_customer(
    State(state): State<AppState>,
    ApiJson(fields): ApiJson<CustomerFields>,
) -> Result<Envelope<Customer>, AppError> {
    fields.validate()?;

    let customer = state.repository.create(&fields).await?;
    record_write("create");
    Ok(created(customer))
}

#[tracing::instrument(skip(state, fields))]
pub async fn update_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(fields): ApiJson<CustomerFields>,
) -> Result<Envelope<Customer>, AppError> {
    fields.validate()?;

    let customer = state
        .repository
        .update(&id, &fields)
        .await?
        .ok_or_else(not_found)?;
    record_write("update");
    tracing::info!(customer_id = %customer.id, "Customer updated");
    Ok(ok(customer))
}

#[tracing::instrument(skip(state))]
pub async fn delete_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Envelope<Confirmation>, AppError> {
    if !state.repository.delete(&id).await? {
        return Err(not_found());
    }
    record_write("delete");
    tracing::info!(customer_id = %id, "Customer deleted");
    Ok(ok(Confirmation::new("Customer deleted successfully")))
}
