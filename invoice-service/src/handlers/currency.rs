use crate::models::{Conversion, ConvertParams};
use crate::startup::AppState;
use axum::extract::{Query, State};
use rust_decimal::Decimal;
use service_core::error::AppError;
use service_core::models::CurrencyRate;
use service_core::response::{ok, Envelope};
use std::str::FromStr;

#[tracing::instrument(skip(state))]
pub async fn list_currency_rates(
    State(state): State<AppState>,
) -> Result<Envelope<Vec<CurrencyRate>>, AppError> {
    let rates = state.repository.currency_rates().await?;
    Ok(ok(rates))
}

/// Convert with the stored pair rate. Identical codes convert at 1 without
/// touching the rate table.
#[tracing::instrument(skip(state))]
pub async fn convert_currency(
    State(state): State<AppState>,
    Query(params): Query<ConvertParams>,
) -> Result<Envelope<Conversion>, AppError> {
    let (Some(raw_amount), Some(from), Some(to)) = (
        params.amount.as_deref().map(str::trim).filter(|s| !s.is_empty()),
        params.from.as_deref().map(str::trim).filter(|s| !s.is_empty()),
        params.to.as_deref().map(str::trim).filter(|s| !s.is_empty()),
    ) else {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "amount, from and to are required"
        )));
    };

    let amount = Decimal::from_str(raw_amount)
        .map_err(|_| AppError::BadRequest(anyhow::anyhow!("invalid amount")))?;
    let from = from.to_uppercase();
    let to = to.to_uppercase();

    let rate = if from == to {
        Decimal::ONE
    } else {
        state
            .repository
            .rate(&from, &to)
            .await?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Currency rate not found")))?
            .rate
    };

    Ok(ok(Conversion {
        amount,
        converted_amount: amount * rate,
        from,
        to,
        rate,
    }))
}
