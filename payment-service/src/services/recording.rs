//! Recording a payment against an invoice.
//!
//! The payment insert and the invoice update are two independent store
//! writes. When the second fails the payment row stays and the caller gets
//! an internal error naming the failure.

use crate::models::RecordPaymentRequest;
use crate::services::metrics::{PAYMENTS_TOTAL, SETTLEMENT_FAILURES_TOTAL};
use crate::services::PaymentRepository;
use chrono::NaiveDate;
use service_core::error::AppError;
use service_core::models::{settle, InvoiceSettlement, NewPayment, Payment};
use tracing::{error, info, instrument};

#[instrument(skip(repository, request), fields(invoice_id = %request.invoice_id, amount = %request.amount))]
pub async fn record_payment(
    repository: &PaymentRepository,
    request: &RecordPaymentRequest,
    today: NaiveDate,
) -> Result<Payment, AppError> {
    let invoice = repository
        .invoice(&request.invoice_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Invoice not found")))?;

    let payment_date = request
        .payment_date
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| today.to_string());

    let payment = repository
        .insert(&NewPayment {
            invoice_id: invoice.id.clone(),
            amount: request.amount,
            payment_method: request.payment_method.clone(),
            payment_date: payment_date.clone(),
            reference_number: request.reference_number.clone(),
            notes: request.notes.clone(),
            created_by: request.created_by.clone(),
        })
        .await?;
    PAYMENTS_TOTAL
        .with_label_values(&[payment.payment_method.as_str()])
        .inc();

    let (paid_amount, payment_status) = settle(invoice.paid_amount + request.amount, invoice.total);
    let settlement = InvoiceSettlement {
        paid_amount,
        payment_status,
        payment_date,
    };

    let failure = match repository.settle_invoice(&invoice.id, &settlement).await {
        Ok(Some(_)) => None,
        Ok(None) => Some("invoice no longer exists".to_string()),
        Err(e) => Some(e.client_message()),
    };
    if let Some(reason) = failure {
        SETTLEMENT_FAILURES_TOTAL
            .with_label_values(&["update_failed"])
            .inc();
        error!(
            payment_id = %payment.id,
            invoice_id = %invoice.id,
            error = %reason,
            "Payment recorded but invoice update failed"
        );
        return Err(AppError::InternalError(anyhow::anyhow!(
            "Failed to update invoice: {}",
            reason
        )));
    }

    info!(
        payment_id = %payment.id,
        invoice_id = %invoice.id,
        payment_status = payment_status.as_str(),
        "Payment recorded"
    );
    Ok(payment)
}
