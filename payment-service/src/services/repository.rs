use service_core::error::AppError;
use service_core::models::{tables, Invoice, InvoiceSettlement, NewPayment, Payment};
use service_core::store::{Direction, Filter, SelectQuery, Store};
use tracing::instrument;

#[derive(Clone)]
pub struct PaymentRepository {
    store: Store,
}

impl PaymentRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Every payment, most recent payment date first.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Payment>, AppError> {
        let payments = self
            .store
            .select(SelectQuery::from(tables::PAYMENTS).order_by("payment_date", Direction::Desc))
            .await?;
        Ok(payments)
    }

    #[instrument(skip(self), fields(invoice_id = %invoice_id))]
    pub async fn list_for_invoice(&self, invoice_id: &str) -> Result<Vec<Payment>, AppError> {
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

    #[instrument(skip(self), fields(invoice_id = %id))]
    pub async fn invoice(&self, id: &str) -> Result<Option<Invoice>, AppError> {
        let invoice = self
            .store
            .select_one(SelectQuery::from(tables::INVOICES).filter(Filter::eq("id", id)))
            .await?;
        Ok(invoice)
    }

    #[instrument(skip(self, payment), fields(invoice_id = %payment.invoice_id))]
    pub async fn insert(&self, payment: &NewPayment) -> Result<Payment, AppError> {
        let payment = self.store.insert(tables::PAYMENTS, payment).await?;
        Ok(payment)
    }

    /// Write the new paid amount and status. `None` when the invoice row is
    /// gone.
    #[instrument(skip(self, settlement), fields(invoice_id = %invoice_id))]
    pub async fn settle_invoice(
        &self,
        invoice_id: &str,
        settlement: &InvoiceSettlement,
    ) -> Result<Option<Invoice>, AppError> {
        let mut rows: Vec<Invoice> = self
            .store
            .update(tables::INVOICES, &[Filter::eq("id", invoice_id)], settlement)
            .await?;
        Ok(rows.pop())
    }
}
