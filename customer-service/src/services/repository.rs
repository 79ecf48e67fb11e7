//! Customer persistence over the table store.

use service_core::error::AppError;
use service_core::models::{tables, Customer, CustomerFields};
use service_core::store::{Direction, Filter, SelectQuery, Store};
use tracing::{info, instrument};

#[derive(Clone)]
pub struct CustomerRepository {
    store: Store,
}

impl CustomerRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// All customers, newest first.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Customer>, AppError> {
        let customers = self
            .store
            .select(SelectQuery::from(tables::CUSTOMERS).order_by("created_at", Direction::Desc))
            .await?;
        Ok(customers)
    }

    #[instrument(skip(self), fields(customer_id = %id))]
    pub async fn get(&self, id: &str) -> Result<Option<Customer>, AppError> {
        let customer = self
            .store
            .select_one(SelectQuery::from(tables::CUSTOMERS).filter(Filter::eq("id", id)))
            .await?;
        Ok(customer)
    }

    #[instrument(skip(self, fields), fields(email = %fields.email))]
    pub async fn create(&self, fields: &CustomerFields) -> Result<Customer, AppError> {
        let customer: Customer = self.store.insert(tables::CUSTOMERS, fields).await?;
        info!(customer_id = %customer.id, "Customer created");
        Ok(customer)
    }

    /// Replace every writable field. `None` when no row has this id.
    #[instrument(skip(self, fields), fields(customer_id = %id))]
    pub async fn update(
        &self,
        id: &str,
        fields: &CustomerFields,
    ) -> Result<Option<Customer>, AppError> {
        let mut rows: Vec<Customer> = self
            .store
            .update(tables::CUSTOMERS, &[Filter::eq("id", id)], fields)
            .await?;
        Ok(rows.pop())
    }

    /// `false` when no row has this id.
    #[instrument(skip(self), fields(customer_id = %id))]
    pub async fn delete(&self, id: &str) -> Result<bool, AppError> {
        let removed = self
            .store
            .delete(tables::CUSTOMERS, &[Filter::eq("id", id)])
            .await?;
        Ok(removed > 0)
    }
}
