use common::RecordId;
use document_store::{
    ACCOUNTS_DATASET, DataStore, Record, StorageBackend, StoreError, UpdateOutcome,
};
use serde::{Deserialize, Serialize};

use crate::models::Customer;
use crate::money::Money;

/// A customer's account and its current balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    id: RecordId,
    amount: Money,
    customer_id: RecordId,
}

impl Record for Account {
    const DATASET: &'static str = ACCOUNTS_DATASET;

    fn id(&self) -> &RecordId {
        &self.id
    }
}

impl Account {
    /// Creates an empty account for a customer. Nothing is persisted.
    pub fn new(id: RecordId, customer_id: RecordId) -> Self {
        Self {
            id,
            amount: Money::zero(),
            customer_id,
        }
    }

    /// Loads an account by id.
    pub async fn find<B: StorageBackend>(
        store: &DataStore<B>,
        id: &str,
    ) -> Result<Option<Account>, StoreError> {
        store.find_record("id", id).await
    }

    pub fn id(&self) -> &RecordId {
        &self.id
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn customer_id(&self) -> &RecordId {
        &self.customer_id
    }

    /// Replaces the balance. Only meaningful inside [`update`](Self::update).
    pub fn set_amount(&mut self, amount: Money) {
        self.amount = amount;
    }

    /// Applies `f` and persists the result through the store.
    ///
    /// The in-memory account only changes once the store accepted the write.
    pub async fn update<B, F>(
        &mut self,
        store: &DataStore<B>,
        f: F,
    ) -> Result<UpdateOutcome, StoreError>
    where
        B: StorageBackend,
        F: FnOnce(&mut Account) + Send,
    {
        let mut working = self.clone();
        let outcome = store.update_record(&mut working, f).await?;
        *self = working;
        Ok(outcome)
    }

    /// Returns the customer owning this account.
    pub async fn customer<B: StorageBackend>(
        &self,
        store: &DataStore<B>,
    ) -> Result<Option<Customer>, StoreError> {
        if self.customer_id.is_blank() {
            return Ok(None);
        }
        store.find_record("id", self.customer_id.as_str()).await
    }
}
