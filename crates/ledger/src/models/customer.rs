use common::RecordId;
use document_store::{CUSTOMERS_DATASET, DataStore, Record, StorageBackend, StoreError};
use serde::{Deserialize, Serialize};

use crate::models::Account;

/// Input for opening a customer and their account.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewCustomer {
    pub name: String,
    pub email: String,
}

impl NewCustomer {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

/// An account holder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    id: RecordId,
    name: String,
    email: String,
}

impl Record for Customer {
    const DATASET: &'static str = CUSTOMERS_DATASET;

    fn id(&self) -> &RecordId {
        &self.id
    }
}

impl Customer {
    /// Creates a customer. Nothing is persisted.
    pub fn new(id: RecordId, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
        }
    }

    /// Finds a customer by email, ignoring case.
    pub async fn find_by_email<B: StorageBackend>(
        store: &DataStore<B>,
        email: &str,
    ) -> Result<Option<Customer>, StoreError> {
        let document = store
            .find_by(
                Self::DATASET,
                "email",
                &email.to_lowercase(),
                str::to_lowercase,
            )
            .await?;

        match document {
            Some(document) => Ok(Some(serde_json::from_value(document)?)),
            None => Ok(None),
        }
    }

    pub fn id(&self) -> &RecordId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the customer's account.
    pub async fn account<B: StorageBackend>(
        &self,
        store: &DataStore<B>,
    ) -> Result<Option<Account>, StoreError> {
        if self.id.is_blank() {
            return Ok(None);
        }
        store.find_record("customer_id", self.id.as_str()).await
    }
}
