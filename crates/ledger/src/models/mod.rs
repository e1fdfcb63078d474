//! Stored entities.

pub mod account;
pub mod customer;

pub use account::Account;
pub use customer::{Customer, NewCustomer};

use common::RecordId;
use document_store::{DataStore, Record, StorageBackend, StoreError};

/// Generates a record id not yet used in `R`'s dataset.
pub(crate) async fn generate_unique_id<R, B>(store: &DataStore<B>) -> Result<RecordId, StoreError>
where
    R: Record,
    B: StorageBackend,
{
    loop {
        let id = RecordId::generate();
        if store.find(R::DATASET, "id", id.as_str()).await?.is_none() {
            return Ok(id);
        }
        tracing::debug!(dataset = R::DATASET, %id, "record id collision, regenerating");
    }
}
