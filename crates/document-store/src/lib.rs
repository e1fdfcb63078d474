//! Transactional document store.
//!
//! A store holds named datasets, each an ordered list of JSON documents.
//! All reads and writes go through [`DataStore::transaction`], which hands
//! the closure a working copy of every dataset; nothing is persisted unless
//! the closure calls [`Transaction::commit`].

pub mod config;
pub mod error;
pub mod file;
pub mod memory;
pub mod record;
pub mod store;

pub use common::RecordId;
pub use config::StoreConfig;
pub use error::{Result, StoreError};
pub use file::JsonFileBackend;
pub use memory::InMemoryBackend;
pub use record::{Record, UpdateOutcome};
pub use store::{DataStore, Datasets, Document, StorageBackend, Transaction};

/// Dataset holding customer documents.
pub const CUSTOMERS_DATASET: &str = "customers";

/// Dataset holding account documents.
pub const ACCOUNTS_DATASET: &str = "accounts";
