//! Identifier types shared by the document store and the ledger.

pub mod types;

pub use types::{RecordId, TransactionId};
