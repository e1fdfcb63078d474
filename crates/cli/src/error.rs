//! CLI error types.

use document_store::StoreError;
use ledger::LedgerError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    /// The ledger rejected or failed the operation.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Invalid runtime configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The user did not confirm the transaction.
    #[error("This transaction was aborted")]
    Aborted,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<StoreError> for CliError {
    fn from(err: StoreError) -> Self {
        CliError::Ledger(LedgerError::Store(err))
    }
}

pub type Result<T> = std::result::Result<T, CliError>;
