//! Ledger error types.

use document_store::StoreError;
use thiserror::Error;

use crate::command::TransferStep;
use crate::money::Money;

/// Which leg of a transfer an account id belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountSide {
    Source,
    Destination,
}

impl AccountSide {
    /// Returns the side name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountSide::Source => "source",
            AccountSide::Destination => "destination",
        }
    }
}

impl std::fmt::Display for AccountSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why an amount was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountProblem {
    /// The amount is smaller than the minimum handled amount.
    #[error("The amount \"{0}\" is not valid for this command")]
    BelowMinimum(Money),

    /// The source account balance does not cover the amount.
    #[error("There's no enough money in account for this transaction")]
    InsufficientFunds,
}

/// A command input was rejected before any mutation took place.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The operation name is not one of the supported commands.
    #[error("The command {0} is not valid")]
    InvalidCommand(String),

    /// An account id is missing or blank.
    #[error("The {0} account ID is not valid")]
    InvalidAccountNumber(AccountSide),

    /// Source and destination are the same account.
    #[error("You can't perform this command between the same accounts")]
    SameAccount,

    /// The amount is below the minimum or exceeds the available balance.
    #[error("{0}")]
    InvalidAmount(AmountProblem),

    /// Customer data is incomplete or malformed.
    #[error("{0}")]
    InvalidData(String),
}

/// Errors that can occur while running ledger commands.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The command input failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// An error occurred in the document store.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// A stored document could not be decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A transfer step hook refused to let the transfer continue.
    #[error("Transfer step '{step}' aborted: {reason}")]
    StepAborted { step: TransferStep, reason: String },

    /// The command returned without producing its result.
    #[error("Command '{0}' finished without a result")]
    MissingResult(&'static str),
}

impl LedgerError {
    /// Returns the validation error, if this is one.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            LedgerError::Validation(e) => Some(e),
            _ => None,
        }
    }
}

/// Convenience type alias for ledger results.
pub type Result<T> = std::result::Result<T, LedgerError>;
