//! Command engine for a small bank ledger.
//!
//! This crate provides:
//! - Customer and Account records stored in a [`document_store::DataStore`]
//! - Exact decimal [`Money`]
//! - The [`Command`] lifecycle with validation and compensating rollback
//! - Transfer, CheckBalance and CreateCustomer commands
//! - The [`Ledger`] dispatcher tying them together

pub mod command;
pub mod dispatcher;
pub mod error;
pub mod models;
pub mod money;
pub mod operation;
pub mod validator;

pub use command::{
    CheckBalance, Command, CommandName, CommandState, CreateCustomer, ExecutionStatus, Lifecycle,
    StepHook, Transfer, TransferStep,
};
pub use dispatcher::Ledger;
pub use error::{AccountSide, AmountProblem, LedgerError, Result, ValidationError};
pub use models::{Account, Customer, NewCustomer};
pub use money::{MINIMUM_AMOUNT, MINOR_UNITS_PER_MAJOR, Money, ONE_CENT};
pub use operation::{CheckBalanceInput, ExecutedCommand, Operation, TransferInput};
