//! Requests accepted by [`Ledger::dispatch`](crate::Ledger::dispatch) and
//! the commands they produce.

use std::time::Duration;

use chrono::{DateTime, Utc};
use common::TransactionId;
use serde::{Deserialize, Serialize};

use crate::command::{CheckBalance, Command, CommandName, Lifecycle, Transfer};
use crate::models::Account;
use crate::money::Money;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferInput {
    pub origin: String,
    pub destination: String,
    pub amount: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckBalanceInput {
    pub origin: String,
}

/// A named operation with its inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Operation {
    Transfer(TransferInput),
    CheckBalance(CheckBalanceInput),
}

impl Operation {
    pub fn name(&self) -> CommandName {
        match self {
            Operation::Transfer(_) => CommandName::Transfer,
            Operation::CheckBalance(_) => CommandName::CheckBalance,
        }
    }
}

/// A command after [`Ledger::dispatch`](crate::Ledger::dispatch) ran it.
#[derive(Debug)]
pub enum ExecutedCommand {
    Transfer(Transfer),
    CheckBalance(CheckBalance),
}

impl ExecutedCommand {
    pub fn lifecycle(&self) -> &Lifecycle {
        match self {
            ExecutedCommand::Transfer(c) => c.lifecycle(),
            ExecutedCommand::CheckBalance(c) => c.lifecycle(),
        }
    }

    pub fn command_name(&self) -> &'static str {
        match self {
            ExecutedCommand::Transfer(c) => c.command_name(),
            ExecutedCommand::CheckBalance(c) => c.command_name(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.lifecycle().is_success()
    }

    pub fn is_error(&self) -> bool {
        self.lifecycle().is_error()
    }

    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.lifecycle().finished_at()
    }

    pub fn execution_time(&self) -> Option<Duration> {
        self.lifecycle().execution_time()
    }

    /// The transferred amount, or the balance read.
    pub fn amount(&self) -> Option<Money> {
        match self {
            ExecutedCommand::Transfer(c) => Some(c.amount()),
            ExecutedCommand::CheckBalance(c) => c.amount(),
        }
    }

    pub fn origin_account(&self) -> Option<&Account> {
        match self {
            ExecutedCommand::Transfer(c) => c.origin_account(),
            ExecutedCommand::CheckBalance(c) => c.origin_account(),
        }
    }

    pub fn destination_account(&self) -> Option<&Account> {
        match self {
            ExecutedCommand::Transfer(c) => c.destination_account(),
            ExecutedCommand::CheckBalance(_) => None,
        }
    }

    pub fn transaction_identifier(&self) -> Option<TransactionId> {
        match self {
            ExecutedCommand::Transfer(c) => Some(c.transaction_identifier()),
            ExecutedCommand::CheckBalance(_) => None,
        }
    }

    pub fn as_transfer(&self) -> Option<&Transfer> {
        match self {
            ExecutedCommand::Transfer(c) => Some(c),
            ExecutedCommand::CheckBalance(_) => None,
        }
    }

    pub fn as_check_balance(&self) -> Option<&CheckBalance> {
        match self {
            ExecutedCommand::CheckBalance(c) => Some(c),
            ExecutedCommand::Transfer(_) => None,
        }
    }
}
