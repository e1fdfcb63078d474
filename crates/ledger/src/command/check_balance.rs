use async_trait::async_trait;
use document_store::{DataStore, StorageBackend};

use crate::command::{Command, ExecutionStatus, Lifecycle};
use crate::error::{LedgerError, ValidationError};
use crate::models::Account;
use crate::money::Money;
use crate::validator;

/// Reads the current balance of an account.
#[derive(Debug)]
pub struct CheckBalance {
    lifecycle: Lifecycle,
    origin_account: Option<Account>,
    amount: Option<Money>,
}

impl CheckBalance {
    pub fn new(origin_account: Option<Account>) -> Self {
        Self {
            lifecycle: Lifecycle::new(),
            origin_account,
            amount: None,
        }
    }

    pub fn origin_account(&self) -> Option<&Account> {
        self.origin_account.as_ref()
    }

    /// The balance read by the last successful execution.
    pub fn amount(&self) -> Option<Money> {
        self.amount
    }
}

#[async_trait]
impl Command for CheckBalance {
    fn command_name(&self) -> &'static str {
        "check_balance"
    }

    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.lifecycle
    }

    fn validate(&self) -> Result<(), ValidationError> {
        validator::validate_source_account(self.origin_account.as_ref().map(|a| a.id().as_str()))
    }

    async fn run<B: StorageBackend>(
        &mut self,
        _store: &DataStore<B>,
    ) -> Result<ExecutionStatus, LedgerError> {
        let account = self
            .origin_account
            .as_ref()
            .ok_or(LedgerError::MissingResult("check_balance"))?;
        self.amount = Some(account.amount());
        Ok(ExecutionStatus::Succeeded)
    }

    async fn rollback<B: StorageBackend>(&mut self, _store: &DataStore<B>) -> bool {
        true
    }
}
