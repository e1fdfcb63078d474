//! Moves money between two accounts with compensating rollback.

use std::sync::OnceLock;

use async_trait::async_trait;
use common::TransactionId;
use document_store::{DataStore, StorageBackend};

use crate::command::{Command, ExecutionStatus, Lifecycle};
use crate::error::{AccountSide, AmountProblem, LedgerError, ValidationError};
use crate::models::Account;
use crate::money::Money;
use crate::validator;

/// A completed leg of a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferStep {
    Debit,
    Credit,
}

impl TransferStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransferStep::Debit => "debit",
            TransferStep::Credit => "credit",
        }
    }
}

impl std::fmt::Display for TransferStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Callback run after each completed leg. An `Err` aborts the transfer and
/// triggers its rollback.
pub type StepHook = Box<dyn Fn(TransferStep) -> Result<(), String> + Send + Sync>;

/// Debits the origin account and credits the destination account.
///
/// Each leg is persisted on its own. If anything fails after the debit, the
/// legs already applied are reversed, each at most once.
pub struct Transfer {
    lifecycle: Lifecycle,
    origin_account: Option<Account>,
    destination_account: Option<Account>,
    amount: Money,
    transaction_identifier: OnceLock<TransactionId>,
    debit_created: bool,
    credit_created: bool,
    debit_rolled_back: bool,
    credit_rolled_back: bool,
    step_hook: Option<StepHook>,
}

impl Transfer {
    pub fn new(
        origin_account: Option<Account>,
        destination_account: Option<Account>,
        amount: Money,
    ) -> Self {
        Self {
            lifecycle: Lifecycle::new(),
            origin_account,
            destination_account,
            amount,
            transaction_identifier: OnceLock::new(),
            debit_created: false,
            credit_created: false,
            debit_rolled_back: false,
            credit_rolled_back: false,
            step_hook: None,
        }
    }

    /// Installs a callback invoked after the debit and after the credit.
    pub fn with_step_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(TransferStep) -> Result<(), String> + Send + Sync + 'static,
    {
        self.step_hook = Some(Box::new(hook));
        self
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn origin_account(&self) -> Option<&Account> {
        self.origin_account.as_ref()
    }

    pub fn destination_account(&self) -> Option<&Account> {
        self.destination_account.as_ref()
    }

    /// Identifier of this transfer. Generated on first access, stable for
    /// the lifetime of the instance and never persisted.
    pub fn transaction_identifier(&self) -> TransactionId {
        *self.transaction_identifier.get_or_init(TransactionId::new)
    }

    /// True once the transfer has failed with its debit applied and not yet
    /// reversed.
    pub fn should_rollback_debit(&self) -> bool {
        self.lifecycle.is_error() && self.debit_created && !self.debit_rolled_back
    }

    pub fn should_rollback_credit(&self) -> bool {
        self.lifecycle.is_error() && self.credit_created && !self.credit_rolled_back
    }

    pub fn debit_rolled_back(&self) -> bool {
        self.debit_rolled_back
    }

    pub fn credit_rolled_back(&self) -> bool {
        self.credit_rolled_back
    }

    fn origin_id(&self) -> Option<&str> {
        self.origin_account.as_ref().map(|a| a.id().as_str())
    }

    fn destination_id(&self) -> Option<&str> {
        self.destination_account.as_ref().map(|a| a.id().as_str())
    }

    fn after_step(&self, step: TransferStep) -> Result<(), LedgerError> {
        tracing::debug!(%step, transaction = %self.transaction_identifier(), "transfer step applied");
        match &self.step_hook {
            Some(hook) => hook(step).map_err(|reason| LedgerError::StepAborted { step, reason }),
            None => Ok(()),
        }
    }

    async fn apply<B: StorageBackend>(&mut self, store: &DataStore<B>) -> Result<(), LedgerError> {
        let amount = self.amount;

        let origin = self
            .origin_account
            .as_mut()
            .ok_or(ValidationError::InvalidAccountNumber(AccountSide::Source))?;
        origin
            .update(store, |account| account.set_amount(account.amount() - amount))
            .await?;
        self.debit_created = true;
        self.after_step(TransferStep::Debit)?;

        let destination = self
            .destination_account
            .as_mut()
            .ok_or(ValidationError::InvalidAccountNumber(AccountSide::Destination))?;
        destination
            .update(store, |account| account.set_amount(account.amount() + amount))
            .await?;
        self.credit_created = true;
        self.after_step(TransferStep::Credit)?;

        Ok(())
    }
}

impl std::fmt::Debug for Transfer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transfer")
            .field("lifecycle", &self.lifecycle)
            .field("origin_account", &self.origin_account)
            .field("destination_account", &self.destination_account)
            .field("amount", &self.amount)
            .field("transaction_identifier", &self.transaction_identifier.get())
            .field("debit_created", &self.debit_created)
            .field("credit_created", &self.credit_created)
            .field("debit_rolled_back", &self.debit_rolled_back)
            .field("credit_rolled_back", &self.credit_rolled_back)
            .field("step_hook", &self.step_hook.is_some())
            .finish()
    }
}

#[async_trait]
impl Command for Transfer {
    fn command_name(&self) -> &'static str {
        "transfer"
    }

    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.lifecycle
    }

    fn validate(&self) -> Result<(), ValidationError> {
        validator::validate_source_account(self.origin_id())?;
        validator::validate_accounts_id(self.origin_id(), self.destination_id())?;
        validator::validate_destination_account(self.destination_id())?;
        validator::validate_minimum_amount(self.amount)?;

        let balance = self
            .origin_account
            .as_ref()
            .map(Account::amount)
            .unwrap_or_default();
        if self.amount > balance {
            return Err(ValidationError::InvalidAmount(
                AmountProblem::InsufficientFunds,
            ));
        }
        Ok(())
    }

    async fn run<B: StorageBackend>(
        &mut self,
        store: &DataStore<B>,
    ) -> Result<ExecutionStatus, LedgerError> {
        match self.apply(store).await {
            Ok(()) => Ok(ExecutionStatus::Succeeded),
            Err(error) => Ok(self.compensate(store, error).await),
        }
    }

    async fn rollback<B: StorageBackend>(&mut self, store: &DataStore<B>) -> bool {
        let amount = self.amount;
        let transaction = self.transaction_identifier();
        let mut compensated = true;

        if self.should_rollback_debit() {
            if let Some(origin) = self.origin_account.as_mut() {
                match origin
                    .update(store, |account| account.set_amount(account.amount() + amount))
                    .await
                {
                    Ok(_) => self.debit_rolled_back = true,
                    Err(error) => {
                        tracing::error!(%transaction, %error, "failed to reverse debit");
                        compensated = false;
                    }
                }
            }
        }

        if self.should_rollback_credit() {
            if let Some(destination) = self.destination_account.as_mut() {
                match destination
                    .update(store, |account| account.set_amount(account.amount() - amount))
                    .await
                {
                    Ok(_) => self.credit_rolled_back = true,
                    Err(error) => {
                        tracing::error!(%transaction, %error, "failed to reverse credit");
                        compensated = false;
                    }
                }
            }
        }

        compensated
    }
}
