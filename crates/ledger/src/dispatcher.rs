//! Entry points that resolve inputs against the store and run commands.

use document_store::{DataStore, StorageBackend};

use crate::command::{CheckBalance, Command, CreateCustomer, Transfer};
use crate::error::{LedgerError, Result};
use crate::models::{Account, Customer, NewCustomer};
use crate::money::Money;
use crate::operation::{CheckBalanceInput, ExecutedCommand, Operation, TransferInput};

/// The ledger: a loaded data store plus the operations run against it.
///
/// The store must be loaded before any operation is invoked.
pub struct Ledger<B: StorageBackend> {
    store: DataStore<B>,
}

impl<B: StorageBackend> Ledger<B> {
    pub fn new(store: DataStore<B>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &DataStore<B> {
        &self.store
    }

    /// Opens a customer and an empty account.
    ///
    /// Returns the existing customer unchanged if one already uses the same
    /// email, compared without case.
    #[tracing::instrument(skip(self))]
    pub async fn create_customer(&self, data: NewCustomer) -> Result<Customer> {
        if let Some(existing) = self.find_customer_by_email(&data.email).await? {
            tracing::debug!(customer = %existing.id(), "customer already exists");
            return Ok(existing);
        }

        let mut command = CreateCustomer::new(data);
        command.execute(&self.store).await?;
        command
            .into_customer()
            .ok_or(LedgerError::MissingResult("create_customer"))
    }

    /// Moves `amount` from one account to another.
    ///
    /// Unknown account ids fail validation.
    #[tracing::instrument(skip(self))]
    pub async fn transfer(
        &self,
        origin_id: &str,
        destination_id: &str,
        amount: Money,
    ) -> Result<Transfer> {
        let origin = self.find_account(origin_id).await?;
        let destination = self.find_account(destination_id).await?;

        let mut command = Transfer::new(origin, destination, amount);
        command.execute(&self.store).await?;
        Ok(command)
    }

    /// Reads an account balance.
    #[tracing::instrument(skip(self))]
    pub async fn check_balance(&self, origin_id: &str) -> Result<CheckBalance> {
        let origin = self.find_account(origin_id).await?;

        let mut command = CheckBalance::new(origin);
        command.execute(&self.store).await?;
        Ok(command)
    }

    /// Runs a named operation.
    #[tracing::instrument(skip(self), fields(command = %operation.name()))]
    pub async fn dispatch(&self, operation: Operation) -> Result<ExecutedCommand> {
        match operation {
            Operation::Transfer(TransferInput {
                origin,
                destination,
                amount,
            }) => self
                .transfer(&origin, &destination, amount)
                .await
                .map(ExecutedCommand::Transfer),
            Operation::CheckBalance(CheckBalanceInput { origin }) => self
                .check_balance(&origin)
                .await
                .map(ExecutedCommand::CheckBalance),
        }
    }

    pub async fn find_account(&self, id: &str) -> Result<Option<Account>> {
        Ok(Account::find(&self.store, id).await?)
    }

    pub async fn find_customer_by_email(&self, email: &str) -> Result<Option<Customer>> {
        Ok(Customer::find_by_email(&self.store, email).await?)
    }
}

impl<B: StorageBackend> Clone for Ledger<B> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}
