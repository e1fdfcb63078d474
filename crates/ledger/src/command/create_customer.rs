use std::sync::OnceLock;

use async_trait::async_trait;
use document_store::{DataStore, StorageBackend};
use regex::Regex;

use crate::command::{Command, ExecutionStatus, Lifecycle};
use crate::error::{LedgerError, ValidationError};
use crate::models::{self, Account, Customer, NewCustomer};

/// Opens a customer together with an empty account.
#[derive(Debug)]
pub struct CreateCustomer {
    lifecycle: Lifecycle,
    customer_data: NewCustomer,
    customer: Option<Customer>,
    account: Option<Account>,
}

impl CreateCustomer {
    pub fn new(customer_data: NewCustomer) -> Self {
        Self {
            lifecycle: Lifecycle::new(),
            customer_data,
            customer: None,
            account: None,
        }
    }

    pub fn customer_data(&self) -> &NewCustomer {
        &self.customer_data
    }

    /// The stored customer, once executed.
    pub fn customer(&self) -> Option<&Customer> {
        self.customer.as_ref()
    }

    /// The customer's new account, once executed.
    pub fn account(&self) -> Option<&Account> {
        self.account.as_ref()
    }

    pub fn into_customer(self) -> Option<Customer> {
        self.customer
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"(.+)@(.+)\.(.+)")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Loose shape check: something, `@`, something, `.`, something.
pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}

#[async_trait]
impl Command for CreateCustomer {
    fn command_name(&self) -> &'static str {
        "create_customer"
    }

    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.lifecycle
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.customer_data.name.is_empty() {
            return Err(ValidationError::InvalidData("Invalid name".to_string()));
        }
        if self.customer_data.email.is_empty() || !is_valid_email(&self.customer_data.email) {
            return Err(ValidationError::InvalidData("Invalid email".to_string()));
        }
        Ok(())
    }

    async fn run<B: StorageBackend>(
        &mut self,
        store: &DataStore<B>,
    ) -> Result<ExecutionStatus, LedgerError> {
        let customer_id = models::generate_unique_id::<Customer, B>(store).await?;
        let customer = Customer::new(
            customer_id,
            self.customer_data.name.clone(),
            self.customer_data.email.clone(),
        );
        let account_id = models::generate_unique_id::<Account, B>(store).await?;
        let account = Account::new(account_id, customer.id().clone());

        // Two separate commits: a crash in between leaves a customer
        // without an account.
        store.append_record(&customer).await?;
        store.append_record(&account).await?;

        tracing::info!(customer = %customer.id(), account = %account.id(), "customer created");
        self.customer = Some(customer);
        self.account = Some(account);
        Ok(ExecutionStatus::Succeeded)
    }

    async fn rollback<B: StorageBackend>(&mut self, _store: &DataStore<B>) -> bool {
        true
    }
}
