//! Integration tests for the ledger.
//!
//! These tests drive the dispatcher end to end against both the in-memory
//! backend and the JSON file backend.

use document_store::{DataStore, InMemoryBackend, JsonFileBackend, StorageBackend};
use ledger::{
    Account, AmountProblem, Command, CommandName, ExecutionStatus, Ledger, LedgerError, Money,
    NewCustomer, Operation, Transfer, TransferInput, TransferStep, ValidationError,
};
use rust_decimal_macros::dec;

async fn memory_ledger() -> Ledger<InMemoryBackend> {
    let store = DataStore::new(InMemoryBackend::new());
    store.load().await.unwrap();
    Ledger::new(store)
}

/// Opens a customer and sets their balance directly.
async fn open_account<B: StorageBackend>(
    ledger: &Ledger<B>,
    name: &str,
    email: &str,
    balance: Money,
) -> Account {
    let customer = ledger
        .create_customer(NewCustomer::new(name, email))
        .await
        .unwrap();
    let mut account = customer.account(ledger.store()).await.unwrap().unwrap();
    account
        .update(ledger.store(), |a| a.set_amount(balance))
        .await
        .unwrap();
    account
}

async fn balance<B: StorageBackend>(ledger: &Ledger<B>, id: &str) -> Money {
    ledger.find_account(id).await.unwrap().unwrap().amount()
}

/// Origin with 1000, destination with 0.
async fn seeded<B: StorageBackend>(ledger: &Ledger<B>) -> (String, String) {
    let origin = open_account(ledger, "Origin", "origin@bank.com", Money::new(dec!(1000))).await;
    let destination = open_account(ledger, "Destination", "dest@bank.com", Money::zero()).await;
    (origin.id().to_string(), destination.id().to_string())
}

fn validation_error(err: LedgerError) -> ValidationError {
    err.as_validation().cloned().expect("expected a validation error")
}

mod transfers {
    use super::*;

    #[tokio::test]
    async fn test_exact_decimal_transfer() {
        let ledger = memory_ledger().await;
        let (origin, destination) = seeded(&ledger).await;

        let transfer = ledger
            .transfer(&origin, &destination, Money::new(dec!(99.92)))
            .await
            .unwrap();

        assert!(transfer.is_success());
        assert!(!transfer.is_error());
        assert!(transfer.lifecycle().finished_at().is_some());
        assert_eq!(balance(&ledger, &origin).await, Money::new(dec!(900.08)));
        assert_eq!(balance(&ledger, &destination).await, Money::new(dec!(99.92)));
    }

    #[tokio::test]
    async fn test_repeated_execute_has_no_effect() {
        let ledger = memory_ledger().await;
        let (origin, destination) = seeded(&ledger).await;

        let mut transfer = ledger
            .transfer(&origin, &destination, Money::new(dec!(99.92)))
            .await
            .unwrap();
        let finished_at = transfer.lifecycle().finished_at();

        for _ in 0..9 {
            let status = transfer.execute(ledger.store()).await.unwrap();
            assert_eq!(status, ExecutionStatus::Succeeded);
        }

        assert_eq!(transfer.lifecycle().finished_at(), finished_at);
        assert_eq!(balance(&ledger, &origin).await, Money::new(dec!(900.08)));
        assert_eq!(balance(&ledger, &destination).await, Money::new(dec!(99.92)));
    }

    #[tokio::test]
    async fn test_whole_balance_can_be_moved() {
        let ledger = memory_ledger().await;
        let (origin, destination) = seeded(&ledger).await;

        let transfer = ledger
            .transfer(&origin, &destination, Money::new(dec!(1000)))
            .await
            .unwrap();

        assert!(transfer.is_success());
        assert!(balance(&ledger, &origin).await.is_zero());
        assert_eq!(balance(&ledger, &destination).await, Money::new(dec!(1000)));
    }

    #[tokio::test]
    async fn test_minimum_amount_is_accepted() {
        let ledger = memory_ledger().await;
        let (origin, destination) = seeded(&ledger).await;

        let transfer = ledger
            .transfer(&origin, &destination, Money::new(dec!(0.1)))
            .await
            .unwrap();

        assert!(transfer.is_success());
        assert_eq!(balance(&ledger, &origin).await, Money::new(dec!(999.9)));
    }

    #[tokio::test]
    async fn test_transaction_identifier_is_stable() {
        let ledger = memory_ledger().await;
        let (origin, destination) = seeded(&ledger).await;

        let transfer = ledger
            .transfer(&origin, &destination, Money::new(dec!(1)))
            .await
            .unwrap();

        let id = transfer.transaction_identifier();
        assert_eq!(id, transfer.transaction_identifier());
        assert_eq!(id.to_string().len(), 32);
    }
}

mod validation {
    use super::*;

    #[tokio::test]
    async fn test_rejected_transfers_leave_balances_unchanged() {
        let ledger = memory_ledger().await;
        let (origin, destination) = seeded(&ledger).await;

        let cases = [
            (origin.as_str(), destination.as_str(), dec!(0)),
            (origin.as_str(), destination.as_str(), dec!(-10)),
            (origin.as_str(), destination.as_str(), dec!(1000.01)),
            (origin.as_str(), origin.as_str(), dec!(10)),
            ("zzzz", destination.as_str(), dec!(10)),
            (origin.as_str(), "zzzz", dec!(10)),
        ];

        for (from, to, amount) in cases {
            let result = ledger.transfer(from, to, Money::new(amount)).await;
            assert!(result.is_err(), "{from} -> {to} {amount} should fail");
        }

        assert_eq!(balance(&ledger, &origin).await, Money::new(dec!(1000)));
        assert!(balance(&ledger, &destination).await.is_zero());
    }

    #[tokio::test]
    async fn test_amount_errors() {
        let ledger = memory_ledger().await;
        let (origin, destination) = seeded(&ledger).await;

        let err = ledger
            .transfer(&origin, &destination, Money::new(dec!(-10)))
            .await
            .unwrap_err();
        assert_eq!(
            validation_error(err),
            ValidationError::InvalidAmount(AmountProblem::BelowMinimum(Money::new(dec!(-10))))
        );

        let err = ledger
            .transfer(&origin, &destination, Money::new(dec!(1000.01)))
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "There's no enough money in account for this transaction"
        );
    }

    #[tokio::test]
    async fn test_account_errors() {
        let ledger = memory_ledger().await;
        let (origin, destination) = seeded(&ledger).await;

        let err = ledger
            .transfer(&origin, &origin, Money::new(dec!(10)))
            .await
            .unwrap_err();
        assert_eq!(validation_error(err), ValidationError::SameAccount);

        let err = ledger
            .transfer("zzzz", &destination, Money::new(dec!(10)))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "The source account ID is not valid");

        let err = ledger
            .transfer(&origin, "zzzz", Money::new(dec!(10)))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "The destination account ID is not valid");
    }

    #[test]
    fn test_unknown_command_name() {
        let err = "withdraw".parse::<CommandName>().unwrap_err();
        assert_eq!(err.to_string(), "The command withdraw is not valid");
    }
}

mod rollback {
    use super::*;

    async fn load_pair(
        ledger: &Ledger<InMemoryBackend>,
        origin: &str,
        destination: &str,
    ) -> (Option<Account>, Option<Account>) {
        (
            ledger.find_account(origin).await.unwrap(),
            ledger.find_account(destination).await.unwrap(),
        )
    }

    #[tokio::test]
    async fn test_failure_after_credit_restores_both_accounts() {
        let ledger = memory_ledger().await;
        let (origin, destination) = seeded(&ledger).await;
        let (from, to) = load_pair(&ledger, &origin, &destination).await;

        let mut transfer = Transfer::new(from, to, Money::new(dec!(500))).with_step_hook(|step| {
            match step {
                TransferStep::Credit => Err("connection reset".to_string()),
                TransferStep::Debit => Ok(()),
            }
        });
        let status = transfer.execute(ledger.store()).await.unwrap();

        assert_eq!(status, ExecutionStatus::RolledBack { compensated: true });
        assert!(transfer.is_error());
        assert!(!transfer.is_success());
        assert!(transfer.is_executed());
        assert!(transfer.debit_rolled_back());
        assert!(transfer.credit_rolled_back());
        assert_eq!(balance(&ledger, &origin).await, Money::new(dec!(1000)));
        assert!(balance(&ledger, &destination).await.is_zero());
    }

    #[tokio::test]
    async fn test_failure_after_debit_reverses_debit_only() {
        let ledger = memory_ledger().await;
        let (origin, destination) = seeded(&ledger).await;
        let (from, to) = load_pair(&ledger, &origin, &destination).await;

        let mut transfer = Transfer::new(from, to, Money::new(dec!(500))).with_step_hook(|step| {
            match step {
                TransferStep::Debit => Err("connection reset".to_string()),
                TransferStep::Credit => Ok(()),
            }
        });
        transfer.execute(ledger.store()).await.unwrap();

        assert!(transfer.is_error());
        assert!(transfer.debit_rolled_back());
        assert!(!transfer.credit_rolled_back());
        assert!(!transfer.should_rollback_credit());
        assert_eq!(balance(&ledger, &origin).await, Money::new(dec!(1000)));
        assert!(balance(&ledger, &destination).await.is_zero());
    }

    #[tokio::test]
    async fn test_failed_credit_write_restores_origin() {
        let ledger = memory_ledger().await;
        let (origin, destination) = seeded(&ledger).await;
        let (from, to) = load_pair(&ledger, &origin, &destination).await;

        // The debit commits; the credit's own write is rejected.
        ledger.store().backend().fail_write_after(1);
        let mut transfer = Transfer::new(from, to, Money::new(dec!(500)));
        let status = transfer.execute(ledger.store()).await.unwrap();

        assert_eq!(status, ExecutionStatus::RolledBack { compensated: true });
        assert!(transfer.is_error());
        assert!(transfer.debit_rolled_back());
        assert!(!transfer.credit_rolled_back());
        assert!(matches!(
            transfer.lifecycle().rollback_error(),
            Some(LedgerError::Store(_))
        ));
        assert_eq!(balance(&ledger, &origin).await, Money::new(dec!(1000)));
        assert!(balance(&ledger, &destination).await.is_zero());
    }

    #[tokio::test]
    async fn test_rollback_after_success_changes_nothing() {
        let ledger = memory_ledger().await;
        let (origin, destination) = seeded(&ledger).await;
        let (from, to) = load_pair(&ledger, &origin, &destination).await;

        let mut transfer = Transfer::new(from, to, Money::new(dec!(100)));
        transfer.execute(ledger.store()).await.unwrap();
        assert!(transfer.rollback(ledger.store()).await);

        assert!(transfer.is_success());
        assert!(!transfer.should_rollback_debit());
        assert!(!transfer.should_rollback_credit());
        assert_eq!(balance(&ledger, &origin).await, Money::new(dec!(900)));
        assert_eq!(balance(&ledger, &destination).await, Money::new(dec!(100)));
    }

    #[tokio::test]
    async fn test_rolled_back_transfer_is_not_executed_again() {
        let ledger = memory_ledger().await;
        let (origin, destination) = seeded(&ledger).await;
        let (from, to) = load_pair(&ledger, &origin, &destination).await;

        let mut transfer = Transfer::new(from, to, Money::new(dec!(500)))
            .with_step_hook(|_| Err("always".to_string()));
        transfer.execute(ledger.store()).await.unwrap();
        let status = transfer.execute(ledger.store()).await.unwrap();

        assert_eq!(status, ExecutionStatus::RolledBack { compensated: true });
        assert_eq!(balance(&ledger, &origin).await, Money::new(dec!(1000)));
    }
}

mod customers {
    use super::*;

    #[tokio::test]
    async fn test_create_customer_is_idempotent_by_email() {
        let ledger = memory_ledger().await;

        let first = ledger
            .create_customer(NewCustomer::new("Origin", "origin@bank.com"))
            .await
            .unwrap();
        let second = ledger
            .create_customer(NewCustomer::new("Other Name", "ORIGIN@Bank.com"))
            .await
            .unwrap();

        assert_eq!(first, second);
        let accounts = ledger.store().documents("accounts").await.unwrap();
        assert_eq!(accounts.len(), 1);
    }

    #[tokio::test]
    async fn test_new_customer_gets_empty_account() {
        let ledger = memory_ledger().await;

        let customer = ledger
            .create_customer(NewCustomer::new("Origin", "origin@bank.com"))
            .await
            .unwrap();

        assert_eq!(customer.id().as_str().len(), 4);
        let account = customer.account(ledger.store()).await.unwrap().unwrap();
        assert_eq!(account.id().as_str().len(), 4);
        assert!(account.amount().is_zero());
        assert_eq!(
            account.customer(ledger.store()).await.unwrap(),
            Some(customer)
        );
    }

    #[tokio::test]
    async fn test_invalid_customer_data() {
        let ledger = memory_ledger().await;

        let err = ledger
            .create_customer(NewCustomer::new("", "origin@bank.com"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid name");

        let err = ledger
            .create_customer(NewCustomer::new("Origin", "origin"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid email");

        assert!(ledger.store().documents("customers").await.unwrap().is_empty());
    }
}

mod dispatch {
    use super::*;
    use ledger::CheckBalanceInput;

    #[tokio::test]
    async fn test_dispatches_check_balance() {
        let ledger = memory_ledger().await;
        let (origin, _) = seeded(&ledger).await;

        let executed = ledger
            .dispatch(Operation::CheckBalance(CheckBalanceInput {
                origin: origin.clone(),
            }))
            .await
            .unwrap();

        assert_eq!(executed.command_name(), "check_balance");
        assert!(executed.is_success());
        assert_eq!(executed.amount(), Some(Money::new(dec!(1000))));
        assert!(executed.destination_account().is_none());
        assert!(executed.transaction_identifier().is_none());
    }

    #[tokio::test]
    async fn test_dispatches_transfer() {
        let ledger = memory_ledger().await;
        let (origin, destination) = seeded(&ledger).await;

        let executed = ledger
            .dispatch(Operation::Transfer(TransferInput {
                origin: origin.clone(),
                destination: destination.clone(),
                amount: Money::new(dec!(250.5)),
            }))
            .await
            .unwrap();

        assert_eq!(executed.command_name(), "transfer");
        assert!(executed.is_success());
        assert!(executed.execution_time().is_some());
        assert_eq!(
            executed.origin_account().unwrap().amount(),
            Money::new(dec!(749.5))
        );
        assert_eq!(
            executed.destination_account().unwrap().amount(),
            Money::new(dec!(250.5))
        );
    }

    #[tokio::test]
    async fn test_check_balance_of_unknown_account_fails() {
        let ledger = memory_ledger().await;

        let err = ledger.check_balance("zzzz").await.unwrap_err();
        assert_eq!(err.to_string(), "The source account ID is not valid");
    }
}

mod file_backed {
    use super::*;

    #[tokio::test]
    async fn test_balances_survive_reload() {
        let dir = tempfile::tempdir().unwrap();
        let store = DataStore::new(JsonFileBackend::new(dir.path().join("db_test.json")));
        store.load().await.unwrap();
        let ledger = Ledger::new(store);
        let (origin, destination) = seeded(&ledger).await;

        ledger
            .transfer(&origin, &destination, Money::new(dec!(99.92)))
            .await
            .unwrap();
        ledger.store().reload().await.unwrap();

        assert_eq!(balance(&ledger, &origin).await, Money::new(dec!(900.08)));
        assert_eq!(balance(&ledger, &destination).await, Money::new(dec!(99.92)));
    }

    #[tokio::test]
    async fn test_second_handle_sees_committed_transfer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db_test.json");
        let store = DataStore::new(JsonFileBackend::new(&path));
        store.load().await.unwrap();
        let ledger = Ledger::new(store);
        let (origin, destination) = seeded(&ledger).await;
        ledger
            .transfer(&origin, &destination, Money::new(dec!(10)))
            .await
            .unwrap();

        let other = DataStore::new(JsonFileBackend::new(&path));
        other.load().await.unwrap();
        let other = Ledger::new(other);

        assert_eq!(balance(&other, &origin).await, Money::new(dec!(990)));
        assert_eq!(balance(&other, &destination).await, Money::new(dec!(10)));
    }
}
