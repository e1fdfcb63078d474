//! Stateless checks over command names, account ids and amounts.
//!
//! Every `is_valid_*` predicate is total. The matching `validate_*`
//! function turns a false predicate into a [`ValidationError`].

use crate::command::CommandName;
use crate::error::{AccountSide, AmountProblem, ValidationError};
use crate::money::{MINIMUM_AMOUNT, Money};

/// Returns true if `name` is one of the supported operations.
pub fn is_valid_command(name: &str) -> bool {
    name.parse::<CommandName>().is_ok()
}

/// Returns true if the account id is present and not blank.
pub fn is_valid_account_id(account_id: Option<&str>) -> bool {
    account_id.is_some_and(|id| !id.trim().is_empty())
}

/// Returns true if the amount is at least [`MINIMUM_AMOUNT`].
///
/// Negative amounts fail this check only because they are smaller than the
/// minimum; there is no separate sign check.
pub fn is_valid_minimum_amount(amount: Money) -> bool {
    amount >= MINIMUM_AMOUNT
}

pub fn validate_command(name: &str) -> Result<CommandName, ValidationError> {
    name.parse()
}

pub fn validate_source_account(account_id: Option<&str>) -> Result<(), ValidationError> {
    validate_account(account_id, AccountSide::Source)
}

pub fn validate_destination_account(account_id: Option<&str>) -> Result<(), ValidationError> {
    validate_account(account_id, AccountSide::Destination)
}

fn validate_account(account_id: Option<&str>, side: AccountSide) -> Result<(), ValidationError> {
    if !is_valid_account_id(account_id) {
        return Err(ValidationError::InvalidAccountNumber(side));
    }
    Ok(())
}

/// Rejects a command whose source and destination ids are equal.
///
/// Missing ids compare as empty strings, so two missing ids are "the same
/// account".
pub fn validate_accounts_id(
    source: Option<&str>,
    destination: Option<&str>,
) -> Result<(), ValidationError> {
    if source.unwrap_or_default() == destination.unwrap_or_default() {
        return Err(ValidationError::SameAccount);
    }
    Ok(())
}

pub fn validate_minimum_amount(amount: Money) -> Result<(), ValidationError> {
    if !is_valid_minimum_amount(amount) {
        return Err(ValidationError::InvalidAmount(AmountProblem::BelowMinimum(
            amount,
        )));
    }
    Ok(())
}
