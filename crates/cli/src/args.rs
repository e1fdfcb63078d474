//! Command-line arguments.

use clap::Parser;
use ledger::{CheckBalanceInput, CommandName, Money, Operation, TransferInput};

use crate::error::Result;

#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "bank")]
#[command(about = "Transfers money between accounts and checks balances")]
pub struct Cli {
    /// Name of the command to run: `transfer` or `check_balance`.
    #[arg(short = 'c', long = "command")]
    pub command: String,

    /// The source account ID.
    #[arg(short = 'o', long = "origin")]
    pub origin: Option<String>,

    /// The destination account ID.
    #[arg(short = 'd', long = "dest")]
    pub dest: Option<String>,

    /// The amount of money to move, in cents.
    #[arg(short = 'a', long = "amount")]
    pub amount: Option<Money>,

    /// Skip the confirmation prompt.
    #[arg(short = 'y', long = "yes", default_value_t = false)]
    pub yes: bool,
}

impl Cli {
    /// Builds the operation to dispatch, rejecting unknown command names.
    ///
    /// Missing ids and amounts are passed through empty so the ledger's own
    /// validation reports them.
    pub fn operation(&self) -> Result<Operation> {
        let name: CommandName = ledger::validator::validate_command(&self.command)
            .map_err(ledger::LedgerError::from)?;
        let origin = self.origin.clone().unwrap_or_default();

        Ok(match name {
            CommandName::Transfer => Operation::Transfer(TransferInput {
                origin,
                destination: self.dest.clone().unwrap_or_default(),
                amount: self.amount.unwrap_or_default(),
            }),
            CommandName::CheckBalance => Operation::CheckBalance(CheckBalanceInput { origin }),
        })
    }
}
