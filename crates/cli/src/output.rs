//! Summaries, confirmation prompt and receipts printed to the user.

use std::io::{BufRead, Write};
use std::time::Duration;

use chrono::{DateTime, TimeZone};
use ledger::{ExecutedCommand, Money, TransferInput};

use crate::error::{CliError, Result};

/// Replies accepted as confirming a transaction, compared lowercased.
pub const CONFIRMATION_REPLIES: [&str; 4] = ["y", "yes", "s", "sim"];

pub const CONFIRMATION_HEADER: &str =
    "Do you want to execute this transaction? If \"yes\" just type: \"yes\", otherwise type \"no\"";

pub const AUTHORIZED_HEADER: &str = "Ok. Transaction authorized";

pub const SUCCESS_LABEL: &str = "Transaction completed successfully";

pub const ERROR_LABEL: &str = "Transaction not completed successfully";

const FOOTER: &str = "Bank 2018";

/// Renders an amount of cents as `R$ <major units>`, rounded to four
/// decimal places.
pub fn format_value(amount: Money) -> String {
    let major = amount.to_major_units();
    if major.scale() == 0 {
        format!("R$ {major}.0")
    } else {
        format!("R$ {major}")
    }
}

pub fn format_time<Tz>(time: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    time.format("%d/%m/%Y %H:%M:%S").to_string()
}

pub fn format_execution_time(elapsed: Duration) -> String {
    format!("{:.2} ms", elapsed.as_secs_f64() * 1000.0)
}

pub fn is_confirmation(reply: &str) -> bool {
    CONFIRMATION_REPLIES.contains(&reply.trim().to_lowercase().as_str())
}

/// Text shown before asking the user to confirm a transfer.
pub fn summary<Tz>(input: &TransferInput, now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    format!(
        "Please, review your transaction.\n\n\
         Operation: Transfer between two accounts.\n\n\
         Date: {}\n\
         Source's account: '{}'\n\
         Destination's account: '{}'\n\
         Amount: {}\n",
        format_time(now),
        input.origin,
        input.destination,
        format_value(input.amount),
    )
}

/// Asks for confirmation on `output` and reads one reply from `input`.
pub fn confirm<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<()> {
    writeln!(output, "\n{CONFIRMATION_HEADER}")?;
    write!(output, "=>> ")?;
    output.flush()?;

    let mut reply = String::new();
    input.read_line(&mut reply)?;

    if !is_confirmation(&reply) {
        return Err(CliError::Aborted);
    }
    writeln!(output, "\n{AUTHORIZED_HEADER}\n")?;
    Ok(())
}

/// Customer emails shown next to the account ids on a receipt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Owners {
    pub origin_email: Option<String>,
    pub destination_email: Option<String>,
}

/// Headline printed above the receipt.
pub fn headline(command: &ExecutedCommand) -> String {
    if command.is_success() {
        "Yeah, your transaction is done!".to_string()
    } else {
        format!(
            "Something went wrong with the operation \"{}\"",
            command.command_name()
        )
    }
}

/// Receipt for a finished command, dated in `tz`.
pub fn receipt<Tz>(command: &ExecutedCommand, owners: &Owners, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let date = command
        .finished_at()
        .map(|at| format_time(&at.with_timezone(tz)))
        .unwrap_or_default();
    let status = if command.is_success() {
        SUCCESS_LABEL
    } else {
        ERROR_LABEL
    };
    let execution_time = command
        .execution_time()
        .map(format_execution_time)
        .unwrap_or_default();
    let origin = account_line(
        command.origin_account().map(|a| a.id().to_string()),
        owners.origin_email.as_deref(),
    );
    let amount = command.amount().map(format_value).unwrap_or_default();

    match command {
        ExecutedCommand::Transfer(_) => {
            let destination = account_line(
                command.destination_account().map(|a| a.id().to_string()),
                owners.destination_email.as_deref(),
            );
            let identifier = command
                .transaction_identifier()
                .map(|id| id.to_string())
                .unwrap_or_default();
            format!(
                "Operation: Money transfer between accounts.\n\
                 Status: {status}\n\n\
                 Date: {date}\n\
                 Source's account: {origin}\n\
                 Destination's account: {destination}\n\
                 Amount: {amount}\n\
                 Transaction Identifier: {identifier}\n\
                 Execution time: {execution_time}\n\n\
                 {FOOTER}\n"
            )
        }
        ExecutedCommand::CheckBalance(_) => format!(
            "Operation: Balance checking.\n\
             Status: {status}\n\n\
             Date: {date}\n\
             Source's account: {origin}\n\
             Amount: {amount}\n\
             Execution time: {execution_time}\n\n\
             {FOOTER}\n"
        ),
    }
}

fn account_line(id: Option<String>, email: Option<&str>) -> String {
    format!(
        "'{}' ({})",
        id.unwrap_or_default(),
        email.unwrap_or("unknown customer")
    )
}
