//! Command-line front end for the bank ledger.

pub mod args;
pub mod config;
pub mod error;
pub mod output;

use std::io::{BufRead, Write};

use chrono::{Local, TimeZone, Utc};
use document_store::{DataStore, JsonFileBackend, StorageBackend};
use ledger::{Account, ExecutedCommand, Ledger, Operation};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

pub use args::Cli;
pub use config::Config;
pub use error::{CliError, Result};

use output::Owners;

/// Installs the global tracing subscriber. Logs go to stderr so they never
/// mix with receipts.
pub fn init_tracing(config: &Config) -> Result<()> {
    let filter = EnvFilter::try_new(config.filter_directive())
        .map_err(|e| CliError::Config(format!("invalid log filter: {e}")))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .map_err(|e| CliError::Config(e.to_string()))
}

/// Opens the JSON file store selected by `config`.
pub async fn open_ledger(config: &Config) -> Result<Ledger<JsonFileBackend>> {
    let backend = JsonFileBackend::from_config(&config.store_config());
    tracing::debug!(path = %backend.path().display(), "opening data store");

    let store = DataStore::new(backend);
    store.load().await?;
    Ok(Ledger::new(store))
}

/// Runs one invocation: validates the command name, asks for confirmation
/// when needed, dispatches the operation and prints its receipt.
///
/// Dates are shown in local time.
pub async fn run<R: BufRead, W: Write>(
    cli: &Cli,
    config: &Config,
    input: &mut R,
    out: &mut W,
) -> Result<ExecutedCommand> {
    run_in_timezone(cli, config, input, out, &Local).await
}

/// Same as [`run`], with dates shown in `tz`.
pub async fn run_in_timezone<R, W, Tz>(
    cli: &Cli,
    config: &Config,
    input: &mut R,
    out: &mut W,
    tz: &Tz,
) -> Result<ExecutedCommand>
where
    R: BufRead,
    W: Write,
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let operation = cli.operation()?;
    if config.debug {
        tracing::debug!(?operation, "running command");
    }

    if let Operation::Transfer(transfer) = &operation {
        if !cli.yes {
            let now = Utc::now().with_timezone(tz);
            write!(out, "{}", output::summary(transfer, &now))?;
            output::confirm(input, out)?;
        }
    }

    let ledger = open_ledger(config).await?;
    let command = ledger.dispatch(operation).await?;

    let owners = owners(&ledger, &command).await?;
    writeln!(out, "{}\n", output::headline(&command))?;
    write!(out, "{}", output::receipt(&command, &owners, tz))?;

    Ok(command)
}

async fn owners<B: StorageBackend>(ledger: &Ledger<B>, command: &ExecutedCommand) -> Result<Owners> {
    Ok(Owners {
        origin_email: owner_email(ledger, command.origin_account()).await?,
        destination_email: owner_email(ledger, command.destination_account()).await?,
    })
}

async fn owner_email<B: StorageBackend>(
    ledger: &Ledger<B>,
    account: Option<&Account>,
) -> Result<Option<String>> {
    let Some(account) = account else {
        return Ok(None);
    };
    let customer = account.customer(ledger.store()).await?;
    Ok(customer.map(|c| c.email().to_string()))
}
