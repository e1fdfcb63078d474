//! Command lifecycle shared by every ledger operation.
//!
//! A command is built from its inputs, then [`Command::execute`] drives it
//! through validation and its execution step exactly once:
//!
//! 1. a finished command returns its recorded status without side effects;
//! 2. validation errors propagate and nothing is mutated;
//! 3. errors from the execution step propagate too, unless the command
//!    caught them in its own rollback scope via [`Command::compensate`], in
//!    which case the command finishes with its error flag set.

pub mod check_balance;
pub mod create_customer;
pub mod state;
pub mod transfer;

pub use check_balance::CheckBalance;
pub use create_customer::CreateCustomer;
pub use state::CommandState;
pub use transfer::{StepHook, Transfer, TransferStep};

use std::str::FromStr;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use document_store::{DataStore, StorageBackend};

use crate::error::{LedgerError, ValidationError};

/// The operations a client may request by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandName {
    Transfer,
    CheckBalance,
}

impl CommandName {
    /// Every accepted operation name.
    pub const ALL: [CommandName; 2] = [CommandName::Transfer, CommandName::CheckBalance];

    pub fn as_str(&self) -> &'static str {
        match self {
            CommandName::Transfer => "transfer",
            CommandName::CheckBalance => "check_balance",
        }
    }
}

impl FromStr for CommandName {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CommandName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| ValidationError::InvalidCommand(s.to_string()))
    }
}

impl std::fmt::Display for CommandName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a finished command ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionStatus {
    /// The execution step completed.
    Succeeded,

    /// The execution step failed inside a rollback scope. `compensated`
    /// is false when some compensating write could not be applied.
    RolledBack { compensated: bool },
}

impl ExecutionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionStatus::Succeeded => "succeeded",
            ExecutionStatus::RolledBack { .. } => "rolled_back",
        }
    }
}

/// Timestamps and outcome flags of one command execution.
#[derive(Debug)]
pub struct Lifecycle {
    initialized_at: DateTime<Utc>,
    started_at: Option<DateTime<Utc>>,
    finished_at: Option<DateTime<Utc>>,
    execution_time: Option<Duration>,
    status: Option<ExecutionStatus>,
    error: bool,
    rollback_error: Option<LedgerError>,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self {
            initialized_at: Utc::now(),
            started_at: None,
            finished_at: None,
            execution_time: None,
            status: None,
            error: false,
            rollback_error: None,
        }
    }

    pub fn initialized_at(&self) -> DateTime<Utc> {
        self.initialized_at
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    /// Wall-clock time spent in validation plus execution.
    pub fn execution_time(&self) -> Option<Duration> {
        self.execution_time
    }

    pub fn status(&self) -> Option<ExecutionStatus> {
        self.status
    }

    /// The failure caught by the rollback scope, if any.
    pub fn rollback_error(&self) -> Option<&LedgerError> {
        self.rollback_error.as_ref()
    }

    pub fn state(&self) -> CommandState {
        match (self.status, self.started_at) {
            (Some(ExecutionStatus::Succeeded), _) if !self.error => CommandState::Succeeded,
            (Some(_), _) => CommandState::Failed,
            (None, Some(_)) => CommandState::Started,
            (None, None) => CommandState::Created,
        }
    }

    pub fn is_executed(&self) -> bool {
        self.state().is_terminal()
    }

    pub fn is_error(&self) -> bool {
        self.error
    }

    pub fn is_success(&self) -> bool {
        !self.error && self.status == Some(ExecutionStatus::Succeeded)
    }

    fn mark_started(&mut self) {
        self.started_at = Some(Utc::now());
    }

    fn mark_finished(&mut self, status: ExecutionStatus, elapsed: Duration) {
        self.execution_time = Some(elapsed);
        self.finished_at = Some(Utc::now());
        self.status = Some(status);
    }

    fn record_error(&mut self, error: LedgerError) {
        self.error = true;
        self.rollback_error = Some(error);
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

/// A ledger operation with a validate / execute / rollback lifecycle.
#[async_trait]
pub trait Command: Send + Sync {
    /// Stable identifier of the operation.
    fn command_name(&self) -> &'static str;

    fn lifecycle(&self) -> &Lifecycle;

    fn lifecycle_mut(&mut self) -> &mut Lifecycle;

    /// Checks the inputs. Runs before any mutation.
    fn validate(&self) -> Result<(), ValidationError>;

    /// The command-specific execution step.
    ///
    /// Errors returned from here propagate out of [`execute`](Self::execute)
    /// and leave the command unfinished. Steps that need compensation catch
    /// their own errors and hand them to [`compensate`](Self::compensate).
    async fn run<B: StorageBackend>(
        &mut self,
        store: &DataStore<B>,
    ) -> Result<ExecutionStatus, LedgerError>;

    /// Reverts whatever the execution step already applied.
    ///
    /// Must be safe to call more than once and must not fail; returns false
    /// if some compensation could not be applied.
    async fn rollback<B: StorageBackend>(&mut self, store: &DataStore<B>) -> bool;

    /// Runs the command once.
    async fn execute<B: StorageBackend>(
        &mut self,
        store: &DataStore<B>,
    ) -> Result<ExecutionStatus, LedgerError> {
        if let Some(status) = self.lifecycle().status() {
            tracing::debug!(command = self.command_name(), "command already executed");
            return Ok(status);
        }

        self.lifecycle_mut().mark_started();
        let timer = Instant::now();

        self.validate()?;
        let status = self.run(store).await?;

        let elapsed = timer.elapsed();
        self.lifecycle_mut().mark_finished(status, elapsed);

        let command = self.command_name();
        metrics::counter!("ledger_commands_total", "command" => command, "status" => status.as_str())
            .increment(1);
        metrics::histogram!("ledger_command_duration_seconds", "command" => command)
            .record(elapsed.as_secs_f64());
        tracing::info!(command, status = status.as_str(), ?elapsed, "command finished");

        Ok(status)
    }

    /// Rollback scope: records `error` on the command and runs
    /// [`rollback`](Self::rollback).
    async fn compensate<B: StorageBackend>(
        &mut self,
        store: &DataStore<B>,
        error: LedgerError,
    ) -> ExecutionStatus {
        let command = self.command_name();
        tracing::warn!(command, %error, "command failed, rolling back");

        self.lifecycle_mut().record_error(error);
        let compensated = self.rollback(store).await;

        metrics::counter!("ledger_rollbacks_total", "command" => command).increment(1);
        if !compensated {
            tracing::error!(command, "rollback incomplete");
        }

        ExecutionStatus::RolledBack { compensated }
    }

    fn is_executed(&self) -> bool {
        self.lifecycle().is_executed()
    }

    fn is_success(&self) -> bool {
        self.lifecycle().is_success()
    }

    fn is_error(&self) -> bool {
        self.lifecycle().is_error()
    }
}
