//! Command lifecycle state machine.

/// The state of a command in its lifecycle.
///
/// State transitions:
/// ```text
/// Created ──► Started ──┬──► Succeeded
///                       └──► Failed
/// ```
///
/// A command whose validation or unguarded execution fails stays in
/// `Started`; only a command that ran to completion becomes terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CommandState {
    /// Constructed with its inputs, not executed yet.
    #[default]
    Created,

    /// Execution began but the command did not finish.
    Started,

    /// Execution finished without error (terminal state).
    Succeeded,

    /// Execution failed inside a rollback scope and was compensated
    /// (terminal state).
    Failed,
}

impl CommandState {
    /// Returns true if this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, CommandState::Succeeded | CommandState::Failed)
    }

    /// Returns the state name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandState::Created => "Created",
            CommandState::Started => "Started",
            CommandState::Succeeded => "Succeeded",
            CommandState::Failed => "Failed",
        }
    }
}

impl std::fmt::Display for CommandState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
