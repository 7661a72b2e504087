//! Error types for macup-runner.

use macup_core::ConfigError;
use thiserror::Error;

/// Why a single command invocation did not succeed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecError {
    /// The executable is not on the whitelist. Nothing was spawned.
    #[error("command not allowed: {tool}")]
    CommandNotAllowed { tool: String },

    /// An argument contains a shell metacharacter. Nothing was spawned.
    #[error("invalid argument: {arg}")]
    InvalidArgument { arg: String },

    /// The process could not be started or exited unsuccessfully.
    #[error("{tool} failed: {reason}")]
    Execution { tool: String, reason: String },
}

/// A failed step, with the command line that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("`{command}`: {source}")]
pub struct TaskError {
    pub command: String,
    #[source]
    pub source: ExecError,
}

/// The connectivity probe did not get a 2xx response.
#[derive(Debug, Error)]
pub enum ConnectivityError {
    #[error("probe to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("probe to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },
}

/// The selection source could not produce a list of task names.
#[derive(Debug, Error)]
pub enum SelectionError {
    #[error("no previous selection to reuse")]
    NothingToReuse,

    #[error("unrecognised selection '{0}'")]
    Invalid(String),

    #[error("selection input closed")]
    InputClosed,

    #[error("failed to read selection: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that abort a run before (or instead of) executing any task.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("no internet connection: {0}")]
    NetworkUnavailable(#[source] ConnectivityError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("selection error: {0}")]
    Selection(#[from] SelectionError),
}
