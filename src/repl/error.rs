//! REPL Errors
//!
//! Everything here is recoverable: the engine reports the error through its
//! output sink and keeps reading. The only way to end a session is a
//! [`BreakoutSignal`](crate::repl::BreakoutSignal), which is not an error.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// An error value caught from the evaluator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct EvalError {
    /// Error class, e.g. `NameError`
    pub kind: String,
    /// Human readable message
    pub message: String,
    /// Where the error was raised, if the evaluator knows
    pub location: Option<String>,
}

impl EvalError {
    /// Create a new evaluation error
    pub fn new(
        kind: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
            location: None,
        }
    }

    /// Attach the location the error was raised from
    pub fn at(
        mut self,
        location: impl Into<String>,
    ) -> Self {
        self.location = Some(location.into());
        self
    }
}

/// Errors raised by commands, the input buffer and history persistence
#[derive(Debug, Error)]
pub enum ReplError {
    /// A command received flags or arguments it cannot use
    #[error("{0}")]
    MalformedCommandArgs(String),

    /// A command or alias target that is not registered
    #[error("No such command: {0}")]
    UnknownCommand(String),

    /// `amend-line` addressed lines the buffer does not have
    #[error("Line range {range} is out of range for a {len}-line input buffer")]
    AmendOutOfRange { range: String, len: usize },

    /// The evaluator raised an error
    #[error(transparent)]
    Evaluation(#[from] EvalError),

    /// The history file could not be read or written
    #[error("History file {}: {source}", path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The external editor could not be run
    #[error("Editor error: {0}")]
    Editor(String),

    /// Output sink or input source failure
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl ReplError {
    /// Shorthand for [`ReplError::MalformedCommandArgs`]
    pub fn malformed(message: impl Into<String>) -> Self {
        ReplError::MalformedCommandArgs(message.into())
    }

    pub(crate) fn persistence(
        path: impl Into<PathBuf>,
        source: io::Error,
    ) -> Self {
        ReplError::Persistence {
            path: path.into(),
            source,
        }
    }
}

/// Result type for REPL operations
pub type Result<T> = std::result::Result<T, ReplError>;
