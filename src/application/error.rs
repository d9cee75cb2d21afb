//! Application-level errors (wraps domain errors)

use std::fmt;

use thiserror::Error;

use crate::domain::DomainError;

/// Number of arguments a command accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exactly(usize),
    AtLeast(usize),
    AtMost(usize),
}

impl Arity {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exactly(n) => count == n,
            Arity::AtLeast(n) => count >= n,
            Arity::AtMost(n) => count <= n,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exactly(n) => write!(f, "{n}"),
            Arity::AtLeast(n) => write!(f, "at least {n}"),
            Arity::AtMost(n) => write!(f, "at most {n}"),
        }
    }
}

/// Malformed command text. Never touches the model.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("malformed input")]
    Empty,

    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("{command} expects {expected} argument(s), got {actual}")]
    ArgumentCount {
        command: String,
        expected: Arity,
        actual: usize,
    },

    #[error("'{0}' is not a number")]
    NotANumber(String),

    #[error("'{value}' is not a valid {kind} identifier")]
    MalformedIdentifier { kind: &'static str, value: String },

    #[error("malformed section '{0}'")]
    MalformedSection(String),
}

/// Application errors wrap domain errors and add session-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Parse(#[from] ParseError),

    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("no escape network with identifier {0}")]
    UnknownNetwork(String),

    #[error("{0}")]
    Semantic(String),

    /// Ends the session
    #[error("{0}")]
    Fatal(String),

    #[error("config error: {message}")]
    Config { message: String },
}

impl ApplicationError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, ApplicationError::Fatal(_))
    }
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
