//! Infrastructure-level errors (wraps application errors)

use std::io;

use thiserror::Error;

use crate::application::ApplicationError;

/// Infrastructure errors wrap application errors and add I/O-level concerns.
#[derive(Error, Debug)]
pub enum InfraError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("I/O error: {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
}

impl InfraError {
    /// Create an I/O error with context.
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

/// Result type for infrastructure layer operations.
pub type InfraResult<T> = Result<T, InfraError>;

/// Extension trait for converting `io::Result` to `InfraResult` with context.
pub trait IoResultExt<T> {
    /// # Example
    /// ```ignore
    /// writeln!(output, "{line}").io_context("write reply")?;
    /// ```
    fn io_context(self, context: &str) -> InfraResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn io_context(self, context: &str) -> InfraResult<T> {
        self.map_err(|e| InfraError::io(context, e))
    }
}
