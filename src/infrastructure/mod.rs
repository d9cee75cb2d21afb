//! Infrastructure layer: line I/O around a session
//!
//! This layer owns the readers and writers; everything below it is I/O free.

pub mod error;
pub mod terminal;

pub use error::{InfraError, InfraResult, IoResultExt};
pub use terminal::{run, Outcome};
