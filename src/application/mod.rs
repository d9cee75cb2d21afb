//! Application layer: command parsing, sessions and the two interpreters
//!
//! This layer turns text into typed commands and applies them to the domain model.

pub mod error;
pub mod escape;
pub mod fire;
pub mod parser;
pub mod session;

pub use error::{ApplicationError, ApplicationResult, Arity, ParseError};
pub use escape::{EscapeCommand, EscapeNetworks};
pub use fire::{FireBreaker, FireCommand};
pub use session::{Environment, Reply, Session, SessionState};
