//! Domain layer: graph model, escape networks, fire spread
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod error;
pub mod fire;
pub mod flow;
pub mod graph;
pub mod network;

pub use error::{DomainError, DomainResult, GraphError, GraphResult};
pub use fire::{FireState, Forest, GameOutcome};
pub use graph::{Graph, Neighbors};
pub use network::{Network, Section, VertexRole};
