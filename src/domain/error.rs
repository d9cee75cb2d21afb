//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Structural violations of the graph model.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("node '{0}' already exists")]
    DuplicateNode(String),

    #[error("unknown node '{0}'")]
    UnknownNode(String),

    #[error("edge from '{from}' to '{to}' already exists")]
    DuplicateEdge { from: String, to: String },

    #[error("self loop at '{0}' is not permitted")]
    SelfLoop(String),
}

/// Result type for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;

/// Domain errors represent rule violations of the escape network and fire models.
/// These are independent of parsing and I/O concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("{0}")]
    Graph(#[from] GraphError),

    #[error("escape network must contain at least one section")]
    EmptyNetwork,

    #[error("sections {from}->{to} and {to}->{from} point in opposite directions")]
    AntiparallelSections { from: String, to: String },

    #[error("escape network has no vertex without incoming sections")]
    NoSource,

    #[error("escape network has no vertex without outgoing sections")]
    NoSink,

    #[error("'{0}' is not a valid source, it has incoming sections")]
    InvalidSource(String),

    #[error("'{0}' is not a valid sink, it has outgoing sections")]
    InvalidSink(String),

    #[error("source and sink must differ, got '{0}' twice")]
    SameEndpoints(String),

    #[error("capacity must be positive, got {0}")]
    NonPositiveCapacity(u32),

    #[error("cannot {action} node '{node}' while it is {state}")]
    IllegalTransition {
        node: String,
        state: String,
        action: &'static str,
    },

    #[error("node '{0}' is listed more than once")]
    RepeatedNode(String),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
