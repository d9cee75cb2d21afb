//! netfire: two line-oriented interpreters over a shared graph model.
//!
//! - `escape-networks`: capacitated directed networks, reachability and maximum flow
//! - `fire-breaker`: turn-based fire spread with containment
//!
//! Layers, innermost first: [`domain`], [`application`], [`infrastructure`], [`cli`].

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
