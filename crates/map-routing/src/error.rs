//! Routing error type.

use thiserror::Error;

use map_core::NodeId;

/// Errors produced by `map-routing`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RoutingError {
    #[error("no path from {from} to {to}")]
    NoPath { from: NodeId, to: NodeId },

    #[error("{node} is outside the routing graph ({node_count} nodes)")]
    NodeOutOfRange { node: NodeId, node_count: usize },
}

pub type RoutingResult<T> = Result<T, RoutingError>;
