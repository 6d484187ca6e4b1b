//! Entity-construction error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `#[from]`.

use thiserror::Error;

use crate::NodeId;

/// Errors produced while building road-network entities.
#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    #[error("polyline has {len} nodes, at least {min} required")]
    DegeneratePolyline { len: usize, min: usize },

    #[error("node {0} not found in node table")]
    UnknownNode(NodeId),

    #[error("invalid {what}: {value}")]
    InvalidWeight { what: &'static str, value: f32 },

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `map-core`.
pub type CoreResult<T> = Result<T, CoreError>;
