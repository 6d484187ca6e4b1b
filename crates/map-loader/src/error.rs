//! Loader error type.

use std::path::PathBuf;

use thiserror::Error;

use map_core::RoadType;

/// Errors produced by `map-loader`.
///
/// `MissingHeader`, `ShortHeader`, `InvalidHeader` and `MissingNodes` are
/// fatal for a load: nothing can be built without the header and node
/// table.  `DanglingNode` fails one batch only.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("dataset header {} not found", path.display())]
    MissingHeader { path: PathBuf },

    #[error("dataset header {} is {len} bytes, expected at least {expected}", path.display())]
    ShortHeader { path: PathBuf, len: usize, expected: usize },

    #[error("dataset header {} is invalid: {reason}", path.display())]
    InvalidHeader { path: PathBuf, reason: String },

    #[error("node file {} not found", path.display())]
    MissingNodes { path: PathBuf },

    #[error("{road_type} edge references node {node}, which is not in the node table")]
    DanglingNode { road_type: RoadType, node: i64 },

    #[error("road name of {len} bytes exceeds the {max}-byte record limit")]
    NameTooLong { len: usize, max: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type LoadResult<T> = Result<T, LoadError>;
