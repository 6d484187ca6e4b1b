//! Spatial-index error type.

use thiserror::Error;

use map_core::CoreError;

/// Errors produced by `map-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("cannot build a spatial index over an empty batch")]
    EmptyBatch,

    #[error("invalid index configuration: {0}")]
    Config(#[from] CoreError),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
