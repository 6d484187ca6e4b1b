//! Model error type.

use thiserror::Error;

use map_core::{NodeId, Point};
use map_loader::LoadError;
use map_routing::RoutingError;
use map_spatial::SpatialError;

/// Errors produced by `map-model`.
///
/// `NoNearbyPoint`, `NoSelection` and `NoPath` are ordinary query outcomes
/// for the presentation layer to show; `Load` during construction is fatal.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("no selectable road within reach of {0}")]
    NoNearbyPoint(Point),

    #[error("a route needs both a source and a target")]
    NoSelection,

    #[error("no path from {from} to {to}")]
    NoPath { from: NodeId, to: NodeId },

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Spatial(#[from] SpatialError),

    #[error(transparent)]
    Routing(#[from] RoutingError),

    #[error("cannot start load workers: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type ModelResult<T> = Result<T, ModelError>;
