//! `map-model` — the map engine façade.
//!
//! [`MapModelBuilder`] loads a dataset directory in parallel (one worker
//! task per road type plus one for the coastline), builds a KD-tree per road
//! type and freezes a single routing graph.  The resulting [`MapModel`]
//! answers the presentation layer's questions synchronously:
//!
//! - what to draw in a rectangle ([`MapModel::edges_in`], [`MapModel::coastline_in`]),
//! - what road is under a point ([`MapModel::nearest_edge`], [`MapModel::road_name_at`]),
//! - how to get from A to B ([`MapModel::set_source`], [`MapModel::set_target`],
//!   [`MapModel::route`]).
//!
//! Every state change is reported to a [`MapObserver`].
//!
//! # Crate layout
//!
//! | Module       | Contents                                                |
//! |--------------|---------------------------------------------------------|
//! | [`config`]   | `MapConfig`                                             |
//! | [`builder`]  | `MapModelBuilder` (load orchestration)                  |
//! | [`model`]    | `MapModel`, `Selection`, `LoadSummary`                  |
//! | [`observer`] | `MapObserver` trait, `NoopObserver`                     |
//! | [`error`]    | `ModelError`, `ModelResult<T>`                          |
//!
//! # Example
//!
//! ```rust,ignore
//! let mut model = MapModelBuilder::new(MapConfig::new("data/krak"))
//!     .observer(RepaintOnChange::new(window))
//!     .build()?;
//! model.set_source(Point::new(720_000.0, 6_170_000.0))?;
//! model.set_target(Point::new(725_500.0, 6_176_200.0))?;
//! let route = model.route()?;
//! println!("{:.1} km", route.total_length() / 1000.0);
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod model;
pub mod observer;

#[cfg(test)]
mod tests;

pub use builder::MapModelBuilder;
pub use config::MapConfig;
pub use error::{ModelError, ModelResult};
pub use model::{LoadSummary, MapModel, Selection};
pub use observer::{MapObserver, NoopObserver};

pub use map_core::{Edge, NodeId, Point, Rect, RoadType};
pub use map_routing::{Metric, Route};
