//! `map-routing` — directed road graph and shortest paths.
//!
//! Every routable edge contributes one or two directed links to a
//! [`RoutingGraph`], each carrying both a length and a drive-time weight, so
//! one frozen graph serves either [`Metric`].  A [`Router`] computes a full
//! single-source [`ShortestPathTree`]; [`CachedRouter`] keeps the last tree so
//! repeated queries from the same source under the same metric are free.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                 |
//! |------------|----------------------------------------------------------|
//! | [`metric`] | `Metric`                                                 |
//! | [`graph`]  | `RoutingGraph` (CSR), `RoutingGraphBuilder`, `Link`      |
//! | [`router`] | `Router` trait, `DijkstraRouter`, `ShortestPathTree`     |
//! | [`route`]  | `Route`, `RouteStep`                                     |
//! | [`cache`]  | `CachedRouter`                                           |
//! | [`error`]  | `RoutingError`, `RoutingResult<T>`                       |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on `Metric`.               |

pub mod cache;
pub mod error;
pub mod graph;
pub mod metric;
pub mod route;
pub mod router;

#[cfg(test)]
mod tests;

pub use cache::CachedRouter;
pub use error::{RoutingError, RoutingResult};
pub use graph::{Link, RoutingGraph, RoutingGraphBuilder};
pub use metric::Metric;
pub use route::{Route, RouteStep};
pub use router::{DijkstraRouter, Router, ShortestPathTree};
