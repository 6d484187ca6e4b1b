//! `map-core` — road-network entities shared by every `map-*` crate.
//!
//! This crate has no `map-*` dependencies.  It holds pure data plus derived
//! geometry; loading, indexing and routing live in their own crates.
//!
//! # What lives here
//!
//! | Module     | Contents                                               |
//! |------------|--------------------------------------------------------|
//! | [`ids`]    | `NodeId`, `EdgeId`                                     |
//! | [`geo`]    | `Point`, `Rect`, `Axis`, point–segment distance        |
//! | [`road`]   | `RoadType`, `OneWay`                                   |
//! | [`node`]   | `Node`, `NodeTable`                                    |
//! | [`edge`]   | `Edge`                                                 |
//! | [`intern`] | `StringInterner` (per load session)                    |
//! | [`config`] | `IndexConfig`                                          |
//! | [`error`]  | `CoreError`, `CoreResult`                              |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to value types and config.  |

pub mod config;
pub mod edge;
pub mod error;
pub mod geo;
pub mod ids;
pub mod intern;
pub mod node;
pub mod road;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::IndexConfig;
pub use edge::Edge;
pub use error::{CoreError, CoreResult};
pub use geo::{Axis, Point, Rect};
pub use ids::{EdgeId, NodeId};
pub use intern::StringInterner;
pub use node::{Node, NodeTable};
pub use road::{OneWay, RoadType};
