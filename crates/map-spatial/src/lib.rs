//! `map-spatial` — KD-tree spatial index over road edges.
//!
//! One [`KdTree`] is built per road type.  It answers padded range queries
//! (what to draw in a viewport) and nearest-edge queries (what road is under
//! the cursor, where to snap a route endpoint).
//!
//! # Crate layout
//!
//! | Module     | Contents                                      |
//! |------------|-----------------------------------------------|
//! | [`kdtree`] | `KdTree`                                      |
//! | [`error`]  | `SpatialError`, `SpatialResult<T>`            |

pub mod error;
pub mod kdtree;


pub use error::{SpatialError, SpatialResult};
pub use kdtree::KdTree;
