//! `map-loader` — reads and writes the binary dataset files.
//!
//! # Dataset layout
//!
//! ```text
//! <data>/info.bin          header: extent + node count + edge count hint
//! <data>/nodes.bin         node records
//! <data>/edges<code>.bin   one file per road type (absent = no edges)
//! <coast>/info.bin         coastline node count
//! <coast>/nodes.bin        coastline node records
//! <coast>/edges.bin        closed polygon records
//! ```
//!
//! All multi-byte values are big-endian; see [`codec`] for record layouts.
//!
//! # Crate layout
//!
//! | Module     | Contents                                               |
//! |------------|--------------------------------------------------------|
//! | [`codec`]  | Record layouts, primitive read/write helpers           |
//! | [`loader`] | `BinaryLoader`, `DatasetInfo`, `Coastline`             |
//! | [`writer`] | `DatasetWriter`                                        |
//! | [`error`]  | `LoadError`, `LoadResult<T>`                           |

pub mod codec;
pub mod error;
pub mod loader;
pub mod writer;


pub use codec::{EdgeRecord, NodeRecord, PolygonRecord};
pub use error::{LoadError, LoadResult};
pub use loader::{BinaryLoader, Coastline, DatasetInfo, NODE_ID_HEADROOM};
pub use writer::DatasetWriter;

/// Dataset header file name (both the main and the coastline directory).
pub const INFO_FILE: &str = "info.bin";
/// Node record file name.
pub const NODES_FILE: &str = "nodes.bin";
/// Coastline polygon file name.
pub const COASTLINE_EDGES_FILE: &str = "edges.bin";
