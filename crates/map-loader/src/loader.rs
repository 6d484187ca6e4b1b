//! Binary dataset loader.
//!
//! # Failure policy
//!
//! | Condition                                | Outcome                         |
//! |------------------------------------------|---------------------------------|
//! | `info.bin` missing or short              | fatal (`MissingHeader`, …)      |
//! | `nodes.bin` missing                      | fatal (`MissingNodes`)          |
//! | `edges<code>.bin` missing                | empty batch                     |
//! | edge references an absent node           | batch fails (`DanglingNode`)    |
//! | type-code mismatch, unknown one-way code | logged, record kept             |
//! | bad weight, fewer than two nodes         | logged, record skipped          |
//! | truncated trailing record                | logged, ignored                 |
//! | coastline directory missing              | logged, empty coastline         |
//!
//! Every `load_*` call returns a complete value or an error; callers never
//! observe a half-built batch.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use map_core::{CoreError, Edge, Node, NodeId, NodeTable, OneWay, Rect, RoadType, StringInterner};

use crate::codec::{self, EdgeRecord, NodeRecord, PolygonRecord};
use crate::{COASTLINE_EDGES_FILE, INFO_FILE, LoadError, LoadResult, NODES_FILE};

// ── DatasetInfo ───────────────────────────────────────────────────────────────

/// Contents of the dataset header.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DatasetInfo {
    pub x_low:           f64,
    pub y_low:           f64,
    pub x_high:          f64,
    pub y_high:          f64,
    /// Node table size announced by the header.
    pub node_count:      usize,
    /// Total edge count across all files; informational only.
    pub edge_count_hint: usize,
}

impl DatasetInfo {
    /// Encoded size of `info.bin`: four `f64` and two `i32`.
    pub const SIZE: usize = 4 * 8 + 2 * 4;

    /// Bounding rectangle of the dataset.
    pub fn extent(&self) -> Rect {
        Rect::new(self.x_low, self.y_low, self.x_high, self.y_high)
    }
}

// ── Coastline ─────────────────────────────────────────────────────────────────

/// Coastline polygons plus the separate node table they refer to.
#[derive(Clone, Debug, Default)]
pub struct Coastline {
    pub table:    Arc<NodeTable>,
    pub polygons: Vec<Arc<Edge>>,
}

impl Coastline {
    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// Rectangle enclosing every polygon, or `None` when there are none.
    pub fn extent(&self) -> Option<Rect> {
        self.polygons
            .iter()
            .map(|p| p.bbox())
            .reduce(|a, b| {
                Rect::new(
                    a.min_x.min(b.min_x),
                    a.min_y.min(b.min_y),
                    a.max_x.max(b.max_x),
                    a.max_y.max(b.max_y),
                )
            })
    }
}

// ── BinaryLoader ──────────────────────────────────────────────────────────────

/// Extra slots a node file may claim beyond twice its size before ids are
/// treated as corrupt.
pub const NODE_ID_HEADROOM: usize = 4096;

/// Reads one dataset.
///
/// A loader owns the string interner for its load session, so every road
/// name read through the same loader resolves to one shared `Arc<str>`.
/// `BinaryLoader` is `Sync`; wrap it in an `Arc` to load several road types
/// from worker threads at once.
#[derive(Debug, Default)]
pub struct BinaryLoader {
    interner: StringInterner,
}

impl BinaryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interner shared by every batch this loader has read.
    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    // ── Header ────────────────────────────────────────────────────────────

    /// Read `<dir>/info.bin`.
    ///
    /// # Errors
    ///
    /// - [`LoadError::MissingHeader`] if the file does not exist.
    /// - [`LoadError::ShortHeader`] if it holds fewer than
    ///   [`DatasetInfo::SIZE`] bytes.
    /// - [`LoadError::InvalidHeader`] for negative counts.
    pub fn load_info(&self, dir: &Path) -> LoadResult<DatasetInfo> {
        let path = dir.join(INFO_FILE);
        let bytes = read_header(&path)?;
        if bytes.len() < DatasetInfo::SIZE {
            return Err(LoadError::ShortHeader {
                path,
                len:      bytes.len(),
                expected: DatasetInfo::SIZE,
            });
        }

        let mut cursor = &bytes[..];
        let x_low  = codec::read_f64(&mut cursor)?;
        let y_low  = codec::read_f64(&mut cursor)?;
        let x_high = codec::read_f64(&mut cursor)?;
        let y_high = codec::read_f64(&mut cursor)?;
        let node_count = header_count(&path, "node count", codec::read_i32(&mut cursor)?)?;
        let edge_count_hint = header_count(&path, "edge count", codec::read_i32(&mut cursor)?)?;

        let info = DatasetInfo { x_low, y_low, x_high, y_high, node_count, edge_count_hint };
        log::info!(
            "dataset header {}: extent {}, {node_count} nodes, ~{edge_count_hint} edges",
            path.display(),
            info.extent()
        );
        Ok(info)
    }

    // ── Nodes ─────────────────────────────────────────────────────────────

    /// Read a node file into a table of `node_count` slots.
    ///
    /// Ids at or beyond `node_count` grow the table, but only up to twice the
    /// larger of `node_count` and the records read so far, plus
    /// [`NODE_ID_HEADROOM`]. Records past that bound are skipped.
    ///
    /// # Errors
    ///
    /// [`LoadError::MissingNodes`] if `path` does not exist; I/O errors
    /// other than a truncated trailing record.
    pub fn load_nodes(&self, path: &Path, node_count: usize) -> LoadResult<NodeTable> {
        let reader = open(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => LoadError::MissingNodes { path: path.to_path_buf() },
            _ => LoadError::Io(e),
        })?;
        let table = self.read_nodes(reader, node_count)?;
        log::info!("loaded {} nodes from {}", table.len(), path.display());
        Ok(table)
    }

    /// Like [`load_nodes`](Self::load_nodes) but reads from any buffered
    /// source.
    pub fn read_nodes<R: BufRead>(&self, mut reader: R, node_count: usize) -> LoadResult<NodeTable> {
        let mut table = NodeTable::with_slots(node_count);
        let mut beyond_header = 0usize;
        let mut seen = 0usize;

        while let Some(record) = next_record(&mut reader, "node", NodeRecord::read)? {
            seen += 1;
            let Ok(id) = NodeId::try_from(record.id) else {
                log::warn!("skipping node record with negative id {}", record.id);
                continue;
            };
            let limit = node_id_limit(node_count, seen);
            if id.index() >= limit {
                log::warn!("skipping node record with id {id}: beyond {limit} slots for header count {node_count}");
                continue;
            }
            if id.index() >= node_count {
                beyond_header += 1;
            }
            table.insert(Node::new(id, record.x, record.y));
        }

        if beyond_header > 0 {
            log::warn!(
                "{beyond_header} node ids at or beyond the header count {node_count}; table grown to {} slots",
                table.slot_count()
            );
        }
        Ok(table)
    }

    // ── Edges ─────────────────────────────────────────────────────────────

    /// Read `<dir>/edges<code>.bin` for `road_type`, resolving node ids
    /// against `table`.
    ///
    /// A missing file is an empty batch.
    ///
    /// # Errors
    ///
    /// [`LoadError::DanglingNode`] if any record names a node that `table`
    /// does not hold; I/O errors other than a truncated trailing record.
    pub fn load_edges(
        &self,
        road_type: RoadType,
        dir:       &Path,
        table:     &NodeTable,
    ) -> LoadResult<Vec<Arc<Edge>>> {
        let path = dir.join(road_type.edges_file_name());
        let reader = match open(&path) {
            Ok(reader) => reader,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("no {road_type} edges ({} absent)", path.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };
        let edges = self.read_edges(reader, road_type, table)?;
        log::info!("loaded {} {road_type} edges", edges.len());
        Ok(edges)
    }

    /// Like [`load_edges`](Self::load_edges) but reads from any buffered
    /// source.
    pub fn read_edges<R: BufRead>(
        &self,
        mut reader: R,
        road_type:  RoadType,
        table:      &NodeTable,
    ) -> LoadResult<Vec<Arc<Edge>>> {
        let mut edges = Vec::new();
        while let Some(record) = next_record(&mut reader, road_type.as_str(), EdgeRecord::read)? {
            if let Some(edge) = self.resolve_edge(record, road_type, table)? {
                edges.push(Arc::new(edge));
            }
        }
        Ok(edges)
    }

    /// Turn a raw record into an `Edge`.  `Ok(None)` means "skip".
    fn resolve_edge(
        &self,
        record:    EdgeRecord,
        road_type: RoadType,
        table:     &NodeTable,
    ) -> LoadResult<Option<Edge>> {
        if record.type_code != road_type.code() {
            log::warn!(
                "{road_type} file holds a record with type code {}; keeping it as {road_type}",
                record.type_code
            );
        }
        let one_way = OneWay::from_code(record.one_way).unwrap_or_else(|| {
            log::warn!("unknown one-way code {}; assuming no restriction", record.one_way);
            OneWay::None
        });
        let name = (!record.name.is_empty()).then(|| self.interner.intern(&record.name));
        let nodes = resolve_ids(&record.nodes, road_type, table)?;

        match Edge::road(road_type, name, record.length, record.drive_time, one_way, nodes, table) {
            Ok(edge) => Ok(Some(edge)),
            Err(CoreError::UnknownNode(id)) => Err(LoadError::DanglingNode {
                road_type,
                node: i64::from(id.0),
            }),
            Err(e) => {
                log::warn!("skipping {road_type} record {:?}: {e}", record.name);
                Ok(None)
            }
        }
    }

    // ── Coastline ─────────────────────────────────────────────────────────

    /// Read a coastline directory: its own header, node table and polygons.
    ///
    /// A missing directory yields an empty [`Coastline`].  A missing polygon
    /// file yields a coastline with no polygons.
    pub fn load_coastline(&self, dir: &Path) -> LoadResult<Coastline> {
        if !dir.is_dir() {
            log::warn!("coastline directory {} not found; loading without coastline", dir.display());
            return Ok(Coastline::default());
        }

        let info_path = dir.join(INFO_FILE);
        let bytes = read_header(&info_path)?;
        if bytes.len() < 4 {
            return Err(LoadError::ShortHeader { path: info_path, len: bytes.len(), expected: 4 });
        }
        let node_count = header_count(&info_path, "node count", codec::read_i32(&mut &bytes[..])?)?;
        let table = self.load_nodes(&dir.join(NODES_FILE), node_count)?;

        let path = dir.join(COASTLINE_EDGES_FILE);
        let polygons = match open(&path) {
            Ok(reader) => read_polygons(reader, &table)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::warn!("coastline polygons {} not found", path.display());
                Vec::new()
            }
            Err(e) => return Err(e.into()),
        };
        log::info!("loaded {} coastline polygons", polygons.len());
        Ok(Coastline { table: Arc::new(table), polygons })
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn open(path: &Path) -> io::Result<BufReader<File>> {
    File::open(path).map(BufReader::new)
}

fn read_header(path: &Path) -> LoadResult<Vec<u8>> {
    std::fs::read(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => LoadError::MissingHeader { path: path.to_path_buf() },
        _ => LoadError::Io(e),
    })
}

fn header_count(path: &Path, what: &str, raw: i32) -> LoadResult<usize> {
    usize::try_from(raw).map_err(|_| LoadError::InvalidHeader {
        path:   PathBuf::from(path),
        reason: format!("negative {what} {raw}"),
    })
}

/// Exclusive upper bound on node indices accepted after `seen` records.
fn node_id_limit(node_count: usize, seen: usize) -> usize {
    node_count
        .max(seen)
        .saturating_mul(2)
        .saturating_add(NODE_ID_HEADROOM)
}

/// Read the next record, or `None` at end of file.  A record cut short by
/// end of file is logged and treated as end of file.
fn next_record<R, T, F>(reader: &mut R, what: &str, read: F) -> LoadResult<Option<T>>
where
    R: BufRead,
    F: FnOnce(&mut R) -> io::Result<T>,
{
    if codec::at_end(reader)? {
        return Ok(None);
    }
    match read(reader) {
        Ok(record) => Ok(Some(record)),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
            log::warn!("ignoring truncated trailing {what} record");
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

fn resolve_ids(raw: &[i32], road_type: RoadType, table: &NodeTable) -> LoadResult<Vec<NodeId>> {
    let mut ids = Vec::with_capacity(raw.len());
    for &id in raw {
        let node = NodeId::try_from(id)
            .ok()
            .filter(|n| table.contains(*n))
            .ok_or(LoadError::DanglingNode { road_type, node: i64::from(id) })?;
        ids.push(node);
    }
    Ok(ids)
}

fn read_polygons<R: BufRead>(mut reader: R, table: &NodeTable) -> LoadResult<Vec<Arc<Edge>>> {
    let mut polygons = Vec::new();
    while let Some(record) = next_record(&mut reader, "coastline", PolygonRecord::read)? {
        let nodes = resolve_ids(&record.nodes, RoadType::Coastline, table)?;
        match Edge::coastline(nodes, table) {
            Ok(polygon) => polygons.push(Arc::new(polygon)),
            Err(e) => log::warn!("skipping coastline polygon: {e}"),
        }
    }
    Ok(polygons)
}
