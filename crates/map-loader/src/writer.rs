//! Dataset writer: produces the files [`BinaryLoader`](crate::BinaryLoader)
//! reads.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use map_core::{NodeId, RoadType};

use crate::codec::{self, EdgeRecord, NodeRecord, PolygonRecord};
use crate::{COASTLINE_EDGES_FILE, DatasetInfo, INFO_FILE, LoadResult, NODES_FILE};

/// Writes dataset files into one directory, creating it if needed.
///
/// Point a second writer at a separate directory for coastline data.
///
/// # Example
///
/// ```no_run
/// use map_core::{NodeId, OneWay, RoadType};
/// use map_loader::{DatasetInfo, DatasetWriter, EdgeRecord, NodeRecord};
///
/// # fn main() -> map_loader::LoadResult<()> {
/// let w = DatasetWriter::create("data")?;
/// w.write_info(&DatasetInfo {
///     x_low: 0.0, y_low: 0.0, x_high: 100.0, y_high: 100.0,
///     node_count: 2, edge_count_hint: 1,
/// })?;
/// w.write_nodes(&[
///     NodeRecord { id: 0, x: 0.0, y: 0.0 },
///     NodeRecord { id: 1, x: 100.0, y: 0.0 },
/// ])?;
/// w.write_edges(RoadType::Primary, &[EdgeRecord::new(
///     RoadType::Primary, "High St", 100.0, 0.1, OneWay::None, &[NodeId(0), NodeId(1)],
/// )])?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct DatasetWriter {
    dir: PathBuf,
}

impl DatasetWriter {
    pub fn create(dir: impl AsRef<Path>) -> LoadResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `info.bin`.
    pub fn write_info(&self, info: &DatasetInfo) -> LoadResult<()> {
        let mut w = self.file(INFO_FILE)?;
        for v in [info.x_low, info.y_low, info.x_high, info.y_high] {
            codec::write_f64(&mut w, v)?;
        }
        codec::write_i32(&mut w, count(info.node_count))?;
        codec::write_i32(&mut w, count(info.edge_count_hint))?;
        w.flush()?;
        Ok(())
    }

    /// Write `nodes.bin`.
    pub fn write_nodes(&self, nodes: &[NodeRecord]) -> LoadResult<()> {
        let mut w = self.file(NODES_FILE)?;
        for node in nodes {
            node.write(&mut w)?;
        }
        w.flush()?;
        Ok(())
    }

    /// Write `edges<code>.bin` for `road_type`.
    ///
    /// Records are written as given, so their type codes may disagree with
    /// `road_type`.
    pub fn write_edges(&self, road_type: RoadType, edges: &[EdgeRecord]) -> LoadResult<()> {
        let mut w = self.file(&road_type.edges_file_name())?;
        for edge in edges {
            edge.write(&mut w)?;
        }
        w.flush()?;
        Ok(())
    }

    /// Write a complete coastline directory: node-count header, nodes and
    /// polygons.
    pub fn write_coastline(&self, nodes: &[NodeRecord], polygons: &[Vec<NodeId>]) -> LoadResult<()> {
        let mut w = self.file(INFO_FILE)?;
        codec::write_i32(&mut w, count(nodes.len()))?;
        w.flush()?;

        self.write_nodes(nodes)?;

        let mut w = self.file(COASTLINE_EDGES_FILE)?;
        for polygon in polygons {
            PolygonRecord::from(polygon.as_slice()).write(&mut w)?;
        }
        w.flush()?;
        Ok(())
    }

    fn file(&self, name: &str) -> LoadResult<BufWriter<File>> {
        Ok(BufWriter::new(File::create(self.dir.join(name))?))
    }
}

fn count(n: usize) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}
