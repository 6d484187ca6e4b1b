//! Fluent builder that loads a dataset into a [`MapModel`].
//!
//! # Load pipeline
//!
//! ```text
//! info.bin ─► nodes.bin ─┬─► [worker] edges1.bin  ─► KdTree ─┐
//!            (barrier)   ├─► [worker] edges2.bin  ─► KdTree ─┤
//!                        ├─► …                              ├─► aggregator ─► RoutingGraph
//!                        └─► [worker] coastline   ─► KdTree ─┘    (this thread)
//! ```
//!
//! The header and node table are read on the calling thread; nothing else
//! starts until the node table is complete.  Each road type is then loaded
//! and indexed by its own task on a bounded rayon pool.  Finished batches
//! travel back over a channel to the calling thread, which is the only
//! writer of the routing graph builder.  Batches are appended in
//! [`RoadType::ALL`] order once every task has reported, so the frozen graph
//! does not depend on task completion order.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::mpsc;
use std::sync::Arc;
use std::time::Instant;

use rustc_hash::FxHashMap;

use map_core::{Edge, IndexConfig, NodeTable, Rect, RoadType};
use map_loader::{BinaryLoader, NODES_FILE};
use map_routing::{CachedRouter, RoutingGraphBuilder};
use map_spatial::KdTree;

use crate::model::{LoadSummary, MapModel, Selection};
use crate::{MapConfig, MapObserver, ModelResult, NoopObserver};

/// Fluent builder for [`MapModel<O>`].
///
/// # Example
///
/// ```rust,ignore
/// let model = MapModelBuilder::new(MapConfig::new("data").with_worker_threads(8))
///     .observer(ProgressBar::default())
///     .build()?;
/// ```
pub struct MapModelBuilder<O: MapObserver = NoopObserver> {
    config:   MapConfig,
    observer: O,
}

impl MapModelBuilder<NoopObserver> {
    pub fn new(config: MapConfig) -> Self {
        Self { config, observer: NoopObserver }
    }
}

impl<O: MapObserver> MapModelBuilder<O> {
    /// Receive load progress and, later, model change notifications.
    pub fn observer<P: MapObserver>(self, observer: P) -> MapModelBuilder<P> {
        MapModelBuilder { config: self.config, observer }
    }

    /// Load the dataset and return a ready model.
    ///
    /// # Errors
    ///
    /// Configuration errors, a missing or short header, a missing node file,
    /// or a thread pool that cannot start.  A road type or coastline batch
    /// that fails is logged, listed in [`LoadSummary::failed`], and left
    /// out; it does not fail the build.
    pub fn build(mut self) -> ModelResult<MapModel<O>> {
        let started = Instant::now();
        self.config.validate()?;

        // ── Header and node table (barrier) ───────────────────────────────
        let loader = Arc::new(BinaryLoader::new());
        let data_dir = self.config.data_dir.clone();
        let info = loader.load_info(&data_dir)?;
        let nodes = Arc::new(loader.load_nodes(&data_dir.join(NODES_FILE), info.node_count)?);

        // ── Parallel per-type load + index ────────────────────────────────
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.worker_threads)
            .thread_name(|i| format!("map-load-{i}"))
            .build()?;
        let (tx, rx) = mpsc::channel::<BatchMessage>();

        for road_type in RoadType::LOADABLE {
            let task = BatchTask {
                loader: Arc::clone(&loader),
                dir:    data_dir.clone(),
                nodes:  Arc::clone(&nodes),
                extent: info.extent(),
                index:  self.config.index,
            };
            let tx = tx.clone();
            pool.spawn(move || {
                let result = task.load_roads(road_type);
                // The receiver outlives every task.
                let _ = tx.send(BatchMessage::Roads { road_type, result });
            });
        }
        if let Some(dir) = self.config.coastline_dir.clone() {
            let task = BatchTask {
                loader: Arc::clone(&loader),
                dir,
                nodes:  Arc::clone(&nodes),
                extent: info.extent(),
                index:  self.config.index,
            };
            let tx = tx.clone();
            pool.spawn(move || {
                let _ = tx.send(BatchMessage::Coastline(task.load_coastline()));
            });
        }
        drop(tx);

        // ── Aggregate ─────────────────────────────────────────────────────
        let mut indices = FxHashMap::default();
        let mut pending: BTreeMap<RoadType, Vec<Arc<Edge>>> = BTreeMap::new();
        let mut coastline = None;
        let mut summary = LoadSummary { node_count: nodes.len(), ..LoadSummary::default() };

        for message in rx {
            match message {
                BatchMessage::Roads { road_type, result: Ok(Some(batch)) } => {
                    let count = batch.edges.len();
                    summary.edge_count += count;
                    summary.batches += 1;
                    indices.insert(road_type, batch.tree);
                    pending.insert(road_type, batch.edges);
                    self.observer.on_batch_loaded(road_type, count);
                }
                BatchMessage::Roads { result: Ok(None), .. } => {}
                BatchMessage::Roads { road_type, result: Err(e) } => {
                    log::warn!("leaving out {road_type} edges: {e}");
                    summary.failed.push(road_type);
                }
                BatchMessage::Coastline(Ok(Some(tree))) => {
                    summary.coastline_polygons = tree.len();
                    self.observer.on_batch_loaded(RoadType::Coastline, tree.len());
                    coastline = Some(tree);
                }
                BatchMessage::Coastline(Ok(None)) => {}
                BatchMessage::Coastline(Err(e)) => {
                    log::warn!("leaving out coastline: {e}");
                    summary.failed.push(RoadType::Coastline);
                }
            }
        }
        summary.failed.sort();

        let mut graph = RoutingGraphBuilder::with_nodes(nodes.slot_count());
        for (_, edges) in pending {
            graph.add_batch(edges);
        }
        let graph = graph.build();
        summary.arc_count = graph.link_count();
        summary.elapsed = started.elapsed();

        log::info!(
            "map loaded in {:.2?}: {} nodes, {} edges in {} batches, {} arcs, {} coastline polygons",
            summary.elapsed,
            summary.node_count,
            summary.edge_count,
            summary.batches,
            summary.arc_count,
            summary.coastline_polygons
        );
        self.observer.on_load_complete(&summary);

        Ok(MapModel {
            metric:     self.config.default_metric,
            config:     self.config,
            info,
            nodes,
            indices,
            coastline,
            graph,
            router:     CachedRouter::new(),
            selection:  Selection::default(),
            last_route: None,
            summary,
            observer:   self.observer,
        })
    }
}

// ── Worker tasks ──────────────────────────────────────────────────────────────

struct RoadBatch {
    tree:  KdTree,
    edges: Vec<Arc<Edge>>,
}

enum BatchMessage {
    Roads { road_type: RoadType, result: ModelResult<Option<RoadBatch>> },
    Coastline(ModelResult<Option<KdTree>>),
}

/// Everything one worker needs, owned so the task can be `'static`.
struct BatchTask {
    loader: Arc<BinaryLoader>,
    dir:    PathBuf,
    nodes:  Arc<NodeTable>,
    extent: Rect,
    index:  IndexConfig,
}

impl BatchTask {
    /// `Ok(None)` when the road type has no edges.
    fn load_roads(&self, road_type: RoadType) -> ModelResult<Option<RoadBatch>> {
        let edges = self.loader.load_edges(road_type, &self.dir, &self.nodes)?;
        if edges.is_empty() {
            return Ok(None);
        }
        let extent = covering(self.extent, &edges);
        let tree = KdTree::build(edges.clone(), Arc::clone(&self.nodes), extent, self.index)?;
        Ok(Some(RoadBatch { tree, edges }))
    }

    fn load_coastline(&self) -> ModelResult<Option<KdTree>> {
        let coast = self.loader.load_coastline(&self.dir)?;
        if coast.is_empty() {
            return Ok(None);
        }
        let extent = covering(self.extent, &coast.polygons);
        Ok(Some(KdTree::build(coast.polygons, coast.table, extent, self.index)?))
    }
}

/// `extent` grown to hold every edge's first point, so no indexed point lies
/// outside the root rectangle.
fn covering(extent: Rect, edges: &[Arc<Edge>]) -> Rect {
    edges.iter().fold(extent, |rect, edge| rect.include(edge.anchor()))
}
