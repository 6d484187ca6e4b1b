//! The loaded map and its query surface.

use std::sync::Arc;
use std::time::Duration;

use rustc_hash::FxHashMap;

use map_core::{Edge, NodeId, NodeTable, Point, Rect, RoadType};
use map_loader::DatasetInfo;
use map_routing::{CachedRouter, Metric, Route, RoutingError, RoutingGraph};
use map_spatial::KdTree;

use crate::{MapConfig, MapObserver, ModelError, ModelResult, NoopObserver};

// ── Selection ─────────────────────────────────────────────────────────────────

/// Route endpoints chosen so far.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    pub source: Option<NodeId>,
    pub target: Option<NodeId>,
}

impl Selection {
    pub fn is_complete(&self) -> bool {
        self.source.is_some() && self.target.is_some()
    }
}

// ── LoadSummary ───────────────────────────────────────────────────────────────

/// What a load produced.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LoadSummary {
    /// Present nodes in the main node table.
    pub node_count:         usize,
    /// Edges indexed across all road types (coastline excluded).
    pub edge_count:         usize,
    /// Directed links in the routing graph.
    pub arc_count:          usize,
    /// Road types that loaded at least one edge.
    pub batches:            usize,
    /// Road types whose batch failed and was left out.
    pub failed:             Vec<RoadType>,
    pub coastline_polygons: usize,
    pub elapsed:            Duration,
}

// ── MapModel ──────────────────────────────────────────────────────────────────

/// A loaded dataset plus the user's current route selection.
///
/// Build with [`MapModelBuilder`](crate::MapModelBuilder).  Queries borrow
/// immutably; selection, metric and routing calls take `&mut self` and
/// notify the observer once the change is complete.
pub struct MapModel<O: MapObserver = NoopObserver> {
    pub(crate) config:     MapConfig,
    pub(crate) info:       DatasetInfo,
    pub(crate) nodes:      Arc<NodeTable>,
    pub(crate) indices:    FxHashMap<RoadType, KdTree>,
    pub(crate) coastline:  Option<KdTree>,
    pub(crate) graph:      RoutingGraph,
    pub(crate) router:     CachedRouter,
    pub(crate) selection:  Selection,
    pub(crate) metric:     Metric,
    pub(crate) last_route: Option<Route>,
    pub(crate) summary:    LoadSummary,
    pub(crate) observer:   O,
}

impl<O: MapObserver> MapModel<O> {
    // ── Dataset ───────────────────────────────────────────────────────────

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn info(&self) -> &DatasetInfo {
        &self.info
    }

    /// Dataset bounding rectangle from the header.
    pub fn extent(&self) -> Rect {
        self.info.extent()
    }

    pub fn summary(&self) -> &LoadSummary {
        &self.summary
    }

    pub fn nodes(&self) -> &Arc<NodeTable> {
        &self.nodes
    }

    pub fn node_pos(&self, id: NodeId) -> Option<Point> {
        self.nodes.pos(id)
    }

    pub fn graph(&self) -> &RoutingGraph {
        &self.graph
    }

    /// Index for `road_type`, if that type loaded any edges.
    pub fn index(&self, road_type: RoadType) -> Option<&KdTree> {
        self.indices.get(&road_type)
    }

    /// Road types with an index, in [`RoadType::ALL`] order.
    pub fn road_types(&self) -> impl Iterator<Item = RoadType> + '_ {
        RoadType::ALL
            .into_iter()
            .filter(|rt| self.indices.contains_key(rt))
    }

    // ── Range queries ─────────────────────────────────────────────────────

    /// Edges of `road_type` that may be visible in `rect`.
    pub fn edges_in(&self, road_type: RoadType, rect: &Rect) -> Vec<&Arc<Edge>> {
        self.index(road_type)
            .map(|tree| tree.range_query(rect))
            .unwrap_or_default()
    }

    /// Coastline polygons that may be visible in `rect`.
    pub fn coastline_in(&self, rect: &Rect) -> Vec<&Arc<Edge>> {
        self.coastline
            .as_ref()
            .map(|tree| tree.range_query(rect))
            .unwrap_or_default()
    }

    /// Node table the coastline polygons refer to.
    pub fn coastline_nodes(&self) -> Option<&Arc<NodeTable>> {
        self.coastline.as_ref().map(KdTree::table)
    }

    // ── Nearest edge ──────────────────────────────────────────────────────

    /// Closest selectable edge to `p` across all road types.
    ///
    /// With `zoom` set, only road types visible at that zoom factor are
    /// considered.
    pub fn nearest_edge(&self, p: Point, zoom: Option<f64>) -> Option<&Arc<Edge>> {
        self.nearest_with_distance(p, zoom).map(|(edge, _)| edge)
    }

    /// Like [`nearest_edge`](Self::nearest_edge), also reporting the
    /// point-to-polyline distance.
    pub fn nearest_with_distance(&self, p: Point, zoom: Option<f64>) -> Option<(&Arc<Edge>, f64)> {
        self.nearest_among(p, |rt| rt.is_selectable() && zoom.is_none_or(|z| rt.is_visible(z)))
    }

    /// Name of the road nearest to `p`; `None` if there is no road in reach
    /// or it is unnamed.
    pub fn road_name_at(&self, p: Point, zoom: Option<f64>) -> Option<&str> {
        self.nearest_edge(p, zoom).and_then(|edge| edge.name.as_deref())
    }

    /// Strict `<` keeps the first hit in `RoadType::ALL` order on ties.
    fn nearest_among<F>(&self, p: Point, keep: F) -> Option<(&Arc<Edge>, f64)>
    where
        F: Fn(RoadType) -> bool,
    {
        let mut best: Option<(&Arc<Edge>, f64)> = None;
        for rt in RoadType::ALL.into_iter().filter(|&rt| keep(rt)) {
            let Some(tree) = self.indices.get(&rt) else { continue };
            if let Some((edge, d)) = tree.nearest_with_distance(p) {
                if best.is_none_or(|(_, best_d)| d < best_d) {
                    best = Some((edge, d));
                }
            }
        }
        best
    }

    /// Graph node to use for a click at `p`: whichever end of the nearest
    /// routable edge is closer.
    fn snap(&self, p: Point) -> ModelResult<NodeId> {
        let (edge, _) = self
            .nearest_among(p, |rt| rt.is_selectable() && rt.is_routable())
            .ok_or(ModelError::NoNearbyPoint(p))?;
        let (first, last) = (edge.from(), edge.to());
        let dist = |id| self.nodes.pos(id).map_or(f64::INFINITY, |q| q.distance(p));
        Ok(if dist(last) < dist(first) { last } else { first })
    }

    // ── Selection ─────────────────────────────────────────────────────────

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Select the route start nearest to `p`.
    ///
    /// # Errors
    ///
    /// [`ModelError::NoNearbyPoint`] if no routable road is within the
    /// nearest threshold; the previous source is kept.
    pub fn set_source(&mut self, p: Point) -> ModelResult<NodeId> {
        let node = self.snap(p)?;
        self.selection.source = Some(node);
        log::debug!("source set to {node}");
        self.observer.on_selection_changed(&self.selection);
        Ok(node)
    }

    /// Select the route end nearest to `p`.  See [`set_source`](Self::set_source).
    pub fn set_target(&mut self, p: Point) -> ModelResult<NodeId> {
        let node = self.snap(p)?;
        self.selection.target = Some(node);
        log::debug!("target set to {node}");
        self.observer.on_selection_changed(&self.selection);
        Ok(node)
    }

    /// Forget both endpoints and the last route.
    pub fn clear_selection(&mut self) {
        self.selection = Selection::default();
        self.last_route = None;
        self.observer.on_selection_changed(&self.selection);
    }

    pub fn metric(&self) -> Metric {
        self.metric
    }

    /// Switch the metric used by the next [`route`](Self::route) call.
    pub fn set_metric(&mut self, metric: Metric) {
        if metric == self.metric {
            return;
        }
        self.metric = metric;
        self.observer.on_metric_changed(metric);
    }

    // ── Routing ───────────────────────────────────────────────────────────

    /// Shortest path between the selected endpoints under the active metric.
    ///
    /// Repeated calls with an unchanged source and metric reuse the last
    /// shortest-path tree.
    ///
    /// # Errors
    ///
    /// - [`ModelError::NoSelection`] unless both endpoints are set.
    /// - [`ModelError::NoPath`] if the target is unreachable.
    pub fn route(&mut self) -> ModelResult<&Route> {
        let (Some(source), Some(target)) = (self.selection.source, self.selection.target) else {
            return Err(ModelError::NoSelection);
        };

        let before = self.router.recomputations();
        let route = self
            .router
            .route(&self.graph, source, target, self.metric)
            .map_err(|e| match e {
                RoutingError::NoPath { from, to } => ModelError::NoPath { from, to },
                other => ModelError::Routing(other),
            })?;
        if self.router.recomputations() == before {
            log::debug!("route {source} -> {target} served from cached tree");
        } else {
            log::debug!("route {source} -> {target}: new search by {}", self.metric);
        }

        self.observer.on_route_computed(&route);
        Ok(self.last_route.insert(route))
    }

    /// Select both endpoints and route between them.
    pub fn route_between(&mut self, from: Point, to: Point) -> ModelResult<&Route> {
        self.set_source(from)?;
        self.set_target(to)?;
        self.route()
    }

    /// Most recent successful route, until the selection is cleared.
    pub fn last_route(&self) -> Option<&Route> {
        self.last_route.as_ref()
    }

    pub fn router(&self) -> &CachedRouter {
        &self.router
    }

    // ── Observer ──────────────────────────────────────────────────────────

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }
}
