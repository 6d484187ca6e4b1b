//! Shortest-path tree cache keyed on `(source, metric)`.

use map_core::NodeId;

use crate::graph::RoutingGraph;
use crate::route::Route;
use crate::router::{DijkstraRouter, Router, ShortestPathTree};
use crate::{Metric, RoutingResult};

/// Wraps a [`Router`] and keeps the most recent [`ShortestPathTree`].
///
/// A query reuses the kept tree when its source and metric both match the
/// previous query; changing either triggers a fresh search.  The cache is
/// not tied to a particular graph: call [`invalidate`](Self::invalidate)
/// before querying a different one.
#[derive(Debug, Default)]
pub struct CachedRouter<R = DijkstraRouter> {
    inner:          R,
    tree:           Option<ShortestPathTree>,
    recomputations: u64,
}

impl CachedRouter<DijkstraRouter> {
    pub fn new() -> Self {
        Self::with_router(DijkstraRouter)
    }
}

impl<R: Router> CachedRouter<R> {
    pub fn with_router(inner: R) -> Self {
        Self { inner, tree: None, recomputations: 0 }
    }

    /// Tree for `(source, metric)`, searching only on a cache miss.
    pub fn tree(
        &mut self,
        graph:  &RoutingGraph,
        source: NodeId,
        metric: Metric,
    ) -> RoutingResult<&ShortestPathTree> {
        let tree = match self.tree.take() {
            Some(tree) if tree.source() == source && tree.metric() == metric => tree,
            _ => {
                let tree = self.inner.search(graph, source, metric)?;
                self.recomputations += 1;
                tree
            }
        };
        Ok(self.tree.insert(tree))
    }

    /// Shortest path from `source` to `target` under `metric`.
    pub fn route(
        &mut self,
        graph:  &RoutingGraph,
        source: NodeId,
        target: NodeId,
        metric: Metric,
    ) -> RoutingResult<Route> {
        self.tree(graph, source, metric)?.path_to(graph, target)
    }

    /// Drop the kept tree; the next query searches.
    pub fn invalidate(&mut self) {
        self.tree = None;
    }

    /// `(source, metric)` of the kept tree, if any.
    pub fn cached_key(&self) -> Option<(NodeId, Metric)> {
        self.tree.as_ref().map(|t| (t.source(), t.metric()))
    }

    /// Number of searches run so far.
    pub fn recomputations(&self) -> u64 {
        self.recomputations
    }

    pub fn router(&self) -> &R {
        &self.inner
    }
}
