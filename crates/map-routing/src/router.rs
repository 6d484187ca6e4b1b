//! Routing trait and default Dijkstra implementation.
//!
//! # Pluggability
//!
//! Callers go through the [`Router`] trait, so a different search (A*,
//! contraction hierarchies) can replace [`DijkstraRouter`] without touching
//! the model.
//!
//! # Full trees
//!
//! A search settles every node reachable from the source instead of stopping
//! at a target.  The resulting [`ShortestPathTree`] answers `path_to` for any
//! target, which is what lets [`CachedRouter`](crate::CachedRouter) serve a
//! new destination without searching again.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use map_core::NodeId;

use crate::graph::RoutingGraph;
use crate::route::{Route, RouteStep};
use crate::{Metric, RoutingError, RoutingResult};

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable single-source shortest-path engine.
///
/// Implementations must be `Send + Sync` so a model holding one can be
/// shared across threads.
pub trait Router: Send + Sync {
    /// Settle every node reachable from `source` under `metric`.
    fn search(
        &self,
        graph:  &RoutingGraph,
        source: NodeId,
        metric: Metric,
    ) -> RoutingResult<ShortestPathTree>;

    /// One-shot route; searches from scratch every call.
    fn route(
        &self,
        graph:  &RoutingGraph,
        source: NodeId,
        target: NodeId,
        metric: Metric,
    ) -> RoutingResult<Route> {
        self.search(graph, source, metric)?.path_to(graph, target)
    }
}

// ── ShortestPathTree ──────────────────────────────────────────────────────────

/// Settled distances and predecessor links from one source.
#[derive(Debug, Clone)]
pub struct ShortestPathTree {
    source: NodeId,
    metric: Metric,
    /// `f64::INFINITY` for unreached nodes.
    dist:   Vec<f64>,
    /// Index into `RoutingGraph::links` of the link that settled each node.
    prev:   Vec<Option<u32>>,
}

impl ShortestPathTree {
    pub fn source(&self) -> NodeId {
        self.source
    }

    pub fn metric(&self) -> Metric {
        self.metric
    }

    /// `true` if `target` was settled.
    pub fn has_path_to(&self, target: NodeId) -> bool {
        self.distance_to(target).is_some()
    }

    /// Settled cost of `target`, if reached.
    pub fn distance_to(&self, target: NodeId) -> Option<f64> {
        self.dist
            .get(target.index())
            .copied()
            .filter(|d| d.is_finite())
    }

    /// Number of settled nodes, the source included.
    pub fn reached(&self) -> usize {
        self.dist.iter().filter(|d| d.is_finite()).count()
    }

    /// Walk predecessor links back from `target` and return the traversed
    /// edges in source-to-target order.
    ///
    /// `graph` must be the graph this tree was computed on.
    pub fn path_to(&self, graph: &RoutingGraph, target: NodeId) -> RoutingResult<Route> {
        if target.index() >= self.dist.len() {
            return Err(RoutingError::NodeOutOfRange {
                node:       target,
                node_count: self.dist.len(),
            });
        }
        let cost = self
            .distance_to(target)
            .ok_or(RoutingError::NoPath { from: self.source, to: target })?;

        let mut steps = Vec::new();
        let mut cur = target;
        while let Some(link_idx) = self.prev[cur.index()] {
            let link = &graph.links[link_idx as usize];
            let edge = graph
                .edge(link.edge)
                .ok_or(RoutingError::NoPath { from: self.source, to: target })?;
            steps.push(RouteStep {
                edge_id: link.edge,
                edge:    edge.clone(),
                from:    link.from,
                to:      link.to,
            });
            cur = link.from;
        }
        steps.reverse();

        Ok(Route {
            source: self.source,
            target,
            metric: self.metric,
            steps,
            cost,
        })
    }
}

// ── DijkstraRouter ────────────────────────────────────────────────────────────

/// Label-setting Dijkstra over the CSR graph.
///
/// Frontier entries with equal cost are settled in the order they were
/// pushed.
#[derive(Debug, Default, Clone, Copy)]
pub struct DijkstraRouter;

impl Router for DijkstraRouter {
    fn search(
        &self,
        graph:  &RoutingGraph,
        source: NodeId,
        metric: Metric,
    ) -> RoutingResult<ShortestPathTree> {
        dijkstra(graph, source, metric)
    }
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq)]
enum Label {
    Unvisited,
    Frontier,
    Settled,
}

/// Priority queue entry.  `seq` is the push order and breaks cost ties.
#[derive(Copy, Clone)]
struct QueueEntry {
    cost: f64,
    seq:  u64,
    node: NodeId,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry {}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed on both keys: BinaryHeap is a max-heap.
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn dijkstra(
    graph:  &RoutingGraph,
    source: NodeId,
    metric: Metric,
) -> RoutingResult<ShortestPathTree> {
    let n = graph.node_count();
    if !graph.contains(source) {
        return Err(RoutingError::NodeOutOfRange { node: source, node_count: n });
    }

    let mut dist  = vec![f64::INFINITY; n];
    let mut prev  = vec![None; n];
    let mut label = vec![Label::Unvisited; n];

    let mut seq = 0u64;
    let mut heap = BinaryHeap::new();
    dist[source.index()] = 0.0;
    label[source.index()] = Label::Frontier;
    heap.push(QueueEntry { cost: 0.0, seq, node: source });

    let mut settled = 0usize;
    while let Some(QueueEntry { cost, node, .. }) = heap.pop() {
        // Stale entry for a node already settled at a lower cost.
        if label[node.index()] == Label::Settled {
            continue;
        }
        label[node.index()] = Label::Settled;
        settled += 1;

        for i in graph.out_range(node) {
            let link = &graph.links[i];
            let next = link.to.index();
            if label[next] == Label::Settled {
                continue;
            }
            let new_cost = cost + link.weight(metric);
            if new_cost < dist[next] {
                dist[next] = new_cost;
                prev[next] = Some(i as u32);
                label[next] = Label::Frontier;
                seq += 1;
                heap.push(QueueEntry { cost: new_cost, seq, node: link.to });
            }
        }
    }

    log::trace!("dijkstra from {source} by {metric}: settled {settled} of {n} nodes");
    Ok(ShortestPathTree { source, metric, dist, prev })
}
