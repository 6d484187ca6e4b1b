//! Directed routing graph and its builder.
//!
//! # Data layout
//!
//! Links are stored in **Compressed Sparse Row (CSR)** form.  The outgoing
//! links of `NodeId n` occupy
//!
//! ```text
//! links[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! Within one node's slice, links keep the order in which their edges were
//! added, so equal-cost ties during a search resolve the same way on every
//! run.
//!
//! Each link refers back to the [`Edge`] it was derived from by `EdgeId`
//! (position in [`RoutingGraph::edges`]); a two-way edge yields two links
//! sharing one `EdgeId`.

use std::ops::Range;
use std::sync::Arc;

use map_core::{Edge, EdgeId, NodeId};

use crate::Metric;

// ── Link ──────────────────────────────────────────────────────────────────────

/// One traversable direction of an edge.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Link {
    pub from:       NodeId,
    pub to:         NodeId,
    pub edge:       EdgeId,
    /// Metres.
    pub length:     f32,
    /// Minutes.
    pub drive_time: f32,
}

impl Link {
    /// Weight of this link under `metric`.
    #[inline]
    pub fn weight(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Length    => self.length as f64,
            Metric::DriveTime => self.drive_time as f64,
        }
    }
}

// ── RoutingGraph ──────────────────────────────────────────────────────────────

/// Frozen directed road graph.
///
/// Do not construct directly; use [`RoutingGraphBuilder`].
#[derive(Debug, Clone)]
pub struct RoutingGraph {
    /// CSR row pointer.  Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    /// All links, grouped by source node.
    pub links: Vec<Link>,

    edges: Vec<Arc<Edge>>,
}

impl RoutingGraph {
    /// A graph with no nodes; every search against it fails.
    pub fn empty() -> Self {
        RoutingGraphBuilder::new().build()
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_out_start.len().saturating_sub(1)
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_count() == 0
    }

    /// `true` if `node` has a row in the graph (it may still have no links).
    pub fn contains(&self, node: NodeId) -> bool {
        node.index() < self.node_count()
    }

    // ── Traversal ─────────────────────────────────────────────────────────

    /// Positions in [`links`](Self::links) of `node`'s outgoing links.
    ///
    /// Empty for nodes outside the graph.
    #[inline]
    pub fn out_range(&self, node: NodeId) -> Range<usize> {
        if !self.contains(node) {
            return 0..0;
        }
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        start..end
    }

    #[inline]
    pub fn out_links(&self, node: NodeId) -> &[Link] {
        &self.links[self.out_range(node)]
    }

    pub fn out_degree(&self, node: NodeId) -> usize {
        self.out_range(node).len()
    }

    /// Edge that produced links carrying `id`.
    pub fn edge(&self, id: EdgeId) -> Option<&Arc<Edge>> {
        self.edges.get(id.index())
    }

    pub fn edges(&self) -> &[Arc<Edge>] {
        &self.edges
    }
}

impl Default for RoutingGraph {
    fn default() -> Self {
        Self::empty()
    }
}

// ── RoutingGraphBuilder ───────────────────────────────────────────────────────

/// Accumulates links batch by batch, then freezes into a [`RoutingGraph`].
///
/// The builder is append-only: nothing added is ever removed.  Node ids
/// beyond the announced node count grow the graph.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use map_core::{Edge, Node, NodeId, NodeTable, OneWay, RoadType};
/// use map_routing::RoutingGraphBuilder;
///
/// let table: NodeTable = [
///     Node::new(NodeId(0), 0.0, 0.0),
///     Node::new(NodeId(1), 100.0, 0.0),
/// ]
/// .into_iter()
/// .collect();
/// let edge = Edge::road(
///     RoadType::Residential, None, 100.0, 0.2, OneWay::None,
///     vec![NodeId(0), NodeId(1)], &table,
/// )
/// .unwrap();
///
/// let mut b = RoutingGraphBuilder::with_nodes(table.slot_count());
/// b.add_edge(Arc::new(edge));
/// let graph = b.build();
/// assert_eq!(graph.node_count(), 2);
/// assert_eq!(graph.link_count(), 2); // two-way
/// ```
#[derive(Debug, Default)]
pub struct RoutingGraphBuilder {
    node_count: usize,
    links:      Vec<Link>,
    edges:      Vec<Arc<Edge>>,
}

impl RoutingGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with room for node ids `0..node_count`.
    pub fn with_nodes(node_count: usize) -> Self {
        Self { node_count, ..Self::default() }
    }

    /// Add the links implied by `edge`'s one-way restriction.
    ///
    /// Returns the edge's id, or `None` when the edge's road type is not
    /// routable (pedestrian ways, coastline).
    pub fn add_edge(&mut self, edge: Arc<Edge>) -> Option<EdgeId> {
        if !edge.is_routable() {
            return None;
        }
        let id = EdgeId(self.edges.len() as u32);
        let (first, last) = (edge.from(), edge.to());
        self.node_count = self.node_count.max(first.index() + 1).max(last.index() + 1);

        let link = |from, to| Link {
            from,
            to,
            edge: id,
            length: edge.length,
            drive_time: edge.drive_time,
        };
        if edge.one_way.allows_forward() {
            self.links.push(link(first, last));
        }
        if edge.one_way.allows_backward() {
            self.links.push(link(last, first));
        }
        self.edges.push(edge);
        Some(id)
    }

    /// Add every edge of one loaded batch.  Returns how many were routable.
    pub fn add_batch<I>(&mut self, batch: I) -> usize
    where
        I: IntoIterator<Item = Arc<Edge>>,
    {
        batch.into_iter().filter_map(|edge| self.add_edge(edge)).count()
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Consume the builder and produce a [`RoutingGraph`].
    ///
    /// O(L log L) for the link sort, where L = links.
    pub fn build(self) -> RoutingGraph {
        let node_count = self.node_count;

        // Stable: links of one node keep their insertion order.
        let mut links = self.links;
        links.sort_by_key(|l| l.from.0);

        let mut node_out_start = vec![0u32; node_count + 1];
        for l in &links {
            node_out_start[l.from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, links.len());

        log::debug!(
            "froze routing graph: {node_count} nodes, {} links, {} edges",
            links.len(),
            self.edges.len()
        );
        RoutingGraph { node_out_start, links, edges: self.edges }
    }
}
