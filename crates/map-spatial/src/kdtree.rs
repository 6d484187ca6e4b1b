//! Two-dimensional KD-tree over road edges.
//!
//! # Construction
//!
//! Each tree node covers a rectangle (the dataset extent at the root).  It
//! splits on the rectangle's longer axis (`Y` on ties), takes the middle
//! element of its batch *by position* as the pivot, and partitions the rest
//! by comparing each edge's first polyline point against the pivot's first
//! point on that axis:
//!
//! ```text
//! low  : anchor(edge)[axis] <  anchor(pivot)[axis]
//! high : anchor(edge)[axis] >= anchor(pivot)[axis]
//! ```
//!
//! Children get the two halves of the parent rectangle cut at the pivot's
//! coordinate.  There is no median search, so the tree's balance depends on
//! the order the batch arrives in.
//!
//! # Queries
//!
//! An edge is indexed by a single point but drawn as a polyline, so range
//! queries pad the query rectangle by a slack margin before pruning.  A node
//! is pruned only when the padded query misses its rectangle on the node's
//! split axis; otherwise both children are visited.

use std::sync::Arc;

use map_core::{Axis, Edge, IndexConfig, NodeTable, Point, Rect};

use crate::{SpatialError, SpatialResult};

/// Read-only spatial index over one batch of edges.
///
/// Built once, then shared freely between threads (`Send + Sync`).
#[derive(Debug)]
pub struct KdTree {
    pub(crate) root:   KdNode,
    pub(crate) table:  Arc<NodeTable>,
    pub(crate) config: IndexConfig,
    len:               usize,
    extent:            Rect,
}

#[derive(Debug)]
pub(crate) struct KdNode {
    pub(crate) rect:  Rect,
    pub(crate) axis:  Axis,
    pub(crate) pivot: Arc<Edge>,
    pub(crate) low:   Option<Box<KdNode>>,
    pub(crate) high:  Option<Box<KdNode>>,
}

impl KdTree {
    /// Build a tree over `edges` covering `extent`.
    ///
    /// `table` must be the node table the edges were resolved against; it is
    /// kept for polyline distance computations.
    ///
    /// # Errors
    ///
    /// - [`SpatialError::EmptyBatch`] if `edges` is empty.
    /// - [`SpatialError::Config`] if `config` fails validation.
    pub fn build(
        edges:  Vec<Arc<Edge>>,
        table:  Arc<NodeTable>,
        extent: Rect,
        config: IndexConfig,
    ) -> SpatialResult<KdTree> {
        if edges.is_empty() {
            return Err(SpatialError::EmptyBatch);
        }
        config.validate()?;

        let len = edges.len();
        let root = KdNode::build(edges, extent);
        let tree = KdTree { root, table, config, len, extent };
        log::debug!("built KD-tree over {len} edges, depth {}", tree.depth());
        Ok(tree)
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    /// Number of indexed edges.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always `false`: construction rejects empty batches.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Rectangle the root node covers.
    pub fn extent(&self) -> Rect {
        self.extent
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Node table backing the indexed polylines.
    pub fn table(&self) -> &Arc<NodeTable> {
        &self.table
    }

    /// Pivot of the root node.
    pub fn root_pivot(&self) -> &Arc<Edge> {
        &self.root.pivot
    }

    /// Number of levels (a single pivot has depth 1).
    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    /// Every indexed edge, in-order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Edge>> + '_ {
        let mut out = Vec::with_capacity(self.len);
        self.root.collect_all(&mut out);
        out.into_iter()
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Edges that may be visible inside `query`.
    ///
    /// Every edge whose first point lies within `query` padded by the slack
    /// is returned; no edge whose padded bounding box misses `query` is.
    /// Results come in-order (low subtree, pivot, high subtree) and contain
    /// each edge at most once.
    pub fn range_query(&self, query: &Rect) -> Vec<&Arc<Edge>> {
        let padded = query.expand(self.config.slack);
        let mut out = Vec::new();
        self.root.collect_range(query, &padded, self.config.slack, &mut out);
        out
    }

    /// Closest edge to `p` within the nearest threshold.
    pub fn nearest_edge(&self, p: Point) -> Option<&Arc<Edge>> {
        self.nearest_with_distance(p).map(|(edge, _)| edge)
    }

    /// Like [`nearest_edge`](Self::nearest_edge), also reporting the true
    /// point-to-polyline distance.
    ///
    /// Candidates come from a range query over the threshold disc's bounding
    /// square, so an edge within the threshold is found whether or not the
    /// threshold exceeds the slack.
    pub fn nearest_with_distance(&self, p: Point) -> Option<(&Arc<Edge>, f64)> {
        let threshold = self.config.nearest_threshold;
        let mut best: Option<(&Arc<Edge>, f64)> = None;
        let mut best_dist = threshold;
        for edge in self.range_query(&Rect::from_point(p).expand(threshold)) {
            let d = edge.distance_to(p, &self.table);
            if d < best_dist {
                best_dist = d;
                best = Some((edge, d));
            }
        }
        best
    }
}

impl KdNode {
    /// Recursive construction; `edges` is non-empty.
    fn build(mut edges: Vec<Arc<Edge>>, rect: Rect) -> KdNode {
        let axis = rect.longer_axis();
        let pivot = edges.remove(edges.len() / 2);
        let split = pivot.anchor().coord(axis);

        let (low, high): (Vec<_>, Vec<_>) = edges
            .into_iter()
            .partition(|edge| edge.anchor().coord(axis) < split);
        let (low_rect, high_rect) = rect.split(axis, split);

        KdNode {
            rect,
            axis,
            pivot,
            low:  (!low.is_empty()).then(|| Box::new(KdNode::build(low, low_rect))),
            high: (!high.is_empty()).then(|| Box::new(KdNode::build(high, high_rect))),
        }
    }

    fn depth(&self) -> usize {
        let low = self.low.as_ref().map_or(0, |n| n.depth());
        let high = self.high.as_ref().map_or(0, |n| n.depth());
        1 + low.max(high)
    }

    fn collect_all<'a>(&'a self, out: &mut Vec<&'a Arc<Edge>>) {
        if let Some(low) = &self.low {
            low.collect_all(out);
        }
        out.push(&self.pivot);
        if let Some(high) = &self.high {
            high.collect_all(out);
        }
    }

    fn collect_range<'a>(
        &'a self,
        query:  &Rect,
        padded: &Rect,
        slack:  f64,
        out:    &mut Vec<&'a Arc<Edge>>,
    ) {
        if !padded.overlaps_on(self.axis, &self.rect) {
            return;
        }
        if let Some(low) = &self.low {
            low.collect_range(query, padded, slack, out);
        }
        if self.pivot.bbox().expand(slack).intersects(query) {
            out.push(&self.pivot);
        }
        if let Some(high) = &self.high {
            high.collect_range(query, padded, slack, out);
        }
    }
}
