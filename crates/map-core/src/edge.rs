//! Road edges.
//!
//! An `Edge` is one road segment as stored in the dataset: a polyline of at
//! least two nodes with a name, a category, two weights and a one-way flag.
//! Only the first and last polyline nodes are graph endpoints; interior
//! nodes are geometry.
//!
//! Derived geometry (bounding box, centroid, first point) is computed once at
//! construction from the node table and cached, since every spatial query
//! touches it.

use std::sync::Arc;

use crate::{CoreError, CoreResult, NodeId, NodeTable, OneWay, Point, Rect, RoadType};

/// One road segment (or, for [`RoadType::Coastline`], one closed polygon).
#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
    pub road_type:  RoadType,
    /// Interned road name; `None` for unnamed roads and coastline.
    pub name:       Option<Arc<str>>,
    /// Physical length in metres.
    pub length:     f32,
    /// Drive time in minutes.
    pub drive_time: f32,
    pub one_way:    OneWay,
    nodes:          Vec<NodeId>,
    closed:         bool,
    anchor:         Point,
    bbox:           Rect,
    centroid:       Point,
}

impl Edge {
    /// Build a routable road edge.
    ///
    /// # Errors
    ///
    /// - [`CoreError::DegeneratePolyline`] for fewer than two nodes.
    /// - [`CoreError::InvalidWeight`] for a negative or non-finite weight.
    /// - [`CoreError::UnknownNode`] if a node id has no entry in `table`.
    pub fn road(
        road_type:  RoadType,
        name:       Option<Arc<str>>,
        length:     f32,
        drive_time: f32,
        one_way:    OneWay,
        nodes:      Vec<NodeId>,
        table:      &NodeTable,
    ) -> CoreResult<Edge> {
        check_weight("length", length)?;
        check_weight("drive time", drive_time)?;
        Self::with_geometry(road_type, name, length, drive_time, one_way, nodes, false, 2, table)
    }

    /// Build a closed coastline polygon (at least three nodes).
    pub fn coastline(nodes: Vec<NodeId>, table: &NodeTable) -> CoreResult<Edge> {
        Self::with_geometry(RoadType::Coastline, None, 0.0, 0.0, OneWay::None, nodes, true, 3, table)
    }

    #[allow(clippy::too_many_arguments)]
    fn with_geometry(
        road_type:  RoadType,
        name:       Option<Arc<str>>,
        length:     f32,
        drive_time: f32,
        one_way:    OneWay,
        nodes:      Vec<NodeId>,
        closed:     bool,
        min_nodes:  usize,
        table:      &NodeTable,
    ) -> CoreResult<Edge> {
        if nodes.len() < min_nodes {
            return Err(CoreError::DegeneratePolyline { len: nodes.len(), min: min_nodes });
        }
        let points = nodes
            .iter()
            .map(|&id| table.pos(id).ok_or(CoreError::UnknownNode(id)))
            .collect::<CoreResult<Vec<Point>>>()?;

        let anchor = points[0];
        let bbox = Rect::enclosing(points.iter().copied()).unwrap_or(Rect::from_point(anchor));

        Ok(Edge {
            road_type,
            name,
            length,
            drive_time,
            one_way,
            nodes,
            closed,
            anchor,
            bbox,
            centroid: bbox.center(),
        })
    }

    // ── Topology ──────────────────────────────────────────────────────────

    /// Polyline node ids in stored order.
    #[inline]
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// First polyline node (graph endpoint).
    #[inline]
    pub fn from(&self) -> NodeId {
        self.nodes[0]
    }

    /// Last polyline node (graph endpoint).
    #[inline]
    pub fn to(&self) -> NodeId {
        self.nodes[self.nodes.len() - 1]
    }

    /// `true` for closed polygons (coastline).
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    #[inline]
    pub fn is_routable(&self) -> bool {
        self.road_type.is_routable()
    }

    /// Road name, or `""` for unnamed edges.
    pub fn name_str(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }

    // ── Geometry ──────────────────────────────────────────────────────────

    /// Position of the first polyline node; the KD-tree partitions on it.
    #[inline]
    pub fn anchor(&self) -> Point {
        self.anchor
    }

    #[inline]
    pub fn bbox(&self) -> Rect {
        self.bbox
    }

    /// Centre of the bounding box.
    #[inline]
    pub fn centroid(&self) -> Point {
        self.centroid
    }

    /// Polyline positions resolved against `table`.
    pub fn points<'a>(&'a self, table: &'a NodeTable) -> impl Iterator<Item = Point> + 'a {
        self.nodes.iter().filter_map(move |&id| table.pos(id))
    }

    /// Shortest distance from `p` to any segment of the polyline.  Closed
    /// polygons also check the closing segment.
    pub fn distance_to(&self, p: Point, table: &NodeTable) -> f64 {
        let points: Vec<Point> = self.points(table).collect();
        let mut best = match points.first() {
            Some(&first) => p.distance(first),
            None => return f64::INFINITY,
        };
        for pair in points.windows(2) {
            best = best.min(p.distance_to_segment(pair[0], pair[1]));
        }
        if self.closed && points.len() > 2 {
            best = best.min(p.distance_to_segment(points[points.len() - 1], points[0]));
        }
        best
    }
}

fn check_weight(what: &'static str, value: f32) -> CoreResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(CoreError::InvalidWeight { what, value })
    }
}
