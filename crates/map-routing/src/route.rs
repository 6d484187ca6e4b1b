//! A reconstructed shortest path.

use std::sync::Arc;

use map_core::{Edge, EdgeId, NodeId};

use crate::Metric;

/// One traversed edge and the direction it was traversed in.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteStep {
    pub edge_id: EdgeId,
    pub edge:    Arc<Edge>,
    pub from:    NodeId,
    pub to:      NodeId,
}

impl RouteStep {
    /// `true` if the edge was traversed last-to-first.
    pub fn is_reversed(&self) -> bool {
        self.from != self.edge.from() || self.to != self.edge.to()
    }
}

/// Result of a routing query: the edges to traverse in order plus the
/// settled cost under the metric that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub source: NodeId,
    pub target: NodeId,
    pub metric: Metric,
    pub steps:  Vec<RouteStep>,
    /// Sum of the traversed link weights under `metric`.
    pub cost:   f64,
}

impl Route {
    /// `true` if the source and target are the same node.
    pub fn is_trivial(&self) -> bool {
        self.steps.is_empty()
    }

    /// Node sequence from source to target, inclusive.
    pub fn nodes(&self) -> Vec<NodeId> {
        let mut nodes = Vec::with_capacity(self.steps.len() + 1);
        nodes.push(self.source);
        nodes.extend(self.steps.iter().map(|s| s.to));
        nodes
    }

    /// Traversed edges in order.
    pub fn edges(&self) -> impl Iterator<Item = &Arc<Edge>> + '_ {
        self.steps.iter().map(|s| &s.edge)
    }

    /// Total length in metres, whatever the metric.
    pub fn total_length(&self) -> f64 {
        self.steps.iter().map(|s| s.edge.length as f64).sum()
    }

    /// Total drive time in minutes, whatever the metric.
    pub fn total_drive_time(&self) -> f64 {
        self.steps.iter().map(|s| s.edge.drive_time as f64).sum()
    }
}
