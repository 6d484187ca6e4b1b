//! Unit tests for map-routing.
//!
//! Networks are hand-built from `Edge::road` records so the tests run
//! without any dataset on disk.

#[cfg(test)]
mod helpers {
    use std::sync::Arc;

    use map_core::{Edge, Node, NodeId, NodeTable, OneWay, RoadType};

    use crate::{RoutingGraph, RoutingGraphBuilder};

    /// `(first, last, length, drive_time, one_way)`
    pub type Spec = (u32, u32, f32, f32, OneWay);

    pub fn graph_from(coords: &[(u32, f32, f32)], edges: &[Spec]) -> RoutingGraph {
        graph_with_type(coords, edges, RoadType::Residential)
    }

    pub fn graph_with_type(coords: &[(u32, f32, f32)], edges: &[Spec], rt: RoadType) -> RoutingGraph {
        let table: NodeTable = coords
            .iter()
            .map(|&(id, x, y)| Node::new(NodeId(id), x, y))
            .collect();
        let mut b = RoutingGraphBuilder::with_nodes(table.slot_count());
        for &(a, z, length, drive_time, one_way) in edges {
            let edge = Edge::road(rt, None, length, drive_time, one_way, vec![NodeId(a), NodeId(z)], &table)
                .unwrap();
            b.add_edge(Arc::new(edge));
        }
        b.build()
    }

    /// Square with a diagonal shortcut by length and a slow side by time.
    ///
    /// ```text
    ///   4 ──(10, 5)── 3
    ///   │             │
    /// (14, 2)      (10, 1)
    ///   │             │
    ///   1 ──(10, 1)─→ 2
    /// ```
    ///
    /// Labels are `(length, drive_time)`; 1→2 is one-way.
    pub fn square() -> RoutingGraph {
        graph_from(
            &[(1, 0.0, 0.0), (2, 10.0, 0.0), (3, 10.0, 10.0), (4, 0.0, 10.0)],
            &[
                (1, 2, 10.0, 1.0, OneWay::ForwardOnly),
                (2, 3, 10.0, 1.0, OneWay::None),
                (3, 4, 10.0, 5.0, OneWay::None),
                (1, 4, 14.0, 2.0, OneWay::None),
            ],
        )
    }
}

// ── Graph construction ────────────────────────────────────────────────────────

#[cfg(test)]
mod graph {
    use std::sync::Arc;

    use map_core::{Edge, EdgeId, Node, NodeId, NodeTable, OneWay, RoadType};

    use super::helpers::{graph_from, graph_with_type, square};
    use crate::{Metric, RoutingGraph, RoutingGraphBuilder};

    #[test]
    fn empty_graph() {
        let g = RoutingGraph::empty();
        assert_eq!(g.node_count(), 0);
        assert_eq!(g.link_count(), 0);
        assert!(g.is_empty());
        assert!(g.out_links(NodeId(3)).is_empty());
    }

    #[test]
    fn one_way_controls_link_directions() {
        let g = square();
        // 1→2 forward only, the other three both ways.
        assert_eq!(g.edge_count(), 4);
        assert_eq!(g.link_count(), 7);
        assert!(g.out_links(NodeId(2)).iter().all(|l| l.to != NodeId(1)));
        assert!(g.out_links(NodeId(1)).iter().any(|l| l.to == NodeId(2)));
    }

    #[test]
    fn backward_only_reverses() {
        let g = graph_from(
            &[(0, 0.0, 0.0), (1, 1.0, 0.0)],
            &[(0, 1, 1.0, 1.0, OneWay::BackwardOnly)],
        );
        assert_eq!(g.link_count(), 1);
        assert!(g.out_links(NodeId(0)).is_empty());
        assert_eq!(g.out_links(NodeId(1))[0].to, NodeId(0));
    }

    #[test]
    fn links_follow_one_way_predicates() {
        for one_way in [OneWay::None, OneWay::ForwardOnly, OneWay::BackwardOnly] {
            let g = graph_from(&[(0, 0.0, 0.0), (1, 1.0, 0.0)], &[(0, 1, 1.0, 1.0, one_way)]);
            assert_eq!(g.out_degree(NodeId(0)) == 1, one_way.allows_forward(), "{one_way:?}");
            assert_eq!(g.out_degree(NodeId(1)) == 1, one_way.allows_backward(), "{one_way:?}");
        }
    }

    #[test]
    fn links_share_edge_id_and_weights() {
        let g = square();
        let l = g.out_links(NodeId(4)).iter().find(|l| l.to == NodeId(1)).unwrap();
        let back = g.out_links(NodeId(1)).iter().find(|l| l.to == NodeId(4)).unwrap();
        assert_eq!(l.edge, back.edge);
        assert_eq!(l.weight(Metric::Length), 14.0);
        assert_eq!(l.weight(Metric::DriveTime), 2.0);
        assert_eq!(g.edge(l.edge).unwrap().length, 14.0);
        assert!(g.edge(EdgeId(99)).is_none());
    }

    #[test]
    fn pedestrian_and_coastline_excluded() {
        let g = graph_with_type(
            &[(0, 0.0, 0.0), (1, 1.0, 0.0)],
            &[(0, 1, 1.0, 1.0, OneWay::None)],
            RoadType::Pedestrian,
        );
        assert_eq!(g.link_count(), 0);
        assert_eq!(g.edge_count(), 0);

        let table: NodeTable = [
            Node::new(NodeId(0), 0.0, 0.0),
            Node::new(NodeId(1), 1.0, 0.0),
            Node::new(NodeId(2), 1.0, 1.0),
        ]
        .into_iter()
        .collect();
        let coast = Edge::coastline(vec![NodeId(0), NodeId(1), NodeId(2)], &table).unwrap();
        let mut b = RoutingGraphBuilder::new();
        assert_eq!(b.add_edge(Arc::new(coast)), None);
    }

    #[test]
    fn ids_beyond_announced_count_grow_graph() {
        let table: NodeTable = [Node::new(NodeId(0), 0.0, 0.0), Node::new(NodeId(9), 1.0, 1.0)]
            .into_iter()
            .collect();
        let edge = Edge::road(RoadType::Road, None, 1.0, 1.0, OneWay::None, vec![NodeId(0), NodeId(9)], &table)
            .unwrap();
        let mut b = RoutingGraphBuilder::with_nodes(2);
        b.add_edge(Arc::new(edge));
        assert_eq!(b.node_count(), 10);
        let g = b.build();
        assert_eq!(g.out_degree(NodeId(9)), 1);
    }

    #[test]
    fn csr_keeps_insertion_order_per_node() {
        let g = graph_from(
            &[(0, 0.0, 0.0), (1, 1.0, 0.0), (2, 2.0, 0.0), (3, 3.0, 0.0)],
            &[
                (0, 3, 1.0, 1.0, OneWay::ForwardOnly),
                (1, 2, 1.0, 1.0, OneWay::ForwardOnly),
                (0, 1, 1.0, 1.0, OneWay::ForwardOnly),
                (0, 2, 1.0, 1.0, OneWay::ForwardOnly),
            ],
        );
        let targets: Vec<_> = g.out_links(NodeId(0)).iter().map(|l| l.to).collect();
        assert_eq!(targets, vec![NodeId(3), NodeId(1), NodeId(2)]);
        assert_eq!(g.node_out_start, vec![0, 3, 4, 4, 4]);
    }

    #[test]
    fn add_batch_counts_routable_edges() {
        let table: NodeTable = [Node::new(NodeId(0), 0.0, 0.0), Node::new(NodeId(1), 1.0, 0.0)]
            .into_iter()
            .collect();
        let mk = |rt| {
            Arc::new(
                Edge::road(rt, None, 1.0, 1.0, OneWay::None, vec![NodeId(0), NodeId(1)], &table).unwrap(),
            )
        };
        let mut b = RoutingGraphBuilder::new();
        let added = b.add_batch([mk(RoadType::Primary), mk(RoadType::Pedestrian), mk(RoadType::Ferry)]);
        assert_eq!(added, 2);
        assert_eq!(b.link_count(), 4);
    }
}

// ── Shortest paths ────────────────────────────────────────────────────────────

#[cfg(test)]
mod dijkstra {
    use map_core::{NodeId, OneWay};

    use super::helpers::{graph_from, square};
    use crate::{DijkstraRouter, Metric, Router, RoutingError};

    #[test]
    fn square_by_length() {
        let g = square();
        let route = DijkstraRouter.route(&g, NodeId(1), NodeId(3), Metric::Length).unwrap();
        assert_eq!(route.nodes(), vec![NodeId(1), NodeId(2), NodeId(3)]);
        assert_eq!(route.cost, 20.0);
    }

    #[test]
    fn square_by_drive_time() {
        let g = square();
        let route = DijkstraRouter.route(&g, NodeId(1), NodeId(3), Metric::DriveTime).unwrap();
        assert_eq!(route.nodes(), vec![NodeId(1), NodeId(2), NodeId(3)]);
        assert_eq!(route.cost, 2.0);
    }

    #[test]
    fn direct_edge_beats_detour() {
        let g = square();
        let route = DijkstraRouter.route(&g, NodeId(1), NodeId(4), Metric::Length).unwrap();
        assert_eq!(route.nodes(), vec![NodeId(1), NodeId(4)]);
        assert_eq!(route.cost, 14.0);
        assert_eq!(route.steps.len(), 1);
        assert_eq!(route.total_length(), 14.0);
    }

    #[test]
    fn one_way_blocks_reverse_direction() {
        let g = square();
        // 2→1 is forbidden, so the route must go round via 3 and 4.
        let route = DijkstraRouter.route(&g, NodeId(2), NodeId(1), Metric::Length).unwrap();
        assert_eq!(route.nodes(), vec![NodeId(2), NodeId(3), NodeId(4), NodeId(1)]);
        assert_eq!(route.cost, 34.0);
        assert!(route.steps.iter().all(|s| s.edge.length > 0.0));
    }

    #[test]
    fn reversed_step_reports_direction() {
        let g = square();
        let route = DijkstraRouter.route(&g, NodeId(4), NodeId(1), Metric::Length).unwrap();
        let step = &route.steps[0];
        assert_eq!((step.from, step.to), (NodeId(4), NodeId(1)));
        assert!(step.is_reversed());
    }

    #[test]
    fn same_source_and_target_is_trivial() {
        let g = square();
        let route = DijkstraRouter.route(&g, NodeId(3), NodeId(3), Metric::DriveTime).unwrap();
        assert!(route.is_trivial());
        assert_eq!(route.cost, 0.0);
        assert_eq!(route.nodes(), vec![NodeId(3)]);
    }

    #[test]
    fn disconnected_is_no_path() {
        let g = graph_from(
            &[(0, 0.0, 0.0), (1, 1.0, 0.0), (2, 5.0, 5.0), (3, 6.0, 5.0)],
            &[(0, 1, 1.0, 1.0, OneWay::None), (2, 3, 1.0, 1.0, OneWay::None)],
        );
        let tree = DijkstraRouter.search(&g, NodeId(0), Metric::Length).unwrap();
        assert!(tree.has_path_to(NodeId(1)));
        assert!(!tree.has_path_to(NodeId(3)));
        assert_eq!(tree.reached(), 2);
        assert_eq!(
            tree.path_to(&g, NodeId(3)),
            Err(RoutingError::NoPath { from: NodeId(0), to: NodeId(3) })
        );
    }

    #[test]
    fn absent_slot_has_no_path() {
        // Slot 0 of the square graph holds no node.
        let g = square();
        let tree = DijkstraRouter.search(&g, NodeId(1), Metric::Length).unwrap();
        assert!(!tree.has_path_to(NodeId(0)));
    }

    #[test]
    fn out_of_range_source_and_target() {
        let g = square();
        let err = DijkstraRouter.search(&g, NodeId(50), Metric::Length).unwrap_err();
        assert_eq!(err, RoutingError::NodeOutOfRange { node: NodeId(50), node_count: 5 });

        let tree = DijkstraRouter.search(&g, NodeId(1), Metric::Length).unwrap();
        assert!(matches!(
            tree.path_to(&g, NodeId(50)),
            Err(RoutingError::NodeOutOfRange { .. })
        ));
    }

    #[test]
    fn equal_cost_ties_follow_insertion_order() {
        // Two equal paths 0→1→3 and 0→2→3; 0→1 is added first.
        let g = graph_from(
            &[(0, 0.0, 0.0), (1, 1.0, 1.0), (2, 1.0, -1.0), (3, 2.0, 0.0)],
            &[
                (0, 1, 1.0, 1.0, OneWay::ForwardOnly),
                (0, 2, 1.0, 1.0, OneWay::ForwardOnly),
                (1, 3, 1.0, 1.0, OneWay::ForwardOnly),
                (2, 3, 1.0, 1.0, OneWay::ForwardOnly),
            ],
        );
        let route = DijkstraRouter.route(&g, NodeId(0), NodeId(3), Metric::Length).unwrap();
        assert_eq!(route.nodes(), vec![NodeId(0), NodeId(1), NodeId(3)]);
    }
}

// ── Path properties on random graphs ──────────────────────────────────────────

#[cfg(test)]
mod properties {
    use std::sync::Arc;

    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    use map_core::{Edge, Node, NodeId, NodeTable, OneWay, RoadType};

    use crate::{DijkstraRouter, Metric, Router, RoutingGraph, RoutingGraphBuilder};

    fn random_graph(seed: u64, nodes: u32, edges: usize) -> RoutingGraph {
        let mut rng = SmallRng::seed_from_u64(seed);
        let table: NodeTable = (0..nodes)
            .map(|i| Node::new(NodeId(i), rng.gen_range(0.0..1000.0), rng.gen_range(0.0..1000.0)))
            .collect();
        let mut b = RoutingGraphBuilder::with_nodes(nodes as usize);
        for _ in 0..edges {
            let a = rng.gen_range(0..nodes);
            let z = rng.gen_range(0..nodes);
            if a == z {
                continue;
            }
            let one_way = match rng.gen_range(0..4) {
                0 => OneWay::ForwardOnly,
                1 => OneWay::BackwardOnly,
                _ => OneWay::None,
            };
            let length: f32 = rng.gen_range(1.0..100.0);
            let drive_time: f32 = rng.gen_range(0.1..10.0);
            let edge = Edge::road(
                RoadType::Tertiary,
                None,
                length,
                drive_time,
                one_way,
                vec![NodeId(a), NodeId(z)],
                &table,
            )
            .unwrap();
            b.add_edge(Arc::new(edge));
        }
        b.build()
    }

    /// Cost equals the summed weights, and consecutive steps chain.
    #[test]
    fn paths_chain_and_cost_matches_settled_distance() {
        let g = random_graph(11, 60, 150);
        for metric in [Metric::Length, Metric::DriveTime] {
            let tree = DijkstraRouter.search(&g, NodeId(0), metric).unwrap();
            for t in 0..60 {
                let target = NodeId(t);
                let Ok(route) = tree.path_to(&g, target) else {
                    assert!(!tree.has_path_to(target));
                    continue;
                };

                let mut at = NodeId(0);
                let mut sum = 0.0f64;
                for step in &route.steps {
                    assert_eq!(step.from, at);
                    let ends = (step.edge.from(), step.edge.to());
                    assert!(ends == (step.from, step.to) || ends == (step.to, step.from));
                    sum += match metric {
                        Metric::Length    => step.edge.length as f64,
                        Metric::DriveTime => step.edge.drive_time as f64,
                    };
                    at = step.to;
                }
                assert_eq!(at, target);
                let settled = tree.distance_to(target).unwrap();
                assert!((sum - settled).abs() < 1e-6 * settled.max(1.0));
                assert_eq!(route.cost, settled);
            }
        }
    }

    /// No link can improve a settled distance.
    #[test]
    fn settled_distances_are_optimal() {
        let g = random_graph(12, 80, 250);
        let tree = DijkstraRouter.search(&g, NodeId(5), Metric::DriveTime).unwrap();
        for link in &g.links {
            if let Some(d_from) = tree.distance_to(link.from) {
                let d_to = tree.distance_to(link.to).unwrap();
                assert!(d_to <= d_from + link.weight(Metric::DriveTime) + 1e-9);
            }
        }
    }
}

// ── Caching ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod cache {
    use map_core::NodeId;

    use super::helpers::square;
    use crate::{CachedRouter, Metric, RoutingError};

    #[test]
    fn repeated_queries_reuse_tree() {
        let g = square();
        let mut router = CachedRouter::new();
        let first = router.route(&g, NodeId(1), NodeId(3), Metric::Length).unwrap();
        let again = router.route(&g, NodeId(1), NodeId(3), Metric::Length).unwrap();
        assert_eq!(first, again);
        assert_eq!(router.recomputations(), 1);
    }

    #[test]
    fn new_target_same_source_is_free() {
        let g = square();
        let mut router = CachedRouter::new();
        router.route(&g, NodeId(1), NodeId(3), Metric::Length).unwrap();
        let to_four = router.route(&g, NodeId(1), NodeId(4), Metric::Length).unwrap();
        assert_eq!(to_four.cost, 14.0);
        assert_eq!(router.recomputations(), 1);
        assert_eq!(router.cached_key(), Some((NodeId(1), Metric::Length)));
    }

    #[test]
    fn source_or_metric_change_recomputes() {
        let g = square();
        let mut router = CachedRouter::new();
        router.route(&g, NodeId(1), NodeId(3), Metric::Length).unwrap();
        router.route(&g, NodeId(1), NodeId(3), Metric::DriveTime).unwrap();
        assert_eq!(router.recomputations(), 2);
        router.route(&g, NodeId(2), NodeId(3), Metric::DriveTime).unwrap();
        assert_eq!(router.recomputations(), 3);
    }

    #[test]
    fn invalidate_forces_search() {
        let g = square();
        let mut router = CachedRouter::new();
        router.route(&g, NodeId(1), NodeId(3), Metric::Length).unwrap();
        router.invalidate();
        assert_eq!(router.cached_key(), None);
        router.route(&g, NodeId(1), NodeId(3), Metric::Length).unwrap();
        assert_eq!(router.recomputations(), 2);
    }

    #[test]
    fn no_path_keeps_tree() {
        let g = square();
        let mut router = CachedRouter::new();
        let err = router.route(&g, NodeId(1), NodeId(0), Metric::Length).unwrap_err();
        assert_eq!(err, RoutingError::NoPath { from: NodeId(1), to: NodeId(0) });
        router.route(&g, NodeId(1), NodeId(2), Metric::Length).unwrap();
        assert_eq!(router.recomputations(), 1);
    }
}
