//! Unit tests for map-model.
//!
//! Each test writes a small dataset to a temporary directory with
//! `DatasetWriter` and loads it through `MapModelBuilder`.

#[cfg(test)]
mod helpers {
    use std::path::Path;

    use map_core::{IndexConfig, NodeId, OneWay, RoadType};
    use map_loader::{DatasetInfo, DatasetWriter, EdgeRecord, NodeRecord};
    use map_routing::{Metric, Route};

    use crate::{LoadSummary, MapConfig, MapObserver, Selection};

    fn ids(raw: &[u32]) -> Vec<NodeId> {
        raw.iter().map(|&i| NodeId(i)).collect()
    }

    /// ```text
    /// Primary square (length, drive time):
    ///   4 ──C(10, 5)── 3
    ///   │              │
    /// D(14, 2)      B(10, 1)
    ///   │              │
    ///   1 ──A(10, 1)─→ 2            1→2 one-way
    ///
    /// Residential 5─6 at (500, 500), disconnected.
    /// Pedestrian  7─8 at y = -30.
    /// Places      9─10 at (200, 200).
    /// Tertiary    references absent node 0 (batch fails).
    /// ```
    pub fn write_dataset(dir: &Path) {
        let w = DatasetWriter::create(dir).unwrap();
        w.write_info(&DatasetInfo {
            x_low: 0.0,
            y_low: -50.0,
            x_high: 600.0,
            y_high: 600.0,
            node_count: 11,
            edge_count_hint: 9,
        })
        .unwrap();
        w.write_nodes(&[
            NodeRecord { id: 1, x: 0.0, y: 0.0 },
            NodeRecord { id: 2, x: 10.0, y: 0.0 },
            NodeRecord { id: 3, x: 10.0, y: 10.0 },
            NodeRecord { id: 4, x: 0.0, y: 10.0 },
            NodeRecord { id: 5, x: 500.0, y: 500.0 },
            NodeRecord { id: 6, x: 510.0, y: 500.0 },
            NodeRecord { id: 7, x: 0.0, y: -30.0 },
            NodeRecord { id: 8, x: 10.0, y: -30.0 },
            NodeRecord { id: 9, x: 200.0, y: 200.0 },
            NodeRecord { id: 10, x: 201.0, y: 200.0 },
        ])
        .unwrap();

        let p = RoadType::Primary;
        w.write_edges(
            p,
            &[
                EdgeRecord::new(p, "A", 10.0, 1.0, OneWay::ForwardOnly, &ids(&[1, 2])),
                EdgeRecord::new(p, "B", 10.0, 1.0, OneWay::None, &ids(&[2, 3])),
                EdgeRecord::new(p, "C", 10.0, 5.0, OneWay::None, &ids(&[3, 4])),
                EdgeRecord::new(p, "D", 14.0, 2.0, OneWay::None, &ids(&[1, 4])),
            ],
        )
        .unwrap();
        w.write_edges(
            RoadType::Residential,
            &[EdgeRecord::new(RoadType::Residential, "Island Rd", 10.0, 0.2, OneWay::None, &ids(&[5, 6]))],
        )
        .unwrap();
        w.write_edges(
            RoadType::Pedestrian,
            &[EdgeRecord::new(RoadType::Pedestrian, "Walk", 10.0, 0.5, OneWay::None, &ids(&[7, 8]))],
        )
        .unwrap();
        w.write_edges(
            RoadType::Places,
            &[EdgeRecord::new(RoadType::Places, "Town", 1.0, 0.1, OneWay::None, &ids(&[9, 10]))],
        )
        .unwrap();
        let mut dangling = EdgeRecord::new(RoadType::Tertiary, "Gone", 1.0, 0.1, OneWay::None, &ids(&[1, 2]));
        dangling.nodes[1] = 0;
        w.write_edges(RoadType::Tertiary, &[dangling]).unwrap();
    }

    pub fn write_coastline(dir: &Path) {
        DatasetWriter::create(dir)
            .unwrap()
            .write_coastline(
                &[
                    NodeRecord { id: 0, x: -100.0, y: -100.0 },
                    NodeRecord { id: 1, x: 700.0, y: -100.0 },
                    NodeRecord { id: 2, x: 700.0, y: 700.0 },
                    NodeRecord { id: 3, x: -100.0, y: 700.0 },
                ],
                &[ids(&[0, 1, 2, 3])],
            )
            .unwrap();
    }

    /// Dataset plus coastline under one temp dir.
    pub fn config(root: &Path) -> MapConfig {
        write_dataset(&root.join("data"));
        write_coastline(&root.join("coast"));
        MapConfig::new(root.join("data"))
            .with_coastline_dir(root.join("coast"))
            .with_index(IndexConfig::default())
    }

    #[derive(Default)]
    pub struct Recorder {
        pub batches:    Vec<(RoadType, usize)>,
        pub loads:      Vec<LoadSummary>,
        pub selections: Vec<Selection>,
        pub routes:     Vec<f64>,
        pub metrics:    Vec<Metric>,
    }

    impl MapObserver for Recorder {
        fn on_batch_loaded(&mut self, road_type: RoadType, edges: usize) {
            self.batches.push((road_type, edges));
        }
        fn on_load_complete(&mut self, summary: &LoadSummary) {
            self.loads.push(summary.clone());
        }
        fn on_selection_changed(&mut self, selection: &Selection) {
            self.selections.push(*selection);
        }
        fn on_route_computed(&mut self, route: &Route) {
            self.routes.push(route.cost);
        }
        fn on_metric_changed(&mut self, metric: Metric) {
            self.metrics.push(metric);
        }
    }
}

// ── Configuration ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod config {
    use map_core::IndexConfig;
    use map_routing::Metric;

    use crate::{MapConfig, MapModelBuilder, ModelError};

    #[test]
    fn defaults() {
        let c = MapConfig::default();
        assert_eq!(c.worker_threads, 4);
        assert_eq!(c.coastline_dir, None);
        assert_eq!(c.default_metric, Metric::DriveTime);
        assert_eq!(c.index, IndexConfig::default());
        assert!(c.validate().is_ok());
    }

    #[test]
    fn rejects_zero_workers_and_bad_index() {
        assert!(matches!(
            MapConfig::default().with_worker_threads(0).validate(),
            Err(ModelError::Config(_))
        ));
        let bad = IndexConfig::default().with_nearest_threshold(-1.0);
        assert!(matches!(MapConfig::default().with_index(bad).validate(), Err(ModelError::Config(_))));
    }

    #[test]
    fn build_validates_first() {
        let dir = tempfile::tempdir().unwrap();
        let config = MapConfig::new(dir.path()).with_worker_threads(0);
        assert!(matches!(MapModelBuilder::new(config).build(), Err(ModelError::Config(_))));
    }
}

// ── Loading ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod load {
    use map_core::RoadType;
    use map_loader::LoadError;

    use super::helpers::{config, write_dataset, Recorder};
    use crate::{MapConfig, MapModelBuilder, ModelError};

    #[test]
    fn summary_counts() {
        let root = tempfile::tempdir().unwrap();
        let model = MapModelBuilder::new(config(root.path())).build().unwrap();
        let s = model.summary();
        assert_eq!(s.node_count, 10);
        // Primary 4, Residential 1, Pedestrian 1, Places 1.
        assert_eq!(s.batches, 4);
        assert_eq!(s.edge_count, 7);
        // Square 7 + island 2 + places 2; pedestrian contributes none.
        assert_eq!(s.arc_count, 11);
        assert_eq!(s.failed, vec![RoadType::Tertiary]);
        assert_eq!(s.coastline_polygons, 1);
    }

    #[test]
    fn observer_sees_batches_and_completion() {
        let root = tempfile::tempdir().unwrap();
        let model = MapModelBuilder::new(config(root.path()))
            .observer(Recorder::default())
            .build()
            .unwrap();
        let rec = model.observer();
        let mut batches = rec.batches.clone();
        batches.sort();
        assert_eq!(
            batches,
            vec![
                (RoadType::Primary, 4),
                (RoadType::Residential, 1),
                (RoadType::Pedestrian, 1),
                (RoadType::Places, 1),
                (RoadType::Coastline, 1),
            ]
        );
        assert_eq!(rec.loads.len(), 1);
        assert_eq!(&rec.loads[0], model.summary());
    }

    #[test]
    fn failed_batch_has_no_index() {
        let root = tempfile::tempdir().unwrap();
        let model = MapModelBuilder::new(config(root.path())).build().unwrap();
        assert!(model.index(RoadType::Tertiary).is_none());
        assert!(model.index(RoadType::Primary).is_some());
        let types: Vec<_> = model.road_types().collect();
        assert_eq!(
            types,
            vec![RoadType::Primary, RoadType::Residential, RoadType::Pedestrian, RoadType::Places]
        );
    }

    #[test]
    fn missing_header_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = MapModelBuilder::new(MapConfig::new(dir.path())).build().err().unwrap();
        assert!(matches!(err, ModelError::Load(LoadError::MissingHeader { .. })));
    }

    #[test]
    fn missing_coastline_dir_loads_without_coastline() {
        let root = tempfile::tempdir().unwrap();
        write_dataset(root.path());
        let config = MapConfig::new(root.path()).with_coastline_dir(root.path().join("none"));
        let model = MapModelBuilder::new(config).build().unwrap();
        assert_eq!(model.summary().coastline_polygons, 0);
        assert!(model.summary().failed.iter().all(|&rt| rt != RoadType::Coastline));
        assert!(model.coastline_in(&model.extent()).is_empty());
        assert!(model.coastline_nodes().is_none());
    }

    #[test]
    fn graph_independent_of_worker_count() {
        let root = tempfile::tempdir().unwrap();
        let one = MapModelBuilder::new(config(root.path()).with_worker_threads(1)).build().unwrap();
        let many = MapModelBuilder::new(config(root.path()).with_worker_threads(6)).build().unwrap();
        assert_eq!(one.graph().links, many.graph().links);
        assert_eq!(one.graph().node_out_start, many.graph().node_out_start);
    }
}

// ── Queries ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod queries {
    use map_core::{Point, Rect, RoadType};

    use super::helpers::config;
    use crate::MapModelBuilder;

    #[test]
    fn range_by_type() {
        let root = tempfile::tempdir().unwrap();
        let model = MapModelBuilder::new(config(root.path())).build().unwrap();
        let square = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(model.edges_in(RoadType::Primary, &square).len(), 4);
        assert!(model.edges_in(RoadType::Motorway, &square).is_empty());
        assert!(model.edges_in(RoadType::Tertiary, &square).is_empty());
        assert_eq!(model.coastline_in(&square).len(), 1);
        assert_eq!(model.coastline_nodes().unwrap().len(), 4);
    }

    #[test]
    fn nearest_picks_closest_across_types() {
        let root = tempfile::tempdir().unwrap();
        let model = MapModelBuilder::new(config(root.path())).build().unwrap();
        assert_eq!(model.road_name_at(Point::new(5.0, -1.0), None), Some("A"));
        let (edge, d) = model.nearest_with_distance(Point::new(5.0, -29.0), None).unwrap();
        assert_eq!(edge.name_str(), "Walk");
        assert!((d - 1.0).abs() < 1e-9);
    }

    #[test]
    fn zoom_hides_minor_types() {
        let root = tempfile::tempdir().unwrap();
        let model = MapModelBuilder::new(config(root.path())).build().unwrap();
        // Pedestrian is only drawn at zoom factors up to 8.
        assert_eq!(model.road_name_at(Point::new(5.0, -29.0), Some(2.0)), Some("Walk"));
        assert_eq!(model.road_name_at(Point::new(5.0, -29.0), Some(50.0)), Some("A"));
    }

    #[test]
    fn places_never_nearest() {
        let root = tempfile::tempdir().unwrap();
        let model = MapModelBuilder::new(config(root.path())).build().unwrap();
        assert!(model.nearest_edge(Point::new(200.5, 201.0), None).is_none());
    }

    #[test]
    fn nothing_beyond_threshold() {
        let root = tempfile::tempdir().unwrap();
        let model = MapModelBuilder::new(config(root.path())).build().unwrap();
        assert!(model.nearest_edge(Point::new(300.0, 50.0), None).is_none());
        assert_eq!(model.road_name_at(Point::new(300.0, 50.0), None), None);
    }
}

// ── Selection and routing ─────────────────────────────────────────────────────

#[cfg(test)]
mod routing {
    use map_core::{NodeId, Point};
    use map_routing::Metric;

    use super::helpers::{config, Recorder};
    use crate::{MapModel, MapModelBuilder, ModelError, Selection};

    fn model(root: &std::path::Path) -> MapModel<Recorder> {
        MapModelBuilder::new(config(root))
            .observer(Recorder::default())
            .build()
            .unwrap()
    }

    #[test]
    fn snaps_to_closer_endpoint() {
        let root = tempfile::tempdir().unwrap();
        let mut m = model(root.path());
        assert_eq!(m.set_source(Point::new(1.0, 1.0)).unwrap(), NodeId(1));
        assert_eq!(m.set_target(Point::new(9.5, 10.5)).unwrap(), NodeId(3));
        assert_eq!(
            m.selection(),
            &Selection { source: Some(NodeId(1)), target: Some(NodeId(3)) }
        );
        assert_eq!(m.observer().selections.len(), 2);
    }

    #[test]
    fn selection_ignores_pedestrian_ways() {
        let root = tempfile::tempdir().unwrap();
        let mut m = model(root.path());
        // Closest road is the footway at y = -30, but it has no arcs.
        assert_eq!(m.set_source(Point::new(5.0, -29.0)).unwrap(), NodeId(1));
    }

    #[test]
    fn no_nearby_point_keeps_selection() {
        let root = tempfile::tempdir().unwrap();
        let mut m = model(root.path());
        m.set_source(Point::new(1.0, 1.0)).unwrap();
        let err = m.set_source(Point::new(3000.0, 3000.0)).unwrap_err();
        assert!(matches!(err, ModelError::NoNearbyPoint(_)));
        assert_eq!(m.selection().source, Some(NodeId(1)));
        assert_eq!(m.observer().selections.len(), 1);
    }

    #[test]
    fn route_under_each_metric() {
        let root = tempfile::tempdir().unwrap();
        let mut m = model(root.path());
        assert_eq!(m.metric(), Metric::DriveTime);
        m.set_source(Point::new(1.0, 1.0)).unwrap();
        m.set_target(Point::new(9.5, 10.5)).unwrap();

        let route = m.route().unwrap();
        assert_eq!(route.nodes(), vec![NodeId(1), NodeId(2), NodeId(3)]);
        assert_eq!(route.cost, 2.0);

        m.set_metric(Metric::Length);
        let route = m.route().unwrap();
        assert_eq!(route.nodes(), vec![NodeId(1), NodeId(2), NodeId(3)]);
        assert_eq!(route.cost, 20.0);

        assert_eq!(m.observer().routes, vec![2.0, 20.0]);
        assert_eq!(m.observer().metrics, vec![Metric::Length]);
        assert_eq!(m.router().recomputations(), 2);
    }

    #[test]
    fn new_target_reuses_tree() {
        let root = tempfile::tempdir().unwrap();
        let mut m = model(root.path());
        m.set_metric(Metric::Length);
        m.set_source(Point::new(1.0, 1.0)).unwrap();
        m.set_target(Point::new(9.5, 10.5)).unwrap();
        m.route().unwrap();

        assert_eq!(m.set_target(Point::new(0.5, 9.0)).unwrap(), NodeId(4));
        let route = m.route().unwrap();
        assert_eq!(route.nodes(), vec![NodeId(1), NodeId(4)]);
        assert_eq!(route.cost, 14.0);
        assert_eq!(m.router().recomputations(), 1);

        // Same query again: identical result, still no new search.
        let again = m.route().unwrap().clone();
        assert_eq!(m.last_route(), Some(&again));
        assert_eq!(m.router().recomputations(), 1);
    }

    #[test]
    fn setting_same_metric_is_silent() {
        let root = tempfile::tempdir().unwrap();
        let mut m = model(root.path());
        m.set_metric(Metric::DriveTime);
        assert!(m.observer().metrics.is_empty());
    }

    #[test]
    fn route_needs_both_endpoints() {
        let root = tempfile::tempdir().unwrap();
        let mut m = model(root.path());
        assert!(matches!(m.route(), Err(ModelError::NoSelection)));
        m.set_source(Point::new(1.0, 1.0)).unwrap();
        assert!(matches!(m.route(), Err(ModelError::NoSelection)));
    }

    #[test]
    fn disconnected_target_is_no_path() {
        let root = tempfile::tempdir().unwrap();
        let mut m = model(root.path());
        m.set_source(Point::new(1.0, 1.0)).unwrap();
        let island = m.set_target(Point::new(501.0, 501.0)).unwrap();
        assert_eq!(island, NodeId(5));
        let err = m.route().unwrap_err();
        assert!(matches!(err, ModelError::NoPath { from: NodeId(1), to: NodeId(5) }));
        assert!(m.last_route().is_none());
        assert!(m.observer().routes.is_empty());
    }

    #[test]
    fn clear_selection_drops_route() {
        let root = tempfile::tempdir().unwrap();
        let mut m = model(root.path());
        m.route_between(Point::new(1.0, 1.0), Point::new(9.5, 10.5)).unwrap();
        assert!(m.last_route().is_some());
        m.clear_selection();
        assert!(m.last_route().is_none());
        assert_eq!(m.selection(), &Selection::default());
        assert_eq!(m.observer().selections.len(), 3);
    }
}
