//! Change notifications for the presentation layer.

use map_core::RoadType;
use map_routing::{Metric, Route};

use crate::model::{LoadSummary, Selection};

/// Callbacks fired by [`MapModelBuilder::build`](crate::MapModelBuilder::build)
/// and by every [`MapModel`](crate::MapModel) mutation, after the change is
/// complete.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example — repaint on change
///
/// ```rust,ignore
/// struct Repaint(Sender<()>);
///
/// impl MapObserver for Repaint {
///     fn on_route_computed(&mut self, _route: &Route) {
///         let _ = self.0.send(());
///     }
/// }
/// ```
pub trait MapObserver {
    /// A road-type batch finished loading and indexing.
    fn on_batch_loaded(&mut self, _road_type: RoadType, _edges: usize) {}

    /// The whole load finished; the model is about to be returned.
    fn on_load_complete(&mut self, _summary: &LoadSummary) {}

    fn on_selection_changed(&mut self, _selection: &Selection) {}

    fn on_route_computed(&mut self, _route: &Route) {}

    fn on_metric_changed(&mut self, _metric: Metric) {}
}

/// A [`MapObserver`] that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl MapObserver for NoopObserver {}
