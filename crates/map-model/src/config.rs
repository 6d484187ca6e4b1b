//! Model configuration.

use std::path::PathBuf;

use map_core::IndexConfig;
use map_routing::Metric;

use crate::{ModelError, ModelResult};

/// Everything [`MapModelBuilder`](crate::MapModelBuilder) needs to load a
/// dataset.
///
/// | Field            | Default          |
/// |------------------|------------------|
/// | `data_dir`       | `data`           |
/// | `coastline_dir`  | none             |
/// | `worker_threads` | 4                |
/// | `index`          | `IndexConfig::default()` |
/// | `default_metric` | `Metric::DriveTime` |
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapConfig {
    /// Directory holding `info.bin`, `nodes.bin` and `edges<code>.bin`.
    pub data_dir: PathBuf,

    /// Coastline directory; `None` loads no coastline.
    pub coastline_dir: Option<PathBuf>,

    /// Size of the load thread pool.
    pub worker_threads: usize,

    pub index: IndexConfig,

    /// Metric active right after load.
    pub default_metric: Metric,
}

impl MapConfig {
    pub const DEFAULT_WORKER_THREADS: usize = 4;

    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self { data_dir: data_dir.into(), ..Self::default() }
    }

    pub fn with_coastline_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.coastline_dir = Some(dir.into());
        self
    }

    pub fn with_worker_threads(mut self, n: usize) -> Self {
        self.worker_threads = n;
        self
    }

    pub fn with_index(mut self, index: IndexConfig) -> Self {
        self.index = index;
        self
    }

    pub fn with_default_metric(mut self, metric: Metric) -> Self {
        self.default_metric = metric;
        self
    }

    pub fn validate(&self) -> ModelResult<()> {
        if self.worker_threads == 0 {
            return Err(ModelError::Config("worker_threads must be at least 1".into()));
        }
        self.index
            .validate()
            .map_err(|e| ModelError::Config(e.to_string()))
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            data_dir:       PathBuf::from("data"),
            coastline_dir:  None,
            worker_threads: Self::DEFAULT_WORKER_THREADS,
            index:          IndexConfig::default(),
            default_metric: Metric::default(),
        }
    }
}
