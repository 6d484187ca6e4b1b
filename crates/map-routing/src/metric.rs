//! Route cost metric.

use std::fmt;
use std::str::FromStr;

/// Which link weight a shortest-path run minimises.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Metric {
    /// Physical length in metres.
    Length,
    /// Drive time in minutes.
    #[default]
    DriveTime,
}

impl Metric {
    pub fn as_str(self) -> &'static str {
        match self {
            Metric::Length    => "length",
            Metric::DriveTime => "time",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "length" | "distance"          => Ok(Metric::Length),
            "time" | "drive-time" | "fast" => Ok(Metric::DriveTime),
            other => Err(format!("unknown metric `{other}` (expected `length` or `time`)")),
        }
    }
}
