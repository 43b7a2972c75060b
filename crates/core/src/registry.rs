use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TelemeterError};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    Temperature,
    Humidity,
    Motion,
    Battery,
}

impl MetricKind {
    pub const ALL: [MetricKind; 4] = [
        MetricKind::Temperature,
        MetricKind::Humidity,
        MetricKind::Motion,
        MetricKind::Battery,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Temperature => "temperature",
            Self::Humidity => "humidity",
            Self::Motion => "motion",
            Self::Battery => "battery",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricKind {
    type Err = TelemeterError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "temperature" | "temp" => Ok(Self::Temperature),
            "humidity" => Ok(Self::Humidity),
            "motion" => Ok(Self::Motion),
            "battery" => Ok(Self::Battery),
            _ => Err(TelemeterError::Parse(format!("unknown metric: {s}"))),
        }
    }
}

/// Immutable description of one metric kind. `cumulative` is the single
/// capability flag that selects counter differencing; consumers check it
/// here rather than re-deriving it from the kind.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MetricDescriptor {
    pub kind: MetricKind,
    pub unit: &'static str,
    pub precision: u8,
    pub cumulative: bool,
}

/// Lookup table of metric descriptors, built once at startup and shared by
/// reference. No mutation after construction.
#[derive(Debug, Clone)]
pub struct Registry {
    descriptors: Vec<MetricDescriptor>,
}

impl Registry {
    pub fn builtin() -> Self {
        Self {
            descriptors: vec![
                MetricDescriptor {
                    kind: MetricKind::Temperature,
                    unit: "°C",
                    precision: 1,
                    cumulative: false,
                },
                MetricDescriptor {
                    kind: MetricKind::Humidity,
                    unit: "%",
                    precision: 0,
                    cumulative: false,
                },
                MetricDescriptor {
                    kind: MetricKind::Motion,
                    unit: "events",
                    precision: 0,
                    cumulative: true,
                },
                MetricDescriptor {
                    kind: MetricKind::Battery,
                    unit: "V",
                    precision: 2,
                    cumulative: false,
                },
            ],
        }
    }

    pub fn get(&self, kind: MetricKind) -> Option<&MetricDescriptor> {
        self.descriptors.iter().find(|d| d.kind == kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MetricDescriptor> {
        self.descriptors.iter()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}
