//! Platform subsystem status.
//!
//! EVE-NG reports one running-instance counter per virtualization engine.
//! Deployments that lack an engine omit its counter or report `null`; an
//! absent counter means "not reported", never zero.

use serde::Deserialize;
use std::fmt;

/// The virtualization subsystems whose counters the probe reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subsystem {
    Iol,
    Dynamips,
    Qemu,
    Docker,
    Vpcs,
}

impl Subsystem {
    /// Every subsystem, in reporting order.
    pub const ALL: [Subsystem; 5] = [
        Self::Iol,
        Self::Dynamips,
        Self::Qemu,
        Self::Docker,
        Self::Vpcs,
    ];

    /// The performance-data metric name for this subsystem.
    pub fn metric_name(self) -> &'static str {
        match self {
            Self::Iol => "iol",
            Self::Dynamips => "dynamips",
            Self::Qemu => "qemu",
            Self::Docker => "docker",
            Self::Vpcs => "vpcs",
        }
    }
}

impl fmt::Display for Subsystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.metric_name())
    }
}

/// Running-instance counters from the platform status endpoint.
///
/// Fields the server does not send (or sends as `null`) decode as [`None`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SubsystemStatus {
    pub iol: Option<f64>,
    pub dynamips: Option<f64>,
    pub qemu: Option<f64>,
    pub docker: Option<f64>,
    pub vpcs: Option<f64>,
}

impl SubsystemStatus {
    /// The counter for one subsystem, if the server reported it.
    pub fn counter(&self, subsystem: Subsystem) -> Option<f64> {
        match subsystem {
            Subsystem::Iol => self.iol,
            Subsystem::Dynamips => self.dynamips,
            Subsystem::Qemu => self.qemu,
            Subsystem::Docker => self.docker,
            Subsystem::Vpcs => self.vpcs,
        }
    }

    /// All reported counters as `(subsystem, value)` pairs; absent counters
    /// are skipped, not zeroed.
    pub fn gauges(&self) -> Vec<(Subsystem, f64)> {
        Subsystem::ALL
            .iter()
            .filter_map(|s| self.counter(*s).map(|v| (*s, v)))
            .collect()
    }
}
