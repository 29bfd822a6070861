//! Lab node types.
//!
//! A node is one emulated device inside a lab. The probe only cares about
//! identity (for exclusion lists and messages) and whether it is running.

use serde::Deserialize;

/// One emulated device inside a lab, as reported by the nodes API.
///
/// The server sends more fields (console, icon, position); only the ones the
/// probe evaluates are kept. Fields missing from the response decode to their
/// defaults, matching the server's habit of omitting unset values.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Node {
    /// Display name, e.g. `R1`
    pub name: String,
    /// Image the node boots, e.g. `iol:L3-ADVENTERPRISEK9-M`
    pub image: String,
    /// Run state counter: 0 is stopped, anything else counts as running
    pub status: i64,
    /// Stable identifier used by exclusion lists
    pub uuid: String,
}

impl Node {
    /// Check whether the node is running.
    pub fn is_up(&self) -> bool {
        self.status != 0
    }
}
