//! Configuration loading and types for eveprobe.
//!
//! This crate is responsible for:
//! - Defining the probe configuration model (connection parameters + check policy)
//! - Loading the optional TOML credentials file (`--config PATH`)
//! - Validating the cross-flag policy rules before any network activity
//!
//! How the pieces are merged (CLI flags over file values over defaults) is
//! the binary's job; this crate only models and validates the result.
//! Connection *shape* checks (hostname syntax, non-empty credentials) live
//! with the session opener in eveprobe-api, which owns those fields.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use eveprobe_core::{ProbeError, Result};

/// Full probe configuration: where to connect and what to check.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// Connection parameters for the EVE-NG API.
    pub connection: ConnectionConfig,

    /// What the probe should check and report.
    pub policy: CheckPolicy,
}

impl ProbeConfig {
    /// Validate the cross-flag policy rules.
    ///
    /// This does not contact any external system and does not inspect
    /// connection values; it only rejects flag combinations that cannot
    /// describe a meaningful check.
    pub fn validate(&self) -> Result<()> {
        self.policy.validate()
    }
}

/// Connection parameters for the EVE-NG API.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Host name or IP address of the EVE-NG server.
    pub hostname: String,

    /// API user.
    pub username: String,

    /// API password.
    pub password: String,

    /// Transport protocol; https unless http is forced.
    pub protocol: Protocol,

    /// Port override. Defaults to the protocol's own port when unset.
    pub port: Option<u16>,
}

/// Transport protocol towards the EVE-NG server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Http,
    #[default]
    Https,
}

impl Protocol {
    /// The URL scheme for this protocol.
    pub fn scheme(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }

    /// Pick the protocol from the force-http switch.
    pub fn from_force_http(force_http: bool) -> Self {
        if force_http {
            Self::Http
        } else {
            Self::Https
        }
    }
}

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.scheme())
    }
}

/// What the probe should check and how findings are reported.
#[derive(Debug, Clone, Default)]
pub struct CheckPolicy {
    /// Labs to inspect, by normalized identifier. The entry `all` is a
    /// directive that expands to every lab on the server.
    pub labs: Vec<String>,

    /// Require every node in the inspected labs to be running.
    pub all_nodes_up: bool,

    /// Require every named lab to exist on the server.
    pub labs_exist: bool,

    /// Emit per-lab nodes_up/nodes_down performance data.
    pub lab_performance_data: bool,

    /// Node uuids exempt from the all-nodes-up requirement.
    pub exclude_nodes: Vec<String>,

    /// Render performance-data labels as JSON objects instead of flat keys.
    pub json_labels: bool,
}

impl CheckPolicy {
    /// Validate the cross-flag rules.
    pub fn validate(&self) -> Result<()> {
        if self.labs.is_empty() && (self.labs_exist || self.lab_performance_data) {
            return Err(ProbeError::invalid_config(
                "labs",
                "--labs-exist and --lab-performance-data cannot be used when no labs are given",
            ));
        }

        if self.labs.len() == 1 && self.labs[0] == "all" && self.labs_exist {
            return Err(ProbeError::invalid_config(
                "labs",
                "--labs-exist cannot be used when there is no specific lab to check for existence",
            ));
        }

        if !self.labs.is_empty()
            && !(self.labs_exist || self.lab_performance_data || self.all_nodes_up)
        {
            return Err(ProbeError::invalid_config(
                "labs",
                "labs are given but no check mode is enabled (--all-nodes-up, --labs-exist, --lab-performance-data)",
            ));
        }

        Ok(())
    }

    /// Check whether a node uuid is on the exclusion list.
    pub fn is_excluded(&self, uuid: &str) -> bool {
        self.exclude_nodes.iter().any(|excluded| excluded == uuid)
    }
}

/// On-disk configuration file model.
///
/// The file only carries connection values, so passwords can be kept out of
/// the scheduler's command lines. Every field is optional; CLI flags win
/// over file values.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    /// `[connection]` section.
    #[serde(default)]
    pub connection: FileConnection,
}

/// `[connection]` section of the configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FileConnection {
    pub hostname: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub force_http: Option<bool>,
    pub port: Option<u16>,
}

/// Load the configuration file from a specific path.
///
/// Parses TOML into [`FileConfig`] and maps errors into
/// [`ProbeError::Config`] / [`ProbeError::InvalidConfig`] as appropriate.
pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<FileConfig> {
    let path_ref = path.as_ref();
    let contents = fs::read_to_string(path_ref).map_err(|err| {
        ProbeError::config(format!(
            "failed to read config file '{}': {}",
            path_ref.display(),
            err
        ))
    })?;

    let cfg: FileConfig = toml::from_str(&contents).map_err(|err| {
        ProbeError::invalid_config(
            path_ref.display().to_string(),
            format!("failed to parse config: {}", err),
        )
    })?;

    Ok(cfg)
}
