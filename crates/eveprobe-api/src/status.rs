//! Platform-wide subsystem counters.

use serde::Deserialize;

use eveprobe_core::{ProbeError, Result, SubsystemStatus};

use crate::session::EveSession;

#[derive(Deserialize)]
struct StatusResponse {
    #[serde(default)]
    data: SubsystemStatus,
}

impl EveSession {
    /// Read the running-instance counters of the virtualization subsystems.
    ///
    /// Counters the server leaves out or nulls stay absent in the result;
    /// the caller decides what absence means.
    pub async fn subsystem_status(&self) -> Result<SubsystemStatus> {
        let body = self
            .transport
            .get("/api/status")
            .await
            .map_err(ProbeError::status_fetch)?;
        let response: StatusResponse = serde_json::from_str(&body).map_err(|err| {
            ProbeError::status_fetch(ProbeError::decode("subsystem status", err))
        })?;
        Ok(response.data)
    }
}
