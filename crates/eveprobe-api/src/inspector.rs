//! Per-lab node listings.

use std::collections::BTreeMap;

use serde::Deserialize;

use eveprobe_core::{LabId, Node, ProbeError, Result};

use crate::session::EveSession;

/// Substring the server embeds in error messages for unknown labs.
const LAB_NOT_FOUND_MARKER: &str = "Lab does not exist";

#[derive(Deserialize)]
struct NodesResponse {
    #[serde(default)]
    data: BTreeMap<String, Node>,
}

impl EveSession {
    /// Fetch the nodes of one lab, keyed by node id.
    ///
    /// A remote error whose message names a missing lab comes back as the
    /// distinguished [`ProbeError::LabNotFound`] so callers can apply their
    /// existence policy; every other failure stays generic.
    pub async fn lab_nodes(&self, lab: &LabId) -> Result<BTreeMap<String, Node>> {
        let path = format!("/api/labs/{}/nodes", lab.unl_file());
        let body = match self.transport.get(&path).await {
            Ok(body) => body,
            Err(ProbeError::Remote { message, .. })
                if message.contains(LAB_NOT_FOUND_MARKER) =>
            {
                return Err(ProbeError::LabNotFound(lab.to_string()));
            }
            Err(err) => return Err(err),
        };
        let response: NodesResponse = serde_json::from_str(&body)
            .map_err(|err| ProbeError::decode(format!("node listing of lab '{lab}'"), err))?;
        tracing::debug!("lab '{}' lists {} nodes", lab, response.data.len());
        Ok(response.data)
    }
}
