//! Lab catalog built by walking the server's folder tree.

use std::collections::BTreeSet;

use serde::Deserialize;

use eveprobe_core::{LabId, ProbeError, Result};

use crate::session::EveSession;

/// Folder entry the server injects to link a listing back to its parent.
const PARENT_LINK: &str = "..";

const ROOT_FOLDER: &str = "/";

#[derive(Deserialize)]
struct FolderResponse {
    #[serde(default)]
    data: FolderListing,
}

#[derive(Default, Deserialize)]
struct FolderListing {
    #[serde(default)]
    folders: Vec<FolderEntry>,
    #[serde(default)]
    labs: Vec<LabEntry>,
}

#[derive(Deserialize)]
struct FolderEntry {
    #[serde(default)]
    name: String,
    #[serde(default)]
    path: String,
}

#[derive(Deserialize)]
struct LabEntry {
    #[serde(default)]
    path: String,
}

impl EveSession {
    /// Enumerate every lab on the server.
    ///
    /// Worklist traversal over the folder tree starting at the root: parent
    /// links are skipped, discovered subfolders are scheduled, lab paths are
    /// normalized into the result set. The set collapses labs reachable
    /// through more than one folder and makes the result independent of
    /// visitation order. Each folder is fetched at most once, so a listing
    /// that repeats a folder or cycles back up the tree cannot loop the
    /// walk. A failure at any folder aborts the whole traversal with an
    /// error naming that folder.
    pub async fn list_all_labs(&self) -> Result<BTreeSet<LabId>> {
        let mut labs = BTreeSet::new();
        let mut visited = BTreeSet::new();
        let mut pending = vec![ROOT_FOLDER.to_string()];

        while let Some(folder) = pending.pop() {
            // Listings can repeat a folder or form a cycle.
            if !visited.insert(folder.clone()) {
                continue;
            }
            let listing = self
                .folder_listing(&folder)
                .await
                .map_err(|err| ProbeError::in_folder(folder.as_str(), err))?;

            for entry in listing.folders {
                if entry.name == PARENT_LINK {
                    continue;
                }
                pending.push(entry.path);
            }
            for lab in listing.labs {
                labs.insert(LabId::from_remote_path(&lab.path));
            }
        }

        tracing::debug!("catalog holds {} labs", labs.len());
        Ok(labs)
    }

    async fn folder_listing(&self, folder: &str) -> Result<FolderListing> {
        let body = self.transport.get(&format!("/api/folders{folder}")).await?;
        let response: FolderResponse = serde_json::from_str(&body)
            .map_err(|err| ProbeError::decode(format!("listing of folder '{folder}'"), err))?;
        Ok(response.data)
    }
}
