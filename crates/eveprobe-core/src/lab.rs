//! Lab identifiers.
//!
//! The EVE-NG API addresses a lab by its folder-prefixed file path
//! (`/datacenter/core.unl`); operators and the plugin output use the bare
//! form without the leading slash and extension (`datacenter/core`). This
//! module owns the normalization between the two.

use std::fmt;

/// Normalized lab identifier: folder-prefixed path, no leading slash, no
/// `.unl` extension.
///
/// Ordering and equality are by the normalized path, so identifiers collected
/// from different folders deduplicate naturally in a set.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LabId(String);

impl LabId {
    /// Create an identifier from an already-normalized name (operator input).
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self(id.into())
    }

    /// Normalize a lab path as reported by the folders API.
    ///
    /// Strips a single leading `/` and a trailing `.unl`, each only when
    /// something non-empty remains: `/` and `.unl` on their own are left
    /// untouched rather than normalized to the empty identifier.
    pub fn from_remote_path(path: &str) -> Self {
        let trimmed = match path.strip_prefix('/') {
            Some(rest) if !rest.is_empty() => rest,
            _ => path,
        };
        let stem = match trimmed.strip_suffix(".unl") {
            Some(stem) if !stem.is_empty() => stem,
            _ => trimmed,
        };
        Self(stem.to_string())
    }

    /// The normalized identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The file name the labs API expects (`<id>.unl`).
    pub fn unl_file(&self) -> String {
        format!("{}.unl", self.0)
    }
}

impl fmt::Display for LabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LabId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for LabId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_normalizes_folder_prefixed_path() {
        let lab = LabId::from_remote_path("/foo/bar.unl");
        assert_eq!(lab.as_str(), "foo/bar");
    }

    #[test]
    fn test_normalizes_root_level_path() {
        let lab = LabId::from_remote_path("/bar.unl");
        assert_eq!(lab.as_str(), "bar");
    }

    #[test]
    fn test_leading_slash_needs_a_remainder() {
        assert_eq!(LabId::from_remote_path("/").as_str(), "/");
    }

    #[test]
    fn test_extension_needs_a_stem() {
        assert_eq!(LabId::from_remote_path("/.unl").as_str(), ".unl");
    }

    #[test]
    fn test_already_normalized_path_is_unchanged() {
        assert_eq!(LabId::from_remote_path("foo/bar").as_str(), "foo/bar");
    }

    #[test]
    fn test_unl_file_round_trip() {
        let lab = LabId::new("datacenter/core");
        assert_eq!(lab.unl_file(), "datacenter/core.unl");
    }

    #[test]
    fn test_set_semantics_collapse_duplicates() {
        let mut labs = BTreeSet::new();
        labs.insert(LabId::from_remote_path("/shared/lab1.unl"));
        labs.insert(LabId::from_remote_path("/shared/lab1.unl"));
        labs.insert(LabId::new("shared/lab1"));
        assert_eq!(labs.len(), 1);
    }
}
