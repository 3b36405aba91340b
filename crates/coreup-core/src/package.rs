use std::fmt;

use serde::{Deserialize, Serialize};

use crate::release::ReleaseAsset;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoCoordinates {
    pub user: String,
    pub project: String,
}

impl fmt::Display for RepoCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.user, self.project)
    }
}

/// One entry of the cores list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageSpec {
    #[serde(default)]
    pub name: Option<String>,
    pub repo: RepoCoordinates,
    #[serde(default)]
    pub allow_prerelease: bool,
}

impl PackageSpec {
    /// Name of the local install folder: the configured name, or the part of
    /// the asset filename before its first `_`.
    #[must_use]
    pub fn effective_identifier(&self, asset: &ReleaseAsset) -> String {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => asset
                .name
                .split('_')
                .next()
                .unwrap_or(asset.name.as_str())
                .to_string(),
        }
    }
}
