use coreup_core::{ReleaseAsset, ReleaseCandidate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubAsset {
    pub name: String,
    #[serde(default)]
    pub content_type: String,
    pub browser_download_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubRelease {
    pub tag_name: String,
    #[serde(default)]
    pub draft: bool,
    #[serde(default)]
    pub prerelease: bool,
    #[serde(default)]
    pub assets: Vec<GitHubAsset>,
}

impl From<GitHubAsset> for ReleaseAsset {
    fn from(asset: GitHubAsset) -> Self {
        Self {
            content_type: asset.content_type,
            name: asset.name,
            download_url: asset.browser_download_url,
        }
    }
}

impl From<GitHubRelease> for ReleaseCandidate {
    fn from(release: GitHubRelease) -> Self {
        Self {
            tag: release.tag_name,
            is_draft: release.draft,
            is_prerelease: release.prerelease,
            assets: release.assets.into_iter().map(ReleaseAsset::from).collect(),
        }
    }
}
