use serde::{Deserialize, Serialize};

/// Content types accepted as an installable zip archive. Different packagers
/// report the same format under either name.
pub const ZIP_CONTENT_TYPES: [&str; 2] = ["application/x-zip-compressed", "application/zip"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseAsset {
    pub content_type: String,
    pub name: String,
    pub download_url: String,
}

impl ReleaseAsset {
    #[must_use]
    pub fn is_zip_archive(&self) -> bool {
        ZIP_CONTENT_TYPES.contains(&self.content_type.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseCandidate {
    pub tag: String,
    pub is_draft: bool,
    pub is_prerelease: bool,
    pub assets: Vec<ReleaseAsset>,
}

impl ReleaseCandidate {
    /// Drafts are never eligible; prereleases only when the package opts in.
    #[must_use]
    pub fn is_eligible(&self, allow_prerelease: bool) -> bool {
        !self.is_draft && (allow_prerelease || !self.is_prerelease)
    }
}

/// Return the first eligible release in feed order.
///
/// The feed is trusted to list releases newest-first; no sorting happens here,
/// so a later release with a higher version never beats an earlier eligible one.
#[must_use]
#[allow(clippy::manual_find)]
pub fn select_release(
    releases: &[ReleaseCandidate],
    allow_prerelease: bool,
) -> Option<&ReleaseCandidate> {
    for release in releases {
        if release.is_eligible(allow_prerelease) {
            return Some(release);
        }
    }
    None
}

/// Return the first asset whose content type is a recognized zip archive.
#[must_use]
#[allow(clippy::manual_find)]
pub fn select_asset(assets: &[ReleaseAsset]) -> Option<&ReleaseAsset> {
    for asset in assets {
        if asset.is_zip_archive() {
            return Some(asset);
        }
    }
    None
}
