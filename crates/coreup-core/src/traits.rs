use async_trait::async_trait;

use crate::error::{FeedError, InstallError};
use crate::manifest::LocalManifest;
use crate::package::RepoCoordinates;
use crate::release::ReleaseCandidate;

/// Supplies the upstream releases of one project, in the order the source
/// lists them.
#[async_trait]
pub trait ReleaseFeed: Send + Sync {
    async fn fetch_releases(
        &self,
        repo: &RepoCoordinates,
    ) -> Result<Vec<ReleaseCandidate>, FeedError>;
}

/// Reads what is installed locally. Missing and unreadable manifests are both
/// reported as `None`.
pub trait ManifestStore: Send + Sync {
    fn load(&self, identifier: &str) -> Option<LocalManifest>;
}

#[async_trait]
pub trait ArtifactInstaller: Send + Sync {
    /// Fetch the archive at `download_url`, unpack it into the install root and
    /// remove any temporary files.
    async fn install(&self, download_url: &str) -> Result<(), InstallError>;
}
