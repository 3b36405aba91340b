//! Release resolution and update decisions for coreup.
//!
//! Everything in this crate is free of I/O:
//! - Version extraction from free-form tags and numeric comparison.
//! - Release and asset selection with first-match-wins ordering.
//! - The per-package update decision.
//! - Traits for the release feed, manifest store and installer collaborators.

mod decision;
mod error;
mod manifest;
mod package;
mod release;
mod traits;
mod version;

/// Per-package decision and its typed reasons.
pub use decision::{AbortReason, InstallReason, SkipReason, UpdateDecision, decide};
pub use error::{FeedError, InstallError, NetworkStage};
pub use manifest::LocalManifest;
pub use package::{PackageSpec, RepoCoordinates};
/// Release model and the two first-match selectors.
pub use release::{
    ReleaseAsset, ReleaseCandidate, ZIP_CONTENT_TYPES, select_asset, select_release,
};
pub use traits::{ArtifactInstaller, ManifestStore, ReleaseFeed};
/// Tag normalization and comparison.
pub use version::{NormalizedVersion, VersionTag, VersionTagError, extract_version, is_newer};
