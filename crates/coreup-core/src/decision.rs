use std::fmt;

use log::{debug, info};

use crate::manifest::LocalManifest;
use crate::package::PackageSpec;
use crate::release::{ReleaseCandidate, select_asset, select_release};
use crate::version::{NormalizedVersion, VersionTag, is_newer};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallReason {
    FreshInstall,
    NewerAvailable {
        candidate: NormalizedVersion,
        local: NormalizedVersion,
    },
    /// At least one side did not normalize, so the versions cannot be trusted.
    UnverifiableVersion {
        candidate: VersionTag,
        local: VersionTag,
    },
}

impl fmt::Display for InstallReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FreshInstall => write!(f, "no local install found"),
            Self::NewerAvailable { candidate, local } => {
                write!(f, "{candidate} is newer than installed {local}")
            }
            Self::UnverifiableVersion { candidate, local } => write!(
                f,
                "cannot compare release {candidate} with installed {local}, installing anyway"
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    NoInstallableAsset {
        tag: String,
    },
    UpToDate {
        candidate: NormalizedVersion,
        local: NormalizedVersion,
    },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoInstallableAsset { tag } => write!(f, "no installable asset on release {tag}"),
            Self::UpToDate { .. } => write!(f, "up to date"),
        }
    }
}

/// Conditions that stop the whole run, not just the current package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbortReason {
    FeedUnavailable(String),
    NoEligibleRelease { repo: String },
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FeedUnavailable(details) => write!(f, "release feed unavailable: {details}"),
            Self::NoEligibleRelease { repo } => write!(f, "no eligible release found for {repo}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateDecision {
    Install {
        identifier: String,
        tag: String,
        download_url: String,
        reason: InstallReason,
    },
    Skip {
        reason: SkipReason,
    },
    AbortRun {
        reason: AbortReason,
    },
}

impl UpdateDecision {
    #[must_use]
    pub fn is_abort(&self) -> bool {
        matches!(self, Self::AbortRun { .. })
    }
}

/// Decide what to do for one package.
///
/// `load_manifest` is called at most once, with the identifier derived from
/// the configured name or the winning asset's filename. Returning `None` means
/// nothing is installed locally.
pub fn decide<F>(
    pkg: &PackageSpec,
    releases: &[ReleaseCandidate],
    load_manifest: F,
) -> UpdateDecision
where
    F: FnOnce(&str) -> Option<LocalManifest>,
{
    let Some(release) = select_release(releases, pkg.allow_prerelease) else {
        return UpdateDecision::AbortRun {
            reason: AbortReason::NoEligibleRelease {
                repo: pkg.repo.to_string(),
            },
        };
    };

    let candidate = VersionTag::parse(&release.tag);
    if let VersionTag::Unparseable { error, .. } = &candidate {
        debug!("Release tag {} has no usable version: {error}", release.tag);
    }

    let Some(asset) = select_asset(&release.assets) else {
        return UpdateDecision::Skip {
            reason: SkipReason::NoInstallableAsset {
                tag: release.tag.clone(),
            },
        };
    };

    let identifier = pkg.effective_identifier(asset);
    info!(
        "{} is the most recent release, checking local core {identifier}...",
        release.tag
    );

    let install = |identifier: String, reason: InstallReason| UpdateDecision::Install {
        identifier,
        tag: release.tag.clone(),
        download_url: asset.download_url.clone(),
        reason,
    };

    let Some(manifest) = load_manifest(&identifier) else {
        return install(identifier, InstallReason::FreshInstall);
    };

    let local = VersionTag::parse(&manifest.version);
    match &local {
        VersionTag::Valid(version) => info!("Local core found: v{version}"),
        VersionTag::Unparseable { raw, error } => {
            debug!("Local core version {raw:?} is unusable: {error}");
        }
    }

    match (candidate, local) {
        (VersionTag::Valid(candidate), VersionTag::Valid(local)) => {
            if is_newer(&candidate, &local) {
                install(
                    identifier,
                    InstallReason::NewerAvailable { candidate, local },
                )
            } else {
                UpdateDecision::Skip {
                    reason: SkipReason::UpToDate { candidate, local },
                }
            }
        }
        (candidate, local) => install(
            identifier,
            InstallReason::UnverifiableVersion { candidate, local },
        ),
    }
}
