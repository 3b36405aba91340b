use coreup_core::{
    AbortReason, ArtifactInstaller, InstallError, InstallReason, ManifestStore, PackageSpec,
    ReleaseFeed, SkipReason, UpdateDecision, decide,
};
use log::{debug, error, info};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunError {
    #[error("run aborted at {package}: {reason}")]
    Aborted {
        package: String,
        reason: AbortReason,
    },
    #[error("failed to install {package}: {source}")]
    Install {
        package: String,
        #[source]
        source: InstallError,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Decide only; never call the installer.
    pub check_only: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageOutcome {
    Installed { identifier: String, tag: String },
    WouldInstall { identifier: String, tag: String },
    Skipped(SkipReason),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub checked: usize,
    pub installed: usize,
    pub pending: usize,
    pub skipped: usize,
}

impl RunSummary {
    fn record(&mut self, outcome: &PackageOutcome) {
        self.checked += 1;
        match outcome {
            PackageOutcome::Installed { .. } => self.installed += 1,
            PackageOutcome::WouldInstall { .. } => self.pending += 1,
            PackageOutcome::Skipped(_) => self.skipped += 1,
        }
    }
}

/// Walks the cores list in order, one package at a time, and stops at the
/// first fatal condition.
pub struct Runner<'a> {
    feed: &'a dyn ReleaseFeed,
    manifests: &'a dyn ManifestStore,
    installer: &'a dyn ArtifactInstaller,
    options: RunOptions,
}

impl<'a> Runner<'a> {
    #[must_use]
    pub fn new(
        feed: &'a dyn ReleaseFeed,
        manifests: &'a dyn ManifestStore,
        installer: &'a dyn ArtifactInstaller,
        options: RunOptions,
    ) -> Self {
        Self {
            feed,
            manifests,
            installer,
            options,
        }
    }

    /// Process every package in list order.
    ///
    /// # Errors
    /// Returns an error, without touching the remaining packages, when the
    /// release feed cannot be reached, a package has no eligible release, or
    /// an installation fails.
    pub async fn run(&self, packages: &[PackageSpec]) -> Result<RunSummary, RunError> {
        let mut summary = RunSummary::default();
        if packages.is_empty() {
            info!("No cores configured");
        }

        for pkg in packages {
            let outcome = self.process(pkg).await?;
            summary.record(&outcome);
            info!("------------");
        }

        info!(
            "Checked {} cores: {} installed, {} skipped{}",
            summary.checked,
            summary.installed,
            summary.skipped,
            if self.options.check_only {
                format!(", {} with updates available", summary.pending)
            } else {
                String::new()
            }
        );
        Ok(summary)
    }

    /// Resolve and act on a single package.
    ///
    /// # Errors
    /// See [`Runner::run`].
    pub async fn process(&self, pkg: &PackageSpec) -> Result<PackageOutcome, RunError> {
        info!("Starting repo: {}", pkg.repo.project);

        let decision = match self.feed.fetch_releases(&pkg.repo).await {
            Ok(releases) => decide(pkg, &releases, |identifier| self.manifests.load(identifier)),
            Err(feed_error) => {
                error!("Error communicating with the release feed: {feed_error}");
                UpdateDecision::AbortRun {
                    reason: AbortReason::FeedUnavailable(feed_error.to_string()),
                }
            }
        };

        match decision {
            UpdateDecision::Install {
                identifier,
                tag,
                download_url,
                reason,
            } => {
                info!("{}", install_message(&identifier, &reason, self.options.check_only));
                if self.options.check_only {
                    debug!("Release {tag} of {identifier} would be fetched from {download_url}");
                    return Ok(PackageOutcome::WouldInstall { identifier, tag });
                }

                self.installer
                    .install(&download_url)
                    .await
                    .map_err(|source| RunError::Install {
                        package: identifier.clone(),
                        source,
                    })?;
                Ok(PackageOutcome::Installed { identifier, tag })
            }
            UpdateDecision::Skip { reason } => {
                match &reason {
                    SkipReason::NoInstallableAsset { tag } => {
                        info!("No zip file found for release {tag}. Skipping");
                    }
                    SkipReason::UpToDate { candidate, local } => {
                        info!("Up to date (release {candidate}, installed {local}). Skipping core");
                    }
                }
                Ok(PackageOutcome::Skipped(reason))
            }
            UpdateDecision::AbortRun { reason } => {
                error!("Aborting run: {reason}");
                Err(RunError::Aborted {
                    package: pkg.repo.to_string(),
                    reason,
                })
            }
        }
    }
}

fn install_message(identifier: &str, reason: &InstallReason, check_only: bool) -> String {
    if check_only {
        return format!("Update available for core {identifier}: {reason}");
    }
    match reason {
        InstallReason::FreshInstall => format!("Downloading core {identifier}"),
        InstallReason::NewerAvailable { .. } => format!("Updating core {identifier}: {reason}"),
        InstallReason::UnverifiableVersion { .. } => {
            format!("Downloading core {identifier} anyway: {reason}")
        }
    }
}
