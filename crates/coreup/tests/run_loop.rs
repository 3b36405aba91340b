use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use coreup::runner::{PackageOutcome, RunError, RunOptions, Runner};
use coreup_core::{
    AbortReason, ArtifactInstaller, FeedError, InstallError, LocalManifest, ManifestStore,
    NetworkStage, PackageSpec, ReleaseAsset, ReleaseCandidate, ReleaseFeed, RepoCoordinates,
    SkipReason,
};

#[derive(Default)]
struct FakeFeed {
    releases: HashMap<String, Vec<ReleaseCandidate>>,
    failing: Vec<String>,
    requests: Mutex<Vec<String>>,
}

impl FakeFeed {
    fn with(mut self, project: &str, releases: Vec<ReleaseCandidate>) -> Self {
        self.releases.insert(project.to_string(), releases);
        self
    }

    fn failing(mut self, project: &str) -> Self {
        self.failing.push(project.to_string());
        self
    }

    fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .expect("request log should not be poisoned")
            .clone()
    }
}

#[async_trait]
impl ReleaseFeed for FakeFeed {
    async fn fetch_releases(
        &self,
        repo: &RepoCoordinates,
    ) -> Result<Vec<ReleaseCandidate>, FeedError> {
        self.requests
            .lock()
            .expect("request log should not be poisoned")
            .push(repo.project.clone());
        if self.failing.contains(&repo.project) {
            return Err(FeedError::Network {
                repo: repo.to_string(),
                stage: NetworkStage::Request,
                details: "connection refused".to_string(),
            });
        }
        Ok(self.releases.get(&repo.project).cloned().unwrap_or_default())
    }
}

#[derive(Default)]
struct FakeManifests(HashMap<String, String>);

impl FakeManifests {
    fn with(mut self, identifier: &str, version: &str) -> Self {
        self.0.insert(identifier.to_string(), version.to_string());
        self
    }
}

impl ManifestStore for FakeManifests {
    fn load(&self, identifier: &str) -> Option<LocalManifest> {
        self.0.get(identifier).map(LocalManifest::new)
    }
}

#[derive(Default)]
struct RecordingInstaller {
    installed: Mutex<Vec<String>>,
    fail_on: Option<String>,
}

impl RecordingInstaller {
    fn installed(&self) -> Vec<String> {
        self.installed
            .lock()
            .expect("install log should not be poisoned")
            .clone()
    }
}

#[async_trait]
impl ArtifactInstaller for RecordingInstaller {
    async fn install(&self, download_url: &str) -> Result<(), InstallError> {
        if self.fail_on.as_deref() == Some(download_url) {
            return Err(InstallError::Invalid(
                "Download failed with status 500 Internal Server Error".to_string(),
            ));
        }
        self.installed
            .lock()
            .expect("install log should not be poisoned")
            .push(download_url.to_string());
        Ok(())
    }
}

fn pkg(project: &str) -> PackageSpec {
    PackageSpec {
        name: None,
        repo: RepoCoordinates {
            user: "agg23".to_string(),
            project: project.to_string(),
        },
        allow_prerelease: false,
    }
}

fn url(asset: &str) -> String {
    format!("https://github.com/agg23/releases/download/{asset}")
}

fn release(tag: &str, asset: &str) -> ReleaseCandidate {
    ReleaseCandidate {
        tag: tag.to_string(),
        is_draft: false,
        is_prerelease: false,
        assets: vec![ReleaseAsset {
            content_type: "application/zip".to_string(),
            name: asset.to_string(),
            download_url: url(asset),
        }],
    }
}

fn runner<'a>(
    feed: &'a FakeFeed,
    manifests: &'a FakeManifests,
    installer: &'a RecordingInstaller,
    check_only: bool,
) -> Runner<'a> {
    Runner::new(feed, manifests, installer, RunOptions { check_only })
}

#[tokio::test]
async fn installs_newer_release_and_skips_current_one() {
    let feed = FakeFeed::default()
        .with("openfpga-NES", vec![release("v1.1", "agg23.NES_1.1.zip")])
        .with("openfpga-SNES", vec![release("v0.4", "agg23.SNES_0.4.zip")]);
    let manifests = FakeManifests::default()
        .with("agg23.NES", "1.0.0")
        .with("agg23.SNES", "0.4.0");
    let installer = RecordingInstaller::default();

    let summary = runner(&feed, &manifests, &installer, false)
        .run(&[pkg("openfpga-NES"), pkg("openfpga-SNES")])
        .await
        .expect("run should succeed");

    assert_eq!(installer.installed(), [url("agg23.NES_1.1.zip")]);
    assert_eq!(summary.checked, 2);
    assert_eq!(summary.installed, 1);
    assert_eq!(summary.skipped, 1);
}

#[tokio::test]
async fn fresh_and_unverifiable_installs_use_the_selected_asset() {
    let feed = FakeFeed::default()
        .with("openfpga-GB", vec![release("nightly", "agg23.GB.zip")])
        .with("openfpga-GBA", vec![release("v2.0", "agg23.GBA_2.0.zip")]);
    let manifests = FakeManifests::default().with("agg23.GB", "1.0.0");
    let installer = RecordingInstaller::default();

    runner(&feed, &manifests, &installer, false)
        .run(&[pkg("openfpga-GB"), pkg("openfpga-GBA")])
        .await
        .expect("run should succeed");

    assert_eq!(
        installer.installed(),
        [url("agg23.GB.zip"), url("agg23.GBA_2.0.zip")]
    );
}

#[tokio::test]
async fn missing_zip_skips_and_continues_with_next_package() {
    let mut no_zip = release("v3.0", "README.txt");
    no_zip.assets[0].content_type = "text/plain".to_string();
    let feed = FakeFeed::default()
        .with("openfpga-PCE", vec![no_zip])
        .with("openfpga-NES", vec![release("v1.1", "agg23.NES_1.1.zip")]);
    let manifests = FakeManifests::default();
    let installer = RecordingInstaller::default();
    let runner = runner(&feed, &manifests, &installer, false);

    let outcome = runner
        .process(&pkg("openfpga-PCE"))
        .await
        .expect("missing zip should not abort");
    assert_eq!(
        outcome,
        PackageOutcome::Skipped(SkipReason::NoInstallableAsset {
            tag: "v3.0".to_string()
        })
    );

    runner
        .run(&[pkg("openfpga-PCE"), pkg("openfpga-NES")])
        .await
        .expect("run should continue past the skipped package");
    assert_eq!(installer.installed(), [url("agg23.NES_1.1.zip")]);
}

#[tokio::test]
async fn feed_failure_aborts_before_later_packages() {
    let feed = FakeFeed::default()
        .with("openfpga-NES", vec![release("v1.1", "agg23.NES_1.1.zip")])
        .failing("openfpga-SNES")
        .with("openfpga-GB", vec![release("v1.0", "agg23.GB_1.0.zip")]);
    let manifests = FakeManifests::default();
    let installer = RecordingInstaller::default();

    let error = runner(&feed, &manifests, &installer, false)
        .run(&[pkg("openfpga-NES"), pkg("openfpga-SNES"), pkg("openfpga-GB")])
        .await
        .expect_err("feed failure should abort the run");

    assert!(matches!(
        error,
        RunError::Aborted {
            reason: AbortReason::FeedUnavailable(_),
            ..
        }
    ));
    assert_eq!(feed.requests(), ["openfpga-NES", "openfpga-SNES"]);
    assert_eq!(installer.installed(), [url("agg23.NES_1.1.zip")]);
}

#[tokio::test]
async fn no_eligible_release_aborts_the_run() {
    let mut beta = release("v2.0-beta", "agg23.NES_2.0.zip");
    beta.is_prerelease = true;
    let feed = FakeFeed::default()
        .with("openfpga-NES", vec![beta])
        .with("openfpga-GB", vec![release("v1.0", "agg23.GB_1.0.zip")]);
    let manifests = FakeManifests::default();
    let installer = RecordingInstaller::default();

    let error = runner(&feed, &manifests, &installer, false)
        .run(&[pkg("openfpga-NES"), pkg("openfpga-GB")])
        .await
        .expect_err("no eligible release should abort the run");

    assert!(matches!(
        error,
        RunError::Aborted {
            ref package,
            reason: AbortReason::NoEligibleRelease { .. },
        } if package == "agg23/openfpga-NES"
    ));
    assert_eq!(feed.requests(), ["openfpga-NES"]);
    assert!(installer.installed().is_empty());
}

#[tokio::test]
async fn installer_failure_aborts_the_run() {
    let feed = FakeFeed::default()
        .with("openfpga-NES", vec![release("v1.1", "agg23.NES_1.1.zip")])
        .with("openfpga-GB", vec![release("v1.0", "agg23.GB_1.0.zip")]);
    let manifests = FakeManifests::default();
    let installer = RecordingInstaller {
        fail_on: Some(url("agg23.NES_1.1.zip")),
        ..RecordingInstaller::default()
    };

    let error = runner(&feed, &manifests, &installer, false)
        .run(&[pkg("openfpga-NES"), pkg("openfpga-GB")])
        .await
        .expect_err("installer failure should abort the run");

    assert!(matches!(error, RunError::Install { ref package, .. } if package == "agg23.NES"));
    assert_eq!(feed.requests(), ["openfpga-NES"]);
}

#[tokio::test]
async fn check_only_never_installs() {
    let feed = FakeFeed::default()
        .with("openfpga-NES", vec![release("v1.1", "agg23.NES_1.1.zip")]);
    let manifests = FakeManifests::default().with("agg23.NES", "1.0");
    let installer = RecordingInstaller::default();

    let summary = runner(&feed, &manifests, &installer, true)
        .run(&[pkg("openfpga-NES")])
        .await
        .expect("check run should succeed");

    assert!(installer.installed().is_empty());
    assert_eq!(summary.pending, 1);
    assert_eq!(summary.installed, 0);
}

#[tokio::test]
async fn empty_cores_list_is_a_successful_no_op() {
    let feed = FakeFeed::default();
    let manifests = FakeManifests::default();
    let installer = RecordingInstaller::default();

    let summary = runner(&feed, &manifests, &installer, false)
        .run(&[])
        .await
        .expect("empty run should succeed");

    assert_eq!(summary.checked, 0);
    assert!(feed.requests().is_empty());
}
