use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use coreup_platform::AppPaths;

use crate::settings::AppSettings;

/// Check tracked cores for newer upstream releases and install them.
#[derive(Debug, Parser)]
#[command(name = "coreup", version)]
pub struct Cli {
    /// JSON list of cores to track
    #[arg(long, value_name = "FILE", env = "COREUP_CORES")]
    pub cores: Option<PathBuf>,

    /// Directory cores are installed into
    #[arg(long, value_name = "DIR", env = "COREUP_BASE_DIR")]
    pub base_dir: Option<PathBuf>,

    /// Report what would be installed without downloading anything
    #[arg(long)]
    pub check: bool,

    /// Do not print progress to the terminal
    #[arg(short, long, conflicts_with = "debug")]
    pub quiet: bool,

    /// Print debug output to the terminal
    #[arg(long)]
    pub debug: bool,

    /// Base URL of the GitHub API
    #[arg(long, value_name = "URL", env = "COREUP_API_URL")]
    pub api_url: Option<String>,
}

/// Fully resolved options for one run. Command-line values win over settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub cores_file: PathBuf,
    pub base_dir: PathBuf,
    pub api_base_url: String,
    pub http_timeout: Duration,
    pub check_only: bool,
    pub console: bool,
    pub debug: bool,
    pub log_file: PathBuf,
    pub max_log_size_bytes: u64,
}

impl Cli {
    #[must_use]
    pub fn resolve(self, settings: &AppSettings, paths: &AppPaths, cwd: PathBuf) -> RunConfig {
        RunConfig {
            cores_file: self
                .cores
                .or_else(|| settings.cores_file.clone())
                .unwrap_or_else(|| paths.cores_file()),
            base_dir: self
                .base_dir
                .or_else(|| settings.base_dir.clone())
                .unwrap_or(cwd),
            api_base_url: self
                .api_url
                .unwrap_or_else(|| settings.api_base_url.clone()),
            http_timeout: Duration::from_secs(settings.http_timeout_secs),
            check_only: self.check,
            console: !self.quiet,
            debug: self.debug || settings.debug_logging,
            log_file: paths.log_file(),
            max_log_size_bytes: settings.max_log_size_bytes,
        }
    }
}
