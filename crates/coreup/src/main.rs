use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use coreup::AppError;
use coreup::cli::{Cli, RunConfig};
use coreup::cores::load_cores;
use coreup::logging::init_logging;
use coreup::run_lock::RunLock;
use coreup::runner::{RunOptions, RunSummary, Runner};
use coreup::settings::AppSettings;
use coreup_github::{GitHubClient, USER_AGENT};
use coreup_local::{FsManifestStore, ZipInstaller};
use coreup_platform::AppPaths;
use log::{debug, error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let quiet = cli.quiet;

    let paths = match prepare_paths() {
        Ok(paths) => paths,
        Err(error) => {
            eprintln!("coreup: {error}");
            return ExitCode::FAILURE;
        }
    };

    let settings = AppSettings::load_from_path(&paths.settings_file());
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let config = cli.resolve(&settings, &paths, cwd);
    init_logging(&config);

    match run(&paths, &config).await {
        Ok(summary) => {
            debug!("Run finished: {summary:?}");
            ExitCode::SUCCESS
        }
        Err(app_error) => {
            error!("{app_error}");
            if quiet {
                eprintln!("coreup: {app_error}");
            }
            ExitCode::FAILURE
        }
    }
}

fn prepare_paths() -> Result<AppPaths, AppError> {
    let paths = AppPaths::new()?;
    paths.ensure_dirs().map_err(AppError::Dirs)?;
    Ok(paths)
}

async fn run(paths: &AppPaths, config: &RunConfig) -> Result<RunSummary, AppError> {
    let _lock = RunLock::acquire(&paths.lock_file())?;

    let packages = load_cores(&config.cores_file)?;
    info!(
        "Loaded {} cores from {}",
        packages.len(),
        config.cores_file.display()
    );

    let http = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(config.http_timeout)
        .build()
        .map_err(AppError::Http)?;

    let feed = GitHubClient::new(http.clone(), config.api_base_url.clone());
    let manifests = FsManifestStore::new(config.base_dir.clone());
    let installer = ZipInstaller::new(http, config.base_dir.clone());
    debug!("Installing into {}", installer.install_dir().display());

    let runner = Runner::new(
        &feed,
        &manifests,
        &installer,
        RunOptions {
            check_only: config.check_only,
        },
    );
    Ok(runner.run(&packages).await?)
}
