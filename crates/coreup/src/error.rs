use coreup_platform::AppPathsError;
use thiserror::Error;

use crate::cores::CoresError;
use crate::run_lock::AcquireError;
use crate::runner::RunError;

/// Everything that ends a `coreup` invocation with a non-zero exit status.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Paths(#[from] AppPathsError),
    #[error("failed to prepare application directories: {0}")]
    Dirs(#[source] std::io::Error),
    #[error(transparent)]
    Cores(#[from] CoresError),
    #[error(transparent)]
    Lock(#[from] AcquireError),
    #[error("failed to build HTTP client: {0}")]
    Http(#[source] reqwest::Error),
    #[error(transparent)]
    Run(#[from] RunError),
}
