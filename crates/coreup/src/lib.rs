//! The `coreup` command: configuration, logging and the run loop that ties
//! the release feed, the update decision and the installer together.

pub mod cli;
pub mod cores;
mod error;
pub mod logging;
pub mod run_lock;
pub mod runner;
pub mod settings;

pub use error::AppError;
