//! GitHub Releases as a coreup release feed.

mod client;
mod types;

pub use client::{DEFAULT_API_BASE_URL, GitHubClient, USER_AGENT};
pub use types::{GitHubAsset, GitHubRelease};
