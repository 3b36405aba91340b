use async_trait::async_trait;
use coreup_core::{FeedError, ReleaseCandidate, ReleaseFeed, RepoCoordinates};
use log::{debug, warn};

use crate::types::GitHubRelease;

pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";
pub const USER_AGENT: &str = concat!("coreup/", env!("CARGO_PKG_VERSION"));

const RATE_LIMIT_WARN_THRESHOLD: u32 = 10;

#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    api_base_url: String,
}

impl GitHubClient {
    #[must_use]
    pub fn new(http: reqwest::Client, api_base_url: impl Into<String>) -> Self {
        let api_base_url = api_base_url.into().trim_end_matches('/').to_string();
        Self { http, api_base_url }
    }

    #[must_use]
    pub fn releases_url(&self, repo: &RepoCoordinates) -> String {
        format!(
            "{}/repos/{}/{}/releases",
            self.api_base_url, repo.user, repo.project
        )
    }

    /// List the releases of `repo` in the order GitHub returns them.
    ///
    /// # Errors
    /// Returns an error when the request fails, GitHub answers with a
    /// non-success status, or the body is not a release list.
    pub async fn list_releases(
        &self,
        repo: &RepoCoordinates,
    ) -> Result<Vec<ReleaseCandidate>, FeedError> {
        let url = self.releases_url(repo);
        debug!("Fetching releases from {url}");

        let response = self
            .http
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .send()
            .await
            .map_err(|error| FeedError::request(repo.to_string(), error))?;

        if let Some(remaining) = response.headers().get("x-ratelimit-remaining")
            && let Ok(remaining) = remaining.to_str()
            && let Ok(remaining) = remaining.parse::<u32>()
            && remaining < RATE_LIMIT_WARN_THRESHOLD
        {
            warn!("GitHub rate limit low: {remaining} requests remaining");
        }

        if !response.status().is_success() {
            let status = response.status();
            let body_snippet = response
                .text()
                .await
                .ok()
                .map(|body| response_snippet(&body, 160))
                .unwrap_or_default();
            return Err(FeedError::HttpStatus {
                repo: repo.to_string(),
                status: status.as_u16(),
                body_snippet,
            });
        }

        let releases: Vec<GitHubRelease> = response
            .json()
            .await
            .map_err(|error| FeedError::parse(repo.to_string(), error))?;

        debug!("{repo} has {} releases", releases.len());
        Ok(releases.into_iter().map(ReleaseCandidate::from).collect())
    }
}

#[async_trait]
impl ReleaseFeed for GitHubClient {
    async fn fetch_releases(
        &self,
        repo: &RepoCoordinates,
    ) -> Result<Vec<ReleaseCandidate>, FeedError> {
        self.list_releases(repo).await
    }
}

fn response_snippet(body: &str, max_chars: usize) -> String {
    let snippet: String = body.chars().take(max_chars).collect();
    if snippet.is_empty() {
        String::new()
    } else {
        format!(": {snippet}")
    }
}
