//! forge::github
//!
//! GitHub release host using the REST API.
//!
//! # Design
//!
//! This module implements the `ReleaseHost` trait for GitHub. Repositories are
//! addressed as `owner/name` directly, so [`ReleaseHost::resolve`] makes no
//! request.
//!
//! # Authentication
//!
//! A personal access token (classic or fine-grained) with `contents: write`
//! is sent as `Authorization: Bearer <token>`.
//!
//! # GitHub Enterprise
//!
//! Use [`GitHubHost::with_api_base`] with the instance's API root, e.g.
//! `https://github.example.com/api/v3`. Web links in release notes are derived
//! from the API root.
//!
//! # Example
//!
//! ```ignore
//! use releasekit::forge::github::GitHubHost;
//! use releasekit::forge::ReleaseHost;
//!
//! let host = GitHubHost::new("ghp_xxx", DEFAULT_TIMEOUT)?;
//! let handle = host.resolve(&repo).await?;
//! let tags = host.list_tags(&handle).await?;
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::Url;
use serde::{Deserialize, Serialize};

use super::http::{secret_header, ApiClient, USER_AGENT_VALUE};
use super::traits::{
    CommitSummary, ForgeError, Release, ReleaseHost, ReleaseRequest, RepoHandle, Tag,
};
use crate::core::types::RepositoryRef;

/// Default GitHub API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Tags requested per page. GitHub's maximum.
const TAGS_PER_PAGE: &str = "100";

/// GitHub release host.
#[derive(Debug)]
pub struct GitHubHost {
    /// Authenticated API client
    api: ApiClient,
    /// Web base URL for compare links (e.g. `https://github.com`)
    web_base: String,
}

impl GitHubHost {
    /// Create a host for github.com.
    ///
    /// # Errors
    ///
    /// - `AuthRequired` if the token is empty
    /// - `InvalidToken` if the token is not a valid header value
    pub fn new(token: &str, timeout: Duration) -> Result<Self, ForgeError> {
        Self::with_api_base(token, DEFAULT_API_BASE, timeout)
    }

    /// Create a host with a custom API base URL (GitHub Enterprise).
    ///
    /// # Arguments
    ///
    /// * `token` - Personal access token
    /// * `api_base` - API root (e.g., `https://github.example.com/api/v3`)
    /// * `timeout` - Per-request timeout
    pub fn with_api_base(
        token: &str,
        api_base: &str,
        timeout: Duration,
    ) -> Result<Self, ForgeError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(ForgeError::AuthRequired);
        }
        let auth = secret_header(&format!("Bearer {}", token))?;

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static("2022-11-28"),
        );

        Ok(Self {
            api: ApiClient::new(api_base, headers, timeout)?,
            web_base: web_base_for(api_base),
        })
    }

    /// Web base URL used for compare links.
    pub fn web_base(&self) -> &str {
        &self.web_base
    }

    /// Build URL for a repository endpoint.
    fn repo_url(&self, repo: &RepoHandle, rest: &[&str]) -> Result<Url, ForgeError> {
        let mut segments: Vec<&str> = vec!["repos"];
        segments.extend(repo.api_id.split('/'));
        segments.extend_from_slice(rest);
        self.api.url(&segments)
    }
}

/// Derive the web base URL from an API base URL.
///
/// `https://api.github.com` maps to `https://github.com`; Enterprise roots
/// ending in `/api/v3` map to the instance root. Anything else is used as-is.
///
/// # Example
///
/// ```
/// use releasekit::forge::github::web_base_for;
///
/// assert_eq!(web_base_for("https://api.github.com"), "https://github.com");
/// assert_eq!(web_base_for("https://ghe.corp/api/v3/"), "https://ghe.corp");
/// ```
pub fn web_base_for(api_base: &str) -> String {
    let trimmed = api_base.trim_end_matches('/');
    if trimmed == DEFAULT_API_BASE {
        "https://github.com".to_string()
    } else if let Some(root) = trimmed.strip_suffix("/api/v3") {
        root.to_string()
    } else {
        trimmed.to_string()
    }
}

#[async_trait]
impl ReleaseHost for GitHubHost {
    fn name(&self) -> &'static str {
        "github"
    }

    async fn resolve(&self, repo: &RepositoryRef) -> Result<RepoHandle, ForgeError> {
        Ok(RepoHandle::from_path(repo.path()))
    }

    async fn list_tags(&self, repo: &RepoHandle) -> Result<Vec<Tag>, ForgeError> {
        let url = self.repo_url(repo, &["tags"])?;
        let tags: Vec<GitHubTag> = self.api.get(url, &[("per_page", TAGS_PER_PAGE)]).await?;
        Ok(tags.into_iter().map(Into::into).collect())
    }

    async fn release_exists(&self, repo: &RepoHandle, tag_name: &str) -> Result<bool, ForgeError> {
        let url = self.repo_url(repo, &["releases", "tags", tag_name])?;
        self.api.exists(url).await
    }

    async fn compare_commits(
        &self,
        repo: &RepoHandle,
        from: &str,
        to: &str,
    ) -> Result<Vec<CommitSummary>, ForgeError> {
        let range = format!("{}...{}", from, to);
        let url = self.repo_url(repo, &["compare", &range])?;
        let comparison: GitHubComparison = self.api.get(url, &[]).await?;
        Ok(comparison.commits.into_iter().map(Into::into).collect())
    }

    fn compare_url(&self, repo: &RepoHandle, from: &str, to: &str) -> String {
        format!("{}/{}/compare/{}...{}", self.web_base, repo.path, from, to)
    }

    async fn create_release(
        &self,
        repo: &RepoHandle,
        request: ReleaseRequest,
    ) -> Result<Release, ForgeError> {
        let url = self.repo_url(repo, &["releases"])?;
        let body = CreateReleaseBody {
            tag_name: &request.tag_name,
            name: &request.name,
            body: &request.body,
            draft: request.draft,
            prerelease: request.prerelease,
        };

        let release: GitHubRelease = self.api.post(url, &body).await?;
        Ok(Release {
            tag_name: release.tag_name,
            url: release.html_url,
        })
    }
}

// --------------------------------------------------------------------------
// API Request/Response Types
// --------------------------------------------------------------------------

/// Request body for creating a release.
#[derive(Serialize)]
struct CreateReleaseBody<'a> {
    tag_name: &'a str,
    name: &'a str,
    body: &'a str,
    draft: bool,
    prerelease: bool,
}

/// GitHub tag list item.
#[derive(Deserialize)]
struct GitHubTag {
    name: String,
    commit: GitHubCommitRef,
}

/// Commit reference inside a tag.
#[derive(Deserialize)]
struct GitHubCommitRef {
    sha: String,
}

/// Compare endpoint response (only the commit list is used).
#[derive(Deserialize)]
struct GitHubComparison {
    #[serde(default)]
    commits: Vec<GitHubCommit>,
}

/// Commit inside a comparison.
#[derive(Deserialize)]
struct GitHubCommit {
    sha: String,
    commit: GitHubCommitDetail,
}

#[derive(Deserialize)]
struct GitHubCommitDetail {
    message: String,
    /// Git author (may be null for unusual commits)
    author: Option<GitHubGitAuthor>,
}

#[derive(Deserialize)]
struct GitHubGitAuthor {
    name: String,
}

/// Created release response.
#[derive(Deserialize)]
struct GitHubRelease {
    tag_name: String,
    html_url: String,
}

impl From<GitHubTag> for Tag {
    fn from(tag: GitHubTag) -> Self {
        Tag::new(tag.name, tag.commit.sha)
    }
}

impl From<GitHubCommit> for CommitSummary {
    fn from(commit: GitHubCommit) -> Self {
        let short_id: String = commit.sha.chars().take(7).collect();
        let author = commit
            .commit
            .author
            .map(|a| a.name)
            .unwrap_or_else(|| "unknown".to_string());
        CommitSummary::new(short_id, &commit.commit.message, author)
    }
}
