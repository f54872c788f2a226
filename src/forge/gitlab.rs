//! forge::gitlab
//!
//! GitLab release host using the v4 REST API.
//!
//! # Design
//!
//! GitLab addresses projects by numeric id. [`ReleaseHost::resolve`] looks the
//! id up from the project path (`GET /projects/:url-encoded-path`) and every
//! later call uses it.
//!
//! # Self-hosted instances
//!
//! The base URL is the instance root (e.g. `https://gitlab.example.com`); the
//! API root `<base>/api/v4` and web links are derived from it.
//!
//! # Example
//!
//! ```ignore
//! use releasekit::forge::gitlab::GitLabHost;
//!
//! let host = GitLabHost::with_base_url("glpat-xxx", "https://gitlab.example.com", timeout)?;
//! let handle = host.resolve(&project).await?;
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Url;
use serde::{Deserialize, Serialize};

use super::http::{secret_header, ApiClient, USER_AGENT_VALUE};
use super::traits::{
    CommitSummary, ForgeError, Release, ReleaseHost, ReleaseRequest, RepoHandle, Tag,
};
use crate::core::types::RepositoryRef;

/// Default GitLab instance URL.
pub const DEFAULT_BASE_URL: &str = "https://gitlab.com";

/// GitLab release host.
#[derive(Debug)]
pub struct GitLabHost {
    /// Authenticated API client rooted at `<base>/api/v4`
    api: ApiClient,
    /// Instance root for web links
    base_url: String,
}

impl GitLabHost {
    /// Create a host for gitlab.com.
    pub fn new(token: &str, timeout: Duration) -> Result<Self, ForgeError> {
        Self::with_base_url(token, DEFAULT_BASE_URL, timeout)
    }

    /// Create a host for a self-hosted instance.
    ///
    /// # Arguments
    ///
    /// * `token` - Personal access token with `api` scope
    /// * `base_url` - Instance root (e.g., `https://gitlab.example.com`)
    /// * `timeout` - Per-request timeout
    ///
    /// # Errors
    ///
    /// - `AuthRequired` if the token is empty
    /// - `InvalidUrl` if the base URL is unusable
    pub fn with_base_url(
        token: &str,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, ForgeError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(ForgeError::AuthRequired);
        }

        let mut headers = HeaderMap::new();
        headers.insert("PRIVATE-TOKEN", secret_header(token)?);
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let base_url = base_url.trim_end_matches('/').to_string();
        let api_base = format!("{}/api/v4", base_url);

        Ok(Self {
            api: ApiClient::new(&api_base, headers, timeout)?,
            base_url,
        })
    }

    /// Instance root URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build URL for a project endpoint.
    fn project_url(&self, repo: &RepoHandle, rest: &[&str]) -> Result<Url, ForgeError> {
        let mut segments: Vec<&str> = vec!["projects", repo.api_id.as_str()];
        segments.extend_from_slice(rest);
        self.api.url(&segments)
    }

    /// Fallback web URL of a release when the API omits `_links.self`.
    fn release_web_url(&self, repo: &RepoHandle, tag_name: &str) -> String {
        format!("{}/{}/-/releases/{}", self.base_url, repo.path, tag_name)
    }
}

#[async_trait]
impl ReleaseHost for GitLabHost {
    fn name(&self) -> &'static str {
        "gitlab"
    }

    async fn resolve(&self, repo: &RepositoryRef) -> Result<RepoHandle, ForgeError> {
        let path = repo.path();
        let url = self.api.url(&["projects", path.as_str()])?;
        let project: GitLabProject = self.api.get(url, &[]).await?;
        tracing::debug!(project = %path, id = project.id, "resolved project id");

        Ok(RepoHandle {
            path,
            api_id: project.id.to_string(),
        })
    }

    async fn list_tags(&self, repo: &RepoHandle) -> Result<Vec<Tag>, ForgeError> {
        let url = self.project_url(repo, &["repository", "tags"])?;
        let tags: Vec<GitLabTag> = self.api.get(url, &[]).await?;
        Ok(tags.into_iter().map(Into::into).collect())
    }

    async fn release_exists(&self, repo: &RepoHandle, tag_name: &str) -> Result<bool, ForgeError> {
        let url = self.project_url(repo, &["releases", tag_name])?;
        self.api.exists(url).await
    }

    async fn compare_commits(
        &self,
        repo: &RepoHandle,
        from: &str,
        to: &str,
    ) -> Result<Vec<CommitSummary>, ForgeError> {
        let url = self.project_url(repo, &["repository", "compare"])?;
        let comparison: GitLabComparison = self.api.get(url, &[("from", from), ("to", to)]).await?;
        Ok(comparison.commits.into_iter().map(Into::into).collect())
    }

    fn compare_url(&self, repo: &RepoHandle, from: &str, to: &str) -> String {
        format!("{}/{}/-/compare/{}...{}", self.base_url, repo.path, from, to)
    }

    async fn create_release(
        &self,
        repo: &RepoHandle,
        request: ReleaseRequest,
    ) -> Result<Release, ForgeError> {
        let url = self.project_url(repo, &["releases"])?;
        let body = CreateReleaseBody {
            tag_name: &request.tag_name,
            name: &request.name,
            description: &request.body,
            milestones: &request.milestones,
        };

        let release: GitLabRelease = self.api.post(url, &body).await?;
        let web_url = release
            .links
            .and_then(|links| links.self_url)
            .unwrap_or_else(|| self.release_web_url(repo, &release.tag_name));

        Ok(Release {
            tag_name: release.tag_name,
            url: web_url,
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
    description: &'a str,
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    milestones: &'a [String],
}

/// Project lookup response (only the id is used).
#[derive(Deserialize)]
struct GitLabProject {
    id: u64,
}

/// Tag list item.
#[derive(Deserialize)]
struct GitLabTag {
    name: String,
    commit: GitLabCommitRef,
}

#[derive(Deserialize)]
struct GitLabCommitRef {
    id: String,
}

/// Compare endpoint response.
#[derive(Deserialize)]
struct GitLabComparison {
    #[serde(default)]
    commits: Vec<GitLabCommit>,
}

#[derive(Deserialize)]
struct GitLabCommit {
    short_id: String,
    message: String,
    author_name: String,
}

/// Created release response.
#[derive(Deserialize)]
struct GitLabRelease {
    tag_name: String,
    #[serde(rename = "_links")]
    links: Option<GitLabReleaseLinks>,
}

#[derive(Deserialize)]
struct GitLabReleaseLinks {
    #[serde(rename = "self")]
    self_url: Option<String>,
}

impl From<GitLabTag> for Tag {
    fn from(tag: GitLabTag) -> Self {
        Tag::new(tag.name, tag.commit.id)
    }
}

impl From<GitLabCommit> for CommitSummary {
    fn from(commit: GitLabCommit) -> Self {
        CommitSummary::new(commit.short_id, &commit.message, commit.author_name)
    }
}
