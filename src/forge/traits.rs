//! forge::traits
//!
//! `ReleaseHost` trait definition for interacting with release hosting services.
//!
//! # Design
//!
//! The `ReleaseHost` trait is async because host operations involve network I/O.
//! All methods return `Result` so callers decide how to degrade; hosts never
//! retry on their own.
//!
//! Repositories are first resolved into a [`RepoHandle`]. GitHub addresses a
//! repository by `owner/name` directly, while GitLab needs the numeric project
//! id, so resolution is the only place the two platforms differ in shape.
//!
//! # Example
//!
//! ```ignore
//! use releasekit::forge::{ReleaseHost, ReleaseRequest};
//!
//! async fn release_latest(host: &dyn ReleaseHost, repo: &RepositoryRef) -> Result<(), ForgeError> {
//!     let handle = host.resolve(repo).await?;
//!     let tags = host.list_tags(&handle).await?;
//!     if let Some(tag) = tags.first() {
//!         if !host.release_exists(&handle, &tag.name).await? {
//!             let release = host
//!                 .create_release(&handle, ReleaseRequest::minimal(&tag.name))
//!                 .await?;
//!             println!("Created {}", release.url);
//!         }
//!     }
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use thiserror::Error;

use crate::core::types::RepositoryRef;

/// Errors from host operations.
///
/// These error types map to the failure modes of a REST call: the request
/// never completed, or the server answered with a non-2xx status.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ForgeError {
    /// No token was supplied for the host.
    #[error("authentication required")]
    AuthRequired,

    /// The token cannot be sent as an HTTP header value.
    #[error("invalid token: {0}")]
    InvalidToken(String),

    /// The configured base URL cannot address API endpoints.
    #[error("invalid base URL: {0}")]
    InvalidUrl(String),

    /// The server answered 404.
    #[error("not found (404): {0}")]
    NotFound(String),

    /// The server answered with any other non-2xx status.
    #[error("API error: {status} - {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Response body as returned by the API
        message: String,
    },

    /// Network or connection error, including timeouts.
    #[error("network error: {0}")]
    NetworkError(String),

    /// The response could not be decoded.
    #[error("failed to parse response: {0}")]
    Decode(String),
}

impl ForgeError {
    /// HTTP status code, if the error came from an API response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ForgeError::NotFound(_) => Some(404),
            ForgeError::ApiError { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// A repository resolved against its host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoHandle {
    /// Human-readable path (`owner/name` or `group/.../project`)
    pub path: String,
    /// Identifier used in API URLs (GitHub: path, GitLab: numeric project id)
    pub api_id: String,
}

impl RepoHandle {
    /// Handle whose API identifier is the path itself.
    pub fn from_path(path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            api_id: path.clone(),
            path,
        }
    }
}

/// A tag as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// Tag name (e.g. `v2.0.0`)
    pub name: String,
    /// SHA of the tagged commit
    pub commit_sha: String,
}

impl Tag {
    pub fn new(name: impl Into<String>, commit_sha: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            commit_sha: commit_sha.into(),
        }
    }
}

/// One commit in a tag comparison, reduced to what release notes need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitSummary {
    /// Abbreviated commit id
    pub short_id: String,
    /// First line of the commit message
    pub message: String,
    /// Commit author name
    pub author_name: String,
}

impl CommitSummary {
    /// Build a summary, keeping only the first line of `message`.
    pub fn new(
        short_id: impl Into<String>,
        message: &str,
        author_name: impl Into<String>,
    ) -> Self {
        Self {
            short_id: short_id.into(),
            message: message.lines().next().unwrap_or_default().trim_end().to_string(),
            author_name: author_name.into(),
        }
    }
}

/// Request to create a release.
///
/// `draft` and `prerelease` apply to GitHub; `milestones` applies to GitLab.
/// Hosts ignore the fields they do not support.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReleaseRequest {
    /// Tag the release is attached to
    pub tag_name: String,
    /// Display name
    pub name: String,
    /// Release body / description (markdown)
    pub body: String,
    /// Create as draft
    pub draft: bool,
    /// Mark as prerelease
    pub prerelease: bool,
    /// Milestone titles to associate
    pub milestones: Vec<String>,
}

impl ReleaseRequest {
    /// Request named after the tag with the minimal `Release <tag>` body.
    pub fn minimal(tag_name: &str) -> Self {
        Self {
            tag_name: tag_name.to_string(),
            name: tag_name.to_string(),
            body: minimal_body(tag_name),
            ..Default::default()
        }
    }
}

/// The body used when no release notes are generated.
pub fn minimal_body(tag_name: &str) -> String {
    format!("Release {}", tag_name)
}

/// A release created on the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    /// Tag the release is attached to
    pub tag_name: String,
    /// Canonical web URL of the release
    pub url: String,
}

/// The trait for interacting with a release hosting service.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow use across async tasks.
///
/// # Error Handling
///
/// All methods return `Result<T, ForgeError>`. Callers should handle:
/// - `NotFound`: repository, project or release doesn't exist
/// - `ApiError`: display status and body to the user
/// - `NetworkError`: check connectivity or raise the timeout
#[async_trait]
pub trait ReleaseHost: Send + Sync {
    /// Get the host name (e.g., "github", "gitlab").
    fn name(&self) -> &'static str;

    /// Resolve a repository into the handle used by the other operations.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the project doesn't exist (GitLab)
    async fn resolve(&self, repo: &RepositoryRef) -> Result<RepoHandle, ForgeError>;

    /// List tags, in the order the host returns them.
    async fn list_tags(&self, repo: &RepoHandle) -> Result<Vec<Tag>, ForgeError>;

    /// Check whether a release exists for `tag_name`.
    ///
    /// A 404 means "no release"; any other failure is an error.
    async fn release_exists(&self, repo: &RepoHandle, tag_name: &str) -> Result<bool, ForgeError>;

    /// List the commits between two refs, in the order the host returns them.
    async fn compare_commits(
        &self,
        repo: &RepoHandle,
        from: &str,
        to: &str,
    ) -> Result<Vec<CommitSummary>, ForgeError>;

    /// Web URL comparing two refs, for the changelog link in release notes.
    fn compare_url(&self, repo: &RepoHandle, from: &str, to: &str) -> String;

    /// Create a release.
    ///
    /// # Returns
    ///
    /// The created [`Release`] with its canonical web URL.
    ///
    /// # Errors
    ///
    /// - `ApiError` with status 422 / 409 if the host rejects the request
    async fn create_release(
        &self,
        repo: &RepoHandle,
        request: ReleaseRequest,
    ) -> Result<Release, ForgeError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forge_error_display() {
        assert_eq!(
            format!("{}", ForgeError::AuthRequired),
            "authentication required"
        );
        assert_eq!(
            format!("{}", ForgeError::NotFound("{\"message\":\"Not Found\"}".into())),
            "not found (404): {\"message\":\"Not Found\"}"
        );
        assert_eq!(
            format!(
                "{}",
                ForgeError::ApiError {
                    status: 422,
                    message: "Validation failed".into()
                }
            ),
            "API error: 422 - Validation failed"
        );
        assert_eq!(
            format!("{}", ForgeError::NetworkError("connection refused".into())),
            "network error: connection refused"
        );
    }

    #[test]
    fn forge_error_status() {
        assert_eq!(ForgeError::NotFound(String::new()).status(), Some(404));
        assert_eq!(
            ForgeError::ApiError {
                status: 500,
                message: String::new()
            }
            .status(),
            Some(500)
        );
        assert_eq!(ForgeError::NetworkError("x".into()).status(), None);
    }

    #[test]
    fn commit_summary_keeps_first_line() {
        let commit = CommitSummary::new("abc1234", "Fix parser\n\nLonger body here", "Ada");
        assert_eq!(commit.message, "Fix parser");
        assert_eq!(commit.short_id, "abc1234");
        assert_eq!(commit.author_name, "Ada");
    }

    #[test]
    fn commit_summary_empty_message() {
        let commit = CommitSummary::new("abc1234", "", "Ada");
        assert_eq!(commit.message, "");
    }

    #[test]
    fn minimal_request_uses_tag() {
        let req = ReleaseRequest::minimal("v1.2.0");
        assert_eq!(req.tag_name, "v1.2.0");
        assert_eq!(req.name, "v1.2.0");
        assert_eq!(req.body, "Release v1.2.0");
        assert!(!req.draft);
        assert!(!req.prerelease);
        assert!(req.milestones.is_empty());
    }

    #[test]
    fn handle_from_path() {
        let handle = RepoHandle::from_path("acme/widget");
        assert_eq!(handle.path, "acme/widget");
        assert_eq!(handle.api_id, "acme/widget");
    }
}
