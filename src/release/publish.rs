//! release::publish
//!
//! Idempotent release creation.
//!
//! A release is only created when the host reports none for the tag, so
//! re-running against the same tags never creates duplicates. The check and
//! the creation are separate requests; two concurrent runs against the same
//! tag can still race, in which case the host rejects the second POST and it
//! is reported as a failure.
//!
//! GitHub's lookup by tag skips draft releases, so drafts are invisible to
//! the existence check and a rerun with `draft` set creates a second draft.

use tracing::{debug, info};

use crate::forge::{ForgeError, ReleaseHost, ReleaseRequest, RepoHandle};

/// Result of publishing one release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// The release was created; `url` is its web page.
    Created { url: String },
    /// A release for the tag already exists; nothing was sent.
    AlreadyExists,
    /// The existence check or the creation failed.
    Failed(String),
}

/// Create a release for `request.tag_name` unless one exists.
pub async fn publish(
    host: &dyn ReleaseHost,
    repo: &RepoHandle,
    request: ReleaseRequest,
) -> PublishOutcome {
    match host.release_exists(repo, &request.tag_name).await {
        Ok(true) => {
            debug!(repo = %repo.path, tag = %request.tag_name, "release already exists");
            return PublishOutcome::AlreadyExists;
        }
        Ok(false) => {}
        Err(e) => {
            return PublishOutcome::Failed(format!(
                "could not check for an existing release of {}: {}",
                request.tag_name,
                failure_reason(&e)
            ));
        }
    }

    let tag = request.tag_name.clone();
    match host.create_release(repo, request).await {
        Ok(release) => {
            info!(repo = %repo.path, %tag, url = %release.url, "release created");
            PublishOutcome::Created { url: release.url }
        }
        Err(e) => PublishOutcome::Failed(format!(
            "could not create release {}: {}",
            tag,
            failure_reason(&e)
        )),
    }
}

/// Human-readable failure cause, with status code and body for API errors.
pub fn failure_reason(error: &ForgeError) -> String {
    match error {
        ForgeError::NotFound(body) => format!("HTTP 404: {}", body_or_placeholder(body)),
        ForgeError::ApiError { status, message } => {
            format!("HTTP {}: {}", status, body_or_placeholder(message))
        }
        other => other.to_string(),
    }
}

fn body_or_placeholder(body: &str) -> &str {
    let body = body.trim();
    if body.is_empty() {
        "<empty response body>"
    } else {
        body
    }
}
