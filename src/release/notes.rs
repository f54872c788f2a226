//! release::notes
//!
//! Release notes built from the commits between two tags.
//!
//! Notes are best effort. Without a previous tag, when the comparison cannot
//! be fetched, or when it contains no commits, the body falls back to the
//! one-line `Release <tag>`. Generating notes never fails a release.

use tracing::warn;

use crate::forge::{minimal_body, CommitSummary, ReleaseHost, RepoHandle};

/// Build the release body for `to`, summarizing commits since `from`.
///
/// No request is made when `from` is `None`.
pub async fn summarize(
    host: &dyn ReleaseHost,
    repo: &RepoHandle,
    from: Option<&str>,
    to: &str,
) -> String {
    let Some(from) = from else {
        return minimal_body(to);
    };

    match host.compare_commits(repo, from, to).await {
        Ok(commits) => {
            tracing::debug!(repo = %repo.path, from, to, count = commits.len(), "compared tags");
            render_notes(to, &commits, &host.compare_url(repo, from, to))
        }
        Err(e) => {
            warn!(repo = %repo.path, from, to, error = %e, "could not fetch commits, using minimal notes");
            minimal_body(to)
        }
    }
}

/// Render markdown notes for `tag` from a commit list.
///
/// Commits are listed in the order given. An empty list yields the minimal body.
///
/// # Example
///
/// ```
/// use releasekit::forge::CommitSummary;
/// use releasekit::release::notes::render_notes;
///
/// let commits = vec![CommitSummary::new("abc1234", "Add widget", "Ada")];
/// let notes = render_notes("v2.0", &commits, "https://example.com/compare/v1.0...v2.0");
/// assert!(notes.starts_with("## What's Changed in v2.0\n"));
/// assert!(notes.contains("- Add widget (abc1234) by Ada"));
/// ```
pub fn render_notes(tag: &str, commits: &[CommitSummary], compare_url: &str) -> String {
    if commits.is_empty() {
        return minimal_body(tag);
    }

    let mut lines = Vec::with_capacity(commits.len() + 2);
    lines.push(format!("## What's Changed in {}\n", tag));
    lines.extend(
        commits
            .iter()
            .map(|c| format!("- {} ({}) by {}", c.message, c.short_id, c.author_name)),
    );
    lines.push(format!("\n**Full Changelog**: {}", compare_url));

    lines.join("\n")
}
