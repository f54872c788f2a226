//! release::batch
//!
//! Batch orchestration: one release attempt per repository, in input order.
//!
//! # Flow
//!
//! Each repository moves through
//! `Pending → TagsResolved → (NoTags | NotesBuilt → Created | AlreadyExists | Failed)`.
//! Every error raised while processing a repository is converted into that
//! repository's [`RepoOutcome`]; nothing short of a panic stops the batch.
//!
//! Repositories are processed strictly one after another. The outcomes are
//! then folded into a [`BatchSummary`] whose counts always add up to the
//! number of repositories processed.

use crate::core::types::RepositoryRef;
use crate::forge::{minimal_body, ReleaseHost, ReleaseRequest, Tag};

use super::notes::summarize;
use super::publish::{failure_reason, publish, PublishOutcome};
use super::tags::{latest_tags, LatestTags, TagOrder};
use super::ReleaseError;

/// Release settings applied to every repository in a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseOptions {
    /// Generate notes from the commits since the previous tag
    pub auto_notes: bool,
    /// Create releases as drafts (GitHub)
    pub draft: bool,
    /// Mark releases as prereleases (GitHub)
    pub prerelease: bool,
    /// Milestones to associate (GitLab)
    pub milestones: Vec<String>,
    /// How to pick the latest tag
    pub tag_order: TagOrder,
}

impl Default for ReleaseOptions {
    fn default() -> Self {
        Self {
            auto_notes: true,
            draft: false,
            prerelease: false,
            milestones: Vec::new(),
            tag_order: TagOrder::Api,
        }
    }
}

/// Terminal state of one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoOutcome {
    /// A release was created for `tag`.
    Created { tag: String, url: String },
    /// A release for `tag` already existed.
    AlreadyExists { tag: String },
    /// The repository has no tags; nothing to release.
    NoTags,
    /// Something went wrong; `reason` is user-facing.
    Failed { reason: String },
}

impl RepoOutcome {
    /// Whether this outcome counts towards the failure total.
    pub fn is_failure(&self) -> bool {
        matches!(self, RepoOutcome::NoTags | RepoOutcome::Failed { .. })
    }
}

/// Outcome for one repository of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoReport {
    pub repo: RepositoryRef,
    pub outcome: RepoOutcome,
}

/// Aggregate counts for a batch.
///
/// `created + already_exists + failed == total` always holds; `no_tags` is the
/// part of `failed` caused by repositories without tags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub created: usize,
    pub already_exists: usize,
    pub failed: usize,
    pub no_tags: usize,
    pub total: usize,
}

impl BatchSummary {
    /// Fold one outcome into the counts.
    pub fn record(mut self, outcome: &RepoOutcome) -> Self {
        self.total += 1;
        match outcome {
            RepoOutcome::Created { .. } => self.created += 1,
            RepoOutcome::AlreadyExists { .. } => self.already_exists += 1,
            RepoOutcome::NoTags => {
                self.no_tags += 1;
                self.failed += 1;
            }
            RepoOutcome::Failed { .. } => self.failed += 1,
        }
        self
    }

    /// Summarize a sequence of outcomes.
    pub fn from_outcomes<'a>(outcomes: impl IntoIterator<Item = &'a RepoOutcome>) -> Self {
        outcomes
            .into_iter()
            .fold(BatchSummary::default(), BatchSummary::record)
    }

    /// Whether every repository succeeded or was already released.
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// Process exit status: 0 without failures, 1 otherwise.
    pub fn exit_code(&self) -> u8 {
        if self.is_success() {
            0
        } else {
            1
        }
    }
}

/// Result of a whole batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub reports: Vec<RepoReport>,
    pub summary: BatchSummary,
}

/// Observer for batch progress.
///
/// All methods default to doing nothing.
pub trait Reporter {
    /// Processing of `repo` (1-based `index` of `total`) is starting.
    fn started(&mut self, _index: usize, _total: usize, _repo: &RepositoryRef) {}

    /// The tag to release was found.
    fn tags_resolved(&mut self, _repo: &RepositoryRef, _current: &Tag, _previous: Option<&Tag>) {}

    /// `repo` reached a terminal state.
    fn finished(&mut self, _repo: &RepositoryRef, _outcome: &RepoOutcome) {}
}

/// Reporter that ignores all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReporter;

impl Reporter for NoopReporter {}

/// Process every repository in order and summarize the outcomes.
pub async fn run_batch(
    host: &dyn ReleaseHost,
    repos: &[RepositoryRef],
    options: &ReleaseOptions,
    reporter: &mut dyn Reporter,
) -> BatchReport {
    let total = repos.len();
    let mut reports = Vec::with_capacity(total);

    for (index, repo) in repos.iter().enumerate() {
        reporter.started(index + 1, total, repo);
        let outcome = process_repository(host, repo, options, reporter).await;
        reporter.finished(repo, &outcome);
        reports.push(RepoReport {
            repo: repo.clone(),
            outcome,
        });
    }

    let summary = BatchSummary::from_outcomes(reports.iter().map(|r| &r.outcome));
    tracing::debug!(?summary, "batch finished");
    BatchReport { reports, summary }
}

/// Run the release workflow for one repository.
pub async fn process_repository(
    host: &dyn ReleaseHost,
    repo: &RepositoryRef,
    options: &ReleaseOptions,
    reporter: &mut dyn Reporter,
) -> RepoOutcome {
    match release_repository(host, repo, options, reporter).await {
        Ok(outcome) => outcome,
        Err(ReleaseError::NoTags { .. }) => RepoOutcome::NoTags,
        Err(ReleaseError::Forge(e)) => {
            tracing::debug!(repo = %repo, error = %e, "repository failed");
            RepoOutcome::Failed {
                reason: failure_reason(&e),
            }
        }
    }
}

async fn release_repository(
    host: &dyn ReleaseHost,
    repo: &RepositoryRef,
    options: &ReleaseOptions,
    reporter: &mut dyn Reporter,
) -> Result<RepoOutcome, ReleaseError> {
    let handle = host.resolve(repo).await?;
    let LatestTags { current, previous } = latest_tags(host, &handle, options.tag_order).await?;
    reporter.tags_resolved(repo, &current, previous.as_ref());

    let body = if options.auto_notes {
        summarize(
            host,
            &handle,
            previous.as_ref().map(|t| t.name.as_str()),
            &current.name,
        )
        .await
    } else {
        minimal_body(&current.name)
    };

    let request = ReleaseRequest {
        tag_name: current.name.clone(),
        name: current.name.clone(),
        body,
        draft: options.draft,
        prerelease: options.prerelease,
        milestones: options.milestones.clone(),
    };

    let tag = current.name;
    Ok(match publish(host, &handle, request).await {
        PublishOutcome::Created { url } => RepoOutcome::Created { tag, url },
        PublishOutcome::AlreadyExists => RepoOutcome::AlreadyExists { tag },
        PublishOutcome::Failed(reason) => RepoOutcome::Failed { reason },
    })
}
