//! forge::mock
//!
//! Mock release host for deterministic testing.
//!
//! # Design
//!
//! The mock host provides a deterministic implementation of the `ReleaseHost`
//! trait for use in tests. It stores repositories, tags, comparisons and
//! releases in memory, records every operation, and allows configuring
//! failure scenarios.
//!
//! # Example
//!
//! ```
//! use releasekit::core::types::RepositoryRef;
//! use releasekit::forge::mock::MockHost;
//! use releasekit::forge::{Platform, ReleaseHost, ReleaseRequest};
//!
//! # tokio_test::block_on(async {
//! let host = MockHost::new().with_repo("acme/widget", &["v2.0", "v1.0"]);
//! let repo = RepositoryRef::parse(Platform::GitHub, "acme/widget").unwrap();
//!
//! let handle = host.resolve(&repo).await.unwrap();
//! assert!(!host.release_exists(&handle, "v2.0").await.unwrap());
//!
//! host.create_release(&handle, ReleaseRequest::minimal("v2.0")).await.unwrap();
//! assert!(host.release_exists(&handle, "v2.0").await.unwrap());
//! # });
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use super::traits::{
    CommitSummary, ForgeError, Release, ReleaseHost, ReleaseRequest, RepoHandle, Tag,
};
use crate::core::types::RepositoryRef;

/// Mock host for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping; clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockHost {
    inner: Arc<Mutex<MockHostInner>>,
}

/// Internal mutable state.
#[derive(Debug, Default)]
struct MockHostInner {
    /// Known repositories by path.
    repos: HashMap<String, MockRepo>,
    /// Failure configuration, keyed by repository path (or all repositories).
    failures: Vec<(Option<String>, FailOn)>,
    /// Recorded operations for verification.
    operations: Vec<MockOperation>,
}

/// One repository's state.
#[derive(Debug, Clone, Default)]
struct MockRepo {
    tags: Vec<Tag>,
    commits: Vec<CommitSummary>,
    releases: HashMap<String, ReleaseRequest>,
}

/// Configuration for which operation should fail.
#[derive(Debug, Clone)]
pub enum FailOn {
    /// Fail resolve with the given error.
    Resolve(ForgeError),
    /// Fail list_tags with the given error.
    ListTags(ForgeError),
    /// Fail release_exists with the given error.
    ReleaseExists(ForgeError),
    /// Fail compare_commits with the given error.
    CompareCommits(ForgeError),
    /// Fail create_release with the given error.
    CreateRelease(ForgeError),
}

/// Recorded operation for test verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockOperation {
    Resolve { repo: String },
    ListTags { repo: String },
    ReleaseExists { repo: String, tag: String },
    CompareCommits { repo: String, from: String, to: String },
    CreateRelease { repo: String, request: ReleaseRequest },
}

impl MockHost {
    /// Create a new empty mock host.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a repository with tags (newest first, as a platform would list them).
    pub fn with_repo(self, path: &str, tags: &[&str]) -> Self {
        {
            let mut inner = self.state();
            let repo = inner.repos.entry(path.to_string()).or_default();
            repo.tags = tags
                .iter()
                .enumerate()
                .map(|(i, name)| Tag::new(*name, format!("{:040x}", i + 1)))
                .collect();
        }
        self
    }

    /// Set the commits returned when comparing any two tags of `path`.
    pub fn with_commits(self, path: &str, commits: Vec<CommitSummary>) -> Self {
        {
            let mut inner = self.state();
            inner.repos.entry(path.to_string()).or_default().commits = commits;
        }
        self
    }

    /// Mark a release as already existing.
    pub fn with_release(self, path: &str, tag: &str) -> Self {
        {
            let mut inner = self.state();
            inner
                .repos
                .entry(path.to_string())
                .or_default()
                .releases
                .insert(tag.to_string(), ReleaseRequest::minimal(tag));
        }
        self
    }

    /// Configure the mock to fail on a specific operation for every repository.
    pub fn fail_on(self, fail_on: FailOn) -> Self {
        self.state().failures.push((None, fail_on));
        self
    }

    /// Configure the mock to fail on a specific operation for one repository.
    pub fn fail_on_repo(self, path: &str, fail_on: FailOn) -> Self {
        self.state().failures.push((Some(path.to_string()), fail_on));
        self
    }

    /// Clear the failure configuration.
    pub fn clear_fail_on(&self) {
        self.state().failures.clear();
    }

    /// Get all recorded operations.
    pub fn operations(&self) -> Vec<MockOperation> {
        self.state().operations.clone()
    }

    /// Count the create_release calls (successful or not).
    pub fn create_calls(&self) -> usize {
        self.state()
            .operations
            .iter()
            .filter(|op| matches!(op, MockOperation::CreateRelease { .. }))
            .count()
    }

    /// Releases stored for a repository (for test verification).
    pub fn release(&self, path: &str, tag: &str) -> Option<ReleaseRequest> {
        self.state()
            .repos
            .get(path)
            .and_then(|r| r.releases.get(tag).cloned())
    }

    /// Number of releases stored for a repository.
    pub fn release_count(&self, path: &str) -> usize {
        self.state()
            .repos
            .get(path)
            .map(|r| r.releases.len())
            .unwrap_or(0)
    }

    fn state(&self) -> MutexGuard<'_, MockHostInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record an operation and return the configured failure for it, if any.
    fn record(&self, repo: &str, op: MockOperation) -> Result<(), ForgeError> {
        let mut inner = self.state();
        inner.operations.push(op.clone());

        let failure = inner.failures.iter().find_map(|(scope, fail)| {
            if scope.as_deref().is_some_and(|s| s != repo) {
                return None;
            }
            match (fail, &op) {
                (FailOn::Resolve(e), MockOperation::Resolve { .. })
                | (FailOn::ListTags(e), MockOperation::ListTags { .. })
                | (FailOn::ReleaseExists(e), MockOperation::ReleaseExists { .. })
                | (FailOn::CompareCommits(e), MockOperation::CompareCommits { .. })
                | (FailOn::CreateRelease(e), MockOperation::CreateRelease { .. }) => {
                    Some(e.clone())
                }
                _ => None,
            }
        });

        match failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn not_found(repo: &str) -> ForgeError {
        ForgeError::NotFound(format!("{{\"message\":\"404 Project {} Not Found\"}}", repo))
    }
}

#[async_trait]
impl ReleaseHost for MockHost {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn resolve(&self, repo: &RepositoryRef) -> Result<RepoHandle, ForgeError> {
        let path = repo.path();
        self.record(&path, MockOperation::Resolve { repo: path.clone() })?;

        if self.state().repos.contains_key(&path) {
            Ok(RepoHandle::from_path(path))
        } else {
            Err(Self::not_found(&path))
        }
    }

    async fn list_tags(&self, repo: &RepoHandle) -> Result<Vec<Tag>, ForgeError> {
        self.record(
            &repo.path,
            MockOperation::ListTags {
                repo: repo.path.clone(),
            },
        )?;

        self.state()
            .repos
            .get(&repo.path)
            .map(|r| r.tags.clone())
            .ok_or_else(|| Self::not_found(&repo.path))
    }

    async fn release_exists(&self, repo: &RepoHandle, tag_name: &str) -> Result<bool, ForgeError> {
        self.record(
            &repo.path,
            MockOperation::ReleaseExists {
                repo: repo.path.clone(),
                tag: tag_name.to_string(),
            },
        )?;

        Ok(self
            .state()
            .repos
            .get(&repo.path)
            .is_some_and(|r| r.releases.contains_key(tag_name)))
    }

    async fn compare_commits(
        &self,
        repo: &RepoHandle,
        from: &str,
        to: &str,
    ) -> Result<Vec<CommitSummary>, ForgeError> {
        self.record(
            &repo.path,
            MockOperation::CompareCommits {
                repo: repo.path.clone(),
                from: from.to_string(),
                to: to.to_string(),
            },
        )?;

        self.state()
            .repos
            .get(&repo.path)
            .map(|r| r.commits.clone())
            .ok_or_else(|| Self::not_found(&repo.path))
    }

    fn compare_url(&self, repo: &RepoHandle, from: &str, to: &str) -> String {
        format!("https://mock.example/{}/compare/{}...{}", repo.path, from, to)
    }

    async fn create_release(
        &self,
        repo: &RepoHandle,
        request: ReleaseRequest,
    ) -> Result<Release, ForgeError> {
        self.record(
            &repo.path,
            MockOperation::CreateRelease {
                repo: repo.path.clone(),
                request: request.clone(),
            },
        )?;

        let mut inner = self.state();
        let stored = inner
            .repos
            .get_mut(&repo.path)
            .ok_or_else(|| Self::not_found(&repo.path))?;

        if stored.releases.contains_key(&request.tag_name) {
            return Err(ForgeError::ApiError {
                status: 422,
                message: "{\"message\":\"Validation Failed\",\"errors\":[{\"code\":\"already_exists\"}]}"
                    .into(),
            });
        }

        let release = Release {
            tag_name: request.tag_name.clone(),
            url: format!(
                "https://mock.example/{}/releases/{}",
                repo.path, request.tag_name
            ),
        };
        stored.releases.insert(request.tag_name.clone(), request);
        Ok(release)
    }
}
