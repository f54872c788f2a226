//! core::types
//!
//! Strong types for repository identifiers.
//!
//! # Types
//!
//! - [`RepositoryRef`] - Validated repository/project identifier for one platform
//!
//! # Validation
//!
//! Identifiers are validated at construction time. A GitHub identifier is
//! exactly `owner/repo`; a GitLab identifier is `namespace/project` with any
//! number of nested groups.
//!
//! # Examples
//!
//! ```
//! use releasekit::core::types::RepositoryRef;
//! use releasekit::forge::Platform;
//!
//! let repo = RepositoryRef::parse(Platform::GitHub, "acme/widget").unwrap();
//! assert_eq!(repo.to_string(), "acme/widget");
//!
//! let project = RepositoryRef::parse(Platform::GitLab, "group/sub/project").unwrap();
//! assert_eq!(project.path(), "group/sub/project");
//!
//! assert!(RepositoryRef::parse(Platform::GitHub, "acme/widget/extra").is_err());
//! assert!(RepositoryRef::parse(Platform::GitLab, "just-a-name").is_err());
//! ```

use std::fmt;

use thiserror::Error;

use crate::forge::Platform;

/// Errors from identifier validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RepoRefError {
    #[error("repository identifier cannot be empty")]
    Empty,

    #[error("expected '{expected}', got '{input}'")]
    MissingSeparator {
        input: String,
        expected: &'static str,
    },

    #[error("too many '/' separators in '{0}', expected 'owner/repo'")]
    TooManySeparators(String),

    #[error("empty path segment in '{0}'")]
    EmptySegment(String),
}

/// A repository on a hosting platform.
///
/// GitHub repositories are an owner/name pair. GitLab projects are addressed
/// by their full namespace path, which may include nested groups.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RepositoryRef {
    /// A GitHub repository (`owner/name`).
    GitHub { owner: String, name: String },
    /// A GitLab project (`group/.../project`).
    GitLab { path: String },
}

impl RepositoryRef {
    /// Parse an identifier for the given platform.
    ///
    /// Surrounding whitespace is ignored, both for the whole identifier and
    /// for each segment.
    ///
    /// # Errors
    ///
    /// Returns [`RepoRefError`] if the identifier has no separator, has the
    /// wrong number of separators, or contains an empty segment.
    pub fn parse(platform: Platform, input: &str) -> Result<Self, RepoRefError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(RepoRefError::Empty);
        }

        match platform {
            Platform::GitHub => Self::parse_github(trimmed),
            Platform::GitLab => Self::parse_gitlab(trimmed),
        }
    }

    fn parse_github(input: &str) -> Result<Self, RepoRefError> {
        let parts: Vec<&str> = input.split('/').map(str::trim).collect();
        match parts.as_slice() {
            [_] => Err(RepoRefError::MissingSeparator {
                input: input.to_string(),
                expected: "owner/repo",
            }),
            [owner, name] => {
                if owner.is_empty() || name.is_empty() {
                    return Err(RepoRefError::EmptySegment(input.to_string()));
                }
                Ok(RepositoryRef::GitHub {
                    owner: (*owner).to_string(),
                    name: (*name).to_string(),
                })
            }
            _ => Err(RepoRefError::TooManySeparators(input.to_string())),
        }
    }

    fn parse_gitlab(input: &str) -> Result<Self, RepoRefError> {
        if !input.contains('/') {
            return Err(RepoRefError::MissingSeparator {
                input: input.to_string(),
                expected: "namespace/project",
            });
        }

        let segments: Vec<&str> = input.split('/').map(str::trim).collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(RepoRefError::EmptySegment(input.to_string()));
        }

        Ok(RepositoryRef::GitLab {
            path: segments.join("/"),
        })
    }

    /// The platform this identifier belongs to.
    pub fn platform(&self) -> Platform {
        match self {
            RepositoryRef::GitHub { .. } => Platform::GitHub,
            RepositoryRef::GitLab { .. } => Platform::GitLab,
        }
    }

    /// The full slash-separated path (`owner/name` or `group/.../project`).
    pub fn path(&self) -> String {
        match self {
            RepositoryRef::GitHub { owner, name } => format!("{}/{}", owner, name),
            RepositoryRef::GitLab { path } => path.clone(),
        }
    }
}

impl fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}
