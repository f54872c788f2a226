//! core::repos
//!
//! Repository list loading.
//!
//! Repository identifiers come from a file (one per line), from command-line
//! arguments, or from the config file. All sources go through the same
//! lenient parse: malformed entries become warnings and are skipped, and
//! repeated identifiers are dropped. Only an unreadable file is an error.
//!
//! # File Format
//!
//! ```text
//! # production services
//! acme/api
//! acme/web
//!
//! acme/worker   # comments must start the line; this one is malformed
//! ```

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::types::RepositoryRef;
use crate::forge::Platform;

/// Errors from loading a repository list.
#[derive(Debug, Error)]
pub enum RepoListError {
    #[error("failed to read repository file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// A skipped entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoListWarning {
    /// 1-based line number for file input, 1-based position for arguments.
    pub line: usize,
    pub message: String,
}

impl fmt::Display for RepoListWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

/// Parsed repositories in input order, plus what was skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepoList {
    pub repos: Vec<RepositoryRef>,
    pub warnings: Vec<RepoListWarning>,
}

impl RepoList {
    pub fn is_empty(&self) -> bool {
        self.repos.is_empty()
    }

    fn push(&mut self, seen: &mut HashSet<RepositoryRef>, line: usize, repo: RepositoryRef) {
        if seen.insert(repo.clone()) {
            self.repos.push(repo);
        } else {
            self.warnings.push(RepoListWarning {
                line,
                message: format!("duplicate repository '{}' ignored", repo),
            });
        }
    }
}

/// Read a repository file.
///
/// # Errors
///
/// Returns `RepoListError::ReadError` if the file is missing or unreadable.
pub fn load_file(platform: Platform, path: &Path) -> Result<RepoList, RepoListError> {
    let contents = fs::read_to_string(path).map_err(|e| RepoListError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(parse_lines(platform, &contents))
}

/// Parse file contents: blank lines and `#` comments are skipped.
pub fn parse_lines(platform: Platform, contents: &str) -> RepoList {
    let entries = contents
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'));
    collect(platform, entries)
}

/// Parse identifiers given directly, e.g. on the command line.
pub fn from_args<S: AsRef<str>>(platform: Platform, args: &[S]) -> RepoList {
    let entries = args
        .iter()
        .enumerate()
        .map(|(i, arg)| (i + 1, arg.as_ref()));
    collect(platform, entries)
}

fn collect<'a>(platform: Platform, entries: impl Iterator<Item = (usize, &'a str)>) -> RepoList {
    let mut list = RepoList::default();
    let mut seen = HashSet::new();

    for (line, entry) in entries {
        match RepositoryRef::parse(platform, entry) {
            Ok(repo) => list.push(&mut seen, line, repo),
            Err(e) => list.warnings.push(RepoListWarning {
                line,
                message: format!(
                    "skipping '{}': {} (expected {})",
                    entry.trim(),
                    e,
                    platform.identifier_format()
                ),
            }),
        }
    }

    list
}
