//! ui::progress
//!
//! Console rendering of batch progress and the final tally.

use crate::core::types::RepositoryRef;
use crate::forge::Tag;
use crate::release::{BatchSummary, RepoOutcome, Reporter};

use super::output::{self, Verbosity};

/// Prints one block per repository as the batch runs.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleReporter {
    verbosity: Verbosity,
}

impl ConsoleReporter {
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }
}

impl Reporter for ConsoleReporter {
    fn started(&mut self, index: usize, total: usize, repo: &RepositoryRef) {
        output::print(format!("[{}/{}] {}", index, total, repo), self.verbosity);
    }

    fn tags_resolved(&mut self, _repo: &RepositoryRef, current: &Tag, previous: Option<&Tag>) {
        let message = match previous {
            Some(prev) => format!("latest tag {} (previous {})", current.name, prev.name),
            None => format!("latest tag {} (no previous tag)", current.name),
        };
        output::detail(message, self.verbosity);
    }

    fn finished(&mut self, repo: &RepositoryRef, outcome: &RepoOutcome) {
        match outcome {
            RepoOutcome::Failed { reason } => output::error(format!("{}: {}", repo, reason)),
            RepoOutcome::NoTags => {
                output::warn(format!("{}: {}", repo, outcome_line(outcome)), self.verbosity)
            }
            _ => output::success(format!("  {}", outcome_line(outcome)), self.verbosity),
        }
    }
}

/// One-line description of a repository outcome.
pub fn outcome_line(outcome: &RepoOutcome) -> String {
    match outcome {
        RepoOutcome::Created { tag, url } => format!("created release {}: {}", tag, url),
        RepoOutcome::AlreadyExists { tag } => format!("release {} already exists, skipped", tag),
        RepoOutcome::NoTags => "no tags found, nothing to release".to_string(),
        RepoOutcome::Failed { reason } => format!("failed: {}", reason),
    }
}

/// End-of-run tally.
pub fn render_summary(summary: &BatchSummary) -> String {
    let failed = if summary.no_tags > 0 {
        format!("{} failed ({} without tags)", summary.failed, summary.no_tags)
    } else {
        format!("{} failed", summary.failed)
    };
    format!(
        "Summary: {} created, {} already existed, {}, {} total",
        summary.created, summary.already_exists, failed, summary.total
    )
}

/// Print the tally. Shown even in quiet mode.
pub fn print_summary(summary: &BatchSummary, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        println!();
    }
    println!("{}", render_summary(summary));
}
