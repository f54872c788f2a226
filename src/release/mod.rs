//! release
//!
//! The release workflow, built on any [`ReleaseHost`](crate::forge::ReleaseHost).
//!
//! # Modules
//!
//! - [`tags`] - Pick the tag to release and the one before it
//! - [`notes`] - Render release notes from the commits between them
//! - [`publish`] - Create the release unless it already exists
//! - [`batch`] - Run the above for many repositories and count outcomes
//!
//! Data flows one way: batch → (tags → notes) → publish → host.

pub mod batch;
pub mod notes;
pub mod publish;
pub mod tags;

use thiserror::Error;

use crate::forge::ForgeError;

pub use batch::{
    run_batch, BatchReport, BatchSummary, NoopReporter, ReleaseOptions, RepoOutcome, RepoReport,
    Reporter,
};
pub use publish::PublishOutcome;
pub use tags::TagOrder;

/// Errors from processing one repository.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReleaseError {
    /// The repository has no tags. Expected; there is nothing to release.
    #[error("no tags found in {repo}")]
    NoTags { repo: String },

    /// A host request failed.
    #[error(transparent)]
    Forge(#[from] ForgeError),
}
