//! releasekit - Create GitHub and GitLab releases in bulk
//!
//! releasekit takes a list of repositories (GitHub) or projects (GitLab),
//! finds the latest tag of each, optionally writes release notes from the
//! commits since the previous tag, and creates a release unless one already
//! exists for that tag.
//!
//! # Architecture
//!
//! The codebase is layered; each layer only calls the ones below it:
//!
//! - [`cli`] - Argument parsing and the one-shot run
//! - [`release`] - Tag resolution, notes, publishing and the batch loop
//! - [`forge`] - The `ReleaseHost` abstraction over GitHub and GitLab
//! - [`core`] - Identifiers, repository lists and configuration
//! - [`ui`] - Console output and diagnostic logging
//!
//! # Guarantees
//!
//! 1. At most one creation attempt per repository and tag per run
//! 2. One failing repository never stops the batch
//! 3. Fatal setup problems are reported before any request is sent

pub mod cli;
pub mod core;
pub mod forge;
pub mod release;
pub mod ui;
