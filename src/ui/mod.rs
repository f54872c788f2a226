//! ui
//!
//! User-facing output.
//!
//! # Modules
//!
//! - [`output`] - Verbosity-aware message printing
//! - [`progress`] - Per-repository progress and the final tally
//! - [`logging`] - Diagnostic `tracing` subscriber setup
//!
//! # Design
//!
//! All console output goes through this module so that quiet and verbose
//! modes behave the same everywhere.

pub mod logging;
pub mod output;
pub mod progress;
