//! core
//!
//! Core domain types, repository lists and configuration for releasekit.
//!
//! # Modules
//!
//! - [`types`] - Strong types: RepositoryRef
//! - [`repos`] - Repository list loading from files and arguments
//! - [`config`] - Configuration schema, loading and resolution
//!
//! # Design Principles
//!
//! - Identifiers are validated once, at the edge
//! - Schemas are strict and self-describing
//! - Environment access is injected, never ambient

pub mod config;
pub mod repos;
pub mod types;
