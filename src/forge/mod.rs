//! forge
//!
//! Abstraction for release hosting platforms (GitHub, GitLab).
//!
//! # Architecture
//!
//! The `ReleaseHost` trait defines the interface for interacting with remote
//! hosting services. The release workflow uses the [`create_host`] factory
//! function rather than importing specific host implementations directly, so
//! tag resolution, note generation and publishing are platform-agnostic.
//!
//! # Modules
//!
//! - `traits`: Core `ReleaseHost` trait and request/response types
//! - [`github`]: GitHub REST implementation
//! - [`gitlab`]: GitLab v4 REST implementation
//! - [`mock`]: Mock implementation for deterministic testing
//! - `factory`: Platform selection and creation
//! - `http`: Shared authenticated JSON client
//!
//! # Example
//!
//! ```ignore
//! use releasekit::forge::{create_host, Platform, ReleaseHost};
//!
//! let host = create_host(Platform::GitHub, token, None, DEFAULT_TIMEOUT)?;
//! let handle = host.resolve(&repo).await?;
//! let tags = host.list_tags(&handle).await?;
//! ```

mod factory;
pub mod github;
pub mod gitlab;
mod http;
pub mod mock;
mod traits;

pub use factory::{create_host, valid_platform_names, Platform};
pub use http::DEFAULT_TIMEOUT;
pub use traits::*;
