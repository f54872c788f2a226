//! forge::factory
//!
//! Platform selection and host creation.
//!
//! # Design
//!
//! This module provides a central location for platform selection logic.
//! The orchestrator only ever sees a boxed [`ReleaseHost`]; nothing outside
//! this module names `GitHubHost` or `GitLabHost`.
//!
//! # Example
//!
//! ```ignore
//! use releasekit::forge::{create_host, Platform};
//!
//! let host = create_host(Platform::GitLab, "glpat-xxx", Some("https://gitlab.example.com"), timeout)?;
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::github::{self, GitHubHost};
use super::gitlab::{self, GitLabHost};
use super::traits::{ForgeError, ReleaseHost};

/// Supported hosting platforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// GitHub (github.com or Enterprise)
    #[default]
    GitHub,
    /// GitLab (gitlab.com or self-hosted)
    GitLab,
}

impl Platform {
    /// Get all supported platforms.
    pub fn all() -> &'static [Platform] {
        &[Platform::GitHub, Platform::GitLab]
    }

    /// Get the platform name as used on the command line and in config files.
    pub fn name(&self) -> &'static str {
        match self {
            Platform::GitHub => "github",
            Platform::GitLab => "gitlab",
        }
    }

    /// Parse a platform from a string (case-insensitive).
    ///
    /// # Example
    ///
    /// ```
    /// use releasekit::forge::Platform;
    ///
    /// assert_eq!(Platform::parse("GitLab"), Some(Platform::GitLab));
    /// assert_eq!(Platform::parse("bitbucket"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "github" => Some(Platform::GitHub),
            "gitlab" => Some(Platform::GitLab),
            _ => None,
        }
    }

    /// Environment variable holding the token for this platform.
    pub fn token_env_var(&self) -> &'static str {
        match self {
            Platform::GitHub => "GITHUB_TOKEN",
            Platform::GitLab => "GITLAB_TOKEN",
        }
    }

    /// Environment variable overriding the base URL for this platform.
    pub fn url_env_var(&self) -> &'static str {
        match self {
            Platform::GitHub => "GITHUB_API_URL",
            Platform::GitLab => "GITLAB_URL",
        }
    }

    /// Default base URL (API root for GitHub, instance root for GitLab).
    pub fn default_base_url(&self) -> &'static str {
        match self {
            Platform::GitHub => github::DEFAULT_API_BASE,
            Platform::GitLab => gitlab::DEFAULT_BASE_URL,
        }
    }

    /// Where users create a token, shown when none is configured.
    pub fn token_help(&self) -> &'static str {
        match self {
            Platform::GitHub => {
                "Create a token with 'repo' scope at https://github.com/settings/tokens"
            }
            Platform::GitLab => {
                "Create a token with 'api' scope at https://gitlab.com/-/user_settings/personal_access_tokens"
            }
        }
    }

    /// Identifier format expected for this platform.
    pub fn identifier_format(&self) -> &'static str {
        match self {
            Platform::GitHub => "owner/repo",
            Platform::GitLab => "namespace/project",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Create a release host for a platform.
///
/// # Arguments
///
/// * `platform` - Which hosting platform to talk to
/// * `token` - Authentication token for the platform
/// * `base_url` - Optional base URL override (Enterprise / self-hosted)
/// * `timeout` - Per-request timeout
///
/// # Errors
///
/// - `AuthRequired` / `InvalidToken` if the token is unusable
/// - `InvalidUrl` if the base URL is unusable
pub fn create_host(
    platform: Platform,
    token: &str,
    base_url: Option<&str>,
    timeout: Duration,
) -> Result<Box<dyn ReleaseHost>, ForgeError> {
    let base_url = base_url.unwrap_or_else(|| platform.default_base_url());
    match platform {
        Platform::GitHub => Ok(Box::new(GitHubHost::with_api_base(
            token, base_url, timeout,
        )?)),
        Platform::GitLab => Ok(Box::new(GitLabHost::with_base_url(
            token, base_url, timeout,
        )?)),
    }
}

/// Get list of valid platform names for configuration validation.
pub fn valid_platform_names() -> Vec<&'static str> {
    Platform::all().iter().map(Platform::name).collect()
}
