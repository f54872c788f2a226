//! core::config::schema
//!
//! Configuration file schema.
//!
//! Every field is optional; absent fields fall back to built-in defaults or
//! are supplied on the command line. Unknown keys are rejected so typos
//! surface at startup instead of being silently ignored.
//!
//! Tokens are deliberately not part of the schema.

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::forge::Platform;
use crate::release::TagOrder;

/// Contents of a releasekit config file.
///
/// # Example
///
/// ```toml
/// platform = "gitlab"
/// url = "https://gitlab.example.com"
/// timeout_secs = 30
/// tag_order = "semver"
/// repositories = ["group/project", "group/sub/other"]
///
/// [release]
/// draft = false
/// prerelease = false
/// auto_notes = true
/// milestones = ["v1.0"]
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Hosting platform
    pub platform: Option<Platform>,

    /// Base URL (GitHub API root or GitLab instance root)
    pub url: Option<String>,

    /// Per-request timeout in seconds
    pub timeout_secs: Option<u64>,

    /// How to pick the latest tag
    pub tag_order: Option<TagOrder>,

    /// Repositories to release when none are given on the command line
    pub repositories: Option<Vec<String>>,

    /// Release defaults
    pub release: Option<ReleaseDefaults>,
}

impl FileConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(url) = &self.url {
            validate_url(url)?;
        }

        if self.timeout_secs == Some(0) {
            return Err(ConfigError::InvalidValue(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }

        if let Some(repos) = &self.repositories {
            if repos.iter().any(|r| r.trim().is_empty()) {
                return Err(ConfigError::InvalidValue(
                    "repositories cannot contain empty entries".to_string(),
                ));
            }
        }

        if let Some(release) = &self.release {
            release.validate()?;
        }

        Ok(())
    }
}

/// Defaults applied to every release.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ReleaseDefaults {
    /// Create releases as drafts (GitHub only)
    pub draft: Option<bool>,

    /// Mark releases as prereleases (GitHub only)
    pub prerelease: Option<bool>,

    /// Generate notes from the commit range
    pub auto_notes: Option<bool>,

    /// Milestones to associate (GitLab only)
    pub milestones: Option<Vec<String>>,
}

impl ReleaseDefaults {
    /// Validate the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(milestones) = &self.milestones {
            if milestones.iter().any(|m| m.trim().is_empty()) {
                return Err(ConfigError::InvalidValue(
                    "milestones cannot contain empty entries".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Check that a base URL is an absolute http(s) URL.
pub fn validate_url(url: &str) -> Result<(), ConfigError> {
    let parsed = reqwest::Url::parse(url.trim())
        .map_err(|e| ConfigError::InvalidValue(format!("invalid url '{}': {}", url, e)))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::InvalidValue(format!(
            "invalid url '{}': unsupported scheme '{}'",
            url, other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod file_config {
        use super::*;

        #[test]
        fn default_is_valid() {
            let config = FileConfig::default();
            assert!(config.validate().is_ok());
        }

        #[test]
        fn parse_full() {
            let toml = r#"
                platform = "gitlab"
                url = "https://gitlab.example.com"
                timeout_secs = 10
                tag_order = "semver"
                repositories = ["group/project"]

                [release]
                draft = true
                auto_notes = false
                milestones = ["v1.0"]
            "#;
            let config: FileConfig = toml::from_str(toml).unwrap();
            assert_eq!(config.platform, Some(Platform::GitLab));
            assert_eq!(config.timeout_secs, Some(10));
            assert_eq!(config.tag_order, Some(TagOrder::Semver));
            assert_eq!(config.repositories, Some(vec!["group/project".to_string()]));
            let release = config.release.as_ref().unwrap();
            assert_eq!(release.draft, Some(true));
            assert_eq!(release.prerelease, None);
            assert_eq!(release.auto_notes, Some(false));
            assert!(config.validate().is_ok());
        }

        #[test]
        fn rejects_unknown_fields() {
            let result: Result<FileConfig, _> = toml::from_str("token = \"ghp_x\"");
            assert!(result.is_err());
        }

        #[test]
        fn rejects_unknown_release_fields() {
            let result: Result<FileConfig, _> = toml::from_str("[release]\nlatest = true");
            assert!(result.is_err());
        }

        #[test]
        fn rejects_unknown_platform() {
            let result: Result<FileConfig, _> = toml::from_str("platform = \"bitbucket\"");
            assert!(result.is_err());
        }

        #[test]
        fn zero_timeout_invalid() {
            let config = FileConfig {
                timeout_secs: Some(0),
                ..Default::default()
            };
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidValue(_))
            ));
        }

        #[test]
        fn bad_url_invalid() {
            let config = FileConfig {
                url: Some("gitlab.example.com".into()),
                ..Default::default()
            };
            assert!(config.validate().is_err());

            let config = FileConfig {
                url: Some("ftp://gitlab.example.com".into()),
                ..Default::default()
            };
            assert!(config.validate().is_err());
        }

        #[test]
        fn empty_repository_invalid() {
            let config = FileConfig {
                repositories: Some(vec!["acme/a".into(), " ".into()]),
                ..Default::default()
            };
            assert!(config.validate().is_err());
        }
    }

    #[test]
    fn empty_milestone_invalid() {
        let release = ReleaseDefaults {
            milestones: Some(vec!["".into()]),
            ..Default::default()
        };
        assert!(release.validate().is_err());
    }
}
