//! core::config::run
//!
//! Effective settings for one invocation.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use super::schema::{validate_url, FileConfig};
use super::ConfigError;
use crate::forge::{Platform, DEFAULT_TIMEOUT};
use crate::release::{ReleaseOptions, TagOrder};

/// Values supplied on the command line. `None`/empty means "not given".
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub platform: Option<Platform>,
    pub token: Option<String>,
    pub url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub tag_order: Option<TagOrder>,
    pub draft: bool,
    pub prerelease: bool,
    pub no_auto_notes: bool,
    pub milestones: Vec<String>,
    pub file: Option<PathBuf>,
    pub repos: Vec<String>,
}

/// Where the repository list comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoSource {
    /// A file with one identifier per line.
    File(PathBuf),
    /// Identifiers given on the command line.
    Args(Vec<String>),
    /// The `repositories` list of the config file.
    Config(Vec<String>),
}

/// Fully resolved settings.
#[derive(Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub platform: Platform,
    pub token: String,
    /// Base URL override; `None` means the platform default.
    pub base_url: Option<String>,
    pub timeout: Duration,
    pub source: RepoSource,
    pub options: ReleaseOptions,
}

impl fmt::Debug for RunConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunConfig")
            .field("platform", &self.platform)
            .field("token", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("source", &self.source)
            .field("options", &self.options)
            .finish()
    }
}

/// A resolved config plus non-fatal notices.
#[derive(Debug, Clone)]
pub struct Resolved {
    pub config: RunConfig,
    pub warnings: Vec<String>,
}

impl RunConfig {
    /// Merge defaults, the config file, the environment and flags.
    ///
    /// # Errors
    ///
    /// - `MissingToken` if neither `--token` nor the platform's token
    ///   variable is set
    /// - `NoRepositories` if no repository source is available
    /// - `InvalidValue` for an unusable URL or a zero timeout
    pub fn resolve(
        file: &FileConfig,
        overrides: Overrides,
        env: &dyn Fn(&str) -> Option<String>,
    ) -> Result<Resolved, ConfigError> {
        let mut warnings = Vec::new();
        let platform = overrides.platform.or(file.platform).unwrap_or_default();

        let token = non_empty(overrides.token)
            .or_else(|| non_empty(env(platform.token_env_var())))
            .ok_or(ConfigError::MissingToken { platform })?;

        let base_url = non_empty(overrides.url)
            .or_else(|| non_empty(env(platform.url_env_var())))
            .or_else(|| non_empty(file.url.clone()));
        if let Some(url) = &base_url {
            validate_url(url)?;
        }

        let timeout_secs = overrides.timeout_secs.or(file.timeout_secs);
        let timeout = match timeout_secs {
            Some(0) => {
                return Err(ConfigError::InvalidValue(
                    "timeout must be greater than zero".to_string(),
                ))
            }
            Some(secs) => Duration::from_secs(secs),
            None => DEFAULT_TIMEOUT,
        };

        let source = if let Some(path) = overrides.file {
            RepoSource::File(path)
        } else if !overrides.repos.is_empty() {
            RepoSource::Args(overrides.repos)
        } else {
            match &file.repositories {
                Some(repos) if !repos.is_empty() => RepoSource::Config(repos.clone()),
                _ => return Err(ConfigError::NoRepositories),
            }
        };

        let defaults = file.release.clone().unwrap_or_default();
        let mut options = ReleaseOptions {
            auto_notes: !overrides.no_auto_notes && defaults.auto_notes.unwrap_or(true),
            draft: overrides.draft || defaults.draft.unwrap_or(false),
            prerelease: overrides.prerelease || defaults.prerelease.unwrap_or(false),
            milestones: if overrides.milestones.is_empty() {
                defaults.milestones.unwrap_or_default()
            } else {
                overrides.milestones
            },
            tag_order: overrides.tag_order.or(file.tag_order).unwrap_or_default(),
        };
        drop_unsupported(platform, &mut options, &mut warnings);

        Ok(Resolved {
            config: RunConfig {
                platform,
                token,
                base_url,
                timeout,
                source,
                options,
            },
            warnings,
        })
    }

    /// Base URL actually used.
    pub fn effective_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.platform.default_base_url())
    }
}

/// Clear release settings the platform has no notion of.
fn drop_unsupported(platform: Platform, options: &mut ReleaseOptions, warnings: &mut Vec<String>) {
    match platform {
        Platform::GitHub => {
            if !options.milestones.is_empty() {
                warnings.push("milestones are only supported on GitLab; ignoring".to_string());
                options.milestones.clear();
            }
        }
        Platform::GitLab => {
            if options.draft {
                warnings.push("draft releases are only supported on GitHub; ignoring".to_string());
                options.draft = false;
            }
            if options.prerelease {
                warnings.push("prereleases are only supported on GitHub; ignoring".to_string());
                options.prerelease = false;
            }
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ReleaseDefaults;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn with_token(key: &str) -> Option<String> {
        match key {
            "GITHUB_TOKEN" => Some("ghp_env".to_string()),
            "GITLAB_TOKEN" => Some("glpat_env".to_string()),
            _ => None,
        }
    }

    fn repos_flag() -> Overrides {
        Overrides {
            repos: vec!["acme/widget".into()],
            ..Default::default()
        }
    }

    mod token {
        use super::*;

        #[test]
        fn flag_beats_env() {
            let overrides = Overrides {
                token: Some("ghp_flag".into()),
                ..repos_flag()
            };
            let resolved = RunConfig::resolve(&FileConfig::default(), overrides, &with_token).unwrap();
            assert_eq!(resolved.config.token, "ghp_flag");
        }

        #[test]
        fn env_used_when_no_flag() {
            let resolved =
                RunConfig::resolve(&FileConfig::default(), repos_flag(), &with_token).unwrap();
            assert_eq!(resolved.config.token, "ghp_env");
        }

        #[test]
        fn env_var_follows_platform() {
            let overrides = Overrides {
                platform: Some(Platform::GitLab),
                repos: vec!["group/project".into()],
                ..Default::default()
            };
            let resolved = RunConfig::resolve(&FileConfig::default(), overrides, &with_token).unwrap();
            assert_eq!(resolved.config.token, "glpat_env");
        }

        #[test]
        fn missing_is_error() {
            let err = RunConfig::resolve(&FileConfig::default(), repos_flag(), &no_env).unwrap_err();
            assert!(matches!(
                err,
                ConfigError::MissingToken {
                    platform: Platform::GitHub
                }
            ));
        }

        #[test]
        fn blank_flag_is_missing() {
            let overrides = Overrides {
                token: Some("   ".into()),
                ..repos_flag()
            };
            let err = RunConfig::resolve(&FileConfig::default(), overrides, &no_env).unwrap_err();
            assert!(matches!(err, ConfigError::MissingToken { .. }));
        }

        #[test]
        fn debug_redacts_token() {
            let resolved =
                RunConfig::resolve(&FileConfig::default(), repos_flag(), &with_token).unwrap();
            let debug = format!("{:?}", resolved.config);
            assert!(!debug.contains("ghp_env"));
            assert!(debug.contains("[REDACTED]"));
        }
    }

    mod url {
        use super::*;

        fn file_with_url() -> FileConfig {
            FileConfig {
                url: Some("https://file.example".into()),
                ..Default::default()
            }
        }

        fn env_with_url(key: &str) -> Option<String> {
            match key {
                "GITHUB_API_URL" => Some("https://env.example/api/v3".into()),
                _ => with_token(key),
            }
        }

        #[test]
        fn flag_beats_env_and_file() {
            let overrides = Overrides {
                url: Some("https://flag.example".into()),
                ..repos_flag()
            };
            let resolved = RunConfig::resolve(&file_with_url(), overrides, &env_with_url).unwrap();
            assert_eq!(resolved.config.base_url.as_deref(), Some("https://flag.example"));
        }

        #[test]
        fn env_beats_file() {
            let resolved = RunConfig::resolve(&file_with_url(), repos_flag(), &env_with_url).unwrap();
            assert_eq!(
                resolved.config.base_url.as_deref(),
                Some("https://env.example/api/v3")
            );
        }

        #[test]
        fn file_beats_default() {
            let resolved = RunConfig::resolve(&file_with_url(), repos_flag(), &with_token).unwrap();
            assert_eq!(resolved.config.effective_url(), "https://file.example");
        }

        #[test]
        fn default_when_unset() {
            let resolved =
                RunConfig::resolve(&FileConfig::default(), repos_flag(), &with_token).unwrap();
            assert_eq!(resolved.config.base_url, None);
            assert_eq!(resolved.config.effective_url(), "https://api.github.com");
        }

        #[test]
        fn invalid_flag_url_is_error() {
            let overrides = Overrides {
                url: Some("not a url".into()),
                ..repos_flag()
            };
            let err = RunConfig::resolve(&FileConfig::default(), overrides, &with_token).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidValue(_)));
        }
    }

    mod sources {
        use super::*;

        #[test]
        fn file_flag() {
            let overrides = Overrides {
                file: Some(PathBuf::from("repos.txt")),
                ..Default::default()
            };
            let resolved = RunConfig::resolve(&FileConfig::default(), overrides, &with_token).unwrap();
            assert_eq!(resolved.config.source, RepoSource::File("repos.txt".into()));
        }

        #[test]
        fn args_beat_config_list() {
            let file = FileConfig {
                repositories: Some(vec!["acme/other".into()]),
                ..Default::default()
            };
            let resolved = RunConfig::resolve(&file, repos_flag(), &with_token).unwrap();
            assert_eq!(
                resolved.config.source,
                RepoSource::Args(vec!["acme/widget".into()])
            );
        }

        #[test]
        fn config_list_used_as_fallback() {
            let file = FileConfig {
                repositories: Some(vec!["acme/other".into()]),
                ..Default::default()
            };
            let resolved = RunConfig::resolve(&file, Overrides::default(), &with_token).unwrap();
            assert_eq!(
                resolved.config.source,
                RepoSource::Config(vec!["acme/other".into()])
            );
        }

        #[test]
        fn none_is_error() {
            let err =
                RunConfig::resolve(&FileConfig::default(), Overrides::default(), &with_token)
                    .unwrap_err();
            assert!(matches!(err, ConfigError::NoRepositories));
        }
    }

    mod options {
        use super::*;

        #[test]
        fn defaults() {
            let resolved =
                RunConfig::resolve(&FileConfig::default(), repos_flag(), &with_token).unwrap();
            assert_eq!(resolved.config.options, ReleaseOptions::default());
            assert_eq!(resolved.config.timeout, DEFAULT_TIMEOUT);
            assert!(resolved.warnings.is_empty());
        }

        #[test]
        fn file_beats_defaults_and_flags_beat_file() {
            let file = FileConfig {
                timeout_secs: Some(10),
                tag_order: Some(TagOrder::Semver),
                release: Some(ReleaseDefaults {
                    auto_notes: Some(false),
                    prerelease: Some(true),
                    ..Default::default()
                }),
                ..Default::default()
            };

            let resolved = RunConfig::resolve(&file, repos_flag(), &with_token).unwrap();
            assert_eq!(resolved.config.timeout, Duration::from_secs(10));
            assert_eq!(resolved.config.options.tag_order, TagOrder::Semver);
            assert!(!resolved.config.options.auto_notes);
            assert!(resolved.config.options.prerelease);

            let overrides = Overrides {
                timeout_secs: Some(3),
                tag_order: Some(TagOrder::Api),
                ..repos_flag()
            };
            let resolved = RunConfig::resolve(&file, overrides, &with_token).unwrap();
            assert_eq!(resolved.config.timeout, Duration::from_secs(3));
            assert_eq!(resolved.config.options.tag_order, TagOrder::Api);
        }

        #[test]
        fn no_auto_notes_flag() {
            let overrides = Overrides {
                no_auto_notes: true,
                ..repos_flag()
            };
            let resolved = RunConfig::resolve(&FileConfig::default(), overrides, &with_token).unwrap();
            assert!(!resolved.config.options.auto_notes);
        }

        #[test]
        fn zero_timeout_flag_is_error() {
            let overrides = Overrides {
                timeout_secs: Some(0),
                ..repos_flag()
            };
            assert!(RunConfig::resolve(&FileConfig::default(), overrides, &with_token).is_err());
        }

        #[test]
        fn github_ignores_milestones() {
            let overrides = Overrides {
                milestones: vec!["M1".into()],
                draft: true,
                ..repos_flag()
            };
            let resolved = RunConfig::resolve(&FileConfig::default(), overrides, &with_token).unwrap();
            assert!(resolved.config.options.milestones.is_empty());
            assert!(resolved.config.options.draft);
            assert_eq!(resolved.warnings.len(), 1);
            assert!(resolved.warnings[0].contains("milestones"));
        }

        #[test]
        fn gitlab_ignores_draft_and_prerelease() {
            let overrides = Overrides {
                platform: Some(Platform::GitLab),
                draft: true,
                prerelease: true,
                milestones: vec!["M1".into()],
                repos: vec!["group/project".into()],
                ..Default::default()
            };
            let resolved = RunConfig::resolve(&FileConfig::default(), overrides, &with_token).unwrap();
            assert!(!resolved.config.options.draft);
            assert!(!resolved.config.options.prerelease);
            assert_eq!(resolved.config.options.milestones, vec!["M1".to_string()]);
            assert_eq!(resolved.warnings.len(), 2);
        }
    }
}
