//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! releasekit has no subcommands. Repositories come from exactly one of
//! `--file` or `--repos`, or from the config file when neither is given.

use clap::Parser;
use std::path::PathBuf;

use crate::core::config::Overrides;
use crate::forge::{valid_platform_names, Platform};
use crate::release::TagOrder;

/// releasekit - Create GitHub and GitLab releases from the latest tag
#[derive(Parser, Debug)]
#[command(name = "releasekit")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Hosting platform [default: github]
    #[arg(long, value_parser = parse_platform)]
    pub platform: Option<Platform>,

    /// File with one repository per line
    #[arg(short, long, value_name = "FILE", conflicts_with = "repos")]
    pub file: Option<PathBuf>,

    /// Repositories (owner/repo) or projects (group/project)
    #[arg(
        short = 'r',
        long = "repos",
        visible_alias = "projects",
        visible_short_alias = 'p',
        value_name = "REPO",
        num_args = 1..
    )]
    pub repos: Vec<String>,

    /// API token [env: GITHUB_TOKEN / GITLAB_TOKEN]
    #[arg(short, long)]
    pub token: Option<String>,

    /// Base URL for GitHub Enterprise or self-hosted GitLab
    #[arg(short, long)]
    pub url: Option<String>,

    /// Create releases as drafts (GitHub only)
    ///
    /// GitHub does not report draft releases when looking a release up by
    /// tag, so a rerun with --draft creates another draft for the same tag.
    #[arg(long)]
    pub draft: bool,

    /// Mark releases as prereleases (GitHub only)
    #[arg(long)]
    pub prerelease: bool,

    /// Use "Release <tag>" instead of generated notes
    #[arg(long)]
    pub no_auto_notes: bool,

    /// Milestones to associate with each release (GitLab only)
    #[arg(
        short,
        long = "milestones",
        visible_alias = "milestone",
        value_name = "MILESTONE",
        num_args = 1..
    )]
    pub milestones: Vec<String>,

    /// How to pick the latest tag: api (host order) or semver
    #[arg(long, value_name = "ORDER", value_parser = parse_tag_order)]
    pub tag_order: Option<TagOrder>,

    /// Per-request timeout in seconds [default: 30]
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Config file to use instead of the default locations
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print effective settings and debug diagnostics
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only print errors and the final summary
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }

    /// Values that override the config file.
    pub fn overrides(&self) -> Overrides {
        Overrides {
            platform: self.platform,
            token: self.token.clone(),
            url: self.url.clone(),
            timeout_secs: self.timeout,
            tag_order: self.tag_order,
            draft: self.draft,
            prerelease: self.prerelease,
            no_auto_notes: self.no_auto_notes,
            milestones: self.milestones.clone(),
            file: self.file.clone(),
            repos: self.repos.clone(),
        }
    }
}

fn parse_platform(s: &str) -> Result<Platform, String> {
    Platform::parse(s).ok_or_else(|| {
        format!(
            "unknown platform '{}', expected one of: {}",
            s,
            valid_platform_names().join(", ")
        )
    })
}

fn parse_tag_order(s: &str) -> Result<TagOrder, String> {
    TagOrder::parse(s).ok_or_else(|| format!("unknown tag order '{}', expected api or semver", s))
}
