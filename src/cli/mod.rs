//! cli
//!
//! Command-line interface layer for releasekit.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments
//! - Read the environment and config file once, into a [`RunConfig`]
//! - Load the repository list
//! - Build the host and run the batch
//!
//! Every fatal condition (no token, no repositories, bad config) is detected
//! here, before any network request is made.

pub mod args;

pub use args::Cli;

use std::process::ExitCode;

use anyhow::{Context, Result};

use crate::core::config::{self, ConfigError, RepoSource, Resolved, RunConfig};
use crate::core::repos::{self, RepoList};
use crate::forge::create_host;
use crate::release::run_batch;
use crate::ui::logging;
use crate::ui::output::{self, Verbosity};
use crate::ui::progress::{print_summary, ConsoleReporter};

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<ExitCode> {
    let cli = Cli::parse_args();
    logging::init(cli.verbose);
    run_with(cli, &|key| std::env::var(key).ok())
}

/// Run with parsed arguments and an injected environment.
pub fn run_with(cli: Cli, env: &dyn Fn(&str) -> Option<String>) -> Result<ExitCode> {
    let verbosity = Verbosity::from_flags(cli.quiet, cli.verbose);

    let Resolved { config, warnings } = match resolve(&cli, env) {
        Ok(resolved) => resolved,
        Err(e) => return Ok(fatal(&e)),
    };
    for warning in &warnings {
        output::warn(warning, verbosity);
    }

    let list = match load_repositories(&config) {
        Ok(list) => list,
        Err(e) => {
            output::error(format!("{:#}", e));
            return Ok(ExitCode::FAILURE);
        }
    };
    for warning in &list.warnings {
        output::warn(warning, verbosity);
    }
    if list.is_empty() {
        output::error("no valid repositories to process");
        output::hint(format!(
            "Identifiers must look like '{}'.",
            config.platform.identifier_format()
        ));
        return Ok(ExitCode::FAILURE);
    }

    print_settings(&config, list.repos.len(), verbosity);

    let host = create_host(
        config.platform,
        &config.token,
        config.base_url.as_deref(),
        config.timeout,
    )
    .context("failed to set up API client")?;

    let rt = tokio::runtime::Runtime::new()?;
    let mut reporter = ConsoleReporter::new(verbosity);
    let report = rt.block_on(run_batch(
        host.as_ref(),
        &list.repos,
        &config.options,
        &mut reporter,
    ));

    print_summary(&report.summary, verbosity);
    Ok(ExitCode::from(report.summary.exit_code()))
}

fn resolve(cli: &Cli, env: &dyn Fn(&str) -> Option<String>) -> Result<Resolved, ConfigError> {
    let loaded = config::load(cli.config.as_deref(), env)?;
    RunConfig::resolve(&loaded.config, cli.overrides(), env)
}

fn load_repositories(config: &RunConfig) -> Result<RepoList> {
    Ok(match &config.source {
        RepoSource::File(path) => repos::load_file(config.platform, path)?,
        RepoSource::Args(args) | RepoSource::Config(args) => repos::from_args(config.platform, args),
    })
}

fn fatal(error: &ConfigError) -> ExitCode {
    output::error(error);
    if let Some(hint) = error.hint() {
        output::hint(hint);
    }
    ExitCode::FAILURE
}

fn print_settings(config: &RunConfig, count: usize, verbosity: Verbosity) {
    if verbosity != Verbosity::Verbose {
        return;
    }

    let options = &config.options;
    let mut lines = vec![
        format!("platform: {}", config.platform),
        format!("url: {}", config.effective_url()),
        format!("timeout: {}s", config.timeout.as_secs()),
        format!("tag order: {}", options.tag_order),
        format!("auto notes: {}", options.auto_notes),
        format!("repositories: {}", count),
    ];
    if options.draft {
        lines.push("draft: true".to_string());
    }
    if options.prerelease {
        lines.push("prerelease: true".to_string());
    }
    if !options.milestones.is_empty() {
        lines.push(format!("milestones: {}", options.milestones.join(", ")));
    }

    output::print("Settings:", verbosity);
    output::print(output::format_list(&lines, "  "), verbosity);
}
