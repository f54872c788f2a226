//! release::tags
//!
//! Latest-tag resolution.
//!
//! Hosts list tags newest first, and by default that order is trusted: the
//! first tag is the release candidate and the second is the base for release
//! notes. Platforms that list tags alphabetically, or repositories with
//! back-ported tags, can opt into [`TagOrder::Semver`], which sorts tags that
//! parse as semantic versions (an optional `v`/`V` prefix is allowed) from
//! highest to lowest before picking.

use serde::{Deserialize, Serialize};

use super::ReleaseError;
use crate::forge::{ReleaseHost, RepoHandle, Tag};

/// How to order the host's tag list before picking the latest tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagOrder {
    /// Trust the order returned by the host.
    #[default]
    Api,
    /// Highest semantic version first; unparseable tags follow in host order.
    Semver,
}

impl TagOrder {
    /// Name as used on the command line and in config files.
    pub fn name(&self) -> &'static str {
        match self {
            TagOrder::Api => "api",
            TagOrder::Semver => "semver",
        }
    }

    /// Parse from a string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "api" => Some(TagOrder::Api),
            "semver" => Some(TagOrder::Semver),
            _ => None,
        }
    }
}

impl std::fmt::Display for TagOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The tag to release and the tag before it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatestTags {
    pub current: Tag,
    pub previous: Option<Tag>,
}

/// Fetch tags for a repository and pick the current and previous tag.
///
/// # Errors
///
/// - `ReleaseError::NoTags` if the repository has no tags
/// - `ReleaseError::Forge` if the tag list cannot be fetched
pub async fn latest_tags(
    host: &dyn ReleaseHost,
    repo: &RepoHandle,
    order: TagOrder,
) -> Result<LatestTags, ReleaseError> {
    let tags = host.list_tags(repo).await?;
    tracing::debug!(repo = %repo.path, count = tags.len(), %order, "fetched tags");

    select_latest(tags, order).ok_or_else(|| ReleaseError::NoTags {
        repo: repo.path.clone(),
    })
}

/// Pick the current and previous tag from a tag list.
///
/// Returns `None` for an empty list.
pub fn select_latest(tags: Vec<Tag>, order: TagOrder) -> Option<LatestTags> {
    let ordered = match order {
        TagOrder::Api => tags,
        TagOrder::Semver => sort_by_version(tags),
    };

    let mut iter = ordered.into_iter();
    let current = iter.next()?;
    Some(LatestTags {
        current,
        previous: iter.next(),
    })
}

/// Parse a tag name as a semantic version, allowing a `v`/`V` prefix.
///
/// Short versions are padded with zeros, so `v1.10` reads as `1.10.0` and
/// `v2` as `2.0.0`.
///
/// # Example
///
/// ```
/// use releasekit::release::tags::parse_version;
///
/// assert_eq!(parse_version("v1.10"), Some(semver::Version::new(1, 10, 0)));
/// assert_eq!(parse_version("nightly"), None);
/// ```
pub fn parse_version(name: &str) -> Option<semver::Version> {
    let trimmed = name
        .strip_prefix('v')
        .or_else(|| name.strip_prefix('V'))
        .unwrap_or(name);
    if let Ok(version) = semver::Version::parse(trimmed) {
        return Some(version);
    }

    // Pre-release and build metadata stay attached after the padding.
    let core_end = trimmed.find(['-', '+']).unwrap_or(trimmed.len());
    let (core, suffix) = trimmed.split_at(core_end);
    let padded = match core.split('.').count() {
        1 => format!("{}.0.0{}", core, suffix),
        2 => format!("{}.0{}", core, suffix),
        _ => return None,
    };
    semver::Version::parse(&padded).ok()
}

/// Sort versioned tags highest first; keep the rest after them in input order.
fn sort_by_version(tags: Vec<Tag>) -> Vec<Tag> {
    let (mut versioned, rest): (Vec<_>, Vec<_>) = tags
        .into_iter()
        .map(|tag| (parse_version(&tag.name), tag))
        .partition(|(version, _)| version.is_some());

    // Stable sort keeps host order among equal versions.
    versioned.sort_by(|(a, _), (b, _)| b.cmp(a));

    versioned
        .into_iter()
        .chain(rest)
        .map(|(_, tag)| tag)
        .collect()
}
