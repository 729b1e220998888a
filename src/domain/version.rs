use crate::error::{Result, RolloutError};
use semver::{BuildMetadata, Prerelease};

/// Version bump decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionBump {
    Major,
    Minor,
    Patch,
}

impl VersionBump {
    /// Pick the bump from command flags; major wins over minor, patch is the fallback
    pub fn from_flags(major: bool, minor: bool) -> Self {
        if major {
            VersionBump::Major
        } else if minor {
            VersionBump::Minor
        } else {
            VersionBump::Patch
        }
    }

    /// Apply the bump, dropping any pre-release and build metadata
    ///
    /// # Returns
    /// * `Err(RolloutError::Version)` - If the bumped component overflows
    pub fn apply(&self, version: &semver::Version) -> Result<semver::Version> {
        let increment = |component: u64| {
            component
                .checked_add(1)
                .ok_or_else(|| RolloutError::version(format!("cannot bump {}: out of range", version)))
        };
        Ok(match self {
            VersionBump::Major => semver::Version::new(increment(version.major)?, 0, 0),
            VersionBump::Minor => {
                semver::Version::new(version.major, increment(version.minor)?, 0)
            }
            VersionBump::Patch => {
                semver::Version::new(version.major, version.minor, increment(version.patch)?)
            }
        })
    }
}

/// Parse a release tag leniently.
///
/// Accepts an optional `v`/`V` prefix and one to three numeric components
/// (`1`, `1.2`, `1.2.3`), padding missing components with zero. Pre-release
/// and build metadata are kept. Returns `None` for anything else.
pub fn parse_tolerant(tag: &str) -> Option<semver::Version> {
    let clean_tag = tag.trim().trim_start_matches(['v', 'V']);

    let core_end = clean_tag.find(['-', '+']).unwrap_or(clean_tag.len());
    let (core, rest) = clean_tag.split_at(core_end);

    let parts: Vec<&str> = core.split('.').collect();
    if parts.is_empty() || parts.len() > 3 {
        return None;
    }
    if parts
        .iter()
        .any(|p| p.is_empty() || !p.chars().all(|c| c.is_ascii_digit()))
    {
        return None;
    }

    let mut numbers = [0u64; 3];
    for (slot, part) in numbers.iter_mut().zip(&parts) {
        *slot = part.parse().ok()?;
    }

    let normalized = format!("{}.{}.{}{}", numbers[0], numbers[1], numbers[2], rest);
    semver::Version::parse(&normalized).ok()
}

/// Parse a release tag, falling back to `0.0.0` when it is not a version
pub fn parse_or_default(tag: Option<&str>) -> semver::Version {
    tag.and_then(parse_tolerant)
        .unwrap_or_else(|| semver::Version::new(0, 0, 0))
}

/// Append `suffix` as a pre-release identifier.
///
/// An existing pre-release gains the suffix as an extra dot-separated
/// identifier (`1.0.0-rc` + `mx` = `1.0.0-rc.mx`). Build metadata is cleared.
pub fn with_prerelease(version: &semver::Version, suffix: &str) -> Result<semver::Version> {
    let identifiers = if version.pre.is_empty() {
        suffix.to_string()
    } else {
        format!("{}.{}", version.pre, suffix)
    };

    let pre = Prerelease::new(&identifiers).map_err(|e| {
        RolloutError::version(format!("Invalid pre-release suffix '{}': {}", suffix, e))
    })?;

    let mut next = version.clone();
    next.pre = pre;
    next.build = BuildMetadata::EMPTY;
    Ok(next)
}
