use crate::domain::version::{parse_or_default, with_prerelease, VersionBump};
use crate::domain::Version;
use crate::error::{Result, RolloutError};
use crate::host::{Host, HostError};
use tracing::debug;

/// Computes the version the next tag should carry
pub struct VersionResolver<'a> {
    host: &'a dyn Host,
    base_branch: String,
}

impl<'a> VersionResolver<'a> {
    pub fn new(host: &'a dyn Host, base_branch: impl Into<String>) -> Self {
        VersionResolver {
            host,
            base_branch: base_branch.into(),
        }
    }

    /// Resolve the next version at the tip of the base branch.
    ///
    /// An `explicit_version` is used verbatim (plus `-suffix`). Otherwise the
    /// latest release tag is bumped; an unparsable or missing tag counts as
    /// `0.0.0`. With a `suffix`, the previous version is reused when its tag
    /// still points at the base branch tip, so unchanged content never gets a
    /// second plain version.
    ///
    /// # Returns
    /// * `Err(RolloutError::RefLookup)` - If the base branch cannot be resolved
    /// * `Err(RolloutError::Host)` - If the release or tag lookup fails
    pub fn next_version(
        &self,
        explicit_version: &str,
        suffix: &str,
        bump_major: bool,
        bump_minor: bool,
    ) -> Result<Version> {
        let head = self
            .host
            .get_ref(&self.base_branch)
            .map_err(|source| RolloutError::RefLookup {
                branch: self.base_branch.clone(),
                source,
            })?;
        debug!(branch = %self.base_branch, sha = %head.sha, "resolved base branch");

        if !explicit_version.is_empty() {
            let name = if suffix.is_empty() {
                explicit_version.to_string()
            } else {
                format!("{}-{}", explicit_version, suffix)
            };
            return Ok(Version::new(name, head.sha));
        }

        let last_release = self.host.last_release()?;
        let previous = parse_or_default(last_release.as_ref().map(|r| r.tag_name.as_str()));
        let bumped = VersionBump::from_flags(bump_major, bump_minor).apply(&previous)?;
        debug!(%previous, %bumped, "computed version bump");

        if suffix.is_empty() {
            return Ok(Version::new(bumped.to_string(), head.sha));
        }

        let base = if self.tag_points_at(&previous.to_string(), &head.sha)? {
            debug!(%previous, "no changes since previous tag, reusing its version");
            previous
        } else {
            bumped
        };

        let next = with_prerelease(&base, suffix)?;
        Ok(Version::new(next.to_string(), head.sha))
    }

    fn tag_points_at(&self, tag: &str, sha: &str) -> Result<bool> {
        match self.host.get_ref_from_tag(tag) {
            Ok(reference) => Ok(reference.sha == sha),
            Err(HostError::NotFound(_)) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Reference, Release};
    use crate::host::MockHost;

    fn host_at(sha: &'static str) -> MockHost {
        MockHost::new().on_get_ref(move |branch| {
            Ok(Reference::new(sha, format!("refs/heads/{}", branch)))
        })
    }

    fn with_last_tag(host: MockHost, tag: &'static str) -> MockHost {
        host.on_last_release(move || Ok(Some(Release::new(1, tag))))
    }

    #[test]
    fn test_first_version_without_releases() {
        let host = host_at("abc");
        let version = VersionResolver::new(&host, "master")
            .next_version("", "", false, false)
            .unwrap();
        assert_eq!(version, Version::new("0.0.1", "abc"));
    }

    #[test]
    fn test_bump_priority() {
        let host = with_last_tag(host_at("abc"), "1.2.3");
        let resolver = VersionResolver::new(&host, "master");

        assert_eq!(resolver.next_version("", "", false, false).unwrap().name, "1.2.4");
        assert_eq!(resolver.next_version("", "", false, true).unwrap().name, "1.3.0");
        assert_eq!(resolver.next_version("", "", true, false).unwrap().name, "2.0.0");
        assert_eq!(resolver.next_version("", "", true, true).unwrap().name, "2.0.0");
    }

    #[test]
    fn test_malformed_tag_counts_as_zero() {
        let host = with_last_tag(host_at("abc"), "release-of-march");
        let version = VersionResolver::new(&host, "master")
            .next_version("", "", false, true)
            .unwrap();
        assert_eq!(version.name, "0.1.0");
    }

    #[test]
    fn test_explicit_version_skips_release_lookup() {
        let host = host_at("abc");
        let version = VersionResolver::new(&host, "master")
            .next_version("5.0.0", "beta", false, false)
            .unwrap();
        assert_eq!(version, Version::new("5.0.0-beta", "abc"));
        assert_eq!(host.count(|c| matches!(c, crate::host::HostCall::LastRelease)), 0);
    }

    #[test]
    fn test_suffix_reuses_previous_when_unchanged() {
        let host = with_last_tag(host_at("abc"), "1.2.3").on_get_ref_from_tag(|tag| {
            assert_eq!(tag, "1.2.3");
            Ok(Reference::new("abc", "refs/tags/1.2.3"))
        });
        let version = VersionResolver::new(&host, "master")
            .next_version("", "mx", false, false)
            .unwrap();
        assert_eq!(version.name, "1.2.3-mx");
    }

    #[test]
    fn test_suffix_bumps_when_branch_moved() {
        let host = with_last_tag(host_at("def"), "1.2.3")
            .on_get_ref_from_tag(|_| Ok(Reference::new("abc", "refs/tags/1.2.3")));
        let version = VersionResolver::new(&host, "master")
            .next_version("", "mx", false, false)
            .unwrap();
        assert_eq!(version.name, "1.2.4-mx");
    }

    #[test]
    fn test_suffix_with_missing_previous_tag_bumps() {
        let host = host_at("abc");
        let version = VersionResolver::new(&host, "master")
            .next_version("", "rc", false, false)
            .unwrap();
        assert_eq!(version.name, "0.0.1-rc");
    }

    #[test]
    fn test_suffix_lookup_failure_propagates() {
        let host = with_last_tag(host_at("abc"), "1.2.3")
            .on_get_ref_from_tag(|_| Err(HostError::Other("rate limited".to_string())));
        let err = VersionResolver::new(&host, "master")
            .next_version("", "mx", false, false)
            .unwrap_err();
        assert!(err.to_string().contains("rate limited"));
    }

    #[test]
    fn test_missing_base_branch() {
        let host = MockHost::new()
            .on_get_ref(|branch| Err(HostError::NotFound(format!("heads/{}", branch))));
        let err = VersionResolver::new(&host, "trunk")
            .next_version("", "", false, false)
            .unwrap_err();
        assert!(matches!(err, RolloutError::RefLookup { ref branch, .. } if branch == "trunk"));
    }

    #[test]
    fn test_release_lookup_failure_propagates() {
        let host = host_at("abc").on_last_release(|| {
            Err(HostError::Http {
                status: Some(502),
                message: "bad gateway".to_string(),
            })
        });
        let err = VersionResolver::new(&host, "master")
            .next_version("", "", false, false)
            .unwrap_err();
        assert!(matches!(err, RolloutError::Host(HostError::Http { .. })));
    }

    #[test]
    fn test_bump_past_largest_version_fails() {
        let host = with_last_tag(host_at("abc"), "18446744073709551615.0.0");
        let err = VersionResolver::new(&host, "master")
            .next_version("", "", true, false)
            .unwrap_err();
        assert!(matches!(err, RolloutError::Version(_)));
        assert_eq!(host.mutation_count(), 0);
    }
}
