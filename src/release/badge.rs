//! Release-note badges
//!
//! Every release branch gets a badge in the first line of the release body.
//! Drafts start with the "not released" badge; deploy swaps it for a badge
//! carrying the deployment date.

use chrono::{DateTime, Local};
use std::collections::HashMap;

/// Base URL shared by every badge
pub const BADGE_URL: &str = "https://img.shields.io/badge/released";

/// Suffix of the badge written by new drafts
pub const UNRELEASED_SUFFIX: &str = "-No-red.svg";

/// Display label of a branch, falling back to the branch name
pub fn label_for<'a>(branch_map: &'a HashMap<String, String>, branch: &'a str) -> &'a str {
    branch_map.get(branch).map(String::as_str).unwrap_or(branch)
}

/// Badge written into a fresh draft
pub fn unreleased(label: &str) -> String {
    badge(label, UNRELEASED_SUFFIX)
}

/// Badge deploy looks for, `find_suffix` as configured
pub fn pending(label: &str, find_suffix: &str) -> String {
    badge(label, find_suffix)
}

/// Badge marking `label` released at `at`, e.g. `released-7_March_2024_09:05`
pub fn released(label: &str, at: &DateTime<Local>, replace_suffix: &str) -> String {
    badge(
        label,
        &format!("-{}{}", at.format("%-d_%B_%Y_%H:%M"), replace_suffix),
    )
}

fn badge(label: &str, suffix: &str) -> String {
    format!("{} ![]({}{})", label, BADGE_URL, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_unreleased_badge() {
        assert_eq!(
            unreleased("GR"),
            "GR ![](https://img.shields.io/badge/released-No-red.svg)"
        );
    }

    #[test]
    fn test_pending_badge_matches_unreleased_with_default_suffix() {
        assert_eq!(pending("GR", UNRELEASED_SUFFIX), unreleased("GR"));
    }

    #[test]
    fn test_released_badge() {
        let at = Local.with_ymd_and_hms(2024, 3, 7, 9, 5, 0).unwrap();
        assert_eq!(
            released("MX", &at, "-green.svg"),
            "MX ![](https://img.shields.io/badge/released-7_March_2024_09:05-green.svg)"
        );
    }

    #[test]
    fn test_label_fallback() {
        let mut map = HashMap::new();
        map.insert("release-gr".to_string(), "GR".to_string());
        assert_eq!(label_for(&map, "release-gr"), "GR");
        assert_eq!(label_for(&map, "release-mx"), "release-mx");
    }
}
