//! Issue tracker integration
//!
//! Drafting a release can stamp the drafted fix version on every task
//! mentioned in the commits the release brings in.

pub mod jira;
pub mod mock;

pub use jira::JiraTracker;
pub use mock::MockTracker;

use crate::domain::Commit;
use crate::error::{Result, RolloutError};
use regex::Regex;
use std::collections::BTreeSet;

pub trait IssueTracker {
    /// Set the fix version of every task in `tasks` to `version`.
    ///
    /// Stops at the first task that cannot be updated.
    fn update_fix_versions(&self, tasks: &[String], version: &str) -> Result<()>;
}

/// Task keys matching `task_regex` in the commit messages, sorted and unique
pub fn extract_tasks(task_regex: &str, commits: &[Commit]) -> Result<Vec<String>> {
    let re = Regex::new(&format!("(?m)({})", task_regex)).map_err(|e| {
        RolloutError::config(format!("invalid jira task regex '{}': {}", task_regex, e))
    })?;

    let tasks: BTreeSet<String> = commits
        .iter()
        .flat_map(|commit| re.find_iter(&commit.message))
        .map(|m| m.as_str().to_string())
        .collect();

    Ok(tasks.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_tasks_dedupes_and_sorts() {
        let commits = vec![
            Commit::new("SHOP-12 add cart\n\nrelates to SHOP-3"),
            Commit::new("Merge pull request #4 SHOP-12"),
            Commit::new("chore: bump deps"),
        ];
        assert_eq!(
            extract_tasks("SHOP-[0-9]+", &commits).unwrap(),
            vec!["SHOP-12".to_string(), "SHOP-3".to_string()]
        );
    }

    #[test]
    fn test_extract_tasks_without_matches() {
        let commits = vec![Commit::new("fix typo")];
        assert!(extract_tasks("[A-Z]+-\\d+", &commits).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_regex_is_config_error() {
        let err = extract_tasks("SHOP-[", &[]).unwrap_err();
        assert!(matches!(err, RolloutError::Config(_)));
    }
}
