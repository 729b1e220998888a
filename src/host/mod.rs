//! Forge abstraction layer
//!
//! The orchestration engine talks to the hosted forge only through the
//! [Host] trait. Every method is a remote call that may fail; callers
//! propagate failures and never retry on their own.
//!
//! - [github::GitHubHost]: REST implementation against the GitHub API
//! - [mock::MockHost]: function-valued test double that records every call

pub mod github;
pub mod mock;

pub use github::GitHubHost;
pub use mock::{HostCall, MockHost};

use crate::domain::{Reference, Release, StatusReport, Tag};
use thiserror::Error;

/// Failure reported by a forge call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// The requested release, ref or tag does not exist
    #[error("not found: {0}")]
    NotFound(String),

    #[error("HTTP error (status {status:?}): {message}")]
    Http {
        status: Option<u16>,
        message: String,
    },

    #[error("unexpected response: {0}")]
    Decode(String),

    #[error("{0}")]
    Other(String),
}

pub type HostResult<T> = std::result::Result<T, HostError>;

/// Operations the release workflows need from the forge
pub trait Host: Send + Sync {
    /// Latest release of the repository, `None` when the repository has none
    fn last_release(&self) -> HostResult<Option<Release>>;

    /// Create a draft release for `tag_name`
    fn create_draft_release(&self, name: &str, tag_name: &str, body: &str) -> HostResult<()>;

    /// Replace the body of an existing release; returns the stored release
    fn edit_release(&self, release: &Release) -> HostResult<Release>;

    /// Turn a draft release into a published one
    fn publish_release(&self, release_id: i64) -> HostResult<()>;

    /// Commits `branch` is ahead of and behind `base_branch`
    fn compare_branch(&self, base_branch: &str, branch: &str) -> HostResult<StatusReport>;

    /// One [StatusReport] per branch, in the order given
    fn diff_commits(&self, branches: &[String], base_branch: &str) -> HostResult<Vec<StatusReport>> {
        branches
            .iter()
            .map(|branch| {
                self.compare_branch(base_branch, branch).map_err(|e| match e {
                    HostError::NotFound(_) => e,
                    other => HostError::Other(format!(
                        "error comparing base branch {} {}: {}",
                        base_branch, branch, other
                    )),
                })
            })
            .collect()
    }

    /// Create an annotated tag at `sha` together with its `refs/tags` ref
    fn create_tag(&self, name: &str, sha: &str, message: &str) -> HostResult<Tag>;

    /// Point `branch` at the commit `tag` refers to
    fn update_branch_from_tag(&self, tag: &str, branch: &str, force: bool) -> HostResult<()>;

    /// Tip reference of a branch
    fn get_ref(&self, branch: &str) -> HostResult<Reference>;

    /// Reference of a tag; [HostError::NotFound] when the tag does not exist
    fn get_ref_from_tag(&self, tag: &str) -> HostResult<Reference>;

    /// `owner/repo`
    fn repo_name(&self) -> String;
}
