//! Release orchestration engine
//!
//! - [version::VersionResolver]: next semantic version from the latest release
//! - [tag::TagManager]: tag creation and collision checks
//! - [draft::DraftBuilder]: release notes and draft creation
//! - [deploy::DeployScheduler]: timed rollout across release branches

pub mod badge;
pub mod deploy;
pub mod draft;
pub mod schedule;
pub mod tag;
pub mod version;

pub use deploy::{DeployScheduler, DeploySettings};
pub use draft::DraftBuilder;
pub use schedule::DeploySchedule;
pub use tag::TagManager;
pub use version::VersionResolver;
