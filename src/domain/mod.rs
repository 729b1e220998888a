//! Domain types - the release, ref and version values the workflows pass around

pub mod release;
pub mod tag;
pub mod version;

pub use release::{Commit, Reference, Release, StatusReport, Version};
pub use tag::Tag;
pub use version::VersionBump;
