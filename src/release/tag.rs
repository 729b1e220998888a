use crate::domain::{Tag, Version};
use crate::error::Result;
use crate::host::{Host, HostError};
use tracing::info;

/// Creates release tags and checks tag names for collisions
pub struct TagManager<'a> {
    host: &'a dyn Host,
}

impl<'a> TagManager<'a> {
    pub fn new(host: &'a dyn Host) -> Self {
        TagManager { host }
    }

    /// Create an annotated tag named after `version` at its commit
    pub fn create(&self, version: &Version) -> Result<Tag> {
        let tag = self.host.create_tag(&version.name, &version.sha, "")?;
        info!(tag = %tag.name, sha = %version.sha, "created tag");
        Ok(Tag::new(tag.name))
    }

    /// Whether a tag called `name` already exists.
    ///
    /// A missing tag is `Ok(false)`; any other lookup failure is an error.
    pub fn exists_tag_name(&self, name: &str) -> Result<bool> {
        match self.host.get_ref_from_tag(name) {
            Ok(_) => Ok(true),
            Err(HostError::NotFound(_)) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Reference;
    use crate::error::RolloutError;
    use crate::host::{HostCall, MockHost};

    #[test]
    fn test_create_uses_empty_message() {
        let host = MockHost::new();
        let tag = TagManager::new(&host)
            .create(&Version::new("1.2.0", "abc"))
            .unwrap();

        assert_eq!(tag, Tag::new("1.2.0"));
        assert_eq!(
            host.calls(),
            vec![HostCall::CreateTag {
                name: "1.2.0".to_string(),
                sha: "abc".to_string(),
                message: String::new(),
            }]
        );
    }

    #[test]
    fn test_create_propagates_failure() {
        let host = MockHost::new().on_create_tag(|_, _, _| {
            Err(HostError::Http {
                status: Some(422),
                message: "Reference already exists".to_string(),
            })
        });
        let err = TagManager::new(&host)
            .create(&Version::new("1.2.0", "abc"))
            .unwrap_err();
        assert!(matches!(err, RolloutError::Host(HostError::Http { .. })));
    }

    #[test]
    fn test_exists_tag_name() {
        let host = MockHost::new()
            .on_get_ref_from_tag(|tag| Ok(Reference::new("abc", format!("refs/tags/{}", tag))));
        assert!(TagManager::new(&host).exists_tag_name("1.0.0").unwrap());
    }

    #[test]
    fn test_missing_tag_is_not_an_error() {
        let host = MockHost::new();
        assert!(!TagManager::new(&host).exists_tag_name("1.0.0").unwrap());
    }

    #[test]
    fn test_broken_lookup_is_an_error() {
        let host = MockHost::new()
            .on_get_ref_from_tag(|_| Err(HostError::Other("connection reset".to_string())));
        assert!(TagManager::new(&host).exists_tag_name("1.0.0").is_err());
    }
}
