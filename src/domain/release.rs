/// A forge release as seen by the orchestration engine
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Release {
    pub id: i64,
    pub body: String,
    pub tag_name: String,
    pub release_url: String,
    pub draft: bool,
}

impl Release {
    /// Create a published release pointing at a tag
    pub fn new(id: i64, tag_name: impl Into<String>) -> Self {
        Release {
            id,
            tag_name: tag_name.into(),
            ..Default::default()
        }
    }
}

/// A branch or tag pointer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub sha: String,
    pub r#ref: String,
}

impl Reference {
    pub fn new(sha: impl Into<String>, r#ref: impl Into<String>) -> Self {
        Reference {
            sha: sha.into(),
            r#ref: r#ref.into(),
        }
    }
}

/// A commit, reduced to what release notes need
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub message: String,
}

impl Commit {
    pub fn new(message: impl Into<String>) -> Self {
        Commit {
            message: message.into(),
        }
    }
}

/// Commit divergence between a branch and the base branch
///
/// `ahead` holds commits on `branch` missing from the base, `behind` holds
/// commits on the base that `branch` has not received yet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusReport {
    pub branch: String,
    pub base_branch: String,
    pub ahead: Vec<Commit>,
    pub behind: Vec<Commit>,
}

/// A version resolved for tagging, bound to the commit it will be tagged at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    pub name: String,
    pub sha: String,
}

impl Version {
    pub fn new(name: impl Into<String>, sha: impl Into<String>) -> Self {
        Version {
            name: name.into(),
            sha: sha.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_new_is_published() {
        let release = Release::new(7, "1.2.3");
        assert_eq!(release.id, 7);
        assert_eq!(release.tag_name, "1.2.3");
        assert!(!release.draft);
        assert!(release.body.is_empty());
    }

    #[test]
    fn test_status_report_default_is_empty() {
        let report = StatusReport::default();
        assert!(report.ahead.is_empty());
        assert!(report.behind.is_empty());
    }
}
