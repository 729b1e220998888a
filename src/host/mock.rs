use crate::domain::{Reference, Release, StatusReport, Tag};
use crate::host::{Host, HostError, HostResult};
use std::sync::{Arc, Mutex};

/// A call received by [MockHost]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    LastRelease,
    CreateDraftRelease {
        name: String,
        tag_name: String,
        body: String,
    },
    EditRelease(Release),
    PublishRelease(i64),
    CompareBranch {
        base_branch: String,
        branch: String,
    },
    DiffCommits {
        branches: Vec<String>,
        base_branch: String,
    },
    CreateTag {
        name: String,
        sha: String,
        message: String,
    },
    UpdateBranchFromTag {
        tag: String,
        branch: String,
        force: bool,
    },
    GetRef(String),
    GetRefFromTag(String),
}

impl HostCall {
    /// Calls that change state on the forge
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            HostCall::CreateDraftRelease { .. }
                | HostCall::EditRelease(_)
                | HostCall::PublishRelease(_)
                | HostCall::CreateTag { .. }
                | HostCall::UpdateBranchFromTag { .. }
        )
    }
}

/// Mock forge for testing the workflows without network access
///
/// Every operation can be overridden with a closure; operations without one
/// fall back to a harmless default. All calls are recorded in order.
#[derive(Default)]
pub struct MockHost {
    last_release_fn: Option<Box<dyn Fn() -> HostResult<Option<Release>> + Send + Sync>>,
    create_draft_release_fn: Option<Box<dyn Fn(&str, &str, &str) -> HostResult<()> + Send + Sync>>,
    edit_release_fn: Option<Box<dyn Fn(&Release) -> HostResult<Release> + Send + Sync>>,
    publish_release_fn: Option<Box<dyn Fn(i64) -> HostResult<()> + Send + Sync>>,
    compare_branch_fn: Option<Box<dyn Fn(&str, &str) -> HostResult<StatusReport> + Send + Sync>>,
    diff_commits_fn: Option<Box<dyn Fn(&[String], &str) -> HostResult<Vec<StatusReport>> + Send + Sync>>,
    create_tag_fn: Option<Box<dyn Fn(&str, &str, &str) -> HostResult<Tag> + Send + Sync>>,
    update_branch_from_tag_fn: Option<Box<dyn Fn(&str, &str, bool) -> HostResult<()> + Send + Sync>>,
    get_ref_fn: Option<Box<dyn Fn(&str) -> HostResult<Reference> + Send + Sync>>,
    get_ref_from_tag_fn: Option<Box<dyn Fn(&str) -> HostResult<Reference> + Send + Sync>>,
    repo_name: String,
    calls: Mutex<Vec<HostCall>>,
}

impl MockHost {
    /// Create a mock where every call succeeds with a default value
    pub fn new() -> Self {
        MockHost {
            repo_name: "owner/repo".to_string(),
            ..Default::default()
        }
    }

    /// Back `last_release` and `edit_release` with one shared release, so
    /// body edits are visible to the next `last_release` call
    pub fn with_release(self, release: Release) -> Self {
        let store = Arc::new(Mutex::new(release));
        let read = Arc::clone(&store);
        let write = Arc::clone(&store);
        self.on_last_release(move || Ok(Some(read.lock().unwrap().clone())))
            .on_edit_release(move |release| {
                let mut stored = write.lock().unwrap();
                *stored = release.clone();
                Ok(stored.clone())
            })
    }

    pub fn on_last_release(
        mut self,
        f: impl Fn() -> HostResult<Option<Release>> + Send + Sync + 'static,
    ) -> Self {
        self.last_release_fn = Some(Box::new(f));
        self
    }

    pub fn on_create_draft_release(
        mut self,
        f: impl Fn(&str, &str, &str) -> HostResult<()> + Send + Sync + 'static,
    ) -> Self {
        self.create_draft_release_fn = Some(Box::new(f));
        self
    }

    pub fn on_edit_release(
        mut self,
        f: impl Fn(&Release) -> HostResult<Release> + Send + Sync + 'static,
    ) -> Self {
        self.edit_release_fn = Some(Box::new(f));
        self
    }

    pub fn on_publish_release(
        mut self,
        f: impl Fn(i64) -> HostResult<()> + Send + Sync + 'static,
    ) -> Self {
        self.publish_release_fn = Some(Box::new(f));
        self
    }

    pub fn on_compare_branch(
        mut self,
        f: impl Fn(&str, &str) -> HostResult<StatusReport> + Send + Sync + 'static,
    ) -> Self {
        self.compare_branch_fn = Some(Box::new(f));
        self
    }

    pub fn on_diff_commits(
        mut self,
        f: impl Fn(&[String], &str) -> HostResult<Vec<StatusReport>> + Send + Sync + 'static,
    ) -> Self {
        self.diff_commits_fn = Some(Box::new(f));
        self
    }

    pub fn on_create_tag(
        mut self,
        f: impl Fn(&str, &str, &str) -> HostResult<Tag> + Send + Sync + 'static,
    ) -> Self {
        self.create_tag_fn = Some(Box::new(f));
        self
    }

    pub fn on_update_branch_from_tag(
        mut self,
        f: impl Fn(&str, &str, bool) -> HostResult<()> + Send + Sync + 'static,
    ) -> Self {
        self.update_branch_from_tag_fn = Some(Box::new(f));
        self
    }

    pub fn on_get_ref(
        mut self,
        f: impl Fn(&str) -> HostResult<Reference> + Send + Sync + 'static,
    ) -> Self {
        self.get_ref_fn = Some(Box::new(f));
        self
    }

    pub fn on_get_ref_from_tag(
        mut self,
        f: impl Fn(&str) -> HostResult<Reference> + Send + Sync + 'static,
    ) -> Self {
        self.get_ref_from_tag_fn = Some(Box::new(f));
        self
    }

    pub fn with_repo_name(mut self, name: impl Into<String>) -> Self {
        self.repo_name = name.into();
        self
    }

    /// All calls received so far, oldest first
    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of recorded calls matching `pred`
    pub fn count(&self, pred: impl Fn(&HostCall) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| pred(c)).count()
    }

    /// Number of calls that would have changed state on the forge
    pub fn mutation_count(&self) -> usize {
        self.count(HostCall::is_mutation)
    }

    /// Branches passed to `update_branch_from_tag`, in call order
    pub fn deployed_branches(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter_map(|c| match c {
                HostCall::UpdateBranchFromTag { branch, .. } => Some(branch.clone()),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: HostCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Host for MockHost {
    fn last_release(&self) -> HostResult<Option<Release>> {
        self.record(HostCall::LastRelease);
        match &self.last_release_fn {
            Some(f) => f(),
            None => Ok(None),
        }
    }

    fn create_draft_release(&self, name: &str, tag_name: &str, body: &str) -> HostResult<()> {
        self.record(HostCall::CreateDraftRelease {
            name: name.to_string(),
            tag_name: tag_name.to_string(),
            body: body.to_string(),
        });
        match &self.create_draft_release_fn {
            Some(f) => f(name, tag_name, body),
            None => Ok(()),
        }
    }

    fn edit_release(&self, release: &Release) -> HostResult<Release> {
        self.record(HostCall::EditRelease(release.clone()));
        match &self.edit_release_fn {
            Some(f) => f(release),
            None => Ok(release.clone()),
        }
    }

    fn publish_release(&self, release_id: i64) -> HostResult<()> {
        self.record(HostCall::PublishRelease(release_id));
        match &self.publish_release_fn {
            Some(f) => f(release_id),
            None => Ok(()),
        }
    }

    fn compare_branch(&self, base_branch: &str, branch: &str) -> HostResult<StatusReport> {
        self.record(HostCall::CompareBranch {
            base_branch: base_branch.to_string(),
            branch: branch.to_string(),
        });
        match &self.compare_branch_fn {
            Some(f) => f(base_branch, branch),
            None => Ok(StatusReport {
                branch: branch.to_string(),
                base_branch: base_branch.to_string(),
                ..Default::default()
            }),
        }
    }

    fn diff_commits(&self, branches: &[String], base_branch: &str) -> HostResult<Vec<StatusReport>> {
        self.record(HostCall::DiffCommits {
            branches: branches.to_vec(),
            base_branch: base_branch.to_string(),
        });
        match &self.diff_commits_fn {
            Some(f) => f(branches, base_branch),
            None => Ok(branches
                .iter()
                .map(|branch| StatusReport {
                    branch: branch.clone(),
                    base_branch: base_branch.to_string(),
                    ..Default::default()
                })
                .collect()),
        }
    }

    fn create_tag(&self, name: &str, sha: &str, message: &str) -> HostResult<Tag> {
        self.record(HostCall::CreateTag {
            name: name.to_string(),
            sha: sha.to_string(),
            message: message.to_string(),
        });
        match &self.create_tag_fn {
            Some(f) => f(name, sha, message),
            None => Ok(Tag::new(name)),
        }
    }

    fn update_branch_from_tag(&self, tag: &str, branch: &str, force: bool) -> HostResult<()> {
        self.record(HostCall::UpdateBranchFromTag {
            tag: tag.to_string(),
            branch: branch.to_string(),
            force,
        });
        match &self.update_branch_from_tag_fn {
            Some(f) => f(tag, branch, force),
            None => Ok(()),
        }
    }

    fn get_ref(&self, branch: &str) -> HostResult<Reference> {
        self.record(HostCall::GetRef(branch.to_string()));
        match &self.get_ref_fn {
            Some(f) => f(branch),
            None => Ok(Reference::new("", format!("refs/heads/{}", branch))),
        }
    }

    fn get_ref_from_tag(&self, tag: &str) -> HostResult<Reference> {
        self.record(HostCall::GetRefFromTag(tag.to_string()));
        match &self.get_ref_from_tag_fn {
            Some(f) => f(tag),
            None => Err(HostError::NotFound(format!("tags/{}", tag))),
        }
    }

    fn repo_name(&self) -> String {
        self.repo_name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_host_defaults() {
        let host = MockHost::new();
        assert_eq!(host.last_release().unwrap(), None);
        assert!(matches!(
            host.get_ref_from_tag("1.0.0"),
            Err(HostError::NotFound(_))
        ));
        assert_eq!(host.create_tag("1.0.0", "sha", "").unwrap(), Tag::new("1.0.0"));
        assert_eq!(host.repo_name(), "owner/repo");
    }

    #[test]
    fn test_mock_host_records_calls() {
        let host = MockHost::new();
        host.get_ref("main").unwrap();
        host.update_branch_from_tag("1.0.0", "release-a", true).unwrap();

        assert_eq!(
            host.calls(),
            vec![
                HostCall::GetRef("main".to_string()),
                HostCall::UpdateBranchFromTag {
                    tag: "1.0.0".to_string(),
                    branch: "release-a".to_string(),
                    force: true,
                },
            ]
        );
        assert_eq!(host.mutation_count(), 1);
        assert_eq!(host.deployed_branches(), vec!["release-a".to_string()]);
    }

    #[test]
    fn test_mock_host_shared_release_store() {
        let host = MockHost::new().with_release(Release {
            body: "before".to_string(),
            ..Release::new(1, "1.0.0")
        });

        let mut release = host.last_release().unwrap().unwrap();
        release.body = "after".to_string();
        host.edit_release(&release).unwrap();

        assert_eq!(host.last_release().unwrap().unwrap().body, "after");
    }

    #[test]
    fn test_mock_host_override() {
        let host = MockHost::new()
            .on_get_ref(|_| Err(HostError::Other("offline".to_string())));
        assert_eq!(
            host.get_ref("main"),
            Err(HostError::Other("offline".to_string()))
        );
    }

    #[test]
    fn test_default_diff_commits_uses_compare_branch() {
        struct Counting(MockHost);
        impl Host for Counting {
            fn last_release(&self) -> HostResult<Option<Release>> {
                self.0.last_release()
            }
            fn create_draft_release(&self, n: &str, t: &str, b: &str) -> HostResult<()> {
                self.0.create_draft_release(n, t, b)
            }
            fn edit_release(&self, r: &Release) -> HostResult<Release> {
                self.0.edit_release(r)
            }
            fn publish_release(&self, id: i64) -> HostResult<()> {
                self.0.publish_release(id)
            }
            fn compare_branch(&self, base: &str, branch: &str) -> HostResult<StatusReport> {
                self.0.compare_branch(base, branch)
            }
            fn create_tag(&self, n: &str, s: &str, m: &str) -> HostResult<Tag> {
                self.0.create_tag(n, s, m)
            }
            fn update_branch_from_tag(&self, t: &str, b: &str, f: bool) -> HostResult<()> {
                self.0.update_branch_from_tag(t, b, f)
            }
            fn get_ref(&self, b: &str) -> HostResult<Reference> {
                self.0.get_ref(b)
            }
            fn get_ref_from_tag(&self, t: &str) -> HostResult<Reference> {
                self.0.get_ref_from_tag(t)
            }
            fn repo_name(&self) -> String {
                self.0.repo_name()
            }
        }

        let host = Counting(MockHost::new().on_compare_branch(|base, branch| {
            if branch == "broken" {
                Err(HostError::Other("diverged".to_string()))
            } else {
                Ok(StatusReport {
                    branch: branch.to_string(),
                    base_branch: base.to_string(),
                    ..Default::default()
                })
            }
        }));

        let reports = host
            .diff_commits(&["a".to_string(), "b".to_string()], "main")
            .unwrap();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[1].branch, "b");

        let err = host
            .diff_commits(&["a".to_string(), "broken".to_string()], "main")
            .unwrap_err();
        assert!(err.to_string().contains("error comparing base branch main broken"));
    }
}
