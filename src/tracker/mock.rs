use crate::error::{Result, RolloutError};
use crate::tracker::IssueTracker;
use std::sync::Mutex;

/// Records fix-version updates; optionally fails every call
#[derive(Default)]
pub struct MockTracker {
    updates: Mutex<Vec<(Vec<String>, String)>>,
    failure: Option<String>,
}

impl MockTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every update fail with `message`
    pub fn failing(message: impl Into<String>) -> Self {
        MockTracker {
            failure: Some(message.into()),
            ..Default::default()
        }
    }

    /// Every `(tasks, version)` pair received, oldest first
    pub fn updates(&self) -> Vec<(Vec<String>, String)> {
        self.updates.lock().unwrap().clone()
    }
}

impl IssueTracker for MockTracker {
    fn update_fix_versions(&self, tasks: &[String], version: &str) -> Result<()> {
        self.updates
            .lock()
            .unwrap()
            .push((tasks.to_vec(), version.to_string()));
        match &self.failure {
            Some(message) => Err(RolloutError::tracker(message.clone())),
            None => Ok(()),
        }
    }
}
