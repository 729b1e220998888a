use crate::config::JiraConfig;
use crate::error::{Result, RolloutError};
use crate::tracker::IssueTracker;
use reqwest::blocking::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info};

/// [IssueTracker] backed by the Jira REST API v2
pub struct JiraTracker {
    base_url: String,
    username: String,
    password: String,
    client: Client,
}

impl JiraTracker {
    pub fn new(config: &JiraConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(15))
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| RolloutError::tracker(e.to_string()))?;

        Ok(JiraTracker {
            base_url: config.url.trim_end_matches('/').to_string(),
            username: config.username.clone(),
            password: config.password.clone(),
            client,
        })
    }

    fn issue_url(&self, task: &str) -> String {
        format!("{}/rest/api/2/issue/{}", self.base_url, task)
    }
}

/// Payload replacing the fix versions of an issue with `version`
pub fn fix_version_payload(version: &str) -> Value {
    json!({
        "update": {
            "fixVersions": [
                { "set": [ { "name": version } ] }
            ]
        }
    })
}

impl IssueTracker for JiraTracker {
    fn update_fix_versions(&self, tasks: &[String], version: &str) -> Result<()> {
        let payload = fix_version_payload(version);

        for task in tasks {
            debug!(%task, %version, "updating fix version");
            let response = self
                .client
                .put(self.issue_url(task))
                .basic_auth(&self.username, Some(&self.password))
                .json(&payload)
                .send()
                .map_err(|e| RolloutError::tracker(format!("updating {}: {}", task, e)))?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().unwrap_or_default();
                return Err(RolloutError::tracker(format!(
                    "updating {}: status {}: {}",
                    task, status, body
                )));
            }
        }

        info!(count = tasks.len(), %version, "updated jira fix versions");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> JiraConfig {
        JiraConfig {
            url: "https://jira.example.com/".to_string(),
            username: "bot".to_string(),
            password: "secret".to_string(),
            task_regex: "SHOP-[0-9]+".to_string(),
            draft_version: "2024.03".to_string(),
        }
    }

    #[test]
    fn test_issue_url() {
        let tracker = JiraTracker::new(&config()).unwrap();
        assert_eq!(
            tracker.issue_url("SHOP-12"),
            "https://jira.example.com/rest/api/2/issue/SHOP-12"
        );
    }

    #[test]
    fn test_fix_version_payload() {
        assert_eq!(
            fix_version_payload("2024.03").to_string(),
            r#"{"update":{"fixVersions":[{"set":[{"name":"2024.03"}]}]}}"#
        );
    }

    #[test]
    fn test_no_tasks_makes_no_requests() {
        let tracker = JiraTracker::new(&config()).unwrap();
        assert!(tracker.update_fix_versions(&[], "2024.03").is_ok());
    }
}
