//! Timed multi-branch rollout of the latest release
//!
//! A run walks these states:
//! resolve the release, optionally publish the draft, print the schedule,
//! confirm, wait for the first start time, then move each release branch to
//! the release tag in order and stamp its badge in the release body.
//!
//! Every remote failure ends the run; branches already moved stay moved.

use crate::clock::Clock;
use crate::domain::Release;
use crate::error::{Result, RolloutError};
use crate::host::Host;
use crate::release::badge;
use crate::release::schedule::DeploySchedule;
use crate::ui::{MessageLevel, Reporter};
use chrono::{DateTime, Local, TimeDelta};
use std::collections::HashMap;
use tracing::{debug, info};

/// Branch and release-body settings for a rollout
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeploySettings {
    /// Branches to move, in rollout order
    pub release_branches: Vec<String>,
    /// Branch name to the label used in the release body
    pub release_body_branches: HashMap<String, String>,
    /// Badge suffix to look for; empty disables body updates
    pub release_body_find: String,
    pub release_body_replace: String,
}

pub struct DeployScheduler<'a> {
    reporter: &'a dyn Reporter,
    host: &'a dyn Host,
    clock: &'a dyn Clock,
    settings: DeploySettings,
}

impl<'a> DeployScheduler<'a> {
    pub fn new(
        reporter: &'a dyn Reporter,
        host: &'a dyn Host,
        clock: &'a dyn Clock,
        settings: DeploySettings,
    ) -> Self {
        DeployScheduler {
            reporter,
            host,
            clock,
            settings,
        }
    }

    /// Deploy the latest release to every release branch.
    ///
    /// # Arguments
    /// * `release_interval` - Comma separated waits between branches, applied cyclically
    /// * `release_offset` - Wait before the first branch
    /// * `allow_force_push` - Move branches that diverged from the tag
    /// * `skip_confirm` - Do not ask the operator before deploying
    /// * `publish_draft` - Publish the latest release first; it must be a draft
    ///
    /// # Returns
    /// * `Ok(())` - All branches deployed, or the operator declined
    /// * `Err` - Parse failure, remote failure, or a start time already in the past
    pub fn run(
        &self,
        release_interval: &str,
        release_offset: &str,
        allow_force_push: bool,
        skip_confirm: bool,
        publish_draft: bool,
    ) -> Result<()> {
        let schedule = DeploySchedule::parse(release_interval, release_offset)?;

        let release = self.host.last_release()?.ok_or(RolloutError::NoRelease)?;
        debug!(id = release.id, tag = %release.tag_name, draft = release.draft, "resolved latest release");

        if publish_draft {
            self.publish(&release)?;
        }

        self.reporter
            .print_colorized_line("REPO: ", &self.host.repo_name(), MessageLevel::Warning);
        self.reporter
            .print_line(&format!("Deploying {}", release.release_url));
        self.reporter.print_line("Deployment start times are estimates.");

        let release_time = schedule.release_time(self.clock.now());
        self.print_schedule(&schedule, release_time);

        if !skip_confirm && !self.reporter.confirmation("Deployment", "No deployment", "")? {
            info!("deployment declined");
            return Ok(());
        }

        // Without a prompt only a negative offset can start in the past
        let now = self.clock.now();
        let elapsed = if skip_confirm {
            schedule.offset() < TimeDelta::zero()
        } else {
            release_time < now
        };
        if elapsed {
            return Err(RolloutError::ScheduleElapsed);
        }

        let wait = (release_time - now).max(TimeDelta::zero());
        self.reporter.print_line(&format!(
            "Deployment will start in {}",
            humantime::format_duration(wait.to_std().unwrap_or_default())
        ));
        self.clock.sleep(wait);

        self.deploy_all(&schedule, &release, allow_force_push)
    }

    fn publish(&self, release: &Release) -> Result<()> {
        if !release.draft {
            return Err(RolloutError::NotADraft {
                id: release.id,
                url: release.release_url.clone(),
            });
        }
        self.host
            .publish_release(release.id)
            .map_err(|source| RolloutError::Publish {
                id: release.id,
                url: release.release_url.clone(),
                source,
            })?;
        info!(id = release.id, "published draft release");
        Ok(())
    }

    fn print_schedule(&self, schedule: &DeploySchedule, release_time: DateTime<Local>) {
        let rows: Vec<Vec<String>> = self
            .settings
            .release_branches
            .iter()
            .zip(schedule.start_times(release_time, self.settings.release_branches.len()))
            .map(|(branch, start)| vec![branch.clone(), start.format("%H:%M %Z").to_string()])
            .collect();

        self.reporter.print_table(&["Branch", "Start Time"], &rows);
    }

    fn deploy_all(
        &self,
        schedule: &DeploySchedule,
        release: &Release,
        allow_force_push: bool,
    ) -> Result<()> {
        for (i, branch) in self.settings.release_branches.iter().enumerate() {
            if i != 0 {
                self.clock.sleep(schedule.interval_before(i));
            }

            self.reporter.print_line(&format!(
                "Deploying {} {}",
                self.clock.now().format("%H:%M:%S"),
                branch
            ));
            info!(%branch, tag = %release.tag_name, force = allow_force_push, "updating branch");

            self.host
                .update_branch_from_tag(&release.tag_name, branch, allow_force_push)?;
            self.reporter.print_line(&format!(
                "{} Triggered Successfully",
                self.clock.now().format("%H:%M:%S")
            ));

            self.mark_released(branch)?;
        }
        Ok(())
    }

    /// Swap the branch's pending badge for a released one in the latest release body
    fn mark_released(&self, branch: &str) -> Result<()> {
        if self.settings.release_body_find.is_empty() {
            return Ok(());
        }

        let label = badge::label_for(&self.settings.release_body_branches, branch);
        let released_at = self.clock.now();

        let mut release = self.host.last_release()?.ok_or(RolloutError::NoRelease)?;
        let find = badge::pending(label, &self.settings.release_body_find);
        let replace = badge::released(label, &released_at, &self.settings.release_body_replace);
        release.body = release.body.replace(&find, &replace);

        self.host.edit_release(&release)?;
        debug!(%branch, %label, "updated release body");
        Ok(())
    }
}
