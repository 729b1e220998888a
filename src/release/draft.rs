use crate::domain::{Commit, StatusReport};
use crate::error::Result;
use crate::host::Host;
use crate::release::badge;
use crate::ui::{MessageLevel, Reporter};
use std::collections::HashMap;
use tracing::{debug, info};

const FIRST_LINE_PREFIX: &str = "- ";
const NEXT_LINE_PREFIX: &str = "  ";
const LINE_SEPARATOR: &str = "\r\n";
const MAX_COMMIT_LINES: usize = 6;

/// Renders release notes from branch diffs and creates the draft release
pub struct DraftBuilder<'a> {
    reporter: &'a dyn Reporter,
    host: &'a dyn Host,
    base_branch: String,
    release_body_prefix: String,
    release_branches: Vec<String>,
    release_body_branches: HashMap<String, String>,
}

impl<'a> DraftBuilder<'a> {
    pub fn new(
        reporter: &'a dyn Reporter,
        host: &'a dyn Host,
        base_branch: impl Into<String>,
        release_body_prefix: impl Into<String>,
        release_branches: Vec<String>,
        release_body_branches: HashMap<String, String>,
    ) -> Self {
        DraftBuilder {
            reporter,
            host,
            base_branch: base_branch.into(),
            release_body_prefix: release_body_prefix.into(),
            release_branches,
            release_body_branches,
        }
    }

    /// Diff every release branch against the base branch
    pub fn diff(&self) -> Result<Vec<StatusReport>> {
        debug!(base = %self.base_branch, branches = ?self.release_branches, "diffing release branches");
        Ok(self
            .host
            .diff_commits(&self.release_branches, &self.base_branch)?)
    }

    /// Diff the release branches and create the draft release.
    ///
    /// Declining the confirmation is not an error and creates nothing.
    pub fn create(&self, release_name: &str, tag_name: &str, skip_confirmation: bool) -> Result<()> {
        let reports = self.diff()?;
        self.create_from_reports(&reports, release_name, tag_name, skip_confirmation)
    }

    /// Create the draft from diffs fetched earlier with [DraftBuilder::diff]
    pub fn create_from_reports(
        &self,
        reports: &[StatusReport],
        release_name: &str,
        tag_name: &str,
        skip_confirmation: bool,
    ) -> Result<()> {
        let body = self.release_body(reports);

        self.reporter
            .print_colorized_line("REPO: ", &self.host.repo_name(), MessageLevel::Warning);
        self.reporter.print_line(&body);

        if !skip_confirmation
            && !self.reporter.confirmation(
                "Draft the release",
                "No draft",
                "The draft release is ready",
            )?
        {
            return Ok(());
        }

        self.host.create_draft_release(release_name, tag_name, &body)?;
        info!(release = release_name, tag = tag_name, "created draft release");
        Ok(())
    }

    /// Release body: branch badges, the configured prefix and the commits of
    /// the first report, separated by blank lines.
    ///
    /// Only the first report's `behind` commits are listed; release branches
    /// are expected to share one base and therefore one catch-up set.
    pub fn release_body(&self, reports: &[StatusReport]) -> String {
        let header = reports
            .iter()
            .map(|report| {
                badge::unreleased(badge::label_for(&self.release_body_branches, &report.branch))
            })
            .collect::<Vec<_>>()
            .join(" ");

        let body = reports
            .first()
            .map(|report| {
                report
                    .behind
                    .iter()
                    .map(format_message)
                    .collect::<Vec<_>>()
                    .join(LINE_SEPARATOR)
            })
            .unwrap_or_default();

        [header, self.release_body_prefix.clone(), body].join(LINE_SEPARATOR.repeat(2).as_str())
    }
}

/// Render one commit as a list item.
///
/// Blank lines are dropped, at most six lines are kept, the first line is
/// bulleted and the rest indented.
pub fn format_message(commit: &Commit) -> String {
    commit
        .message
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(MAX_COMMIT_LINES)
        .enumerate()
        .map(|(i, line)| {
            let prefix = if i == 0 { FIRST_LINE_PREFIX } else { NEXT_LINE_PREFIX };
            format!("{}{}", prefix, line)
        })
        .collect::<Vec<_>>()
        .join(LINE_SEPARATOR)
}
