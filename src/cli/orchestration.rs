//! Command workflows
//!
//! Each command is a plain function over the [Host], [Reporter] and
//! [Options] it needs. `main.rs` only parses arguments, builds the real
//! collaborators and calls one of these.

use crate::clock::Clock;
use crate::config::Options;
use crate::domain::Tag;
use crate::error::{Result, RolloutError};
use crate::host::Host;
use crate::release::{DeployScheduler, DeploySettings, DraftBuilder, TagManager, VersionResolver};
use crate::tracker::{extract_tasks, IssueTracker};
use crate::ui::{MessageLevel, Reporter};
use tracing::info;

pub const DEFAULT_RELEASE_OFFSET: &str = "1m";
pub const DEFAULT_RELEASE_INTERVAL: &str = "25m";

/// Arguments for the tag workflow
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagWorkflowArgs {
    /// Forced version; skips the bump computation
    pub version: Option<String>,
    /// Pre-release suffix, e.g. `mx`
    pub suffix: String,
    pub major: bool,
    pub minor: bool,
}

/// Arguments for the draft workflow
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DraftWorkflowArgs {
    /// Release title; defaults to the tag name
    pub release_name: Option<String>,
    /// Tag of the release; computed like `tag` when missing
    pub release_tag: Option<String>,
    /// Pre-release suffix, e.g. `mx`
    pub suffix: String,
    pub major: bool,
    pub minor: bool,
    pub skip_confirmation: bool,
    pub update_jira_fix_versions: bool,
}

/// Arguments for the deploy workflow
#[derive(Debug, Clone, PartialEq)]
pub struct DeployWorkflowArgs {
    pub release_offset: String,
    pub release_interval: String,
    /// Allow force push when a release branch diverged
    pub force: bool,
    pub skip_confirmation: bool,
    pub publish_draft: bool,
}

impl Default for DeployWorkflowArgs {
    fn default() -> Self {
        DeployWorkflowArgs {
            release_offset: DEFAULT_RELEASE_OFFSET.to_string(),
            release_interval: DEFAULT_RELEASE_INTERVAL.to_string(),
            force: false,
            skip_confirmation: false,
            publish_draft: false,
        }
    }
}

fn require_branches<'a>(branches: &'a [String], kind: &str) -> Result<&'a [String]> {
    if branches.is_empty() {
        return Err(RolloutError::config(format!("no {} branches configured", kind)));
    }
    Ok(branches)
}

/// Print how far each status branch is behind and ahead of the base branch
pub fn run_status(reporter: &dyn Reporter, host: &dyn Host, options: &Options) -> Result<()> {
    let branches = require_branches(&options.branches, "status")?;
    let reports = host.diff_commits(branches, &options.base_branch)?;

    let base = reports
        .first()
        .map(|r| r.base_branch.as_str())
        .unwrap_or(&options.base_branch);
    reporter.print_colorized_line("REPO: ", &host.repo_name(), MessageLevel::Warning);
    reporter.print_colorized_line("BASE: ", base, MessageLevel::Warning);

    let rows: Vec<Vec<String>> = reports
        .iter()
        .map(|r| {
            vec![
                r.branch.clone(),
                r.behind.len().to_string(),
                r.ahead.len().to_string(),
            ]
        })
        .collect();
    reporter.print_table(&["Branch", "Behind", "Ahead"], &rows);
    Ok(())
}

/// Resolve the next version, settle name collisions with the operator and
/// create the tag.
///
/// # Returns
/// * `Ok(Some(tag))` - The created tag
/// * `Ok(None)` - The operator declined
pub fn run_tag(
    reporter: &dyn Reporter,
    host: &dyn Host,
    options: &Options,
    args: &TagWorkflowArgs,
) -> Result<Option<Tag>> {
    let resolver = VersionResolver::new(host, options.base_branch.as_str());
    let mut version = resolver.next_version(
        args.version.as_deref().unwrap_or(""),
        &args.suffix,
        args.major,
        args.minor,
    )?;

    // Bounded only by the operator: keep asking until the name is free
    let tags = TagManager::new(host);
    while tags.exists_tag_name(&version.name)? {
        reporter.print_colorized_line(
            "",
            &format!(
                "Tag \"{}\" already exists. Please provide a new tag name e.g. 'git-rollout tag 1.2.1'",
                version.name
            ),
            MessageLevel::Error,
        );
        version.name = reporter.input()?.trim().to_string();
    }

    let confirmed = reporter.confirmation(
        &format!("Create tag \"{}\" on {}", version.name, version.sha),
        "Aborting...",
        "Creating tag...",
    )?;
    if !confirmed {
        return Ok(None);
    }

    let tag = tags.create(&version)?;
    reporter.print_colorized_line(
        "",
        &format!("Successfully created tag: \"{}\"", tag.name),
        MessageLevel::Success,
    );
    Ok(Some(tag))
}

/// Draft a release for the release branches, optionally stamping the Jira
/// fix version on the tasks it brings in first.
pub fn run_draft(
    reporter: &dyn Reporter,
    host: &dyn Host,
    tracker: Option<&dyn IssueTracker>,
    options: &Options,
    args: &DraftWorkflowArgs,
) -> Result<()> {
    let release_branches = require_branches(&options.release_branches, "release")?;

    let tag_name = VersionResolver::new(host, options.base_branch.as_str())
        .next_version(
            args.release_tag.as_deref().unwrap_or(""),
            &args.suffix,
            args.major,
            args.minor,
        )?
        .name;
    let release_name = args
        .release_name
        .clone()
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| tag_name.clone());

    let builder = DraftBuilder::new(
        reporter,
        host,
        options.base_branch.as_str(),
        options.release_body_prefix.as_str(),
        release_branches.to_vec(),
        options.release_body_branches.clone(),
    );
    let reports = builder.diff()?;

    if args.update_jira_fix_versions {
        let jira = options
            .jira
            .as_ref()
            .ok_or_else(|| RolloutError::config("missing [jira] section"))?;
        let tracker =
            tracker.ok_or_else(|| RolloutError::config("no issue tracker configured"))?;

        let behind = reports.first().map(|r| r.behind.as_slice()).unwrap_or(&[]);
        let tasks = extract_tasks(&jira.task_regex, behind)?;
        info!(?tasks, version = %jira.draft_version, "updating fix versions");
        tracker.update_fix_versions(&tasks, &jira.draft_version)?;
    }

    builder.create_from_reports(&reports, &release_name, &tag_name, args.skip_confirmation)
}

/// Roll the latest release out to the release branches on a schedule
pub fn run_deploy(
    reporter: &dyn Reporter,
    host: &dyn Host,
    clock: &dyn Clock,
    options: &Options,
    args: &DeployWorkflowArgs,
) -> Result<()> {
    let release_branches = require_branches(&options.release_branches, "release")?;

    let settings = DeploySettings {
        release_branches: release_branches.to_vec(),
        release_body_branches: options.release_body_branches.clone(),
        release_body_find: options.release_body_find.clone(),
        release_body_replace: options.release_body_replace.clone(),
    };

    DeployScheduler::new(reporter, host, clock, settings).run(
        &args.release_interval,
        &args.release_offset,
        args.force,
        args.skip_confirmation,
        args.publish_draft,
    )
}
