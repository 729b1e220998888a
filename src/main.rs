use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use console::style;

use git_rollout::cli::{
    run_deploy, run_draft, run_status, run_tag, DeployWorkflowArgs, DraftWorkflowArgs,
    TagWorkflowArgs,
};
use git_rollout::clock::SystemClock;
use git_rollout::config::{load_config, ConfigOverrides};
use git_rollout::host::GitHubHost;
use git_rollout::telemetry;
use git_rollout::tracker::{IssueTracker, JiraTracker};
use git_rollout::ui::TerminalReporter;

#[derive(Parser)]
#[command(
    name = "git-rollout",
    about = "Draft GitHub releases and roll them out to release branches on a schedule"
)]
struct Cli {
    #[arg(short, long, global = true, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(long, global = true, help = "Base branch the release branches are compared with")]
    base: Option<String>,

    #[arg(long, global = true, help = "Repository owner or organization")]
    owner: Option<String>,

    #[arg(long, global = true, help = "Repository name")]
    repo: Option<String>,

    #[arg(
        long,
        global = true,
        env = "GITHUB_TOKEN",
        hide_env_values = true,
        help = "GitHub access token"
    )]
    token: Option<String>,

    #[arg(short, long, global = true, help = "Enable debug logging")]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show how far each branch is behind and ahead of the base branch
    Status {
        #[arg(long, help = "Comma separated branches to compare")]
        branches: Option<String>,
    },

    /// Create the next version tag on the base branch
    Tag {
        /// Use this version instead of computing one
        version: Option<String>,

        #[arg(long, default_value = "", help = "Pre-release suffix, e.g. 'mx'")]
        suffix: String,

        #[arg(long, help = "Bump the minor version")]
        minor: bool,

        #[arg(long, help = "Bump the major version")]
        major: bool,
    },

    /// Create a draft release listing the commits to be deployed
    Draft {
        #[arg(long, help = "Release title, defaults to the tag name")]
        release_name: Option<String>,

        #[arg(long, help = "Release tag, defaults to the next version")]
        release_tag: Option<String>,

        #[arg(long, default_value = "", help = "Pre-release suffix, e.g. 'mx'")]
        suffix: String,

        #[arg(long, help = "Bump the minor version")]
        minor: bool,

        #[arg(long, help = "Bump the major version")]
        major: bool,

        #[arg(long, help = "Comma separated release branches")]
        branches: Option<String>,

        #[arg(long, help = "Create the draft without asking")]
        skip_confirmation: bool,

        #[arg(long, help = "Set the Jira fix version of the tasks in this release")]
        update_jira_fix_versions: bool,
    },

    /// Move the release branches to the latest release tag on a schedule
    Deploy {
        #[arg(long, default_value = "1m", help = "Wait before the first branch ('5m', '1h 25m', '30s')")]
        release_offset: String,

        #[arg(
            long,
            default_value = "25m",
            help = "Waits between branches, applied cyclically ('10m,5m,1m')"
        )]
        release_interval: String,

        #[arg(long, help = "Allow force push if a release branch has diverged")]
        force: bool,

        #[arg(long, help = "Comma separated release branches")]
        branches: Option<String>,

        #[arg(long, help = "Deploy without asking")]
        skip_confirmation: bool,

        #[arg(long, help = "Publish the latest draft release before deploying")]
        publish_draft: bool,
    },

    /// Print version information
    Version,
}

fn main() {
    let cli = Cli::parse();
    telemetry::init_tracing(telemetry::default_level(cli.verbose));

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    if let Commands::Version = cli.command {
        println!("git-rollout {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let config = load_config(cli.config.as_deref()).context("loading configuration")?;

    let mut overrides = ConfigOverrides {
        access_token: cli.token.clone(),
        base_branch: cli.base.clone(),
        owner: cli.owner.clone(),
        repo: cli.repo.clone(),
        ..Default::default()
    };
    match &cli.command {
        Commands::Status { branches } => overrides.branches = branches.clone(),
        Commands::Draft { branches, .. } | Commands::Deploy { branches, .. } => {
            overrides.release_branches = branches.clone()
        }
        _ => {}
    }
    let options = config
        .resolve(&overrides)
        .context("resolving configuration")?;

    let host = GitHubHost::with_api_url(
        &options.organization,
        &options.repo_name,
        &options.access_token,
        &options.api_url,
    )
    .context("creating GitHub client")?;
    let reporter = TerminalReporter::new();

    match cli.command {
        Commands::Status { .. } => {
            run_status(&reporter, &host, &options).context("comparing branches")?;
        }
        Commands::Tag {
            version,
            suffix,
            minor,
            major,
        } => {
            let args = TagWorkflowArgs {
                version,
                suffix,
                major,
                minor,
            };
            run_tag(&reporter, &host, &options, &args).context("creating tag")?;
        }
        Commands::Draft {
            release_name,
            release_tag,
            suffix,
            minor,
            major,
            skip_confirmation,
            update_jira_fix_versions,
            ..
        } => {
            let tracker = match (&options.jira, update_jira_fix_versions) {
                (Some(jira), true) => Some(JiraTracker::new(jira).context("creating Jira client")?),
                _ => None,
            };
            let args = DraftWorkflowArgs {
                release_name,
                release_tag,
                suffix,
                major,
                minor,
                skip_confirmation,
                update_jira_fix_versions,
            };
            run_draft(
                &reporter,
                &host,
                tracker.as_ref().map(|t| t as &dyn IssueTracker),
                &options,
                &args,
            )
            .context("drafting release")?;
        }
        Commands::Deploy {
            release_offset,
            release_interval,
            force,
            skip_confirmation,
            publish_draft,
            ..
        } => {
            let args = DeployWorkflowArgs {
                release_offset,
                release_interval,
                force,
                skip_confirmation,
                publish_draft,
            };
            run_deploy(&reporter, &host, &SystemClock, &options, &args).context("deploying")?;
        }
        Commands::Version => {}
    }

    Ok(())
}
