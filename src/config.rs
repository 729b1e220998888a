use crate::error::{Result, RolloutError};
use crate::host::github::DEFAULT_GITHUB_API_URL;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// File name looked up in the working directory and the home directory
pub const CONFIG_FILE_NAME: &str = ".git-rollout.toml";

/// Represents the complete configuration file for git-rollout.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    #[serde(default)]
    pub generic: GenericConfig,

    #[serde(default)]
    pub github: GithubConfig,

    #[serde(default)]
    pub release: ReleaseConfig,

    /// Per-repository overrides keyed by repository name
    #[serde(default)]
    pub repos: HashMap<String, RepoConfig>,

    #[serde(default)]
    pub jira: Option<JiraConfig>,
}

/// Defaults shared by every repository.
///
/// Branch lists are comma separated, e.g. `"release-gr,release-mx"`.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(rename_all = "kebab-case")]
pub struct GenericConfig {
    pub base_branch: Option<String>,
    pub status_branches: Option<String>,
    pub release_branches: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct GithubConfig {
    pub access_token: Option<String>,
    pub default_owner: Option<String>,
    pub default_repo: Option<String>,

    /// Text placed between the badge header and the commit list of a draft
    #[serde(default)]
    pub release_body_prefix: String,

    #[serde(default = "default_api_url")]
    pub api_url: String,
}

fn default_api_url() -> String {
    DEFAULT_GITHUB_API_URL.to_string()
}

impl Default for GithubConfig {
    fn default() -> Self {
        GithubConfig {
            access_token: None,
            default_owner: None,
            default_repo: None,
            release_body_prefix: String::new(),
            api_url: default_api_url(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(rename_all = "kebab-case")]
pub struct ReleaseConfig {
    /// Branch name to the label shown in release notes
    #[serde(default)]
    pub branch_map: HashMap<String, String>,

    #[serde(default)]
    pub on_deploy: OnDeployConfig,
}

/// Badge rewriting applied to the release body as each branch is deployed
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct OnDeployConfig {
    #[serde(default)]
    pub body_branch_suffix_find: String,
    #[serde(default)]
    pub body_branch_suffix_replace: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(rename_all = "kebab-case")]
pub struct RepoConfig {
    pub status_branches: Option<String>,
    pub release_branches: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct JiraConfig {
    pub url: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    /// Pattern matching task keys inside commit messages, e.g. `[A-Z]+-\d+`
    pub task_regex: String,
    /// Fix version assigned to the tasks of a drafted release
    pub draft_version: String,
}

/// Values given on the command line; they win over the file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub access_token: Option<String>,
    pub base_branch: Option<String>,
    pub owner: Option<String>,
    pub repo: Option<String>,
    pub branches: Option<String>,
    pub release_branches: Option<String>,
}

/// Fully resolved settings handed to the workflows.
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    pub base_branch: String,
    pub branches: Vec<String>,
    pub release_branches: Vec<String>,
    pub access_token: String,
    pub organization: String,
    pub repo_name: String,
    pub api_url: String,

    pub release_body_branches: HashMap<String, String>,
    pub release_body_prefix: String,
    pub release_body_find: String,
    pub release_body_replace: String,

    pub jira: Option<JiraConfig>,
}

/// Split a comma separated branch list, dropping blanks
pub fn split_branches(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .map(str::to_string)
        .collect()
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty()).cloned()
}

impl Config {
    /// Merge command line overrides, per-repository and generic settings.
    ///
    /// Precedence for every value: command line, then `[repos.<repo>]`, then
    /// the generic sections.
    ///
    /// # Returns
    /// * `Ok(Options)` - Resolved settings
    /// * `Err` - Naming the first missing mandatory field: access token,
    ///   organization, repository, base branch
    pub fn resolve(&self, overrides: &ConfigOverrides) -> Result<Options> {
        let access_token = non_empty(overrides.access_token.as_ref())
            .or_else(|| non_empty(self.github.access_token.as_ref()));
        let organization = non_empty(overrides.owner.as_ref())
            .or_else(|| non_empty(self.github.default_owner.as_ref()));
        let repo_name = non_empty(overrides.repo.as_ref())
            .or_else(|| non_empty(self.github.default_repo.as_ref()));
        let base_branch = non_empty(overrides.base_branch.as_ref())
            .or_else(|| non_empty(self.generic.base_branch.as_ref()));

        let repo_section = repo_name.as_ref().and_then(|name| self.repos.get(name));

        let status_list = non_empty(overrides.branches.as_ref())
            .or_else(|| repo_section.and_then(|r| non_empty(r.status_branches.as_ref())))
            .or_else(|| non_empty(self.generic.status_branches.as_ref()));
        let release_list = non_empty(overrides.release_branches.as_ref())
            .or_else(|| repo_section.and_then(|r| non_empty(r.release_branches.as_ref())))
            .or_else(|| non_empty(self.generic.release_branches.as_ref()));

        let required = |value: Option<String>, field: &str| {
            value.ok_or_else(|| RolloutError::config(format!("missing required field: {}", field)))
        };

        Ok(Options {
            access_token: required(access_token, "access token")?,
            organization: required(organization, "organization")?,
            repo_name: required(repo_name, "repository")?,
            base_branch: required(base_branch, "base branch")?,
            branches: status_list.as_deref().map(split_branches).unwrap_or_default(),
            release_branches: release_list.as_deref().map(split_branches).unwrap_or_default(),
            api_url: self.github.api_url.clone(),
            release_body_branches: self.release.branch_map.clone(),
            release_body_prefix: self.github.release_body_prefix.clone(),
            release_body_find: self.release.on_deploy.body_branch_suffix_find.clone(),
            release_body_replace: self.release.on_deploy.body_branch_suffix_replace.clone(),
            jira: self.jira.clone(),
        })
    }
}

/// Locate the configuration file.
///
/// Looks in the following order:
/// 1. Custom path provided as parameter
/// 2. `.git-rollout.toml` in current directory
/// 3. `.git-rollout.toml` in the user's home directory
pub fn find_config(config_path: Option<&str>) -> Option<PathBuf> {
    if let Some(path) = config_path {
        return Some(PathBuf::from(path));
    }
    let local = Path::new(".").join(CONFIG_FILE_NAME);
    if local.exists() {
        return Some(local);
    }
    dirs::home_dir()
        .map(|home| home.join(CONFIG_FILE_NAME))
        .filter(|p| p.exists())
}

/// Loads configuration from file.
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
///
/// # Returns
/// * `Ok(Config)` - Parsed configuration; empty defaults when no file exists
///   (mandatory fields may still come from the command line)
/// * `Err` - If a file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let Some(path) = find_config(config_path) else {
        return Ok(Config::default());
    };

    let config_str = fs::read_to_string(&path).map_err(|e| {
        RolloutError::config(format!("cannot read {}: {}", path.display(), e))
    })?;
    parse_config(&config_str)
}

/// Parse configuration from TOML text
pub fn parse_config(config_str: &str) -> Result<Config> {
    toml::from_str(config_str).map_err(|e| RolloutError::config(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[generic]
base-branch = "master"
status-branches = "master,develop"
release-branches = "release-gr,release-mx"

[github]
access-token = "secret"
default-owner = "acme"
default-repo = "shop"
release-body-prefix = "Deploys"

[release]
branch-map = { release-gr = "GR", release-mx = "MX" }

[release.on-deploy]
body-branch-suffix-find = "-No-red.svg"
body-branch-suffix-replace = "-green.svg"

[repos.api]
release-branches = "release-api"
"#;

    #[test]
    fn test_split_branches() {
        assert_eq!(
            split_branches(" a, b ,,c "),
            vec!["a".to_string(), "b".to_string(), "c".to_string()]
        );
        assert!(split_branches("").is_empty());
    }

    #[test]
    fn test_resolve_from_file() {
        let config = parse_config(SAMPLE).unwrap();
        let options = config.resolve(&ConfigOverrides::default()).unwrap();

        assert_eq!(options.base_branch, "master");
        assert_eq!(options.organization, "acme");
        assert_eq!(options.repo_name, "shop");
        assert_eq!(options.branches, vec!["master", "develop"]);
        assert_eq!(options.release_branches, vec!["release-gr", "release-mx"]);
        assert_eq!(options.release_body_find, "-No-red.svg");
        assert_eq!(options.release_body_replace, "-green.svg");
        assert_eq!(options.release_body_branches.get("release-gr").unwrap(), "GR");
        assert_eq!(options.api_url, DEFAULT_GITHUB_API_URL);
        assert!(options.jira.is_none());
    }

    #[test]
    fn test_repo_section_overrides_generic() {
        let config = parse_config(SAMPLE).unwrap();
        let overrides = ConfigOverrides {
            repo: Some("api".to_string()),
            ..Default::default()
        };
        let options = config.resolve(&overrides).unwrap();
        assert_eq!(options.repo_name, "api");
        assert_eq!(options.release_branches, vec!["release-api"]);
        // No status override in [repos.api]
        assert_eq!(options.branches, vec!["master", "develop"]);
    }

    #[test]
    fn test_command_line_wins() {
        let config = parse_config(SAMPLE).unwrap();
        let overrides = ConfigOverrides {
            base_branch: Some("main".to_string()),
            release_branches: Some("one,two".to_string()),
            access_token: Some("from-env".to_string()),
            ..Default::default()
        };
        let options = config.resolve(&overrides).unwrap();
        assert_eq!(options.base_branch, "main");
        assert_eq!(options.release_branches, vec!["one", "two"]);
        assert_eq!(options.access_token, "from-env");
    }

    #[test]
    fn test_missing_fields_in_order() {
        let err = Config::default()
            .resolve(&ConfigOverrides::default())
            .unwrap_err();
        assert!(err.to_string().contains("access token"));

        let overrides = ConfigOverrides {
            access_token: Some("t".to_string()),
            owner: Some("acme".to_string()),
            repo: Some("shop".to_string()),
            ..Default::default()
        };
        let err = Config::default().resolve(&overrides).unwrap_err();
        assert!(err.to_string().contains("base branch"));
    }

    #[test]
    fn test_jira_section() {
        let config = parse_config(
            r#"
[jira]
url = "https://jira.example.com"
username = "bot"
password = "pw"
task-regex = "SHOP-[0-9]+"
draft-version = "2024.03"
"#,
        )
        .unwrap();
        let jira = config.jira.unwrap();
        assert_eq!(jira.task_regex, "SHOP-[0-9]+");
        assert_eq!(jira.draft_version, "2024.03");
    }

    #[test]
    fn test_parse_error_is_config_error() {
        let err = parse_config("generic = 3").unwrap_err();
        assert!(err.to_string().starts_with("Configuration error"));
    }
}
