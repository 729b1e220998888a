use crate::domain::{Commit, Reference, Release, StatusReport, Tag};
use crate::host::{Host, HostError, HostResult};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

const USER_AGENT: &str = concat!("git-rollout/", env!("CARGO_PKG_VERSION"));

/// [Host] backed by the GitHub REST API
pub struct GitHubHost {
    owner: String,
    repo: String,
    token: String,
    api_url: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct GhRelease {
    id: i64,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    tag_name: String,
    #[serde(default)]
    html_url: String,
    #[serde(default)]
    draft: bool,
}

impl From<GhRelease> for Release {
    fn from(r: GhRelease) -> Self {
        Release {
            id: r.id,
            body: r.body.unwrap_or_default(),
            tag_name: r.tag_name,
            release_url: r.html_url,
            draft: r.draft,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GhComparison {
    #[serde(default)]
    commits: Vec<GhCommitEntry>,
}

#[derive(Debug, Deserialize)]
struct GhCommitEntry {
    commit: GhCommitDetail,
}

#[derive(Debug, Deserialize)]
struct GhCommitDetail {
    message: String,
}

#[derive(Debug, Deserialize)]
struct GhRef {
    #[serde(rename = "ref")]
    name: String,
    object: GhObject,
}

#[derive(Debug, Deserialize)]
struct GhObject {
    sha: String,
    #[serde(rename = "type", default)]
    kind: String,
}

#[derive(Debug, Deserialize)]
struct GhTag {
    tag: String,
    sha: String,
    object: GhObject,
}

#[derive(Serialize)]
struct NewRelease<'a> {
    name: &'a str,
    tag_name: &'a str,
    body: &'a str,
    draft: bool,
}

#[derive(Serialize)]
struct NewTag<'a> {
    tag: &'a str,
    message: &'a str,
    object: &'a str,
    #[serde(rename = "type")]
    kind: &'a str,
}

#[derive(Serialize)]
struct NewRef<'a> {
    #[serde(rename = "ref")]
    name: &'a str,
    sha: &'a str,
}

#[derive(Serialize)]
struct RefUpdate<'a> {
    sha: &'a str,
    force: bool,
}

impl GitHubHost {
    /// Create a client for `owner/repo` against the public GitHub API
    pub fn new(
        owner: impl Into<String>,
        repo: impl Into<String>,
        token: impl Into<String>,
    ) -> HostResult<Self> {
        Self::with_api_url(owner, repo, token, DEFAULT_GITHUB_API_URL)
    }

    /// Create a client against an explicit API base URL (GitHub Enterprise)
    pub fn with_api_url(
        owner: impl Into<String>,
        repo: impl Into<String>,
        token: impl Into<String>,
        api_url: impl Into<String>,
    ) -> HostResult<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(15))
            .timeout(Duration::from_secs(60))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| HostError::Http {
                status: None,
                message: e.to_string(),
            })?;

        Ok(GitHubHost {
            owner: owner.into(),
            repo: repo.into(),
            token: token.into(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    fn repo_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/{}",
            self.api_url,
            self.owner,
            self.repo,
            path.trim_start_matches('/')
        )
    }

    fn request(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .bearer_auth(&self.token)
    }

    fn send(&self, builder: RequestBuilder, what: &str) -> HostResult<Response> {
        let response = self
            .request(builder)
            .send()
            .map_err(|e| HostError::Http {
                status: None,
                message: e.to_string(),
            })?;
        check_status(response, what)
    }

    fn get<T: DeserializeOwned>(&self, path: &str) -> HostResult<T> {
        debug!(path, "GET");
        let response = self.send(self.client.get(self.repo_url(path)), path)?;
        decode(response)
    }

    fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        method: reqwest::Method,
        path: &str,
        body: &B,
    ) -> HostResult<T> {
        debug!(path, %method, "sending");
        let builder = self.client.request(method, self.repo_url(path)).json(body);
        let response = self.send(builder, path)?;
        decode(response)
    }

    fn commits_diff(&self, base: &str, head: &str) -> HostResult<Vec<Commit>> {
        let comparison: GhComparison = self.get(&format!("compare/{}...{}", base, head))?;
        Ok(comparison
            .commits
            .into_iter()
            .map(|c| Commit::new(c.commit.message))
            .collect())
    }

    /// Tag ref resolved to its commit, peeling annotated tag objects
    fn peeled_tag_ref(&self, tag: &str) -> HostResult<Reference> {
        let tag_ref: GhRef = self.get(&format!("git/ref/tags/{}", tag))?;
        if tag_ref.object.kind == "tag" {
            let tag_object: GhTag = self.get(&format!("git/tags/{}", tag_ref.object.sha))?;
            return Ok(Reference::new(tag_object.object.sha, tag_ref.name));
        }
        Ok(Reference::new(tag_ref.object.sha, tag_ref.name))
    }
}

fn check_status(response: Response, what: &str) -> HostResult<Response> {
    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return Err(HostError::NotFound(what.to_string()));
    }
    if !status.is_success() {
        let message = response
            .text()
            .unwrap_or_else(|_| "unable to read response body".to_string());
        return Err(HostError::Http {
            status: Some(status.as_u16()),
            message,
        });
    }
    Ok(response)
}

fn decode<T: DeserializeOwned>(response: Response) -> HostResult<T> {
    let text = response.text().map_err(|e| HostError::Http {
        status: None,
        message: e.to_string(),
    })?;
    parse_body(&text)
}

fn parse_body<T: DeserializeOwned>(text: &str) -> HostResult<T> {
    serde_json::from_str(text).map_err(|e| HostError::Decode(e.to_string()))
}

impl Host for GitHubHost {
    fn last_release(&self) -> HostResult<Option<Release>> {
        match self.get::<GhRelease>("releases/latest") {
            Ok(release) => Ok(Some(release.into())),
            Err(HostError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn create_draft_release(&self, name: &str, tag_name: &str, body: &str) -> HostResult<()> {
        let payload = NewRelease {
            name,
            tag_name,
            body,
            draft: true,
        };
        let created: GhRelease = self.send_json(reqwest::Method::POST, "releases", &payload)?;
        debug!(id = created.id, tag_name, "draft release created");
        Ok(())
    }

    fn edit_release(&self, release: &Release) -> HostResult<Release> {
        let payload = serde_json::json!({ "body": release.body });
        let updated: GhRelease = self.send_json(
            reqwest::Method::PATCH,
            &format!("releases/{}", release.id),
            &payload,
        )?;
        Ok(updated.into())
    }

    fn publish_release(&self, release_id: i64) -> HostResult<()> {
        let payload = serde_json::json!({ "draft": false });
        let _: GhRelease = self.send_json(
            reqwest::Method::PATCH,
            &format!("releases/{}", release_id),
            &payload,
        )?;
        Ok(())
    }

    fn compare_branch(&self, base_branch: &str, branch: &str) -> HostResult<StatusReport> {
        let ahead = self.commits_diff(base_branch, branch)?;
        let behind = self.commits_diff(branch, base_branch)?;
        Ok(StatusReport {
            branch: branch.to_string(),
            base_branch: base_branch.to_string(),
            ahead,
            behind,
        })
    }

    fn create_tag(&self, name: &str, sha: &str, message: &str) -> HostResult<Tag> {
        let payload = NewTag {
            tag: name,
            message,
            object: sha,
            kind: "commit",
        };
        let tag: GhTag = self.send_json(reqwest::Method::POST, "git/tags", &payload)?;

        let ref_name = format!("refs/tags/{}", name);
        let new_ref = NewRef {
            name: &ref_name,
            sha: &tag.sha,
        };
        let _: GhRef = self.send_json(reqwest::Method::POST, "git/refs", &new_ref)?;

        Ok(Tag::new(tag.tag))
    }

    fn update_branch_from_tag(&self, tag: &str, branch: &str, force: bool) -> HostResult<()> {
        let tag_ref = self.peeled_tag_ref(tag)?;
        let payload = RefUpdate {
            sha: &tag_ref.sha,
            force,
        };
        let _: GhRef = self
            .send_json(
                reqwest::Method::PATCH,
                &format!("git/refs/heads/{}", branch),
                &payload,
            )
            .map_err(|e| match e {
                HostError::NotFound(_) => e,
                other => HostError::Other(format!("error on update branch from tag: {}", other)),
            })?;
        Ok(())
    }

    fn get_ref(&self, branch: &str) -> HostResult<Reference> {
        let r: GhRef = self.get(&format!("git/ref/heads/{}", branch))?;
        Ok(Reference::new(r.object.sha, r.name))
    }

    fn get_ref_from_tag(&self, tag: &str) -> HostResult<Reference> {
        self.peeled_tag_ref(tag)
    }

    fn repo_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}
