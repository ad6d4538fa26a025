//! GitHub platform service implementation

use crate::config::Credential;
use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::types::{Branch, MergeOutcome, PlatformConfig, PrState, PullRequest};
use async_trait::async_trait;
use octocrab::Octocrab;
use octocrab::params::repos::Reference;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

const API_VERSION: &str = "2022-11-28";

/// Body of a non-success REST response
#[derive(Deserialize)]
struct ApiMessage {
    #[serde(default)]
    message: String,
}

/// Body of a 201 from the merges endpoint
#[derive(Deserialize)]
struct MergeCommit {
    sha: String,
}

/// GitHub service using octocrab
///
/// The merges endpoint goes through a raw HTTP client: its 201/204 split
/// is the result, and octocrab's typed response hides it.
pub struct GitHubService {
    client: Octocrab,
    config: PlatformConfig,
    /// Token for the raw merge request
    token: Credential,
    /// HTTP client for the raw merge request
    http_client: Client,
}

impl GitHubService {
    /// Create a new GitHub service authenticated with `token`
    pub fn new(token: &Credential, owner: String, repo: String, api_url: String) -> Result<Self> {
        let client = Octocrab::builder()
            .personal_token(token.expose().to_string())
            .base_uri(api_url.as_str())
            .map_err(|e| Error::GitHubApi(e.to_string()))?
            .build()
            .map_err(|e| Error::GitHubApi(e.to_string()))?;

        let http_client = Client::builder()
            .user_agent("branch-sync")
            .build()
            .map_err(|e| Error::GitHubApi(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            config: PlatformConfig {
                owner,
                repo,
                api_url,
            },
            token: token.clone(),
            http_client,
        })
    }

    fn repo_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/{path}",
            self.config.api_url, self.config.owner, self.config.repo
        )
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("Authorization", format!("Bearer {}", self.token.expose()))
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
    }
}

/// Read the `message` field of an error response, falling back to the status
async fn error_message(response: reqwest::Response) -> String {
    let status = response.status();
    let message = response
        .json::<ApiMessage>()
        .await
        .map(|m| m.message)
        .unwrap_or_default();
    if message.is_empty() {
        status.to_string()
    } else {
        format!("{message} ({})", status.as_u16())
    }
}

fn status_of(err: &octocrab::Error) -> Option<u16> {
    match err {
        octocrab::Error::GitHub { source, .. } => Some(source.status_code.as_u16()),
        _ => None,
    }
}

/// Helper to convert octocrab PR to our `PullRequest` type
fn pr_from_octocrab(pr: &octocrab::models::pulls::PullRequest) -> PullRequest {
    PullRequest {
        number: pr.number,
        html_url: pr
            .html_url
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default(),
        base_ref: pr.base.ref_field.clone(),
        head_ref: pr.head.ref_field.clone(),
        title: pr.title.as_deref().unwrap_or_default().to_string(),
        labels: pr
            .labels
            .as_ref()
            .map(|labels| labels.iter().map(|l| l.name.clone()).collect())
            .unwrap_or_default(),
    }
}

#[async_trait]
impl PlatformService for GitHubService {
    async fn list_branches(&self) -> Result<Vec<String>> {
        debug!("listing branches");
        let first = self
            .client
            .repos(&self.config.owner, &self.config.repo)
            .list_branches()
            .per_page(100)
            .send()
            .await?;
        let branches = self.client.all_pages(first).await?;

        let names: Vec<String> = branches.into_iter().map(|b| b.name).collect();
        debug!(count = names.len(), "listed branches");
        Ok(names)
    }

    async fn get_branch(&self, name: &str) -> Result<Option<Branch>> {
        debug!(branch = name, "getting branch");
        let result = self
            .client
            .repos(&self.config.owner, &self.config.repo)
            .get_ref(&Reference::Branch(name.to_string()))
            .await;

        let reference = match result {
            Ok(reference) => reference,
            Err(e) if status_of(&e) == Some(404) => {
                debug!(branch = name, "branch not found");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let sha = match reference.object {
            octocrab::models::repos::Object::Commit { sha, .. }
            | octocrab::models::repos::Object::Tag { sha, .. } => sha,
            _ => {
                return Err(Error::GitHubApi(format!(
                    "ref for branch '{name}' does not point at a commit"
                )));
            }
        };

        debug!(branch = name, sha = %sha, "got branch");
        Ok(Some(Branch {
            name: name.to_string(),
            sha,
        }))
    }

    async fn create_branch(&self, name: &str, sha: &str) -> Result<()> {
        debug!(branch = name, sha, "creating branch");
        let result = self
            .client
            .repos(&self.config.owner, &self.config.repo)
            .create_ref(&Reference::Branch(name.to_string()), sha)
            .await;

        match result {
            Ok(_) => {
                debug!(branch = name, "created branch");
                Ok(())
            }
            Err(octocrab::Error::GitHub { source, .. })
                if source.status_code.as_u16() == 422
                    && source.message.contains("already exists") =>
            {
                Err(Error::BranchExists(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn merge_branches(&self, base: &str, head: &str) -> Result<MergeOutcome> {
        debug!(base, head, "merging branches");
        let response = self
            .authorized(self.http_client.post(self.repo_url("merges")))
            .json(&json!({ "base": base, "head": head }))
            .send()
            .await?;

        let outcome = match response.status() {
            StatusCode::CREATED => {
                let commit: MergeCommit = response.json().await?;
                MergeOutcome::Merged { sha: commit.sha }
            }
            StatusCode::NO_CONTENT => MergeOutcome::UpToDate,
            _ => MergeOutcome::Conflict {
                message: error_message(response).await,
            },
        };

        debug!(base, head, outcome = ?outcome, "merge finished");
        Ok(outcome)
    }

    async fn list_open_prs(&self, head: &str, base: &str) -> Result<Vec<PullRequest>> {
        debug!(head, base, "listing open PRs");
        let prs = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .list()
            .state(octocrab::params::State::Open)
            .head(format!("{}:{head}", self.config.owner))
            .base(base)
            .per_page(100)
            .send()
            .await?;

        let result: Vec<PullRequest> = prs.items.iter().map(pr_from_octocrab).collect();
        debug!(head, base, count = result.len(), "listed open PRs");
        Ok(result)
    }

    async fn create_pr(
        &self,
        head: &str,
        base: &str,
        title: &str,
        body: &str,
    ) -> Result<PullRequest> {
        debug!(head, base, "creating PR");
        let pr = self
            .client
            .pulls(&self.config.owner, &self.config.repo)
            .create(title, head, base)
            .body(body)
            .send()
            .await?;

        let result = pr_from_octocrab(&pr);
        debug!(pr_number = result.number, "created PR");
        Ok(result)
    }

    async fn update_pr_state(&self, pr_number: u64, state: PrState) -> Result<()> {
        debug!(pr_number, %state, "updating PR state");
        let target = match state {
            PrState::Open => octocrab::params::pulls::State::Open,
            PrState::Closed => octocrab::params::pulls::State::Closed,
        };
        self.client
            .pulls(&self.config.owner, &self.config.repo)
            .update(pr_number)
            .state(target)
            .send()
            .await?;

        debug!(pr_number, %state, "updated PR state");
        Ok(())
    }

    async fn create_comment(&self, pr_number: u64, body: &str) -> Result<()> {
        debug!(pr_number, "creating PR comment");
        self.client
            .issues(&self.config.owner, &self.config.repo)
            .create_comment(pr_number, body)
            .await?;
        debug!(pr_number, "created PR comment");
        Ok(())
    }

    async fn add_label(&self, pr_number: u64, label: &str) -> Result<()> {
        debug!(pr_number, label, "adding label");
        self.client
            .issues(&self.config.owner, &self.config.repo)
            .add_labels(pr_number, &[label.to_string()])
            .await?;
        Ok(())
    }

    async fn remove_label(&self, pr_number: u64, label: &str) -> Result<()> {
        debug!(pr_number, label, "removing label");
        self.client
            .issues(&self.config.owner, &self.config.repo)
            .remove_label(pr_number, label)
            .await?;
        Ok(())
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }
}
