//! Core types for branch-sync

use serde::{Deserialize, Serialize};

/// A branch on the remote
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Branch {
    /// Short branch name (no `refs/heads/` prefix)
    pub name: String,
    /// Commit SHA the branch points at
    pub sha: String,
}

/// An open pull request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PullRequest {
    /// PR number
    pub number: u64,
    /// Web URL for the PR
    pub html_url: String,
    /// Base branch name
    pub base_ref: String,
    /// Head branch name
    pub head_ref: String,
    /// PR title
    pub title: String,
    /// Names of labels currently on the PR
    pub labels: Vec<String>,
}

impl PullRequest {
    /// Whether the PR carries a label with this exact name
    pub fn has_label(&self, name: &str) -> bool {
        self.labels.iter().any(|l| l == name)
    }
}

/// PR state transitions used by the kicker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrState {
    /// PR is open
    Open,
    /// PR is closed
    Closed,
}

impl std::fmt::Display for PrState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

/// Outcome of asking the platform to merge one branch into another
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// A new merge commit was created on the base branch
    Merged {
        /// SHA of the merge commit
        sha: String,
    },
    /// Head was already contained in base; nothing changed
    UpToDate,
    /// Merge was refused (content conflict, permissions, unexpected status)
    Conflict {
        /// Platform message describing the refusal
        message: String,
    },
}

/// Repository coordinates for platform calls
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformConfig {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// REST API base URL, e.g. `https://api.github.com`
    pub api_url: String,
}

/// A PR that was created or kicked during the run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PrUpdate {
    /// Source branch that triggered the sync
    pub source_branch: String,
    /// Target branch the changes flow into
    pub target_branch: String,
    /// PR head branch as reported by the platform
    pub head_branch: String,
    /// PR base branch as reported by the platform
    pub base_branch: String,
    /// Web URL for the PR
    pub url: String,
}

impl PrUpdate {
    /// Build an update record from the platform's view of the PR
    pub fn from_pr(source_branch: &str, target_branch: &str, pr: &PullRequest) -> Self {
        Self {
            source_branch: source_branch.to_string(),
            target_branch: target_branch.to_string(),
            head_branch: pr.head_ref.clone(),
            base_branch: pr.base_ref.clone(),
            url: pr.html_url.clone(),
        }
    }
}
