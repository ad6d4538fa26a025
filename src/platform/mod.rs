//! Platform services for the hosting API
//!
//! The reconciliation engine only talks to the remote through
//! [`PlatformService`], so tests can substitute an in-memory fake.

mod github;

pub use github::GitHubService;

use crate::error::Result;
use crate::types::{Branch, MergeOutcome, PlatformConfig, PrState, PullRequest};
use async_trait::async_trait;

/// Platform service trait for branch and PR operations
#[async_trait]
pub trait PlatformService: Send + Sync {
    /// List every branch name in the repository, in platform order
    async fn list_branches(&self) -> Result<Vec<String>>;

    /// Look up a branch; `None` when it does not exist
    async fn get_branch(&self, name: &str) -> Result<Option<Branch>>;

    /// Create a branch pointing at `sha`
    ///
    /// Returns [`Error::BranchExists`](crate::error::Error::BranchExists)
    /// when the ref is already present.
    async fn create_branch(&self, name: &str, sha: &str) -> Result<()>;

    /// Merge `head` into `base` on the remote
    async fn merge_branches(&self, base: &str, head: &str) -> Result<MergeOutcome>;

    /// List open PRs filtered by head and base branch
    ///
    /// The filter may be applied loosely by the platform; callers should
    /// re-check `head_ref`/`base_ref`.
    async fn list_open_prs(&self, head: &str, base: &str) -> Result<Vec<PullRequest>>;

    /// Create a new PR
    async fn create_pr(&self, head: &str, base: &str, title: &str, body: &str)
    -> Result<PullRequest>;

    /// Open or close a PR
    async fn update_pr_state(&self, pr_number: u64, state: PrState) -> Result<()>;

    /// Post a comment on a PR
    async fn create_comment(&self, pr_number: u64, body: &str) -> Result<()>;

    /// Add a label to a PR
    async fn add_label(&self, pr_number: u64, label: &str) -> Result<()>;

    /// Remove a label from a PR
    async fn remove_label(&self, pr_number: u64, label: &str) -> Result<()>;

    /// Get the platform configuration
    fn config(&self) -> &PlatformConfig;
}
