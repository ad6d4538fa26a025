//! Mock platform service for testing
//!
//! An in-memory repository: branches, open PRs and labels live in the mock
//! and change as the engine calls it, so multi-step flows behave like they
//! would against the real API.

#![allow(dead_code)]

use async_trait::async_trait;
use branch_sync::error::{Error, Result};
use branch_sync::platform::PlatformService;
use branch_sync::types::{Branch, MergeOutcome, PlatformConfig, PrState, PullRequest};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// Call record for `merge_branches`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeCall {
    pub base: String,
    pub head: String,
}

/// Call record for `create_pr`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePrCall {
    pub head: String,
    pub base: String,
    pub title: String,
    pub body: String,
}

/// Call record for `update_pr_state`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateCall {
    pub pr_number: u64,
    pub state: PrState,
}

/// Call record for `create_comment`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateCommentCall {
    pub pr_number: u64,
    pub body: String,
}

/// Call record for `add_label` / `remove_label`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelCall {
    pub pr_number: u64,
    pub label: String,
}

/// In-memory mock platform service
///
/// Features:
/// - Branch and PR state that merges and PR creation update
/// - Call tracking for verification
/// - Per-branch / per-merge error injection
pub struct MockPlatformService {
    config: PlatformConfig,
    next_pr_number: AtomicU64,
    next_commit: AtomicU64,
    branches: Mutex<Vec<Branch>>,
    /// (base, head sha) pairs already merged
    contained: Mutex<HashSet<(String, String)>>,
    prs: Mutex<Vec<PullRequest>>,
    /// Head name the platform reports for newly created PRs
    head_aliases: Mutex<HashMap<String, String>>,
    merge_responses: Mutex<HashMap<(String, String), MergeOutcome>>,
    // Call tracking
    list_branches_calls: AtomicU64,
    create_branch_calls: Mutex<Vec<String>>,
    merge_calls: Mutex<Vec<MergeCall>>,
    list_pr_calls: Mutex<Vec<(String, String)>>,
    create_pr_calls: Mutex<Vec<CreatePrCall>>,
    state_calls: Mutex<Vec<StateCall>>,
    comment_calls: Mutex<Vec<CreateCommentCall>>,
    add_label_calls: Mutex<Vec<LabelCall>>,
    remove_label_calls: Mutex<Vec<LabelCall>>,
    // Error injection
    error_on_list_branches: Mutex<Option<String>>,
    error_on_create_branch: Mutex<HashMap<String, String>>,
    error_on_merge: Mutex<HashMap<(String, String), String>>,
    error_on_create_pr: Mutex<Option<String>>,
    error_on_update_state: Mutex<Option<String>>,
    error_on_comment: Mutex<Option<String>>,
    error_on_labels: Mutex<Option<String>>,
}

impl MockPlatformService {
    /// Create a new mock with the given config
    pub fn with_config(config: PlatformConfig) -> Self {
        Self {
            config,
            next_pr_number: AtomicU64::new(1),
            next_commit: AtomicU64::new(1),
            branches: Mutex::new(Vec::new()),
            contained: Mutex::new(HashSet::new()),
            prs: Mutex::new(Vec::new()),
            head_aliases: Mutex::new(HashMap::new()),
            merge_responses: Mutex::new(HashMap::new()),
            list_branches_calls: AtomicU64::new(0),
            create_branch_calls: Mutex::new(Vec::new()),
            merge_calls: Mutex::new(Vec::new()),
            list_pr_calls: Mutex::new(Vec::new()),
            create_pr_calls: Mutex::new(Vec::new()),
            state_calls: Mutex::new(Vec::new()),
            comment_calls: Mutex::new(Vec::new()),
            add_label_calls: Mutex::new(Vec::new()),
            remove_label_calls: Mutex::new(Vec::new()),
            error_on_list_branches: Mutex::new(None),
            error_on_create_branch: Mutex::new(HashMap::new()),
            error_on_merge: Mutex::new(HashMap::new()),
            error_on_create_pr: Mutex::new(None),
            error_on_update_state: Mutex::new(None),
            error_on_comment: Mutex::new(None),
            error_on_labels: Mutex::new(None),
        }
    }

    // === State setup ===

    /// Add a branch pointing at `sha`
    pub fn add_branch(&self, name: &str, sha: &str) {
        self.branches.lock().unwrap().push(Branch {
            name: name.to_string(),
            sha: sha.to_string(),
        });
    }

    /// Add an open PR and return it
    pub fn add_pr(&self, number: u64, head: &str, base: &str, labels: &[&str]) -> PullRequest {
        let pr = PullRequest {
            number,
            html_url: format!("https://github.com/acme/widgets/pull/{number}"),
            base_ref: base.to_string(),
            head_ref: head.to_string(),
            title: format!("PR {number}"),
            labels: labels.iter().map(ToString::to_string).collect(),
        };
        self.prs.lock().unwrap().push(pr.clone());
        self.next_pr_number.fetch_max(number + 1, Ordering::SeqCst);
        pr
    }

    /// Mark `head`'s current tip as already merged into `base`
    pub fn mark_merged(&self, base: &str, head: &str) {
        let sha = self.branch_sha(head).expect("head branch exists");
        self.contained
            .lock()
            .unwrap()
            .insert((base.to_string(), sha));
    }

    /// Report `alias` as the head of PRs created from `head`
    pub fn alias_created_head(&self, head: &str, alias: &str) {
        self.head_aliases
            .lock()
            .unwrap()
            .insert(head.to_string(), alias.to_string());
    }

    /// Force the outcome of merging `head` into `base`
    pub fn set_merge_response(&self, base: &str, head: &str, outcome: MergeOutcome) {
        self.merge_responses
            .lock()
            .unwrap()
            .insert((base.to_string(), head.to_string()), outcome);
    }

    /// Make merging `head` into `base` report a conflict
    pub fn conflict_on_merge(&self, base: &str, head: &str) {
        self.set_merge_response(
            base,
            head,
            MergeOutcome::Conflict {
                message: "Merge conflict (409)".to_string(),
            },
        );
    }

    // === Error injection methods ===

    /// Make `list_branches` return an error
    pub fn fail_list_branches(&self, msg: &str) {
        *self.error_on_list_branches.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `create_branch` fail for one branch name
    pub fn fail_create_branch(&self, name: &str, msg: &str) {
        self.error_on_create_branch
            .lock()
            .unwrap()
            .insert(name.to_string(), msg.to_string());
    }

    /// Make `merge_branches` return a transport-level error for one pair
    pub fn fail_merge(&self, base: &str, head: &str, msg: &str) {
        self.error_on_merge
            .lock()
            .unwrap()
            .insert((base.to_string(), head.to_string()), msg.to_string());
    }

    /// Make `create_pr` return an error
    pub fn fail_create_pr(&self, msg: &str) {
        *self.error_on_create_pr.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `update_pr_state` return an error
    pub fn fail_update_state(&self, msg: &str) {
        *self.error_on_update_state.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `create_comment` return an error
    pub fn fail_comment(&self, msg: &str) {
        *self.error_on_comment.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `add_label` and `remove_label` return an error
    pub fn fail_labels(&self, msg: &str) {
        *self.error_on_labels.lock().unwrap() = Some(msg.to_string());
    }

    // === State inspection ===

    /// Current tip of a branch
    pub fn branch_sha(&self, name: &str) -> Option<String> {
        self.branches
            .lock()
            .unwrap()
            .iter()
            .find(|b| b.name == name)
            .map(|b| b.sha.clone())
    }

    /// Whether a branch exists
    pub fn has_branch(&self, name: &str) -> bool {
        self.branch_sha(name).is_some()
    }

    /// Current labels of a PR
    pub fn pr_labels(&self, number: u64) -> Vec<String> {
        self.prs
            .lock()
            .unwrap()
            .iter()
            .find(|pr| pr.number == number)
            .map(|pr| pr.labels.clone())
            .unwrap_or_default()
    }

    // === Call verification methods ===

    pub fn list_branches_count(&self) -> u64 {
        self.list_branches_calls.load(Ordering::SeqCst)
    }

    pub fn get_create_branch_calls(&self) -> Vec<String> {
        self.create_branch_calls.lock().unwrap().clone()
    }

    pub fn get_merge_calls(&self) -> Vec<MergeCall> {
        self.merge_calls.lock().unwrap().clone()
    }

    pub fn get_list_pr_calls(&self) -> Vec<(String, String)> {
        self.list_pr_calls.lock().unwrap().clone()
    }

    pub fn get_create_pr_calls(&self) -> Vec<CreatePrCall> {
        self.create_pr_calls.lock().unwrap().clone()
    }

    pub fn get_state_calls(&self) -> Vec<StateCall> {
        self.state_calls.lock().unwrap().clone()
    }

    pub fn get_comment_calls(&self) -> Vec<CreateCommentCall> {
        self.comment_calls.lock().unwrap().clone()
    }

    pub fn get_add_label_calls(&self) -> Vec<LabelCall> {
        self.add_label_calls.lock().unwrap().clone()
    }

    pub fn get_remove_label_calls(&self) -> Vec<LabelCall> {
        self.remove_label_calls.lock().unwrap().clone()
    }

    /// Assert that `create_pr` was called with specific head and base
    pub fn assert_create_pr_called(&self, head: &str, base: &str) {
        let calls = self.get_create_pr_calls();
        assert!(
            calls.iter().any(|c| c.head == head && c.base == base),
            "Expected create_pr({head}, {base}) but got: {calls:?}"
        );
    }

    /// Assert that `merge_branches` was called with specific args
    pub fn assert_merge_called(&self, base: &str, head: &str) {
        let calls = self.get_merge_calls();
        assert!(
            calls.iter().any(|c| c.base == base && c.head == head),
            "Expected merge_branches({base}, {head}) but got: {calls:?}"
        );
    }

    /// Assert the PR was closed then reopened, and nothing else
    pub fn assert_kicked(&self, pr_number: u64) {
        let calls = self.get_state_calls();
        assert_eq!(
            calls,
            vec![
                StateCall {
                    pr_number,
                    state: PrState::Closed,
                },
                StateCall {
                    pr_number,
                    state: PrState::Open,
                },
            ],
            "Expected PR #{pr_number} to be kicked"
        );
    }

    /// Assert no PR state change happened
    pub fn assert_not_kicked(&self) {
        let calls = self.get_state_calls();
        assert!(calls.is_empty(), "Expected no kick but got: {calls:?}");
    }

    fn set_branch_sha(&self, name: &str, sha: &str) {
        if let Some(branch) = self
            .branches
            .lock()
            .unwrap()
            .iter_mut()
            .find(|b| b.name == name)
        {
            branch.sha = sha.to_string();
        }
    }
}

#[async_trait]
impl PlatformService for MockPlatformService {
    async fn list_branches(&self) -> Result<Vec<String>> {
        self.list_branches_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(msg) = self.error_on_list_branches.lock().unwrap().as_ref() {
            return Err(Error::Platform(msg.clone()));
        }
        Ok(self
            .branches
            .lock()
            .unwrap()
            .iter()
            .map(|b| b.name.clone())
            .collect())
    }

    async fn get_branch(&self, name: &str) -> Result<Option<Branch>> {
        Ok(self
            .branches
            .lock()
            .unwrap()
            .iter()
            .find(|b| b.name == name)
            .cloned())
    }

    async fn create_branch(&self, name: &str, sha: &str) -> Result<()> {
        self.create_branch_calls
            .lock()
            .unwrap()
            .push(name.to_string());

        if let Some(msg) = self.error_on_create_branch.lock().unwrap().get(name) {
            return Err(Error::GitHubApi(msg.clone()));
        }
        if self.has_branch(name) {
            return Err(Error::BranchExists(name.to_string()));
        }
        self.add_branch(name, sha);
        Ok(())
    }

    async fn merge_branches(&self, base: &str, head: &str) -> Result<MergeOutcome> {
        self.merge_calls.lock().unwrap().push(MergeCall {
            base: base.to_string(),
            head: head.to_string(),
        });

        let key = (base.to_string(), head.to_string());
        if let Some(msg) = self.error_on_merge.lock().unwrap().get(&key) {
            return Err(Error::GitHubApi(msg.clone()));
        }
        if let Some(outcome) = self.merge_responses.lock().unwrap().get(&key) {
            return Ok(outcome.clone());
        }

        let (Some(base_sha), Some(head_sha)) = (self.branch_sha(base), self.branch_sha(head))
        else {
            return Ok(MergeOutcome::Conflict {
                message: "Base or head does not exist (404)".to_string(),
            });
        };

        let mut contained = self.contained.lock().unwrap();
        if base_sha == head_sha || contained.contains(&(base.to_string(), head_sha.clone())) {
            return Ok(MergeOutcome::UpToDate);
        }

        let n = self.next_commit.fetch_add(1, Ordering::SeqCst);
        let sha = format!("merge-commit-{n}");
        contained.insert((base.to_string(), head_sha));
        contained.insert((base.to_string(), base_sha));
        drop(contained);
        self.set_branch_sha(base, &sha);
        Ok(MergeOutcome::Merged { sha })
    }

    async fn list_open_prs(&self, head: &str, base: &str) -> Result<Vec<PullRequest>> {
        self.list_pr_calls
            .lock()
            .unwrap()
            .push((head.to_string(), base.to_string()));

        // Filters on base only, like a loose platform-side head filter.
        Ok(self
            .prs
            .lock()
            .unwrap()
            .iter()
            .filter(|pr| pr.base_ref == base)
            .cloned()
            .collect())
    }

    async fn create_pr(
        &self,
        head: &str,
        base: &str,
        title: &str,
        body: &str,
    ) -> Result<PullRequest> {
        self.create_pr_calls.lock().unwrap().push(CreatePrCall {
            head: head.to_string(),
            base: base.to_string(),
            title: title.to_string(),
            body: body.to_string(),
        });

        if let Some(msg) = self.error_on_create_pr.lock().unwrap().as_ref() {
            return Err(Error::GitHubApi(msg.clone()));
        }

        let number = self.next_pr_number.fetch_add(1, Ordering::SeqCst);
        let head_ref = self
            .head_aliases
            .lock()
            .unwrap()
            .get(head)
            .cloned()
            .unwrap_or_else(|| head.to_string());
        let pr = PullRequest {
            number,
            html_url: format!("https://github.com/acme/widgets/pull/{number}"),
            base_ref: base.to_string(),
            head_ref,
            title: title.to_string(),
            labels: Vec::new(),
        };
        self.prs.lock().unwrap().push(pr.clone());
        Ok(pr)
    }

    async fn update_pr_state(&self, pr_number: u64, state: PrState) -> Result<()> {
        self.state_calls
            .lock()
            .unwrap()
            .push(StateCall { pr_number, state });

        if let Some(msg) = self.error_on_update_state.lock().unwrap().as_ref() {
            return Err(Error::GitHubApi(msg.clone()));
        }
        Ok(())
    }

    async fn create_comment(&self, pr_number: u64, body: &str) -> Result<()> {
        self.comment_calls.lock().unwrap().push(CreateCommentCall {
            pr_number,
            body: body.to_string(),
        });

        if let Some(msg) = self.error_on_comment.lock().unwrap().as_ref() {
            return Err(Error::GitHubApi(msg.clone()));
        }
        Ok(())
    }

    async fn add_label(&self, pr_number: u64, label: &str) -> Result<()> {
        self.add_label_calls.lock().unwrap().push(LabelCall {
            pr_number,
            label: label.to_string(),
        });

        if let Some(msg) = self.error_on_labels.lock().unwrap().as_ref() {
            return Err(Error::GitHubApi(msg.clone()));
        }
        if let Some(pr) = self
            .prs
            .lock()
            .unwrap()
            .iter_mut()
            .find(|pr| pr.number == pr_number)
        {
            pr.labels.push(label.to_string());
        }
        Ok(())
    }

    async fn remove_label(&self, pr_number: u64, label: &str) -> Result<()> {
        self.remove_label_calls.lock().unwrap().push(LabelCall {
            pr_number,
            label: label.to_string(),
        });

        if let Some(msg) = self.error_on_labels.lock().unwrap().as_ref() {
            return Err(Error::GitHubApi(msg.clone()));
        }
        if let Some(pr) = self
            .prs
            .lock()
            .unwrap()
            .iter_mut()
            .find(|pr| pr.number == pr_number)
        {
            pr.labels.retain(|l| l != label);
        }
        Ok(())
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }
}
