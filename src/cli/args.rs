//! Command-line and environment options

use branch_sync::config::SyncConfig;
use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Keep pull requests between source and target branches in sync
///
/// Every option can also be supplied through the environment of a
/// workflow run (`INPUT_*`, `GITHUB_*`).
#[derive(Debug, Parser)]
#[command(name = "branch-sync", version, about, long_about = None)]
pub struct Args {
    /// Glob matching source branches, e.g. `release/*`
    #[arg(long, env = "INPUT_SOURCE_PATTERN")]
    pub source_pattern: Option<String>,

    /// Glob matching target branches, e.g. `main`
    #[arg(long, env = "INPUT_TARGET_PATTERN")]
    pub target_pattern: Option<String>,

    /// Open PRs from a `merge/<source>_to_<target>` branch kept current from both sides
    #[arg(
        long,
        env = "INPUT_USE_INTERMEDIATE_BRANCH",
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new()
    )]
    pub use_intermediate_branch: Option<bool>,

    /// PR title template
    #[arg(long, env = "INPUT_PR_TITLE")]
    pub pr_title: Option<String>,

    /// PR body template
    #[arg(long, env = "INPUT_PR_BODY")]
    pub pr_body: Option<String>,

    /// Label applied while the source branch cannot be merged
    #[arg(long, env = "INPUT_SOURCE_CONFLICT_LABEL")]
    pub source_conflict_label: Option<String>,

    /// Label applied while the target branch cannot be merged
    #[arg(long, env = "INPUT_TARGET_CONFLICT_LABEL")]
    pub target_conflict_label: Option<String>,

    /// Token used to inspect branches, merge and report conflicts
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Token used to create and kick PRs (defaults to the GitHub token)
    #[arg(long, env = "PR_CREATE_TOKEN", hide_env_values = true)]
    pub pr_create_token: Option<String>,

    /// Name of the triggering event
    #[arg(long, env = "GITHUB_EVENT_NAME")]
    pub event_name: Option<String>,

    /// Path to the push event payload
    #[arg(long, env = "GITHUB_EVENT_PATH")]
    pub event_path: Option<PathBuf>,

    /// File to append outputs to (stdout when unset)
    #[arg(long, env = "GITHUB_OUTPUT")]
    pub output: Option<PathBuf>,

    /// REST API base URL
    #[arg(long, env = "GITHUB_API_URL")]
    pub api_url: Option<String>,
}

impl Args {
    /// Split into the library configuration and the runner file paths
    pub fn into_parts(self) -> (SyncConfig, Option<PathBuf>, Option<PathBuf>) {
        let config = SyncConfig {
            event_name: self.event_name,
            github_token: self.github_token,
            pr_create_token: self.pr_create_token,
            use_intermediate_branch: self.use_intermediate_branch,
            source_pattern: self.source_pattern,
            target_pattern: self.target_pattern,
            pr_title: self.pr_title,
            pr_body: self.pr_body,
            source_conflict_label: self.source_conflict_label,
            target_conflict_label: self.target_conflict_label,
            api_url: self.api_url,
        };
        (config, self.event_path, self.output)
    }
}
