//! Run configuration and the immutable push context

use crate::error::{Error, Result};
use crate::event::PushEvent;
use crate::sync::BranchPattern;
use crate::template::{DEFAULT_BODY_TEMPLATE, DEFAULT_TITLE_TEMPLATE, PrTemplates};
use std::time::Duration;

/// Default REST endpoint
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Pause between closing and reopening a PR when kicking it
pub const KICK_DELAY: Duration = Duration::from_secs(5);

/// Only push events are handled
pub const PUSH_EVENT: &str = "push";

/// An API token
///
/// Equality compares the token value, so two handles built from the same
/// secret are the same credential. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a token
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, for building API clients
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Every recognized option, before validation
///
/// `None` and empty strings both mean "not set".
#[derive(Debug, Clone, Default)]
pub struct SyncConfig {
    /// Name of the triggering event; must be `push` when present
    pub event_name: Option<String>,
    /// Inspection/merge credential (required)
    pub github_token: Option<String>,
    /// PR creation/kick credential; falls back to `github_token`
    pub pr_create_token: Option<String>,
    /// Route PRs through a `merge/<source>_to_<target>` branch (required)
    pub use_intermediate_branch: Option<bool>,
    /// Glob for source branches (required)
    pub source_pattern: Option<String>,
    /// Glob for target branches (required)
    pub target_pattern: Option<String>,
    /// PR title template; defaults to [`DEFAULT_TITLE_TEMPLATE`]
    pub pr_title: Option<String>,
    /// PR body template; defaults to [`DEFAULT_BODY_TEMPLATE`]
    pub pr_body: Option<String>,
    /// Label applied while the source side conflicts; unset disables
    pub source_conflict_label: Option<String>,
    /// Label applied while the target side conflicts; unset disables
    pub target_conflict_label: Option<String>,
    /// REST API base URL; defaults to [`DEFAULT_API_URL`]
    pub api_url: Option<String>,
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}

fn required(value: Option<&String>, name: &str) -> Result<String> {
    non_empty(value).ok_or_else(|| Error::Config(format!("{name} is required")))
}

impl SyncConfig {
    /// Validate every option and bind it to the push event
    ///
    /// Nothing here talks to the network; a bad config or event fails
    /// before any API call.
    pub fn into_context(self, event: &PushEvent) -> Result<PushContext> {
        if let Some(name) = non_empty(self.event_name.as_ref())
            && name != PUSH_EVENT
        {
            return Err(Error::EventParse(format!(
                "unsupported event '{name}', only '{PUSH_EVENT}' is handled"
            )));
        }

        let pushed_branch = event.branch_name()?.to_string();

        let token = Credential::new(required(self.github_token.as_ref(), "GITHUB_TOKEN")?);
        let pr_create_token = non_empty(self.pr_create_token.as_ref())
            .map_or_else(|| token.clone(), Credential::new);

        let use_intermediate_branch = self
            .use_intermediate_branch
            .ok_or_else(|| Error::Config("use_intermediate_branch is required".to_string()))?;

        let source_pattern =
            BranchPattern::parse(&required(self.source_pattern.as_ref(), "source_pattern")?)?;
        let target_pattern =
            BranchPattern::parse(&required(self.target_pattern.as_ref(), "target_pattern")?)?;

        let title = self
            .pr_title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TITLE_TEMPLATE.to_string());
        let body = self
            .pr_body
            .filter(|b| !b.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BODY_TEMPLATE.to_string());
        let templates = PrTemplates::new(&title, &body)?;

        let api_url = non_empty(self.api_url.as_ref())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(PushContext {
            owner: event.repository.owner.login.clone(),
            repo: event.repository.name.clone(),
            pushed_branch,
            source_pattern,
            target_pattern,
            use_intermediate_branch,
            templates,
            labels: ConflictLabels {
                source: non_empty(self.source_conflict_label.as_ref()),
                target: non_empty(self.target_conflict_label.as_ref()),
            },
            token,
            pr_create_token,
            api_url,
            kick_delay: KICK_DELAY,
        })
    }
}

/// Label names used to flag conflicts; `None` disables that label
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConflictLabels {
    /// Label for conflicts merging the source branch
    pub source: Option<String>,
    /// Label for conflicts merging the target branch
    pub target: Option<String>,
}

/// Everything a run needs, derived once from config and event
#[derive(Debug, Clone)]
pub struct PushContext {
    /// Repository owner
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Short name of the pushed branch
    pub pushed_branch: String,
    /// Source branch pattern
    pub source_pattern: BranchPattern,
    /// Target branch pattern
    pub target_pattern: BranchPattern,
    /// Whether PRs go through an intermediate branch
    pub use_intermediate_branch: bool,
    /// Compiled PR title/body templates
    pub templates: PrTemplates,
    /// Conflict label names
    pub labels: ConflictLabels,
    /// Inspection/merge credential
    pub token: Credential,
    /// PR creation/kick credential
    pub pr_create_token: Credential,
    /// REST API base URL
    pub api_url: String,
    /// Pause between closing and reopening a kicked PR
    pub kick_delay: Duration,
}

impl PushContext {
    /// Whether a close/reopen cycle can re-trigger automation
    ///
    /// Only true when PRs are created with a different identity than the
    /// one inspecting and merging.
    pub fn can_kick(&self) -> bool {
        self.token != self.pr_create_token
    }
}
