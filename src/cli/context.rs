//! Shared command context
//!
//! Builds the API clients for a validated push context.

use branch_sync::config::PushContext;
use branch_sync::error::Result;
use branch_sync::platform::{GitHubService, PlatformService};

/// Push context plus the clients for both credentials
///
/// When both credentials are the same token only one client is built.
pub struct CommandContext {
    /// Validated run context
    pub push: PushContext,
    inspector: GitHubService,
    creator: Option<GitHubService>,
}

impl CommandContext {
    /// Create the API clients for `push`
    pub fn new(push: PushContext) -> Result<Self> {
        let inspector = GitHubService::new(
            &push.token,
            push.owner.clone(),
            push.repo.clone(),
            push.api_url.clone(),
        )?;
        let creator = if push.can_kick() {
            Some(GitHubService::new(
                &push.pr_create_token,
                push.owner.clone(),
                push.repo.clone(),
                push.api_url.clone(),
            )?)
        } else {
            None
        };

        Ok(Self {
            push,
            inspector,
            creator,
        })
    }

    /// Client for inspection, merges and conflict reporting
    pub fn inspector(&self) -> &dyn PlatformService {
        &self.inspector
    }

    /// Client for creating and kicking PRs
    pub fn creator(&self) -> &dyn PlatformService {
        self.creator.as_ref().unwrap_or(&self.inspector)
    }
}
