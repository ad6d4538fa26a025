//! Per-pair reconciliation for pushes to source and target branches

use crate::config::PushContext;
use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::sync::conflicts::{ConflictSummary, SyncPair, report_conflicts};
use crate::sync::intermediate::{ensure_branch, intermediate_branch_name, merge_into};
use crate::sync::kick::kick;
use crate::template::TemplateContext;
use crate::types::{PrUpdate, PullRequest};
use tracing::{debug, info, warn};

/// Reconciles one source/target pair at a time
///
/// `inspector` reads state, merges and reports conflicts; `creator` opens
/// and kicks PRs. Both may wrap the same credential.
pub struct Reconciler<'a> {
    ctx: &'a PushContext,
    inspector: &'a dyn PlatformService,
    creator: &'a dyn PlatformService,
}

impl<'a> Reconciler<'a> {
    /// Create a reconciler for one run
    pub const fn new(
        ctx: &'a PushContext,
        inspector: &'a dyn PlatformService,
        creator: &'a dyn PlatformService,
    ) -> Self {
        Self {
            ctx,
            inspector,
            creator,
        }
    }

    /// PR head used for the pushed source branch and `target`
    pub fn head_for_target(&self, target: &str) -> String {
        if self.ctx.use_intermediate_branch {
            intermediate_branch_name(&self.ctx.pushed_branch, target)
        } else {
            self.ctx.pushed_branch.clone()
        }
    }

    /// The pushed branch is a source: create or refresh its PR into `target`
    ///
    /// Returns an update when a PR was created or kicked.
    pub async fn sync_from_source(&self, target: &str) -> Result<Option<PrUpdate>> {
        let ctx = self.ctx;
        let source = ctx.pushed_branch.as_str();

        if self.inspector.get_branch(target).await?.is_none() {
            return Err(Error::BranchNotFound(target.to_string()));
        }

        let head = self.head_for_target(target);
        let mut summary = ConflictSummary::clean();
        let mut needs_kick = false;

        if ctx.use_intermediate_branch {
            let tip = self
                .inspector
                .get_branch(source)
                .await?
                .ok_or_else(|| Error::BranchNotFound(source.to_string()))?;
            ensure_branch(self.inspector, &head, &tip.sha).await?;

            // Both sides are always attempted so each gets its own verdict.
            let from_source = self.try_merge(&head, source).await;
            let from_target = self.try_merge(&head, target).await;
            summary.source_conflict = Some(from_source.is_none());
            summary.target_conflict = Some(from_target.is_none());
            needs_kick = from_source == Some(true) || from_target == Some(true);
        }

        let pair = SyncPair {
            source,
            target,
            head: &head,
        };

        if let Some(pr) = self.find_open_pr(&head, target).await? {
            debug!(pr_number = pr.number, head = %head, base = target, "found existing PR");
            report_conflicts(self.inspector, &pr, summary, &ctx.labels, pair).await;
            return self.kick_if_needed(&pr, needs_kick, source, target).await;
        }

        let rendered = ctx.templates.render(&TemplateContext {
            source_pattern: ctx.source_pattern.as_str(),
            original_source: source,
            source: &head,
            target,
            use_intermediate_branch: ctx.use_intermediate_branch,
        })?;
        let pr = self
            .creator
            .create_pr(&head, target, &rendered.title, &rendered.body)
            .await?;
        info!(pr_number = pr.number, head = %pr.head_ref, base = %pr.base_ref, url = %pr.html_url, "created PR");

        report_conflicts(self.inspector, &pr, summary, &ctx.labels, pair).await;
        Ok(Some(PrUpdate::from_pr(source, target, &pr)))
    }

    /// The pushed branch is a target: refresh the intermediate branch of
    /// the existing PR from `source`
    ///
    /// Never creates PRs; without intermediate branches there is nothing
    /// to keep current from this side.
    pub async fn sync_from_target(&self, source: &str) -> Result<Option<PrUpdate>> {
        let ctx = self.ctx;
        if !ctx.use_intermediate_branch {
            return Ok(None);
        }

        let target = ctx.pushed_branch.as_str();
        let head = intermediate_branch_name(source, target);

        let Some(pr) = self.find_open_pr(&head, target).await? else {
            debug!(head = %head, base = target, "no open PR to refresh");
            return Ok(None);
        };

        let merged = self.try_merge(&head, target).await;
        let summary = ConflictSummary {
            source_conflict: None,
            target_conflict: Some(merged.is_none()),
        };
        let pair = SyncPair {
            source,
            target,
            head: &head,
        };
        report_conflicts(self.inspector, &pr, summary, &ctx.labels, pair).await;

        self.kick_if_needed(&pr, merged == Some(true), source, target)
            .await
    }

    /// Find the open PR for exactly this head and base
    ///
    /// More than one match is an anomaly: it is logged and the first
    /// returned PR is used.
    pub async fn find_open_pr(&self, head: &str, base: &str) -> Result<Option<PullRequest>> {
        let matching: Vec<PullRequest> = self
            .inspector
            .list_open_prs(head, base)
            .await?
            .into_iter()
            .filter(|pr| pr.head_ref == head && pr.base_ref == base)
            .collect();

        if matching.len() > 1 {
            let numbers: Vec<u64> = matching.iter().map(|pr| pr.number).collect();
            warn!(
                head,
                base,
                prs = ?numbers,
                "multiple open PRs for the same head and base, using the first"
            );
        }

        Ok(matching.into_iter().next())
    }

    /// Merge `head` into `base`; `None` records a conflict
    async fn try_merge(&self, base: &str, head: &str) -> Option<bool> {
        match merge_into(self.inspector, base, head).await {
            Ok(merged) => Some(merged),
            Err(e) => {
                warn!(base, head, error = %e, "merge failed, recording conflict");
                None
            }
        }
    }

    async fn kick_if_needed(
        &self,
        pr: &PullRequest,
        needs_kick: bool,
        source: &str,
        target: &str,
    ) -> Result<Option<PrUpdate>> {
        if !needs_kick {
            return Ok(None);
        }
        if !self.ctx.can_kick() {
            debug!(
                pr_number = pr.number,
                "PR has new commits but only one credential is configured, not kicking"
            );
            return Ok(None);
        }

        kick(self.creator, pr.number, self.ctx.kick_delay).await?;
        Ok(Some(PrUpdate::from_pr(source, target, pr)))
    }
}
