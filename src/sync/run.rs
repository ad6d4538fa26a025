//! Run orchestration: match branches, reconcile each pair, collect results

use crate::config::PushContext;
use crate::error::Result;
use crate::platform::PlatformService;
use crate::sync::matcher::match_branches;
use crate::sync::reconcile::Reconciler;
use crate::types::PrUpdate;
use serde::Serialize;
use tracing::{debug, error, info};

/// A pair whose reconciliation failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncFailure {
    /// Source branch of the pair
    pub source: String,
    /// Target branch of the pair
    pub target: String,
    /// Error message
    pub message: String,
}

/// Result of a whole run
#[derive(Debug, Clone, Default)]
pub struct SyncReport {
    /// PRs created or kicked, in iteration order
    pub updates: Vec<PrUpdate>,
    /// Pairs that failed
    pub failures: Vec<SyncFailure>,
}

impl SyncReport {
    /// Whether every pair reconciled without error
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    fn record(&mut self, source: &str, target: &str, result: Result<Option<PrUpdate>>) {
        match result {
            Ok(Some(update)) => self.updates.push(update),
            Ok(None) => {}
            Err(e) => {
                error!(source, target, error = %e, "sync failed");
                self.failures.push(SyncFailure {
                    source: source.to_string(),
                    target: target.to_string(),
                    message: e.to_string(),
                });
            }
        }
    }
}

/// Reconcile every pair affected by the push
///
/// Only listing branches can fail the whole run; per-pair errors are
/// collected in the report and the remaining pairs still run.
pub async fn run_sync(
    ctx: &PushContext,
    inspector: &dyn PlatformService,
    creator: &dyn PlatformService,
) -> Result<SyncReport> {
    let pushed = ctx.pushed_branch.as_str();
    let branches = inspector.list_branches().await?;
    let reconciler = Reconciler::new(ctx, inspector, creator);
    let mut report = SyncReport::default();

    if ctx.source_pattern.matches(pushed) {
        let targets = match_branches(&branches, &ctx.target_pattern);
        info!(branch = pushed, targets = targets.len(), "push to source branch");
        for target in targets.iter().filter(|t| t.as_str() != pushed) {
            let result = reconciler.sync_from_source(target).await;
            report.record(pushed, target, result);
        }
    }

    if ctx.target_pattern.matches(pushed) {
        let sources = match_branches(&branches, &ctx.source_pattern);
        info!(branch = pushed, sources = sources.len(), "push to target branch");
        for source in sources.iter().filter(|s| s.as_str() != pushed) {
            let result = reconciler.sync_from_target(source).await;
            report.record(source, pushed, result);
        }
    }

    if !ctx.source_pattern.matches(pushed) && !ctx.target_pattern.matches(pushed) {
        debug!(branch = pushed, "pushed branch matches neither pattern");
    }

    info!(
        updated = report.updates.len(),
        failed = report.failures.len(),
        "sync finished"
    );
    Ok(report)
}
