//! Conflict reporting on PRs
//!
//! Two phases, mirroring the rest of the engine:
//! - [`plan_conflict_actions`] decides which labels to add/remove and which
//!   notes to post (pure)
//! - [`report_conflicts`] applies them best-effort (effectful, never fails)

use crate::config::ConflictLabels;
use crate::platform::PlatformService;
use crate::types::PullRequest;
use tracing::{info, warn};

/// Outcome of this pass's merge attempts
///
/// Each side is `Some(true)` when its merge failed, `Some(false)` when it
/// merged cleanly or was already up to date, and `None` when it was not
/// attempted. Labels for unattempted sides are left untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConflictSummary {
    /// Merging the source branch into the PR head failed
    pub source_conflict: Option<bool>,
    /// Merging the target branch into the PR head failed
    pub target_conflict: Option<bool>,
}

impl ConflictSummary {
    /// Both sides checked, neither conflicted
    pub const fn clean() -> Self {
        Self {
            source_conflict: Some(false),
            target_conflict: Some(false),
        }
    }

    /// Whether either side conflicted
    pub const fn has_conflict(&self) -> bool {
        matches!(self.source_conflict, Some(true)) || matches!(self.target_conflict, Some(true))
    }
}

/// Branch names for one reconciled pair
#[derive(Debug, Clone, Copy)]
pub struct SyncPair<'a> {
    /// Source branch
    pub source: &'a str,
    /// Target branch
    pub target: &'a str,
    /// PR head (intermediate branch or the source itself)
    pub head: &'a str,
}

/// Side effects needed to make the PR reflect a [`ConflictSummary`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConflictActions {
    /// Labels missing from the PR
    pub add_labels: Vec<String>,
    /// Labels present on the PR that no longer apply
    pub remove_labels: Vec<String>,
    /// Human-readable conflict notes for the comment
    pub notes: Vec<String>,
}

impl ConflictActions {
    /// Markdown comment listing every note, or `None` when there are none
    pub fn comment_body(&self) -> Option<String> {
        if self.notes.is_empty() {
            return None;
        }
        let items: Vec<String> = self.notes.iter().map(|n| format!("- {n}")).collect();
        Some(format!(
            "Automatic branch sync hit merge conflicts:\n\n{}",
            items.join("\n")
        ))
    }
}

fn plan_side(
    actions: &mut ConflictActions,
    pr: &PullRequest,
    conflicted: Option<bool>,
    label: Option<&str>,
    note: impl FnOnce() -> String,
) {
    let Some(conflicted) = conflicted else {
        return;
    };

    if conflicted {
        actions.notes.push(note());
    }

    let Some(label) = label else {
        return;
    };
    let present = pr.has_label(label);
    if conflicted && !present {
        actions.add_labels.push(label.to_string());
    } else if !conflicted && present {
        actions.remove_labels.push(label.to_string());
    }
}

/// Decide the label/comment changes for a PR (PURE)
pub fn plan_conflict_actions(
    pr: &PullRequest,
    summary: ConflictSummary,
    labels: &ConflictLabels,
    pair: SyncPair<'_>,
) -> ConflictActions {
    let mut actions = ConflictActions::default();

    plan_side(
        &mut actions,
        pr,
        summary.source_conflict,
        labels.source.as_deref(),
        || {
            format!(
                "`{}` could not be merged into `{}`. Merge it manually and resolve the conflicts.",
                pair.source, pair.head
            )
        },
    );
    plan_side(
        &mut actions,
        pr,
        summary.target_conflict,
        labels.target.as_deref(),
        || {
            format!(
                "`{}` could not be merged into `{}`. Merge it manually and resolve the conflicts.",
                pair.target, pair.head
            )
        },
    );

    actions
}

/// Apply conflict labels and comment to a PR (EFFECTFUL, best-effort)
///
/// Every failure is logged as a warning and otherwise ignored.
pub async fn report_conflicts(
    platform: &dyn PlatformService,
    pr: &PullRequest,
    summary: ConflictSummary,
    labels: &ConflictLabels,
    pair: SyncPair<'_>,
) {
    let actions = plan_conflict_actions(pr, summary, labels, pair);

    for label in &actions.add_labels {
        if let Err(e) = platform.add_label(pr.number, label).await {
            warn!(pr_number = pr.number, label = %label, error = %e, "failed to add conflict label");
        }
    }
    for label in &actions.remove_labels {
        if let Err(e) = platform.remove_label(pr.number, label).await {
            warn!(pr_number = pr.number, label = %label, error = %e, "failed to remove conflict label");
        }
    }

    if let Some(body) = actions.comment_body() {
        info!(pr_number = pr.number, conflicts = actions.notes.len(), "reporting merge conflicts");
        if let Err(e) = platform.create_comment(pr.number, &body).await {
            warn!(pr_number = pr.number, error = %e, "failed to post conflict comment");
        }
    }
}
