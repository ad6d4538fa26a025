//! Branch/PR reconciliation engine
//!
//! One run reacts to one push:
//! 1. Match - pick the target (or source) branches paired with the push
//! 2. Reconcile - per pair, bring the intermediate branch and PR up to date
//! 3. Report - surface conflicts on the PR and collect the PRs that changed
//!
//! Each pair is reconciled independently; a failure on one pair never
//! stops the others.

mod conflicts;
mod intermediate;
mod kick;
mod matcher;
mod reconcile;
mod run;

pub use conflicts::{
    ConflictActions, ConflictSummary, SyncPair, plan_conflict_actions, report_conflicts,
};
pub use intermediate::{ensure_branch, intermediate_branch_name, merge_into, sanitize_branch};
pub use kick::kick;
pub use matcher::{BranchPattern, match_branches};
pub use reconcile::Reconciler;
pub use run::{SyncFailure, SyncReport, run_sync};
