//! Sync command - reconcile PRs for the current push

use crate::cli::args::Args;
use crate::cli::context::CommandContext;
use anyhow::Context;
use branch_sync::event::PushEvent;
use branch_sync::output::{output_line, write_github_output};
use branch_sync::sync::run_sync;
use branch_sync::types::PrUpdate;
use std::path::Path;
use tracing::{info, warn};

fn emit(output: Option<&Path>, updates: &[PrUpdate]) -> anyhow::Result<()> {
    match output {
        Some(path) => write_github_output(path, updates)
            .with_context(|| format!("failed to write outputs to {}", path.display())),
        None => {
            println!("{}", output_line(updates)?);
            Ok(())
        }
    }
}

/// Run the sync
///
/// Returns `Ok(false)` when at least one pair failed; the updates that did
/// succeed are emitted either way.
pub async fn run_sync_command(args: Args) -> anyhow::Result<bool> {
    let (config, event_path, output) = args.into_parts();

    let event_path = event_path.context("GITHUB_EVENT_PATH is not set")?;
    let event = PushEvent::load(&event_path)?;
    let push = config.into_context(&event)?;

    if event.deleted {
        info!(branch = %push.pushed_branch, "branch was deleted, nothing to sync");
        emit(output.as_deref(), &[])?;
        return Ok(true);
    }

    info!(
        repo = %format!("{}/{}", push.owner, push.repo),
        branch = %push.pushed_branch,
        after = %event.after,
        source_pattern = %push.source_pattern,
        target_pattern = %push.target_pattern,
        intermediate = push.use_intermediate_branch,
        "syncing"
    );

    let ctx = CommandContext::new(push)?;
    let report = run_sync(&ctx.push, ctx.inspector(), ctx.creator()).await?;

    emit(output.as_deref(), &report.updates)?;

    for failure in &report.failures {
        warn!(
            source = %failure.source,
            target = %failure.target,
            "failed: {}",
            failure.message
        );
    }
    Ok(report.is_success())
}
