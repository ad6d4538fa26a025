//! Intermediate `merge/<source>_to_<target>` branches
//!
//! The intermediate branch is the PR head when direct head/base currency
//! is required. It is created from the source tip and then has both sides
//! merged into it on every relevant push.

use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::types::MergeOutcome;
use tracing::{debug, info};

const INTERMEDIATE_PREFIX: &str = "merge/";

/// Make a branch name usable as one component of an intermediate name
pub fn sanitize_branch(name: &str) -> String {
    name.replace('/', "-")
}

/// Deterministic intermediate branch name for a source/target pair
///
/// `release/1.0` into `main` becomes `merge/release-1.0_to_main`.
pub fn intermediate_branch_name(source: &str, target: &str) -> String {
    format!(
        "{INTERMEDIATE_PREFIX}{}_to_{}",
        sanitize_branch(source),
        sanitize_branch(target)
    )
}

/// Make sure `name` exists, creating it at `fallback_sha` if absent
///
/// Returns whether the branch was created by this call. A concurrent
/// creation that wins the race counts as "already existed".
pub async fn ensure_branch(
    platform: &dyn PlatformService,
    name: &str,
    fallback_sha: &str,
) -> Result<bool> {
    if platform.get_branch(name).await?.is_some() {
        debug!(branch = name, "intermediate branch exists");
        return Ok(false);
    }

    match platform.create_branch(name, fallback_sha).await {
        Ok(()) => {
            info!(branch = name, sha = fallback_sha, "created intermediate branch");
            Ok(true)
        }
        Err(Error::BranchExists(_)) => {
            debug!(branch = name, "intermediate branch appeared concurrently");
            Ok(false)
        }
        Err(e) => Err(Error::BranchCreation {
            name: name.to_string(),
            message: e.to_string(),
        }),
    }
}

/// Merge `head` into `base` on the remote
///
/// `Ok(true)` means a merge commit was created and the PR may need a kick;
/// `Ok(false)` means `base` already contained `head`. Every other outcome,
/// including transport errors, is a [`Error::MergeConflict`].
pub async fn merge_into(platform: &dyn PlatformService, base: &str, head: &str) -> Result<bool> {
    let outcome = platform
        .merge_branches(base, head)
        .await
        .map_err(|e| Error::MergeConflict {
            base: base.to_string(),
            head: head.to_string(),
            message: e.to_string(),
        })?;

    match outcome {
        MergeOutcome::Merged { sha } => {
            info!(base, head, sha = %sha, "merged");
            Ok(true)
        }
        MergeOutcome::UpToDate => {
            debug!(base, head, "already up to date");
            Ok(false)
        }
        MergeOutcome::Conflict { message } => Err(Error::MergeConflict {
            base: base.to_string(),
            head: head.to_string(),
            message,
        }),
    }
}
