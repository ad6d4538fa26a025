//! Close/reopen cycle that re-fires PR automation

use crate::error::Result;
use crate::platform::PlatformService;
use crate::types::PrState;
use std::time::Duration;
use tracing::info;

/// Close the PR, wait `delay`, then reopen it
///
/// Must be called with the PR-creation service: events caused by the
/// default workflow token do not trigger further workflows, so the state
/// change has to come from the other identity. Errors propagate.
pub async fn kick(platform: &dyn PlatformService, pr_number: u64, delay: Duration) -> Result<()> {
    info!(pr_number, "kicking PR to re-trigger checks");
    platform.update_pr_state(pr_number, PrState::Closed).await?;
    tokio::time::sleep(delay).await;
    platform.update_pr_state(pr_number, PrState::Open).await?;
    Ok(())
}
