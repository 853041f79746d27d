//! Fast-Layer Sweep Task
//!
//! Background task that periodically purges expired fast-layer entries, so
//! memory is not held by dead entries between reads. The durable store
//! expires its own keys natively and needs no sweeping.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::FastCache;

/// Spawns a background task that periodically purges expired entries from
/// the fast layer.
///
/// # Arguments
/// * `fast` - Handle to the fast layer
/// * `interval_secs` - Interval in seconds between sweep runs
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
pub fn spawn_cleanup_task(fast: FastCache, interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(interval_secs);

    tokio::spawn(async move {
        info!(
            "starting fast-layer sweep task with interval of {} seconds",
            interval_secs
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = fast.purge_expired();
            if removed > 0 {
                info!("fast-layer sweep removed {} expired entries", removed);
            } else {
                debug!("fast-layer sweep found no expired entries");
            }
        }
    })
}
