use std::time::Duration;

use tracing::{error, info};

use crate::services::refresh_service::RefreshService;

/// Drives the fetch-upsert-query cycle forever: once immediately at startup,
/// then once per interval, with a longer cooldown after a failed cycle.
pub struct RefreshScheduler {
    service: RefreshService,
    interval: Duration,
    error_backoff: Duration,
}

impl RefreshScheduler {
    pub fn new(service: RefreshService, interval: Duration, error_backoff: Duration) -> Self {
        Self {
            service,
            interval,
            error_backoff,
        }
    }

    /// Runs until the process is killed. No cycle error escapes this loop;
    /// record-level problems are already absorbed inside the cycle, and
    /// anything that does cross the cycle boundary only triggers the backoff.
    pub async fn start(self) {
        info!(
            "starting refresh scheduler (interval: {:?}, error backoff: {:?})",
            self.interval, self.error_backoff
        );

        loop {
            match self.service.refresh_once().await {
                Ok(stats) => {
                    info!(
                        "scheduled refresh done: fetched {}, available {}",
                        stats.fetched, stats.available
                    );
                }
                Err(e) => {
                    error!("refresh cycle failed: {e}");
                    tokio::time::sleep(self.error_backoff).await;
                    continue;
                }
            }

            tokio::time::sleep(self.interval).await;
        }
    }
}
