//! Background lead refresh poller.
//!
//! One fetch cycle per interval, or sooner when `AppState::request_refresh`
//! fires. Failures are logged and left for the next cycle; nothing is retried
//! inside a cycle.

use std::sync::Arc;
use std::time::Duration;

use crate::state::AppState;

pub async fn run_leads_poller(state: Arc<AppState>) {
    loop {
        let poll_interval = state.config.read().poll_interval_secs.max(1);

        log::info!("Leads poller: starting sync");
        match state.refresh().await {
            Ok(snapshot) => {
                if snapshot.truncated {
                    log::warn!(
                        "Leads poller: synced {} leads but hit the safety limit; data may be incomplete",
                        snapshot.total()
                    );
                } else {
                    log::info!("Leads poller: synced {} leads", snapshot.total());
                }
            }
            Err(e) if e.is_retryable() => {
                log::warn!("Leads poller: fetch failed, will retry next cycle: {}", e)
            }
            Err(e) => log::warn!("Leads poller: fetch failed: {} ({})", e, e.recovery_suggestion()),
        }

        // Sleep until next poll or manual wake
        tokio::select! {
            _ = tokio::time::sleep(Duration::from_secs(poll_interval)) => {},
            _ = state.poller_wake.notified() => {
                log::info!("Leads poller: woken by manual refresh");
            },
        }
    }
}
