use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tokio::sync::Notify;

use crate::error::{SyncError, SyncErrorPayload};
use crate::nocodb::client::RecordSource;
use crate::nocodb::NocoConfig;
use crate::snapshot::{get_leads_snapshot, snapshot_from_source, LeadsSnapshot};

/// Shared state between the poller and whatever renders the leads.
///
/// Holds the last snapshot that fetched successfully. A failed cycle records
/// its error but leaves the previous snapshot in place, so the view never
/// blanks on a transient upstream failure.
pub struct AppState {
    pub config: RwLock<NocoConfig>,
    snapshot: RwLock<Option<Arc<LeadsSnapshot>>>,
    last_error: RwLock<Option<SyncErrorPayload>>,
    last_attempt: RwLock<Option<DateTime<Utc>>>,
    /// Wakes the poller for an immediate refresh.
    pub poller_wake: Notify,
}

impl AppState {
    pub fn new(config: NocoConfig) -> Self {
        Self {
            config: RwLock::new(config),
            snapshot: RwLock::new(None),
            last_error: RwLock::new(None),
            last_attempt: RwLock::new(None),
            poller_wake: Notify::new(),
        }
    }

    /// Last successfully fetched snapshot, if any.
    pub fn snapshot(&self) -> Option<Arc<LeadsSnapshot>> {
        self.snapshot.read().clone()
    }

    /// Error from the most recent cycle; cleared by the next success.
    pub fn last_error(&self) -> Option<SyncErrorPayload> {
        self.last_error.read().clone()
    }

    pub fn last_attempt(&self) -> Option<DateTime<Utc>> {
        *self.last_attempt.read()
    }

    /// Ask the poller to refresh now instead of waiting for the interval.
    pub fn request_refresh(&self) {
        self.poller_wake.notify_one();
    }

    /// Run one fetch cycle against the configured NocoDB table.
    pub async fn refresh(&self) -> Result<Arc<LeadsSnapshot>, SyncError> {
        let config = self.config.read().clone();
        let now = Utc::now();
        let result = get_leads_snapshot(&config, now).await;
        self.apply(result, now)
    }

    /// Run one fetch cycle against an arbitrary source.
    pub async fn refresh_from(
        &self,
        source: &dyn RecordSource,
        page_size: usize,
    ) -> Result<Arc<LeadsSnapshot>, SyncError> {
        let now = Utc::now();
        let result = snapshot_from_source(source, page_size, now).await;
        self.apply(result, now)
    }

    /// Whichever cycle completes last wins.
    fn apply(
        &self,
        result: Result<LeadsSnapshot, SyncError>,
        attempted_at: DateTime<Utc>,
    ) -> Result<Arc<LeadsSnapshot>, SyncError> {
        *self.last_attempt.write() = Some(attempted_at);
        match result {
            Ok(snapshot) => {
                let snapshot = Arc::new(snapshot);
                *self.snapshot.write() = Some(snapshot.clone());
                *self.last_error.write() = None;
                Ok(snapshot)
            }
            Err(e) => {
                *self.last_error.write() = Some(SyncErrorPayload::from(&e));
                Err(e)
            }
        }
    }
}
