//! One fetch cycle: NocoDB → normalized leads → derived views.
//!
//! The snapshot is all-or-nothing. A failed page aborts the cycle and the
//! caller keeps whatever it had before.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::SyncError;
use crate::metrics::{
    replies_over_time, sdr_performance, timeline_events, LeadAnalytics, RepliesOverTime,
    SdrPerformance, TimelineEvent, REPLIES_WINDOW_DAYS,
};
use crate::nocodb::client::{NocoClient, RecordSource};
use crate::nocodb::pager::fetch_all;
use crate::nocodb::NocoConfig;
use crate::normalize::normalize_all;
use crate::types::Lead;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadsSnapshot {
    pub leads: Vec<Lead>,
    pub timeline_events: Vec<TimelineEvent>,
    pub replies_over_time: Vec<RepliesOverTime>,
    pub sdr_performance: Vec<SdrPerformance>,
    pub analytics: LeadAnalytics,
    pub fetched_at: DateTime<Utc>,
    /// Pagination stopped at the safety ceiling; the lead list may be incomplete.
    pub truncated: bool,
}

impl LeadsSnapshot {
    pub fn total(&self) -> usize {
        self.leads.len()
    }
}

/// Compute every derived view over `leads`.
pub fn build_snapshot(leads: Vec<Lead>, fetched_at: DateTime<Utc>, truncated: bool) -> LeadsSnapshot {
    LeadsSnapshot {
        timeline_events: timeline_events(&leads),
        replies_over_time: replies_over_time(&leads, Some(REPLIES_WINDOW_DAYS)),
        sdr_performance: sdr_performance(&leads),
        analytics: LeadAnalytics::compute(&leads),
        leads,
        fetched_at,
        truncated,
    }
}

/// Fetch, normalize and aggregate everything from an arbitrary source.
pub async fn snapshot_from_source(
    source: &dyn RecordSource,
    page_size: usize,
    now: DateTime<Utc>,
) -> Result<LeadsSnapshot, SyncError> {
    let outcome = fetch_all(source, page_size).await?;
    let truncated = outcome.hit_safety_limit();
    let leads = normalize_all(&outcome.records, now);
    Ok(build_snapshot(leads, now, truncated))
}

/// Validate config, then run one full fetch cycle against NocoDB.
pub async fn get_leads_snapshot(
    config: &NocoConfig,
    now: DateTime<Utc>,
) -> Result<LeadsSnapshot, SyncError> {
    let settings = config.connection()?;
    let page_size = settings.page_size;
    let client = NocoClient::new(settings)?;
    snapshot_from_source(&client, page_size, now).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConfigError, UpstreamError};
    use crate::nocodb::pager::tests::FakeSource;
    use crate::types::LeadStatus;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_snapshot_from_source_normalizes_every_row() {
        let source = FakeSource::with_rows(45);
        let snapshot = snapshot_from_source(&source, 20, now()).await.unwrap();

        assert_eq!(snapshot.total(), 45);
        assert!(!snapshot.truncated);
        assert_eq!(snapshot.fetched_at, now());
        // Fake rows carry status "sent"
        assert!(snapshot.leads.iter().all(|l| l.status == LeadStatus::Contacted));
        assert_eq!(snapshot.timeline_events.len(), 20);
        assert_eq!(snapshot.sdr_performance.len(), 1);
        assert_eq!(snapshot.sdr_performance[0].outreach_count, 45);
        assert_eq!(snapshot.analytics.dashboard.emails_sent, 45);
        assert!(snapshot.replies_over_time.is_empty());
    }

    #[tokio::test]
    async fn test_snapshot_marks_truncation() {
        let source = FakeSource {
            endless: true,
            ..FakeSource::with_rows(0)
        };
        let snapshot = snapshot_from_source(&source, 500, now()).await.unwrap();
        assert!(snapshot.truncated);
        assert_eq!(snapshot.total(), 10_000);
    }

    #[tokio::test]
    async fn test_snapshot_upstream_failure_returns_no_leads() {
        let source = FakeSource {
            fail_on: Some((1, 503)),
            ..FakeSource::with_rows(50)
        };
        let err = snapshot_from_source(&source, 10, now()).await.unwrap_err();
        assert!(matches!(
            err,
            SyncError::Upstream(UpstreamError::Status { status: 503, .. })
        ));
    }

    #[tokio::test]
    async fn test_get_leads_snapshot_fails_fast_without_token() {
        let config = NocoConfig {
            table_id: Some("t".to_string()),
            ..NocoConfig::default()
        };
        let err = get_leads_snapshot(&config, now()).await.unwrap_err();
        assert!(matches!(err, SyncError::Config(ConfigError::MissingToken)));
    }

    #[test]
    fn test_build_snapshot_empty() {
        let snapshot = build_snapshot(Vec::new(), now(), false);
        assert_eq!(snapshot.total(), 0);
        assert!(snapshot.timeline_events.is_empty());
        assert!(snapshot.sdr_performance.is_empty());
        assert_eq!(snapshot.analytics.replies.total_replies, 0);

        let json = serde_json::to_value(&snapshot).unwrap();
        assert!(json["timelineEvents"].is_array());
        assert!(json["repliesOverTime"].is_array());
        assert!(json["sdrPerformance"].is_array());
    }
}
