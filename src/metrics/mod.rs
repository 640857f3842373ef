//! Derived analytics over a normalized lead collection.
//!
//! Everything here is a pure function of `&[Lead]`: no I/O, no clock, no
//! failure path. Empty input yields zero-valued results.

pub mod dashboard;
pub mod replies;
pub mod sdr;
pub mod timeline;

use serde::Serialize;

use crate::types::Lead;

pub use dashboard::{dashboard_metrics, DashboardMetrics, LeadsByStatus};
pub use replies::{
    follow_up_metrics, reply_funnel, reply_metrics, sentiment_distribution, FollowUpMetrics,
    FunnelStage, ReplyMetrics, SentimentDistribution, OPEN_RATE_ESTIMATE,
};
pub use sdr::{sdr_performance, SdrPerformance, DEFAULT_SDR_LABEL};
pub use timeline::{
    replies_over_time, timeline_events, RepliesOverTime, TimelineEntry, TimelineEvent,
    TimelineEventKind, REPLIES_WINDOW_DAYS, TIMELINE_LEAD_LIMIT,
};

/// Every lead-level aggregate the dashboard renders, computed in one pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadAnalytics {
    pub dashboard: DashboardMetrics,
    pub replies: ReplyMetrics,
    pub follow_ups: FollowUpMetrics,
    pub sentiment: SentimentDistribution,
    pub funnel: Vec<FunnelStage>,
}

impl LeadAnalytics {
    pub fn compute(leads: &[Lead]) -> Self {
        Self {
            dashboard: dashboard_metrics(leads),
            replies: reply_metrics(leads),
            follow_ups: follow_up_metrics(leads),
            sentiment: sentiment_distribution(leads),
            funnel: reply_funnel(leads),
        }
    }
}

/// Arithmetic mean, 0 for an empty input.
pub(crate) fn mean<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let (sum, n) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

/// `part / whole * 100`, 0 when `whole` is 0.
pub(crate) fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{DateTime, TimeZone, Utc};

    use crate::types::{Lead, LeadStatus, ReplyType};

    pub(crate) fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 9, 0, 0).unwrap()
    }

    /// Contacted, no reply, first outreach 2025-01-06.
    pub(crate) fn lead(id: &str) -> Lead {
        Lead {
            id: id.to_string(),
            name: format!("Lead {}", id),
            email: format!("{}@example.com", id),
            company: "Acme".to_string(),
            source: "NocoDB".to_string(),
            job_title: None,
            phone: None,
            notes: None,
            status: LeadStatus::Contacted,
            reply_type: None,
            sdr_name: None,
            created_at: at(2025, 1, 6),
            first_outreach_date: at(2025, 1, 6),
            last_followup_date: None,
            next_followup_date: None,
            followup_count: 0,
            reply_time_hours: None,
            outreach_sent: true,
            reply_received: false,
            email_opened: false,
        }
    }

    pub(crate) fn replied(id: &str, reply_type: Option<ReplyType>) -> Lead {
        Lead {
            status: LeadStatus::Replied,
            reply_received: true,
            reply_type,
            ..lead(id)
        }
    }

    /// (a) new/no reply, (b) replied positive 18h 2 follow-ups,
    /// (c) closed positive 8h 4 follow-ups.
    pub(crate) fn three_leads() -> Vec<Lead> {
        vec![
            Lead {
                status: LeadStatus::New,
                outreach_sent: false,
                ..lead("a")
            },
            Lead {
                reply_time_hours: Some(18.0),
                followup_count: 2,
                ..replied("b", Some(ReplyType::Positive))
            },
            Lead {
                status: LeadStatus::Closed,
                reply_time_hours: Some(8.0),
                followup_count: 4,
                ..replied("c", Some(ReplyType::Positive))
            },
        ]
    }
}
