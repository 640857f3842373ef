//! Follow-up timeline and replies-over-time series.
//!
//! The upstream table stores counts and a couple of dates, not an event log.
//! Timeline events are reconstructed from those sparse signals on a fixed
//! cadence (follow-up 1 at +3d, follow-up 2 at +7d, meeting at +5d), so they
//! are illustrative only.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use serde::Serialize;

use super::sdr::DEFAULT_SDR_LABEL;
use crate::types::{Lead, ReplyType};

/// Only the first N leads get a timeline row.
pub const TIMELINE_LEAD_LIMIT: usize = 20;

/// Trailing window of the replies-over-time series.
pub const REPLIES_WINDOW_DAYS: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TimelineEventKind {
    #[serde(rename = "outreach")]
    Outreach,
    #[serde(rename = "followup_1")]
    FollowUp1,
    #[serde(rename = "followup_2")]
    FollowUp2,
    #[serde(rename = "reply")]
    Reply,
    #[serde(rename = "meeting")]
    Meeting,
}

impl TimelineEventKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Outreach => "Initial Outreach",
            Self::FollowUp1 => "Follow-up 1",
            Self::FollowUp2 => "Follow-up 2",
            Self::Reply => "Reply Received",
            Self::Meeting => "Meeting Scheduled",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineEntry {
    #[serde(rename = "type")]
    pub kind: TimelineEventKind,
    pub date: DateTime<Utc>,
    pub label: &'static str,
}

impl TimelineEntry {
    fn new(kind: TimelineEventKind, date: DateTime<Utc>) -> Self {
        Self {
            kind,
            date,
            label: kind.label(),
        }
    }
}

/// One lead's reconstructed timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEvent {
    pub lead_id: String,
    pub lead_name: String,
    pub company: String,
    pub sdr_name: String,
    pub events: Vec<TimelineEntry>,
}

/// Reply counts for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepliesOverTime {
    pub date: NaiveDate,
    pub replies: usize,
    pub positive: usize,
    pub negative: usize,
}

fn lead_timeline(lead: &Lead) -> Vec<TimelineEntry> {
    let start = lead.first_outreach_date;
    let mut events = vec![TimelineEntry::new(TimelineEventKind::Outreach, start)];

    if lead.followup_count >= 1 {
        events.push(TimelineEntry::new(
            TimelineEventKind::FollowUp1,
            start + TimeDelta::days(3),
        ));
    }
    if lead.followup_count >= 2 {
        events.push(TimelineEntry::new(
            TimelineEventKind::FollowUp2,
            start + TimeDelta::days(7),
        ));
    }
    if let (true, Some(replied_at)) = (lead.reply_received, lead.last_followup_date) {
        events.push(TimelineEntry::new(TimelineEventKind::Reply, replied_at));
    }
    if lead.status.is_meeting_or_later() {
        let anchor = lead.last_followup_date.unwrap_or(start);
        events.push(TimelineEntry::new(
            TimelineEventKind::Meeting,
            anchor + TimeDelta::days(5),
        ));
    }

    events
}

/// Timelines for the first [`TIMELINE_LEAD_LIMIT`] leads, in input order.
pub fn timeline_events(leads: &[Lead]) -> Vec<TimelineEvent> {
    leads
        .iter()
        .take(TIMELINE_LEAD_LIMIT)
        .map(|lead| TimelineEvent {
            lead_id: lead.id.clone(),
            lead_name: lead.name.clone(),
            company: lead.company.clone(),
            sdr_name: lead
                .sdr_name
                .clone()
                .unwrap_or_else(|| DEFAULT_SDR_LABEL.to_string()),
            events: lead_timeline(lead),
        })
        .collect()
}

/// Daily reply tallies, keyed by the day of each replied lead's last
/// follow-up. Ascending by date; `window` keeps only the latest N days that
/// have replies.
pub fn replies_over_time(leads: &[Lead], window: Option<usize>) -> Vec<RepliesOverTime> {
    let mut by_day: BTreeMap<NaiveDate, RepliesOverTime> = BTreeMap::new();

    for lead in leads.iter().filter(|l| l.reply_received) {
        let Some(replied_at) = lead.last_followup_date else {
            continue;
        };
        let day = replied_at.date_naive();
        let entry = by_day.entry(day).or_insert(RepliesOverTime {
            date: day,
            replies: 0,
            positive: 0,
            negative: 0,
        });
        entry.replies += 1;
        match lead.reply_type {
            Some(ReplyType::Positive) => entry.positive += 1,
            Some(ReplyType::Negative) => entry.negative += 1,
            _ => {}
        }
    }

    let series: Vec<RepliesOverTime> = by_day.into_values().collect();
    match window {
        Some(n) if series.len() > n => series[series.len() - n..].to_vec(),
        _ => series,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::test_support::{at, lead, replied};
    use crate::types::LeadStatus;

    fn kinds(event: &TimelineEvent) -> Vec<TimelineEventKind> {
        event.events.iter().map(|e| e.kind).collect()
    }

    #[test]
    fn test_outreach_only_timeline() {
        let events = timeline_events(&[lead("a")]);
        assert_eq!(events.len(), 1);
        assert_eq!(kinds(&events[0]), vec![TimelineEventKind::Outreach]);
        assert_eq!(events[0].sdr_name, "Team");
        assert_eq!(events[0].events[0].label, "Initial Outreach");
    }

    #[test]
    fn test_full_timeline_offsets() {
        let l = Lead {
            status: LeadStatus::Meeting,
            followup_count: 2,
            last_followup_date: Some(at(2025, 1, 20)),
            sdr_name: Some("Alex".to_string()),
            ..replied("a", Some(ReplyType::Positive))
        };
        let events = timeline_events(&[l]);
        let timeline = &events[0];

        assert_eq!(
            kinds(timeline),
            vec![
                TimelineEventKind::Outreach,
                TimelineEventKind::FollowUp1,
                TimelineEventKind::FollowUp2,
                TimelineEventKind::Reply,
                TimelineEventKind::Meeting,
            ]
        );
        let dates: Vec<DateTime<Utc>> = timeline.events.iter().map(|e| e.date).collect();
        assert_eq!(
            dates,
            vec![
                at(2025, 1, 6),
                at(2025, 1, 9),
                at(2025, 1, 13),
                at(2025, 1, 20),
                at(2025, 1, 25),
            ]
        );
        assert_eq!(timeline.sdr_name, "Alex");
    }

    #[test]
    fn test_meeting_without_followup_date_anchors_on_outreach() {
        let l = Lead {
            status: LeadStatus::Closed,
            ..replied("a", None)
        };
        let events = timeline_events(&[l]);
        // Replied but no follow-up date: no reply event
        assert_eq!(
            kinds(&events[0]),
            vec![TimelineEventKind::Outreach, TimelineEventKind::Meeting]
        );
        assert_eq!(events[0].events[1].date, at(2025, 1, 11));
    }

    #[test]
    fn test_timeline_limited_to_first_twenty() {
        let leads: Vec<Lead> = (0..25).map(|i| lead(&i.to_string())).collect();
        let events = timeline_events(&leads);
        assert_eq!(events.len(), TIMELINE_LEAD_LIMIT);
        assert_eq!(events[19].lead_id, "19");
    }

    #[test]
    fn test_timeline_entry_serializes_type_tag() {
        let json = serde_json::to_value(TimelineEntry::new(
            TimelineEventKind::FollowUp2,
            at(2025, 1, 6),
        ))
        .unwrap();
        assert_eq!(json["type"], "followup_2");
        assert_eq!(json["label"], "Follow-up 2");
    }

    #[test]
    fn test_replies_over_time_groups_by_day_ascending() {
        let on = |id: &str, day: u32, reply_type: Option<ReplyType>| Lead {
            last_followup_date: Some(at(2025, 2, day)),
            ..replied(id, reply_type)
        };
        let leads = vec![
            on("a", 12, Some(ReplyType::Positive)),
            on("b", 3, Some(ReplyType::Negative)),
            on("c", 12, Some(ReplyType::Negative)),
            on("d", 12, None),
            // Not replied: ignored even with a follow-up date
            Lead {
                last_followup_date: Some(at(2025, 2, 1)),
                ..lead("e")
            },
            // Replied without a follow-up date: ignored
            replied("f", Some(ReplyType::Positive)),
        ];

        let series = replies_over_time(&leads, None);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].date, NaiveDate::from_ymd_opt(2025, 2, 3).unwrap());
        assert_eq!(series[0].replies, 1);
        assert_eq!(series[0].negative, 1);
        assert_eq!(series[1].date, NaiveDate::from_ymd_opt(2025, 2, 12).unwrap());
        assert_eq!(series[1].replies, 3);
        assert_eq!(series[1].positive, 1);
        assert_eq!(series[1].negative, 1);
    }

    #[test]
    fn test_replies_over_time_window_keeps_latest_days() {
        let leads: Vec<Lead> = (1..=28)
            .chain(1..=12)
            .enumerate()
            .map(|(i, day)| {
                let month = if i < 28 { 1 } else { 2 };
                Lead {
                    last_followup_date: Some(at(2025, month, day)),
                    ..replied(&i.to_string(), None)
                }
            })
            .collect();

        let series = replies_over_time(&leads, Some(REPLIES_WINDOW_DAYS));
        assert_eq!(series.len(), 30);
        assert_eq!(series[0].date, NaiveDate::from_ymd_opt(2025, 1, 11).unwrap());
        assert_eq!(
            series.last().unwrap().date,
            NaiveDate::from_ymd_opt(2025, 2, 12).unwrap()
        );
    }

    #[test]
    fn test_empty_inputs() {
        assert!(timeline_events(&[]).is_empty());
        assert!(replies_over_time(&[], Some(30)).is_empty());
    }
}
