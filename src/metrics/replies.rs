//! Reply, follow-up, sentiment and funnel metrics.

use serde::Serialize;

use super::{mean, percent};
use crate::types::{Lead, ReplyType};

/// Modeled open rate for the "Opened" funnel stage. There is no open
/// tracking upstream; swap this for measured data when it exists.
pub const OPEN_RATE_ESTIMATE: f64 = 0.45;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyMetrics {
    pub total_replies: usize,
    pub positive_replies: usize,
    pub neutral_replies: usize,
    pub negative_replies: usize,
    /// Replies with no sentiment label.
    pub auto_replies: usize,
    pub avg_reply_time_hours: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowUpMetrics {
    pub avg_followups_per_lead: f64,
    pub replies_after_followup: usize,
    pub positive_percent_after_followup: f64,
    pub avg_days_to_reply: f64,
}

/// Reply sentiment histogram over replied leads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentDistribution {
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
    pub auto_reply: usize,
}

impl SentimentDistribution {
    pub fn total(&self) -> usize {
        self.positive + self.neutral + self.negative + self.auto_reply
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunnelStage {
    pub stage: &'static str,
    pub count: usize,
    /// Relative to the Outreach Sent count, rounded.
    pub percentage: u32,
}

fn average_reply_hours(leads: &[Lead]) -> f64 {
    mean(leads.iter().filter_map(|l| l.reply_time_hours))
}

pub fn reply_metrics(leads: &[Lead]) -> ReplyMetrics {
    let sentiment = sentiment_distribution(leads);

    ReplyMetrics {
        total_replies: sentiment.total(),
        positive_replies: sentiment.positive,
        neutral_replies: sentiment.neutral,
        negative_replies: sentiment.negative,
        auto_replies: sentiment.auto_reply,
        avg_reply_time_hours: average_reply_hours(leads),
    }
}

pub fn follow_up_metrics(leads: &[Lead]) -> FollowUpMetrics {
    let avg_followups_per_lead = mean(leads.iter().map(|l| l.followup_count as f64));

    let replied_after_followup: Vec<&Lead> = leads
        .iter()
        .filter(|l| l.followup_count > 0 && l.reply_received)
        .collect();
    let positive_after_followup = replied_after_followup
        .iter()
        .filter(|l| l.reply_type == Some(ReplyType::Positive))
        .count();

    FollowUpMetrics {
        avg_followups_per_lead,
        replies_after_followup: replied_after_followup.len(),
        positive_percent_after_followup: percent(
            positive_after_followup,
            replied_after_followup.len(),
        ),
        avg_days_to_reply: average_reply_hours(leads) / 24.0,
    }
}

pub fn sentiment_distribution(leads: &[Lead]) -> SentimentDistribution {
    leads
        .iter()
        .filter(|l| l.reply_received)
        .fold(SentimentDistribution::default(), |mut dist, lead| {
            match lead.reply_type {
                Some(ReplyType::Positive) => dist.positive += 1,
                Some(ReplyType::Neutral) => dist.neutral += 1,
                Some(ReplyType::Negative) => dist.negative += 1,
                None => dist.auto_reply += 1,
            }
            dist
        })
}

/// Outreach Sent → Opened → Replied → Positive → Meeting.
///
/// Counts are raw and not forced to be non-increasing: "Meeting" counts
/// meeting/closed statuses, which is a different subset than "Replied".
pub fn reply_funnel(leads: &[Lead]) -> Vec<FunnelStage> {
    let outreach_sent = leads.iter().filter(|l| l.outreach_sent).count();
    let opened = (outreach_sent as f64 * OPEN_RATE_ESTIMATE).round() as usize;
    let replied = leads.iter().filter(|l| l.reply_received).count();
    let positive = leads
        .iter()
        .filter(|l| l.reply_type == Some(ReplyType::Positive))
        .count();
    let meetings = leads
        .iter()
        .filter(|l| l.status.is_meeting_or_later())
        .count();

    let base = outreach_sent.max(1) as f64;
    let stage = |stage: &'static str, count: usize| FunnelStage {
        stage,
        count,
        percentage: (count as f64 / base * 100.0).round() as u32,
    };

    vec![
        stage("Outreach Sent", outreach_sent),
        stage("Opened", opened),
        stage("Replied", replied),
        stage("Positive", positive),
        stage("Meeting", meetings),
    ]
}
