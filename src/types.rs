//! Canonical lead types shared by the normalizer, metrics and snapshot layers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A row as returned by the NocoDB records API. Field names are whatever the
/// table owner chose; see `normalize::SourceRecord` for the shapes we know.
pub type RawRecord = serde_json::Map<String, serde_json::Value>;

/// Source label stamped on every lead mirrored from NocoDB.
pub const LEAD_SOURCE: &str = "NocoDB";

/// Pipeline stage of a lead. Closed set; unknown upstream values become `New`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadStatus {
    #[default]
    New,
    Contacted,
    Replied,
    Positive,
    Meeting,
    Closed,
}

impl LeadStatus {
    pub const ALL: [LeadStatus; 6] = [
        LeadStatus::New,
        LeadStatus::Contacted,
        LeadStatus::Replied,
        LeadStatus::Positive,
        LeadStatus::Meeting,
        LeadStatus::Closed,
    ];

    /// Meeting booked or deal closed.
    pub fn is_meeting_or_later(&self) -> bool {
        matches!(self, Self::Meeting | Self::Closed)
    }
}

/// Sentiment of a received reply. `None` on a lead means unknown / auto-reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplyType {
    Positive,
    Neutral,
    Negative,
}

impl ReplyType {
    /// Case-insensitive parse. Anything outside the three known labels is `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "positive" => Some(Self::Positive),
            "neutral" => Some(Self::Neutral),
            "negative" => Some(Self::Negative),
            _ => None,
        }
    }
}

/// A normalized lead. Read-only snapshot of one upstream row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: String,
    pub name: String,
    pub email: String,
    pub company: String,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub status: LeadStatus,
    pub reply_type: Option<ReplyType>,
    /// Owning SDR; aggregation labels absent owners as "Team".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sdr_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub first_outreach_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_followup_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_followup_date: Option<DateTime<Utc>>,
    pub followup_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_time_hours: Option<f64>,
    pub outreach_sent: bool,
    pub reply_received: bool,
    #[serde(default)]
    pub email_opened: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_type_parse_is_case_insensitive() {
        assert_eq!(ReplyType::parse("Positive"), Some(ReplyType::Positive));
        assert_eq!(ReplyType::parse(" NEGATIVE "), Some(ReplyType::Negative));
        assert_eq!(ReplyType::parse("auto"), None);
        assert_eq!(ReplyType::parse(""), None);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&LeadStatus::Meeting).unwrap();
        assert_eq!(json, "\"meeting\"");
        assert_eq!(LeadStatus::default(), LeadStatus::New);
    }
}
