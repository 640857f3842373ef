//! Raw NocoDB rows → canonical [`Lead`]s.
//!
//! Two upstream table layouts are known:
//! - CRM-shaped: `lead_id`, `name`, `status`, `reply_received`, `reply_type`,
//!   `sdr_name`, outreach dates, `follow_up_count`, `days_to_reply`.
//! - Contact-extraction-shaped: `fullName`, `email1`/`email2`, `jobTitle`,
//!   `phone`, `notes`, free-text `status`.
//!
//! [`SourceRecord::detect`] picks the layout; each has its own normalizer and
//! both produce the same `Lead`. Explicit engagement columns win; when they
//! are missing the values are inferred from the status text.
//!
//! Normalization is total: bad or missing values fall back to defaults.

pub mod fields;
pub mod status;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::types::{Lead, LeadStatus, RawRecord, ReplyType, LEAD_SOURCE};

const UNKNOWN: &str = "Unknown";

/// Which upstream layout a row follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordSchema {
    Crm,
    ContactExtraction,
}

/// A raw row tagged with its detected layout.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceRecord {
    Crm(CrmRecord),
    ContactExtraction(ContactRecord),
}

/// Fields shared by both layouts: status text plus optional explicit
/// engagement columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Engagement {
    pub raw_status: Option<String>,
    pub outreach_sent: Option<bool>,
    pub reply_received: Option<bool>,
    pub followup_count: Option<u32>,
    pub days_to_reply: Option<f64>,
    pub email_opened: Option<bool>,
    pub sdr_name: Option<String>,
    pub first_outreach_date: Option<DateTime<Utc>>,
    pub last_followup_date: Option<DateTime<Utc>>,
    pub next_followup_date: Option<DateTime<Utc>>,
}

impl Engagement {
    fn from_raw(raw: &RawRecord) -> Self {
        Self {
            raw_status: fields::text(raw, &["status"]),
            outreach_sent: fields::flag(raw, "outreach_sent"),
            reply_received: fields::flag(raw, "reply_received"),
            followup_count: fields::count(raw, "follow_up_count")
                .or_else(|| fields::count(raw, "followup_count")),
            days_to_reply: fields::number(raw, "days_to_reply").filter(|d| *d >= 0.0),
            email_opened: fields::flag(raw, "email_opened"),
            sdr_name: fields::text(raw, &["sdr_name"]),
            first_outreach_date: fields::timestamp(raw, "first_outreach_date"),
            last_followup_date: fields::timestamp(raw, "last_followup_date"),
            next_followup_date: fields::timestamp(raw, "next_followup_date"),
        }
    }

    fn status(&self) -> LeadStatus {
        status::classify_status(self.raw_status.as_deref())
    }

    fn outreach_sent(&self) -> bool {
        self.outreach_sent
            .unwrap_or_else(|| status::implies_outreach_sent(self.raw_status.as_deref()))
    }

    fn reply_received(&self) -> bool {
        self.reply_received
            .unwrap_or_else(|| status::implies_reply(self.raw_status.as_deref()))
    }

    fn followup_count(&self) -> u32 {
        self.followup_count
            .unwrap_or_else(|| status::implied_followup_count(self.raw_status.as_deref()))
    }

    fn reply_time_hours(&self) -> Option<f64> {
        self.days_to_reply.map(|days| days * 24.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CrmRecord {
    pub id: String,
    pub name: Option<String>,
    pub company: Option<String>,
    pub email: Option<String>,
    pub job_title: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
    pub reply_type: Option<ReplyType>,
    pub engagement: Engagement,
}

impl CrmRecord {
    pub fn from_raw(raw: &RawRecord) -> Self {
        Self {
            id: resolve_id(raw),
            name: fields::text(raw, &["name"]),
            company: fields::text(raw, &["company"]),
            email: fields::text(raw, &["email"]),
            job_title: fields::text(raw, &["job_title", "title"]),
            phone: fields::text(raw, &["phone"]),
            notes: fields::text(raw, &["notes"]),
            reply_type: fields::text(raw, &["reply_type"]).and_then(|t| ReplyType::parse(&t)),
            engagement: Engagement::from_raw(raw),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContactRecord {
    pub id: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub company: Option<String>,
    pub job_title: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
    pub engagement: Engagement,
}

impl ContactRecord {
    pub fn from_raw(raw: &RawRecord) -> Self {
        let full_name = fields::text(raw, &["fullName"]).or_else(|| {
            let parts: Vec<String> = ["firstName", "lastName"]
                .iter()
                .filter_map(|k| fields::text(raw, &[*k]))
                .collect();
            (!parts.is_empty()).then(|| parts.join(" "))
        });

        Self {
            id: resolve_id(raw),
            full_name,
            email: fields::text(raw, &["email1", "email2", "email"]),
            company: fields::text(raw, &["company", "companyName", "organization"]),
            job_title: fields::text(raw, &["jobTitle"]),
            phone: fields::text(raw, &["phone"]),
            notes: fields::text(raw, &["notes"]),
            engagement: Engagement::from_raw(raw),
        }
    }
}

impl SourceRecord {
    /// Contact-extraction rows carry `fullName` or numbered email columns.
    pub fn detect(raw: &RawRecord) -> Self {
        let contact_shaped = ["fullName", "email1", "email2"]
            .iter()
            .any(|k| raw.contains_key(*k));

        if contact_shaped {
            SourceRecord::ContactExtraction(ContactRecord::from_raw(raw))
        } else {
            SourceRecord::Crm(CrmRecord::from_raw(raw))
        }
    }

    pub fn schema(&self) -> RecordSchema {
        match self {
            SourceRecord::Crm(_) => RecordSchema::Crm,
            SourceRecord::ContactExtraction(_) => RecordSchema::ContactExtraction,
        }
    }

    pub fn into_lead(self, now: DateTime<Utc>) -> Lead {
        match self {
            SourceRecord::Crm(record) => normalize_crm(record, now),
            SourceRecord::ContactExtraction(record) => normalize_contact(record, now),
        }
    }
}

fn normalize_crm(record: CrmRecord, now: DateTime<Utc>) -> Lead {
    let e = &record.engagement;
    let first_outreach = e.first_outreach_date.unwrap_or(now);

    Lead {
        id: record.id,
        name: record.name.unwrap_or_else(|| UNKNOWN.to_string()),
        email: record.email.unwrap_or_default(),
        company: record.company.unwrap_or_else(|| UNKNOWN.to_string()),
        source: LEAD_SOURCE.to_string(),
        job_title: record.job_title,
        phone: record.phone,
        notes: record.notes,
        status: e.status(),
        reply_type: record.reply_type,
        sdr_name: e.sdr_name.clone(),
        created_at: first_outreach,
        first_outreach_date: first_outreach,
        last_followup_date: e.last_followup_date,
        next_followup_date: e.next_followup_date,
        followup_count: e.followup_count(),
        reply_time_hours: e.reply_time_hours(),
        outreach_sent: e.outreach_sent(),
        reply_received: e.reply_received(),
        email_opened: e.email_opened.unwrap_or(false),
    }
}

// Negative statuses land on `Replied` with no reply_type here, so they are
// indistinguishable from unlabelled replies downstream.
fn normalize_contact(record: ContactRecord, now: DateTime<Utc>) -> Lead {
    let e = &record.engagement;
    let first_outreach = e.first_outreach_date.unwrap_or(now);

    Lead {
        id: record.id,
        name: record.full_name.unwrap_or_else(|| UNKNOWN.to_string()),
        email: record.email.unwrap_or_default(),
        company: record.company.unwrap_or_else(|| UNKNOWN.to_string()),
        source: LEAD_SOURCE.to_string(),
        job_title: record.job_title,
        phone: record.phone,
        notes: record.notes,
        status: e.status(),
        reply_type: None,
        sdr_name: e.sdr_name.clone(),
        created_at: first_outreach,
        first_outreach_date: first_outreach,
        last_followup_date: e.last_followup_date,
        next_followup_date: e.next_followup_date,
        followup_count: e.followup_count(),
        reply_time_hours: e.reply_time_hours(),
        outreach_sent: e.outreach_sent(),
        reply_received: e.reply_received(),
        email_opened: e.email_opened.unwrap_or(false),
    }
}

/// `lead_id`, else the NocoDB row `Id`, else a name-based UUID of the row
/// contents (stable across fetches of an unchanged row).
fn resolve_id(raw: &RawRecord) -> String {
    if let Some(id) = fields::text(raw, &["lead_id", "Id", "id"]) {
        return id;
    }
    let canonical = serde_json::to_string(raw).unwrap_or_default();
    Uuid::new_v5(&Uuid::NAMESPACE_OID, canonical.as_bytes()).to_string()
}

/// Normalize one raw row. `now` stands in for a missing first-outreach date.
pub fn normalize(raw: &RawRecord, now: DateTime<Utc>) -> Lead {
    SourceRecord::detect(raw).into_lead(now)
}

pub fn normalize_all(records: &[RawRecord], now: DateTime<Utc>) -> Vec<Lead> {
    let mut contact_rows = 0usize;
    let leads: Vec<Lead> = records
        .iter()
        .map(|raw| {
            let record = SourceRecord::detect(raw);
            if record.schema() == RecordSchema::ContactExtraction {
                contact_rows += 1;
            }
            record.into_lead(now)
        })
        .collect();

    log::debug!(
        "Normalized {} rows ({} CRM, {} contact-extraction)",
        leads.len(),
        leads.len() - contact_rows,
        contact_rows
    );
    leads
}
