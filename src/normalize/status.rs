//! Free-text status classification.
//!
//! Upstream tables hold whatever an SDR (or an extraction job) typed into the
//! status column. We map known synonyms onto the canonical pipeline stages.
//! Adding a newly observed synonym is a one-line change to [`STATUS_SYNONYMS`].

use crate::types::LeadStatus;

/// Ordered synonym table, matched against the whole status after trimming,
/// lowercasing and collapsing inner whitespace. No partial matches: a status
/// that is not listed here is `New`.
///
/// Negative replies fold into `Replied`; there is no negative status.
pub const STATUS_SYNONYMS: &[(&[&str], LeadStatus)] = &[
    (&["not interested", "negative", "rejected"], LeadStatus::Replied),
    (&["sent", "contacted"], LeadStatus::Contacted),
    (&["replied", "response"], LeadStatus::Replied),
    (&["positive", "interested"], LeadStatus::Positive),
    (&["meeting", "scheduled"], LeadStatus::Meeting),
    (&["closed", "won", "converted"], LeadStatus::Closed),
];

/// Raw status values (lowercased) that mean the lead answered.
pub const REPLY_BEARING_STATUSES: &[&str] = &[
    "replied",
    "positive",
    "meeting",
    "closed",
    "response",
    "interested",
];

fn canonical_key(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Map a free-text status onto the closed set. Empty and unknown values are `New`.
pub fn classify_status(raw: Option<&str>) -> LeadStatus {
    let key = match raw {
        Some(r) => canonical_key(r),
        None => return LeadStatus::New,
    };
    if key.is_empty() || key == "new" {
        return LeadStatus::New;
    }

    for (synonyms, status) in STATUS_SYNONYMS {
        if synonyms.iter().any(|s| *s == key) {
            return *status;
        }
    }
    LeadStatus::New
}

/// Outreach went out whenever there is a status and it is not "new".
pub fn implies_outreach_sent(raw: Option<&str>) -> bool {
    match raw {
        Some(r) => {
            let key = canonical_key(r);
            !key.is_empty() && key != "new"
        }
        None => false,
    }
}

/// The raw status is one of the reply-bearing labels.
pub fn implies_reply(raw: Option<&str>) -> bool {
    raw.map(canonical_key)
        .is_some_and(|key| REPLY_BEARING_STATUSES.contains(&key.as_str()))
}

/// "sent" means one touch beyond the first email.
pub fn implied_followup_count(raw: Option<&str>) -> u32 {
    match raw.map(canonical_key) {
        Some(key) if key == "sent" => 1,
        _ => 0,
    }
}
