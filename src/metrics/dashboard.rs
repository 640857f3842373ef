//! Headline KPIs for the dashboard header cards.

use serde::Serialize;

use super::{mean, percent};
use crate::types::{Lead, LeadStatus, ReplyType};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LeadsByStatus {
    pub new: usize,
    pub contacted: usize,
    pub replied: usize,
    pub positive: usize,
    pub meeting: usize,
    pub closed: usize,
}

impl LeadsByStatus {
    pub fn get(&self, status: LeadStatus) -> usize {
        match status {
            LeadStatus::New => self.new,
            LeadStatus::Contacted => self.contacted,
            LeadStatus::Replied => self.replied,
            LeadStatus::Positive => self.positive,
            LeadStatus::Meeting => self.meeting,
            LeadStatus::Closed => self.closed,
        }
    }

    fn bump(&mut self, status: LeadStatus) {
        let slot = match status {
            LeadStatus::New => &mut self.new,
            LeadStatus::Contacted => &mut self.contacted,
            LeadStatus::Replied => &mut self.replied,
            LeadStatus::Positive => &mut self.positive,
            LeadStatus::Meeting => &mut self.meeting,
            LeadStatus::Closed => &mut self.closed,
        };
        *slot += 1;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub total_leads: usize,
    pub emails_sent: usize,
    pub replies: usize,
    /// Positive replies as a share of replies.
    pub positive_reply_rate: f64,
    /// Closed leads as a share of all leads.
    pub conversion_rate: f64,
    pub avg_followups_per_lead: f64,
    pub avg_reply_time_hours: f64,
    pub leads_by_status: LeadsByStatus,
}

pub fn dashboard_metrics(leads: &[Lead]) -> DashboardMetrics {
    let mut leads_by_status = LeadsByStatus::default();
    let mut emails_sent = 0;
    let mut replies = 0;
    let mut positive_replies = 0;

    for lead in leads {
        leads_by_status.bump(lead.status);
        if lead.outreach_sent {
            emails_sent += 1;
        }
        if lead.reply_received {
            replies += 1;
            if lead.reply_type == Some(ReplyType::Positive) {
                positive_replies += 1;
            }
        }
    }

    DashboardMetrics {
        total_leads: leads.len(),
        emails_sent,
        replies,
        positive_reply_rate: percent(positive_replies, replies),
        conversion_rate: percent(leads_by_status.closed, leads.len()),
        avg_followups_per_lead: mean(leads.iter().map(|l| l.followup_count as f64)),
        avg_reply_time_hours: mean(leads.iter().filter_map(|l| l.reply_time_hours)),
        leads_by_status,
    }
}
