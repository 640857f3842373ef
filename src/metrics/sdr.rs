//! Per-SDR outreach and reply tallies.

use std::collections::HashMap;

use serde::Serialize;

use crate::types::{Lead, ReplyType};

/// Label for leads with no owning SDR.
pub const DEFAULT_SDR_LABEL: &str = "Team";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SdrPerformance {
    pub sdr_name: String,
    pub outreach_count: usize,
    pub reply_count: usize,
    pub positive_count: usize,
    pub neutral_count: usize,
    pub negative_count: usize,
}

impl SdrPerformance {
    fn new(sdr_name: String) -> Self {
        Self {
            sdr_name,
            outreach_count: 0,
            reply_count: 0,
            positive_count: 0,
            neutral_count: 0,
            negative_count: 0,
        }
    }

    fn record(&mut self, lead: &Lead) {
        if lead.outreach_sent {
            self.outreach_count += 1;
        }
        if lead.reply_received {
            self.reply_count += 1;
        }
        match lead.reply_type {
            Some(ReplyType::Positive) => self.positive_count += 1,
            Some(ReplyType::Neutral) => self.neutral_count += 1,
            Some(ReplyType::Negative) => self.negative_count += 1,
            None => {}
        }
    }
}

/// Group leads by SDR. Output is in first-seen order.
pub fn sdr_performance(leads: &[Lead]) -> Vec<SdrPerformance> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<SdrPerformance> = Vec::new();

    for lead in leads {
        let name = lead
            .sdr_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(DEFAULT_SDR_LABEL);

        let slot = *index.entry(name).or_insert_with(|| {
            groups.push(SdrPerformance::new(name.to_string()));
            groups.len() - 1
        });
        groups[slot].record(lead);
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::test_support::{lead, replied};

    #[test]
    fn test_named_and_default_sdr_groups() {
        let leads = vec![
            Lead {
                sdr_name: Some("Alex".to_string()),
                ..replied("a", Some(ReplyType::Positive))
            },
            Lead {
                outreach_sent: false,
                ..lead("b")
            },
        ];

        let perf = sdr_performance(&leads);
        assert_eq!(perf.len(), 2);
        assert_eq!(perf[0].sdr_name, "Alex");
        assert_eq!(perf[0].outreach_count, 1);
        assert_eq!(perf[0].reply_count, 1);
        assert_eq!(perf[0].positive_count, 1);
        assert_eq!(perf[1].sdr_name, "Team");
        assert_eq!(perf[1].outreach_count, 0);
        assert_eq!(perf[1].reply_count, 0);
    }

    #[test]
    fn test_groups_merge_and_keep_first_seen_order() {
        let named = |id: &str, sdr: &str| Lead {
            sdr_name: Some(sdr.to_string()),
            ..lead(id)
        };
        let leads = vec![
            named("1", "Sam"),
            named("2", "Alex"),
            Lead {
                sdr_name: Some("  ".to_string()),
                ..lead("3")
            },
            Lead {
                sdr_name: Some("Sam".to_string()),
                ..replied("4", Some(ReplyType::Negative))
            },
        ];

        let perf = sdr_performance(&leads);
        let names: Vec<&str> = perf.iter().map(|p| p.sdr_name.as_str()).collect();
        assert_eq!(names, vec!["Sam", "Alex", "Team"]);
        assert_eq!(perf[0].outreach_count, 2);
        assert_eq!(perf[0].negative_count, 1);
    }

    #[test]
    fn test_empty_input_has_no_groups() {
        assert!(sdr_performance(&[]).is_empty());
    }
}
