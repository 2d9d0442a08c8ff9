//! Calendar-month bucketing for the analytics charts.
//!
//! Rows are grouped by the UTC year-month of `created_at`. Buckets are keyed
//! by `MonthKey`, which orders chronologically, so "most recent six" is a
//! tail slice of a `BTreeMap` rather than a sort on display labels.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, UtcOffset};

use crate::model::{Campaign, Lead, LeadStatus};

/// Number of buckets kept for charting.
pub const MAX_BUCKETS: usize = 6;

const MONTH_ABBREVIATIONS: [&str; 12] = ["Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    pub year: i32,
    /// 1-based month.
    pub month: u8,
}

impl MonthKey {
    #[must_use]
    pub fn of(at: OffsetDateTime) -> Self {
        let utc = at.to_offset(UtcOffset::UTC);
        Self { year: utc.year(), month: u8::from(utc.month()) }
    }

    /// Chart axis label, e.g. `"Mar 2024"`.
    #[must_use]
    pub fn label(self) -> String {
        let index = usize::from(self.month.clamp(1, 12) - 1);
        format!("{} {}", MONTH_ABBREVIATIONS[index], self.year)
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Group `items` by month, fold each into its bucket, and keep the newest
/// [`MAX_BUCKETS`] in ascending order.
fn bucket_by_month<T, B: Default>(
    items: &[T],
    created_at: impl Fn(&T) -> OffsetDateTime,
    mut fold: impl FnMut(&mut B, &T),
) -> Vec<(MonthKey, B)> {
    let mut buckets: BTreeMap<MonthKey, B> = BTreeMap::new();
    for item in items {
        fold(buckets.entry(MonthKey::of(created_at(item))).or_default(), item);
    }
    let skip = buckets.len().saturating_sub(MAX_BUCKETS);
    buckets.into_iter().skip(skip).collect()
}

// =============================================================================
// LEADS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadMonth {
    /// Display label, e.g. `"Mar 2024"`.
    pub month: String,
    /// Sort key, e.g. `"2024-03"`.
    pub key: String,
    pub leads: u32,
    pub new: u32,
    pub contacted: u32,
    pub converted: u32,
}

#[derive(Default)]
struct LeadTally {
    leads: u32,
    new: u32,
    contacted: u32,
    converted: u32,
}

/// Leads per month with the new/contacted/converted breakdown used by the
/// stacked bar chart. Other statuses only count towards `leads`.
#[must_use]
pub fn bucket_leads(leads: &[Lead]) -> Vec<LeadMonth> {
    bucket_by_month(
        leads,
        |lead| lead.created_at,
        |tally: &mut LeadTally, lead| {
            tally.leads += 1;
            match lead.status {
                LeadStatus::New => tally.new += 1,
                LeadStatus::Contacted => tally.contacted += 1,
                LeadStatus::Converted => tally.converted += 1,
                LeadStatus::Qualified | LeadStatus::Lost => {}
            }
        },
    )
    .into_iter()
    .map(|(key, t)| LeadMonth {
        month: key.label(),
        key: key.to_string(),
        leads: t.leads,
        new: t.new,
        contacted: t.contacted,
        converted: t.converted,
    })
    .collect()
}

// =============================================================================
// CAMPAIGNS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignMonth {
    pub month: String,
    pub key: String,
    pub campaigns: u32,
    pub contacted: i64,
    pub responses: i64,
    pub conversions: i64,
}

#[derive(Default)]
struct CampaignTally {
    campaigns: u32,
    contacted: i64,
    responses: i64,
    conversions: i64,
}

/// Campaign counters summed per creation month for the performance line chart.
#[must_use]
pub fn bucket_campaigns(campaigns: &[Campaign]) -> Vec<CampaignMonth> {
    bucket_by_month(
        campaigns,
        |campaign| campaign.created_at,
        |tally: &mut CampaignTally, campaign| {
            tally.campaigns += 1;
            tally.contacted += i64::from(campaign.contacted_leads);
            tally.responses += i64::from(campaign.responded_leads);
            tally.conversions += i64::from(campaign.converted_leads);
        },
    )
    .into_iter()
    .map(|(key, t)| CampaignMonth {
        month: key.label(),
        key: key.to_string(),
        campaigns: t.campaigns,
        contacted: t.contacted,
        responses: t.responses,
        conversions: t.conversions,
    })
    .collect()
}

#[cfg(test)]
#[path = "monthly_test.rs"]
mod tests;
