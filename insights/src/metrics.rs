//! Summary counts and rates for the stat cards.
//!
//! Rates are rendered as percentage strings with one decimal, or `"0"` when
//! the denominator is zero. Counters are summed as `i64` so large campaign
//! sets cannot overflow the per-row `i32`.

use serde::{Deserialize, Serialize};

use crate::model::{Campaign, CampaignStatus, Lead};

/// Ratio as a percentage string: `"0"` for a zero denominator, otherwise one
/// decimal place, clamped to `[0, 100]`.
#[must_use]
pub fn percentage(numerator: i64, denominator: i64) -> String {
    if denominator <= 0 {
        return "0".to_owned();
    }
    format!("{:.1}", ratio_percent(numerator, denominator))
}

/// Ratio as a percentage number with the same zero-guard and clamp as
/// [`percentage`].
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn ratio_percent(numerator: i64, denominator: i64) -> f64 {
    if denominator <= 0 {
        return 0.0;
    }
    (numerator as f64 / denominator as f64 * 100.0).clamp(0.0, 100.0)
}

fn active_count(campaigns: &[Campaign]) -> usize {
    campaigns
        .iter()
        .filter(|c| c.status == CampaignStatus::Active)
        .count()
}

fn sum_counter(campaigns: &[Campaign], counter: impl Fn(&Campaign) -> i32) -> i64 {
    campaigns.iter().map(|c| i64::from(counter(c))).sum()
}

// =============================================================================
// ANALYTICS OVERVIEW
// =============================================================================

/// Headline numbers on the analytics page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsOverview {
    pub total_leads: usize,
    pub total_campaigns: usize,
    pub active_campaigns: usize,
    pub total_contacted: i64,
    pub total_responses: i64,
    pub total_conversions: i64,
    /// Responses over contacted.
    pub response_rate: String,
    /// Conversions over responses.
    pub conversion_rate: String,
}

impl AnalyticsOverview {
    #[must_use]
    pub fn compute(leads: &[Lead], campaigns: &[Campaign]) -> Self {
        let total_contacted = sum_counter(campaigns, |c| c.contacted_leads);
        let total_responses = sum_counter(campaigns, |c| c.responded_leads);
        let total_conversions = sum_counter(campaigns, |c| c.converted_leads);

        Self {
            total_leads: leads.len(),
            total_campaigns: campaigns.len(),
            active_campaigns: active_count(campaigns),
            total_contacted,
            total_responses,
            total_conversions,
            response_rate: percentage(total_responses, total_contacted),
            conversion_rate: percentage(total_conversions, total_responses),
        }
    }
}

// =============================================================================
// CAMPAIGN STATS
// =============================================================================

/// Cards above the campaigns table. The response rate here is measured
/// against total enrolled leads, not contacted leads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignStats {
    pub total_campaigns: usize,
    pub active_campaigns: usize,
    pub total_leads: i64,
    pub total_responses: i64,
    pub response_rate: String,
}

impl CampaignStats {
    #[must_use]
    pub fn compute(campaigns: &[Campaign]) -> Self {
        let total_leads = sum_counter(campaigns, |c| c.total_leads);
        let total_responses = sum_counter(campaigns, |c| c.responded_leads);

        Self {
            total_campaigns: campaigns.len(),
            active_campaigns: active_count(campaigns),
            total_leads,
            total_responses,
            response_rate: percentage(total_responses, total_leads),
        }
    }
}

/// Per-campaign rates shown on the detail view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CampaignPerformance {
    pub response_rate: f64,
    pub conversion_rate: f64,
}

impl CampaignPerformance {
    #[must_use]
    pub fn for_campaign(campaign: &Campaign) -> Self {
        Self {
            response_rate: ratio_percent(campaign.responded_leads.into(), campaign.contacted_leads.into()),
            conversion_rate: ratio_percent(campaign.converted_leads.into(), campaign.responded_leads.into()),
        }
    }
}

// =============================================================================
// DASHBOARD
// =============================================================================

/// Landing page summary. `is_new_user` drives the onboarding prompts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_leads: i64,
    pub total_campaigns: usize,
    pub active_campaigns: usize,
    pub conversion_rate: String,
    pub is_new_user: bool,
}

impl DashboardSummary {
    /// Build from a lead count (leads are counted in SQL, not loaded) and
    /// the user's campaigns.
    #[must_use]
    pub fn compute(lead_count: i64, campaigns: &[Campaign]) -> Self {
        let total_responses = sum_counter(campaigns, |c| c.responded_leads);
        let total_conversions = sum_counter(campaigns, |c| c.converted_leads);

        Self {
            total_leads: lead_count,
            total_campaigns: campaigns.len(),
            active_campaigns: active_count(campaigns),
            conversion_rate: percentage(total_conversions, total_responses),
            is_new_user: lead_count == 0 && campaigns.is_empty(),
        }
    }
}

#[cfg(test)]
#[path = "metrics_test.rs"]
mod tests;
