//! Aggregation over a user's full lead and campaign sets.
//!
//! Rows are loaded unpaginated and handed to the pure derivations in
//! `insights`; nothing here is cached, so every call reflects the store.

use serde::Serialize;
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use insights::{
    ActivityItem, AnalyticsOverview, CampaignMonth, CampaignStats, DashboardSummary, LeadMonth, bucket_campaigns,
    bucket_leads, recent_activity, relative_label,
};

use super::campaign::{CampaignError, list_campaigns};
use super::lead::{LeadError, count_leads, list_all_leads};

#[derive(Debug, thiserror::Error)]
pub enum AnalyticsError {
    #[error(transparent)]
    Lead(#[from] LeadError),
    #[error(transparent)]
    Campaign(#[from] CampaignError),
}

/// Activity entry with a display label relative to when the report was built.
#[derive(Debug, Clone, Serialize)]
pub struct ActivityEntry {
    #[serde(flatten)]
    pub item: ActivityItem,
    pub when: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsReport {
    pub overview: AnalyticsOverview,
    pub leads_by_month: Vec<LeadMonth>,
    pub campaigns_by_month: Vec<CampaignMonth>,
    pub recent_activity: Vec<ActivityEntry>,
}

/// Build the analytics page payload.
///
/// # Errors
///
/// Returns a database error if either source fails to load.
pub async fn analytics_report(pool: &PgPool, user_id: Uuid) -> Result<AnalyticsReport, AnalyticsError> {
    let leads = list_all_leads(pool, user_id).await?;
    let campaigns = list_campaigns(pool, user_id).await?;

    let now = OffsetDateTime::now_utc();
    let recent_activity = recent_activity(&leads, &campaigns)
        .into_iter()
        .map(|item| ActivityEntry { when: relative_label(now, item.at), item })
        .collect();

    Ok(AnalyticsReport {
        overview: AnalyticsOverview::compute(&leads, &campaigns),
        leads_by_month: bucket_leads(&leads),
        campaigns_by_month: bucket_campaigns(&campaigns),
        recent_activity,
    })
}

/// Headline numbers for the dashboard. Leads are counted in SQL; campaigns
/// are few enough to load.
///
/// # Errors
///
/// Returns a database error if either query fails.
pub async fn dashboard_summary(pool: &PgPool, user_id: Uuid) -> Result<DashboardSummary, AnalyticsError> {
    let lead_count = count_leads(pool, user_id).await?;
    let campaigns = list_campaigns(pool, user_id).await?;
    Ok(DashboardSummary::compute(lead_count, &campaigns))
}

/// Summary cards shown above the campaign list.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn campaign_stats(pool: &PgPool, user_id: Uuid) -> Result<CampaignStats, AnalyticsError> {
    let campaigns = list_campaigns(pool, user_id).await?;
    Ok(CampaignStats::compute(&campaigns))
}

#[cfg(test)]
#[path = "analytics_test.rs"]
mod tests;
