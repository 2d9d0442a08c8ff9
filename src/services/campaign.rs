//! Campaign service: CRUD, status changes, and lead membership.
//!
//! DESIGN
//! ======
//! Campaigns carry denormalized funnel counters (`total_leads`,
//! `contacted_leads`, `responded_leads`, `converted_leads`). `total_leads` is
//! rewritten on every membership save; the other three only grow, bumped
//! when a campaign lead advances along the funnel.
//!
//! TRANSACTIONS
//! ============
//! Saving membership deletes stale links, inserts new ones, and rewrites
//! `total_leads` inside one transaction with the campaign row locked, so a
//! failed save leaves the previous membership intact. Advancing a link locks
//! the link row so two concurrent advances cannot double-count.

use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, QueryBuilder, Row, Transaction};
use time::Date;
use tracing::info;
use uuid::Uuid;

use insights::model::form_date;
use insights::{
    Campaign, CampaignLeadStatus, CampaignStatus, CampaignType, LeadSummary, MembershipChange, TransitionError,
    advance_link,
};

use super::lead::{LeadError, list_leads_by_name};
use super::{decode_enum, non_blank};

const CAMPAIGN_COLUMNS: &str = "id, user_id, name, description, campaign_type, status, target_audience, \
                                start_date, end_date, total_leads, contacted_leads, responded_leads, \
                                converted_leads, created_at, updated_at";

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum CampaignError {
    #[error("campaign not found: {0}")]
    NotFound(Uuid),
    #[error("lead {lead_id} is not part of campaign {campaign_id}")]
    LinkNotFound { campaign_id: Uuid, lead_id: Uuid },
    #[error("invalid campaign: {0}")]
    Invalid(String),
    #[error(transparent)]
    Conflict(#[from] TransitionError),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<LeadError> for CampaignError {
    fn from(err: LeadError) -> Self {
        match err {
            LeadError::Database(e) => Self::Database(e),
            LeadError::NotFound(id) => Self::Invalid(format!("unknown lead: {id}")),
            LeadError::Invalid(msg) => Self::Invalid(msg),
        }
    }
}

/// Body of `POST /api/campaigns`. Status and counters are not accepted; new
/// campaigns always start as drafts with zeroed counters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewCampaign {
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub campaign_type: Option<CampaignType>,
    pub target_audience: Option<String>,
    #[serde(default, with = "form_date")]
    pub start_date: Option<Date>,
    #[serde(default, with = "form_date")]
    pub end_date: Option<Date>,
}

/// Body of `PATCH /api/campaigns/{id}`. Absent fields are left unchanged.
/// A date sent as `""` or `null` is cleared.
#[allow(clippy::option_option)]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CampaignPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub campaign_type: Option<CampaignType>,
    pub target_audience: Option<String>,
    #[serde(default, deserialize_with = "form_date::patch::deserialize")]
    pub start_date: Option<Option<Date>>,
    #[serde(default, deserialize_with = "form_date::patch::deserialize")]
    pub end_date: Option<Option<Date>>,
}

/// Every lead the user could add, plus the ones already linked.
#[derive(Debug, Clone, Serialize)]
pub struct CampaignMembers {
    pub leads: Vec<LeadSummary>,
    pub selected: Vec<Uuid>,
}

// =============================================================================
// VALIDATION
// =============================================================================

fn validate_dates(start: Option<Date>, end: Option<Date>) -> Result<(), CampaignError> {
    if let (Some(start), Some(end)) = (start, end) {
        if end < start {
            return Err(CampaignError::Invalid("end_date is before start_date".into()));
        }
    }
    Ok(())
}

impl NewCampaign {
    /// # Errors
    ///
    /// Returns [`CampaignError::Invalid`] when the name is blank or the date
    /// range is inverted.
    pub fn validate(&self) -> Result<(), CampaignError> {
        if non_blank(Some(&self.name)).is_none() {
            return Err(CampaignError::Invalid("name is required".into()));
        }
        validate_dates(self.start_date, self.end_date)
    }
}

impl CampaignPatch {
    /// # Errors
    ///
    /// Returns [`CampaignError::Invalid`] when a provided name is blank or
    /// both provided dates are inverted.
    pub fn validate(&self) -> Result<(), CampaignError> {
        if let Some(name) = &self.name {
            if non_blank(Some(name)).is_none() {
                return Err(CampaignError::Invalid("name is required".into()));
            }
        }
        let (start, end) = self.dates_over(None, None);
        validate_dates(start, end)
    }

    /// The date range after applying this patch to the stored one.
    #[must_use]
    pub fn dates_over(&self, start: Option<Date>, end: Option<Date>) -> (Option<Date>, Option<Date>) {
        (self.start_date.unwrap_or(start), self.end_date.unwrap_or(end))
    }

    /// # Errors
    ///
    /// Returns [`CampaignError::Invalid`] when the patched range over the
    /// stored dates ends before it starts.
    pub fn validate_over(
        &self,
        start: Option<Date>,
        end: Option<Date>,
    ) -> Result<(Option<Date>, Option<Date>), CampaignError> {
        let (start, end) = self.dates_over(start, end);
        validate_dates(start, end)?;
        Ok((start, end))
    }
}

// =============================================================================
// ROW MAPPING
// =============================================================================

pub(crate) fn campaign_from_row(row: &PgRow) -> Result<Campaign, sqlx::Error> {
    let campaign_type: String = row.get("campaign_type");
    let status: String = row.get("status");
    Ok(Campaign {
        id: row.get("id"),
        user_id: row.get("user_id"),
        name: row.get("name"),
        description: row.get("description"),
        campaign_type: decode_enum(&campaign_type, CampaignType::parse, "campaigns.campaign_type")?,
        status: decode_enum(&status, CampaignStatus::parse, "campaigns.status")?,
        target_audience: row.get("target_audience"),
        start_date: row.get("start_date"),
        end_date: row.get("end_date"),
        total_leads: row.get("total_leads"),
        contacted_leads: row.get("contacted_leads"),
        responded_leads: row.get("responded_leads"),
        converted_leads: row.get("converted_leads"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

// =============================================================================
// QUERIES
// =============================================================================

/// Fetch every campaign of the user, newest first.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_campaigns(pool: &PgPool, user_id: Uuid) -> Result<Vec<Campaign>, CampaignError> {
    let rows = sqlx::query(&format!(
        "SELECT {CAMPAIGN_COLUMNS} FROM campaigns WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| campaign_from_row(row).map_err(CampaignError::from))
        .collect()
}

/// Fetch a single campaign.
///
/// # Errors
///
/// Returns `NotFound` if the campaign does not exist for this user.
pub async fn get_campaign(pool: &PgPool, user_id: Uuid, campaign_id: Uuid) -> Result<Campaign, CampaignError> {
    let row = sqlx::query(&format!("SELECT {CAMPAIGN_COLUMNS} FROM campaigns WHERE id = $1 AND user_id = $2"))
        .bind(campaign_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or(CampaignError::NotFound(campaign_id))?;
    Ok(campaign_from_row(&row)?)
}

// =============================================================================
// MUTATIONS
// =============================================================================

/// Insert a new draft campaign with zeroed counters.
///
/// # Errors
///
/// Returns `Invalid` on validation failure, or a database error.
pub async fn create_campaign(pool: &PgPool, user_id: Uuid, input: NewCampaign) -> Result<Campaign, CampaignError> {
    input.validate()?;

    let row = sqlx::query(&format!(
        "INSERT INTO campaigns
             (id, user_id, name, description, campaign_type, status, target_audience, start_date, end_date)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
         RETURNING {CAMPAIGN_COLUMNS}"
    ))
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(input.name.trim())
    .bind(input.description)
    .bind(input.campaign_type.unwrap_or_default().as_str())
    .bind(CampaignStatus::Draft.as_str())
    .bind(input.target_audience)
    .bind(input.start_date)
    .bind(input.end_date)
    .fetch_one(pool)
    .await?;

    let campaign = campaign_from_row(&row)?;
    info!(%user_id, campaign_id = %campaign.id, "campaign created");
    Ok(campaign)
}

/// Apply a partial update to a campaign's descriptive fields.
///
/// The stored date range is read under a row lock so the patched range is
/// checked against what it will actually be written over.
///
/// # Errors
///
/// Returns `Invalid` on validation failure (including a patched range that
/// ends before it starts), `NotFound` if the campaign does not exist for this
/// user, or a database error.
pub async fn update_campaign(
    pool: &PgPool,
    user_id: Uuid,
    campaign_id: Uuid,
    patch: CampaignPatch,
) -> Result<Campaign, CampaignError> {
    patch.validate()?;

    let mut tx = pool.begin().await?;
    let stored = sqlx::query("SELECT start_date, end_date FROM campaigns WHERE id = $1 AND user_id = $2 FOR UPDATE")
        .bind(campaign_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(CampaignError::NotFound(campaign_id))?;
    let (start_date, end_date) = patch.validate_over(stored.get("start_date"), stored.get("end_date"))?;

    let row = sqlx::query(&format!(
        "UPDATE campaigns SET
             name = COALESCE($3, name),
             description = COALESCE($4, description),
             campaign_type = COALESCE($5, campaign_type),
             target_audience = COALESCE($6, target_audience),
             start_date = $7,
             end_date = $8,
             updated_at = now()
         WHERE id = $1 AND user_id = $2
         RETURNING {CAMPAIGN_COLUMNS}"
    ))
    .bind(campaign_id)
    .bind(user_id)
    .bind(patch.name.as_deref().map(str::trim))
    .bind(patch.description)
    .bind(patch.campaign_type.map(CampaignType::as_str))
    .bind(patch.target_audience)
    .bind(start_date)
    .bind(end_date)
    .fetch_one(&mut *tx)
    .await?;
    let campaign = campaign_from_row(&row)?;

    tx.commit().await?;

    info!(%user_id, %campaign_id, "campaign updated");
    Ok(campaign)
}

/// Set a campaign's status.
///
/// # Errors
///
/// Returns `NotFound` if the campaign does not exist for this user, or a
/// database error.
pub async fn set_campaign_status(
    pool: &PgPool,
    user_id: Uuid,
    campaign_id: Uuid,
    status: CampaignStatus,
) -> Result<Campaign, CampaignError> {
    let row = sqlx::query(&format!(
        "UPDATE campaigns SET status = $3, updated_at = now()
         WHERE id = $1 AND user_id = $2
         RETURNING {CAMPAIGN_COLUMNS}"
    ))
    .bind(campaign_id)
    .bind(user_id)
    .bind(status.as_str())
    .fetch_optional(pool)
    .await?
    .ok_or(CampaignError::NotFound(campaign_id))?;

    let campaign = campaign_from_row(&row)?;
    info!(%user_id, %campaign_id, status = %status, "campaign status updated");
    Ok(campaign)
}

/// Flip an active campaign to paused; anything else becomes active.
///
/// # Errors
///
/// Returns `NotFound` if the campaign does not exist for this user, or a
/// database error.
pub async fn toggle_campaign(pool: &PgPool, user_id: Uuid, campaign_id: Uuid) -> Result<Campaign, CampaignError> {
    let current = get_campaign(pool, user_id, campaign_id).await?;
    set_campaign_status(pool, user_id, campaign_id, current.status.toggled()).await
}

// =============================================================================
// MEMBERSHIP
// =============================================================================

async fn lock_campaign(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    campaign_id: Uuid,
) -> Result<(), CampaignError> {
    sqlx::query("SELECT id FROM campaigns WHERE id = $1 AND user_id = $2 FOR UPDATE")
        .bind(campaign_id)
        .bind(user_id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or(CampaignError::NotFound(campaign_id))?;
    Ok(())
}

async fn linked_lead_ids<'e, E>(executor: E, campaign_id: Uuid) -> Result<Vec<Uuid>, sqlx::Error>
where
    E: sqlx::PgExecutor<'e>,
{
    sqlx::query_scalar("SELECT lead_id FROM campaign_leads WHERE campaign_id = $1 ORDER BY created_at ASC, lead_id ASC")
        .bind(campaign_id)
        .fetch_all(executor)
        .await
}

/// List every lead of the user (by name) and the ids linked to the campaign.
///
/// # Errors
///
/// Returns `NotFound` if the campaign does not exist for this user, or a
/// database error.
pub async fn campaign_members(pool: &PgPool, user_id: Uuid, campaign_id: Uuid) -> Result<CampaignMembers, CampaignError> {
    get_campaign(pool, user_id, campaign_id).await?;

    let leads = list_leads_by_name(pool, user_id).await?;
    let selected = linked_lead_ids(pool, campaign_id).await?;

    Ok(CampaignMembers { leads: leads.iter().map(LeadSummary::from).collect(), selected })
}

/// Replace the campaign's lead links with `selected` and set `total_leads`.
///
/// Links that survive keep their per-link status; new links start pending.
///
/// # Errors
///
/// Returns `NotFound` if the campaign does not exist for this user,
/// `Invalid` if a selected lead is not the user's, or a database error. On
/// any error the previous membership is left untouched.
pub async fn save_membership(
    pool: &PgPool,
    user_id: Uuid,
    campaign_id: Uuid,
    selected: &[Uuid],
) -> Result<Campaign, CampaignError> {
    let mut tx = pool.begin().await?;
    lock_campaign(&mut tx, user_id, campaign_id).await?;

    let owned: Vec<Uuid> = sqlx::query_scalar("SELECT id FROM leads WHERE user_id = $1 AND id = ANY($2)")
        .bind(user_id)
        .bind(selected)
        .fetch_all(&mut *tx)
        .await?;
    if let Some(unknown) = selected.iter().find(|id| !owned.contains(id)) {
        return Err(CampaignError::Invalid(format!("unknown lead: {unknown}")));
    }

    let existing = linked_lead_ids(&mut *tx, campaign_id).await?;
    let change = MembershipChange::between(&existing, selected);
    let total = i32::try_from(change.total).map_err(|_| CampaignError::Invalid("too many leads selected".into()))?;

    if !change.to_remove.is_empty() {
        sqlx::query("DELETE FROM campaign_leads WHERE campaign_id = $1 AND lead_id = ANY($2)")
            .bind(campaign_id)
            .bind(change.to_remove.as_slice())
            .execute(&mut *tx)
            .await?;
    }

    if !change.to_add.is_empty() {
        let mut builder = QueryBuilder::<Postgres>::new("INSERT INTO campaign_leads (id, campaign_id, lead_id, status) ");
        builder.push_values(&change.to_add, |mut b, lead_id| {
            b.push_bind(Uuid::new_v4())
                .push_bind(campaign_id)
                .push_bind(*lead_id)
                .push_bind(CampaignLeadStatus::Pending.as_str());
        });
        builder.push(" ON CONFLICT (campaign_id, lead_id) DO NOTHING");
        builder.build().execute(&mut *tx).await?;
    }

    let row = sqlx::query(&format!(
        "UPDATE campaigns SET total_leads = $3, updated_at = now()
         WHERE id = $1 AND user_id = $2
         RETURNING {CAMPAIGN_COLUMNS}"
    ))
    .bind(campaign_id)
    .bind(user_id)
    .bind(total)
    .fetch_one(&mut *tx)
    .await?;
    let campaign = campaign_from_row(&row)?;

    tx.commit().await?;

    info!(
        %user_id,
        %campaign_id,
        removed = change.to_remove.len(),
        added = change.to_add.len(),
        total,
        "campaign membership saved"
    );
    Ok(campaign)
}

/// Move one campaign lead forward in the funnel and bump the campaign's
/// counters for every stage it newly reached.
///
/// # Errors
///
/// Returns `LinkNotFound` if the lead is not linked to a campaign owned by
/// the user, `Conflict` for a backwards or same-stage move, or a database
/// error.
pub async fn advance_campaign_lead(
    pool: &PgPool,
    user_id: Uuid,
    campaign_id: Uuid,
    lead_id: Uuid,
    to: CampaignLeadStatus,
) -> Result<Campaign, CampaignError> {
    let mut tx = pool.begin().await?;

    let current: String = sqlx::query_scalar(
        "SELECT cl.status
         FROM campaign_leads cl
         JOIN campaigns c ON c.id = cl.campaign_id
         WHERE cl.campaign_id = $1 AND cl.lead_id = $2 AND c.user_id = $3
         FOR UPDATE OF cl",
    )
    .bind(campaign_id)
    .bind(lead_id)
    .bind(user_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or(CampaignError::LinkNotFound { campaign_id, lead_id })?;
    let from = decode_enum(&current, CampaignLeadStatus::parse, "campaign_leads.status")?;

    let delta = advance_link(from, to)?;

    sqlx::query("UPDATE campaign_leads SET status = $3 WHERE campaign_id = $1 AND lead_id = $2")
        .bind(campaign_id)
        .bind(lead_id)
        .bind(to.as_str())
        .execute(&mut *tx)
        .await?;

    let row = sqlx::query(&format!(
        "UPDATE campaigns SET
             contacted_leads = contacted_leads + $3,
             responded_leads = responded_leads + $4,
             converted_leads = converted_leads + $5,
             updated_at = now()
         WHERE id = $1 AND user_id = $2
         RETURNING {CAMPAIGN_COLUMNS}"
    ))
    .bind(campaign_id)
    .bind(user_id)
    .bind(delta.contacted)
    .bind(delta.responded)
    .bind(delta.converted)
    .fetch_one(&mut *tx)
    .await?;
    let campaign = campaign_from_row(&row)?;

    tx.commit().await?;

    info!(%user_id, %campaign_id, %lead_id, from = %from, to = %to, "campaign lead advanced");
    Ok(campaign)
}

#[cfg(test)]
#[path = "campaign_test.rs"]
mod tests;
