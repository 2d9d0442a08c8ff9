//! Lead service: paged listing, detail, create/edit, and status changes.
//!
//! DESIGN
//! ======
//! Every statement is scoped by `user_id`, so a lead owned by someone else
//! is indistinguishable from a missing one (`NotFound`). Listing is paged in
//! fixed windows ordered newest first; the caller decides whether to ask for
//! the next window from `has_more`.
//!
//! Optional text fields are stored exactly as sent, empty strings included.
//! Only `name` and `email` are validated.

use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::info;
use uuid::Uuid;

use insights::{Lead, LeadStatus};

use super::{decode_enum, non_blank};

/// Rows returned per page by [`list_leads`].
pub const LEAD_PAGE_SIZE: i64 = 50;

const LEAD_COLUMNS: &str = "id, user_id, name, email, company, position, phone, linkedin_url, source, notes, \
                            status, score, last_contacted, created_at, updated_at";

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum LeadError {
    #[error("lead not found: {0}")]
    NotFound(Uuid),
    #[error("invalid lead: {0}")]
    Invalid(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Body of `POST /api/leads`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewLead {
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub position: Option<String>,
    pub phone: Option<String>,
    pub linkedin_url: Option<String>,
    pub source: Option<String>,
    pub notes: Option<String>,
    pub status: Option<LeadStatus>,
    pub score: Option<i32>,
}

/// Body of `PATCH /api/leads/{id}`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeadPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub company: Option<String>,
    pub position: Option<String>,
    pub phone: Option<String>,
    pub linkedin_url: Option<String>,
    pub source: Option<String>,
    pub notes: Option<String>,
    pub status: Option<LeadStatus>,
    pub score: Option<i32>,
}

/// One window of the newest-first lead list.
#[derive(Debug, Clone, Serialize)]
pub struct LeadPage {
    pub leads: Vec<Lead>,
    pub next_offset: i64,
    /// True when the window came back full, so another fetch may return more.
    pub has_more: bool,
}

// =============================================================================
// VALIDATION
// =============================================================================

/// Accepts `local@domain` with no whitespace and a single `@`.
#[must_use]
pub fn is_email_shaped(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

fn validate_name(name: &str) -> Result<(), LeadError> {
    if non_blank(Some(name)).is_none() {
        return Err(LeadError::Invalid("name is required".into()));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), LeadError> {
    let Some(email) = non_blank(Some(email)) else {
        return Err(LeadError::Invalid("email is required".into()));
    };
    if !is_email_shaped(email) {
        return Err(LeadError::Invalid(format!("email is not valid: {email}")));
    }
    Ok(())
}

impl NewLead {
    /// # Errors
    ///
    /// Returns [`LeadError::Invalid`] when name or email is missing or the
    /// email is malformed.
    pub fn validate(&self) -> Result<(), LeadError> {
        validate_name(&self.name)?;
        validate_email(&self.email)
    }
}

impl LeadPatch {
    /// # Errors
    ///
    /// Returns [`LeadError::Invalid`] when a provided name or email would
    /// fail the create-time checks.
    pub fn validate(&self) -> Result<(), LeadError> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(email) = &self.email {
            validate_email(email)?;
        }
        Ok(())
    }
}

// =============================================================================
// ROW MAPPING
// =============================================================================

pub(crate) fn lead_from_row(row: &PgRow) -> Result<Lead, sqlx::Error> {
    let status: String = row.get("status");
    Ok(Lead {
        id: row.get("id"),
        user_id: row.get("user_id"),
        name: row.get("name"),
        email: row.get("email"),
        company: row.get("company"),
        position: row.get("position"),
        phone: row.get("phone"),
        linkedin_url: row.get("linkedin_url"),
        source: row.get("source"),
        notes: row.get("notes"),
        status: decode_enum(&status, LeadStatus::parse, "leads.status")?,
        score: row.get("score"),
        last_contacted: row.get("last_contacted"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

fn leads_from_rows(rows: &[PgRow]) -> Result<Vec<Lead>, LeadError> {
    rows.iter()
        .map(|row| lead_from_row(row).map_err(LeadError::from))
        .collect()
}

// =============================================================================
// QUERIES
// =============================================================================

/// Fetch one page of leads, newest first, starting at `offset`.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_leads(pool: &PgPool, user_id: Uuid, offset: i64) -> Result<LeadPage, LeadError> {
    let offset = offset.max(0);
    let rows = sqlx::query(&format!(
        "SELECT {LEAD_COLUMNS} FROM leads
         WHERE user_id = $1
         ORDER BY created_at DESC, id DESC
         LIMIT $2 OFFSET $3"
    ))
    .bind(user_id)
    .bind(LEAD_PAGE_SIZE)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let leads = leads_from_rows(&rows)?;
    Ok(page_from(leads, offset))
}

pub(crate) fn page_from(leads: Vec<Lead>, offset: i64) -> LeadPage {
    let fetched = i64::try_from(leads.len()).unwrap_or(i64::MAX);
    LeadPage { next_offset: offset.saturating_add(fetched), has_more: fetched == LEAD_PAGE_SIZE, leads }
}

/// Fetch every lead of the user, newest first. Used by aggregation.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_all_leads(pool: &PgPool, user_id: Uuid) -> Result<Vec<Lead>, LeadError> {
    let rows = sqlx::query(&format!(
        "SELECT {LEAD_COLUMNS} FROM leads WHERE user_id = $1 ORDER BY created_at DESC, id DESC"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    leads_from_rows(&rows)
}

/// Fetch every lead of the user ordered by name, for membership pickers.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_leads_by_name(pool: &PgPool, user_id: Uuid) -> Result<Vec<Lead>, LeadError> {
    let rows = sqlx::query(&format!("SELECT {LEAD_COLUMNS} FROM leads WHERE user_id = $1 ORDER BY name ASC, id ASC"))
        .bind(user_id)
        .fetch_all(pool)
        .await?;
    leads_from_rows(&rows)
}

/// Count the user's leads without loading them.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn count_leads(pool: &PgPool, user_id: Uuid) -> Result<i64, LeadError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM leads WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Fetch a single lead.
///
/// # Errors
///
/// Returns `NotFound` if the lead does not exist for this user.
pub async fn get_lead(pool: &PgPool, user_id: Uuid, lead_id: Uuid) -> Result<Lead, LeadError> {
    let row = sqlx::query(&format!("SELECT {LEAD_COLUMNS} FROM leads WHERE id = $1 AND user_id = $2"))
        .bind(lead_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or(LeadError::NotFound(lead_id))?;
    Ok(lead_from_row(&row)?)
}

// =============================================================================
// MUTATIONS
// =============================================================================

/// Insert a new lead owned by `user_id`.
///
/// # Errors
///
/// Returns `Invalid` on validation failure, or a database error.
pub async fn create_lead(pool: &PgPool, user_id: Uuid, input: NewLead) -> Result<Lead, LeadError> {
    input.validate()?;

    let row = sqlx::query(&format!(
        "INSERT INTO leads
             (id, user_id, name, email, company, position, phone, linkedin_url, source, notes, status, score)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
         RETURNING {LEAD_COLUMNS}"
    ))
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(input.name.trim())
    .bind(input.email.trim())
    .bind(input.company)
    .bind(input.position)
    .bind(input.phone)
    .bind(input.linkedin_url)
    .bind(input.source)
    .bind(input.notes)
    .bind(input.status.unwrap_or_default().as_str())
    .bind(input.score.unwrap_or(0))
    .fetch_one(pool)
    .await?;

    let lead = lead_from_row(&row)?;
    info!(%user_id, lead_id = %lead.id, "lead created");
    Ok(lead)
}

/// Apply a partial update to a lead.
///
/// # Errors
///
/// Returns `Invalid` on validation failure, `NotFound` if the lead does not
/// exist for this user, or a database error.
pub async fn update_lead(pool: &PgPool, user_id: Uuid, lead_id: Uuid, patch: LeadPatch) -> Result<Lead, LeadError> {
    patch.validate()?;

    let row = sqlx::query(&format!(
        "UPDATE leads SET
             name = COALESCE($3, name),
             email = COALESCE($4, email),
             company = COALESCE($5, company),
             position = COALESCE($6, position),
             phone = COALESCE($7, phone),
             linkedin_url = COALESCE($8, linkedin_url),
             source = COALESCE($9, source),
             notes = COALESCE($10, notes),
             status = COALESCE($11, status),
             score = COALESCE($12, score),
             updated_at = now()
         WHERE id = $1 AND user_id = $2
         RETURNING {LEAD_COLUMNS}"
    ))
    .bind(lead_id)
    .bind(user_id)
    .bind(patch.name.as_deref().map(str::trim))
    .bind(patch.email.as_deref().map(str::trim))
    .bind(patch.company)
    .bind(patch.position)
    .bind(patch.phone)
    .bind(patch.linkedin_url)
    .bind(patch.source)
    .bind(patch.notes)
    .bind(patch.status.map(LeadStatus::as_str))
    .bind(patch.score)
    .fetch_optional(pool)
    .await?
    .ok_or(LeadError::NotFound(lead_id))?;

    let lead = lead_from_row(&row)?;
    info!(%user_id, %lead_id, "lead updated");
    Ok(lead)
}

/// Set a lead's status. Moving to `contacted` stamps `last_contacted`.
///
/// # Errors
///
/// Returns `NotFound` if the lead does not exist for this user, or a
/// database error.
pub async fn update_lead_status(
    pool: &PgPool,
    user_id: Uuid,
    lead_id: Uuid,
    status: LeadStatus,
) -> Result<Lead, LeadError> {
    let row = sqlx::query(&format!(
        "UPDATE leads SET
             status = $3,
             last_contacted = CASE WHEN $4 THEN now() ELSE last_contacted END,
             updated_at = now()
         WHERE id = $1 AND user_id = $2
         RETURNING {LEAD_COLUMNS}"
    ))
    .bind(lead_id)
    .bind(user_id)
    .bind(status.as_str())
    .bind(status == LeadStatus::Contacted)
    .fetch_optional(pool)
    .await?
    .ok_or(LeadError::NotFound(lead_id))?;

    let lead = lead_from_row(&row)?;
    info!(%user_id, %lead_id, status = %status, "lead status updated");
    Ok(lead)
}

#[cfg(test)]
#[path = "lead_test.rs"]
mod tests;
