//! Account settings: profile fields and notification preferences.
//!
//! DESIGN
//! ======
//! A profile row is optional. Until the user saves settings, reads fall back
//! to a default built from the session user. The profile email always
//! mirrors the session email; clients cannot change it here.

use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::info;

use insights::profile::initials;
use insights::{NotificationSettings, Profile};

use super::session::SessionUser;

const PROFILE_COLUMNS: &str = "id, email, full_name, avatar_url, email_notifications, campaign_updates, \
                               lead_notifications, weekly_reports, updated_at";

#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Body of `PUT /api/profile`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
}

/// Profile plus derived display fields.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileView {
    #[serde(flatten)]
    pub profile: Profile,
    pub initials: String,
}

impl ProfileView {
    #[must_use]
    pub fn new(profile: Profile) -> Self {
        let initials = initials(profile.full_name.as_deref(), &profile.email);
        Self { profile, initials }
    }
}

/// Profile shown before the user has saved any settings.
#[must_use]
pub fn default_profile(user: &SessionUser) -> Profile {
    Profile {
        id: user.id,
        email: user.email.clone(),
        full_name: user.name.clone(),
        avatar_url: None,
        notifications: NotificationSettings::default(),
        updated_at: None,
    }
}

fn profile_from_row(row: &PgRow) -> Profile {
    Profile {
        id: row.get("id"),
        email: row.get("email"),
        full_name: row.get("full_name"),
        avatar_url: row.get("avatar_url"),
        notifications: NotificationSettings {
            email_notifications: row.get("email_notifications"),
            campaign_updates: row.get("campaign_updates"),
            lead_notifications: row.get("lead_notifications"),
            weekly_reports: row.get("weekly_reports"),
        },
        updated_at: row.get("updated_at"),
    }
}

/// Load the user's profile, or the default if none was saved.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn get_profile(pool: &PgPool, user: &SessionUser) -> Result<ProfileView, ProfileError> {
    let row = sqlx::query(&format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = $1"))
        .bind(user.id)
        .fetch_optional(pool)
        .await?;

    let profile = row.as_ref().map_or_else(|| default_profile(user), profile_from_row);
    Ok(ProfileView::new(profile))
}

/// Upsert name and avatar. The email is taken from the session.
///
/// # Errors
///
/// Returns a database error if the upsert fails.
pub async fn update_profile(pool: &PgPool, user: &SessionUser, update: ProfileUpdate) -> Result<ProfileView, ProfileError> {
    let row = sqlx::query(&format!(
        "INSERT INTO profiles (id, email, full_name, avatar_url)
         VALUES ($1, $2, $3, $4)
         ON CONFLICT (id) DO UPDATE SET
             email = EXCLUDED.email,
             full_name = EXCLUDED.full_name,
             avatar_url = EXCLUDED.avatar_url,
             updated_at = now()
         RETURNING {PROFILE_COLUMNS}"
    ))
    .bind(user.id)
    .bind(&user.email)
    .bind(update.full_name)
    .bind(update.avatar_url)
    .fetch_one(pool)
    .await?;

    info!(user_id = %user.id, "profile updated");
    Ok(ProfileView::new(profile_from_row(&row)))
}

/// Upsert the four notification flags.
///
/// # Errors
///
/// Returns a database error if the upsert fails.
pub async fn update_notifications(
    pool: &PgPool,
    user: &SessionUser,
    settings: NotificationSettings,
) -> Result<ProfileView, ProfileError> {
    let row = sqlx::query(&format!(
        "INSERT INTO profiles
             (id, email, full_name, email_notifications, campaign_updates, lead_notifications, weekly_reports)
         VALUES ($1, $2, $3, $4, $5, $6, $7)
         ON CONFLICT (id) DO UPDATE SET
             email_notifications = EXCLUDED.email_notifications,
             campaign_updates = EXCLUDED.campaign_updates,
             lead_notifications = EXCLUDED.lead_notifications,
             weekly_reports = EXCLUDED.weekly_reports,
             updated_at = now()
         RETURNING {PROFILE_COLUMNS}"
    ))
    .bind(user.id)
    .bind(&user.email)
    .bind(&user.name)
    .bind(settings.email_notifications)
    .bind(settings.campaign_updates)
    .bind(settings.lead_notifications)
    .bind(settings.weekly_reports)
    .fetch_one(pool)
    .await?;

    info!(user_id = %user.id, "notification settings updated");
    Ok(ProfileView::new(profile_from_row(&row)))
}

#[cfg(test)]
#[path = "profile_test.rs"]
mod tests;
