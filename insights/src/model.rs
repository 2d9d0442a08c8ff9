//! Entity models shared by the server and the CLI.
//!
//! DESIGN
//! ======
//! Enumerations are stored as lowercase text in Postgres and on the wire.
//! `parse` returns `None` for unknown text so callers decide whether that is
//! a client error or corrupt data. Owner references (`user_id`) are set on
//! insert and never appear in any update payload.

use std::fmt;

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

// =============================================================================
// LEAD
// =============================================================================

/// Pipeline position of a lead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    #[default]
    New,
    Contacted,
    Qualified,
    Converted,
    Lost,
}

impl LeadStatus {
    pub const ALL: [Self; 5] = [Self::New, Self::Contacted, Self::Qualified, Self::Converted, Self::Lost];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Contacted => "contacted",
            Self::Qualified => "qualified",
            Self::Converted => "converted",
            Self::Lost => "lost",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == raw)
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A prospective contact owned by one user. Mirrors the `leads` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub position: Option<String>,
    pub phone: Option<String>,
    pub linkedin_url: Option<String>,
    pub source: Option<String>,
    pub notes: Option<String>,
    pub status: LeadStatus,
    pub score: i32,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub last_contacted: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Narrow lead projection used by the campaign membership picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub company: Option<String>,
    pub status: LeadStatus,
}

impl From<&Lead> for LeadSummary {
    fn from(lead: &Lead) -> Self {
        Self {
            id: lead.id,
            name: lead.name.clone(),
            email: lead.email.clone(),
            company: lead.company.clone(),
            status: lead.status,
        }
    }
}

// =============================================================================
// CAMPAIGN
// =============================================================================

/// Outreach channel of a campaign.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignType {
    #[default]
    Email,
    Linkedin,
    ColdCall,
}

impl CampaignType {
    pub const ALL: [Self; 3] = [Self::Email, Self::Linkedin, Self::ColdCall];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Linkedin => "linkedin",
            Self::ColdCall => "cold_call",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == raw)
    }
}

impl fmt::Display for CampaignType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignStatus {
    Draft,
    Active,
    Paused,
    Completed,
}

impl CampaignStatus {
    pub const ALL: [Self; 4] = [Self::Draft, Self::Active, Self::Paused, Self::Completed];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Completed => "completed",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == raw)
    }

    /// Status after the list view's play/pause action: active pauses,
    /// anything else becomes active.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Active => Self::Paused,
            _ => Self::Active,
        }
    }
}

impl fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outreach campaign. Mirrors the `campaigns` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub campaign_type: CampaignType,
    pub status: CampaignStatus,
    pub target_audience: Option<String>,
    #[serde(default, with = "form_date")]
    pub start_date: Option<Date>,
    #[serde(default, with = "form_date")]
    pub end_date: Option<Date>,
    pub total_leads: i32,
    pub contacted_leads: i32,
    pub responded_leads: i32,
    pub converted_leads: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

// =============================================================================
// CAMPAIGN LEAD
// =============================================================================

/// Per-link progress of a lead inside one campaign. Ordered: a link only
/// ever moves towards `Converted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignLeadStatus {
    Pending,
    Contacted,
    Responded,
    Converted,
}

impl CampaignLeadStatus {
    pub const ALL: [Self; 4] = [Self::Pending, Self::Contacted, Self::Responded, Self::Converted];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Contacted => "contacted",
            Self::Responded => "responded",
            Self::Converted => "converted",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == raw)
    }
}

impl fmt::Display for CampaignLeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignLead {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub lead_id: Uuid,
    pub status: CampaignLeadStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

// =============================================================================
// PROFILE
// =============================================================================

/// Notification preferences stored alongside the profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct NotificationSettings {
    pub email_notifications: bool,
    pub campaign_updates: bool,
    pub lead_notifications: bool,
    pub weekly_reports: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self { email_notifications: true, campaign_updates: true, lead_notifications: false, weekly_reports: true }
    }
}

/// Display identity of the signed-in user. `id` equals the user id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub email: String,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub notifications: NotificationSettings,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
}

// =============================================================================
// FORM DATES
// =============================================================================

/// `YYYY-MM-DD` dates as sent by date inputs. An empty string means unset.
pub mod form_date {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::Date;
    use time::macros::format_description;

    /// Parse a form date, treating blank input as no date.
    ///
    /// # Errors
    ///
    /// Returns a parse error when non-blank input is not `YYYY-MM-DD`.
    pub fn parse(raw: &str) -> Result<Option<Date>, time::error::Parse> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        Date::parse(trimmed, format_description!("[year]-[month]-[day]")).map(Some)
    }

    /// Render a date as `YYYY-MM-DD`.
    ///
    /// # Errors
    ///
    /// Returns a format error for years outside four digits.
    pub fn format(date: Date) -> Result<String, time::error::Format> {
        date.format(format_description!("[year]-[month]-[day]"))
    }

    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(value: &Option<Date>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(date) => {
                let text = format(*date).map_err(serde::ser::Error::custom)?;
                serializer.serialize_some(&text)
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Date>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(text) => parse(&text).map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }

    /// Form dates in partial updates. Pair with `#[serde(default)]`: an
    /// absent key stays `None` (keep the stored date), `null` or `""` become
    /// `Some(None)` (clear it), and a date becomes `Some(Some(date))`.
    pub mod patch {
        use serde::Deserializer;
        use time::Date;

        #[allow(clippy::option_option)]
        pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Option<Date>>, D::Error> {
            super::deserialize(deserializer).map(Some)
        }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================


#[cfg(test)]
#[path = "model_test.rs"]
mod tests;
