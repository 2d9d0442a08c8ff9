//! Recent-activity feed merged from the newest leads and campaigns.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::macros::format_description;
use uuid::Uuid;

use crate::model::{Campaign, Lead};

/// Newest rows taken from each source before merging.
pub const PER_SOURCE: usize = 5;
/// Maximum feed length after merging.
pub const MAX_ITEMS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Lead,
    Campaign,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityItem {
    pub kind: ActivityKind,
    pub id: Uuid,
    pub title: String,
    pub status: String,
    #[serde(with = "time::serde::rfc3339")]
    pub at: OffsetDateTime,
}

fn newest<T>(items: &[T], created_at: impl Fn(&T) -> OffsetDateTime) -> Vec<&T> {
    let mut sorted: Vec<&T> = items.iter().collect();
    sorted.sort_by_key(|item| std::cmp::Reverse(created_at(item)));
    sorted.truncate(PER_SOURCE);
    sorted
}

/// Merge the newest leads and campaigns into one feed, newest first.
#[must_use]
pub fn recent_activity(leads: &[Lead], campaigns: &[Campaign]) -> Vec<ActivityItem> {
    let lead_items = newest(leads, |l| l.created_at)
        .into_iter()
        .map(|lead| ActivityItem {
            kind: ActivityKind::Lead,
            id: lead.id,
            title: format!("New lead: {}", lead.name),
            status: lead.status.as_str().to_owned(),
            at: lead.created_at,
        });
    let campaign_items = newest(campaigns, |c| c.created_at)
        .into_iter()
        .map(|campaign| ActivityItem {
            kind: ActivityKind::Campaign,
            id: campaign.id,
            title: format!("Campaign: {}", campaign.name),
            status: campaign.status.as_str().to_owned(),
            at: campaign.created_at,
        });

    let mut items: Vec<ActivityItem> = lead_items.chain(campaign_items).collect();
    items.sort_by_key(|item| std::cmp::Reverse(item.at));
    items.truncate(MAX_ITEMS);
    items
}

/// Human label for how long ago `at` was, relative to `now`.
#[must_use]
pub fn relative_label(now: OffsetDateTime, at: OffsetDateTime) -> String {
    let hours = (now - at).whole_hours();
    if hours < 1 {
        return "Just now".to_owned();
    }
    if hours < 24 {
        return format!("{hours}h ago");
    }
    if hours < 48 {
        return "Yesterday".to_owned();
    }
    at.date()
        .format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_else(|_| at.date().to_string())
}

#[cfg(test)]
#[path = "activity_test.rs"]
mod tests;
