//! Campaign membership: diffing a new lead selection against existing links,
//! and advancing a single link along the outreach funnel.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::CampaignLeadStatus;

/// Link changes needed to turn `existing` membership into `selected`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MembershipChange {
    /// Linked leads no longer selected.
    pub to_remove: Vec<Uuid>,
    /// Selected leads not yet linked.
    pub to_add: Vec<Uuid>,
    /// Size of the new selection; becomes the campaign's `total_leads`.
    pub total: usize,
}

impl MembershipChange {
    /// Compute the diff. Duplicate ids in either input are collapsed and
    /// first-seen order is kept.
    #[must_use]
    pub fn between(existing: &[Uuid], selected: &[Uuid]) -> Self {
        let selected = dedup(selected);
        let existing = dedup(existing);

        let selected_set: HashSet<Uuid> = selected.iter().copied().collect();
        let existing_set: HashSet<Uuid> = existing.iter().copied().collect();

        let to_remove = existing
            .into_iter()
            .filter(|id| !selected_set.contains(id))
            .collect();
        let to_add = selected
            .iter()
            .copied()
            .filter(|id| !existing_set.contains(id))
            .collect();

        Self { to_remove, to_add, total: selected.len() }
    }

    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.to_remove.is_empty() && self.to_add.is_empty()
    }
}

fn dedup(ids: &[Uuid]) -> Vec<Uuid> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

// =============================================================================
// LINK PROGRESS
// =============================================================================

/// Increments to apply to a campaign's counters after a link advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CounterDelta {
    pub contacted: i32,
    pub responded: i32,
    pub converted: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("campaign lead cannot move from {from} to {to}")]
    NotForward { from: CampaignLeadStatus, to: CampaignLeadStatus },
}

/// Advance a link from `from` to `to`. Every stage passed on the way counts
/// once, so pending → responded bumps both contacted and responded.
///
/// # Errors
///
/// Returns [`TransitionError::NotForward`] unless `to` is strictly later in
/// the funnel than `from`.
pub fn advance_link(from: CampaignLeadStatus, to: CampaignLeadStatus) -> Result<CounterDelta, TransitionError> {
    if to <= from {
        return Err(TransitionError::NotForward { from, to });
    }

    let crosses = |stage: CampaignLeadStatus| i32::from(from < stage && stage <= to);
    Ok(CounterDelta {
        contacted: crosses(CampaignLeadStatus::Contacted),
        responded: crosses(CampaignLeadStatus::Responded),
        converted: crosses(CampaignLeadStatus::Converted),
    })
}

#[cfg(test)]
#[path = "membership_test.rs"]
mod tests;
