//! List filtering: case-insensitive search plus an optional status match.
//!
//! DESIGN
//! ======
//! Filters are recomputed from scratch against the full fetched list on every
//! change. Nothing is incremental, so the filter holds no state beyond the
//! search term and status selection.

use crate::model::{Campaign, CampaignStatus, Lead, LeadStatus};

/// Rows that can be narrowed by search text and status.
pub trait Filterable {
    type Status: Copy + Eq;

    fn status(&self) -> Self::Status;

    /// Text fields the search term is matched against. Absent optional
    /// fields are simply left out.
    fn search_fields(&self) -> Vec<&str>;
}

impl Filterable for Lead {
    type Status = LeadStatus;

    fn status(&self) -> LeadStatus {
        self.status
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str(), self.email.as_str()];
        if let Some(company) = self.company.as_deref() {
            fields.push(company);
        }
        fields
    }
}

impl Filterable for Campaign {
    type Status = CampaignStatus;

    fn status(&self) -> CampaignStatus {
        self.status
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str()];
        if let Some(description) = self.description.as_deref() {
            fields.push(description);
        }
        fields
    }
}

/// Status selection: everything, or exactly one value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter<S> {
    All,
    Only(S),
}

impl<S> Default for StatusFilter<S> {
    fn default() -> Self {
        Self::All
    }
}

impl<S: Copy + Eq> StatusFilter<S> {
    /// Parse a query value. Missing, empty, and `"all"` select everything;
    /// anything else goes through `parse_status`.
    ///
    /// Returns `None` when the value is not a known status.
    pub fn parse(raw: Option<&str>, parse_status: impl Fn(&str) -> Option<S>) -> Option<Self> {
        match raw.map(str::trim) {
            None | Some("" | "all") => Some(Self::All),
            Some(value) => parse_status(value).map(Self::Only),
        }
    }

    #[must_use]
    pub fn allows(&self, status: S) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => *wanted == status,
        }
    }
}

/// Search term plus status selection for one list view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListFilter<S> {
    needle: String,
    status: StatusFilter<S>,
}

impl<S> Default for ListFilter<S> {
    fn default() -> Self {
        Self { needle: String::new(), status: StatusFilter::All }
    }
}

impl<S: Copy + Eq> ListFilter<S> {
    #[must_use]
    pub fn new(search: &str, status: StatusFilter<S>) -> Self {
        Self { needle: search.to_lowercase(), status }
    }

    #[must_use]
    pub fn status(&self) -> StatusFilter<S> {
        self.status
    }

    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.needle.is_empty() && self.status == StatusFilter::All
    }

    #[must_use]
    pub fn matches<T: Filterable<Status = S>>(&self, item: &T) -> bool {
        if !self.status.allows(item.status()) {
            return false;
        }
        if self.needle.is_empty() {
            return true;
        }
        item.search_fields()
            .into_iter()
            .any(|field| field.to_lowercase().contains(&self.needle))
    }

    /// Keep the matching rows, preserving their order.
    #[must_use]
    pub fn apply<T: Filterable<Status = S>>(&self, items: Vec<T>) -> Vec<T> {
        if self.is_noop() {
            return items;
        }
        items.into_iter().filter(|item| self.matches(item)).collect()
    }
}

#[cfg(test)]
#[path = "filter_test.rs"]
mod tests;
