//! Domain models and derivation helpers for Leadboard.
//!
//! This crate is I/O free so the server, the CLI, and tests can share the
//! same list filtering, rate math, and chart bucketing without a database.

pub mod activity;
pub mod filter;
pub mod membership;
pub mod metrics;
pub mod model;
pub mod monthly;
pub mod profile;

pub use activity::{ActivityItem, ActivityKind, recent_activity, relative_label};
pub use filter::{Filterable, ListFilter, StatusFilter};
pub use membership::{CounterDelta, MembershipChange, TransitionError, advance_link};
pub use metrics::{AnalyticsOverview, CampaignPerformance, CampaignStats, DashboardSummary, percentage};
pub use model::{
    Campaign, CampaignLead, CampaignLeadStatus, CampaignStatus, CampaignType, Lead, LeadStatus, LeadSummary,
    NotificationSettings, Profile,
};
pub use monthly::{CampaignMonth, LeadMonth, MonthKey, bucket_campaigns, bucket_leads};
