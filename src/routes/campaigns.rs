//! Campaign routes: list/stats, detail with performance, create/edit,
//! status, and lead membership.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use insights::{
    Campaign, CampaignLeadStatus, CampaignPerformance, CampaignStats, CampaignStatus, ListFilter, StatusFilter, percentage,
};

use super::auth::AuthUser;
use super::leads::StatusBody;
use crate::services::analytics;
use crate::services::campaign::{self, CampaignError, CampaignMembers, CampaignPatch, NewCampaign};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct CampaignListQuery {
    pub search: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MembersBody {
    pub lead_ids: Vec<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct CampaignDetail {
    #[serde(flatten)]
    pub campaign: Campaign,
    pub performance: CampaignPerformance,
}

impl From<Campaign> for CampaignDetail {
    fn from(campaign: Campaign) -> Self {
        let performance = CampaignPerformance::for_campaign(&campaign);
        Self { campaign, performance }
    }
}

/// One row of the campaigns table: the campaign plus its response rate as a
/// display percentage (`"0"` before anyone is contacted).
#[derive(Debug, Serialize)]
pub struct CampaignRow {
    #[serde(flatten)]
    pub campaign: Campaign,
    pub response_rate: String,
}

impl From<Campaign> for CampaignRow {
    fn from(campaign: Campaign) -> Self {
        let response_rate = percentage(i64::from(campaign.responded_leads), i64::from(campaign.contacted_leads));
        Self { campaign, response_rate }
    }
}

pub(crate) fn campaign_filter(query: &CampaignListQuery) -> Result<ListFilter<CampaignStatus>, StatusCode> {
    let status =
        StatusFilter::parse(query.status.as_deref(), CampaignStatus::parse).ok_or(StatusCode::BAD_REQUEST)?;
    Ok(ListFilter::new(query.search.as_deref().unwrap_or_default(), status))
}

pub(crate) fn campaign_error_to_status(err: CampaignError) -> StatusCode {
    match err {
        CampaignError::NotFound(_) | CampaignError::LinkNotFound { .. } => StatusCode::NOT_FOUND,
        CampaignError::Invalid(reason) => {
            tracing::debug!(%reason, "campaign rejected");
            StatusCode::BAD_REQUEST
        }
        CampaignError::Conflict(e) => {
            tracing::debug!(error = %e, "campaign lead transition refused");
            StatusCode::CONFLICT
        }
        CampaignError::Database(e) => {
            tracing::error!(error = %e, "campaign query failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// `GET /api/campaigns?search=&status=`
pub async fn list_campaigns(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<CampaignListQuery>,
) -> Result<Json<Vec<CampaignRow>>, StatusCode> {
    let filter = campaign_filter(&query)?;
    let campaigns = campaign::list_campaigns(&state.pool, auth.user.id)
        .await
        .map_err(campaign_error_to_status)?;
    Ok(Json(filter.apply(campaigns).into_iter().map(CampaignRow::from).collect()))
}

/// `GET /api/campaigns/stats`
pub async fn campaign_stats(State(state): State<AppState>, auth: AuthUser) -> Result<Json<CampaignStats>, StatusCode> {
    let stats = analytics::campaign_stats(&state.pool, auth.user.id)
        .await
        .map_err(super::analytics::analytics_error_to_status)?;
    Ok(Json(stats))
}

/// `GET /api/campaigns/:id`
pub async fn get_campaign(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(campaign_id): Path<Uuid>,
) -> Result<Json<CampaignDetail>, StatusCode> {
    let campaign = campaign::get_campaign(&state.pool, auth.user.id, campaign_id)
        .await
        .map_err(campaign_error_to_status)?;
    Ok(Json(campaign.into()))
}

/// `POST /api/campaigns`
pub async fn create_campaign(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<NewCampaign>,
) -> Result<(StatusCode, Json<Campaign>), StatusCode> {
    let campaign = campaign::create_campaign(&state.pool, auth.user.id, body)
        .await
        .map_err(campaign_error_to_status)?;
    Ok((StatusCode::CREATED, Json(campaign)))
}

/// `PATCH /api/campaigns/:id`
pub async fn update_campaign(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(campaign_id): Path<Uuid>,
    Json(body): Json<CampaignPatch>,
) -> Result<Json<Campaign>, StatusCode> {
    let campaign = campaign::update_campaign(&state.pool, auth.user.id, campaign_id, body)
        .await
        .map_err(campaign_error_to_status)?;
    Ok(Json(campaign))
}

/// `PATCH /api/campaigns/:id/status`
pub async fn set_campaign_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(campaign_id): Path<Uuid>,
    Json(body): Json<StatusBody>,
) -> Result<Json<Campaign>, StatusCode> {
    let Some(status) = CampaignStatus::parse(&body.status) else {
        return Err(StatusCode::BAD_REQUEST);
    };

    let campaign = campaign::set_campaign_status(&state.pool, auth.user.id, campaign_id, status)
        .await
        .map_err(campaign_error_to_status)?;
    Ok(Json(campaign))
}

/// `POST /api/campaigns/:id/toggle`: active ↔ paused.
pub async fn toggle_campaign(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(campaign_id): Path<Uuid>,
) -> Result<Json<Campaign>, StatusCode> {
    let campaign = campaign::toggle_campaign(&state.pool, auth.user.id, campaign_id)
        .await
        .map_err(campaign_error_to_status)?;
    Ok(Json(campaign))
}

/// `GET /api/campaigns/:id/leads`
pub async fn list_members(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(campaign_id): Path<Uuid>,
) -> Result<Json<CampaignMembers>, StatusCode> {
    let members = campaign::campaign_members(&state.pool, auth.user.id, campaign_id)
        .await
        .map_err(campaign_error_to_status)?;
    Ok(Json(members))
}

/// `PUT /api/campaigns/:id/leads`: replace membership.
pub async fn save_members(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(campaign_id): Path<Uuid>,
    Json(body): Json<MembersBody>,
) -> Result<Json<Campaign>, StatusCode> {
    let campaign = campaign::save_membership(&state.pool, auth.user.id, campaign_id, &body.lead_ids)
        .await
        .map_err(campaign_error_to_status)?;
    Ok(Json(campaign))
}

/// `PATCH /api/campaigns/:id/leads/:lead_id`: advance one link.
pub async fn advance_member(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((campaign_id, lead_id)): Path<(Uuid, Uuid)>,
    Json(body): Json<StatusBody>,
) -> Result<Json<Campaign>, StatusCode> {
    let Some(status) = CampaignLeadStatus::parse(&body.status) else {
        return Err(StatusCode::BAD_REQUEST);
    };

    let campaign = campaign::advance_campaign_lead(&state.pool, auth.user.id, campaign_id, lead_id, status)
        .await
        .map_err(campaign_error_to_status)?;
    Ok(Json(campaign))
}

#[cfg(test)]
#[path = "campaigns_test.rs"]
mod tests;
