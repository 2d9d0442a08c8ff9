//! Lead routes: paged list, detail, create/edit, status.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;
use uuid::Uuid;

use insights::{Lead, LeadStatus, ListFilter, StatusFilter};

use super::auth::AuthUser;
use crate::services::lead::{self, LeadError, LeadPage, LeadPatch, NewLead};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct LeadListQuery {
    pub offset: Option<i64>,
    pub search: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatusBody {
    pub status: String,
}

pub(crate) fn lead_filter(query: &LeadListQuery) -> Result<ListFilter<LeadStatus>, StatusCode> {
    let status = StatusFilter::parse(query.status.as_deref(), LeadStatus::parse).ok_or(StatusCode::BAD_REQUEST)?;
    Ok(ListFilter::new(query.search.as_deref().unwrap_or_default(), status))
}

pub(crate) fn lead_error_to_status(err: LeadError) -> StatusCode {
    match err {
        LeadError::NotFound(_) => StatusCode::NOT_FOUND,
        LeadError::Invalid(reason) => {
            tracing::debug!(%reason, "lead rejected");
            StatusCode::BAD_REQUEST
        }
        LeadError::Database(e) => {
            tracing::error!(error = %e, "lead query failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// `GET /api/leads?offset=&search=&status=`: one page, newest first.
///
/// Search and status narrow the fetched page only; paging state reflects
/// what was fetched.
pub async fn list_leads(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<LeadListQuery>,
) -> Result<Json<LeadPage>, StatusCode> {
    let filter = lead_filter(&query)?;
    let mut page = lead::list_leads(&state.pool, auth.user.id, query.offset.unwrap_or(0))
        .await
        .map_err(lead_error_to_status)?;

    if !filter.is_noop() {
        page.leads = filter.apply(page.leads);
    }
    Ok(Json(page))
}

/// `GET /api/leads/:id`
pub async fn get_lead(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(lead_id): Path<Uuid>,
) -> Result<Json<Lead>, StatusCode> {
    let lead = lead::get_lead(&state.pool, auth.user.id, lead_id)
        .await
        .map_err(lead_error_to_status)?;
    Ok(Json(lead))
}

/// `POST /api/leads`
pub async fn create_lead(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<NewLead>,
) -> Result<(StatusCode, Json<Lead>), StatusCode> {
    let lead = lead::create_lead(&state.pool, auth.user.id, body)
        .await
        .map_err(lead_error_to_status)?;
    Ok((StatusCode::CREATED, Json(lead)))
}

/// `PATCH /api/leads/:id`
pub async fn update_lead(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(lead_id): Path<Uuid>,
    Json(body): Json<LeadPatch>,
) -> Result<Json<Lead>, StatusCode> {
    let lead = lead::update_lead(&state.pool, auth.user.id, lead_id, body)
        .await
        .map_err(lead_error_to_status)?;
    Ok(Json(lead))
}

/// `PATCH /api/leads/:id/status`
pub async fn update_lead_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(lead_id): Path<Uuid>,
    Json(body): Json<StatusBody>,
) -> Result<Json<Lead>, StatusCode> {
    let Some(status) = LeadStatus::parse(&body.status) else {
        return Err(StatusCode::BAD_REQUEST);
    };

    let lead = lead::update_lead_status(&state.pool, auth.user.id, lead_id, status)
        .await
        .map_err(lead_error_to_status)?;
    Ok(Json(lead))
}

#[cfg(test)]
#[path = "leads_test.rs"]
mod tests;
