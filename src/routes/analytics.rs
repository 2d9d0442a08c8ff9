//! Aggregation routes: analytics page and dashboard summary.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;

use insights::DashboardSummary;

use super::auth::AuthUser;
use super::campaigns::campaign_error_to_status;
use super::leads::lead_error_to_status;
use crate::services::analytics::{self, AnalyticsError, AnalyticsReport};
use crate::state::AppState;

pub(crate) fn analytics_error_to_status(err: AnalyticsError) -> StatusCode {
    match err {
        AnalyticsError::Lead(e) => lead_error_to_status(e),
        AnalyticsError::Campaign(e) => campaign_error_to_status(e),
    }
}

/// `GET /api/analytics`
pub async fn analytics(State(state): State<AppState>, auth: AuthUser) -> Result<Json<AnalyticsReport>, StatusCode> {
    let report = analytics::analytics_report(&state.pool, auth.user.id)
        .await
        .map_err(analytics_error_to_status)?;
    Ok(Json(report))
}

/// `GET /api/dashboard`
pub async fn dashboard(State(state): State<AppState>, auth: AuthUser) -> Result<Json<DashboardSummary>, StatusCode> {
    let summary = analytics::dashboard_summary(&state.pool, auth.user.id)
        .await
        .map_err(analytics_error_to_status)?;
    Ok(Json(summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::campaign::CampaignError;
    use crate::services::lead::LeadError;
    use uuid::Uuid;

    #[test]
    fn analytics_errors_delegate_to_source_mapping() {
        let db = AnalyticsError::from(LeadError::Database(sqlx::Error::RowNotFound));
        assert_eq!(analytics_error_to_status(db), StatusCode::INTERNAL_SERVER_ERROR);

        let missing = AnalyticsError::from(CampaignError::NotFound(Uuid::nil()));
        assert_eq!(analytics_error_to_status(missing), StatusCode::NOT_FOUND);
    }
}
