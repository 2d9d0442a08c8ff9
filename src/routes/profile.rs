//! Settings routes: profile and notification preferences.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;

use insights::NotificationSettings;

use super::auth::AuthUser;
use crate::services::profile::{self, ProfileError, ProfileUpdate, ProfileView};
use crate::state::AppState;

fn profile_error_to_status(err: ProfileError) -> StatusCode {
    match err {
        ProfileError::Database(e) => {
            tracing::error!(error = %e, "profile query failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// `GET /api/profile`
pub async fn get_profile(State(state): State<AppState>, auth: AuthUser) -> Result<Json<ProfileView>, StatusCode> {
    let view = profile::get_profile(&state.pool, &auth.user)
        .await
        .map_err(profile_error_to_status)?;
    Ok(Json(view))
}

/// `PUT /api/profile`
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<ProfileUpdate>,
) -> Result<Json<ProfileView>, StatusCode> {
    let view = profile::update_profile(&state.pool, &auth.user, body)
        .await
        .map_err(profile_error_to_status)?;
    Ok(Json(view))
}

/// `PUT /api/profile/notifications`
pub async fn update_notifications(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<NotificationSettings>,
) -> Result<Json<ProfileView>, StatusCode> {
    let view = profile::update_notifications(&state.pool, &auth.user, body)
        .await
        .map_err(profile_error_to_status)?;
    Ok(Json(view))
}
