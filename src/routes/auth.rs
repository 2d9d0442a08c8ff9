//! Auth routes: session extractor, current user, sign-out, dev bootstrap.

use axum::extract::{FromRef, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Serialize;
use time::Duration;

use crate::services::session;
use crate::state::AppState;

pub(crate) const COOKIE_NAME: &str = "session_token";

pub(crate) fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((COOKIE_NAME, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

pub(crate) fn cleared_session_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build((COOKIE_NAME, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(Duration::ZERO)
        .build()
}

// =============================================================================
// AUTH EXTRACTOR
// =============================================================================

/// Authenticated user extracted from the session cookie.
/// Use as a handler parameter to require authentication.
pub struct AuthUser {
    pub user: session::SessionUser,
    pub token: String,
}

impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut axum::http::request::Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar.get(COOKIE_NAME).map(Cookie::value).unwrap_or_default();
        if token.is_empty() {
            return Err(StatusCode::UNAUTHORIZED);
        }

        let app_state = AppState::from_ref(state);
        let user = session::validate_session(&app_state.pool, token)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "session validation failed");
                StatusCode::INTERNAL_SERVER_ERROR
            })?
            .ok_or(StatusCode::UNAUTHORIZED)?;

        Ok(Self { user, token: token.to_owned() })
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

/// `GET /api/auth/me`: return current user.
pub async fn me(auth: AuthUser) -> Json<session::SessionUser> {
    Json(auth.user)
}

/// `POST /api/auth/logout`: delete session, clear cookie.
pub async fn logout(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    if let Err(e) = session::delete_session(&state.pool, &auth.token).await {
        tracing::error!(error = %e, user_id = %auth.user.id, "session delete failed");
    }

    let jar = CookieJar::new().add(cleared_session_cookie(state.config.cookie_secure));
    (jar, StatusCode::NO_CONTENT)
}

#[derive(Serialize)]
pub struct DevSessionResponse {
    pub token: String,
    pub user: session::SessionUser,
}

/// `POST /api/dev/session`: open a session for the fixed dev user.
///
/// Enabled only when `DEV_AUTH_BYPASS=true`.
pub async fn dev_session(State(state): State<AppState>) -> Result<impl IntoResponse, StatusCode> {
    if !state.config.dev_auth_bypass {
        return Err(StatusCode::NOT_FOUND);
    }

    let (user, token) = session::create_dev_session(&state.pool).await.map_err(|e| {
        tracing::error!(error = %e, "dev session bootstrap failed");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    tracing::info!(user_id = %user.id, "dev session created");

    let jar = CookieJar::new().add(session_cookie(token.clone(), state.config.cookie_secure));
    Ok((jar, Json(DevSessionResponse { token, user })))
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
