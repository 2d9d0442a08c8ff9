//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the JSON API under `/api` plus a health probe into a
//! single Axum router. Every `/api` route except the dev bootstrap requires a
//! session cookie, enforced per handler by the `AuthUser` extractor.

pub mod analytics;
pub mod auth;
pub mod campaigns;
pub mod leads;
pub mod profile;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, patch, post, put};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/auth/me", get(auth::me))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/dev/session", post(auth::dev_session))
        .route("/api/leads", get(leads::list_leads).post(leads::create_lead))
        .route("/api/leads/{id}", get(leads::get_lead).patch(leads::update_lead))
        .route("/api/leads/{id}/status", patch(leads::update_lead_status))
        .route(
            "/api/campaigns",
            get(campaigns::list_campaigns).post(campaigns::create_campaign),
        )
        .route("/api/campaigns/stats", get(campaigns::campaign_stats))
        .route(
            "/api/campaigns/{id}",
            get(campaigns::get_campaign).patch(campaigns::update_campaign),
        )
        .route("/api/campaigns/{id}/status", patch(campaigns::set_campaign_status))
        .route("/api/campaigns/{id}/toggle", post(campaigns::toggle_campaign))
        .route(
            "/api/campaigns/{id}/leads",
            get(campaigns::list_members).put(campaigns::save_members),
        )
        .route("/api/campaigns/{id}/leads/{lead_id}", patch(campaigns::advance_member))
        .route("/api/analytics", get(analytics::analytics))
        .route("/api/dashboard", get(analytics::dashboard))
        .route("/api/profile", get(profile::get_profile).put(profile::update_profile))
        .route("/api/profile/notifications", put(profile::update_notifications))
        .route("/healthz", get(healthz))
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
