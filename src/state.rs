//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the database pool and the resolved configuration. Every request is
//! independent, so there is no in-memory cache to keep coherent with
//! Postgres.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ServerConfig;

/// Clone is required by Axum; the pool is reference-counted and the config
/// sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    #[must_use]
    pub fn new(pool: PgPool, config: ServerConfig) -> Self {
        Self { pool, config: Arc::new(config) }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
