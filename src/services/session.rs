//! Session management.
//!
//! ARCHITECTURE
//! ============
//! HTTP auth uses long-lived opaque session tokens stored in Postgres and
//! carried in an HttpOnly cookie. Sign-in flows live outside this service;
//! it only validates, creates, and revokes sessions, plus a development
//! bootstrap that provisions a fixed user.

use std::fmt::Write;

use rand::Rng;
use sqlx::{PgPool, Row};
use uuid::Uuid;

/// Fixed identity used by the development session bootstrap.
pub const DEV_USER_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_f00d);
pub const DEV_USER_EMAIL: &str = "dev@leadboard.local";
const DEV_USER_NAME: &str = "Dev User";

pub(crate) fn bytes_to_hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(s, "{b:02x}");
    }
    s
}

/// Generate a cryptographically random 32-byte hex token.
#[must_use]
pub fn generate_token() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    bytes_to_hex(&bytes)
}

/// User row returned from session validation.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SessionUser {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
}

/// Create a session for the given user, returning the token.
pub async fn create_session(pool: &PgPool, user_id: Uuid) -> Result<String, sqlx::Error> {
    let token = generate_token();
    sqlx::query("INSERT INTO sessions (token, user_id) VALUES ($1, $2)")
        .bind(&token)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(token)
}

/// Validate a session token and return the associated user.
pub async fn validate_session(pool: &PgPool, token: &str) -> Result<Option<SessionUser>, sqlx::Error> {
    let row = sqlx::query(
        r"SELECT u.id, u.email, u.name
          FROM sessions s
          JOIN users u ON u.id = s.user_id
          WHERE s.token = $1 AND s.expires_at > now()",
    )
    .bind(token)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| SessionUser { id: r.get("id"), email: r.get("email"), name: r.get("name") }))
}

/// Delete a session by token.
pub async fn delete_session(pool: &PgPool, token: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM sessions WHERE token = $1")
        .bind(token)
        .execute(pool)
        .await?;
    Ok(())
}

/// Upsert the development user and open a session for it.
pub async fn create_dev_session(pool: &PgPool) -> Result<(SessionUser, String), sqlx::Error> {
    sqlx::query(
        "INSERT INTO users (id, email, name) VALUES ($1, $2, $3)
         ON CONFLICT (id) DO UPDATE SET email = EXCLUDED.email, name = EXCLUDED.name",
    )
    .bind(DEV_USER_ID)
    .bind(DEV_USER_EMAIL)
    .bind(DEV_USER_NAME)
    .execute(pool)
    .await?;

    let token = create_session(pool, DEV_USER_ID).await?;
    let user = SessionUser { id: DEV_USER_ID, email: DEV_USER_EMAIL.to_owned(), name: Some(DEV_USER_NAME.to_owned()) };
    Ok((user, token))
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
