//! Process configuration loaded from the environment.
//!
//! DESIGN
//! ======
//! Everything the server reads from the environment is resolved once at
//! startup into a `ServerConfig`. Only `DATABASE_URL` is required. `PORT`
//! must parse when set; the pool size and flags fall back to defaults when
//! missing or unparsable.

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("invalid {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub database_url: String,
    pub port: u16,
    pub db_max_connections: u32,
    /// Mark the session cookie `Secure`.
    pub cookie_secure: bool,
    /// Enables `POST /api/dev/session`. Never set in production.
    pub dev_auth_bypass: bool,
}

/// Parse a boolean flag. Accepts 1/0, true/false, yes/no, on/off.
pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl ServerConfig {
    /// Read configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `DATABASE_URL` is missing or `PORT` is not a
    /// valid port number.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// See [`ServerConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("DATABASE_URL")
            .map(|v| v.trim().to_owned())
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;
        if !database_url.starts_with("postgres://") && !database_url.starts_with("postgresql://") {
            return Err(ConfigError::Invalid { key: "DATABASE_URL", value: database_url });
        }

        let port = match lookup("PORT") {
            None => DEFAULT_PORT,
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::Invalid { key: "PORT", value: raw })?,
        };

        let db_max_connections = lookup("DB_MAX_CONNECTIONS")
            .and_then(|v| v.trim().parse::<u32>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS);

        let flag = |key: &str| lookup(key).and_then(|raw| parse_bool(&raw)).unwrap_or(false);

        Ok(Self {
            database_url,
            port,
            db_max_connections,
            cookie_secure: flag("COOKIE_SECURE"),
            dev_auth_bypass: flag("DEV_AUTH_BYPASS"),
        })
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
