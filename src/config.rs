use std::time::Duration;

use thiserror::Error;

/// Environment-backed runtime configuration.
///
/// Loaded once at startup; `dotenv` has already populated the process
/// environment by the time `from_env` runs.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Single admin allowed to trigger a ledger wipe. Gating happens in the
    /// front-end; the core only carries the id.
    pub admin_user_id: Option<i64>,
    pub keepalive_interval: Duration,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("DATABASE_URL not set")]
    MissingDatabaseUrl,
    #[error("invalid value for {var}: {value}")]
    InvalidValue { var: &'static str, value: String },
}

const DEFAULT_KEEPALIVE_SECS: u64 = 300;

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| ConfigError::MissingDatabaseUrl)?;

        let admin_user_id = match std::env::var("ADMIN_USER_ID") {
            Ok(raw) => Some(raw.parse::<i64>().map_err(|_| ConfigError::InvalidValue {
                var: "ADMIN_USER_ID",
                value: raw,
            })?),
            Err(_) => None,
        };

        let keepalive_secs = match std::env::var("KEEPALIVE_INTERVAL_SECS") {
            Ok(raw) => raw.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                var: "KEEPALIVE_INTERVAL_SECS",
                value: raw,
            })?,
            Err(_) => DEFAULT_KEEPALIVE_SECS,
        };

        Ok(Config {
            database_url,
            admin_user_id,
            keepalive_interval: Duration::from_secs(keepalive_secs),
        })
    }

    /// Whether `user_id` is the configured admin. No admin configured means
    /// nobody passes.
    pub fn is_admin(&self, user_id: i64) -> bool {
        self.admin_user_id == Some(user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_admin_matches_configured_id_only() {
        let config = Config {
            database_url: "mysql://localhost/debtbook".to_string(),
            admin_user_id: Some(42),
            keepalive_interval: Duration::from_secs(300),
        };
        assert!(config.is_admin(42));
        assert!(!config.is_admin(43));
    }

    #[test]
    fn no_admin_configured_rejects_everyone() {
        let config = Config {
            database_url: "mysql://localhost/debtbook".to_string(),
            admin_user_id: None,
            keepalive_interval: Duration::from_secs(300),
        };
        assert!(!config.is_admin(0));
        assert!(!config.is_admin(42));
    }
}
