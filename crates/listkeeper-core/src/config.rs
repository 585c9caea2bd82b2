//! Configuration management
//!
//! All settings come from environment variables; the binary loads a
//! `.env` file first via dotenvy, so both sources work.

use serde::Deserialize;

use crate::{Error, Result};

/// Main configuration for listkeeper
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Telegram bot authentication token
    pub telegram_token: String,

    /// Path to the SQLite database file
    #[serde(default = "default_db_path")]
    pub db_path: String,
}

fn default_db_path() -> String {
    "listkeeper.db".to_string()
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let telegram_token = std::env::var("TELEGRAM_BOT_TOKEN")
            .map_err(|_| Error::Config("TELEGRAM_BOT_TOKEN is not set".to_string()))?;

        if telegram_token.trim().is_empty() {
            return Err(Error::Config("TELEGRAM_BOT_TOKEN is empty".to_string()));
        }

        let db_path = std::env::var("DATABASE_PATH").unwrap_or_else(|_| default_db_path());

        Ok(Self {
            telegram_token,
            db_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_db_path() {
        assert_eq!(default_db_path(), "listkeeper.db");
    }

    #[test]
    fn test_missing_token_is_config_error() {
        // Only meaningful when the variable is absent in the test
        // environment; skip otherwise instead of failing.
        if std::env::var("TELEGRAM_BOT_TOKEN").is_ok() {
            return;
        }
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
