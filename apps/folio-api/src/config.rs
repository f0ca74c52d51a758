//! API server configuration.
//!
//! Layered with the `config` crate, later sources winning:
//!
//! 1. Built-in defaults ([`FolioConfig::default`])
//! 2. `folio.toml` in the working directory (optional)
//! 3. `FOLIO_*` environment variables, e.g. `FOLIO_PORT=9000`,
//!    `FOLIO_DATABASE_PATH=/var/lib/folio/folio.db`

use std::path::Path;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

/// Default config file name, resolved relative to the working directory.
pub const CONFIG_FILE: &str = "folio.toml";

/// Folio API configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FolioConfig {
    /// Interface to bind
    pub host: String,

    /// HTTP port
    pub port: u16,

    /// SQLite database file
    pub database_path: String,

    /// Connection pool size
    pub max_connections: u32,

    /// Tracing filter used when `RUST_LOG` is not set
    pub log_level: String,

    /// Prefix for generated invoice numbers (`INV` gives `INV-0001`)
    pub invoice_prefix: String,

    /// Days added to the issue date when a draft has no due date
    pub default_payment_terms_days: u32,
}

impl Default for FolioConfig {
    fn default() -> Self {
        FolioConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            database_path: "folio.db".to_string(),
            max_connections: 5,
            log_level: "folio_api=info,folio_db=info,tower_http=info".to_string(),
            invoice_prefix: folio_core::DEFAULT_INVOICE_PREFIX.to_string(),
            default_payment_terms_days: folio_core::DEFAULT_PAYMENT_TERMS_DAYS,
        }
    }
}

impl FolioConfig {
    /// Loads configuration from `folio.toml` and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    /// Loads configuration using `path` as the optional config file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(Config::try_from(&FolioConfig::default())?)
            .add_source(File::from(path).required(false))
            .add_source(
                Environment::with_prefix("FOLIO")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: FolioConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the server cannot start with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::InvalidValue("port".to_string()));
        }
        if self.database_path.trim().is_empty() {
            return Err(ConfigError::MissingRequired("database_path".to_string()));
        }
        if self.max_connections == 0 {
            return Err(ConfigError::InvalidValue("max_connections".to_string()));
        }
        if self.invoice_prefix.trim().is_empty() {
            return Err(ConfigError::MissingRequired("invoice_prefix".to_string()));
        }
        Ok(())
    }

    /// `host:port` for the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = FolioConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
        assert_eq!(config.invoice_prefix, "INV");
        assert_eq!(config.default_payment_terms_days, 30);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = FolioConfig::load_from(Path::new("does-not-exist.toml")).unwrap();
        assert_eq!(config.invoice_prefix, FolioConfig::default().invoice_prefix);
    }

    #[test]
    fn test_validate_rejects_zero_port() {
        let config = FolioConfig {
            port: 0,
            ..FolioConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidValue(key)) if key == "port"));
    }

    #[test]
    fn test_validate_rejects_blank_database_path() {
        let config = FolioConfig {
            database_path: "  ".to_string(),
            ..FolioConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::MissingRequired(_))));
    }

    #[test]
    fn test_validate_rejects_empty_pool() {
        let config = FolioConfig {
            max_connections: 0,
            ..FolioConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
