//! Application configuration
//!
//! Loaded from a TOML file (default: ~/.config/enerlytics/config.toml)
//! with environment overrides for the secrets that should not live on
//! disk. The loaded value is passed into components explicitly; there is
//! no global settings object.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::infrastructure::crypto::jwt::JwtConfig;

/// Top-level application configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseSettings,
    pub security: SecurityConfig,
    pub pagination: PaginationConfig,
    pub admin: AdminConfig,
    pub logging: LoggingConfig,
}

/// HTTP server binding
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// Connection URL; SQLite by default, PostgreSQL in production
    pub url: String,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: "sqlite://./enerlytics.db?mode=rwc".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub access_token_expire_hours: i64,
    pub refresh_token_expire_hours: i64,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "super-secret-key-change-in-production".to_string(),
            access_token_expire_hours: 24,
            refresh_token_expire_hours: 24 * 7,
        }
    }
}

impl SecurityConfig {
    pub fn jwt_config(&self) -> JwtConfig {
        JwtConfig {
            secret: self.jwt_secret.clone(),
            access_expire_hours: self.access_token_expire_hours,
            refresh_expire_hours: self.refresh_token_expire_hours,
            issuer: "enerlytics".to_string(),
        }
    }
}

/// Bounds applied to every list endpoint
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    pub max_page_size: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            max_page_size: 1000,
        }
    }
}

/// Bootstrap admin account, created when the users table is empty
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    pub email: String,
    pub key: String,
    pub first_name: String,
    pub last_name: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            email: "admin@enerlytics.local".to_string(),
            key: "change-me-immediately".to_string(),
            first_name: "Default".to_string(),
            last_name: "Admin".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

impl AppConfig {
    /// Load configuration from a TOML file and apply env overrides.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&contents)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Defaults plus env overrides, for running without a config file.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env_overrides();
        config
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("ENERLYTICS_DATABASE_URL") {
            self.database.url = url;
        }
        if let Ok(secret) = std::env::var("ENERLYTICS_JWT_SECRET") {
            self.security.jwt_secret = secret;
        }
    }
}

/// Default config file location (~/.config/enerlytics/config.toml)
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("enerlytics")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.pagination.max_page_size, 1000);
        assert_eq!(config.security.access_token_expire_hours, 24);
        assert_eq!(config.security.refresh_token_expire_hours, 168);
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [server]
            port = 9100

            [security]
            jwt_secret = "test-secret"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.security.jwt_secret, "test-secret");
        assert_eq!(config.security.access_token_expire_hours, 24);
        assert_eq!(config.database.url, "sqlite://./enerlytics.db?mode=rwc");
    }
}
