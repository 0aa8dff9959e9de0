//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub email: EmailPolicyConfig,
    pub app: AppConfig,
    pub logging: LoggingConfig,
    pub rate_limit: RateLimitConfig,
}

/// HTTP listener configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub run_migrations: bool,
}

/// Token issuing configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_hours: u64,
}

/// Registration email allow-list
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmailPolicyConfig {
    /// Consumer mail providers accepted verbatim
    pub allowed_providers: Vec<String>,
    /// The university's own mail domain
    pub institutional_domain: String,
    pub allow_edu_suffix: bool,
    pub allow_ac_suffix: bool,
}

/// Application-level settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// "development" or "production"; production hides internal error detail
    pub environment: String,
    /// Base URL shareable links are minted under
    pub public_base_url: String,
    /// Frontend URL shareable links redirect to
    pub frontend_url: String,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
    /// Directory for daily rolling log files; empty disables file output
    pub directory: String,
}

/// Login throttling configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    pub login_attempts_per_minute: u32,
}

impl AppConfig {
    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }
}

impl Settings {
    /// Load settings from `config.toml` (if present) and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        Self::layered(config::File::with_name("config").required(false))
    }

    /// Load settings from an explicit configuration file and environment variables
    pub fn from_file(path: &Path) -> Result<Self, config::ConfigError> {
        Self::layered(config::File::from(path).required(true))
    }

    fn layered<S>(file: S) -> Result<Self, config::ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let defaults = config::Config::try_from(&Settings::default())?;

        let settings = config::Config::builder()
            .add_source(defaults)
            .add_source(file)
            .add_source(
                config::Environment::with_prefix("CAMPUS_EVENTS")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.cors_origins")
                    .with_list_parse_key("email.allowed_providers")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Load settings from a TOML document layered over the defaults
    pub fn from_toml_str(document: &str) -> Result<Self, config::ConfigError> {
        let defaults = config::Config::try_from(&Settings::default())?;

        config::Config::builder()
            .add_source(defaults)
            .add_source(config::File::from_str(document, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::CampusEventsError> {
        super::validation::validate_settings(self)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
                cors_origins: vec!["http://localhost:3000".to_string()],
            },
            database: DatabaseConfig {
                url: "postgresql://localhost/campus_events".to_string(),
                max_connections: 10,
                min_connections: 1,
                run_migrations: true,
            },
            auth: AuthConfig {
                jwt_secret: String::new(),
                token_ttl_hours: 24 * 7,
            },
            email: EmailPolicyConfig {
                allowed_providers: vec![
                    "gmail.com".to_string(),
                    "yahoo.com".to_string(),
                    "outlook.com".to_string(),
                    "hotmail.com".to_string(),
                    "icloud.com".to_string(),
                    "protonmail.com".to_string(),
                ],
                institutional_domain: "student.university.edu".to_string(),
                allow_edu_suffix: true,
                allow_ac_suffix: true,
            },
            app: AppConfig {
                environment: "development".to_string(),
                public_base_url: "http://localhost:8080".to_string(),
                frontend_url: "http://localhost:3000".to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                json: false,
                directory: String::new(),
            },
            rate_limit: RateLimitConfig {
                login_attempts_per_minute: 10,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_overrides_defaults() {
        let settings = Settings::from_toml_str(
            r#"
            [server]
            port = 9090

            [app]
            environment = "production"
            "#,
        )
        .unwrap();

        assert_eq!(settings.server.port, 9090);
        assert_eq!(settings.server.host, "0.0.0.0");
        assert!(settings.app.is_production());
        assert_eq!(settings.database.max_connections, 10);
    }

    #[test]
    fn test_from_file_reads_written_config() {
        let mut written = Settings::default();
        written.server.port = 7000;
        written.rate_limit.login_attempts_per_minute = 3;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("campus.toml");
        std::fs::write(&path, toml::to_string(&written).unwrap()).unwrap();

        let loaded = Settings::from_file(&path).unwrap();
        assert_eq!(loaded.server.port, 7000);
        assert_eq!(loaded.rate_limit.login_attempts_per_minute, 3);
        assert_eq!(loaded.email.allowed_providers, written.email.allowed_providers);
    }

    #[test]
    fn test_from_file_requires_the_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Settings::from_file(&dir.path().join("missing.toml")).is_err());
    }

    #[test]
    fn test_bind_address() {
        let settings = Settings::default();
        assert_eq!(settings.bind_address(), "0.0.0.0:8080");
    }
}
