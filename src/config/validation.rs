//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use crate::utils::errors::{CampusEventsError, Result};
use super::Settings;

/// Minimum length of the HS256 signing secret
const MIN_JWT_SECRET_LEN: usize = 32;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_database_config(&settings.database)?;
    validate_auth_config(&settings.auth)?;
    validate_email_config(&settings.email)?;
    validate_app_config(&settings.app)?;
    validate_logging_config(&settings.logging)?;
    validate_rate_limit_config(&settings.rate_limit)?;

    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(CampusEventsError::Config(
            "Database URL is required".to_string()
        ));
    }

    if config.max_connections == 0 {
        return Err(CampusEventsError::Config(
            "Max connections must be greater than 0".to_string()
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(CampusEventsError::Config(
            "Min connections cannot be greater than max connections".to_string()
        ));
    }

    Ok(())
}

/// Validate token configuration
fn validate_auth_config(config: &super::AuthConfig) -> Result<()> {
    if config.jwt_secret.len() < MIN_JWT_SECRET_LEN {
        return Err(CampusEventsError::Config(
            format!("JWT secret must be at least {} characters", MIN_JWT_SECRET_LEN)
        ));
    }

    if config.token_ttl_hours == 0 {
        return Err(CampusEventsError::Config(
            "Token lifetime must be greater than 0".to_string()
        ));
    }

    Ok(())
}

fn validate_email_config(config: &super::EmailPolicyConfig) -> Result<()> {
    if config.institutional_domain.is_empty() {
        return Err(CampusEventsError::Config(
            "Institutional email domain is required".to_string()
        ));
    }

    Ok(())
}

/// Validate URLs used to mint shareable links
fn validate_app_config(config: &super::AppConfig) -> Result<()> {
    url::Url::parse(&config.public_base_url)
        .map_err(|e| CampusEventsError::Config(format!("Invalid public_base_url: {}", e)))?;
    url::Url::parse(&config.frontend_url)
        .map_err(|e| CampusEventsError::Config(format!("Invalid frontend_url: {}", e)))?;

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(CampusEventsError::Config(
            "Log level is required".to_string()
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(CampusEventsError::Config(
            format!("Invalid log level: {}. Valid levels: {:?}", config.level, valid_levels)
        ));
    }

    Ok(())
}

fn validate_rate_limit_config(config: &super::RateLimitConfig) -> Result<()> {
    if config.login_attempts_per_minute == 0 {
        return Err(CampusEventsError::Config(
            "Login attempts per minute must be greater than 0".to_string()
        ));
    }

    Ok(())
}
