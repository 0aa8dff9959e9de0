//! Input validation
//!
//! Validators for user-supplied fields. Each returns
//! `CampusEventsError::Validation` with a message suitable for the client.

use regex::Regex;
use std::sync::OnceLock;
use crate::config::EmailPolicyConfig;
use crate::utils::errors::{CampusEventsError, Result};

// Upper bounds match the column sizes in the schema
pub const MIN_PASSWORD_LEN: usize = 6;
pub const MAX_TITLE_LEN: usize = 200;
pub const MAX_DESCRIPTION_LEN: usize = 5000;
pub const MAX_LOCATION_LEN: usize = 300;
pub const MAX_STUDENT_ID_LEN: usize = 64;
pub const MAX_EMAIL_LEN: usize = 320;
pub const MAX_NAME_LEN: usize = 100;

fn email_shape() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._%+\-]+@([A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)+)$")
            .expect("email regex is valid")
    })
}

fn ac_suffix() -> &'static Regex {
    static AC: OnceLock<Regex> = OnceLock::new();
    AC.get_or_init(|| Regex::new(r"\.ac\.[a-z]{2,}$").expect("ac suffix regex is valid"))
}

/// Domain allow-list applied to registration emails
#[derive(Debug, Clone)]
pub struct EmailPolicy {
    providers: Vec<String>,
    institutional_domain: String,
    allow_edu_suffix: bool,
    allow_ac_suffix: bool,
}

impl EmailPolicy {
    pub fn new(config: &EmailPolicyConfig) -> Self {
        Self {
            providers: config.allowed_providers.iter().map(|p| p.to_lowercase()).collect(),
            institutional_domain: config.institutional_domain.to_lowercase(),
            allow_edu_suffix: config.allow_edu_suffix,
            allow_ac_suffix: config.allow_ac_suffix,
        }
    }

    /// Validate and normalize (lowercase, trimmed) an email address
    pub fn check(&self, email: &str) -> Result<String> {
        let email = bounded_text("Email", email, MAX_EMAIL_LEN)?.to_lowercase();
        let captures = email_shape()
            .captures(&email)
            .ok_or_else(|| {
                CampusEventsError::Validation("Please provide a valid email address".to_string())
            })?;
        let domain = captures.get(1).map(|m| m.as_str()).unwrap_or_default();

        if self.is_allowed_domain(domain) {
            Ok(email)
        } else {
            Err(CampusEventsError::Validation(
                "Email domain is not accepted; use a university or common provider address"
                    .to_string(),
            ))
        }
    }

    fn is_allowed_domain(&self, domain: &str) -> bool {
        domain == self.institutional_domain
            || domain.ends_with(&format!(".{}", self.institutional_domain))
            || self.providers.iter().any(|p| p == domain)
            || (self.allow_edu_suffix && domain.ends_with(".edu"))
            || (self.allow_ac_suffix && ac_suffix().is_match(domain))
    }
}

/// Require a non-blank value and return it trimmed
pub fn require_text(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CampusEventsError::Validation(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

/// Require a value no longer than `max` characters
pub fn bounded_text(field: &str, value: &str, max: usize) -> Result<String> {
    let value = require_text(field, value)?;
    if value.chars().count() > max {
        return Err(CampusEventsError::Validation(format!(
            "{} must be at most {} characters",
            field, max
        )));
    }
    Ok(value)
}

pub fn check_password(password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(CampusEventsError::Validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(())
}

pub fn check_student_id(student_id: &str) -> Result<String> {
    let student_id = bounded_text("Student ID", student_id, MAX_STUDENT_ID_LEN)?;
    if !student_id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(CampusEventsError::Validation(
            "Student ID may only contain letters, digits and dashes".to_string(),
        ));
    }
    Ok(student_id.to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use assert_matches::assert_matches;

    fn policy() -> EmailPolicy {
        EmailPolicy::new(&Settings::default().email)
    }

    #[test]
    fn test_accepts_consumer_providers() {
        assert_eq!(policy().check(" Jane.Doe@Gmail.com ").unwrap(), "jane.doe@gmail.com");
        assert!(policy().check("x@outlook.com").is_ok());
    }

    #[test]
    fn test_accepts_academic_suffixes() {
        assert!(policy().check("a@mit.edu").is_ok());
        assert!(policy().check("a@cs.ox.ac.uk").is_ok());
        assert!(policy().check("a@student.university.edu").is_ok());
    }

    #[test]
    fn test_rejects_other_domains() {
        assert_matches!(policy().check("a@example.com"), Err(CampusEventsError::Validation(_)));
        assert_matches!(policy().check("not-an-email"), Err(CampusEventsError::Validation(_)));
        assert_matches!(policy().check("a@gmail"), Err(CampusEventsError::Validation(_)));
    }

    #[test]
    fn test_suffixes_can_be_disabled() {
        let mut config = Settings::default().email;
        config.allow_edu_suffix = false;
        config.institutional_domain = "uni.example".to_string();
        let policy = EmailPolicy::new(&config);
        assert!(policy.check("a@mit.edu").is_err());
        assert!(policy.check("a@uni.example").is_ok());
    }

    #[test]
    fn test_text_validators() {
        assert_eq!(require_text("Title", "  Fair ").unwrap(), "Fair");
        assert!(require_text("Title", "   ").is_err());
        assert!(bounded_text("Title", "abcdef", 3).is_err());
        assert!(check_password("12345").is_err());
        assert!(check_password("123456").is_ok());
        assert_eq!(check_student_id(" s-1001 ").unwrap(), "S-1001");
        assert!(check_student_id("s 1001").is_err());
    }

    #[test]
    fn test_student_id_length_limit() {
        assert!(check_student_id(&"a".repeat(MAX_STUDENT_ID_LEN)).is_ok());
        assert_matches!(
            check_student_id(&"a".repeat(MAX_STUDENT_ID_LEN + 1)),
            Err(CampusEventsError::Validation(_))
        );
    }

    #[test]
    fn test_email_length_limit() {
        let domain = "@gmail.com";
        let at_limit = format!("{}{}", "a".repeat(MAX_EMAIL_LEN - domain.len()), domain);
        assert_eq!(at_limit.len(), MAX_EMAIL_LEN);
        assert!(policy().check(&at_limit).is_ok());

        let too_long = format!("a{}", at_limit);
        let err = policy().check(&too_long).unwrap_err();
        assert_matches!(err, CampusEventsError::Validation(ref m) if m.contains("320"));
    }

    #[test]
    fn test_bounded_text_counts_characters() {
        assert_eq!(bounded_text("Location", "ééé", 3).unwrap(), "ééé");
        assert!(bounded_text("Location", "éééé", 3).is_err());
        // Surrounding whitespace is trimmed before measuring
        assert!(bounded_text("Location", "  abc  ", 3).is_ok());
    }
}
