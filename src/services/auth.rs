//! Authentication service implementation
//!
//! Password hashing with argon2, HS256 bearer tokens, and a per-student-id
//! login throttle.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use argon2::Argon2;
use argon2::password_hash::{
    rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use crate::config::settings::{AuthConfig, RateLimitConfig};
use crate::models::user::{User, UserRole};
use crate::utils::errors::{CampusEventsError, Result};

/// Hash a password with a fresh random salt
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Check a password against a stored PHC hash string
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(password_hash)?;
    Ok(Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok())
}

/// Token claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    pub role: UserRole,
    pub iat: u64,
    pub exp: u64,
}

impl Claims {
    pub fn user_id(&self) -> Result<i64> {
        self.sub
            .parse::<i64>()
            .map_err(|_| CampusEventsError::Authentication("Malformed token subject".to_string()))
    }
}

/// Issued bearer token
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthToken {
    pub token: String,
    pub token_type: &'static str,
    pub expires_in: u64,
}

/// Tracked student ids above which a login attempt first prunes idle entries
const LOGIN_KEYS_SWEEP_THRESHOLD: usize = 10_000;

#[derive(Clone)]
pub struct AuthService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    token_ttl: Duration,
    login_limiter: Arc<DefaultKeyedRateLimiter<String>>,
    sweep_threshold: usize,
}

impl AuthService {
    pub fn new(auth: &AuthConfig, rate_limit: &RateLimitConfig) -> Result<Self> {
        let per_minute = NonZeroU32::new(rate_limit.login_attempts_per_minute).ok_or_else(|| {
            CampusEventsError::Config(
                "rate_limit.login_attempts_per_minute must be positive".to_string(),
            )
        })?;

        Ok(Self {
            encoding: EncodingKey::from_secret(auth.jwt_secret.as_bytes()),
            decoding: DecodingKey::from_secret(auth.jwt_secret.as_bytes()),
            token_ttl: Duration::from_secs(auth.token_ttl_hours * 3600),
            login_limiter: Arc::new(RateLimiter::keyed(Quota::per_minute(per_minute))),
            sweep_threshold: LOGIN_KEYS_SWEEP_THRESHOLD,
        })
    }

    /// Sign a token for the user
    pub fn issue_token(&self, user: &User) -> Result<AuthToken> {
        let now = jsonwebtoken::get_current_timestamp();
        let claims = Claims {
            sub: user.id.to_string(),
            role: user.role,
            iat: now,
            exp: now + self.token_ttl.as_secs(),
        };
        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;
        debug!(user_id = user.id, "Issued access token");

        Ok(AuthToken {
            token,
            token_type: "Bearer",
            expires_in: self.token_ttl.as_secs(),
        })
    }

    /// Verify signature and expiry and return the claims
    pub fn validate_token(&self, token: &str) -> Result<Claims> {
        let validation = Validation::new(Algorithm::HS256);
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &validation)?;
        Ok(data.claims)
    }

    /// Consume one login attempt for the student id
    pub fn check_login_attempt(&self, student_id: &str) -> Result<()> {
        if self.login_limiter.len() >= self.sweep_threshold {
            self.cleanup_login_attempts();
        }

        let key = student_id.trim().to_uppercase();
        if self.login_limiter.check_key(&key).is_err() {
            warn!(student_id = %key, "Login attempts throttled");
            return Err(CampusEventsError::RateLimitExceeded);
        }
        Ok(())
    }

    /// Forget student ids whose quota has fully replenished (should be called periodically)
    pub fn cleanup_login_attempts(&self) -> usize {
        let before = self.login_limiter.len();
        self.login_limiter.retain_recent();
        self.login_limiter.shrink_to_fit();
        let remaining = self.login_limiter.len();
        if remaining < before {
            info!(
                removed = before - remaining,
                remaining = remaining,
                "Cleaned up login throttle entries"
            );
        }
        remaining
    }

    /// Number of student ids the login throttle currently tracks
    pub fn tracked_login_keys(&self) -> usize {
        self.login_limiter.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::Utc;
    use crate::config::settings::Settings;
    use crate::models::user::Gender;

    fn service(attempts: u32) -> AuthService {
        AuthService::new(
            &AuthConfig {
                jwt_secret: "0123456789abcdef0123456789abcdef".to_string(),
                token_ttl_hours: 1,
            },
            &RateLimitConfig {
                login_attempts_per_minute: attempts,
            },
        )
        .unwrap()
    }

    fn user(role: UserRole) -> User {
        User {
            id: 42,
            student_id: "S42".to_string(),
            email: "s42@student.university.edu".to_string(),
            password_hash: String::new(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            role,
            gender: Gender::Female,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_password_hash_and_verify() {
        let hash = hash_password("secret1").unwrap();
        assert_ne!(hash, "secret1");
        assert!(verify_password("secret1", &hash).unwrap());
        assert!(!verify_password("secret2", &hash).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        assert_ne!(hash_password("same-pw").unwrap(), hash_password("same-pw").unwrap());
    }

    #[test]
    fn test_token_carries_actor() {
        let auth = service(5);
        let token = auth.issue_token(&user(UserRole::Admin)).unwrap();
        assert_eq!(token.expires_in, 3600);

        let claims = auth.validate_token(&token.token).unwrap();
        assert_eq!(claims.user_id().unwrap(), 42);
        assert_eq!(claims.role, UserRole::Admin);
    }

    #[test]
    fn test_token_from_other_secret_rejected() {
        let token = service(5).issue_token(&user(UserRole::Student)).unwrap();
        let other = AuthService::new(
            &AuthConfig {
                jwt_secret: "another-secret-another-secret-xx".to_string(),
                token_ttl_hours: 1,
            },
            &Settings::default().rate_limit,
        )
        .unwrap();
        assert_matches!(other.validate_token(&token.token), Err(CampusEventsError::Jwt(_)));
    }

    #[test]
    fn test_login_throttle_per_student() {
        let auth = service(2);
        assert!(auth.check_login_attempt("s1").is_ok());
        assert!(auth.check_login_attempt("S1").is_ok());
        assert_matches!(auth.check_login_attempt("s1"), Err(CampusEventsError::RateLimitExceeded));
        assert!(auth.check_login_attempt("s2").is_ok());
    }

    #[test]
    fn test_zero_quota_is_config_error() {
        let zero = RateLimitConfig { login_attempts_per_minute: 0 };
        assert_matches!(
            AuthService::new(&Settings::default().auth, &zero).err(),
            Some(CampusEventsError::Config(_))
        );
    }

    #[test]
    fn test_malformed_subject_is_authentication_error() {
        let claims = Claims {
            sub: "not-a-number".to_string(),
            role: UserRole::Student,
            iat: 0,
            exp: 0,
        };
        assert_matches!(claims.user_id(), Err(CampusEventsError::Authentication(_)));
    }

    // 60_000 per minute replenishes one attempt every millisecond
    #[test]
    fn test_cleanup_forgets_replenished_student_ids() {
        let auth = service(60_000);
        for i in 0..500 {
            auth.check_login_attempt(&format!("S{}", i)).unwrap();
        }
        assert_eq!(auth.tracked_login_keys(), 500);

        std::thread::sleep(Duration::from_millis(50));
        assert_eq!(auth.cleanup_login_attempts(), 0);
    }

    #[test]
    fn test_login_attempt_sweeps_past_threshold() {
        let mut auth = service(60_000);
        auth.sweep_threshold = 100;
        for i in 0..100 {
            auth.check_login_attempt(&format!("S{}", i)).unwrap();
        }
        assert_eq!(auth.tracked_login_keys(), 100);

        std::thread::sleep(Duration::from_millis(50));
        auth.check_login_attempt("FRESH").unwrap();
        assert_eq!(auth.tracked_login_keys(), 1);
    }

    #[test]
    fn test_cleanup_keeps_throttled_student_ids() {
        let auth = service(1);
        auth.check_login_attempt("S1").unwrap();
        assert_eq!(auth.cleanup_login_attempts(), 1);
        assert_matches!(auth.check_login_attempt("S1"), Err(CampusEventsError::RateLimitExceeded));
    }
}
