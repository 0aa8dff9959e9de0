//! User service implementation
//!
//! Registration, login, profiles and admin user management. The service
//! also consumes `EventApproved` to promote the event's creator.

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info};
use crate::database::repositories::UserRepository;
use crate::models::domain_event::DomainEvent;
use crate::models::lifecycle::Actor;
use crate::models::user::{Gender, LoginRequest, NewUser, RegisterUserRequest, User, UserRole};
use crate::services::auth::{hash_password, verify_password, AuthService, AuthToken};
use crate::services::dispatcher::DomainEventHandler;
use crate::utils::errors::{CampusEventsError, Result};
use crate::utils::helpers::calculate_offset;
use crate::utils::logging::{log_admin_action, log_auth_failure, log_user_action};
use crate::utils::validation::{
    bounded_text, check_password, check_student_id, EmailPolicy, MAX_NAME_LEN,
};


/// Registration input after validation, before hashing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRegistration {
    pub student_id: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: Gender,
}

/// Token plus the profile it was issued for
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(flatten)]
    pub token: AuthToken,
    pub user: User,
}

#[derive(Clone)]
pub struct UserService {
    user_repository: UserRepository,
    email_policy: EmailPolicy,
    auth: AuthService,
}

impl UserService {
    pub fn new(
        user_repository: UserRepository,
        email_policy: EmailPolicy,
        auth: AuthService,
    ) -> Self {
        Self {
            user_repository,
            email_policy,
            auth,
        }
    }

    /// Check every registration field without touching the database
    pub fn validate_registration(
        &self,
        request: RegisterUserRequest,
    ) -> Result<ValidatedRegistration> {
        let student_id = check_student_id(&request.student_id)?;
        let email = self.email_policy.check(&request.email)?;
        check_password(&request.password)?;
        let first_name = bounded_text("First name", &request.first_name, MAX_NAME_LEN)?;
        let last_name = bounded_text("Last name", &request.last_name, MAX_NAME_LEN)?;

        Ok(ValidatedRegistration {
            student_id,
            email,
            password: request.password,
            first_name,
            last_name,
            gender: request.gender,
        })
    }

    /// Create a student account
    pub async fn register(&self, request: RegisterUserRequest) -> Result<User> {
        let valid = self.validate_registration(request)?;
        debug!(student_id = %valid.student_id, "Registering user");

        if self.user_repository.identity_exists(&valid.student_id, &valid.email).await? {
            return Err(CampusEventsError::DuplicateIdentity("Student ID or email".to_string()));
        }

        let user = self
            .user_repository
            .create(NewUser {
                student_id: valid.student_id,
                email: valid.email,
                password_hash: hash_password(&valid.password)?,
                first_name: valid.first_name,
                last_name: valid.last_name,
                gender: valid.gender,
            })
            .await?;

        info!(user_id = user.id, student_id = %user.student_id, "New user registered");
        Ok(user)
    }

    /// Verify credentials and issue a token
    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse> {
        let student_id = request.student_id.trim().to_uppercase();
        self.auth.check_login_attempt(&student_id)?;

        let user = match self.user_repository.find_by_student_id(&student_id).await? {
            Some(user) => user,
            None => {
                log_auth_failure(&student_id, "unknown student id");
                return Err(CampusEventsError::InvalidCredentials);
            }
        };

        if !verify_password(&request.password, &user.password_hash)? {
            log_auth_failure(&student_id, "password mismatch");
            return Err(CampusEventsError::InvalidCredentials);
        }
        if !user.is_active {
            log_auth_failure(&student_id, "account inactive");
            return Err(CampusEventsError::InvalidCredentials);
        }

        let token = self.auth.issue_token(&user)?;
        log_user_action(user.id, "login", None);
        Ok(LoginResponse { token, user })
    }

    pub async fn profile(&self, user_id: i64) -> Result<User> {
        self.user_repository
            .find_by_id(user_id)
            .await?
            .ok_or(CampusEventsError::UserNotFound { user_id })
    }

    /// Raise a student to organizer; returns whether the role changed
    pub async fn promote(&self, user_id: i64) -> Result<bool> {
        let promoted = self.user_repository.promote_to_organizer(user_id).await?;
        if promoted {
            info!(user_id = user_id, "User promoted to organizer");
        } else {
            debug!(user_id = user_id, "Promotion skipped, role already organizer or higher");
        }
        Ok(promoted)
    }

    pub async fn list_users(&self, actor: &Actor, page: u32, limit: u32) -> Result<Vec<User>> {
        actor.require_admin()?;
        self.user_repository.list(i64::from(limit), calculate_offset(page, limit)).await
    }

    pub async fn set_role(&self, actor: &Actor, user_id: i64, role: UserRole) -> Result<User> {
        actor.require_admin()?;
        if actor.user_id == user_id && role != UserRole::Admin {
            return Err(CampusEventsError::Validation(
                "Administrators cannot demote themselves".to_string(),
            ));
        }

        let user = self
            .user_repository
            .set_role(user_id, role)
            .await?
            .ok_or(CampusEventsError::UserNotFound { user_id })?;

        let target = user_id.to_string();
        log_admin_action(actor.user_id, "set_role", Some(&target), Some(role.as_str()));
        Ok(user)
    }

    pub async fn set_active(&self, actor: &Actor, user_id: i64, is_active: bool) -> Result<User> {
        actor.require_admin()?;
        if actor.user_id == user_id && !is_active {
            return Err(CampusEventsError::Validation(
                "Administrators cannot deactivate themselves".to_string(),
            ));
        }

        let user = self
            .user_repository
            .set_active(user_id, is_active)
            .await?
            .ok_or(CampusEventsError::UserNotFound { user_id })?;

        let state = if is_active { "active" } else { "inactive" };
        log_admin_action(actor.user_id, "set_active", Some(&user_id.to_string()), Some(state));
        Ok(user)
    }
}

/// Promotes an event's creator once the event is approved
#[derive(Clone)]
pub struct PromotionHandler {
    users: UserService,
}

impl PromotionHandler {
    pub fn new(users: UserService) -> Self {
        Self { users }
    }
}

#[async_trait]
impl DomainEventHandler for PromotionHandler {
    fn name(&self) -> &'static str {
        "creator_promotion"
    }

    async fn handle(&self, event: &DomainEvent) -> Result<()> {
        if let DomainEvent::EventApproved { creator_id, .. } = event {
            self.users.promote(*creator_id).await?;
        }
        Ok(())
    }
}
