//! User repository implementation

use sqlx::PgPool;
use chrono::Utc;
use crate::models::user::{NewUser, User, UserRole};
use crate::utils::errors::CampusEventsError;

const USER_COLUMNS: &str =
    "id, student_id, email, password_hash, first_name, last_name, role, gender, is_active, \
     created_at, updated_at";

#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user; identity clashes surface as `DuplicateIdentity`
    pub async fn create(&self, new_user: NewUser) -> Result<User, CampusEventsError> {
        let now = Utc::now();
        sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users
                (student_id, email, password_hash, first_name, last_name, role, gender, is_active,
                 created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, 'student', $6, TRUE, $7, $7)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&new_user.student_id)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .bind(&new_user.first_name)
        .bind(&new_user.last_name)
        .bind(new_user.gender)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            CampusEventsError::from_unique_violation(
                e,
                CampusEventsError::DuplicateIdentity("Student ID or email".to_string()),
            )
        })
    }

    /// Find user by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>, CampusEventsError> {
        let user =
            sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(user)
    }

    /// Find user by student identifier
    pub async fn find_by_student_id(
        &self,
        student_id: &str,
    ) -> Result<Option<User>, CampusEventsError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE student_id = $1"
        ))
        .bind(student_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Whether the student ID or email is already taken
    pub async fn identity_exists(
        &self,
        student_id: &str,
        email: &str,
    ) -> Result<bool, CampusEventsError> {
        let exists: (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM users WHERE student_id = $1 OR email = $2)"
        )
        .bind(student_id)
        .bind(email)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists.0)
    }

    /// Raise a student to organizer; other roles are left as they are
    ///
    /// Returns `true` when the role actually changed.
    pub async fn promote_to_organizer(&self, id: i64) -> Result<bool, CampusEventsError> {
        let result = sqlx::query(
            r#"
            UPDATE users SET role = 'organizer', updated_at = $2
            WHERE id = $1 AND role = 'student'
            "#,
        )
        .bind(id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Set user role
    pub async fn set_role(
        &self,
        id: i64,
        role: UserRole,
    ) -> Result<Option<User>, CampusEventsError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET role = $2, updated_at = $3 WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(role)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Activate or deactivate a user
    pub async fn set_active(
        &self,
        id: i64,
        is_active: bool,
    ) -> Result<Option<User>, CampusEventsError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users SET is_active = $2, updated_at = $3 WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(is_active)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// List users with pagination
    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<User>, CampusEventsError> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }
}
