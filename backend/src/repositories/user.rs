//! User repository for database operations

use super::MacroTrackerRepository;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use meal_planner_shared::{BiometricProfile, MacroTargets, SecurityQuestion};
use sqlx::PgPool;
use uuid::Uuid;

const USER_COLUMNS: &str = "id, name, email, password_hash, is_admin, security_question, \
                            security_answer_hash, created_at, updated_at";

/// User record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRecord {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub is_admin: bool,
    pub security_question: String,
    pub security_answer_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRecord {
    pub fn question(&self) -> Result<SecurityQuestion> {
        self.security_question
            .parse::<SecurityQuestion>()
            .with_context(|| format!("Stored security question for user {} is unknown", self.id))
    }
}

/// Input for creating a user; secrets are already hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub is_admin: bool,
    pub security_question: SecurityQuestion,
    pub security_answer_hash: String,
}

/// Input for updating a user; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub is_admin: Option<bool>,
}

/// User repository for database operations
pub struct UserRepository;

impl UserRepository {
    /// Create a user, plus its macro tracker when one is supplied
    pub async fn create(
        pool: &PgPool,
        user: &NewUser,
        tracker: Option<(&BiometricProfile, &MacroTargets)>,
    ) -> Result<UserRecord> {
        let mut tx = pool.begin().await?;

        let record = sqlx::query_as::<_, UserRecord>(&format!(
            r#"
            INSERT INTO users (name, email, password_hash, is_admin, security_question, security_answer_hash)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.is_admin)
        .bind(user.security_question.as_str())
        .bind(&user.security_answer_hash)
        .fetch_one(&mut *tx)
        .await?;

        if let Some((profile, targets)) = tracker {
            MacroTrackerRepository::upsert(&mut *tx, record.id, profile, targets).await?;
        }

        tx.commit().await?;

        Ok(record)
    }

    /// Find user by (normalized) email
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Find user by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// All users, oldest first
    pub async fn list(pool: &PgPool) -> Result<Vec<UserRecord>> {
        let users = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at, id"
        ))
        .fetch_all(pool)
        .await?;

        Ok(users)
    }

    /// Check if email exists
    pub async fn email_exists(pool: &PgPool, email: &str) -> Result<bool> {
        let result = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(pool)
            .await?;

        Ok(result)
    }

    /// Apply changes; `None` when the user does not exist
    pub async fn update(pool: &PgPool, id: Uuid, changes: UserChanges) -> Result<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(&format!(
            r#"
            UPDATE users SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                password_hash = COALESCE($4, password_hash),
                is_admin = COALESCE($5, is_admin),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(changes.name)
        .bind(changes.email)
        .bind(changes.password_hash)
        .bind(changes.is_admin)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Replace the password hash
    pub async fn set_password(pool: &PgPool, id: Uuid, password_hash: &str) -> Result<()> {
        sqlx::query("UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(pool)
            .await?;

        Ok(())
    }

    /// Delete a user and everything hanging off it
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
