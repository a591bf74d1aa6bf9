//! Registration, login and password recovery
//!
//! # Performance Optimizations
//!
//! - bcrypt hashing/verification runs on the blocking thread pool
//! - JWT service is passed by reference (pre-computed keys)

use super::AccountService;
use crate::auth::{JwtService, PasswordService};
use crate::error::{is_unique_violation, ApiError};
use crate::repositories::{NewUser, UserRecord, UserRepository};
use meal_planner_shared::nutrition::macro_targets;
use meal_planner_shared::validation::{normalize_email, REQUIRED_FIELDS};
use meal_planner_shared::{
    Account, AnswerRequest, AuthError, LoginRequest, LoginResponse, RegisterRequest,
    ResetPasswordRequest, Role, SecurityQuestion,
};
use sqlx::PgPool;
use tracing::{info, warn};
use validator::Validate;

/// Authentication service
pub struct AuthService;

impl AuthService {
    /// The questions offered at registration
    pub fn security_questions() -> Vec<&'static str> {
        SecurityQuestion::ALL.iter().map(|q| q.as_str()).collect()
    }

    /// Register a new standard account
    pub async fn register(pool: &PgPool, req: RegisterRequest) -> Result<Account, ApiError> {
        req.validate()?;
        if req.name.trim().is_empty() || req.security_answer.trim().is_empty() {
            return Err(ApiError::Validation(REQUIRED_FIELDS.to_string()));
        }
        let question = req.question()?;
        let tracker = req
            .macro_tracker
            .clone()
            .map(|t| t.into_profile())
            .transpose()?
            .map(|profile| {
                let targets = macro_targets(&profile);
                (profile, targets)
            });

        let email = normalize_email(&req.email);
        if UserRepository::email_exists(pool, &email).await? {
            return Err(ApiError::Validation("User already exists".to_string()));
        }

        let password_hash = PasswordService::hash_async(req.password).await?;
        let answer_hash =
            PasswordService::hash_async(PasswordService::normalize_answer(&req.security_answer)).await?;

        let new_user = NewUser {
            name: req.name.trim().to_string(),
            email,
            password_hash,
            is_admin: false,
            security_question: question,
            security_answer_hash: answer_hash,
        };

        let record = UserRepository::create(pool, &new_user, tracker.as_ref().map(|(p, t)| (p, t)))
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    ApiError::Validation("User already exists".to_string())
                } else {
                    ApiError::Internal(e)
                }
            })?;

        info!(user_id = %record.id, "User registered");
        AccountService::view(pool, record).await
    }

    /// Exchange credentials for a session token
    pub async fn login(
        pool: &PgPool,
        jwt: &JwtService,
        req: LoginRequest,
    ) -> Result<LoginResponse, ApiError> {
        req.validate()?;
        let user = Self::find_by_email(pool, &req.email).await?;

        let valid = PasswordService::verify_async(req.password, user.password_hash.clone()).await?;
        if !valid {
            warn!(user_id = %user.id, "Rejected login with wrong password");
            return Err(AuthError::InvalidCredentials.into());
        }

        let token = jwt.issue(user.id, Role::from_admin_flag(user.is_admin))?;
        info!(user_id = %user.id, "User logged in");

        Ok(LoginResponse {
            token,
            token_type: "Bearer".to_string(),
            expires_in: jwt.expiry_secs(),
        })
    }

    /// The security question chosen by the account holding `email`
    pub async fn security_question(pool: &PgPool, email: &str) -> Result<SecurityQuestion, ApiError> {
        let user = Self::find_by_email(pool, email).await?;
        Ok(user.question()?)
    }

    /// Check a security answer without changing anything
    pub async fn verify_answer(pool: &PgPool, req: AnswerRequest) -> Result<(), ApiError> {
        req.validate()?;
        let user = Self::find_by_email(pool, &req.email).await?;
        Self::check_answer(&user, &req.security_answer).await
    }

    /// Set a new password after re-checking the security answer
    pub async fn reset_password(pool: &PgPool, req: ResetPasswordRequest) -> Result<(), ApiError> {
        req.validate()?;
        let user = Self::find_by_email(pool, &req.email).await?;
        Self::check_answer(&user, &req.security_answer).await?;

        let password_hash = PasswordService::hash_async(req.new_password).await?;
        UserRepository::set_password(pool, user.id, &password_hash).await?;

        info!(user_id = %user.id, "Password reset");
        Ok(())
    }

    async fn find_by_email(pool: &PgPool, email: &str) -> Result<UserRecord, ApiError> {
        UserRepository::find_by_email(pool, &normalize_email(email))
            .await?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
    }

    async fn check_answer(user: &UserRecord, answer: &str) -> Result<(), ApiError> {
        let valid = PasswordService::verify_async(
            PasswordService::normalize_answer(answer),
            user.security_answer_hash.clone(),
        )
        .await?;

        if valid {
            Ok(())
        } else {
            warn!(user_id = %user.id, "Rejected security answer");
            Err(ApiError::Validation("Incorrect answer".to_string()))
        }
    }
}
