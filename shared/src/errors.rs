//! Error types for the Meal Planner application

use thiserror::Error;

/// Errors raised while turning raw input into domain models
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(message.into())
    }

    /// The client-facing message
    pub fn message(&self) -> &str {
        match self {
            AppError::Validation(msg) => msg,
        }
    }
}

/// Authentication error types
///
/// Produced by credential checks and session-token verification.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Missing token")]
    MissingToken,

    /// The token verified but does not carry the identity or role claim
    #[error("Token is missing required claims")]
    MissingClaims,
}
