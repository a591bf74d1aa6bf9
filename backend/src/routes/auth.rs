//! Authentication routes
//!
//! Registration, login and the security-question password reset flow.
//! All routes are public.

use crate::error::ApiResult;
use crate::extract::AppJson;
use crate::services::AuthService;
use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use meal_planner_shared::{
    Account, AnswerRequest, ApiMessage, EmailRequest, LoginRequest, LoginResponse,
    RegisterRequest, ResetPasswordRequest, SecurityQuestionResponse,
};
use validator::Validate;

/// Create auth routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/questions", get(list_questions))
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/question", post(get_question))
        .route("/answer", post(verify_answer))
        .route("/reset-password", post(reset_password))
}

/// GET /api/v1/auth/questions
async fn list_questions() -> Json<ApiMessage<Vec<&'static str>>> {
    Json(ApiMessage::with_data(
        "Security questions retrieved",
        AuthService::security_questions(),
    ))
}

/// Register a new user
///
/// POST /api/v1/auth/register
async fn register(
    State(state): State<AppState>,
    AppJson(req): AppJson<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<ApiMessage<Account>>)> {
    let account = AuthService::register(state.db(), req).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiMessage::with_data("User registered successfully", account)),
    ))
}

/// Login with email and password
///
/// POST /api/v1/auth/login
async fn login(
    State(state): State<AppState>,
    AppJson(req): AppJson<LoginRequest>,
) -> ApiResult<Json<ApiMessage<LoginResponse>>> {
    let tokens = AuthService::login(state.db(), state.jwt(), req).await?;
    Ok(Json(ApiMessage::with_data("Login successful", tokens)))
}

/// POST /api/v1/auth/question
async fn get_question(
    State(state): State<AppState>,
    AppJson(req): AppJson<EmailRequest>,
) -> ApiResult<Json<ApiMessage<SecurityQuestionResponse>>> {
    req.validate()?;
    let security_question = AuthService::security_question(state.db(), &req.email).await?;
    Ok(Json(ApiMessage::with_data(
        "Security question retrieved",
        SecurityQuestionResponse { security_question },
    )))
}

/// POST /api/v1/auth/answer
async fn verify_answer(
    State(state): State<AppState>,
    AppJson(req): AppJson<AnswerRequest>,
) -> ApiResult<Json<ApiMessage>> {
    AuthService::verify_answer(state.db(), req).await?;
    Ok(Json(ApiMessage::text("Answer verified. Proceed to reset password")))
}

/// POST /api/v1/auth/reset-password
async fn reset_password(
    State(state): State<AppState>,
    AppJson(req): AppJson<ResetPasswordRequest>,
) -> ApiResult<Json<ApiMessage>> {
    AuthService::reset_password(state.db(), req).await?;
    Ok(Json(ApiMessage::text("Password reset successful")))
}
