//! Route definitions for the Meal Planner API
//!
//! This module organizes all API routes and applies middleware.

use crate::auth::require_auth;
use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    error_handling::HandleErrorLayer, extract::DefaultBodyLimit, middleware, routing::get,
    BoxError, Json, Router,
};
use meal_planner_shared::ApiMessage;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    trace::TraceLayer,
};

mod auth;
mod blog_posts;
mod health;
mod meal_plans;
mod users;


pub use auth::auth_routes;
pub use blog_posts::blog_post_routes;
pub use meal_plans::meal_plan_routes;
pub use users::user_routes;

/// Create the main application router with all middleware
pub fn create_router(state: AppState) -> Router {
    let uploads = ServeDir::new(state.images().dir());
    let body_limit = state.config().uploads.max_body_bytes;

    Router::new()
        .route("/", get(root))
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/health/live", get(health::liveness_check))
        .nest_service("/uploads", uploads)
        .nest("/api/v1", api_routes(&state))
        .fallback(not_found)
        // Apply middleware layers
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CompressionLayer::new())
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .timeout(Duration::from_secs(30)),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root() -> Json<ApiMessage> {
    Json(ApiMessage::text("Meal Planner API"))
}

async fn not_found() -> ApiError {
    ApiError::NotFound("Route not found".to_string())
}

async fn handle_middleware_error(err: BoxError) -> ApiError {
    if err.is::<tower::timeout::error::Elapsed>() {
        ApiError::Timeout
    } else {
        ApiError::Internal(anyhow::anyhow!("Unhandled middleware error: {}", err))
    }
}

/// API v1 routes
fn api_routes(state: &AppState) -> Router<AppState> {
    // The whole users tree sits behind the gate; catalog writes use the
    // extractor form instead so reads stay public.
    let users = user_routes().route_layer(middleware::from_fn_with_state(
        state.clone(),
        require_auth,
    ));

    Router::new()
        .route("/", get(|| async { "Meal Planner API v1" }))
        .nest("/auth", auth_routes())
        .nest("/users", users)
        .nest("/blog-posts", blog_post_routes())
        .nest("/meal-plans", meal_plan_routes())
}
