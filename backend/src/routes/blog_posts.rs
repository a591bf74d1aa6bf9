//! Blog post routes
//!
//! Reads are public. Writes run the session gate through the [`AuthUser`]
//! extractor and require the administrator role.

use crate::auth::{require_admin, AuthUser};
use crate::error::ApiResult;
use crate::extract::{AppJson, AppPath};
use crate::services::BlogPostService;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use meal_planner_shared::{ApiMessage, BlogPost, BlogPostRequest};
use uuid::Uuid;

/// Create blog post routes
pub fn blog_post_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_posts).post(create_post))
        .route("/:id", get(get_post).put(update_post).delete(delete_post))
}

/// GET /api/v1/blog-posts
async fn list_posts(State(state): State<AppState>) -> ApiResult<Json<ApiMessage<Vec<BlogPost>>>> {
    let posts = BlogPostService::list(state.db()).await?;
    Ok(Json(ApiMessage::with_data("Blog posts retrieved successfully", posts)))
}

/// GET /api/v1/blog-posts/:id
async fn get_post(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> ApiResult<Json<ApiMessage<BlogPost>>> {
    let post = BlogPostService::get(state.db(), id).await?;
    Ok(Json(ApiMessage::with_data("Blog post retrieved successfully", post)))
}

/// POST /api/v1/blog-posts
async fn create_post(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(req): AppJson<BlogPostRequest>,
) -> ApiResult<(StatusCode, Json<ApiMessage<BlogPost>>)> {
    require_admin(&user, "create blog posts")?;
    let fields = BlogPostService::fields(req)?;
    let post = BlogPostService::create(state.db(), fields).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiMessage::with_data("New blog post created", post)),
    ))
}

/// Replace a post
///
/// PUT /api/v1/blog-posts/:id
async fn update_post(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<Uuid>,
    AppJson(req): AppJson<BlogPostRequest>,
) -> ApiResult<Json<ApiMessage<BlogPost>>> {
    require_admin(&user, "update blog posts")?;
    let fields = BlogPostService::fields(req)?;
    let post = BlogPostService::update(state.db(), id, fields).await?;
    let message = format!("Blog post \"{}\" updated successfully", post.title);
    Ok(Json(ApiMessage::with_data(message, post)))
}

/// DELETE /api/v1/blog-posts/:id
async fn delete_post(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> ApiResult<Json<ApiMessage>> {
    require_admin(&user, "delete blog posts")?;
    let post = BlogPostService::delete(state.db(), id).await?;
    Ok(Json(ApiMessage::text(format!(
        "Blog post \"{}\" deleted successfully",
        post.title
    ))))
}
