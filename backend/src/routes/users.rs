//! User routes
//!
//! Every route here sits behind the session gate. Handlers check role and
//! ownership before touching the database.

use crate::auth::{require_admin, require_owner_or_admin, AuthUser};
use crate::error::{ApiError, ApiResult};
use crate::extract::{AppJson, AppPath};
use crate::services::AccountService;
use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use meal_planner_shared::{
    Account, AddMealPlanRequest, ApiMessage, MacroTracker, MacroTrackerRequest, MealPlanSelection,
    UpdateUserRequest,
};
use serde::Serialize;
use uuid::Uuid;

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users))
        .route("/:user_id", get(get_user).put(update_user).delete(delete_user))
        .route("/:user_id/meal-plans", post(add_meal_plan))
        .route("/:user_id/meal-plans/:meal_plan_id", delete(remove_meal_plan))
        .route(
            "/:user_id/macro-tracker",
            get(get_macro_tracker)
                .post(create_macro_tracker)
                .put(update_macro_tracker),
        )
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SelectedMealPlans {
    selected_meal_plan: Vec<MealPlanSelection>,
}

/// GET /api/v1/users
async fn list_users(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<ApiMessage<Vec<Account>>>> {
    require_admin(&user, "view all users")?;
    let accounts = AccountService::list(state.db()).await?;
    Ok(Json(ApiMessage::with_data("Users retrieved successfully", accounts)))
}

/// GET /api/v1/users/:user_id
async fn get_user(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(user_id): AppPath<Uuid>,
) -> ApiResult<Json<ApiMessage<Account>>> {
    require_owner_or_admin(&user, user_id, "view your own profile")?;
    let account = AccountService::get(state.db(), user_id).await?;
    Ok(Json(ApiMessage::with_data("User retrieved successfully", account)))
}

/// Partial profile update
///
/// PUT /api/v1/users/:user_id
async fn update_user(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(user_id): AppPath<Uuid>,
    AppJson(req): AppJson<UpdateUserRequest>,
) -> ApiResult<Json<ApiMessage<Account>>> {
    require_owner_or_admin(&user, user_id, "update your own profile")?;
    if req.is_admin.is_some() && !user.is_admin() {
        return Err(ApiError::Forbidden(
            "Forbidden: Only admins can change user roles".to_string(),
        ));
    }

    let account = AccountService::update(state.db(), user_id, req).await?;
    Ok(Json(ApiMessage::with_data("Profile updated successfully", account)))
}

/// DELETE /api/v1/users/:user_id
async fn delete_user(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(user_id): AppPath<Uuid>,
) -> ApiResult<Json<ApiMessage>> {
    require_admin(&user, "delete users")?;
    AccountService::delete(state.db(), user_id).await?;
    Ok(Json(ApiMessage::text(format!(
        "User {} deleted successfully",
        user_id
    ))))
}

/// Select a meal plan for the user
///
/// POST /api/v1/users/:user_id/meal-plans
async fn add_meal_plan(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(user_id): AppPath<Uuid>,
    AppJson(req): AppJson<AddMealPlanRequest>,
) -> ApiResult<Json<ApiMessage<SelectedMealPlans>>> {
    require_owner_or_admin(&user, user_id, "manage your own meal plans")?;
    let meal_plan_id = req.meal_plan_id()?;
    let preference = req.preference()?;

    let selected_meal_plan =
        AccountService::add_meal_plan(state.db(), user_id, meal_plan_id, preference).await?;
    Ok(Json(ApiMessage::with_data(
        "Meal item added successfully",
        SelectedMealPlans { selected_meal_plan },
    )))
}

/// DELETE /api/v1/users/:user_id/meal-plans/:meal_plan_id
async fn remove_meal_plan(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath((user_id, meal_plan_id)): AppPath<(Uuid, Uuid)>,
) -> ApiResult<Json<ApiMessage<SelectedMealPlans>>> {
    require_owner_or_admin(&user, user_id, "manage your own meal plans")?;
    let selected_meal_plan =
        AccountService::remove_meal_plan(state.db(), user_id, meal_plan_id).await?;
    Ok(Json(ApiMessage::with_data(
        "Meal item deleted successfully",
        SelectedMealPlans { selected_meal_plan },
    )))
}

/// GET /api/v1/users/:user_id/macro-tracker
async fn get_macro_tracker(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(user_id): AppPath<Uuid>,
) -> ApiResult<Json<ApiMessage<MacroTracker>>> {
    require_owner_or_admin(&user, user_id, "view your own macro tracker")?;
    let tracker = AccountService::get_tracker(state.db(), user_id).await?;
    Ok(Json(ApiMessage::with_data("Macro tracker retrieved successfully", tracker)))
}

/// Compute and store targets from a full set of inputs
///
/// POST /api/v1/users/:user_id/macro-tracker
async fn create_macro_tracker(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(user_id): AppPath<Uuid>,
    AppJson(req): AppJson<MacroTrackerRequest>,
) -> ApiResult<(StatusCode, Json<ApiMessage<MacroTracker>>)> {
    require_owner_or_admin(&user, user_id, "update your own macro tracker")?;
    let tracker = AccountService::set_tracker(state.db(), user_id, req).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiMessage::with_data("Macro tracker added successfully", tracker)),
    ))
}

/// PUT /api/v1/users/:user_id/macro-tracker
async fn update_macro_tracker(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(user_id): AppPath<Uuid>,
    AppJson(req): AppJson<MacroTrackerRequest>,
) -> ApiResult<Json<ApiMessage<MacroTracker>>> {
    require_owner_or_admin(&user, user_id, "update your own macro tracker")?;
    let tracker = AccountService::update_tracker(state.db(), user_id, req).await?;
    Ok(Json(ApiMessage::with_data("Macro tracker updated successfully", tracker)))
}
