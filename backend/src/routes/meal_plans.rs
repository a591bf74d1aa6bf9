//! Meal-plan catalog routes
//!
//! Reads are public. Writes take `multipart/form-data` so an image can be
//! uploaded with the entry, and require the administrator role.

use crate::auth::{require_admin, AuthUser};
use crate::error::{ApiError, ApiResult};
use crate::extract::AppPath;
use crate::services::{is_image, ImageUpload, MealPlanService};
use crate::state::AppState;
use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use meal_planner_shared::{ApiMessage, DietaryPreference, MealPlan, MealPlanRequest};
use tracing::debug;
use uuid::Uuid;

/// Create meal-plan routes
pub fn meal_plan_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_meal_plans).post(create_meal_plan))
        .route(
            "/:id",
            get(get_meal_plan).put(update_meal_plan).delete(delete_meal_plan),
        )
}

/// A parsed create/update form
#[derive(Debug, Default)]
struct MealPlanForm {
    request: MealPlanRequest,
    image: Option<ImageUpload>,
}

impl MealPlanForm {
    async fn read(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await.map_err(malformed)? {
            let name = field.name().unwrap_or_default().to_string();

            if matches!(name.as_str(), "image" | "mealImage") {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await.map_err(malformed)?;
                // Browsers send an empty part when no file was picked
                if !bytes.is_empty() {
                    if !is_image(&file_name, content_type.as_deref()) {
                        return Err(ApiError::Validation("Only image files are allowed".to_string()));
                    }
                    form.image = Some(ImageUpload {
                        file_name,
                        bytes: bytes.to_vec(),
                    });
                }
                continue;
            }

            let value = field.text().await.map_err(malformed)?;
            form.push_text(&name, value)?;
        }

        Ok(form)
    }

    fn push_text(&mut self, name: &str, value: String) -> Result<(), ApiError> {
        let req = &mut self.request;
        match name {
            "name" => req.name = value,
            "description" => req.description = value,
            "ingredients" => req.ingredients.extend(list_values(&value)),
            "preferences" | "preference" => {
                for raw in list_values(&value) {
                    req.preferences.push(raw.parse::<DietaryPreference>()?);
                }
            }
            "calories" => req.calories = number(&value, "Calories")?,
            "protein" => req.protein = number(&value, "Protein")?,
            "fat" => req.fat = number(&value, "Fat")?,
            "carbs" => req.carbs = number(&value, "Carbs")?,
            other => debug!(field = other, "Ignoring unknown form field"),
        }
        Ok(())
    }
}

fn malformed(err: axum::extract::multipart::MultipartError) -> ApiError {
    debug!(error = %err, "Rejected multipart field");
    ApiError::BadRequest("Malformed multipart request body".to_string())
}

/// A list field may arrive as a JSON array or as one value per part
fn list_values(value: &str) -> Vec<String> {
    let trimmed = value.trim();
    if trimmed.starts_with('[') {
        if let Ok(items) = serde_json::from_str::<Vec<String>>(trimmed) {
            return items;
        }
    }
    if trimmed.is_empty() {
        Vec::new()
    } else {
        vec![trimmed.to_string()]
    }
}

/// Blank means absent
fn number(value: &str, label: &str) -> Result<Option<i32>, ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<i32>()
        .map(Some)
        .map_err(|_| ApiError::Validation(format!("{} must be a whole number", label)))
}

/// GET /api/v1/meal-plans
async fn list_meal_plans(State(state): State<AppState>) -> ApiResult<Json<ApiMessage<Vec<MealPlan>>>> {
    let plans = MealPlanService::list(state.db()).await?;
    Ok(Json(ApiMessage::with_data("Meal items retrieved successfully", plans)))
}

/// GET /api/v1/meal-plans/:id
async fn get_meal_plan(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> ApiResult<Json<ApiMessage<MealPlan>>> {
    let plan = MealPlanService::get(state.db(), id).await?;
    Ok(Json(ApiMessage::with_data("Meal item retrieved successfully", plan)))
}

/// POST /api/v1/meal-plans
async fn create_meal_plan(
    State(state): State<AppState>,
    user: AuthUser,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<(StatusCode, Json<ApiMessage<MealPlan>>)> {
    require_admin(&user, "create meal items")?;
    let form = MealPlanForm::read(multipart?).await?;
    let fields = MealPlanService::fields(form.request)?;

    let plan = MealPlanService::create(state.db(), state.images(), fields, form.image).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiMessage::with_data("New meal item created", plan)),
    ))
}

/// Replace an entry, optionally swapping its image
///
/// PUT /api/v1/meal-plans/:id
async fn update_meal_plan(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<Uuid>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<ApiMessage<MealPlan>>> {
    require_admin(&user, "update meal items")?;
    let form = MealPlanForm::read(multipart?).await?;
    let fields = MealPlanService::fields(form.request)?;

    let plan = MealPlanService::update(state.db(), state.images(), id, fields, form.image).await?;
    let message = format!("Meal item {} updated successfully", plan.name);
    Ok(Json(ApiMessage::with_data(message, plan)))
}

/// DELETE /api/v1/meal-plans/:id
async fn delete_meal_plan(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<Uuid>,
) -> ApiResult<Json<ApiMessage>> {
    require_admin(&user, "delete meal items")?;
    let plan = MealPlanService::delete(state.db(), state.images(), id).await?;
    Ok(Json(ApiMessage::text(format!(
        "Meal item {} deleted successfully",
        plan.name
    ))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_values_accepts_json_and_plain() {
        assert_eq!(list_values(r#"["Tofu", "Rice"]"#), vec!["Tofu", "Rice"]);
        assert_eq!(list_values(" Tofu "), vec!["Tofu"]);
        assert!(list_values("  ").is_empty());
        // Not an array of strings; kept verbatim
        assert_eq!(list_values("[1, 2]"), vec!["[1, 2]"]);
    }

    #[test]
    fn test_number_parsing() {
        assert_eq!(number("450", "Calories").unwrap(), Some(450));
        assert_eq!(number(" ", "Calories").unwrap(), None);
        match number("lots", "Calories") {
            Err(ApiError::Validation(msg)) => assert_eq!(msg, "Calories must be a whole number"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_push_text_builds_request() {
        let mut form = MealPlanForm::default();
        form.push_text("name", "Tofu bowl".to_string()).unwrap();
        form.push_text("ingredients", "rice".to_string()).unwrap();
        form.push_text("ingredients", r#"["tofu","greens"]"#.to_string()).unwrap();
        form.push_text("preference", "vegan".to_string()).unwrap();
        form.push_text("carbs", "70".to_string()).unwrap();
        form.push_text("unexpected", "x".to_string()).unwrap();

        assert_eq!(form.request.name, "Tofu bowl");
        assert_eq!(form.request.ingredients, vec!["rice", "tofu", "greens"]);
        assert_eq!(form.request.preferences, vec![DietaryPreference::Vegan]);
        assert_eq!(form.request.carbs, Some(70));
    }

    #[test]
    fn test_push_text_rejects_unknown_preference() {
        let mut form = MealPlanForm::default();
        match form.push_text("preferences", "carnivore".to_string()) {
            Err(ApiError::Validation(msg)) => assert_eq!(msg, "Invalid dietary preference"),
            other => panic!("unexpected: {:?}", other),
        }
    }
}
