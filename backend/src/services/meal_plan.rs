//! Meal-plan catalog management

use super::ImageStore;
use crate::error::{is_unique_violation, ApiError};
use crate::repositories::{MealPlanFields, MealPlanRecord, MealPlanRepository};
use meal_planner_shared::validation::REQUIRED_FIELDS;
use meal_planner_shared::{MealPlan, MealPlanRequest};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

/// An image file received with a create or update request
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

fn not_found(id: Uuid) -> ApiError {
    ApiError::NotFound(format!("Meal ID {} not found", id))
}

fn duplicate_name(name: &str) -> ApiError {
    ApiError::Conflict(format!("Meal item {} already exists", name))
}

fn into_model(record: MealPlanRecord) -> Result<MealPlan, ApiError> {
    Ok(record.into_model()?)
}

/// Meal-plan service
pub struct MealPlanService;

impl MealPlanService {
    /// Validate a request into storable fields, without an image yet
    pub fn fields(req: MealPlanRequest) -> Result<MealPlanFields, ApiError> {
        req.validate()?;

        let name = req.name.trim().to_string();
        let description = req.description.trim().to_string();
        let ingredients: Vec<String> = req
            .ingredients
            .into_iter()
            .map(|i| i.trim().to_string())
            .filter(|i| !i.is_empty())
            .collect();

        let (Some(calories), Some(protein), Some(fat), Some(carbs)) =
            (req.calories, req.protein, req.fat, req.carbs)
        else {
            return Err(ApiError::Validation(REQUIRED_FIELDS.to_string()));
        };

        if name.is_empty() || description.is_empty() || ingredients.is_empty() {
            return Err(ApiError::Validation(REQUIRED_FIELDS.to_string()));
        }

        let mut preferences = Vec::with_capacity(req.preferences.len());
        for preference in req.preferences {
            if !preferences.contains(&preference) {
                preferences.push(preference);
            }
        }

        Ok(MealPlanFields {
            name,
            description,
            ingredients,
            preferences,
            calories,
            protein,
            fat,
            carbs,
            image: None,
        })
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<MealPlan>, ApiError> {
        MealPlanRepository::list(pool)
            .await?
            .into_iter()
            .map(into_model)
            .collect()
    }

    pub async fn get(pool: &PgPool, id: Uuid) -> Result<MealPlan, ApiError> {
        let record = MealPlanRepository::find_by_id(pool, id)
            .await?
            .ok_or_else(|| not_found(id))?;
        into_model(record)
    }

    pub async fn create(
        pool: &PgPool,
        images: &ImageStore,
        mut fields: MealPlanFields,
        upload: Option<ImageUpload>,
    ) -> Result<MealPlan, ApiError> {
        if MealPlanRepository::find_by_name(pool, &fields.name).await?.is_some() {
            return Err(duplicate_name(&fields.name));
        }

        if let Some(upload) = upload {
            fields.image = Some(images.save(&upload.file_name, &upload.bytes).await?);
        }

        let record = match MealPlanRepository::create(pool, &fields).await {
            Ok(record) => record,
            Err(e) => {
                if let Some(image) = &fields.image {
                    images.remove(image).await;
                }
                return Err(if is_unique_violation(&e) {
                    duplicate_name(&fields.name)
                } else {
                    ApiError::Internal(e)
                });
            }
        };

        info!(meal_plan_id = %record.id, name = %record.name, "Meal plan created");
        into_model(record)
    }

    /// Replace every field of an entry
    ///
    /// Without a new upload the stored image is kept; with one, the old
    /// file is deleted once the row points at the new file.
    pub async fn update(
        pool: &PgPool,
        images: &ImageStore,
        id: Uuid,
        mut fields: MealPlanFields,
        upload: Option<ImageUpload>,
    ) -> Result<MealPlan, ApiError> {
        let existing = MealPlanRepository::find_by_id(pool, id)
            .await?
            .ok_or_else(|| not_found(id))?;

        if let Some(other) = MealPlanRepository::find_by_name(pool, &fields.name).await? {
            if other.id != id {
                return Err(duplicate_name(&fields.name));
            }
        }

        let new_image = match upload {
            Some(upload) => Some(images.save(&upload.file_name, &upload.bytes).await?),
            None => None,
        };
        fields.image = new_image.clone().or(existing.image.clone());

        let record = match MealPlanRepository::update(pool, id, &fields).await {
            Ok(Some(record)) => record,
            outcome => {
                if let Some(image) = &new_image {
                    images.remove(image).await;
                }
                return Err(match outcome {
                    Ok(_) => not_found(id),
                    Err(e) if is_unique_violation(&e) => duplicate_name(&fields.name),
                    Err(e) => ApiError::Internal(e),
                });
            }
        };

        if new_image.is_some() {
            if let Some(old) = &existing.image {
                images.remove(old).await;
            }
        }

        info!(meal_plan_id = %id, "Meal plan updated");
        into_model(record)
    }

    /// Delete an entry and its image, returning it
    pub async fn delete(pool: &PgPool, images: &ImageStore, id: Uuid) -> Result<MealPlan, ApiError> {
        let record = MealPlanRepository::delete(pool, id)
            .await?
            .ok_or_else(|| not_found(id))?;

        if let Some(image) = &record.image {
            images.remove(image).await;
        }

        info!(meal_plan_id = %id, "Meal plan deleted");
        into_model(record)
    }
}
