//! Meal-plan catalog repository

use anyhow::Result;
use chrono::{DateTime, Utc};
use meal_planner_shared::{DietaryPreference, MealPlan};
use sqlx::PgPool;
use uuid::Uuid;

const MEAL_PLAN_COLUMNS: &str = "id, name, description, ingredients, preferences, calories, \
                                 protein, fat, carbs, image, created_at, updated_at";

/// Meal plan record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MealPlanRecord {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub ingredients: Vec<String>,
    pub preferences: Vec<String>,
    pub calories: i32,
    pub protein: i32,
    pub fat: i32,
    pub carbs: i32,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MealPlanRecord {
    pub fn into_model(self) -> Result<MealPlan> {
        let preferences = self
            .preferences
            .iter()
            .map(|p| p.parse::<DietaryPreference>())
            .collect::<Result<Vec<_>, _>>()?;

        Ok(MealPlan {
            id: self.id,
            name: self.name,
            description: self.description,
            ingredients: self.ingredients,
            preferences,
            calories: self.calories,
            protein: self.protein,
            fat: self.fat,
            carbs: self.carbs,
            image: self.image,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Validated catalog entry fields
#[derive(Debug, Clone)]
pub struct MealPlanFields {
    pub name: String,
    pub description: String,
    pub ingredients: Vec<String>,
    pub preferences: Vec<DietaryPreference>,
    pub calories: i32,
    pub protein: i32,
    pub fat: i32,
    pub carbs: i32,
    pub image: Option<String>,
}

impl MealPlanFields {
    fn preference_labels(&self) -> Vec<String> {
        self.preferences.iter().map(|p| p.as_str().to_string()).collect()
    }
}

/// Meal-plan repository
pub struct MealPlanRepository;

impl MealPlanRepository {
    pub async fn create(pool: &PgPool, fields: &MealPlanFields) -> Result<MealPlanRecord> {
        let record = sqlx::query_as::<_, MealPlanRecord>(&format!(
            r#"
            INSERT INTO meal_plans
                (name, description, ingredients, preferences, calories, protein, fat, carbs, image)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {MEAL_PLAN_COLUMNS}
            "#
        ))
        .bind(&fields.name)
        .bind(&fields.description)
        .bind(&fields.ingredients)
        .bind(fields.preference_labels())
        .bind(fields.calories)
        .bind(fields.protein)
        .bind(fields.fat)
        .bind(fields.carbs)
        .bind(&fields.image)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<MealPlanRecord>> {
        let records = sqlx::query_as::<_, MealPlanRecord>(&format!(
            "SELECT {MEAL_PLAN_COLUMNS} FROM meal_plans ORDER BY created_at, id"
        ))
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<MealPlanRecord>> {
        let record = sqlx::query_as::<_, MealPlanRecord>(&format!(
            "SELECT {MEAL_PLAN_COLUMNS} FROM meal_plans WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<MealPlanRecord>> {
        let record = sqlx::query_as::<_, MealPlanRecord>(&format!(
            "SELECT {MEAL_PLAN_COLUMNS} FROM meal_plans WHERE name = $1"
        ))
        .bind(name)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    pub async fn exists(pool: &PgPool, id: Uuid) -> Result<bool> {
        let result = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM meal_plans WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await?;

        Ok(result)
    }

    /// Replace every field of an entry
    pub async fn update(pool: &PgPool, id: Uuid, fields: &MealPlanFields) -> Result<Option<MealPlanRecord>> {
        let record = sqlx::query_as::<_, MealPlanRecord>(&format!(
            r#"
            UPDATE meal_plans SET
                name = $2,
                description = $3,
                ingredients = $4,
                preferences = $5,
                calories = $6,
                protein = $7,
                fat = $8,
                carbs = $9,
                image = $10,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {MEAL_PLAN_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&fields.name)
        .bind(&fields.description)
        .bind(&fields.ingredients)
        .bind(fields.preference_labels())
        .bind(fields.calories)
        .bind(fields.protein)
        .bind(fields.fat)
        .bind(fields.carbs)
        .bind(&fields.image)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// Delete an entry, returning what was removed
    ///
    /// Selections referencing it go with it (cascade).
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<Option<MealPlanRecord>> {
        let record = sqlx::query_as::<_, MealPlanRecord>(&format!(
            "DELETE FROM meal_plans WHERE id = $1 RETURNING {MEAL_PLAN_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }
}
