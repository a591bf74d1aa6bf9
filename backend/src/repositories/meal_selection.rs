//! Per-user meal-plan selections

use anyhow::Result;
use chrono::{DateTime, Utc};
use meal_planner_shared::{DietaryPreference, MealPlanSelection};
use sqlx::PgPool;
use uuid::Uuid;

/// Selection record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SelectionRecord {
    pub user_id: Uuid,
    pub meal_plan_id: Uuid,
    pub dietary_preference: String,
    pub added_at: DateTime<Utc>,
}

impl SelectionRecord {
    pub fn into_model(self) -> Result<MealPlanSelection> {
        Ok(MealPlanSelection {
            meal_plan_id: self.meal_plan_id,
            dietary_preference: self.dietary_preference.parse::<DietaryPreference>()?,
        })
    }
}

/// Meal-plan selection repository
pub struct MealSelectionRepository;

impl MealSelectionRepository {
    /// A user's selections in the order they were added
    pub async fn list(pool: &PgPool, user_id: Uuid) -> Result<Vec<SelectionRecord>> {
        let records = sqlx::query_as::<_, SelectionRecord>(
            r#"
            SELECT user_id, meal_plan_id, dietary_preference, added_at
            FROM user_meal_plans
            WHERE user_id = $1
            ORDER BY added_at, meal_plan_id
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// Selections of several users, each user's in added order
    pub async fn list_many(pool: &PgPool, user_ids: &[Uuid]) -> Result<Vec<SelectionRecord>> {
        let records = sqlx::query_as::<_, SelectionRecord>(
            r#"
            SELECT user_id, meal_plan_id, dietary_preference, added_at
            FROM user_meal_plans
            WHERE user_id = ANY($1)
            ORDER BY user_id, added_at, meal_plan_id
            "#,
        )
        .bind(user_ids)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// Add a selection, or change the preference of an existing one in place
    pub async fn upsert(
        pool: &PgPool,
        user_id: Uuid,
        meal_plan_id: Uuid,
        preference: DietaryPreference,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO user_meal_plans (user_id, meal_plan_id, dietary_preference)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, meal_plan_id)
            DO UPDATE SET dietary_preference = EXCLUDED.dietary_preference
            "#,
        )
        .bind(user_id)
        .bind(meal_plan_id)
        .bind(preference.as_str())
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Remove a selection; `false` when it was not selected
    pub async fn remove(pool: &PgPool, user_id: Uuid, meal_plan_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM user_meal_plans WHERE user_id = $1 AND meal_plan_id = $2")
            .bind(user_id)
            .bind(meal_plan_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
