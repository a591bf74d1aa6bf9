//! Macro tracker repository
//!
//! One row per user; writes always replace the whole record.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use meal_planner_shared::{
    ActivityLevel, BiometricProfile, Gender, Goal, MacroTargets, MacroTracker,
};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

const TRACKER_COLUMNS: &str =
    "user_id, age, gender, height, weight, activity, goal, calories, protein, fat, carbs, updated_at";

/// Macro tracker record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MacroTrackerRecord {
    pub user_id: Uuid,
    pub age: i32,
    pub gender: String,
    pub height: f64,
    pub weight: f64,
    pub activity: String,
    pub goal: String,
    pub calories: i32,
    pub protein: i32,
    pub fat: i32,
    pub carbs: i32,
    pub updated_at: DateTime<Utc>,
}

impl MacroTrackerRecord {
    /// Rebuild the typed tracker; stored labels were validated on write
    pub fn into_model(self) -> Result<MacroTracker> {
        let profile = BiometricProfile {
            age: u32::try_from(self.age).context("Stored age is negative")?,
            gender: self.gender.parse::<Gender>()?,
            height: self.height,
            weight: self.weight,
            activity: self.activity.parse::<ActivityLevel>()?,
            goal: self.goal.parse::<Goal>()?,
        };

        Ok(MacroTracker {
            profile,
            targets: MacroTargets {
                calories: self.calories,
                protein: self.protein,
                fat: self.fat,
                carbs: self.carbs,
            },
            updated_at: self.updated_at,
        })
    }
}

/// Macro tracker repository
pub struct MacroTrackerRepository;

impl MacroTrackerRepository {
    /// Tracker of one user
    pub async fn find(pool: &PgPool, user_id: Uuid) -> Result<Option<MacroTrackerRecord>> {
        let record = sqlx::query_as::<_, MacroTrackerRecord>(&format!(
            "SELECT {TRACKER_COLUMNS} FROM macro_trackers WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// Trackers of several users at once
    pub async fn find_many(pool: &PgPool, user_ids: &[Uuid]) -> Result<Vec<MacroTrackerRecord>> {
        let records = sqlx::query_as::<_, MacroTrackerRecord>(&format!(
            "SELECT {TRACKER_COLUMNS} FROM macro_trackers WHERE user_id = ANY($1)"
        ))
        .bind(user_ids)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// Create or fully replace a user's tracker
    pub async fn upsert<'e, E>(
        executor: E,
        user_id: Uuid,
        profile: &BiometricProfile,
        targets: &MacroTargets,
    ) -> Result<MacroTrackerRecord>
    where
        E: PgExecutor<'e>,
    {
        let age = i32::try_from(profile.age).context("Age out of range")?;

        let record = sqlx::query_as::<_, MacroTrackerRecord>(&format!(
            r#"
            INSERT INTO macro_trackers
                (user_id, age, gender, height, weight, activity, goal, calories, protein, fat, carbs)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (user_id) DO UPDATE SET
                age = EXCLUDED.age,
                gender = EXCLUDED.gender,
                height = EXCLUDED.height,
                weight = EXCLUDED.weight,
                activity = EXCLUDED.activity,
                goal = EXCLUDED.goal,
                calories = EXCLUDED.calories,
                protein = EXCLUDED.protein,
                fat = EXCLUDED.fat,
                carbs = EXCLUDED.carbs,
                updated_at = NOW()
            RETURNING {TRACKER_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(age)
        .bind(profile.gender.as_str())
        .bind(profile.height)
        .bind(profile.weight)
        .bind(profile.activity.label())
        .bind(profile.goal.as_str())
        .bind(targets.calories)
        .bind(targets.protein)
        .bind(targets.fat)
        .bind(targets.carbs)
        .fetch_one(executor)
        .await?;

        Ok(record)
    }
}
