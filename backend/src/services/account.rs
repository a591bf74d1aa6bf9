//! Account management, meal-plan selections and macro tracking

use crate::auth::PasswordService;
use crate::error::{is_unique_violation, ApiError};
use crate::repositories::{
    MacroTrackerRecord, MacroTrackerRepository, MealPlanRepository, MealSelectionRepository,
    SelectionRecord, UserChanges, UserRecord, UserRepository,
};
use meal_planner_shared::nutrition::macro_targets;
use meal_planner_shared::validation::normalize_email;
use meal_planner_shared::{
    Account, DietaryPreference, MacroTracker, MacroTrackerRequest, MealPlanSelection,
    UpdateUserRequest,
};
use sqlx::PgPool;
use std::collections::HashMap;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

fn user_not_found(id: Uuid) -> ApiError {
    ApiError::NotFound(format!("User ID {} not found", id))
}

fn tracker_not_found() -> ApiError {
    ApiError::NotFound("Macro tracker not found".to_string())
}

/// Account service
pub struct AccountService;

impl AccountService {
    /// Assemble the public view of one account
    pub async fn view(pool: &PgPool, user: UserRecord) -> Result<Account, ApiError> {
        let tracker = MacroTrackerRepository::find(pool, user.id).await?;
        let selections = MealSelectionRepository::list(pool, user.id).await?;
        Self::assemble(user, tracker, selections)
    }

    fn assemble(
        user: UserRecord,
        tracker: Option<MacroTrackerRecord>,
        selections: Vec<SelectionRecord>,
    ) -> Result<Account, ApiError> {
        let security_question = user.question()?;
        let macro_tracker = tracker.map(MacroTrackerRecord::into_model).transpose()?;
        let selected_meal_plan = selections
            .into_iter()
            .map(SelectionRecord::into_model)
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(Account {
            id: user.id,
            name: user.name,
            email: user.email,
            is_admin: user.is_admin,
            security_question,
            macro_tracker,
            selected_meal_plan,
            created_at: user.created_at,
            updated_at: user.updated_at,
        })
    }

    async fn require_user(pool: &PgPool, id: Uuid) -> Result<UserRecord, ApiError> {
        UserRepository::find_by_id(pool, id)
            .await?
            .ok_or_else(|| user_not_found(id))
    }

    /// Every account, with trackers and selections
    pub async fn list(pool: &PgPool) -> Result<Vec<Account>, ApiError> {
        let users = UserRepository::list(pool).await?;
        let ids: Vec<Uuid> = users.iter().map(|u| u.id).collect();

        let mut trackers: HashMap<Uuid, MacroTrackerRecord> = MacroTrackerRepository::find_many(pool, &ids)
            .await?
            .into_iter()
            .map(|t| (t.user_id, t))
            .collect();

        let mut selections: HashMap<Uuid, Vec<SelectionRecord>> = HashMap::new();
        for record in MealSelectionRepository::list_many(pool, &ids).await? {
            selections.entry(record.user_id).or_default().push(record);
        }

        users
            .into_iter()
            .map(|user| {
                let tracker = trackers.remove(&user.id);
                let picked = selections.remove(&user.id).unwrap_or_default();
                Self::assemble(user, tracker, picked)
            })
            .collect()
    }

    pub async fn get(pool: &PgPool, id: Uuid) -> Result<Account, ApiError> {
        let user = Self::require_user(pool, id).await?;
        Self::view(pool, user).await
    }

    /// Apply a partial profile update
    ///
    /// Role checks happen in the handler; this only validates and persists.
    pub async fn update(pool: &PgPool, id: Uuid, req: UpdateUserRequest) -> Result<Account, ApiError> {
        if req.is_empty() {
            return Err(ApiError::Validation("No fields to update".to_string()));
        }
        req.validate()?;
        if req.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(ApiError::Validation("Name cannot be empty".to_string()));
        }

        let current = Self::require_user(pool, id).await?;

        let email = req.email.as_deref().map(normalize_email);
        if let Some(email) = &email {
            if *email != current.email && UserRepository::email_exists(pool, email).await? {
                return Err(ApiError::Conflict("Email already in use".to_string()));
            }
        }

        let password_hash = match req.password {
            Some(password) => Some(PasswordService::hash_async(password).await?),
            None => None,
        };

        let changes = UserChanges {
            name: req.name.map(|n| n.trim().to_string()),
            email,
            password_hash,
            is_admin: req.is_admin,
        };

        let updated = UserRepository::update(pool, id, changes)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    ApiError::Conflict("Email already in use".to_string())
                } else {
                    ApiError::Internal(e)
                }
            })?
            .ok_or_else(|| user_not_found(id))?;

        info!(user_id = %id, "User updated");
        Self::view(pool, updated).await
    }

    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), ApiError> {
        if !UserRepository::delete(pool, id).await? {
            return Err(user_not_found(id));
        }
        info!(user_id = %id, "User deleted");
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Meal-plan selections
    // ------------------------------------------------------------------------

    async fn selections(pool: &PgPool, user_id: Uuid) -> Result<Vec<MealPlanSelection>, ApiError> {
        let selections = MealSelectionRepository::list(pool, user_id)
            .await?
            .into_iter()
            .map(SelectionRecord::into_model)
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(selections)
    }

    /// Select a meal plan, or change the preference it was selected under
    pub async fn add_meal_plan(
        pool: &PgPool,
        user_id: Uuid,
        meal_plan_id: Uuid,
        preference: DietaryPreference,
    ) -> Result<Vec<MealPlanSelection>, ApiError> {
        Self::require_user(pool, user_id).await?;
        if !MealPlanRepository::exists(pool, meal_plan_id).await? {
            return Err(ApiError::NotFound(format!("Meal ID {} not found", meal_plan_id)));
        }

        MealSelectionRepository::upsert(pool, user_id, meal_plan_id, preference).await?;
        info!(user_id = %user_id, meal_plan_id = %meal_plan_id, "Meal plan selected");

        Self::selections(pool, user_id).await
    }

    pub async fn remove_meal_plan(
        pool: &PgPool,
        user_id: Uuid,
        meal_plan_id: Uuid,
    ) -> Result<Vec<MealPlanSelection>, ApiError> {
        Self::require_user(pool, user_id).await?;
        if !MealSelectionRepository::remove(pool, user_id, meal_plan_id).await? {
            return Err(ApiError::NotFound(format!(
                "Meal ID {} not found in selected meal plans",
                meal_plan_id
            )));
        }

        info!(user_id = %user_id, meal_plan_id = %meal_plan_id, "Meal plan deselected");
        Self::selections(pool, user_id).await
    }

    // ------------------------------------------------------------------------
    // Macro tracker
    // ------------------------------------------------------------------------

    pub async fn get_tracker(pool: &PgPool, user_id: Uuid) -> Result<MacroTracker, ApiError> {
        Self::require_user(pool, user_id).await?;
        let record = MacroTrackerRepository::find(pool, user_id)
            .await?
            .ok_or_else(tracker_not_found)?;
        Ok(record.into_model()?)
    }

    /// Compute targets from a complete set of inputs and store them
    pub async fn set_tracker(
        pool: &PgPool,
        user_id: Uuid,
        req: MacroTrackerRequest,
    ) -> Result<MacroTracker, ApiError> {
        let profile = req.into_profile()?;
        Self::require_user(pool, user_id).await?;

        let targets = macro_targets(&profile);
        let record = MacroTrackerRepository::upsert(pool, user_id, &profile, &targets).await?;

        info!(user_id = %user_id, calories = targets.calories, "Macro tracker stored");
        Ok(record.into_model()?)
    }

    /// Merge new inputs into the stored tracker and recompute
    pub async fn update_tracker(
        pool: &PgPool,
        user_id: Uuid,
        req: MacroTrackerRequest,
    ) -> Result<MacroTracker, ApiError> {
        Self::require_user(pool, user_id).await?;
        let existing = MacroTrackerRepository::find(pool, user_id)
            .await?
            .ok_or_else(tracker_not_found)?
            .into_model()?;

        let profile = req.merge_into(&existing.profile)?;
        let targets = macro_targets(&profile);
        let record = MacroTrackerRepository::upsert(pool, user_id, &profile, &targets).await?;

        info!(user_id = %user_id, calories = targets.calories, "Macro tracker recomputed");
        Ok(record.into_model()?)
    }
}
