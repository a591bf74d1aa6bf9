//! API request and response types

use crate::errors::AppError;
use crate::models::{DietaryPreference, SecurityQuestion};
use crate::nutrition::{ActivityLevel, BiometricProfile, Gender, Goal};
use crate::validation::{
    validate_age, validate_height_cm, validate_password_field, validate_weight, REQUIRED_FIELDS,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

/// Response envelope used by every endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiMessage<T = ()> {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl ApiMessage<()> {
    /// Message without a payload
    pub fn text(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            data: None,
        }
    }
}

impl<T> ApiMessage<T> {
    pub fn with_data(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
        }
    }
}

/// Pick the single message reported for a failed `validate()` call
///
/// A missing required field wins over any other complaint; otherwise the
/// first error of the alphabetically first field is used.
pub fn first_validation_message(errors: &ValidationErrors) -> String {
    let mut fields: Vec<(String, Vec<String>)> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let messages = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid {}", field))
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    if fields
        .iter()
        .any(|(_, messages)| messages.iter().any(|m| m == REQUIRED_FIELDS))
    {
        return REQUIRED_FIELDS.to_string();
    }

    fields
        .into_iter()
        .flat_map(|(_, messages)| messages)
        .next()
        .unwrap_or_else(|| "Invalid request".to_string())
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Validation(first_validation_message(&errors))
    }
}

// ============================================================================
// Auth
// ============================================================================

/// Registration request
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "All fields are required"))]
    pub name: String,
    #[validate(
        length(min = 1, message = "All fields are required"),
        email(message = "Invalid email format")
    )]
    pub email: String,
    #[validate(
        length(min = 1, message = "All fields are required"),
        custom(function = "validate_password_field")
    )]
    pub password: String,
    #[validate(length(min = 1, message = "All fields are required"))]
    pub security_question: String,
    #[validate(length(min = 1, message = "All fields are required"))]
    pub security_answer: String,
    pub macro_tracker: Option<MacroTrackerRequest>,
}

impl RegisterRequest {
    pub fn question(&self) -> Result<SecurityQuestion, AppError> {
        self.security_question.parse()
    }
}

/// Login request
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "All fields are required"))]
    pub email: String,
    #[validate(length(min = 1, message = "All fields are required"))]
    pub password: String,
}

/// Login response payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    /// Seconds until the token expires
    pub expires_in: i64,
}

/// Body of `POST /auth/question`
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct EmailRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
}

/// Security question lookup payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityQuestionResponse {
    pub security_question: SecurityQuestion,
}

/// Body of `POST /auth/answer`
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct AnswerRequest {
    #[validate(length(min = 1, message = "All fields are required"))]
    pub email: String,
    #[validate(length(min = 1, message = "All fields are required"))]
    pub security_answer: String,
}

/// Body of `POST /auth/reset-password`
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 1, message = "All fields are required"))]
    pub email: String,
    #[validate(length(min = 1, message = "All fields are required"))]
    pub security_answer: String,
    #[validate(
        length(min = 1, message = "All fields are required"),
        custom(function = "validate_password_field")
    )]
    pub new_password: String,
}

// ============================================================================
// Users
// ============================================================================

/// Partial profile update; absent fields stay untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[validate(custom(function = "validate_password_field"))]
    pub password: Option<String>,
    pub is_admin: Option<bool>,
}

impl UpdateUserRequest {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.password.is_none() && self.is_admin.is_none()
    }
}

/// Body of `POST /users/{userId}/meal-plans`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AddMealPlanRequest {
    pub meal_plan_id: Option<Uuid>,
    pub dietary_preference: Option<String>,
}

impl AddMealPlanRequest {
    pub fn meal_plan_id(&self) -> Result<Uuid, AppError> {
        self.meal_plan_id
            .ok_or_else(|| AppError::validation("Meal Plan ID is required"))
    }

    /// Defaults to `none` when omitted
    pub fn preference(&self) -> Result<DietaryPreference, AppError> {
        match self.dietary_preference.as_deref() {
            None => Ok(DietaryPreference::default()),
            Some(raw) => raw.parse(),
        }
    }
}

/// Raw macro-tracker inputs
///
/// Every field is optional on the wire so that creation can report
/// missing inputs and updates can merge onto the stored record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MacroTrackerRequest {
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub activity: Option<String>,
    pub goal: Option<String>,
}

impl MacroTrackerRequest {
    /// Build a complete profile; every input must be present
    pub fn into_profile(self) -> Result<BiometricProfile, AppError> {
        match (self.age, self.gender, self.height, self.weight, self.activity, self.goal) {
            (Some(age), Some(gender), Some(height), Some(weight), Some(activity), Some(goal)) => {
                checked_profile(BiometricProfile {
                    age,
                    gender: gender.parse::<Gender>()?,
                    height,
                    weight,
                    activity: activity.parse::<ActivityLevel>()?,
                    goal: goal.parse::<Goal>()?,
                })
            }
            _ => Err(AppError::validation(REQUIRED_FIELDS)),
        }
    }

    /// Overlay the supplied inputs onto an existing profile
    pub fn merge_into(self, existing: &BiometricProfile) -> Result<BiometricProfile, AppError> {
        let merged = BiometricProfile {
            age: self.age.unwrap_or(existing.age),
            gender: match self.gender {
                Some(g) => g.parse()?,
                None => existing.gender,
            },
            height: self.height.unwrap_or(existing.height),
            weight: self.weight.unwrap_or(existing.weight),
            activity: match self.activity {
                Some(a) => a.parse()?,
                None => existing.activity,
            },
            goal: match self.goal {
                Some(g) => g.parse()?,
                None => existing.goal,
            },
        };
        checked_profile(merged)
    }
}

fn checked_profile(profile: BiometricProfile) -> Result<BiometricProfile, AppError> {
    validate_age(profile.age).map_err(AppError::Validation)?;
    validate_height_cm(profile.height).map_err(AppError::Validation)?;
    validate_weight(profile.weight).map_err(AppError::Validation)?;
    Ok(profile)
}

// ============================================================================
// Catalog
// ============================================================================

/// Blog post create / replace request
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct BlogPostRequest {
    #[validate(length(min = 1, message = "All fields are required"))]
    pub title: String,
    #[validate(length(min = 1, message = "All fields are required"))]
    pub author: String,
    #[validate(length(min = 1, message = "All fields are required"))]
    pub content: String,
    pub tags: Vec<String>,
}

/// Meal-plan create / replace request, assembled from form fields
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct MealPlanRequest {
    #[validate(length(min = 1, message = "All fields are required"))]
    pub name: String,
    #[validate(length(min = 1, message = "All fields are required"))]
    pub description: String,
    #[validate(length(min = 1, message = "All fields are required"))]
    pub ingredients: Vec<String>,
    pub preferences: Vec<DietaryPreference>,
    #[validate(required(message = "All fields are required"), range(min = 0, message = "Calories cannot be negative"))]
    pub calories: Option<i32>,
    #[validate(required(message = "All fields are required"), range(min = 0, message = "Protein cannot be negative"))]
    pub protein: Option<i32>,
    #[validate(required(message = "All fields are required"), range(min = 0, message = "Fat cannot be negative"))]
    pub fat: Option<i32>,
    #[validate(required(message = "All fields are required"), range(min = 0, message = "Carbs cannot be negative"))]
    pub carbs: Option<i32>,
}
