//! Data models for the Meal Planner application

use crate::errors::AppError;
use crate::nutrition::{BiometricProfile, MacroTargets};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Account role carried in session tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Standard,
}

impl Role {
    pub fn from_admin_flag(is_admin: bool) -> Self {
        if is_admin {
            Role::Admin
        } else {
            Role::Standard
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

/// The fixed set of security questions offered at registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SecurityQuestion {
    #[serde(rename = "What is your mother’s maiden name?")]
    MothersMaidenName,
    #[serde(rename = "What was the name of your first pet?")]
    FirstPetName,
    #[serde(rename = "What is the name of the city where you were born?")]
    BirthCity,
}

impl SecurityQuestion {
    pub const ALL: [SecurityQuestion; 3] = [
        SecurityQuestion::MothersMaidenName,
        SecurityQuestion::FirstPetName,
        SecurityQuestion::BirthCity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SecurityQuestion::MothersMaidenName => "What is your mother’s maiden name?",
            SecurityQuestion::FirstPetName => "What was the name of your first pet?",
            SecurityQuestion::BirthCity => "What is the name of the city where you were born?",
        }
    }
}

impl FromStr for SecurityQuestion {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|q| q.as_str() == s)
            .ok_or_else(|| AppError::validation("Invalid security question"))
    }
}

impl fmt::Display for SecurityQuestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dietary preference tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DietaryPreference {
    Vegetarian,
    Vegan,
    GlutenFree,
    NutFree,
    #[default]
    None,
}

impl DietaryPreference {
    pub const ALL: [DietaryPreference; 5] = [
        DietaryPreference::Vegetarian,
        DietaryPreference::Vegan,
        DietaryPreference::GlutenFree,
        DietaryPreference::NutFree,
        DietaryPreference::None,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DietaryPreference::Vegetarian => "vegetarian",
            DietaryPreference::Vegan => "vegan",
            DietaryPreference::GlutenFree => "gluten-free",
            DietaryPreference::NutFree => "nut-free",
            DietaryPreference::None => "none",
        }
    }
}

impl FromStr for DietaryPreference {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| AppError::validation("Invalid dietary preference"))
    }
}

impl fmt::Display for DietaryPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A meal plan the user picked, with the preference they picked it under
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPlanSelection {
    pub meal_plan_id: Uuid,
    pub dietary_preference: DietaryPreference,
}

/// Macro tracker: biometric inputs plus the targets derived from them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MacroTracker {
    #[serde(flatten)]
    pub profile: BiometricProfile,
    #[serde(flatten)]
    pub targets: MacroTargets,
    pub updated_at: DateTime<Utc>,
}

/// Public view of an account
///
/// Never carries the password or security-answer hashes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
    pub security_question: SecurityQuestion,
    pub macro_tracker: Option<MacroTracker>,
    pub selected_meal_plan: Vec<MealPlanSelection>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Blog post
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub content: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Meal-plan catalog entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPlan {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub ingredients: Vec<String>,
    pub preferences: Vec<DietaryPreference>,
    pub calories: i32,
    pub protein: i32,
    pub fat: i32,
    pub carbs: i32,
    /// Stored filename, served under `/uploads/`
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
