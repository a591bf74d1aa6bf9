//! Nutrition calculations module
//!
//! Computes the daily calorie target and the protein / fat / carbohydrate
//! split stored in a user's macro tracker.
//!
//! # Design Principles
//!
//! 1. **Pure Functions**: identical inputs always yield identical outputs
//! 2. **Closed Inputs**: activity level, goal and gender are enums, so an
//!    unrecognized label is rejected while parsing and never reaches a formula
//! 3. **One Formula Family**: macros are fixed percentages of the calorie target

use crate::errors::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Share of calories from protein
pub const PROTEIN_CALORIE_SHARE: f64 = 0.30;
/// Share of calories from fat
pub const FAT_CALORIE_SHARE: f64 = 0.35;
/// Share of calories from carbohydrates
pub const CARB_CALORIE_SHARE: f64 = 0.35;

/// kcal per gram of protein / carbohydrate
const KCAL_PER_GRAM_PROTEIN: f64 = 4.0;
const KCAL_PER_GRAM_CARB: f64 = 4.0;
/// kcal per gram of fat
const KCAL_PER_GRAM_FAT: f64 = 9.0;

/// Daily calorie adjustment applied for weight loss / muscle gain
const GOAL_ADJUSTMENT_KCAL: f64 = 500.0;

// ============================================================================
// Input Types
// ============================================================================

/// Gender used by the Mifflin-St Jeor equation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Male, Gender::Female];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

/// Activity level tiers, ordered from least to most active
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ActivityLevel {
    #[serde(rename = "Sedentary (little or no exercise)")]
    Sedentary,
    #[serde(rename = "Lightly active (light exercise 1-3 days/week)")]
    LightlyActive,
    #[serde(rename = "Moderately active (moderate exercise 3-5 days/week)")]
    ModeratelyActive,
    #[serde(rename = "Very active (hard exercise 6-7 days/week)")]
    VeryActive,
    #[serde(rename = "Super active (very hard exercise or physical job)")]
    SuperActive,
}

impl ActivityLevel {
    pub const ALL: [ActivityLevel; 5] = [
        ActivityLevel::Sedentary,
        ActivityLevel::LightlyActive,
        ActivityLevel::ModeratelyActive,
        ActivityLevel::VeryActive,
        ActivityLevel::SuperActive,
    ];

    /// Get the activity multiplier applied to BMR
    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::LightlyActive => 1.375,
            ActivityLevel::ModeratelyActive => 1.55,
            ActivityLevel::VeryActive => 1.725,
            ActivityLevel::SuperActive => 1.9,
        }
    }

    /// The exact label clients send and receive
    pub fn label(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "Sedentary (little or no exercise)",
            ActivityLevel::LightlyActive => "Lightly active (light exercise 1-3 days/week)",
            ActivityLevel::ModeratelyActive => "Moderately active (moderate exercise 3-5 days/week)",
            ActivityLevel::VeryActive => "Very active (hard exercise 6-7 days/week)",
            ActivityLevel::SuperActive => "Super active (very hard exercise or physical job)",
        }
    }
}

/// Calorie goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Goal {
    WeightLoss,
    Maintenance,
    MuscleGain,
}

impl Goal {
    pub const ALL: [Goal; 3] = [Goal::WeightLoss, Goal::Maintenance, Goal::MuscleGain];

    pub fn as_str(&self) -> &'static str {
        match self {
            Goal::WeightLoss => "weight-loss",
            Goal::Maintenance => "maintenance",
            Goal::MuscleGain => "muscle-gain",
        }
    }

    /// Calories added to (or removed from) the maintenance target
    pub fn adjustment_kcal(&self) -> f64 {
        match self {
            Goal::WeightLoss => -GOAL_ADJUSTMENT_KCAL,
            Goal::Maintenance => 0.0,
            Goal::MuscleGain => GOAL_ADJUSTMENT_KCAL,
        }
    }
}

macro_rules! impl_label_parsing {
    ($ty:ty, $label:ident, $what:literal) => {
        impl FromStr for $ty {
            type Err = AppError;

            /// Exact, case-sensitive match against the enumerated labels
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <$ty>::ALL
                    .into_iter()
                    .find(|v| v.$label() == s)
                    .ok_or_else(|| AppError::validation(format!("Invalid {}: {}", $what, s)))
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.$label())
            }
        }
    };
}

impl_label_parsing!(Gender, as_str, "gender");
impl_label_parsing!(ActivityLevel, label, "activity level");
impl_label_parsing!(Goal, as_str, "goal");

/// Biometric inputs of a macro tracker, already validated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BiometricProfile {
    pub age: u32,
    pub gender: Gender,
    /// Height in centimeters
    pub height: f64,
    /// Weight in kilograms
    pub weight: f64,
    pub activity: ActivityLevel,
    pub goal: Goal,
}

/// Derived daily targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MacroTargets {
    pub calories: i32,
    pub protein: i32,
    pub fat: i32,
    pub carbs: i32,
}

// ============================================================================
// Calculations
// ============================================================================

/// Basal Metabolic Rate using the Mifflin-St Jeor equation
///
/// Men: BMR = 10 × weight(kg) + 6.25 × height(cm) - 5 × age(y) + 5
/// Women: BMR = 10 × weight(kg) + 6.25 × height(cm) - 5 × age(y) - 161
pub fn calculate_bmr(age: u32, weight_kg: f64, height_cm: f64, gender: Gender) -> f64 {
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * age as f64;
    match gender {
        Gender::Male => base + 5.0,
        Gender::Female => base - 161.0,
    }
}

/// Daily calorie target: BMR × activity multiplier ± goal adjustment, rounded
pub fn daily_calories(
    age: u32,
    weight_kg: f64,
    height_cm: f64,
    gender: Gender,
    activity: ActivityLevel,
    goal: Goal,
) -> i32 {
    let bmr = calculate_bmr(age, weight_kg, height_cm, gender);
    let maintenance = bmr * activity.multiplier();
    (maintenance + goal.adjustment_kcal()).round() as i32
}

/// Protein grams: 30% of calories at 4 kcal/g
pub fn protein_grams(calories: i32) -> i32 {
    (calories as f64 * PROTEIN_CALORIE_SHARE / KCAL_PER_GRAM_PROTEIN).round() as i32
}

/// Fat grams: 35% of calories at 9 kcal/g
pub fn fat_grams(calories: i32) -> i32 {
    (calories as f64 * FAT_CALORIE_SHARE / KCAL_PER_GRAM_FAT).round() as i32
}

/// Carbohydrate grams: 35% of calories at 4 kcal/g
pub fn carb_grams(calories: i32) -> i32 {
    (calories as f64 * CARB_CALORIE_SHARE / KCAL_PER_GRAM_CARB).round() as i32
}

/// Compute all four targets for a profile
pub fn macro_targets(profile: &BiometricProfile) -> MacroTargets {
    let calories = daily_calories(
        profile.age,
        profile.weight,
        profile.height,
        profile.gender,
        profile.activity,
        profile.goal,
    );

    MacroTargets {
        calories,
        protein: protein_grams(calories),
        fat: fat_grams(calories),
        carbs: carb_grams(calories),
    }
}
