//! Meal Planner WASM Module
//!
//! Browser bindings for the nutrition calculator, so the client can preview
//! macro targets before saving a tracker.

use meal_planner_shared::nutrition::{self, ActivityLevel, BiometricProfile, Gender, Goal};
use meal_planner_shared::validation::{validate_age, validate_height_cm, validate_weight};
use wasm_bindgen::prelude::*;

fn profile(
    age: u32,
    weight_kg: f64,
    height_cm: f64,
    gender: &str,
    activity: &str,
    goal: &str,
) -> Result<BiometricProfile, String> {
    validate_age(age)?;
    validate_height_cm(height_cm)?;
    validate_weight(weight_kg)?;

    Ok(BiometricProfile {
        age,
        gender: gender.parse::<Gender>().map_err(|e| e.to_string())?,
        height: height_cm,
        weight: weight_kg,
        activity: activity.parse::<ActivityLevel>().map_err(|e| e.to_string())?,
        goal: goal.parse::<Goal>().map_err(|e| e.to_string())?,
    })
}

fn targets_json(
    age: u32,
    weight_kg: f64,
    height_cm: f64,
    gender: &str,
    activity: &str,
    goal: &str,
) -> Result<String, String> {
    let profile = profile(age, weight_kg, height_cm, gender, activity, goal)?;
    serde_json::to_string(&nutrition::macro_targets(&profile)).map_err(|e| e.to_string())
}

/// Daily calorie target in kcal
#[wasm_bindgen(js_name = dailyCalories)]
pub fn daily_calories(
    age: u32,
    weight_kg: f64,
    height_cm: f64,
    gender: &str,
    activity: &str,
    goal: &str,
) -> Result<i32, JsValue> {
    let p = profile(age, weight_kg, height_cm, gender, activity, goal).map_err(JsValue::from)?;
    Ok(nutrition::daily_calories(
        p.age, p.weight, p.height, p.gender, p.activity, p.goal,
    ))
}

/// Calories and macro grams as a JSON object string
#[wasm_bindgen(js_name = macroTargets)]
pub fn macro_targets(
    age: u32,
    weight_kg: f64,
    height_cm: f64,
    gender: &str,
    activity: &str,
    goal: &str,
) -> Result<String, JsValue> {
    targets_json(age, weight_kg, height_cm, gender, activity, goal).map_err(JsValue::from)
}

/// Activity labels accepted by the calculator, as a JSON array string
#[wasm_bindgen(js_name = activityLevels)]
pub fn activity_levels() -> String {
    let labels: Vec<&str> = ActivityLevel::ALL.iter().map(|a| a.label()).collect();
    serde_json::to_string(&labels).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIGHT: &str = "Lightly active (light exercise 1-3 days/week)";

    #[test]
    fn test_targets_json() {
        let json = targets_json(25, 70.0, 175.0, "male", LIGHT, "weight-loss").unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["calories"], 1801);
        assert_eq!(value["protein"], 135);
    }

    #[test]
    fn test_profile_rejects_bad_input() {
        assert!(profile(25, 70.0, 175.0, "other", LIGHT, "weight-loss").is_err());
        assert!(profile(25, 70.0, 175.0, "male", "couch", "weight-loss").is_err());
        assert!(profile(0, 70.0, 175.0, "male", LIGHT, "weight-loss").is_err());
        assert!(profile(25, 70.0, 10.0, "male", LIGHT, "weight-loss").is_err());
    }

    #[test]
    fn test_activity_levels_lists_all() {
        let labels: Vec<String> = serde_json::from_str(&activity_levels()).unwrap();
        assert_eq!(labels.len(), 5);
        assert_eq!(labels[1], LIGHT);
    }
}
