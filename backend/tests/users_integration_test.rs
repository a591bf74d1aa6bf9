//! Integration tests for profiles, meal-plan selections and macro tracking

mod common;

use axum::http::StatusCode;
use common::unique_name;
use serde_json::{json, Value};

async fn create_meal_plan(app: &common::TestApp, token: &str) -> String {
    let name = unique_name("Lentil soup");
    let (status, body) = app
        .multipart(
            "POST",
            "/api/v1/meal-plans",
            Some(token),
            &[
                ("name", name.as_str()),
                ("description", "Red lentils, carrots and cumin"),
                ("ingredients", r#"["lentils","carrots","cumin"]"#),
                ("preferences", "vegan"),
                ("calories", "420"),
                ("protein", "24"),
                ("fat", "8"),
                ("carbs", "60"),
            ],
            None,
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {}", body);
    body["data"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_profile_access_rules() {
    let app = common::TestApp::new().await;
    let alice = app.register().await;
    let bob = app.register().await;
    let admin = app.admin().await;

    let own = format!("/api/v1/users/{}", alice.id);
    let (status, body) = app.get(&own, Some(&alice.token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], alice.email);

    let (status, _) = app.get(&own, Some(&bob.token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.get(&own, Some(&admin.token)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.get("/api/v1/users", Some(&admin.token)).await;
    assert_eq!(status, StatusCode::OK);
    let emails: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|u| u["email"].as_str())
        .collect();
    assert!(emails.contains(&alice.email.as_str()));
    assert!(emails.contains(&bob.email.as_str()));
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_update_profile() {
    let app = common::TestApp::new().await;
    let alice = app.register().await;
    let bob = app.register().await;
    let path = format!("/api/v1/users/{}", alice.id);

    let (status, body) = app
        .put(&path, Some(&alice.token), json!({ "name": "Alice Cooper" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Profile updated successfully");
    assert_eq!(body["data"]["name"], "Alice Cooper");
    assert_eq!(body["data"]["email"], alice.email);

    let (status, body) = app
        .put(&path, Some(&alice.token), json!({ "email": bob.email }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Email already in use");
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_admin_promotes_and_deletes() {
    let app = common::TestApp::new().await;
    let alice = app.register().await;
    let admin = app.admin().await;
    let path = format!("/api/v1/users/{}", alice.id);

    let (status, body) = app
        .put(&path, Some(&admin.token), json!({ "isAdmin": true }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["isAdmin"], true);

    let (status, body) = app.delete(&path, Some(&admin.token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], format!("User {} deleted successfully", alice.id));

    let (status, body) = app.get(&path, Some(&admin.token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], format!("User ID {} not found", alice.id));
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_meal_plan_selection() {
    let app = common::TestApp::new().await;
    let admin = app.admin().await;
    let alice = app.register().await;
    let first = create_meal_plan(&app, &admin.token).await;
    let second = create_meal_plan(&app, &admin.token).await;
    let path = format!("/api/v1/users/{}/meal-plans", alice.id);

    let (status, body) = app
        .post(&path, Some(&alice.token), json!({ "mealPlanId": first }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Meal item added successfully");
    assert_eq!(body["data"]["selectedMealPlan"][0]["dietaryPreference"], "none");

    app.post(&path, Some(&alice.token), json!({ "mealPlanId": second }))
        .await;

    // Re-selecting keeps position and updates the preference
    let (_, body) = app
        .post(
            &path,
            Some(&alice.token),
            json!({ "mealPlanId": first, "dietaryPreference": "vegan" }),
        )
        .await;
    let selected = body["data"]["selectedMealPlan"].as_array().unwrap().clone();
    assert_eq!(selected.len(), 2);
    assert_eq!(selected[0]["mealPlanId"], Value::String(first.clone()));
    assert_eq!(selected[0]["dietaryPreference"], "vegan");

    let (status, body) = app
        .post(
            &path,
            Some(&alice.token),
            json!({ "mealPlanId": uuid::Uuid::new_v4() }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["message"].as_str().unwrap().starts_with("Meal ID "));

    let (status, body) = app
        .delete(&format!("{}/{}", path, first), Some(&alice.token))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Meal item deleted successfully");
    assert_eq!(body["data"]["selectedMealPlan"].as_array().unwrap().len(), 1);

    let (status, body) = app
        .delete(&format!("{}/{}", path, first), Some(&alice.token))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body["message"],
        format!("Meal ID {} not found in selected meal plans", first)
    );
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_macro_tracker_lifecycle() {
    let app = common::TestApp::new().await;
    let alice = app.register().await;
    let path = format!("/api/v1/users/{}/macro-tracker", alice.id);

    let (status, body) = app.get(&path, Some(&alice.token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Macro tracker not found");

    let (status, body) = app
        .post(
            &path,
            Some(&alice.token),
            json!({
                "age": 25,
                "gender": "male",
                "height": 175,
                "weight": 70,
                "activity": "Lightly active (light exercise 1-3 days/week)",
                "goal": "weight-loss"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Macro tracker added successfully");
    assert_eq!(body["data"]["calories"], 1801);
    assert_eq!(body["data"]["protein"], 135);
    assert_eq!(body["data"]["fat"], 70);
    assert_eq!(body["data"]["carbs"], 158);

    let (status, body) = app
        .put(&path, Some(&alice.token), json!({ "goal": "maintenance" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Macro tracker updated successfully");
    assert_eq!(body["data"]["goal"], "maintenance");
    assert_eq!(body["data"]["age"], 25);
    assert!(body["data"]["calories"].as_i64().unwrap() > 1801);

    let (status, body) = app.get(&path, Some(&alice.token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["goal"], "maintenance");
}
