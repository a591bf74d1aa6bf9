//! Integration tests for blog posts and the meal-plan catalog

mod common;

use axum::http::StatusCode;
use common::unique_name;
use serde_json::json;

#[tokio::test]
#[ignore = "requires database"]
async fn test_blog_post_lifecycle() {
    let app = common::TestApp::new().await;
    let admin = app.admin().await;
    let title = unique_name("Meal prep basics");

    let (status, body) = app
        .post(
            "/api/v1/blog-posts",
            Some(&admin.token),
            json!({
                "title": title,
                "author": "Sam",
                "content": "Cook once, eat all week.",
                "tags": ["prep"]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "New blog post created");
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = app
        .post(
            "/api/v1/blog-posts",
            Some(&admin.token),
            json!({ "title": title, "author": "Sam", "content": "Again" }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Duplicate blog post title");

    // Reads are public
    let path = format!("/api/v1/blog-posts/{}", id);
    let (status, body) = app.get(&path, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["tags"], json!(["prep"]));

    let new_title = unique_name("Meal prep advanced");
    let (status, body) = app
        .put(
            &path,
            Some(&admin.token),
            json!({ "title": new_title, "author": "Sam", "content": "Batch cook grains." }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["message"],
        format!("Blog post \"{}\" updated successfully", new_title)
    );
    assert_eq!(body["data"]["tags"], json!([]));

    let (status, _) = app.delete(&path, Some(&admin.token)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.get(&path, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], format!("Blog ID {} not found", id));
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_meal_plan_lifecycle_with_image() {
    let app = common::TestApp::new().await;
    let admin = app.admin().await;
    let name = unique_name("Tofu bowl");

    let fields = [
        ("name", name.as_str()),
        ("description", "Rice, tofu and greens"),
        ("ingredients", "rice"),
        ("ingredients", "tofu"),
        ("preferences", "vegan"),
        ("preferences", "gluten-free"),
        ("calories", "520"),
        ("protein", "28"),
        ("fat", "14"),
        ("carbs", "70"),
    ];

    let (status, body) = app
        .multipart(
            "POST",
            "/api/v1/meal-plans",
            Some(&admin.token),
            &fields,
            Some(("bowl.png", &b"\x89PNG fake image"[..])),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["message"], "New meal item created");
    assert_eq!(body["data"]["ingredients"], json!(["rice", "tofu"]));
    assert_eq!(body["data"]["preferences"], json!(["vegan", "gluten-free"]));

    let id = body["data"]["id"].as_str().unwrap().to_string();
    let image = body["data"]["image"].as_str().unwrap().to_string();
    assert!(image.ends_with("-bowl.png"));
    assert!(app.uploads.path().join(&image).exists());

    let (status, body) = app
        .multipart("POST", "/api/v1/meal-plans", Some(&admin.token), &fields, None)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], format!("Meal item {} already exists", name));

    // Replacing without an upload keeps the image
    let path = format!("/api/v1/meal-plans/{}", id);
    let mut updated = fields.to_vec();
    updated[6] = ("calories", "480");
    let (status, body) = app
        .multipart("PUT", &path, Some(&admin.token), &updated, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], format!("Meal item {} updated successfully", name));
    assert_eq!(body["data"]["calories"], 480);
    assert_eq!(body["data"]["image"], image.as_str());

    let (status, body) = app.get("/api/v1/meal-plans", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]
        .as_array()
        .unwrap()
        .iter()
        .any(|m| m["id"] == id.as_str()));

    let (status, body) = app.delete(&path, Some(&admin.token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], format!("Meal item {} deleted successfully", name));
    assert!(!app.uploads.path().join(&image).exists());

    let (status, _) = app.get(&path, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires database"]
async fn test_meal_plan_rejects_negative_macros() {
    let app = common::TestApp::new().await;
    let admin = app.admin().await;

    let (status, body) = app
        .multipart(
            "POST",
            "/api/v1/meal-plans",
            Some(&admin.token),
            &[
                ("name", "Negative"),
                ("description", "Impossible"),
                ("ingredients", "air"),
                ("calories", "100"),
                ("protein", "-1"),
                ("fat", "0"),
                ("carbs", "0"),
            ],
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Protein cannot be negative");
}
