//! Seed the database with an administrator and sample catalog content
//!
//! Safe to re-run: rows whose email, title or name already exist are
//! skipped.

use anyhow::Result;
use meal_planner_backend::auth::PasswordService;
use meal_planner_backend::config::{AppConfig, SeedConfig};
use meal_planner_backend::db;
use meal_planner_backend::repositories::{
    BlogPostFields, BlogPostRepository, MealPlanFields, MealPlanRepository, NewUser,
    UserRepository,
};
use meal_planner_shared::validation::normalize_email;
use meal_planner_shared::{DietaryPreference, SecurityQuestion};
use sqlx::PgPool;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "seed=info,sqlx=warn".into()),
        )
        .init();

    let config = AppConfig::load()?;
    if AppConfig::is_production() {
        config.validate_for_production()?;
        config.seed.validate_for_production()?;
    }
    let pool = db::create_pool(&config.database).await?;
    db::run_migrations(&pool).await?;

    seed_admin(&pool, &config.seed).await?;
    seed_blog_posts(&pool).await?;
    seed_meal_plans(&pool).await?;

    info!("Seeding complete");
    Ok(())
}

async fn seed_admin(pool: &PgPool, seed: &SeedConfig) -> Result<()> {
    let email = normalize_email(&seed.admin_email);
    if UserRepository::email_exists(pool, &email).await? {
        info!(email = %email, "Administrator already exists, skipping");
        return Ok(());
    }

    let admin = NewUser {
        name: seed.admin_name.clone(),
        email,
        password_hash: PasswordService::hash_async(seed.admin_password.clone()).await?,
        is_admin: true,
        security_question: SecurityQuestion::FirstPetName,
        security_answer_hash: PasswordService::hash_async(PasswordService::normalize_answer(
            &seed.admin_security_answer,
        ))
        .await?,
    };

    let record = UserRepository::create(pool, &admin, None).await?;
    info!(user_id = %record.id, email = %record.email, "Created administrator");
    Ok(())
}

fn blog_posts() -> Vec<BlogPostFields> {
    let post = |title: &str, author: &str, content: &str, tags: &[&str]| BlogPostFields {
        title: title.to_string(),
        author: author.to_string(),
        content: content.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
    };

    vec![
        post(
            "Benefits of Meal Prepping",
            "Van Nguyen",
            "Preparing meals ahead keeps portions in check, saves time on busy \
             weekdays and cuts food waste, since groceries are bought for a plan \
             rather than on impulse.",
            &["Nutrition", "Meal Prep"],
        ),
        post(
            "Understanding Caloric Deficit",
            "Jane Doe",
            "Eating fewer calories than your total daily energy expenditure makes \
             the body draw on stored energy. A modest deficit of around 500 kcal \
             a day is easier to sustain than aggressive restriction.",
            &["Weight Management", "Nutrition"],
        ),
        post(
            "The Importance of Protein in Your Diet",
            "Van Nguyen",
            "Protein supports muscle repair and keeps you full between meals. \
             Spread it across the day from lean meats, fish, eggs, dairy, legumes \
             and tofu.",
            &["Nutrition", "Healthy Eating"],
        ),
    ]
}

async fn seed_blog_posts(pool: &PgPool) -> Result<()> {
    for fields in blog_posts() {
        if BlogPostRepository::find_by_title(pool, &fields.title).await?.is_some() {
            info!(title = %fields.title, "Blog post already exists, skipping");
            continue;
        }
        let record = BlogPostRepository::create(pool, &fields).await?;
        info!(blog_post_id = %record.id, title = %record.title, "Created blog post");
    }
    Ok(())
}

fn meal_plans() -> Vec<MealPlanFields> {
    use DietaryPreference as P;

    let meal = |name: &str,
                description: &str,
                ingredients: &[&str],
                preferences: &[DietaryPreference],
                (calories, protein, fat, carbs): (i32, i32, i32, i32)| MealPlanFields {
        name: name.to_string(),
        description: description.to_string(),
        ingredients: ingredients.iter().map(|i| i.to_string()).collect(),
        preferences: preferences.to_vec(),
        calories,
        protein,
        fat,
        carbs,
        image: None,
    };

    vec![
        meal(
            "Egg & Cheese Wrap",
            "Scrambled eggs and melted cheese in a whole wheat tortilla.",
            &["2 eggs", "1 whole wheat tortilla", "1 slice cheddar cheese", "1 tsp olive oil"],
            &[P::Vegetarian, P::NutFree, P::None],
            (350, 22, 21, 20),
        ),
        meal(
            "Grilled Chicken Salad",
            "Grilled chicken breast over mixed greens with a balsamic vinaigrette.",
            &["1 chicken breast", "2 cups mixed salad greens", "1/2 cucumber", "1 tbsp balsamic vinaigrette"],
            &[P::GlutenFree, P::NutFree, P::None],
            (300, 35, 18, 10),
        ),
        meal(
            "Quinoa & Black Bean Bowl",
            "Quinoa, black beans and vegetables with a lime dressing.",
            &["1/2 cup cooked quinoa", "1/2 cup black beans", "1/4 cup corn", "1 tbsp lime juice"],
            &[P::Vegetarian, P::Vegan, P::GlutenFree, P::NutFree, P::None],
            (350, 14, 10, 50),
        ),
        meal(
            "Stir-Fried Tofu & Vegetables",
            "Crispy tofu and mixed vegetables in a savory sauce.",
            &["1/2 block firm tofu", "1 tbsp tamari", "1/2 cup broccoli florets", "1 tsp sesame oil"],
            &[P::Vegetarian, P::Vegan, P::GlutenFree, P::NutFree, P::None],
            (350, 25, 18, 30),
        ),
    ]
}

async fn seed_meal_plans(pool: &PgPool) -> Result<()> {
    for fields in meal_plans() {
        if MealPlanRepository::find_by_name(pool, &fields.name).await?.is_some() {
            info!(name = %fields.name, "Meal plan already exists, skipping");
            continue;
        }
        let record = MealPlanRepository::create(pool, &fields).await?;
        info!(meal_plan_id = %record.id, name = %record.name, "Created meal plan");
    }
    Ok(())
}
