//! Drop every table the backend owns
//!
//! Meant for resetting a development database before re-seeding. Refuses to
//! run when `RUST_ENV=production`.

use anyhow::Result;
use meal_planner_backend::config::AppConfig;
use meal_planner_backend::db;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "drop=info,meal_planner_backend=info,sqlx=warn".into()),
        )
        .init();

    if AppConfig::is_production() {
        anyhow::bail!("Refusing to drop the database in production");
    }

    let config = AppConfig::load()?;
    let pool = db::create_pool(&config.database).await?;
    info!("Database connected. Dropping now.");

    db::drop_all(&pool).await?;
    pool.close().await;

    info!("Database dropped");
    Ok(())
}
