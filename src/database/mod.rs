use anyhow::Result;
use sqlx::{
    migrate::MigrateDatabase,
    postgres::{PgPool, PgPoolOptions},
    Postgres,
};
use std::time::Duration;

pub mod models;
pub mod repositories;

pub async fn init_database(database_url: &str) -> Result<PgPool> {
    if !Postgres::database_exists(database_url).await.unwrap_or(false) {
        log::info!("Creating database");
        Postgres::create_database(database_url).await?;
    }

    // Bounded acquire timeout so a wedged pool surfaces as an error instead
    // of a hung request.
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await?;

    log::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}
