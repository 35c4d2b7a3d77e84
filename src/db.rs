use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::config::DbConfig;

pub async fn connect(config: &DbConfig) -> anyhow::Result<PgPool> {
    let db = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.url)
        .await
        .context("connect to database")?;
    Ok(db)
}

/// Apply the migrations embedded from `./migrations`.
pub async fn migrate(db: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations")
        .run(db)
        .await
        .context("run database migrations")?;
    tracing::info!("database migrations applied");
    Ok(())
}
