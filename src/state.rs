use crate::config::{AppConfig, StorageBackend};
use crate::db;
use crate::users::{memory::MemoryUserRepo, repo::PgUserRepo, repo::UserRepo};
use anyhow::Context;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepo>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let users = match config.storage {
            StorageBackend::Postgres => {
                let db_config = config
                    .db
                    .as_ref()
                    .context("postgres backend selected without database settings")?;
                let pool = db::connect(db_config).await?;

                if db_config.run_migrations {
                    db::migrate(&pool).await?;
                } else {
                    tracing::info!("RUN_MIGRATIONS disabled; skipping migrations");
                }

                Arc::new(PgUserRepo::new(pool)) as Arc<dyn UserRepo>
            }
            StorageBackend::Memory => {
                tracing::warn!("using in-memory user store; data is lost on restart");
                Arc::new(MemoryUserRepo::default()) as Arc<dyn UserRepo>
            }
        };

        Ok(Self::from_parts(users, Arc::new(config)))
    }

    pub fn from_parts(users: Arc<dyn UserRepo>, config: Arc<AppConfig>) -> Self {
        Self { users, config }
    }

    /// Empty in-memory store with default config.
    pub fn in_memory() -> Self {
        Self::from_parts(
            Arc::new(MemoryUserRepo::default()),
            Arc::new(AppConfig::in_memory()),
        )
    }
}
