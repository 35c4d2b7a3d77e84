use std::str::FromStr;

use anyhow::{anyhow, bail, Context};
use serde::Deserialize;

/// Where user records live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(Self::Postgres),
            "memory" | "mem" => Ok(Self::Memory),
            other => Err(anyhow!("unknown storage backend '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DbConfig {
    pub url: String,
    pub max_connections: u32,
    pub run_migrations: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub storage: StorageBackend,
    /// Present only for the postgres backend.
    pub db: Option<DbConfig>,
    pub cors_enabled: bool,
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let storage = match lookup("STORAGE_BACKEND") {
            Some(v) => v.parse::<StorageBackend>()?,
            None => StorageBackend::Postgres,
        };

        let db = match storage {
            StorageBackend::Postgres => Some(DbConfig {
                url: lookup("DATABASE_URL")
                    .context("DATABASE_URL must be set for the postgres backend")?,
                max_connections: parse_or("DB_MAX_CONNECTIONS", &lookup, 10)?,
                run_migrations: flag_or("RUN_MIGRATIONS", &lookup, true)?,
            }),
            StorageBackend::Memory => None,
        };

        Ok(Self {
            storage,
            db,
            cors_enabled: flag_or("CORS_ENABLED", &lookup, true)?,
            host: lookup("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: parse_or("APP_PORT", &lookup, 8080)?,
        })
    }

    /// Config for the in-memory backend with everything else at defaults.
    pub fn in_memory() -> Self {
        Self {
            storage: StorageBackend::Memory,
            db: None,
            cors_enabled: true,
            host: "127.0.0.1".into(),
            port: 8080,
        }
    }
}

fn parse_or<T, F>(key: &str, lookup: &F, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow!("invalid {key}='{raw}': {e}")),
        None => Ok(default),
    }
}

fn flag_or<F>(key: &str, lookup: &F, default: bool) -> anyhow::Result<bool>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => bail!("invalid {key}='{raw}': expected a boolean"),
    }
}
