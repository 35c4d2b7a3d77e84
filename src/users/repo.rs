use async_trait::async_trait;
use sqlx::PgPool;

use crate::users::repo_types::{NewUser, User, UserChanges};

/// Persistence operations over the `users` table.
///
/// Every call is a single statement committed on its own; there is no
/// transaction spanning several calls.
#[async_trait]
pub trait UserRepo: Send + Sync {
    /// All users ordered by id.
    async fn find_all(&self) -> anyhow::Result<Vec<User>>;
    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<User>>;
    /// Insert a user; id and both timestamps are assigned by the store.
    async fn create(&self, new: NewUser) -> anyhow::Result<User>;
    /// Overwrite name, email and password and refresh `updated_at`.
    /// Returns `None` when no user has this id.
    async fn update(&self, id: i64, changes: UserChanges) -> anyhow::Result<Option<User>>;
    /// Returns `false` when no user has this id.
    async fn delete(&self, id: i64) -> anyhow::Result<bool>;
}

#[derive(Clone)]
pub struct PgUserRepo {
    db: PgPool,
}

impl PgUserRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepo for PgUserRepo {
    async fn find_all(&self) -> anyhow::Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password, created_at, updated_at
            FROM users
            ORDER BY id
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(users)
    }

    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn create(&self, new: NewUser) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, password, created_at, updated_at
            "#,
        )
        .bind(&new.name)
        .bind(&new.email)
        .bind(&new.password)
        .fetch_one(&self.db)
        .await?;
        Ok(user)
    }

    async fn update(&self, id: i64, changes: UserChanges) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = $2,
                email = $3,
                password = $4,
                updated_at = GREATEST(now(), created_at)
            WHERE id = $1
            RETURNING id, name, email, password, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.email)
        .bind(&changes.password)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn delete(&self, id: i64) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
