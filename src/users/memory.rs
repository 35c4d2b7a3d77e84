use std::collections::BTreeMap;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::Mutex;

use crate::users::repo::UserRepo;
use crate::users::repo_types::{NewUser, User, UserChanges};

/// In-process user store. Ids are handed out sequentially starting at 1
/// and never reused, even after a delete.
#[derive(Default)]
pub struct MemoryUserRepo {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    last_id: i64,
    rows: BTreeMap<i64, User>,
}

#[async_trait]
impl UserRepo for MemoryUserRepo {
    async fn find_all(&self) -> anyhow::Result<Vec<User>> {
        let inner = self.inner.lock().await;
        Ok(inner.rows.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<User>> {
        let inner = self.inner.lock().await;
        Ok(inner.rows.get(&id).cloned())
    }

    async fn create(&self, new: NewUser) -> anyhow::Result<User> {
        let mut inner = self.inner.lock().await;
        inner.last_id += 1;
        let now = OffsetDateTime::now_utc();
        let user = User {
            id: inner.last_id,
            name: new.name,
            email: new.email,
            password: new.password,
            created_at: now,
            updated_at: now,
        };
        inner.rows.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, id: i64, changes: UserChanges) -> anyhow::Result<Option<User>> {
        let mut inner = self.inner.lock().await;
        let Some(user) = inner.rows.get_mut(&id) else {
            return Ok(None);
        };
        user.name = changes.name;
        user.email = changes.email;
        user.password = changes.password;
        user.updated_at = OffsetDateTime::now_utc().max(user.created_at);
        Ok(Some(user.clone()))
    }

    async fn delete(&self, id: i64) -> anyhow::Result<bool> {
        let mut inner = self.inner.lock().await;
        Ok(inner.rows.remove(&id).is_some())
    }
}
