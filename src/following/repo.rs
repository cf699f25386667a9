use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::StoreError;
use crate::following::dto::FollowedUser;

/// Directed follower -> author edges, at most one per pair.
#[async_trait]
pub trait FollowingStore: Send + Sync {
    /// `Duplicate` when the edge exists, `MissingReference` when the author is gone.
    async fn follow(&self, follower_id: Uuid, author_id: Uuid) -> Result<(), StoreError>;
    /// Returns whether an edge was removed.
    async fn unfollow(&self, follower_id: Uuid, author_id: Uuid) -> anyhow::Result<bool>;
    /// Authors the user follows, most recent first.
    async fn following(&self, user_id: Uuid) -> anyhow::Result<Vec<FollowedUser>>;
    async fn followers(&self, user_id: Uuid) -> anyhow::Result<Vec<FollowedUser>>;
}

#[derive(Clone)]
pub struct PgFollowingStore {
    db: PgPool,
}

impl PgFollowingStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl FollowingStore for PgFollowingStore {
    async fn follow(&self, follower_id: Uuid, author_id: Uuid) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO followings (id, author_id, follower_id)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(author_id)
        .bind(follower_id)
        .execute(&self.db)
        .await
        .map_err(|e| StoreError::classify(e, "insert following"))?;
        Ok(())
    }

    async fn unfollow(&self, follower_id: Uuid, author_id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM followings WHERE follower_id = $1 AND author_id = $2")
            .bind(follower_id)
            .bind(author_id)
            .execute(&self.db)
            .await
            .context("delete following")?;
        Ok(res.rows_affected() > 0)
    }

    async fn following(&self, user_id: Uuid) -> anyhow::Result<Vec<FollowedUser>> {
        let rows = sqlx::query_as::<_, FollowedUser>(
            r#"
            SELECT u.id, u.username, u.avatar
              FROM followings f
              JOIN users u ON u.id = f.author_id
             WHERE f.follower_id = $1
             ORDER BY f.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await
        .context("list following")?;
        Ok(rows)
    }

    async fn followers(&self, user_id: Uuid) -> anyhow::Result<Vec<FollowedUser>> {
        let rows = sqlx::query_as::<_, FollowedUser>(
            r#"
            SELECT u.id, u.username, u.avatar
              FROM followings f
              JOIN users u ON u.id = f.follower_id
             WHERE f.author_id = $1
             ORDER BY f.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await
        .context("list followers")?;
        Ok(rows)
    }
}
