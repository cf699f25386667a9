use anyhow::Context;
use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::offers::dto::OfferView;

#[derive(Debug, Clone, FromRow)]
pub struct OfferRow {
    pub id: Uuid,
    pub author_id: Uuid,
    pub author_username: String,
    pub title: String,
    pub description: String,
    pub created_at: OffsetDateTime,
}

impl From<OfferRow> for OfferView {
    fn from(r: OfferRow) -> Self {
        Self {
            id: r.id,
            author_id: r.author_id,
            author_username: r.author_username,
            title: r.title,
            description: r.description,
            created_at: r.created_at,
        }
    }
}

#[async_trait]
pub trait OfferStore: Send + Sync {
    async fn insert(&self, author_id: Uuid, title: &str, description: &str)
        -> anyhow::Result<OfferRow>;
    /// Newest first, optionally restricted to one author.
    async fn list(&self, author: Option<Uuid>, limit: i64, offset: i64)
        -> anyhow::Result<Vec<OfferRow>>;
    async fn get(&self, id: Uuid) -> anyhow::Result<Option<OfferRow>>;
}

#[derive(Clone)]
pub struct PgOfferStore {
    db: PgPool,
}

impl PgOfferStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OfferStore for PgOfferStore {
    async fn insert(
        &self,
        author_id: Uuid,
        title: &str,
        description: &str,
    ) -> anyhow::Result<OfferRow> {
        let row = sqlx::query_as::<_, OfferRow>(
            r#"
            WITH inserted AS (
                INSERT INTO offers (id, author_id, title, description)
                VALUES ($1, $2, $3, $4)
                RETURNING id, author_id, title, description, created_at
            )
            SELECT i.id, i.author_id, u.username AS author_username,
                   i.title, i.description, i.created_at
              FROM inserted i
              JOIN users u ON u.id = i.author_id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(author_id)
        .bind(title)
        .bind(description)
        .fetch_one(&self.db)
        .await
        .context("insert offer")?;
        Ok(row)
    }

    async fn list(
        &self,
        author: Option<Uuid>,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<OfferRow>> {
        let rows = sqlx::query_as::<_, OfferRow>(
            r#"
            SELECT o.id, o.author_id, u.username AS author_username,
                   o.title, o.description, o.created_at
              FROM offers o
              JOIN users u ON u.id = o.author_id
             WHERE ($1::uuid IS NULL OR o.author_id = $1)
             ORDER BY o.created_at DESC
             LIMIT $2 OFFSET $3
            "#,
        )
        .bind(author)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db)
        .await
        .context("list offers")?;
        Ok(rows)
    }

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<OfferRow>> {
        let row = sqlx::query_as::<_, OfferRow>(
            r#"
            SELECT o.id, o.author_id, u.username AS author_username,
                   o.title, o.description, o.created_at
              FROM offers o
              JOIN users u ON u.id = o.author_id
             WHERE o.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("get offer")?;
        Ok(row)
    }
}
