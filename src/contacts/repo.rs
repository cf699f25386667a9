use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::contacts::dto::{ContactType, ContactView};
use crate::db::StoreError;

#[async_trait]
pub trait ContactStore: Send + Sync {
    async fn types(&self) -> anyhow::Result<Vec<ContactType>>;
    async fn list_for_user(&self, user_id: Uuid) -> anyhow::Result<Vec<ContactView>>;
    /// Fails with `MissingReference("contact_type")` for an unknown type.
    async fn insert(&self, user_id: Uuid, type_id: Uuid, text: &str)
        -> Result<ContactView, StoreError>;
    /// Only removes a contact owned by `user_id`.
    async fn delete(&self, user_id: Uuid, contact_id: Uuid) -> anyhow::Result<bool>;
}

#[derive(Clone)]
pub struct PgContactStore {
    db: PgPool,
}

impl PgContactStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ContactStore for PgContactStore {
    async fn types(&self) -> anyhow::Result<Vec<ContactType>> {
        sqlx::query_as::<_, ContactType>("SELECT id, name FROM contact_types ORDER BY name")
            .fetch_all(&self.db)
            .await
            .context("list contact types")
    }

    async fn list_for_user(&self, user_id: Uuid) -> anyhow::Result<Vec<ContactView>> {
        sqlx::query_as::<_, ContactView>(
            r#"
            SELECT c.id, c.type_id, t.name AS type_name, c.text
              FROM user_contacts c
              JOIN contact_types t ON t.id = c.type_id
             WHERE c.user_id = $1
             ORDER BY t.name, c.text
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await
        .context("list contacts")
    }

    async fn insert(
        &self,
        user_id: Uuid,
        type_id: Uuid,
        text: &str,
    ) -> Result<ContactView, StoreError> {
        let row = sqlx::query_as::<_, ContactView>(
            r#"
            WITH inserted AS (
                INSERT INTO user_contacts (id, user_id, type_id, text)
                VALUES ($1, $2, $3, $4)
                RETURNING id, type_id, text
            )
            SELECT i.id, i.type_id, t.name AS type_name, i.text
              FROM inserted i
              JOIN contact_types t ON t.id = i.type_id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(type_id)
        .bind(text)
        .fetch_one(&self.db)
        .await
        .map_err(|e| StoreError::classify(e, "insert contact"))?;
        Ok(row)
    }

    async fn delete(&self, user_id: Uuid, contact_id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM user_contacts WHERE id = $1 AND user_id = $2")
            .bind(contact_id)
            .bind(user_id)
            .execute(&self.db)
            .await
            .context("delete contact")?;
        Ok(res.rows_affected() > 0)
    }
}
