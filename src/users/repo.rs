use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::StoreError;
use crate::users::repo_types::{NewUser, ProfileUpdate, User};

const USER_COLUMNS: &str = "id, username, password_hash, email, first_name, last_name, \
                            phone_number, avatar, city_id, is_active, date_joined";

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>>;
    /// Looks a user up by username or by phone number.
    async fn find_by_login(&self, login: &str) -> anyhow::Result<Option<User>>;
    async fn username_is_taken(&self, username: &str) -> anyhow::Result<bool>;
    async fn phone_is_used(&self, phone_number: &str) -> anyhow::Result<bool>;
    async fn create(&self, new_user: NewUser) -> Result<User, StoreError>;
    /// Returns `None` when the user does not exist.
    async fn update_profile(&self, id: Uuid, update: ProfileUpdate)
        -> Result<Option<User>, StoreError>;
}

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find user by id")?;
        Ok(user)
    }

    async fn find_by_login(&self, login: &str) -> anyhow::Result<Option<User>> {
        // exact username match wins over a phone match
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE username = $1 OR phone_number = $1
            ORDER BY (username = $1) DESC
            LIMIT 1
            "#
        ))
        .bind(login)
        .fetch_optional(&self.db)
        .await
        .context("find user by login")?;
        Ok(user)
    }

    async fn username_is_taken(&self, username: &str) -> anyhow::Result<bool> {
        let taken: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE username = $1)")
                .bind(username)
                .fetch_one(&self.db)
                .await
                .context("check username")?;
        Ok(taken)
    }

    async fn phone_is_used(&self, phone_number: &str) -> anyhow::Result<bool> {
        let used: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE phone_number = $1)")
                .bind(phone_number)
                .fetch_one(&self.db)
                .await
                .context("check phone number")?;
        Ok(used)
    }

    async fn create(&self, new_user: NewUser) -> Result<User, StoreError> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (id, username, password_hash, email, first_name, last_name, phone_number)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&new_user.username)
        .bind(&new_user.password_hash)
        .bind(&new_user.email)
        .bind(&new_user.first_name)
        .bind(&new_user.last_name)
        .bind(&new_user.phone_number)
        .fetch_one(&self.db)
        .await
        .map_err(|e| StoreError::classify(e, "insert user"))
    }

    async fn update_profile(
        &self,
        id: Uuid,
        update: ProfileUpdate,
    ) -> Result<Option<User>, StoreError> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET first_name = COALESCE($2, first_name),
                last_name  = COALESCE($3, last_name),
                email      = COALESCE($4, email),
                avatar     = COALESCE($5, avatar),
                city_id    = COALESCE($6, city_id)
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(update.first_name)
        .bind(update.last_name)
        .bind(update.email)
        .bind(update.avatar)
        .bind(update.city_id)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| StoreError::classify(e, "update profile"))
    }
}
