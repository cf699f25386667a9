use anyhow::Context;
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct City {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SocialMedia {
    pub id: Uuid,
    pub name: String,
    pub oauth_backend: String,
    pub logo: String,
}

pub async fn list_cities(db: &PgPool) -> anyhow::Result<Vec<City>> {
    sqlx::query_as::<_, City>("SELECT id, name FROM cities ORDER BY name")
        .fetch_all(db)
        .await
        .context("list cities")
}

pub async fn list_social_media(db: &PgPool) -> anyhow::Result<Vec<SocialMedia>> {
    sqlx::query_as::<_, SocialMedia>(
        "SELECT id, name, oauth_backend, logo FROM social_media ORDER BY name",
    )
    .fetch_all(db)
    .await
    .context("list social media")
}
