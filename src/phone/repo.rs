use anyhow::Context;
use async_trait::async_trait;
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// One outstanding verification session per phone number.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SmsVerification {
    pub id: Uuid,
    pub phone_number: String,
    #[serde(skip_serializing)]
    pub security_code: String,
    #[serde(skip_serializing)]
    pub session_token: String,
    pub is_verified: bool,
    pub created_at: OffsetDateTime,
}

#[async_trait]
pub trait VerificationStore: Send + Sync {
    /// Starts a fresh session for the phone, replacing any previous one.
    async fn replace(
        &self,
        phone_number: &str,
        security_code: &str,
        session_token: &str,
    ) -> anyhow::Result<SmsVerification>;

    async fn find(
        &self,
        phone_number: &str,
        session_token: &str,
        security_code: &str,
    ) -> anyhow::Result<Option<SmsVerification>>;

    async fn mark_verified(&self, id: Uuid) -> anyhow::Result<()>;
}

#[derive(Clone)]
pub struct PgVerificationStore {
    db: PgPool,
}

impl PgVerificationStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl VerificationStore for PgVerificationStore {
    async fn replace(
        &self,
        phone_number: &str,
        security_code: &str,
        session_token: &str,
    ) -> anyhow::Result<SmsVerification> {
        let row = sqlx::query_as::<_, SmsVerification>(
            r#"
            INSERT INTO sms_verifications (id, phone_number, security_code, session_token)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (phone_number) DO UPDATE
               SET security_code = EXCLUDED.security_code,
                   session_token = EXCLUDED.session_token,
                   is_verified   = FALSE,
                   created_at    = now()
            RETURNING id, phone_number, security_code, session_token, is_verified, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(phone_number)
        .bind(security_code)
        .bind(session_token)
        .fetch_one(&self.db)
        .await
        .context("store verification session")?;
        Ok(row)
    }

    async fn find(
        &self,
        phone_number: &str,
        session_token: &str,
        security_code: &str,
    ) -> anyhow::Result<Option<SmsVerification>> {
        let row = sqlx::query_as::<_, SmsVerification>(
            r#"
            SELECT id, phone_number, security_code, session_token, is_verified, created_at
              FROM sms_verifications
             WHERE phone_number = $1 AND session_token = $2 AND security_code = $3
            "#,
        )
        .bind(phone_number)
        .bind(session_token)
        .bind(security_code)
        .fetch_optional(&self.db)
        .await
        .context("load verification session")?;
        Ok(row)
    }

    async fn mark_verified(&self, id: Uuid) -> anyhow::Result<()> {
        sqlx::query("UPDATE sms_verifications SET is_verified = TRUE WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .context("mark verification session verified")?;
        Ok(())
    }
}
