use crate::config::AppConfig;
use crate::contacts::repo::{ContactStore, PgContactStore};
use crate::following::repo::{FollowingStore, PgFollowingStore};
use crate::offers::repo::{OfferStore, PgOfferStore};
use crate::phone::{
    repo::{PgVerificationStore, VerificationStore},
    sms::{self, SmsSender},
};
use crate::users::repo::{PgUserStore, UserStore};
use axum::extract::FromRef;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserStore>,
    pub verifications: Arc<dyn VerificationStore>,
    pub following: Arc<dyn FollowingStore>,
    pub offers: Arc<dyn OfferStore>,
    pub contacts: Arc<dyn ContactStore>,
    pub sms: Arc<dyn SmsSender>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let db = crate::db::connect(&config.database_url).await?;
        let sms = sms::from_config(&config.sms);

        Ok(Self {
            users: Arc::new(PgUserStore::new(db.clone())),
            verifications: Arc::new(PgVerificationStore::new(db.clone())),
            following: Arc::new(PgFollowingStore::new(db.clone())),
            offers: Arc::new(PgOfferStore::new(db.clone())),
            contacts: Arc::new(PgContactStore::new(db.clone())),
            db,
            config,
            sms,
        })
    }
}

impl FromRef<AppState> for Arc<dyn UserStore> {
    fn from_ref(state: &AppState) -> Self {
        state.users.clone()
    }
}
