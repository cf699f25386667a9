use std::time::Duration;

use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;
use uuid::Uuid;

use crate::{
    auth::{
        claims::{Claims, TokenKind},
        dto::{JwtKeys, TokenPair},
        password::verify_password,
    },
    config::JwtConfig,
    phone::services::normalize_phone,
    state::AppState,
    users::{repo::UserStore, repo_types::User},
};

impl From<&JwtConfig> for JwtKeys {
    fn from(cfg: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            issuer: cfg.issuer.clone(),
            audience: cfg.audience.clone(),
            access_ttl: Duration::from_secs((cfg.ttl_minutes.max(1) as u64) * 60),
            refresh_ttl: Duration::from_secs((cfg.refresh_ttl_minutes.max(1) as u64) * 60),
        }
    }
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        JwtKeys::from(&state.config.jwt)
    }
}

impl JwtKeys {
    fn sign_with_kind(&self, user_id: Uuid, kind: TokenKind) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let ttl = match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        };
        let exp = now + TimeDuration::seconds(ttl.as_secs() as i64);
        let claims = Claims {
            sub: user_id,
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            kind,
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id = %user_id, kind = ?kind, "jwt signed");
        Ok(token)
    }

    pub fn sign_pair(&self, user_id: Uuid) -> anyhow::Result<TokenPair> {
        Ok(TokenPair {
            access: self.sign_with_kind(user_id, TokenKind::Access)?,
            refresh: self.sign_with_kind(user_id, TokenKind::Refresh)?,
        })
    }

    pub fn verify(&self, token: &str, expected: TokenKind) -> anyhow::Result<Claims> {
        let mut validation = Validation::default();
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        anyhow::ensure!(
            data.claims.kind == expected,
            "expected a {:?} token, got {:?}",
            expected,
            data.claims.kind
        );
        debug!(user_id = %data.claims.sub, kind = ?data.claims.kind, "jwt verified");
        Ok(data.claims)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("user not found")]
    UserNotFound,
    #[error("wrong password")]
    WrongPassword,
    #[error("user is blocked")]
    Blocked,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Credential check behind token issuance. The password is checked before the
/// blocked flag so a blocked account is only revealed to its owner.
pub async fn authenticate(
    users: &dyn UserStore,
    login: &str,
    password: &str,
) -> Result<User, AuthError> {
    let user = match users.find_by_login(login).await? {
        Some(user) => Some(user),
        // phones are stored in E.164, the login may be formatted
        None => match normalize_phone(login) {
            Some(phone) if phone != login => users.find_by_login(&phone).await?,
            _ => None,
        },
    }
    .ok_or(AuthError::UserNotFound)?;
    if !verify_password(password, &user.password_hash)? {
        return Err(AuthError::WrongPassword);
    }
    if !user.is_active {
        return Err(AuthError::Blocked);
    }
    Ok(user)
}
