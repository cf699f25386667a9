use std::sync::Arc;

use anyhow::Context;
use axum::extract::FromRef;
use jsonwebtoken::{encode, EncodingKey, Header};
use phonenumber::Mode;
use rand::{distributions::Alphanumeric, Rng};
use serde::Serialize;
use time::{Duration, OffsetDateTime};
use tracing::{debug, info};

use crate::{
    config::VerificationConfig,
    i18n::Msg,
    phone::{repo::VerificationStore, sms::SmsSender},
    state::AppState,
};

/// Parses an international number (leading `+` required) and returns its E.164 form.
/// `None` when the number does not parse or is not assigned in its numbering plan.
pub fn normalize_phone(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if !raw.starts_with('+') {
        return None;
    }
    let number = phonenumber::parse(None, raw).ok()?;
    phonenumber::is_valid(&number).then(|| number.format().mode(Mode::E164).to_string())
}

pub fn generate_security_code(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

#[derive(Serialize)]
struct SessionClaims<'a> {
    phone_number: &'a str,
    nonce: String,
    iat: i64,
}

/// Opaque session handle: a signed token binding the phone to a random nonce.
pub fn make_session_token(secret: &str, phone_number: &str) -> anyhow::Result<String> {
    let nonce: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(16)
        .map(char::from)
        .collect();
    let claims = SessionClaims {
        phone_number,
        nonce,
        iat: OffsetDateTime::now_utc().unix_timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .context("sign session token")
}

#[derive(Debug, thiserror::Error)]
pub enum CodeError {
    #[error("security code is not valid")]
    Invalid,
    #[error("security code has expired")]
    Expired,
    #[error("security code is already verified")]
    AlreadyVerified,
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl CodeError {
    pub fn msg(&self) -> Msg {
        match self {
            CodeError::Invalid | CodeError::Store(_) => Msg::InvalidSecurityCode,
            CodeError::Expired => Msg::ExpiredSecurityCode,
            CodeError::AlreadyVerified => Msg::AlreadyVerifiedSecurityCode,
        }
    }
}

/// Issues and checks SMS security codes.
#[derive(Clone)]
pub struct PhoneVerifier {
    pub store: Arc<dyn VerificationStore>,
    pub sms: Arc<dyn SmsSender>,
    pub config: VerificationConfig,
    pub secret: String,
}

impl FromRef<AppState> for PhoneVerifier {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: state.verifications.clone(),
            sms: state.sms.clone(),
            config: state.config.verification.clone(),
            secret: state.config.jwt.secret.clone(),
        }
    }
}

impl PhoneVerifier {
    /// Persists a new session and texts its code. Returns the session token.
    pub async fn send_security_code(&self, phone_number: &str) -> anyhow::Result<String> {
        let code = generate_security_code(self.config.code_length);
        let session_token = make_session_token(&self.secret, phone_number)?;
        self.store
            .replace(phone_number, &code, &session_token)
            .await?;

        let body = format!(
            "Welcome to {}! Please use security code {} to proceed.",
            self.config.app_name, code
        );
        self.sms
            .send(phone_number, &body)
            .await
            .context("send security code")?;
        info!(phone_number = %phone_number, "security code sent");
        Ok(session_token)
    }

    pub async fn validate(
        &self,
        phone_number: &str,
        session_token: &str,
        security_code: &str,
        now: OffsetDateTime,
    ) -> Result<(), CodeError> {
        if phone_number.is_empty() || session_token.is_empty() || security_code.is_empty() {
            return Err(CodeError::Invalid);
        }
        let session = self
            .store
            .find(phone_number, session_token, security_code)
            .await?
            .ok_or(CodeError::Invalid)?;

        if now - session.created_at > Duration::seconds(self.config.code_ttl_seconds) {
            return Err(CodeError::Expired);
        }
        if session.is_verified {
            if self.config.verify_only_once {
                return Err(CodeError::AlreadyVerified);
            }
            return Ok(());
        }
        self.store.mark_verified(session.id).await?;
        debug!(phone_number = %phone_number, "security code verified");
        Ok(())
    }
}
