use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use std::sync::Arc;
use tracing::{error, warn};
use uuid::Uuid;

use crate::{
    auth::{claims::TokenKind, dto::JwtKeys},
    envelope::ApiResponse,
    i18n::Locale,
    replies::{INTERNAL_ERROR, NOT_AUTHENTICATED, USER_IS_BLOCKED},
    users::repo::UserStore,
};

/// Extracts and validates the bearer access token, returning the user ID.
/// The user must still exist and be active.
pub struct AuthUser(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
    Arc<dyn UserStore>: FromRef<S>,
{
    type Rejection = ApiResponse;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let locale = Locale::from_parts(parts);
        let reject = || NOT_AUTHENTICATED.reply(locale);

        let auth = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(reject)?;

        let token = auth
            .strip_prefix("Bearer ")
            .or_else(|| auth.strip_prefix("bearer "))
            .ok_or_else(reject)?;

        let keys = JwtKeys::from_ref(state);
        let claims = keys.verify(token, TokenKind::Access).map_err(|e| {
            warn!(error = %e, "rejected access token");
            reject()
        })?;

        let users = <Arc<dyn UserStore>>::from_ref(state);
        match users.find_by_id(claims.sub).await {
            Ok(Some(user)) if user.is_active => Ok(AuthUser(user.id)),
            Ok(Some(user)) => {
                warn!(user_id = %user.id, "access token of a blocked user");
                Err(USER_IS_BLOCKED.reply(locale))
            }
            Ok(None) => {
                warn!(user_id = %claims.sub, "access token of a deleted user");
                Err(reject())
            }
            Err(e) => {
                error!(error = %e, "load token user failed");
                Err(INTERNAL_ERROR.reply(locale))
            }
        }
    }
}
