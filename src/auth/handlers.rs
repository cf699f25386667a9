use axum::{
    extract::{rejection::JsonRejection, FromRef, State},
    routing::post,
    Json, Router,
};
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        claims::TokenKind,
        dto::{JwtKeys, RefreshRequest, TokenObtainRequest},
        services::{authenticate, AuthError},
    },
    envelope::ApiResponse,
    i18n::Locale,
    replies::{
        INVALID_REFRESH_TOKEN, INVALID_TOKEN_REQUEST, OK, TOKEN_GENERATION_ERROR,
        USER_IS_BLOCKED, USER_NOT_FOUND, WRONG_PASSWORD,
    },
    state::AppState,
};

pub fn token_routes() -> Router<AppState> {
    Router::new()
        .route("/token", post(obtain_token))
        .route("/token/refresh", post(refresh_token))
}

#[instrument(skip(state, payload))]
pub async fn obtain_token(
    State(state): State<AppState>,
    locale: Locale,
    payload: Result<Json<TokenObtainRequest>, JsonRejection>,
) -> ApiResponse {
    let Ok(Json(payload)) = payload else {
        return INVALID_TOKEN_REQUEST.reply(locale);
    };
    let login = payload.username.trim();
    if login.is_empty() || payload.password.is_empty() {
        return INVALID_TOKEN_REQUEST.reply(locale);
    }

    let user = match authenticate(state.users.as_ref(), login, &payload.password).await {
        Ok(u) => u,
        Err(AuthError::UserNotFound) => {
            warn!(login = %login, "token requested for unknown user");
            return USER_NOT_FOUND.reply(locale);
        }
        Err(AuthError::WrongPassword) => {
            warn!(login = %login, "token requested with wrong password");
            return WRONG_PASSWORD.reply(locale);
        }
        Err(AuthError::Blocked) => {
            warn!(login = %login, "token requested for blocked user");
            return USER_IS_BLOCKED.reply(locale);
        }
        Err(AuthError::Internal(e)) => {
            error!(error = %e, "authentication failed");
            return TOKEN_GENERATION_ERROR.reply(locale);
        }
    };

    match JwtKeys::from_ref(&state).sign_pair(user.id) {
        Ok(pair) => {
            info!(user_id = %user.id, "token pair issued");
            ApiResponse::data(OK, &pair, locale)
        }
        Err(e) => {
            error!(error = %e, user_id = %user.id, "jwt sign failed");
            TOKEN_GENERATION_ERROR.reply(locale)
        }
    }
}

#[instrument(skip(state, payload))]
pub async fn refresh_token(
    State(state): State<AppState>,
    locale: Locale,
    payload: Result<Json<RefreshRequest>, JsonRejection>,
) -> ApiResponse {
    let Ok(Json(payload)) = payload else {
        return INVALID_REFRESH_TOKEN.reply(locale);
    };
    let keys = JwtKeys::from_ref(&state);
    let claims = match keys.verify(&payload.refresh, TokenKind::Refresh) {
        Ok(c) => c,
        Err(e) => {
            warn!(error = %e, "refresh token rejected");
            return INVALID_REFRESH_TOKEN.reply(locale);
        }
    };

    // the account may have been blocked or removed since the pair was issued
    match state.users.find_by_id(claims.sub).await {
        Ok(Some(user)) if user.is_active => {}
        Ok(_) => return INVALID_REFRESH_TOKEN.reply(locale),
        Err(e) => {
            error!(error = %e, user_id = %claims.sub, "refresh user lookup failed");
            return TOKEN_GENERATION_ERROR.reply(locale);
        }
    }

    match keys.sign_pair(claims.sub) {
        Ok(pair) => ApiResponse::data(OK, &pair, locale),
        Err(e) => {
            error!(error = %e, "jwt sign failed");
            TOKEN_GENERATION_ERROR.reply(locale)
        }
    }
}
