use axum::{
    extract::{rejection::JsonRejection, FromRef, State},
    routing::post,
    Json, Router,
};
use serde_json::Value;
use time::OffsetDateTime;
use tracing::{error, info, instrument, warn};

use crate::{
    envelope::ApiResponse,
    i18n::{Locale, Msg},
    phone::{
        dto::{PhoneRequest, SessionTokenResponse, VerificationRequest},
        services::{normalize_phone, CodeError, PhoneVerifier},
    },
    replies::{
        INTERNAL_ERROR, INVALID_PHONE_NUMBER, INVALID_REGISTRATION_DATA, INVALID_SECURITY_CODE,
        OK, SMS_SENDING_ERROR, USED_PHONE_NUMBER, USER_CREATION_ERROR, USER_CREATION_OK,
        VALID_SECURITY_CODE,
    },
    state::AppState,
    users::{
        dto::CreateUserRequest,
        services::{join_messages, validate_signup, SignupError},
    },
};

pub fn phone_routes() -> Router<AppState> {
    Router::new()
        .route("/phone/register", post(register))
        .route("/phone/verify", post(verify))
        .route("/phone/signup", post(signup))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    locale: Locale,
    payload: Result<Json<PhoneRequest>, JsonRejection>,
) -> ApiResponse {
    let Some(phone_number) = payload
        .ok()
        .and_then(|Json(p)| normalize_phone(&p.phone_number))
    else {
        return INVALID_PHONE_NUMBER.reply(locale);
    };

    match state.users.phone_is_used(&phone_number).await {
        Ok(false) => {}
        Ok(true) => {
            warn!(phone_number = %phone_number, "phone already bound to an account");
            return USED_PHONE_NUMBER.reply(locale);
        }
        Err(e) => {
            error!(error = %e, "phone lookup failed");
            return INTERNAL_ERROR.reply(locale);
        }
    }

    let verifier = PhoneVerifier::from_ref(&state);
    match verifier.send_security_code(&phone_number).await {
        Ok(session_token) => {
            ApiResponse::data(OK, &SessionTokenResponse { session_token }, locale)
        }
        Err(e) => {
            error!(error = %e, phone_number = %phone_number, "security code not sent");
            SMS_SENDING_ERROR.reply(locale)
        }
    }
}

/// Shared by `verify` and `signup`: `Err` carries the response to return.
async fn check_security_code(
    state: &AppState,
    req: &VerificationRequest,
    locale: Locale,
) -> Result<String, ApiResponse> {
    let invalid = |e: CodeError| ApiResponse::message(INVALID_SECURITY_CODE, e.msg().text(locale));

    let phone_number = normalize_phone(&req.phone_number).ok_or_else(|| invalid(CodeError::Invalid))?;
    let verifier = PhoneVerifier::from_ref(state);
    verifier
        .validate(
            &phone_number,
            &req.session_token,
            &req.security_code,
            OffsetDateTime::now_utc(),
        )
        .await
        .map_err(|e| {
            match &e {
                CodeError::Store(inner) => error!(error = %inner, "verification lookup failed"),
                other => warn!(reason = %other, "security code rejected"),
            }
            invalid(e)
        })?;
    Ok(phone_number)
}

#[instrument(skip(state, payload))]
pub async fn verify(
    State(state): State<AppState>,
    locale: Locale,
    payload: Result<Json<VerificationRequest>, JsonRejection>,
) -> ApiResponse {
    let Ok(Json(req)) = payload else {
        return ApiResponse::message(INVALID_SECURITY_CODE, CodeError::Invalid.msg().text(locale));
    };
    match check_security_code(&state, &req, locale).await {
        Ok(_) => VALID_SECURITY_CODE.reply(locale),
        Err(resp) => resp,
    }
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    locale: Locale,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResponse {
    let Ok(Json(body)) = payload else {
        return ApiResponse::message(INVALID_SECURITY_CODE, CodeError::Invalid.msg().text(locale));
    };

    let verification: VerificationRequest =
        serde_json::from_value(body.clone()).unwrap_or_default();
    if let Err(resp) = check_security_code(&state, &verification, locale).await {
        return resp;
    }

    let (account, rejected) = CreateUserRequest::from_json(&body);
    if !rejected.is_empty() {
        warn!(fields = ?rejected, "signup body has wrong field types");
        let text = rejected
            .iter()
            .map(|field| format!("{field}: {}", Msg::NotAValidString.text(locale)))
            .collect::<Vec<_>>()
            .join(" ");
        return ApiResponse::message(INVALID_REGISTRATION_DATA, text);
    }

    let new_user = match validate_signup(state.users.as_ref(), account).await {
        Ok(u) => u,
        Err(SignupError::Invalid(errors)) => {
            return ApiResponse::message(INVALID_REGISTRATION_DATA, join_messages(&errors, locale));
        }
        Err(SignupError::Internal(e)) => {
            error!(error = %e, "signup validation failed");
            return USER_CREATION_ERROR.reply(locale);
        }
    };

    match state.users.create(new_user).await {
        Ok(user) => {
            info!(user_id = %user.id, username = %user.username, "user signed up");
            USER_CREATION_OK.reply(locale)
        }
        Err(e) => {
            error!(error = %e, "create user failed");
            USER_CREATION_ERROR.reply(locale)
        }
    }
}
