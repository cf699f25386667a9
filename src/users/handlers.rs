use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::{
    auth::extractors::AuthUser,
    db::StoreError,
    envelope::ApiResponse,
    i18n::{Locale, Msg},
    replies::{
        INTERNAL_ERROR, INVALID_PROFILE_DATA, PROFILE_OK, PROFILE_SAVING_ERROR, PROFILE_UPDATED,
        USER_NOT_FOUND,
    },
    state::AppState,
    users::{
        dto::{ProfileResponse, PublicProfile, UpdateProfileRequest},
        services::{join_messages, validate_profile_update},
    },
};

pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/users/me", get(me).patch(update_me))
        .route("/users/:id", get(public_profile))
}

#[instrument(skip(state))]
pub async fn me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    locale: Locale,
) -> ApiResponse {
    match state.users.find_by_id(user_id).await {
        Ok(Some(user)) => ApiResponse::data(PROFILE_OK, &ProfileResponse::from(user), locale),
        Ok(None) => USER_NOT_FOUND.reply(locale),
        Err(e) => {
            error!(error = %e, %user_id, "load profile failed");
            INTERNAL_ERROR.reply(locale)
        }
    }
}

#[instrument(skip(state, payload))]
pub async fn update_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    locale: Locale,
    payload: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> ApiResponse {
    let Ok(Json(req)) = payload else {
        return ApiResponse::message(INVALID_PROFILE_DATA, Msg::InvalidProfileData.text(locale));
    };
    let update = match validate_profile_update(req) {
        Ok(u) => u,
        Err(errors) => {
            return ApiResponse::message(INVALID_PROFILE_DATA, join_messages(&errors, locale))
        }
    };

    match state.users.update_profile(user_id, update).await {
        Ok(Some(user)) => {
            info!(%user_id, "profile updated");
            ApiResponse::new(
                PROFILE_UPDATED,
                json!({
                    "message": Msg::ProfileUpdated.text(locale),
                    "profile": ProfileResponse::from(user),
                }),
            )
        }
        Ok(None) => USER_NOT_FOUND.reply(locale),
        Err(StoreError::MissingReference(_)) => {
            ApiResponse::message(INVALID_PROFILE_DATA, Msg::UnknownCity.text(locale))
        }
        Err(e) => {
            error!(error = %e, %user_id, "update profile failed");
            PROFILE_SAVING_ERROR.reply(locale)
        }
    }
}

#[instrument(skip(state))]
pub async fn public_profile(
    State(state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> ApiResponse {
    match state.users.find_by_id(id).await {
        Ok(Some(user)) if user.is_active => {
            ApiResponse::data(PROFILE_OK, &PublicProfile::from(user), locale)
        }
        Ok(_) => USER_NOT_FOUND.reply(locale),
        Err(e) => {
            error!(error = %e, %id, "load public profile failed");
            INTERNAL_ERROR.reply(locale)
        }
    }
}
