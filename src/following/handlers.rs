use axum::{
    extract::{Path, State},
    routing::{get, post},
    Router,
};
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::{
    auth::extractors::AuthUser,
    db::StoreError,
    envelope::ApiResponse,
    i18n::Locale,
    replies::{
        ALREADY_FOLLOWING, AUTHOR_NOT_FOUND, CANNOT_FOLLOW_YOURSELF, FOLLOWING_ERROR, FOLLOWING_OK,
        FOLLOW_OK, NOT_FOLLOWING, UNFOLLOW_OK,
    },
    state::AppState,
};

pub fn following_routes() -> Router<AppState> {
    Router::new()
        .route("/users/:id/follow", post(follow).delete(unfollow))
        .route("/users/me/following", get(my_following))
        .route("/users/me/followers", get(my_followers))
}

#[instrument(skip(state))]
pub async fn follow(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    locale: Locale,
    Path(author_id): Path<Uuid>,
) -> ApiResponse {
    if author_id == user_id {
        return CANNOT_FOLLOW_YOURSELF.reply(locale);
    }

    match state.users.find_by_id(author_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return AUTHOR_NOT_FOUND.reply(locale),
        Err(e) => {
            error!(error = %e, %author_id, "load author failed");
            return FOLLOWING_ERROR.reply(locale);
        }
    }

    match state.following.follow(user_id, author_id).await {
        Ok(()) => {
            info!(%user_id, %author_id, "followed");
            FOLLOW_OK.reply(locale)
        }
        Err(StoreError::Duplicate(_)) => ALREADY_FOLLOWING.reply(locale),
        // author deleted between the lookup and the insert
        Err(StoreError::MissingReference(_)) => AUTHOR_NOT_FOUND.reply(locale),
        Err(StoreError::Other(e)) => {
            error!(error = %e, %user_id, %author_id, "follow failed");
            FOLLOWING_ERROR.reply(locale)
        }
    }
}

#[instrument(skip(state))]
pub async fn unfollow(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    locale: Locale,
    Path(author_id): Path<Uuid>,
) -> ApiResponse {
    match state.following.unfollow(user_id, author_id).await {
        Ok(true) => {
            info!(%user_id, %author_id, "unfollowed");
            UNFOLLOW_OK.reply(locale)
        }
        Ok(false) => NOT_FOLLOWING.reply(locale),
        Err(e) => {
            error!(error = %e, %user_id, %author_id, "unfollow failed");
            FOLLOWING_ERROR.reply(locale)
        }
    }
}

#[instrument(skip(state))]
pub async fn my_following(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    locale: Locale,
) -> ApiResponse {
    match state.following.following(user_id).await {
        Ok(users) => ApiResponse::data(FOLLOWING_OK, &users, locale),
        Err(e) => {
            error!(error = %e, %user_id, "list following failed");
            FOLLOWING_ERROR.reply(locale)
        }
    }
}

#[instrument(skip(state))]
pub async fn my_followers(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    locale: Locale,
) -> ApiResponse {
    match state.following.followers(user_id).await {
        Ok(users) => ApiResponse::data(FOLLOWING_OK, &users, locale),
        Err(e) => {
            error!(error = %e, %user_id, "list followers failed");
            FOLLOWING_ERROR.reply(locale)
        }
    }
}
