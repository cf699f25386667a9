use axum::{extract::State, routing::get, Router};
use tracing::{error, instrument};

use super::repo;
use crate::{
    envelope::ApiResponse,
    i18n::Locale,
    replies::{CATALOG_OK, INTERNAL_ERROR},
    state::AppState,
};

pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/cities", get(list_cities))
        .route("/social-media", get(list_social_media))
}

#[instrument(skip(state))]
pub async fn list_cities(State(state): State<AppState>, locale: Locale) -> ApiResponse {
    match repo::list_cities(&state.db).await {
        Ok(cities) => ApiResponse::data(CATALOG_OK, &cities, locale),
        Err(e) => {
            error!(error = %e, "list cities failed");
            INTERNAL_ERROR.reply(locale)
        }
    }
}

#[instrument(skip(state))]
pub async fn list_social_media(State(state): State<AppState>, locale: Locale) -> ApiResponse {
    match repo::list_social_media(&state.db).await {
        Ok(items) => ApiResponse::data(CATALOG_OK, &items, locale),
        Err(e) => {
            error!(error = %e, "list social media failed");
            INTERNAL_ERROR.reply(locale)
        }
    }
}
