use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    routing::get,
    Json, Router,
};
use serde_json::json;
use tracing::{error, info, instrument};
use uuid::Uuid;

use super::dto::{CreateOfferRequest, OfferQuery, OfferView};
use crate::{
    auth::extractors::AuthUser,
    envelope::{ApiResponse, Canned},
    i18n::{Locale, Msg},
    replies::{
        INTERNAL_ERROR, INVALID_OFFER_DESCRIPTION, INVALID_OFFER_QUERY, INVALID_OFFER_TITLE,
        OFFERS_OK, OFFER_CREATION_OK, OFFER_NOT_FOUND, OFFER_SAVING_ERROR,
    },
    state::AppState,
};

pub const TITLE_MAX_LEN: usize = 200;

pub fn offer_routes() -> Router<AppState> {
    Router::new()
        .route("/offers", get(list_offers).post(create_offer))
        .route("/offers/:id", get(get_offer))
}

/// Trims both fields; the title is checked first.
pub(crate) fn validate_offer(req: CreateOfferRequest) -> Result<(String, String), Canned> {
    let title = req.title.trim();
    if title.is_empty() || title.chars().count() > TITLE_MAX_LEN {
        return Err(INVALID_OFFER_TITLE);
    }
    let description = req.description.trim();
    if description.is_empty() {
        return Err(INVALID_OFFER_DESCRIPTION);
    }
    Ok((title.to_string(), description.to_string()))
}

#[instrument(skip(state, payload))]
pub async fn create_offer(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    locale: Locale,
    payload: Result<Json<CreateOfferRequest>, JsonRejection>,
) -> ApiResponse {
    let req = payload.map(|Json(r)| r).unwrap_or_default();
    let (title, description) = match validate_offer(req) {
        Ok(v) => v,
        Err(canned) => return canned.reply(locale),
    };

    match state.offers.insert(user_id, &title, &description).await {
        Ok(row) => {
            info!(offer_id = %row.id, %user_id, "offer created");
            let offer = OfferView::from(row);
            ApiResponse::new(
                OFFER_CREATION_OK,
                json!({
                    "message": Msg::OfferCreated.text(locale),
                    "offer": offer,
                }),
            )
        }
        Err(e) => {
            error!(error = %e, %user_id, "insert offer failed");
            OFFER_SAVING_ERROR.reply(locale)
        }
    }
}

#[instrument(skip(state))]
pub async fn list_offers(
    State(state): State<AppState>,
    locale: Locale,
    query: Result<Query<OfferQuery>, QueryRejection>,
) -> ApiResponse {
    let Ok(Query(query)) = query else {
        return INVALID_OFFER_QUERY.reply(locale);
    };
    let (limit, offset) = query.clamped();
    match state.offers.list(query.author, limit, offset).await {
        Ok(rows) => {
            let offers: Vec<OfferView> = rows.into_iter().map(OfferView::from).collect();
            ApiResponse::data(OFFERS_OK, &offers, locale)
        }
        Err(e) => {
            error!(error = %e, "list offers failed");
            INTERNAL_ERROR.reply(locale)
        }
    }
}

#[instrument(skip(state))]
pub async fn get_offer(
    State(state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> ApiResponse {
    match state.offers.get(id).await {
        Ok(Some(row)) => ApiResponse::data(OFFERS_OK, &OfferView::from(row), locale),
        Ok(None) => OFFER_NOT_FOUND.reply(locale),
        Err(e) => {
            error!(error = %e, %id, "get offer failed");
            INTERNAL_ERROR.reply(locale)
        }
    }
}
