use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::{delete, get},
    Json, Router,
};
use serde_json::json;
use tracing::{error, info, instrument};
use uuid::Uuid;

use super::dto::NewContactRequest;
use crate::{
    auth::extractors::AuthUser,
    db::StoreError,
    envelope::{ApiResponse, Canned},
    i18n::{Locale, Msg},
    replies::{
        CATALOG_OK, CONTACTS_OK, CONTACT_ADDED, CONTACT_DELETED, CONTACT_NOT_FOUND,
        CONTACT_SAVING_ERROR, INTERNAL_ERROR, INVALID_CONTACT, UNKNOWN_CONTACT_TYPE,
        USER_NOT_FOUND,
    },
    state::AppState,
};

pub const CONTACT_TEXT_MAX_LEN: usize = 256;

pub fn contact_routes() -> Router<AppState> {
    Router::new()
        .route("/contact-types", get(list_contact_types))
        .route("/users/me/contacts", get(my_contacts).post(add_contact))
        .route("/users/me/contacts/:id", delete(remove_contact))
        .route("/users/:id/contacts", get(user_contacts))
}

pub(crate) fn validate_contact(req: NewContactRequest) -> Result<(Uuid, String), Canned> {
    let text = req.text.trim();
    match req.type_id {
        Some(type_id) if !text.is_empty() && text.chars().count() <= CONTACT_TEXT_MAX_LEN => {
            Ok((type_id, text.to_string()))
        }
        _ => Err(INVALID_CONTACT),
    }
}

#[instrument(skip(state))]
pub async fn list_contact_types(State(state): State<AppState>, locale: Locale) -> ApiResponse {
    match state.contacts.types().await {
        Ok(types) => ApiResponse::data(CATALOG_OK, &types, locale),
        Err(e) => {
            error!(error = %e, "list contact types failed");
            INTERNAL_ERROR.reply(locale)
        }
    }
}

#[instrument(skip(state))]
pub async fn my_contacts(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    locale: Locale,
) -> ApiResponse {
    match state.contacts.list_for_user(user_id).await {
        Ok(contacts) => ApiResponse::data(CONTACTS_OK, &contacts, locale),
        Err(e) => {
            error!(error = %e, %user_id, "list contacts failed");
            INTERNAL_ERROR.reply(locale)
        }
    }
}

#[instrument(skip(state))]
pub async fn user_contacts(
    State(state): State<AppState>,
    locale: Locale,
    Path(user_id): Path<Uuid>,
) -> ApiResponse {
    match state.users.find_by_id(user_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return USER_NOT_FOUND.reply(locale),
        Err(e) => {
            error!(error = %e, %user_id, "load user failed");
            return INTERNAL_ERROR.reply(locale);
        }
    }
    match state.contacts.list_for_user(user_id).await {
        Ok(contacts) => ApiResponse::data(CONTACTS_OK, &contacts, locale),
        Err(e) => {
            error!(error = %e, %user_id, "list contacts failed");
            INTERNAL_ERROR.reply(locale)
        }
    }
}

#[instrument(skip(state, payload))]
pub async fn add_contact(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    locale: Locale,
    payload: Result<Json<NewContactRequest>, JsonRejection>,
) -> ApiResponse {
    let req = payload.map(|Json(r)| r).unwrap_or_default();
    let (type_id, text) = match validate_contact(req) {
        Ok(v) => v,
        Err(canned) => return canned.reply(locale),
    };

    match state.contacts.insert(user_id, type_id, &text).await {
        Ok(contact) => {
            info!(contact_id = %contact.id, %user_id, "contact added");
            ApiResponse::new(
                CONTACT_ADDED,
                json!({
                    "message": Msg::ContactAdded.text(locale),
                    "contact": contact,
                }),
            )
        }
        Err(StoreError::MissingReference(_)) => UNKNOWN_CONTACT_TYPE.reply(locale),
        Err(e) => {
            error!(error = %e, %user_id, "insert contact failed");
            CONTACT_SAVING_ERROR.reply(locale)
        }
    }
}

#[instrument(skip(state))]
pub async fn remove_contact(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    locale: Locale,
    Path(contact_id): Path<Uuid>,
) -> ApiResponse {
    match state.contacts.delete(user_id, contact_id).await {
        Ok(true) => {
            info!(%contact_id, %user_id, "contact deleted");
            CONTACT_DELETED.reply(locale)
        }
        Ok(false) => CONTACT_NOT_FOUND.reply(locale),
        Err(e) => {
            error!(error = %e, %contact_id, "delete contact failed");
            CONTACT_SAVING_ERROR.reply(locale)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    use crate::testing::{access_token_for, fake_state, send_json};

    #[test]
    fn contact_needs_type_and_text() {
        let missing_type = NewContactRequest { type_id: None, text: "@alice".into() };
        assert_eq!(validate_contact(missing_type).unwrap_err().status.code(), 400_401);

        let blank = NewContactRequest { type_id: Some(Uuid::new_v4()), text: "   ".into() };
        assert_eq!(validate_contact(blank).unwrap_err().status.code(), 400_401);

        let long = NewContactRequest {
            type_id: Some(Uuid::new_v4()),
            text: "x".repeat(CONTACT_TEXT_MAX_LEN + 1),
        };
        assert!(validate_contact(long).is_err());

        let type_id = Uuid::new_v4();
        let ok = NewContactRequest { type_id: Some(type_id), text: " @alice ".into() };
        assert_eq!(validate_contact(ok).unwrap(), (type_id, "@alice".to_string()));
    }

    #[tokio::test]
    async fn invalid_contact_is_rejected_before_saving() {
        let (state, fakes) = fake_state();
        let me = fakes.users.insert_user("alice", "password1", None, true);
        let token = access_token_for(&state, me.id);
        let app = crate::app::build_app(state);

        let (http, body) = send_json(&app, "POST", "/api/v1/users/me/contacts", Some(&token),
            serde_json::json!({"text": "@alice"})).await;
        assert_eq!(http, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], 400_401);
    }

    #[tokio::test]
    async fn contacts_of_unknown_user_are_not_found() {
        let (state, _) = fake_state();
        let app = crate::app::build_app(state);
        let uri = format!("/api/v1/users/{}/contacts", Uuid::new_v4());
        let (http, body) = send_json(&app, "GET", &uri, None, serde_json::json!({})).await;
        assert_eq!(http, StatusCode::NOT_FOUND);
        assert_eq!(body["status"], 404_001);
    }

    #[tokio::test]
    async fn own_contacts_require_authentication() {
        let (state, _) = fake_state();
        let app = crate::app::build_app(state);
        let (http, _) = send_json(&app, "GET", "/api/v1/users/me/contacts", None,
            serde_json::json!({})).await;
        assert_eq!(http, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn contacts_are_added_listed_and_deleted_by_owner_only() {
        let (state, fakes) = fake_state();
        let telegram = fakes.contacts.add_type("Telegram");
        fakes.contacts.add_type("Email");
        let alice = fakes.users.insert_user("alice", "password1", None, true);
        let bob = fakes.users.insert_user("bob", "password1", None, true);
        let alice_token = access_token_for(&state, alice.id);
        let bob_token = access_token_for(&state, bob.id);
        let app = crate::app::build_app(state);

        let (http, body) = send_json(&app, "GET", "/api/v1/contact-types", None,
            serde_json::json!({})).await;
        assert_eq!(http, StatusCode::OK);
        assert_eq!(body["status"], 200_500);
        assert_eq!(body["offers"][0]["name"], "Email");

        let (http, body) = send_json(&app, "POST", "/api/v1/users/me/contacts", Some(&alice_token),
            serde_json::json!({"type_id": telegram.id, "text": " @alice "})).await;
        assert_eq!(http, StatusCode::CREATED);
        assert_eq!(body["status"], 201_400);
        assert_eq!(body["offers"]["contact"]["type_name"], "Telegram");
        assert_eq!(body["offers"]["contact"]["text"], "@alice");
        let contact_id = body["offers"]["contact"]["id"].as_str().unwrap().to_string();

        let (http, body) = send_json(&app, "POST", "/api/v1/users/me/contacts", Some(&alice_token),
            serde_json::json!({"type_id": Uuid::new_v4(), "text": "@alice"})).await;
        assert_eq!(http, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], 400_401);
        assert_eq!(body["offers"]["message"], "Type of contact not found.");

        let (_, body) = send_json(&app, "GET", "/api/v1/users/me/contacts", Some(&alice_token),
            serde_json::json!({})).await;
        assert_eq!(body["status"], 200_400);
        assert_eq!(body["offers"].as_array().unwrap().len(), 1);

        let (_, body) = send_json(&app, "GET", &format!("/api/v1/users/{}/contacts", alice.id),
            None, serde_json::json!({})).await;
        assert_eq!(body["status"], 200_400);
        assert_eq!(body["offers"][0]["text"], "@alice");

        let delete_uri = format!("/api/v1/users/me/contacts/{contact_id}");
        let (http, body) = send_json(&app, "DELETE", &delete_uri, Some(&bob_token),
            serde_json::json!({})).await;
        assert_eq!(http, StatusCode::NOT_FOUND);
        assert_eq!(body["status"], 404_401);

        let (http, body) = send_json(&app, "DELETE", &delete_uri, Some(&alice_token),
            serde_json::json!({})).await;
        assert_eq!(http, StatusCode::OK);
        assert_eq!(body["status"], 200_401);

        let (_, body) = send_json(&app, "DELETE", &delete_uri, Some(&alice_token),
            serde_json::json!({})).await;
        assert_eq!(body["status"], 404_401);
    }
}
