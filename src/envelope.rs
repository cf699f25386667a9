use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::error;

use crate::{
    i18n::{Locale, Msg},
    replies::INTERNAL_ERROR,
};

/// Six-digit business status. The leading three digits are the HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Status(u32);

impl Status {
    pub const fn new(code: u32) -> Self {
        assert!(
            code >= 100_000 && code <= 599_999,
            "business status must be a six-digit code starting with an HTTP status"
        );
        Self(code)
    }

    pub const fn code(self) -> u32 {
        self.0
    }

    pub fn http(self) -> StatusCode {
        let http = self.0 / 1000;
        u16::try_from(http)
            .ok()
            .and_then(|c| StatusCode::from_u16(c).ok())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct UserMenuLinks {
    pub link_new_offer: &'static str,
    pub link_my_offers: &'static str,
    pub link_my_likes: &'static str,
    pub link_following: &'static str,
    pub link_messages: &'static str,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ManageProfileLinks {
    pub edit_profile_link: &'static str,
    pub logout_profile_link: &'static str,
}

pub const USER_MENU_LINKS: UserMenuLinks = UserMenuLinks {
    link_new_offer: "/api/v1/offers",
    link_my_offers: "/api/v1/offers/{id}",
    link_my_likes: "To Be Determined",
    link_following: "/api/v1/users/me/following",
    link_messages: "To Be Determined",
};

pub const MANAGE_PROFILE_LINKS: ManageProfileLinks = ManageProfileLinks {
    edit_profile_link: "/api/v1/users/me",
    logout_profile_link: "To Be Determined",
};

/// Wire shape of every response body.
#[derive(Debug, Serialize)]
pub struct Envelope {
    pub status: Status,
    pub offers: Value,
    pub user_menu_links: UserMenuLinks,
    pub manage_profile: ManageProfileLinks,
}

#[derive(Debug)]
pub struct ApiResponse {
    pub status: Status,
    pub body: Value,
}

impl ApiResponse {
    pub fn new(status: Status, body: Value) -> Self {
        Self { status, body }
    }

    /// Serializes `data` as the payload; a failure to serialize becomes an internal error.
    pub fn data<T: Serialize>(status: Status, data: &T, locale: Locale) -> Self {
        match serde_json::to_value(data) {
            Ok(body) => Self::new(status, body),
            Err(e) => {
                error!(error = %e, status = status.code(), "response payload serialization failed");
                INTERNAL_ERROR.reply(locale)
            }
        }
    }

    pub fn message(status: Status, text: impl Into<String>) -> Self {
        Self::new(status, json!({ "message": text.into() }))
    }

    pub fn http_status(&self) -> StatusCode {
        self.status.http()
    }

    pub fn envelope(self) -> Envelope {
        Envelope {
            status: self.status,
            offers: self.body,
            user_menu_links: USER_MENU_LINKS,
            manage_profile: MANAGE_PROFILE_LINKS,
        }
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        let http = self.http_status();
        (http, Json(self.envelope())).into_response()
    }
}

/// A fixed status paired with a fixed message.
#[derive(Debug, Clone, Copy)]
pub struct Canned {
    pub status: Status,
    pub msg: Msg,
}

impl Canned {
    pub const fn new(code: u32, msg: Msg) -> Self {
        Self {
            status: Status::new(code),
            msg,
        }
    }

    pub fn reply(&self, locale: Locale) -> ApiResponse {
        ApiResponse::message(self.status, self.msg.text(locale))
    }
}
