use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::{
    de::{text_value, NotText},
    users::repo_types::User,
};

/// Account fields of the signup request; the verification fields are read separately.
#[derive(Debug, Default)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    pub phone_number: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl CreateUserRequest {
    /// Decodes each field on its own. Numbers are taken as text; the names of
    /// fields holding any other JSON type are returned and those fields left empty.
    pub fn from_json(body: &Value) -> (Self, Vec<&'static str>) {
        let mut rejected = Vec::new();
        let mut field = |name: &'static str| match text_value(body.get(name)) {
            Ok(v) => v,
            Err(NotText) => {
                rejected.push(name);
                None
            }
        };
        let req = Self {
            username: field("username").unwrap_or_default(),
            password: field("password").unwrap_or_default(),
            phone_number: field("phone_number").unwrap_or_default(),
            email: field("email"),
            first_name: field("first_name"),
            last_name: field("last_name"),
        };
        (req, rejected)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub avatar: Option<String>,
    pub city_id: Option<Uuid>,
}

/// Profile as seen by its owner.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub avatar: String,
    pub city_id: Option<Uuid>,
}

impl From<User> for ProfileResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            first_name: u.first_name,
            last_name: u.last_name,
            email: u.email,
            phone_number: u.phone_number,
            avatar: u.avatar,
            city_id: u.city_id,
        }
    }
}

/// Profile as seen by everyone else.
#[derive(Debug, Serialize)]
pub struct PublicProfile {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub avatar: String,
    pub city_id: Option<Uuid>,
}

impl From<User> for PublicProfile {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            first_name: u.first_name,
            last_name: u.last_name,
            avatar: u.avatar,
            city_id: u.city_id,
        }
    }
}
