use serde::{Deserialize, Serialize};

use crate::de::string_or_number;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PhoneRequest {
    #[serde(deserialize_with = "string_or_number")]
    pub phone_number: String,
}

/// The three fields that identify a verification attempt.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct VerificationRequest {
    #[serde(deserialize_with = "string_or_number")]
    pub phone_number: String,
    pub session_token: String,
    #[serde(deserialize_with = "string_or_number")]
    pub security_code: String,
}

#[derive(Debug, Serialize)]
pub struct SessionTokenResponse {
    pub session_token: String,
}
