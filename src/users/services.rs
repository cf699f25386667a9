use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::{
    auth::password::hash_password,
    i18n::{Locale, Msg},
    phone::services::normalize_phone,
    users::{
        dto::{CreateUserRequest, UpdateProfileRequest},
        repo::UserStore,
        repo_types::{NewUser, ProfileUpdate},
    },
};

pub const USERNAME_MAX_LEN: usize = 150;
pub const NAME_MAX_LEN: usize = 150;
pub const AVATAR_MAX_LEN: usize = 200;
pub const PASSWORD_MIN_LEN: usize = 8;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub(crate) fn is_valid_username(username: &str) -> bool {
    lazy_static! {
        static ref USERNAME_RE: Regex = Regex::new(r"^[\w.@+-]+$").unwrap();
    }
    USERNAME_RE.is_match(username)
}

/// Joins field errors into the single sentence sequence returned to clients.
pub fn join_messages(errors: &[Msg], locale: Locale) -> String {
    errors
        .iter()
        .map(|m| m.text(locale))
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, thiserror::Error)]
pub enum SignupError {
    #[error("invalid registration data")]
    Invalid(Vec<Msg>),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// Checks every account field, collecting all problems, and hashes the password.
pub async fn validate_signup(
    users: &dyn UserStore,
    req: CreateUserRequest,
) -> Result<NewUser, SignupError> {
    let mut errors = Vec::new();

    let username = req.username.trim().to_string();
    if username.is_empty() {
        errors.push(Msg::UsernameRequired);
    } else if username.chars().count() > USERNAME_MAX_LEN {
        errors.push(Msg::UsernameTooLong);
    } else if !is_valid_username(&username) {
        errors.push(Msg::UsernameInvalid);
    } else if users.username_is_taken(&username).await? {
        errors.push(Msg::UsernameTaken);
    }

    if req.password.chars().count() < PASSWORD_MIN_LEN {
        errors.push(Msg::PasswordTooShort);
    }

    let email = req
        .email
        .map(|e| e.trim().to_lowercase())
        .unwrap_or_default();
    if !email.is_empty() && !is_valid_email(&email) {
        errors.push(Msg::EmailInvalid);
    }

    let phone_number = normalize_phone(&req.phone_number);
    match &phone_number {
        Some(p) => {
            if users.phone_is_used(p).await? {
                errors.push(Msg::UsedPhoneNumber);
            }
        }
        None => errors.push(Msg::InvalidPhoneNumber),
    }

    let first_name = req.first_name.unwrap_or_default().trim().to_string();
    let last_name = req.last_name.unwrap_or_default().trim().to_string();
    if first_name.chars().count() > NAME_MAX_LEN || last_name.chars().count() > NAME_MAX_LEN {
        errors.push(Msg::InvalidProfileData);
    }

    if !errors.is_empty() {
        debug!(count = errors.len(), "signup data rejected");
        return Err(SignupError::Invalid(errors));
    }

    let password_hash = hash_password(&req.password)?;
    Ok(NewUser {
        username,
        password_hash,
        email,
        first_name,
        last_name,
        phone_number,
    })
}

/// Validates a profile patch; returns the problems found, if any.
pub fn validate_profile_update(req: UpdateProfileRequest) -> Result<ProfileUpdate, Vec<Msg>> {
    let mut errors = Vec::new();

    let first_name = req.first_name.map(|s| s.trim().to_string());
    let last_name = req.last_name.map(|s| s.trim().to_string());
    let too_long = |v: &Option<String>| v.as_ref().is_some_and(|s| s.chars().count() > NAME_MAX_LEN);
    if too_long(&first_name) || too_long(&last_name) {
        errors.push(Msg::InvalidProfileData);
    }

    let email = req.email.map(|e| e.trim().to_lowercase());
    if let Some(e) = &email {
        if !e.is_empty() && !is_valid_email(e) {
            errors.push(Msg::EmailInvalid);
        }
    }

    let avatar = req.avatar.map(|a| a.trim().to_string());
    if avatar
        .as_ref()
        .is_some_and(|a| a.chars().count() > AVATAR_MAX_LEN)
        && !errors.contains(&Msg::InvalidProfileData)
    {
        errors.push(Msg::InvalidProfileData);
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(ProfileUpdate {
        first_name,
        last_name,
        email,
        avatar,
        city_id: req.city_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::InMemoryUsers;

    fn request(username: &str, password: &str, phone: &str) -> CreateUserRequest {
        CreateUserRequest {
            username: username.into(),
            password: password.into(),
            phone_number: phone.into(),
            ..Default::default()
        }
    }

    #[test]
    fn username_charset() {
        assert!(is_valid_username("john.doe+1@x_y-z"));
        assert!(!is_valid_username("john doe"));
        assert!(!is_valid_username("john/doe"));
    }

    #[tokio::test]
    async fn collects_every_problem() {
        let users = InMemoryUsers::default();
        let err = validate_signup(&users, request("", "short", "12"))
            .await
            .unwrap_err();
        let SignupError::Invalid(errors) = err else {
            panic!("expected validation errors");
        };
        assert_eq!(
            errors,
            vec![Msg::UsernameRequired, Msg::PasswordTooShort, Msg::InvalidPhoneNumber]
        );
        assert_eq!(
            join_messages(&errors, Locale::En),
            "Username is required. Password must contain at least 8 characters. \
             Please enter a valid phone number."
        );
    }

    #[tokio::test]
    async fn rejects_taken_username_and_used_phone() {
        let users = InMemoryUsers::default();
        users.insert_user("alice", "password123", Some("+79991234567"), true);

        let err = validate_signup(&users, request("alice", "password123", "+7 999 123-45-67"))
            .await
            .unwrap_err();
        let SignupError::Invalid(errors) = err else {
            panic!("expected validation errors");
        };
        assert_eq!(errors, vec![Msg::UsernameTaken, Msg::UsedPhoneNumber]);
    }

    #[tokio::test]
    async fn accepts_valid_request_and_hashes_password() {
        let users = InMemoryUsers::default();
        let mut req = request("  bob ", "password123", "+1 (650) 253-9999");
        req.email = Some(" Bob@Example.com ".into());

        let new_user = validate_signup(&users, req).await.expect("valid signup");
        assert_eq!(new_user.username, "bob");
        assert_eq!(new_user.email, "bob@example.com");
        assert_eq!(new_user.phone_number.as_deref(), Some("+16502539999"));
        assert_ne!(new_user.password_hash, "password123");
    }

    #[test]
    fn profile_update_rules() {
        let ok = validate_profile_update(UpdateProfileRequest {
            first_name: Some(" Ann ".into()),
            email: Some("".into()),
            ..Default::default()
        })
        .expect("valid update");
        assert_eq!(ok.first_name.as_deref(), Some("Ann"));
        assert_eq!(ok.email.as_deref(), Some(""));
        assert!(ok.last_name.is_none());

        let errors = validate_profile_update(UpdateProfileRequest {
            email: Some("not-an-email".into()),
            avatar: Some("a".repeat(AVATAR_MAX_LEN + 1)),
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(errors, vec![Msg::EmailInvalid, Msg::InvalidProfileData]);
    }
}
