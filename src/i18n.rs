use std::convert::Infallible;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

/// Language of user-facing messages, picked from `Accept-Language`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Locale {
    #[default]
    En,
    Ru,
}

impl Locale {
    pub fn from_accept_language(header: Option<&str>) -> Self {
        let Some(header) = header else {
            return Locale::En;
        };
        // only the first (most preferred) tag counts
        let first = header
            .split(',')
            .next()
            .and_then(|tag| tag.split(';').next())
            .map(|tag| tag.trim().to_ascii_lowercase())
            .unwrap_or_default();
        if first.starts_with("ru") {
            Locale::Ru
        } else {
            Locale::En
        }
    }

    pub fn from_parts(parts: &Parts) -> Self {
        Self::from_accept_language(
            parts
                .headers
                .get(axum::http::header::ACCEPT_LANGUAGE)
                .and_then(|v| v.to_str().ok()),
        )
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Locale
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Locale::from_parts(parts))
    }
}

/// Every user-facing message the service can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Msg {
    InternalError,
    NotAuthenticated,

    // phone verification and signup
    InvalidPhoneNumber,
    UsedPhoneNumber,
    SmsSendingError,
    ValidSecurityCode,
    InvalidSecurityCode,
    ExpiredSecurityCode,
    AlreadyVerifiedSecurityCode,
    UserCreated,
    UserCreationError,

    // signup field validation
    UsernameRequired,
    UsernameTooLong,
    UsernameInvalid,
    UsernameTaken,
    PasswordTooShort,
    EmailInvalid,
    NotAValidString,

    // tokens
    InvalidTokenRequest,
    UserNotFound,
    WrongPassword,
    UserIsBlocked,
    TokenGenerationError,
    InvalidRefreshToken,

    // offers
    OfferCreated,
    InvalidOfferTitle,
    InvalidOfferDescription,
    InvalidOfferQuery,
    OfferNotFound,
    OfferSavingError,

    // following
    Followed,
    Unfollowed,
    CannotFollowYourself,
    AlreadyFollowing,
    AuthorNotFound,
    NotFollowing,
    FollowingError,

    // profile
    ProfileUpdated,
    InvalidProfileData,
    UnknownCity,
    ProfileSavingError,

    // contacts
    ContactAdded,
    ContactDeleted,
    InvalidContact,
    UnknownContactType,
    ContactNotFound,
    ContactSavingError,
}

impl Msg {
    pub fn text(self, locale: Locale) -> &'static str {
        let (en, ru) = match self {
            Msg::InternalError => ("Internal server error.", "Внутренняя ошибка сервера."),
            Msg::NotAuthenticated => (
                "Authentication credentials were not provided or are invalid.",
                "Учетные данные не предоставлены или недействительны.",
            ),

            Msg::InvalidPhoneNumber => (
                "Please enter a valid phone number.",
                "Введите корректный номер телефона.",
            ),
            Msg::UsedPhoneNumber => (
                "A user with that phone already exists.",
                "Пользователь с таким телефоном уже существует.",
            ),
            Msg::SmsSendingError => (
                "Error in sending the security code.",
                "Ошибка при отправке кода безопасности.",
            ),
            Msg::ValidSecurityCode => ("Security code is valid.", "Код безопасности верен."),
            Msg::InvalidSecurityCode => (
                "Security code is not valid.",
                "Код безопасности неверен.",
            ),
            Msg::ExpiredSecurityCode => (
                "Security code has expired.",
                "Срок действия кода безопасности истек.",
            ),
            Msg::AlreadyVerifiedSecurityCode => (
                "Security code is already verified.",
                "Код безопасности уже подтвержден.",
            ),
            Msg::UserCreated => ("User has been created.", "Пользователь создан."),
            Msg::UserCreationError => (
                "Error in saving new user.",
                "Ошибка при сохранении пользователя.",
            ),

            Msg::UsernameRequired => ("Username is required.", "Укажите имя пользователя."),
            Msg::UsernameTooLong => (
                "Username must be 150 characters or fewer.",
                "Имя пользователя должно быть не длиннее 150 символов.",
            ),
            Msg::UsernameInvalid => (
                "Username may contain only letters, digits and @/./+/-/_ characters.",
                "Имя пользователя может содержать только буквы, цифры и символы @/./+/-/_.",
            ),
            Msg::UsernameTaken => (
                "A user with that username already exists.",
                "Пользователь с таким именем уже существует.",
            ),
            Msg::PasswordTooShort => (
                "Password must contain at least 8 characters.",
                "Пароль должен содержать не менее 8 символов.",
            ),
            Msg::EmailInvalid => (
                "Enter a valid email address.",
                "Введите корректный адрес электронной почты.",
            ),
            Msg::NotAValidString => ("Not a valid string.", "Некорректная строка."),

            Msg::InvalidTokenRequest => (
                "Please provide username and password.",
                "Укажите имя пользователя и пароль.",
            ),
            Msg::UserNotFound => ("User not found.", "Пользователь не найден."),
            Msg::WrongPassword => ("Wrong password.", "Неверный пароль."),
            Msg::UserIsBlocked => ("User is blocked.", "Пользователь заблокирован."),
            Msg::TokenGenerationError => (
                "Error in token generation.",
                "Ошибка при создании токена.",
            ),
            Msg::InvalidRefreshToken => (
                "Refresh token is invalid or expired.",
                "Токен обновления недействителен или истек.",
            ),

            Msg::OfferCreated => ("Offer has been created.", "Предложение создано."),
            Msg::InvalidOfferTitle => ("Please fill the title.", "Заполните заголовок."),
            Msg::InvalidOfferDescription => (
                "Please fill the description.",
                "Заполните описание.",
            ),
            Msg::InvalidOfferQuery => (
                "Invalid offer filter or pagination.",
                "Некорректный фильтр или параметры страницы.",
            ),
            Msg::OfferNotFound => ("Offer not found.", "Предложение не найдено."),
            Msg::OfferSavingError => (
                "Error in saving new offer.",
                "Ошибка при сохранении предложения.",
            ),

            Msg::Followed => ("You are following the author now.", "Вы подписались на автора."),
            Msg::Unfollowed => (
                "You are not following the author anymore.",
                "Вы отписались от автора.",
            ),
            Msg::CannotFollowYourself => (
                "You cannot follow yourself.",
                "Нельзя подписаться на самого себя.",
            ),
            Msg::AlreadyFollowing => (
                "You are already following the author.",
                "Вы уже подписаны на автора.",
            ),
            Msg::AuthorNotFound => ("Author not found.", "Автор не найден."),
            Msg::NotFollowing => (
                "You are not following the author.",
                "Вы не подписаны на автора.",
            ),
            Msg::FollowingError => (
                "Error in updating subscriptions.",
                "Ошибка при изменении подписок.",
            ),

            Msg::ProfileUpdated => ("Profile has been updated.", "Профиль обновлен."),
            Msg::InvalidProfileData => (
                "Profile data is not valid.",
                "Данные профиля некорректны.",
            ),
            Msg::UnknownCity => ("City not found.", "Город не найден."),
            Msg::ProfileSavingError => (
                "Error in saving the profile.",
                "Ошибка при сохранении профиля.",
            ),

            Msg::ContactAdded => ("Contact has been added.", "Контакт добавлен."),
            Msg::ContactDeleted => ("Contact has been deleted.", "Контакт удален."),
            Msg::InvalidContact => ("Please fill the contact.", "Заполните контакт."),
            Msg::UnknownContactType => (
                "Type of contact not found.",
                "Тип контакта не найден.",
            ),
            Msg::ContactNotFound => ("Contact not found.", "Контакт не найден."),
            Msg::ContactSavingError => (
                "Error in saving the contact.",
                "Ошибка при сохранении контакта.",
            ),
        };
        match locale {
            Locale::En => en,
            Locale::Ru => ru,
        }
    }
}
