//! Business status catalog.
//!
//! The fourth digit selects the feature: 0 accounts and tokens, 1 offers,
//! 2 following, 3 profiles, 4 contacts, 5 reference data.

use crate::envelope::{Canned, Status};
use crate::i18n::Msg;

pub const OK: Status = Status::new(200_000);
pub const INTERNAL_ERROR: Canned = Canned::new(500_000, Msg::InternalError);
pub const NOT_AUTHENTICATED: Canned = Canned::new(401_002, Msg::NotAuthenticated);

// accounts
pub const VALID_SECURITY_CODE: Canned = Canned::new(200_001, Msg::ValidSecurityCode);
pub const USER_CREATION_OK: Canned = Canned::new(201_001, Msg::UserCreated);
pub const INVALID_PHONE_NUMBER: Canned = Canned::new(400_001, Msg::InvalidPhoneNumber);
pub const USED_PHONE_NUMBER: Canned = Canned::new(400_002, Msg::UsedPhoneNumber);
pub const INVALID_SECURITY_CODE: Status = Status::new(400_003);
pub const INVALID_REGISTRATION_DATA: Status = Status::new(400_004);
pub const INVALID_TOKEN_REQUEST: Canned = Canned::new(400_005, Msg::InvalidTokenRequest);
pub const WRONG_PASSWORD: Canned = Canned::new(401_001, Msg::WrongPassword);
pub const INVALID_REFRESH_TOKEN: Canned = Canned::new(401_003, Msg::InvalidRefreshToken);
pub const USER_IS_BLOCKED: Canned = Canned::new(403_001, Msg::UserIsBlocked);
pub const USER_NOT_FOUND: Canned = Canned::new(404_001, Msg::UserNotFound);
pub const SMS_SENDING_ERROR: Canned = Canned::new(500_001, Msg::SmsSendingError);
pub const USER_CREATION_ERROR: Canned = Canned::new(500_002, Msg::UserCreationError);
pub const TOKEN_GENERATION_ERROR: Canned = Canned::new(500_003, Msg::TokenGenerationError);

// offers
pub const OFFERS_OK: Status = Status::new(200_100);
pub const OFFER_CREATION_OK: Status = Status::new(201_100);
pub const INVALID_OFFER_TITLE: Canned = Canned::new(400_101, Msg::InvalidOfferTitle);
pub const INVALID_OFFER_DESCRIPTION: Canned = Canned::new(400_102, Msg::InvalidOfferDescription);
pub const INVALID_OFFER_QUERY: Canned = Canned::new(400_103, Msg::InvalidOfferQuery);
pub const OFFER_NOT_FOUND: Canned = Canned::new(404_101, Msg::OfferNotFound);
pub const OFFER_SAVING_ERROR: Canned = Canned::new(500_101, Msg::OfferSavingError);

// following
pub const FOLLOWING_OK: Status = Status::new(200_200);
pub const UNFOLLOW_OK: Canned = Canned::new(200_201, Msg::Unfollowed);
pub const FOLLOW_OK: Canned = Canned::new(201_200, Msg::Followed);
pub const CANNOT_FOLLOW_YOURSELF: Canned = Canned::new(400_201, Msg::CannotFollowYourself);
pub const ALREADY_FOLLOWING: Canned = Canned::new(400_202, Msg::AlreadyFollowing);
pub const AUTHOR_NOT_FOUND: Canned = Canned::new(404_201, Msg::AuthorNotFound);
pub const NOT_FOLLOWING: Canned = Canned::new(404_202, Msg::NotFollowing);
pub const FOLLOWING_ERROR: Canned = Canned::new(500_201, Msg::FollowingError);

// profiles
pub const PROFILE_OK: Status = Status::new(200_300);
pub const PROFILE_UPDATED: Status = Status::new(200_301);
pub const INVALID_PROFILE_DATA: Status = Status::new(400_301);
pub const PROFILE_SAVING_ERROR: Canned = Canned::new(500_301, Msg::ProfileSavingError);

// contacts
pub const CONTACTS_OK: Status = Status::new(200_400);
pub const CONTACT_DELETED: Canned = Canned::new(200_401, Msg::ContactDeleted);
pub const CONTACT_ADDED: Status = Status::new(201_400);
pub const INVALID_CONTACT: Canned = Canned::new(400_401, Msg::InvalidContact);
pub const UNKNOWN_CONTACT_TYPE: Canned = Canned::new(400_401, Msg::UnknownContactType);
pub const CONTACT_NOT_FOUND: Canned = Canned::new(404_401, Msg::ContactNotFound);
pub const CONTACT_SAVING_ERROR: Canned = Canned::new(500_401, Msg::ContactSavingError);

// reference data
pub const CATALOG_OK: Status = Status::new(200_500);
