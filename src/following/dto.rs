use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// One side of a following edge as listed to the user.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct FollowedUser {
    pub id: Uuid,
    pub username: String,
    pub avatar: String,
}
