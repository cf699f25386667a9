use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

pub async fn connect(database_url: &str) -> anyhow::Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
        .context("connect to database")
}

/// Failure of a write that callers branch on.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{0} is already taken")]
    Duplicate(&'static str),
    #[error("referenced {0} does not exist")]
    MissingReference(&'static str),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StoreError {
    /// Maps constraint violations by constraint name; anything else is `Other`.
    pub fn classify(err: sqlx::Error, what: &'static str) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let constraint = db_err.constraint().unwrap_or_default();
            if db_err.is_unique_violation() {
                return StoreError::Duplicate(field_of(constraint));
            }
            if db_err.is_foreign_key_violation() {
                return StoreError::MissingReference(field_of(constraint));
            }
        }
        StoreError::Other(anyhow::Error::new(err).context(what))
    }
}

fn field_of(constraint: &str) -> &'static str {
    match constraint {
        "users_username_key" => "username",
        "users_phone_number_key" => "phone_number",
        "users_city_id_fkey" => "city",
        "user_contacts_type_id_fkey" => "contact_type",
        "followings_author_id_fkey" => "author",
        "followings_follower_id_author_id_key" => "following",
        _ => "record",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_database_errors_are_other() {
        let err = StoreError::classify(sqlx::Error::RowNotFound, "load user");
        assert!(matches!(err, StoreError::Other(_)));
        assert!(err.to_string().contains("load user"));
    }

    #[test]
    fn known_constraints_name_their_field() {
        assert_eq!(field_of("users_phone_number_key"), "phone_number");
        assert_eq!(field_of("users_city_id_fkey"), "city");
        assert_eq!(field_of("something_else"), "record");
    }
}
