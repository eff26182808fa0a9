use error_location::ErrorLocation;

use std::panic::Location;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLx error: {source} {location}")]
    Sqlx {
        source: sqlx::Error,
        location: ErrorLocation,
    },

    #[error("User already exists: {email} {location}")]
    Conflict {
        email: String,
        location: ErrorLocation,
    },

    #[error("Schema setup failed: {message} {location}")]
    Schema {
        message: String,
        #[source]
        source: sqlx::Error,
        location: ErrorLocation,
    },

    #[error("Database initialization failed: {message} {location}")]
    Initialization {
        message: String,
        location: ErrorLocation,
    },
}

impl DbError {
    /// True for failures that happened while bringing the store up, as
    /// opposed to a failing statement on a running store.
    pub fn is_startup_failure(&self) -> bool {
        matches!(self, Self::Schema { .. } | Self::Initialization { .. })
    }
}

impl From<sqlx::Error> for DbError {
    #[track_caller]
    fn from(source: sqlx::Error) -> Self {
        Self::Sqlx {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, DbError>;
