use um_config::ConfigError;
use um_db::DbError;
use um_directory::DirectoryError;

use std::panic::Location;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum UserError {
    #[error("Configuration error: {message} {location}")]
    Configuration {
        message: String,
        location: ErrorLocation,
    },

    #[error("User already exists: {email} {location}")]
    Conflict {
        email: String,
        location: ErrorLocation,
    },

    #[error("User not found: {key} {location}")]
    NotFound { key: String, location: ErrorLocation },

    #[error("Not authorized {location}")]
    Unauthorized { location: ErrorLocation },

    #[error("Backend unavailable: {message} {location}")]
    BackendUnavailable {
        message: String,
        location: ErrorLocation,
    },
}

impl UserError {
    #[track_caller]
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn not_found<S: Into<String>>(key: S) -> Self {
        Self::NotFound {
            key: key.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn unauthorized() -> Self {
        Self::Unauthorized {
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn backend_unavailable<S: Into<String>>(message: S) -> Self {
        Self::BackendUnavailable {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    /// Stable machine-readable code for callers that print errors.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Configuration { .. } => "CONFIGURATION",
            Self::Conflict { .. } => "CONFLICT",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Unauthorized { .. } => "UNAUTHORIZED",
            Self::BackendUnavailable { .. } => "BACKEND_UNAVAILABLE",
        }
    }
}

impl From<DbError> for UserError {
    #[track_caller]
    fn from(err: DbError) -> Self {
        let location = ErrorLocation::from(Location::caller());
        match err {
            DbError::Conflict { email, .. } => Self::Conflict { email, location },
            err if err.is_startup_failure() => Self::Configuration {
                message: err.to_string(),
                location,
            },
            err => Self::BackendUnavailable {
                message: err.to_string(),
                location,
            },
        }
    }
}

impl From<DirectoryError> for UserError {
    #[track_caller]
    fn from(err: DirectoryError) -> Self {
        let location = ErrorLocation::from(Location::caller());
        match err {
            DirectoryError::Configuration { message, .. } => {
                Self::Configuration { message, location }
            }
            DirectoryError::Unauthorized { .. } => Self::Unauthorized { location },
            err => Self::BackendUnavailable {
                message: err.to_string(),
                location,
            },
        }
    }
}

impl From<ConfigError> for UserError {
    #[track_caller]
    fn from(err: ConfigError) -> Self {
        Self::Configuration {
            message: err.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, UserError>;
