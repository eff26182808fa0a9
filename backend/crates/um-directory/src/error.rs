use error_location::ErrorLocation;

use std::panic::Location;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("Directory configuration error: {message} {location}")]
    Configuration {
        message: String,
        location: ErrorLocation,
    },

    #[error("Directory connection failed: {message} {location}")]
    Connection {
        message: String,
        location: ErrorLocation,
    },

    #[error("Directory bind rejected for {dn} {location}")]
    Bind { dn: String, location: ErrorLocation },

    #[error("Directory search failed: {message} {location}")]
    Search {
        message: String,
        location: ErrorLocation,
    },

    #[error("Not authorized {location}")]
    Unauthorized { location: ErrorLocation },
}

impl DirectoryError {
    #[track_caller]
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn connection<S: Into<String>>(message: S) -> Self {
        Self::Connection {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn bind<S: Into<String>>(dn: S) -> Self {
        Self::Bind {
            dn: dn.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn search<S: Into<String>>(message: S) -> Self {
        Self::Search {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn unauthorized() -> Self {
        Self::Unauthorized {
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, DirectoryError>;
