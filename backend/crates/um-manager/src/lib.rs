//! User Resolver: one entry point for user identity over a local SQL store
//! and, optionally, an LDAP directory.

mod error;
mod user_manager;

pub use error::{Result, UserError};
pub use user_manager::{BackendMode, UserManager};

pub use um_core::{EmailUser, ListRange};
