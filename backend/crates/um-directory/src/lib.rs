//! Read-only user lookups against an external LDAP directory.
//!
//! [`DirectoryStore`] turns directory entries into [`um_core::EmailUser`]
//! values and checks passwords by re-binding as the user's DN. The wire
//! protocol sits behind [`DirectoryConnector`]; [`LdapConnector`] talks to a
//! real server and [`MemoryDirectory`] serves tests and local setups.

pub mod connector;
pub mod error;
pub mod filter;
pub mod ldap;
pub mod memory;
pub mod settings;
pub mod store;

pub use connector::{DirectoryConnector, DirectoryEntry, DirectorySession};
pub use error::{DirectoryError, Result};
pub use filter::SearchPattern;
pub use ldap::LdapConnector;
pub use memory::MemoryDirectory;
pub use settings::DirectorySettings;
pub use store::{DirectoryStore, user_from_entry};

pub use um_core::DEFAULT_LOGIN_ATTR;

#[cfg(test)]
mod tests;
