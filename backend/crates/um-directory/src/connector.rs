use crate::Result;

use std::collections::HashMap;

use async_trait::async_trait;

/// One search result: its distinguished name and the requested attributes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DirectoryEntry {
    pub dn: String,
    pub attrs: HashMap<String, Vec<String>>,
}

impl DirectoryEntry {
    /// First value of an attribute, if present. Attribute names are
    /// case-insensitive, so `Mail` finds `mail`.
    pub fn first(&self, attr: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(attr))
            .and_then(|(_, values)| values.first())
            .map(String::as_str)
    }
}

/// Opens bound connections to a directory server.
///
/// Every call opens a new connection; nothing is pooled.
#[async_trait]
pub trait DirectoryConnector: Send + Sync {
    /// Connect and bind. `dn == None` leaves the connection anonymous.
    async fn bind(
        &self,
        dn: Option<&str>,
        password: Option<&str>,
    ) -> Result<Box<dyn DirectorySession>>;
}

/// A bound connection.
#[async_trait]
pub trait DirectorySession: Send {
    /// Subtree search under `base`, returning only `attrs`.
    async fn search(
        &mut self,
        base: &str,
        filter: &str,
        attrs: &[&str],
    ) -> Result<Vec<DirectoryEntry>>;

    async fn unbind(&mut self) -> Result<()>;
}
