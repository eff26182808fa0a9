use crate::{DirectoryConnector, DirectoryEntry, DirectoryError, DirectorySession, Result};

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use ldap3::ldap_escape;
use tokio::sync::RwLock;

/// In-process directory with the same bind/search behavior as a server.
///
/// Clones share state, so a test can keep a handle and flip
/// [`set_available`](Self::set_available) while a store uses another.
#[derive(Debug, Clone, Default)]
pub struct MemoryDirectory {
    state: Arc<RwLock<MemoryState>>,
}

#[derive(Debug)]
struct MemoryState {
    entries: Vec<MemoryEntry>,
    service_account: Option<(String, String)>,
    available: bool,
    binds: usize,
}

impl Default for MemoryState {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            service_account: None,
            available: true,
            binds: 0,
        }
    }
}

#[derive(Debug, Clone)]
struct MemoryEntry {
    dn: String,
    password: String,
    attrs: HashMap<String, Vec<String>>,
}

impl MemoryEntry {
    fn values(&self, attr: &str) -> Option<&Vec<String>> {
        self.attrs
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(attr))
            .map(|(_, values)| values)
    }
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_entry(&self, dn: &str, password: &str, attrs: &[(&str, &str)]) {
        let mut map: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in attrs {
            map.entry((*name).to_string())
                .or_default()
                .push((*value).to_string());
        }

        self.state.write().await.entries.push(MemoryEntry {
            dn: dn.to_string(),
            password: password.to_string(),
            attrs: map,
        });
    }

    /// Account the store binds as before searching.
    pub async fn set_service_account(&self, dn: &str, password: &str) {
        self.state.write().await.service_account = Some((dn.to_string(), password.to_string()));
    }

    /// Simulate an outage: binds fail to connect and open sessions fail to search.
    pub async fn set_available(&self, available: bool) {
        self.state.write().await.available = available;
    }

    /// Number of bind attempts seen so far, including failed ones.
    pub async fn bind_count(&self) -> usize {
        self.state.read().await.binds
    }
}

#[async_trait]
impl DirectoryConnector for MemoryDirectory {
    async fn bind(
        &self,
        dn: Option<&str>,
        password: Option<&str>,
    ) -> Result<Box<dyn DirectorySession>> {
        let mut state = self.state.write().await;
        state.binds += 1;

        if !state.available {
            return Err(DirectoryError::connection("memory directory is unavailable"));
        }

        let password = password.unwrap_or_default();

        // A simple bind with an empty password is an unauthenticated bind.
        if let Some(dn) = dn
            && !password.is_empty()
        {
            let service_ok = state
                .service_account
                .as_ref()
                .is_some_and(|(sdn, spw)| sdn == dn && spw == password);
            let entry_ok = state
                .entries
                .iter()
                .any(|e| e.dn == dn && e.password == password);

            if !service_ok && !entry_ok {
                return Err(DirectoryError::bind(dn));
            }
        }

        Ok(Box::new(MemorySession {
            state: Arc::clone(&self.state),
        }))
    }
}

struct MemorySession {
    state: Arc<RwLock<MemoryState>>,
}

#[async_trait]
impl DirectorySession for MemorySession {
    async fn search(
        &mut self,
        base: &str,
        filter: &str,
        attrs: &[&str],
    ) -> Result<Vec<DirectoryEntry>> {
        let state = self.state.read().await;
        if !state.available {
            return Err(DirectoryError::search("memory directory is unavailable"));
        }

        let (attr, value) = parse_equality(filter)
            .ok_or_else(|| DirectoryError::search(format!("unsupported filter {filter}")))?;

        let base = base.to_ascii_lowercase();

        Ok(state
            .entries
            .iter()
            .filter(|e| e.dn.to_ascii_lowercase().ends_with(&base))
            .filter(|e| match e.values(attr) {
                None => false,
                Some(_) if value == "*" => true,
                Some(values) => values.iter().any(|v| ldap_escape(v.as_str()) == value),
            })
            .map(|e| DirectoryEntry {
                dn: e.dn.clone(),
                attrs: e
                    .attrs
                    .iter()
                    .filter(|(name, _)| attrs.iter().any(|a| a.eq_ignore_ascii_case(name)))
                    .map(|(name, values)| (name.clone(), values.clone()))
                    .collect(),
            })
            .collect())
    }

    async fn unbind(&mut self) -> Result<()> {
        Ok(())
    }
}

// Only the `(attr=value)` shape is understood.
fn parse_equality(filter: &str) -> Option<(&str, &str)> {
    let inner = filter.strip_prefix('(')?.strip_suffix(')')?;
    let (attr, value) = inner.split_once('=')?;
    (!attr.is_empty()).then_some((attr, value))
}
