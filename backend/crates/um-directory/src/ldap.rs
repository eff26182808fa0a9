use crate::{
    DirectoryConnector, DirectoryEntry, DirectoryError, DirectorySession, DirectorySettings,
    Result,
};

use std::time::Duration;

use async_trait::async_trait;
use ldap3::{Ldap, LdapConnAsync, LdapConnSettings, Scope, SearchEntry};
use log::{debug, warn};

/// [`DirectoryConnector`] speaking LDAPv3 through `ldap3`.
#[derive(Debug, Clone)]
pub struct LdapConnector {
    url: String,
    timeout: Duration,
}

impl LdapConnector {
    pub fn new(settings: &DirectorySettings) -> Self {
        Self {
            url: settings.url(),
            timeout: settings.timeout,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn connect(&self) -> Result<Ldap> {
        let conn_settings = LdapConnSettings::new().set_conn_timeout(self.timeout);

        let (conn, ldap) = LdapConnAsync::with_settings(conn_settings, &self.url)
            .await
            .map_err(|e| DirectoryError::connection(format!("{}: {}", self.url, e)))?;

        let url = self.url.clone();
        tokio::spawn(async move {
            if let Err(e) = conn.drive().await {
                warn!("LDAP connection to {url} ended with error: {e}");
            }
        });

        Ok(ldap)
    }
}

#[async_trait]
impl DirectoryConnector for LdapConnector {
    async fn bind(
        &self,
        dn: Option<&str>,
        password: Option<&str>,
    ) -> Result<Box<dyn DirectorySession>> {
        let mut ldap = self.connect().await?;

        if let Some(dn) = dn {
            let result = ldap
                .with_timeout(self.timeout)
                .simple_bind(dn, password.unwrap_or_default())
                .await
                .map_err(|e| DirectoryError::connection(e.to_string()))?;

            if let Err(e) = result.success() {
                debug!("LDAP bind for {dn} rejected: {e}");
                let _ = ldap.unbind().await;
                return Err(DirectoryError::bind(dn));
            }
        }

        Ok(Box::new(LdapSession {
            ldap,
            timeout: self.timeout,
        }))
    }
}

struct LdapSession {
    ldap: Ldap,
    timeout: Duration,
}

#[async_trait]
impl DirectorySession for LdapSession {
    async fn search(
        &mut self,
        base: &str,
        filter: &str,
        attrs: &[&str],
    ) -> Result<Vec<DirectoryEntry>> {
        let (entries, _) = self
            .ldap
            .with_timeout(self.timeout)
            .search(base, Scope::Subtree, filter, attrs.to_vec())
            .await
            .map_err(|e| DirectoryError::search(e.to_string()))?
            .success()
            .map_err(|e| DirectoryError::search(e.to_string()))?;

        Ok(entries
            .into_iter()
            .map(|entry| {
                let entry = SearchEntry::construct(entry);
                DirectoryEntry {
                    dn: entry.dn,
                    attrs: entry.attrs,
                }
            })
            .collect())
    }

    async fn unbind(&mut self) -> Result<()> {
        self.ldap
            .unbind()
            .await
            .map_err(|e| DirectoryError::connection(e.to_string()))
    }
}
