use crate::{
    DirectoryConnector, DirectoryEntry, DirectoryError, DirectorySession, DirectorySettings,
    LdapConnector, Result, SearchPattern,
};

use um_core::EmailUser;

use std::sync::Arc;

use log::{debug, warn};

/// Directory Adapter: validation, listing and counting against a directory.
///
/// Every call opens its own connection, binds with the service account (or
/// anonymously), and unbinds before returning.
#[derive(Clone)]
pub struct DirectoryStore {
    settings: DirectorySettings,
    connector: Arc<dyn DirectoryConnector>,
}

impl DirectoryStore {
    pub fn new(settings: DirectorySettings, connector: Arc<dyn DirectoryConnector>) -> Self {
        Self {
            settings,
            connector,
        }
    }

    /// Store backed by a real LDAP server at `settings.host`.
    pub fn ldap(settings: DirectorySettings) -> Self {
        let connector = Arc::new(LdapConnector::new(&settings));
        Self::new(settings, connector)
    }

    pub fn settings(&self) -> &DirectorySettings {
        &self.settings
    }

    /// Check `secret` by binding as the DN found for `login`.
    ///
    /// Every failure comes back as [`DirectoryError::Unauthorized`]; the
    /// cause is only logged.
    pub async fn validate(&self, login: &str, secret: &str) -> Result<()> {
        if secret.is_empty() {
            debug!("Directory validation for {login}: empty secret");
            return Err(DirectoryError::unauthorized());
        }

        let entries = self
            .search(&SearchPattern::login(login))
            .await
            .map_err(|e| {
                warn!("Directory lookup for {login} failed: {e}");
                DirectoryError::unauthorized()
            })?;

        let Some(entry) = entries.into_iter().next() else {
            debug!("Directory validation for {login}: no entry");
            return Err(DirectoryError::unauthorized());
        };

        let mut session = self
            .connector
            .bind(Some(entry.dn.as_str()), Some(secret))
            .await
            .map_err(|e| {
                debug!("Directory validation for {login}: {e}");
                DirectoryError::unauthorized()
            })?;

        close(session.as_mut()).await;
        Ok(())
    }

    /// Entries matching `pattern`, normalized to identity records.
    pub async fn list(&self, pattern: &SearchPattern) -> Result<Vec<EmailUser>> {
        let entries = self.search(pattern).await?;

        Ok(entries
            .iter()
            .filter_map(|entry| user_from_entry(entry, &self.settings.login_attr))
            .collect())
    }

    /// Number of entries matching `pattern`, or `-1` if the directory failed.
    pub async fn count(&self, pattern: &SearchPattern) -> i64 {
        match self.list(pattern).await {
            Ok(users) => users.len() as i64,
            Err(e) => {
                warn!("Directory count for {pattern} failed: {e}");
                -1
            }
        }
    }

    async fn search(&self, pattern: &SearchPattern) -> Result<Vec<DirectoryEntry>> {
        let mut session = self
            .connector
            .bind(
                self.settings.bind_dn.as_deref(),
                self.settings.bind_password.as_deref(),
            )
            .await?;

        let filter = pattern.filter(&self.settings.login_attr);
        let result = session
            .search(
                &self.settings.base,
                &filter,
                &[self.settings.login_attr.as_str()],
            )
            .await;

        close(session.as_mut()).await;
        result
    }
}

/// Normalize a directory entry into an identity record.
///
/// The directory exposes no id, flags or creation time on this path, so
/// those take fixed values. Entries without the login attribute yield `None`.
pub fn user_from_entry(entry: &DirectoryEntry, login_attr: &str) -> Option<EmailUser> {
    let email = entry.first(login_attr)?;

    Some(EmailUser {
        id: 0,
        email: email.to_string(),
        password_digest: None,
        is_staff: false,
        is_active: true,
        created_at: 0,
    })
}

async fn close(session: &mut dyn DirectorySession) {
    if let Err(e) = session.unbind().await {
        debug!("Directory unbind failed: {e}");
    }
}
