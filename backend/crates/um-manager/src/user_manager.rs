use crate::{Result, UserError};

use um_config::{Config, DatabaseKind};
use um_core::{EmailUser, ListRange, hash_password};
use um_db::{Dialect, UserDatabase};
use um_directory::{DirectorySettings, DirectoryStore, SearchPattern};

use std::path::Path;
use std::time::Duration;

use log::{debug, info, warn};

/// Where identities come from. Fixed when the manager is built.
#[derive(Clone)]
pub enum BackendMode {
    /// Every operation goes to the local tables.
    Local,
    /// The directory is authoritative; local rows only carry staff overrides.
    Directory(DirectoryStore),
}

impl BackendMode {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Directory(_) => "directory",
        }
    }
}

/// Façade over the local store and the optional directory.
#[derive(Clone)]
pub struct UserManager {
    database: UserDatabase,
    mode: BackendMode,
}

impl UserManager {
    pub fn new(database: UserDatabase, directory: Option<DirectoryStore>) -> Self {
        let mode = match directory {
            Some(store) => BackendMode::Directory(store),
            None => BackendMode::Local,
        };
        info!("User manager running in {} mode", mode.name());

        Self { database, mode }
    }

    /// Validate `config`, open the database it names and, when `[ldap] host`
    /// is set, attach an LDAP directory.
    pub async fn open(config: &Config) -> Result<Self> {
        Self::open_in(config, &Config::config_dir()?).await
    }

    /// Like [`open`](Self::open), resolving the SQLite path under `config_dir`.
    pub async fn open_in(config: &Config, config_dir: &Path) -> Result<Self> {
        config.validate()?;

        let database = match config.database.kind {
            DatabaseKind::Sqlite => {
                UserDatabase::open_sqlite(&config.database_path_in(config_dir)).await?
            }
            kind @ (DatabaseKind::MySql | DatabaseKind::Postgres) => {
                let url = config.database.url.as_deref().unwrap_or_default();
                if Dialect::from_url(url) != Dialect::from_tag(&kind.to_string()) {
                    return Err(UserError::configuration(format!(
                        "database.url does not match database.type {kind}"
                    )));
                }
                UserDatabase::connect(url, config.database.max_connections).await?
            }
        };

        let ldap = &config.ldap;
        let directory = DirectorySettings::resolve(
            ldap.host.as_deref(),
            ldap.base.as_deref(),
            ldap.user_dn.as_deref(),
            ldap.password.as_deref(),
            Some(ldap.login_attr.as_str()),
        )?
        .map(|settings| {
            DirectoryStore::ldap(settings.with_timeout(Duration::from_secs(ldap.timeout_secs)))
        });

        Ok(Self::new(database, directory))
    }

    pub fn mode(&self) -> &BackendMode {
        &self.mode
    }

    pub fn database(&self) -> &UserDatabase {
        &self.database
    }

    /// Create a local user. A no-op in directory mode.
    pub async fn add_user(
        &self,
        email: &str,
        secret: &str,
        is_staff: bool,
        is_active: bool,
    ) -> Result<()> {
        if let BackendMode::Directory(_) = self.mode {
            debug!("Directory mode: not adding {email} locally");
            return Ok(());
        }

        self.database
            .users()
            .add(email, secret, is_staff, is_active)
            .await?;
        Ok(())
    }

    /// Delete a local user. Missing emails are fine; a no-op in directory mode.
    pub async fn remove_user(&self, email: &str) -> Result<()> {
        if let BackendMode::Directory(_) = self.mode {
            debug!("Directory mode: not removing {email} locally");
            return Ok(());
        }

        if !self.database.users().remove(email).await? {
            debug!("Remove: no user {email}");
        }
        Ok(())
    }

    /// Check a password. Every failure is [`UserError::Unauthorized`].
    pub async fn validate_user(&self, email: &str, secret: &str) -> Result<()> {
        match self.check_credentials(email, secret).await {
            Ok(()) => Ok(()),
            Err(e @ UserError::BackendUnavailable { .. }) => {
                warn!("Validation of {email} failed: {e}");
                Err(UserError::unauthorized())
            }
            Err(e) => {
                debug!("Validation of {email} rejected: {e}");
                Err(UserError::unauthorized())
            }
        }
    }

    async fn check_credentials(&self, email: &str, secret: &str) -> Result<()> {
        let local = self
            .database
            .users()
            .find_by_credentials(email, &hash_password(secret))
            .await;

        match &self.mode {
            BackendMode::Local => {
                let user = local?.ok_or_else(|| UserError::not_found(email))?;
                if !user.is_active {
                    return Err(UserError::unauthorized());
                }
                Ok(())
            }
            BackendMode::Directory(store) => {
                match local {
                    Ok(Some(user)) if user.is_staff && user.is_active => {
                        debug!("Validated {email} against local staff record");
                        return Ok(());
                    }
                    Ok(_) => {}
                    Err(e) => warn!("Local staff lookup for {email} failed: {e}"),
                }

                store.validate(email, secret).await?;
                Ok(())
            }
        }
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<EmailUser> {
        let local = self.database.users().find_by_email(email).await?;

        match &self.mode {
            BackendMode::Local => local.ok_or_else(|| UserError::not_found(email)),
            BackendMode::Directory(store) => {
                if let Some(user) = local.filter(|u| u.is_staff) {
                    return Ok(user);
                }

                store
                    .list(&SearchPattern::login(email))
                    .await?
                    .into_iter()
                    .next()
                    .ok_or_else(|| UserError::not_found(email))
            }
        }
    }

    /// Directory entries have no integer id, so this is always NotFound in
    /// directory mode.
    pub async fn get_user_by_id(&self, id: i64) -> Result<EmailUser> {
        if let BackendMode::Directory(_) = self.mode {
            return Err(UserError::not_found(id.to_string()));
        }

        self.database
            .users()
            .find_by_id(id)
            .await?
            .ok_or_else(|| UserError::not_found(id.to_string()))
    }

    /// List users. `(-1, -1)` means everything; otherwise a window of
    /// `limit` users starting at `start`.
    pub async fn list_users(&self, start: i64, limit: i64) -> Result<Vec<EmailUser>> {
        let range = ListRange::from_sentinel(start, limit);

        match &self.mode {
            BackendMode::Local => Ok(self.database.users().list(range).await?),
            BackendMode::Directory(store) => {
                Ok(range.apply(store.list(&SearchPattern::All).await?))
            }
        }
    }

    pub async fn count_users(&self) -> Result<i64> {
        match &self.mode {
            BackendMode::Local => Ok(self.database.users().count().await?),
            BackendMode::Directory(store) => match store.count(&SearchPattern::All).await {
                -1 => Err(UserError::backend_unavailable("directory count failed")),
                count => Ok(count),
            },
        }
    }

    /// Rewrite password and flags for a local id. Missing ids are fine.
    ///
    /// In directory mode only staff elevation is written; anything else is a
    /// no-op.
    pub async fn update_user(
        &self,
        id: i64,
        secret: &str,
        is_staff: bool,
        is_active: bool,
    ) -> Result<()> {
        if let BackendMode::Directory(_) = self.mode
            && !is_staff
        {
            debug!("Directory mode: not updating user {id} locally");
            return Ok(());
        }

        if !self
            .database
            .users()
            .update(id, secret, is_staff, is_active)
            .await?
        {
            debug!("Update: no user with id {id}");
        }
        Ok(())
    }
}
