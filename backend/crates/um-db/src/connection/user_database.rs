use crate::{DbError, Dialect, EmailUserRepository, Result, ensure_schema};

use error_location::ErrorLocation;
use log::info;
use std::panic::Location;
use std::path::{Path, PathBuf};

use sqlx::AnyPool;
use sqlx::any::AnyPoolOptions;

/// Directory, relative to the config dir, holding the embedded user database.
pub const SQLITE_DIR: &str = "PeerMgr";
/// File name of the embedded user database.
pub const SQLITE_FILE: &str = "usermgr.db";

const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Handle to the relational store holding `EmailUser` and `Binding`.
///
/// For the embedded engine the pool is private to this handle; for
/// client/server engines it may be shared with the rest of the process.
#[derive(Clone)]
pub struct UserDatabase {
    pool: AnyPool,
    dialect: Dialect,
}

impl UserDatabase {
    /// Default location of the embedded database under a config dir.
    pub fn sqlite_path(config_dir: &Path) -> PathBuf {
        config_dir.join(SQLITE_DIR).join(SQLITE_FILE)
    }

    /// Open (creating if needed) the embedded database file at `path`.
    pub async fn open_sqlite(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| DbError::Initialization {
                    message: format!("Cannot open db dir {}: {}", parent.display(), e),
                    location: ErrorLocation::from(Location::caller()),
                })?;
        }

        // mode=rwc: read-write-create
        let url = format!("sqlite:{}?mode=rwc", path.display());
        info!("Opening user database: {}", path.display());
        Self::connect(&url, DEFAULT_MAX_CONNECTIONS).await
    }

    /// Connect to any supported engine by URL and make sure the schema exists.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        sqlx::any::install_default_drivers();

        let dialect = Dialect::from_url(url).ok_or_else(|| DbError::Initialization {
            message: "unsupported database URL scheme".to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?;

        // An in-memory SQLite database lives only as long as its connection.
        let pool = if url.contains(":memory:") || url.contains("mode=memory") {
            AnyPoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect(url)
                .await
        } else {
            AnyPoolOptions::new()
                .max_connections(max_connections.max(1))
                .connect(url)
                .await
        }
        .map_err(|e| DbError::Initialization {
            message: format!("Failed to connect to {dialect} database: {e}"),
            location: ErrorLocation::from(Location::caller()),
        })?;

        Self::from_pool(pool, dialect).await
    }

    /// Adopt a pool owned elsewhere in the process.
    ///
    /// Only the schema setup is run; the pool's settings are left alone.
    pub async fn from_pool(pool: AnyPool, dialect: Dialect) -> Result<Self> {
        ensure_schema(&pool, dialect).await?;
        info!("User database ready ({dialect})");
        Ok(Self { pool, dialect })
    }

    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn users(&self) -> EmailUserRepository {
        EmailUserRepository::new(self.pool.clone(), self.dialect)
    }
}
