use crate::{ConfigError, ConfigErrorResult, DEFAULT_DATABASE_PATH, DEFAULT_MAX_CONNECTIONS};

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

/// Relational engine holding the user tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum DatabaseKind {
    #[default]
    #[serde(rename = "sqlite")]
    Sqlite,
    #[serde(rename = "mysql")]
    MySql,
    #[serde(rename = "pgsql", alias = "postgres", alias = "postgresql")]
    Postgres,
}

impl FromStr for DatabaseKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(Self::Sqlite),
            "mysql" => Ok(Self::MySql),
            "pgsql" | "postgres" | "postgresql" => Ok(Self::Postgres),
            other => Err(ConfigError::database(format!(
                "unknown database type '{other}' (expected sqlite, mysql or pgsql)"
            ))),
        }
    }
}

impl fmt::Display for DatabaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Sqlite => "sqlite",
            Self::MySql => "mysql",
            Self::Postgres => "pgsql",
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    #[serde(rename = "type")]
    pub kind: DatabaseKind,
    /// SQLite file, relative to the config dir.
    pub path: String,
    /// Connection URL for mysql/pgsql.
    pub url: Option<String>,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            kind: DatabaseKind::default(),
            path: String::from(DEFAULT_DATABASE_PATH),
            url: None,
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }
}

impl DatabaseConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.max_connections == 0 {
            return Err(ConfigError::database(
                "database.max_connections must be at least 1",
            ));
        }

        match self.kind {
            DatabaseKind::Sqlite => {
                let path = Path::new(&self.path);
                if self.path.is_empty() || path.is_absolute() || self.path.contains("..") {
                    return Err(ConfigError::database(
                        "database.path must be relative and cannot contain '..'",
                    ));
                }
            }
            DatabaseKind::MySql | DatabaseKind::Postgres => {
                if self.url.as_deref().is_none_or(|u| u.trim().is_empty()) {
                    return Err(ConfigError::database(format!(
                        "database.url is required for type {}",
                        self.kind
                    )));
                }
            }
        }

        Ok(())
    }
}
