mod config;
mod database_config;
mod error;
mod ldap_config;
mod log_level;
mod logging_config;

pub use config::Config;
pub use database_config::{DatabaseConfig, DatabaseKind};
pub use error::{ConfigError, ConfigErrorResult};
pub use ldap_config::LdapConfig;
pub use log_level::LogLevel;
pub use logging_config::LoggingConfig;

const CONFIG_DIR_ENV: &str = "UM_CONFIG_DIR";
const DEFAULT_CONFIG_DIR_NAME: &str = ".um";
const CONFIG_FILE_NAME: &str = "config.toml";

const DEFAULT_DATABASE_PATH: &str = "PeerMgr/usermgr.db";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_LDAP_TIMEOUT_SECS: u64 = 10;
const DEFAULT_LOG_LEVEL_STRING: &str = "info";
const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;
const DEFAULT_LOG_DIRECTORY: &str = "log";

#[cfg(test)]
mod tests;
