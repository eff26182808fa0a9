use crate::{ConfigError, ConfigErrorResult, DEFAULT_LDAP_TIMEOUT_SECS};

use um_core::DEFAULT_LOGIN_ATTR;

use std::fmt;

use serde::Deserialize;

/// `[ldap]` section. Setting `host` switches the process to directory mode.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct LdapConfig {
    pub host: Option<String>,
    pub base: Option<String>,
    pub user_dn: Option<String>,
    pub password: Option<String>,
    pub login_attr: String,
    pub timeout_secs: u64,
}

impl Default for LdapConfig {
    fn default() -> Self {
        Self {
            host: None,
            base: None,
            user_dn: None,
            password: None,
            login_attr: String::from(DEFAULT_LOGIN_ATTR),
            timeout_secs: DEFAULT_LDAP_TIMEOUT_SECS,
        }
    }
}

impl LdapConfig {
    pub fn is_enabled(&self) -> bool {
        is_set(&self.host)
    }

    pub fn validate(&self) -> ConfigErrorResult<()> {
        if !self.is_enabled() {
            return Ok(());
        }

        if !is_set(&self.base) {
            return Err(ConfigError::ldap("ldap.base is required when ldap.host is set"));
        }

        if is_set(&self.user_dn) && self.password.as_deref().is_none_or(str::is_empty) {
            return Err(ConfigError::ldap(
                "ldap.password is required when ldap.user_dn is set",
            ));
        }

        if self.login_attr.trim().is_empty() {
            return Err(ConfigError::ldap("ldap.login_attr cannot be empty"));
        }

        if self.timeout_secs == 0 {
            return Err(ConfigError::ldap("ldap.timeout_secs must be at least 1"));
        }

        Ok(())
    }
}

impl fmt::Debug for LdapConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LdapConfig")
            .field("host", &self.host)
            .field("base", &self.base)
            .field("user_dn", &self.user_dn)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("login_attr", &self.login_attr)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn is_set(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}
