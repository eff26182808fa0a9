use crate::{DirectoryError, Result};

use um_core::DEFAULT_LOGIN_ATTR;

use std::fmt;
use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Resolved directory connection settings. Built once at startup.
#[derive(Clone, PartialEq, Eq)]
pub struct DirectorySettings {
    pub host: String,
    pub base: String,
    pub bind_dn: Option<String>,
    pub bind_password: Option<String>,
    pub login_attr: String,
    pub timeout: Duration,
}

impl DirectorySettings {
    pub fn new<H: Into<String>, B: Into<String>>(host: H, base: B) -> Self {
        Self {
            host: host.into(),
            base: base.into(),
            bind_dn: None,
            bind_password: None,
            login_attr: DEFAULT_LOGIN_ATTR.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Turn raw configuration values into settings.
    ///
    /// Returns `Ok(None)` when no host is given, which means directory mode
    /// is off. Blank strings count as absent.
    pub fn resolve(
        host: Option<&str>,
        base: Option<&str>,
        user_dn: Option<&str>,
        password: Option<&str>,
        login_attr: Option<&str>,
    ) -> Result<Option<Self>> {
        let Some(host) = non_blank(host) else {
            return Ok(None);
        };

        let base = non_blank(base).ok_or_else(|| {
            DirectoryError::configuration("ldap base is required when ldap host is set")
        })?;

        let mut settings = Self::new(host, base);

        if let Some(dn) = non_blank(user_dn) {
            let password = password.filter(|p| !p.is_empty()).ok_or_else(|| {
                DirectoryError::configuration("ldap password is required when user_dn is set")
            })?;
            settings = settings.with_bind_account(dn, password);
        }

        if let Some(attr) = non_blank(login_attr) {
            settings = settings.with_login_attr(attr);
        }

        Ok(Some(settings))
    }

    pub fn with_bind_account<D: Into<String>, P: Into<String>>(mut self, dn: D, password: P) -> Self {
        self.bind_dn = Some(dn.into());
        self.bind_password = Some(password.into());
        self
    }

    pub fn with_login_attr<S: Into<String>>(mut self, attr: S) -> Self {
        self.login_attr = attr.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Host as an LDAP URL; bare host names get `ldap://`.
    pub fn url(&self) -> String {
        if self.host.contains("://") {
            self.host.clone()
        } else {
            format!("ldap://{}", self.host)
        }
    }
}

// Keep the bind password out of logs.
impl fmt::Debug for DirectorySettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectorySettings")
            .field("host", &self.host)
            .field("base", &self.base)
            .field("bind_dn", &self.bind_dn)
            .field("bind_password", &self.bind_password.as_ref().map(|_| "***"))
            .field("login_attr", &self.login_attr)
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
