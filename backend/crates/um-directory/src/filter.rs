use std::fmt;

use ldap3::ldap_escape;

/// What a directory search should match on the login attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchPattern {
    /// Every entry carrying the login attribute.
    All,
    /// Entries whose login attribute equals this value exactly.
    Login(String),
}

impl SearchPattern {
    pub fn login<S: Into<String>>(login: S) -> Self {
        Self::Login(login.into())
    }

    /// Build `(<attr>=<value>)`, escaping the value per RFC 4515.
    pub fn filter(&self, login_attr: &str) -> String {
        match self {
            Self::All => format!("({login_attr}=*)"),
            Self::Login(login) => format!("({login_attr}={})", ldap_escape(login.as_str())),
        }
    }
}

impl fmt::Display for SearchPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("*"),
            Self::Login(login) => f.write_str(login),
        }
    }
}
