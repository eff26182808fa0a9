use std::borrow::Cow;
use std::fmt;

/// Relational engine behind an [`AnyPool`](sqlx::AnyPool).
///
/// The logical schema is the same for every dialect; only column types,
/// auto-increment syntax and bind placeholders differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// Embedded, file-backed engine.
    Sqlite,
    MySql,
    Postgres,
}

impl Dialect {
    /// Detect the dialect from a connection URL.
    pub fn from_url(url: &str) -> Option<Self> {
        if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            Some(Self::Postgres)
        } else if url.starts_with("mysql://") || url.starts_with("mariadb://") {
            Some(Self::MySql)
        } else if url.starts_with("sqlite:") {
            Some(Self::Sqlite)
        } else {
            None
        }
    }

    /// Detect the dialect from a configuration tag (`sqlite`, `mysql`, `pgsql`).
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.to_ascii_lowercase().as_str() {
            "sqlite" => Some(Self::Sqlite),
            "mysql" => Some(Self::MySql),
            "pgsql" | "postgres" | "postgresql" => Some(Self::Postgres),
            _ => None,
        }
    }

    /// Rewrite `?` placeholders into the form the engine expects.
    ///
    /// Statements in this crate are written once with `?`; PostgreSQL wants
    /// numbered `$n` parameters. Statements must not contain literal `?`.
    pub fn prepare(self, sql: &str) -> Cow<'_, str> {
        match self {
            Self::Sqlite | Self::MySql => Cow::Borrowed(sql),
            Self::Postgres => {
                let mut out = String::with_capacity(sql.len() + 8);
                let mut n = 0;
                for c in sql.chars() {
                    if c == '?' {
                        n += 1;
                        out.push('$');
                        out.push_str(&n.to_string());
                    } else {
                        out.push(c);
                    }
                }
                Cow::Owned(out)
            }
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Sqlite => "sqlite",
            Self::MySql => "mysql",
            Self::Postgres => "pgsql",
        })
    }
}
