//! Table setup for the user store.
//!
//! `EmailUser` holds natively managed users; `Binding` maps an email to a
//! peer id and is owned by the peer subsystem. Every statement is
//! `IF NOT EXISTS`, so [`ensure_schema`] runs on every startup.
//!
//! Column names `passwd` and `ctime` match user databases created by
//! earlier releases.

use crate::{DbError, Dialect, Result as DbErrorResult};

use error_location::ErrorLocation;
use log::debug;
use sqlx::AnyPool;
use std::panic::Location;

const SQLITE_SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS EmailUser (\
        id INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT, \
        email TEXT NOT NULL, \
        passwd TEXT NOT NULL, \
        is_staff BOOLEAN NOT NULL, \
        is_active BOOLEAN NOT NULL, \
        ctime INTEGER)",
    "CREATE UNIQUE INDEX IF NOT EXISTS email_index ON EmailUser (email)",
    "CREATE TABLE IF NOT EXISTS Binding (email TEXT, peer_id TEXT)",
    "CREATE UNIQUE INDEX IF NOT EXISTS binding_email_index ON Binding (email)",
    "CREATE UNIQUE INDEX IF NOT EXISTS peer_index ON Binding (peer_id)",
];

const MYSQL_SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS EmailUser (\
        id BIGINT NOT NULL PRIMARY KEY AUTO_INCREMENT, \
        email VARCHAR(255) NOT NULL, \
        passwd CHAR(41) NOT NULL, \
        is_staff BOOL NOT NULL, \
        is_active BOOL NOT NULL, \
        ctime BIGINT, \
        UNIQUE INDEX (email)) ENGINE=INNODB",
    "CREATE TABLE IF NOT EXISTS Binding (\
        email VARCHAR(255), \
        peer_id CHAR(41), \
        UNIQUE INDEX (email), \
        UNIQUE INDEX (peer_id)) ENGINE=INNODB",
];

const POSTGRES_SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS EmailUser (\
        id BIGSERIAL PRIMARY KEY, \
        email VARCHAR(255) NOT NULL, \
        passwd VARCHAR(41) NOT NULL, \
        is_staff BOOL NOT NULL, \
        is_active BOOL NOT NULL, \
        ctime BIGINT, \
        UNIQUE (email))",
    "CREATE TABLE IF NOT EXISTS Binding (\
        email VARCHAR(255), \
        peer_id CHAR(41), \
        UNIQUE (email), \
        UNIQUE (peer_id))",
];

/// DDL statements for a dialect, in execution order.
pub fn schema_statements(dialect: Dialect) -> &'static [&'static str] {
    match dialect {
        Dialect::Sqlite => SQLITE_SCHEMA,
        Dialect::MySql => MYSQL_SCHEMA,
        Dialect::Postgres => POSTGRES_SCHEMA,
    }
}

/// Create the user tables and indexes if they are missing.
///
/// The first failing statement aborts; callers treat that as fatal.
pub async fn ensure_schema(pool: &AnyPool, dialect: Dialect) -> DbErrorResult<()> {
    for &statement in schema_statements(dialect) {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| DbError::Schema {
                message: format!("{dialect} statement failed: {statement}"),
                source: e,
                location: ErrorLocation::from(Location::caller()),
            })?;
    }

    debug!("User schema ready ({dialect})");
    Ok(())
}
