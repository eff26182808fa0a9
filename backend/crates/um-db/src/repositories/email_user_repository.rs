use crate::{DbError, Dialect, Result as DbErrorResult};

use um_core::{EmailUser, ListRange, hash_password};

use chrono::Utc;
use error_location::ErrorLocation;
use log::debug;
use sqlx::any::AnyRow;
use sqlx::{AnyPool, Row};
use std::panic::Location;

// The Any driver rejects native boolean columns, so flags are read back as
// integers. Databases created with `bool` columns decode the same way.
fn user_columns(dialect: Dialect) -> String {
    let int = match dialect {
        Dialect::MySql => "SIGNED",
        Dialect::Sqlite | Dialect::Postgres => "INTEGER",
    };
    format!(
        "id, email, passwd, CAST(is_staff AS {int}) AS is_staff, \
         CAST(is_active AS {int}) AS is_active, ctime"
    )
}

/// CRUD and lookups on the `EmailUser` table.
///
/// Every value is bound as a parameter. No ordering is imposed on lists;
/// results follow storage order, which is stable for an unmodified table.
pub struct EmailUserRepository {
    pool: AnyPool,
    dialect: Dialect,
}

impl EmailUserRepository {
    pub fn new(pool: AnyPool, dialect: Dialect) -> Self {
        Self { pool, dialect }
    }

    /// `SELECT` over every user column followed by `tail`, with placeholders
    /// rewritten for the dialect.
    fn select(&self, tail: &str) -> String {
        let sql = format!("SELECT {} FROM EmailUser{tail}", user_columns(self.dialect));
        self.dialect.prepare(&sql).into_owned()
    }

    /// Insert a new user, storing the digest of `secret`.
    ///
    /// Fails with [`DbError::Conflict`] when the email is already taken.
    pub async fn add(
        &self,
        email: &str,
        secret: &str,
        is_staff: bool,
        is_active: bool,
    ) -> DbErrorResult<()> {
        let digest = hash_password(secret);
        let created_at = Utc::now().timestamp();
        let sql = self.dialect.prepare(
            "INSERT INTO EmailUser (email, passwd, is_staff, is_active, ctime) \
             VALUES (?, ?, ?, ?, ?)",
        );

        sqlx::query(&sql)
            .bind(email)
            .bind(&digest)
            .bind(is_staff)
            .bind(is_active)
            .bind(created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_unique_violation() => DbError::Conflict {
                    email: email.to_string(),
                    location: ErrorLocation::from(Location::caller()),
                },
                other => DbError::from(other),
            })?;

        debug!("Added user {email}");
        Ok(())
    }

    /// Delete by email. Deleting a missing email is not an error.
    pub async fn remove(&self, email: &str) -> DbErrorResult<bool> {
        let sql = self.dialect.prepare("DELETE FROM EmailUser WHERE email = ?");

        let result = sqlx::query(&sql).bind(email).execute(&self.pool).await?;

        Ok(result.rows_affected() > 0)
    }

    /// True iff a row exists with this email and the digest of `secret`.
    pub async fn validate(&self, email: &str, secret: &str) -> DbErrorResult<bool> {
        Ok(self
            .find_by_credentials(email, &hash_password(secret))
            .await?
            .is_some())
    }

    /// Look up a row matching both email and stored digest.
    pub async fn find_by_credentials(
        &self,
        email: &str,
        digest: &str,
    ) -> DbErrorResult<Option<EmailUser>> {
        let sql = self.select(" WHERE email = ? AND passwd = ?");

        let row = sqlx::query(&sql)
            .bind(email)
            .bind(digest)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(user_from_row).transpose()
    }

    pub async fn find_by_email(&self, email: &str) -> DbErrorResult<Option<EmailUser>> {
        let sql = self.select(" WHERE email = ?");

        let row = sqlx::query(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(user_from_row).transpose()
    }

    pub async fn find_by_id(&self, id: i64) -> DbErrorResult<Option<EmailUser>> {
        let sql = self.select(" WHERE id = ?");

        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(user_from_row).transpose()
    }

    /// List users, either the whole table or an offset/limit window.
    pub async fn list(&self, range: ListRange) -> DbErrorResult<Vec<EmailUser>> {
        let rows = match range {
            ListRange::All => {
                let sql = self.select("");
                sqlx::query(&sql).fetch_all(&self.pool).await?
            }
            ListRange::Window { offset, limit } => {
                let sql = self.select(" LIMIT ? OFFSET ?");
                sqlx::query(&sql)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        rows.iter().map(user_from_row).collect()
    }

    pub async fn count(&self) -> DbErrorResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM EmailUser")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Rewrite digest and flags for an id. A missing id is not an error.
    pub async fn update(
        &self,
        id: i64,
        secret: &str,
        is_staff: bool,
        is_active: bool,
    ) -> DbErrorResult<bool> {
        let digest = hash_password(secret);
        let sql = self.dialect.prepare(
            "UPDATE EmailUser SET passwd = ?, is_staff = ?, is_active = ? WHERE id = ?",
        );

        let result = sqlx::query(&sql)
            .bind(&digest)
            .bind(is_staff)
            .bind(is_active)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn user_from_row(row: &AnyRow) -> DbErrorResult<EmailUser> {
    Ok(EmailUser {
        id: int_column(row, "id")?,
        email: row.try_get("email")?,
        password_digest: row
            .try_get::<Option<String>, _>("passwd")?
            .map(|digest| digest.trim_end().to_string()),
        is_staff: int_column(row, "is_staff")? != 0,
        is_active: int_column(row, "is_active")? != 0,
        created_at: row.try_get::<Option<i64>, _>("ctime")?.unwrap_or(0),
    })
}

// PostgreSQL `SERIAL` and `CAST(.. AS INTEGER)` come back as 32-bit.
fn int_column(row: &AnyRow, column: &str) -> DbErrorResult<i64> {
    let value = row
        .try_get::<i64, _>(column)
        .or_else(|_| row.try_get::<i32, _>(column).map(i64::from))?;

    Ok(value)
}
