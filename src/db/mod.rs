//! Storage seam shared by every registry.
//!
//! Each domain module declares its own repository trait in its `repo.rs` and
//! implements it for [`PgStore`]. Handlers only ever see `Arc<dyn Store>`.

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;

use crate::{
    auth::repo::UserRepo, categories::repo::CategoryRepo, comments::repo::CommentRepo,
    complaints::repo::ComplaintRepo, config::AppConfig, customers::repo::CustomerRepo,
};

#[cfg(test)]
pub mod memory;

/// Failure reported by a repository.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A unique index rejected the write (SQLSTATE 23505).
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),

    /// A referenced row does not exist (SQLSTATE 23503).
    #[error("foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),

    /// A value overflowed its column width (SQLSTATE 22001).
    #[error("value too long for column: {0}")]
    ValueTooLong(String),

    /// A stored value could not be mapped back onto a domain type.
    #[error("corrupt row: {0}")]
    Corrupt(String),

    #[error(transparent)]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error() {
            let constraint = db_err.constraint().unwrap_or_default().to_string();
            if db_err.is_unique_violation() {
                return StoreError::UniqueViolation(constraint);
            }
            if db_err.is_foreign_key_violation() {
                return StoreError::ForeignKeyViolation(constraint);
            }
            if db_err.code().as_deref() == Some("22001") {
                return StoreError::ValueTooLong(db_err.message().to_string());
            }
        }
        StoreError::Database(err)
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Width of the `VARCHAR(100)` name columns on `users` and `customers`.
pub const MAX_NAME_CHARS: usize = 100;

/// `true` when `name` fits a `VARCHAR(MAX_NAME_CHARS)` column.
pub fn name_fits(name: &str) -> bool {
    name.chars().count() <= MAX_NAME_CHARS
}

/// Everything the HTTP layer needs from persistence.
pub trait Store: UserRepo + CustomerRepo + CategoryRepo + ComplaintRepo + CommentRepo {}

impl<T> Store for T where T: UserRepo + CustomerRepo + CategoryRepo + ComplaintRepo + CommentRepo {}

/// Postgres-backed store. Cloning shares the pool.
#[derive(Clone)]
pub struct PgStore {
    pub(crate) pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(config: &AppConfig) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;
        Ok(Self::new(pool))
    }

    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("run migrations")?;
        Ok(())
    }
}
