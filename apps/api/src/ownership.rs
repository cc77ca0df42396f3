//! Owner-scoped record access.
//!
//! Every read or delete of a user-owned row goes through this module so the
//! `owner_id` filter is applied in one place. A row owned by someone else is
//! indistinguishable from a row that does not exist.

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, SqlitePool};

use crate::errors::AppError;
use crate::models::job_description::JobDescriptionRow;
use crate::models::match_result::MatchRow;
use crate::models::resume::ResumeRow;
use crate::models::template::TemplateRow;

/// A row type stored in a table with an `owner_id` column.
pub trait OwnedRecord: for<'r> FromRow<'r, SqliteRow> + Send + Unpin {
    const TABLE: &'static str;
    /// Human-readable name used in not-found messages.
    const NAME: &'static str;

    fn not_found() -> AppError {
        AppError::NotFound(format!("{} not found", Self::NAME))
    }

    fn still_referenced() -> AppError {
        AppError::Conflict(format!("{} is referenced by existing matches", Self::NAME))
    }
}

impl OwnedRecord for ResumeRow {
    const TABLE: &'static str = "resumes";
    const NAME: &'static str = "Resume";
}

impl OwnedRecord for JobDescriptionRow {
    const TABLE: &'static str = "job_descriptions";
    const NAME: &'static str = "Job description";
}

impl OwnedRecord for MatchRow {
    const TABLE: &'static str = "matches";
    const NAME: &'static str = "Match";
}

impl OwnedRecord for TemplateRow {
    const TABLE: &'static str = "jade_templates";
    const NAME: &'static str = "Jade template";
}

/// The caller's view of the database: every query is filtered to one owner.
#[derive(Clone, Copy)]
pub struct Scoped<'a> {
    pool: &'a SqlitePool,
    owner_id: i64,
}

impl<'a> Scoped<'a> {
    pub fn new(pool: &'a SqlitePool, owner_id: i64) -> Self {
        Self { pool, owner_id }
    }

    /// All rows owned by the caller, in insertion order.
    pub async fn list<T: OwnedRecord>(&self) -> Result<Vec<T>, AppError> {
        let sql = format!("SELECT * FROM {} WHERE owner_id = ? ORDER BY id ASC", T::TABLE);
        Ok(sqlx::query_as::<_, T>(&sql)
            .bind(self.owner_id)
            .fetch_all(self.pool)
            .await?)
    }

    /// One row by id, or `NotFound` if it is absent or owned by someone else.
    pub async fn get<T: OwnedRecord>(&self, id: i64) -> Result<T, AppError> {
        let sql = format!("SELECT * FROM {} WHERE id = ? AND owner_id = ?", T::TABLE);
        sqlx::query_as::<_, T>(&sql)
            .bind(id)
            .bind(self.owner_id)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(T::not_found)
    }

    /// Deletes one row and returns it, or `NotFound`.
    /// A row that other rows still point at is refused with `Conflict`.
    pub async fn delete<T: OwnedRecord>(&self, id: i64) -> Result<T, AppError> {
        let sql = format!(
            "DELETE FROM {} WHERE id = ? AND owner_id = ? RETURNING *",
            T::TABLE
        );
        sqlx::query_as::<_, T>(&sql)
            .bind(id)
            .bind(self.owner_id)
            .fetch_optional(self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(db) if db.is_foreign_key_violation() => T::still_referenced(),
                other => AppError::Database(other),
            })?
            .ok_or_else(T::not_found)
    }
}
