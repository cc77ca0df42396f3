use chrono::Utc;
use sqlx::SqlitePool;

use crate::errors::AppError;
use crate::models::user::UserRow;

const DUPLICATE_USER: &str = "Email or username already exists";

/// Inserts a new user. Fails with `Conflict` if the email or username is taken.
pub async fn create_user(
    pool: &SqlitePool,
    email: &str,
    username: &str,
    hashed_password: &str,
) -> Result<UserRow, AppError> {
    let taken: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM users WHERE email = ? OR username = ?)",
    )
    .bind(email)
    .bind(username)
    .fetch_one(pool)
    .await?;
    if taken {
        return Err(AppError::Conflict(DUPLICATE_USER.to_string()));
    }

    // The UNIQUE constraints still decide a race between two registrations.
    sqlx::query_as::<_, UserRow>(
        r#"
        INSERT INTO users (email, username, hashed_password, is_active, created_at)
        VALUES (?, ?, ?, 1, ?)
        RETURNING *
        "#,
    )
    .bind(email)
    .bind(username)
    .bind(hashed_password)
    .bind(Utc::now())
    .fetch_one(pool)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::Conflict(DUPLICATE_USER.to_string())
        }
        other => AppError::Database(other),
    })
}

pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<UserRow>, AppError> {
    Ok(
        sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(pool)
            .await?,
    )
}
