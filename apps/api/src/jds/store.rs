use chrono::Utc;
use sqlx::SqlitePool;

use crate::errors::AppError;
use crate::models::job_description::JobDescriptionRow;
use crate::uploads::StoredFile;

/// Inserts a job description row for a stored upload. Only the title and
/// content placeholders are filled; the requirement columns stay empty.
pub async fn insert_job_description(
    pool: &SqlitePool,
    owner_id: i64,
    original_filename: &str,
    stored: &StoredFile,
) -> Result<JobDescriptionRow, AppError> {
    let now = Utc::now();
    Ok(sqlx::query_as::<_, JobDescriptionRow>(
        r#"
        INSERT INTO job_descriptions
            (filename, original_filename, file_path, file_size, content, title,
             created_at, updated_at, owner_id)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(&stored.filename)
    .bind(original_filename)
    .bind(stored.path_string())
    .bind(stored.size)
    .bind(format!("Job description uploaded: {original_filename}"))
    .bind(format!("Job Title from {original_filename}"))
    .bind(now)
    .bind(now)
    .bind(owner_id)
    .fetch_one(pool)
    .await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    #[tokio::test]
    async fn test_insert_fills_title_and_content() {
        let pool = test_pool().await;
        let owner: i64 = sqlx::query_scalar(
            "INSERT INTO users (email, username, hashed_password) VALUES ('a@x.com', 'a', 'h') RETURNING id",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        let stored = StoredFile {
            filename: "1-1.txt".to_string(),
            path: "uploads/jds/1-1.txt".into(),
            size: 12,
        };

        let row = insert_job_description(&pool, owner, "backend.txt", &stored)
            .await
            .unwrap();
        assert_eq!(row.content, "Job description uploaded: backend.txt");
        assert_eq!(row.title.as_deref(), Some("Job Title from backend.txt"));
        assert_eq!(row.file_path, "uploads/jds/1-1.txt");
        assert!(row.company.is_none() && row.required_skills.is_none());
    }

    #[tokio::test]
    async fn test_unknown_owner_rejected_by_foreign_key() {
        let pool = test_pool().await;
        let stored = StoredFile {
            filename: "1-1.txt".to_string(),
            path: "uploads/jds/1-1.txt".into(),
            size: 12,
        };
        let err = insert_job_description(&pool, 404, "x.txt", &stored).await.unwrap_err();
        assert!(matches!(err, AppError::Database(_)));
    }
}
