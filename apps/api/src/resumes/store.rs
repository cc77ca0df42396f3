use chrono::Utc;
use sqlx::SqlitePool;

use crate::errors::AppError;
use crate::models::resume::ResumeRow;
use crate::uploads::StoredFile;

/// Inserts a resume row for a stored upload. Derived fields are placeholders;
/// no text is extracted from the document.
pub async fn insert_resume(
    pool: &SqlitePool,
    owner_id: i64,
    original_filename: &str,
    stored: &StoredFile,
) -> Result<ResumeRow, AppError> {
    let now = Utc::now();
    Ok(sqlx::query_as::<_, ResumeRow>(
        r#"
        INSERT INTO resumes
            (filename, original_filename, file_path, file_size, content, summary,
             created_at, updated_at, owner_id)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(&stored.filename)
    .bind(original_filename)
    .bind(stored.path_string())
    .bind(stored.size)
    .bind(format!("File uploaded: {original_filename}"))
    .bind(format!("Resume summary for {original_filename}"))
    .bind(now)
    .bind(now)
    .bind(owner_id)
    .fetch_one(pool)
    .await?)
}

/// Stores converted text on the resume and bumps `updated_at`.
pub async fn set_jade_format(
    pool: &SqlitePool,
    resume_id: i64,
    owner_id: i64,
    jade_format: &str,
) -> Result<ResumeRow, AppError> {
    sqlx::query_as::<_, ResumeRow>(
        r#"
        UPDATE resumes SET jade_format = ?, updated_at = ?
        WHERE id = ? AND owner_id = ?
        RETURNING *
        "#,
    )
    .bind(jade_format)
    .bind(Utc::now())
    .bind(resume_id)
    .bind(owner_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Resume not found".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;
    use std::path::PathBuf;

    async fn user(pool: &SqlitePool) -> i64 {
        sqlx::query_scalar(
            "INSERT INTO users (email, username, hashed_password) VALUES ('a@x.com', 'a', 'h') RETURNING id",
        )
        .fetch_one(pool)
        .await
        .unwrap()
    }

    fn stored() -> StoredFile {
        StoredFile {
            filename: "1700000000000-42.pdf".to_string(),
            path: PathBuf::from("uploads/resumes/1700000000000-42.pdf"),
            size: 2048,
        }
    }

    #[tokio::test]
    async fn test_insert_fills_placeholders() {
        let pool = test_pool().await;
        let owner = user(&pool).await;
        let row = insert_resume(&pool, owner, "cv.pdf", &stored()).await.unwrap();

        assert!(row.id > 0);
        assert_eq!(row.owner_id, owner);
        assert_eq!(row.filename, "1700000000000-42.pdf");
        assert_eq!(row.original_filename, "cv.pdf");
        assert_eq!(row.file_size, 2048);
        assert_eq!(row.content, "File uploaded: cv.pdf");
        assert_eq!(row.summary.as_deref(), Some("Resume summary for cv.pdf"));
        assert!(row.skills.is_none() && row.education.is_none() && row.jade_format.is_none());
    }

    #[tokio::test]
    async fn test_set_jade_format_is_owner_scoped() {
        let pool = test_pool().await;
        let owner = user(&pool).await;
        let row = insert_resume(&pool, owner, "cv.pdf", &stored()).await.unwrap();

        assert!(set_jade_format(&pool, row.id, owner + 1, "x").await.is_err());
        let updated = set_jade_format(&pool, row.id, owner, "JADE").await.unwrap();
        assert_eq!(updated.jade_format.as_deref(), Some("JADE"));
        assert!(updated.updated_at >= row.updated_at);
    }
}
