use chrono::Utc;
use sqlx::SqlitePool;

use crate::errors::AppError;
use crate::matches::scorer::MatchScores;
use crate::models::match_result::MatchRow;

pub struct NewMatch<'a> {
    pub owner_id: i64,
    pub resume_id: i64,
    pub jd_id: i64,
    pub scores: MatchScores,
    pub feedback: &'a str,
}

pub async fn insert_match(pool: &SqlitePool, new: NewMatch<'_>) -> Result<MatchRow, AppError> {
    let NewMatch {
        owner_id,
        resume_id,
        jd_id,
        scores,
        feedback,
    } = new;

    Ok(sqlx::query_as::<_, MatchRow>(
        r#"
        INSERT INTO matches
            (match_percentage, skills_match, experience_match, education_match,
             overall_feedback, created_at, resume_id, jd_id, owner_id)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(scores.match_percentage)
    .bind(scores.skills_match)
    .bind(scores.experience_match)
    .bind(scores.education_match)
    .bind(feedback)
    .bind(Utc::now())
    .bind(resume_id)
    .bind(jd_id)
    .bind(owner_id)
    .fetch_one(pool)
    .await?)
}

/// Number of matches that reference a resume or job description column value.
pub async fn count_referencing(
    pool: &SqlitePool,
    column: ReferenceColumn,
    id: i64,
) -> Result<i64, AppError> {
    let sql = format!("SELECT COUNT(*) FROM matches WHERE {} = ?", column.as_str());
    Ok(sqlx::query_scalar(&sql).bind(id).fetch_one(pool).await?)
}

#[derive(Debug, Clone, Copy)]
pub enum ReferenceColumn {
    Resume,
    JobDescription,
}

impl ReferenceColumn {
    fn as_str(self) -> &'static str {
        match self {
            ReferenceColumn::Resume => "resume_id",
            ReferenceColumn::JobDescription => "jd_id",
        }
    }
}
