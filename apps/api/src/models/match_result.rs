use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A scored pairing of one resume and one job description.
/// `strengths`, `weaknesses` and `recommendations` hold JSON-encoded lists when present.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MatchRow {
    pub id: i64,
    pub match_percentage: f64,
    pub skills_match: Option<f64>,
    pub experience_match: Option<f64>,
    pub education_match: Option<f64>,
    pub overall_feedback: Option<String>,
    pub strengths: Option<String>,
    pub weaknesses: Option<String>,
    pub recommendations: Option<String>,
    pub created_at: DateTime<Utc>,
    pub resume_id: i64,
    pub jd_id: i64,
    pub owner_id: i64,
}
