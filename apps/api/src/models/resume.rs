use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeRow {
    pub id: i64,
    pub filename: String,
    pub original_filename: String,
    #[serde(skip_serializing, default)]
    pub file_path: String,
    pub file_size: i64,
    pub content: String,
    pub summary: Option<String>,
    pub skills: Option<String>,
    pub experience_years: Option<f64>,
    pub education: Option<String>,
    pub jade_format: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub owner_id: i64,
}
