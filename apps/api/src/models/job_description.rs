use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobDescriptionRow {
    pub id: i64,
    pub filename: String,
    pub original_filename: String,
    #[serde(skip_serializing, default)]
    pub file_path: String,
    pub file_size: i64,
    pub content: String,
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub required_skills: Option<String>,
    pub preferred_skills: Option<String>,
    pub experience_required: Option<f64>,
    pub education_required: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub owner_id: i64,
}
