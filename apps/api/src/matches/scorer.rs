//! Match scoring — pluggable, trait-based scorer behind `Arc<dyn MatchScorer>`.
//!
//! Default: `RandomMatchScorer`, which ignores document content and draws each
//! score independently from a uniform distribution over [0, 100).

use async_trait::async_trait;
use rand::Rng;

use crate::errors::AppError;
use crate::models::job_description::JobDescriptionRow;
use crate::models::resume::ResumeRow;

/// The four percentages stored on a match, each in [0, 100).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchScores {
    pub match_percentage: f64,
    pub skills_match: f64,
    pub experience_match: f64,
    pub education_match: f64,
}

/// The scorer trait. Implement this to swap backends without touching
/// the handler or the repository.
#[async_trait]
pub trait MatchScorer: Send + Sync {
    async fn score(
        &self,
        resume: &ResumeRow,
        job_description: &JobDescriptionRow,
    ) -> Result<MatchScores, AppError>;

    /// Free-text feedback stored alongside the scores.
    fn feedback(&self, resume_id: i64, jd_id: i64, scores: &MatchScores) -> String {
        format!(
            "This is a mock match analysis. Resume {resume_id} matches Job Description {jd_id} with {:.1}% compatibility.",
            scores.match_percentage
        )
    }
}

/// Content-blind scorer: four independent uniform draws.
pub struct RandomMatchScorer;

#[async_trait]
impl MatchScorer for RandomMatchScorer {
    async fn score(
        &self,
        _resume: &ResumeRow,
        _job_description: &JobDescriptionRow,
    ) -> Result<MatchScores, AppError> {
        let mut rng = rand::thread_rng();
        Ok(MatchScores {
            match_percentage: rng.gen_range(0.0..100.0),
            skills_match: rng.gen_range(0.0..100.0),
            experience_match: rng.gen_range(0.0..100.0),
            education_match: rng.gen_range(0.0..100.0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn resume() -> ResumeRow {
        ResumeRow {
            id: 1,
            filename: "1-1.pdf".to_string(),
            original_filename: "cv.pdf".to_string(),
            file_path: "uploads/resumes/1-1.pdf".to_string(),
            file_size: 10,
            content: "File uploaded: cv.pdf".to_string(),
            summary: None,
            skills: None,
            experience_years: None,
            education: None,
            jade_format: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            owner_id: 1,
        }
    }

    fn job_description() -> JobDescriptionRow {
        JobDescriptionRow {
            id: 2,
            filename: "1-2.txt".to_string(),
            original_filename: "jd.txt".to_string(),
            file_path: "uploads/jds/1-2.txt".to_string(),
            file_size: 10,
            content: "Job description uploaded: jd.txt".to_string(),
            title: None,
            company: None,
            location: None,
            required_skills: None,
            preferred_skills: None,
            experience_required: None,
            education_required: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            owner_id: 1,
        }
    }

    #[tokio::test]
    async fn test_random_scores_in_range() {
        let (r, j) = (resume(), job_description());
        for _ in 0..500 {
            let s = RandomMatchScorer.score(&r, &j).await.unwrap();
            for v in [s.match_percentage, s.skills_match, s.experience_match, s.education_match] {
                assert!((0.0..100.0).contains(&v), "score {v} out of range");
            }
        }
    }

    #[tokio::test]
    async fn test_random_scores_vary() {
        let (r, j) = (resume(), job_description());
        let a = RandomMatchScorer.score(&r, &j).await.unwrap();
        let b = RandomMatchScorer.score(&r, &j).await.unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_feedback_template() {
        let scores = MatchScores {
            match_percentage: 73.456,
            skills_match: 1.0,
            experience_match: 2.0,
            education_match: 3.0,
        };
        assert_eq!(
            RandomMatchScorer.feedback(4, 9, &scores),
            "This is a mock match analysis. Resume 4 matches Job Description 9 with 73.5% compatibility."
        );
    }
}
