use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::extract::{AppJson, AppPath};
use crate::matches::store::{insert_match, NewMatch};
use crate::models::job_description::JobDescriptionRow;
use crate::models::match_result::MatchRow;
use crate::models::resume::ResumeRow;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateMatchRequest {
    pub resume_id: i64,
    pub jd_id: i64,
}

/// POST /matches
///
/// Both documents must belong to the caller; otherwise 404.
pub async fn handle_create_match(
    State(state): State<AppState>,
    user: AuthUser,
    AppJson(req): AppJson<CreateMatchRequest>,
) -> Result<(StatusCode, Json<MatchRow>), AppError> {
    let scope = user.scope(&state);
    let resume: ResumeRow = scope.get(req.resume_id).await?;
    let job_description: JobDescriptionRow = scope.get(req.jd_id).await?;

    let scores = state.match_scorer.score(&resume, &job_description).await?;
    let feedback = state.match_scorer.feedback(resume.id, job_description.id, &scores);

    let row = insert_match(
        &state.db,
        NewMatch {
            owner_id: user.id,
            resume_id: resume.id,
            jd_id: job_description.id,
            scores,
            feedback: &feedback,
        },
    )
    .await?;
    info!(user_id = user.id, match_id = row.id, "Created match");

    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /matches
pub async fn handle_list_matches(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<MatchRow>>, AppError> {
    Ok(Json(user.scope(&state).list().await?))
}

/// GET /matches/:id
pub async fn handle_get_match(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<i64>,
) -> Result<Json<MatchRow>, AppError> {
    Ok(Json(user.scope(&state).get(id).await?))
}

/// DELETE /matches/:id
pub async fn handle_delete_match(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<i64>,
) -> Result<StatusCode, AppError> {
    let deleted: MatchRow = user.scope(&state).delete(id).await?;
    info!(user_id = user.id, match_id = deleted.id, "Deleted match");
    Ok(StatusCode::NO_CONTENT)
}
