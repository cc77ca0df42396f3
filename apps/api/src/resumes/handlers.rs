use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use tracing::info;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::extract::{AppMultipart, AppPath};
use crate::matches::store::{count_referencing, ReferenceColumn};
use crate::models::resume::ResumeRow;
use crate::ownership::OwnedRecord;
use crate::resumes::store::insert_resume;
use crate::state::AppState;
use crate::uploads::{read_file_field, UploadKind};

/// POST /resumes/upload
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    user: AuthUser,
    AppMultipart(mut multipart): AppMultipart,
) -> Result<(StatusCode, Json<ResumeRow>), AppError> {
    let file = read_file_field(&mut multipart).await?;
    UploadKind::Resume.validate(&file, state.config.max_upload_bytes)?;

    let (db, original) = (&state.db, file.original_name.as_str());
    let row = state
        .uploads
        .store_then_record(UploadKind::Resume, &file, move |stored| async move {
            insert_resume(db, user.id, original, &stored).await
        })
        .await?;
    info!(user_id = user.id, resume_id = row.id, "Uploaded resume {}", row.original_filename);

    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /resumes
pub async fn handle_list_resumes(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<ResumeRow>>, AppError> {
    Ok(Json(user.scope(&state).list().await?))
}

/// GET /resumes/:id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<i64>,
) -> Result<Json<ResumeRow>, AppError> {
    Ok(Json(user.scope(&state).get(id).await?))
}

/// DELETE /resumes/:id
///
/// Refused while any match still references the resume.
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<i64>,
) -> Result<StatusCode, AppError> {
    let scope = user.scope(&state);
    let resume: ResumeRow = scope.get(id).await?;
    if count_referencing(&state.db, ReferenceColumn::Resume, resume.id).await? > 0 {
        return Err(ResumeRow::still_referenced());
    }

    let deleted: ResumeRow = scope.delete(id).await?;
    state.uploads.remove(std::path::Path::new(&deleted.file_path)).await;
    info!(user_id = user.id, resume_id = id, "Deleted resume");
    Ok(StatusCode::NO_CONTENT)
}
