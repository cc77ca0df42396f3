use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use tracing::info;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::extract::{AppMultipart, AppPath};
use crate::jds::store::insert_job_description;
use crate::matches::store::{count_referencing, ReferenceColumn};
use crate::models::job_description::JobDescriptionRow;
use crate::ownership::OwnedRecord;
use crate::state::AppState;
use crate::uploads::{read_file_field, UploadKind};

/// POST /jds/upload
pub async fn handle_upload_jd(
    State(state): State<AppState>,
    user: AuthUser,
    AppMultipart(mut multipart): AppMultipart,
) -> Result<(StatusCode, Json<JobDescriptionRow>), AppError> {
    let file = read_file_field(&mut multipart).await?;
    UploadKind::JobDescription.validate(&file, state.config.max_upload_bytes)?;

    let (db, original) = (&state.db, file.original_name.as_str());
    let row = state
        .uploads
        .store_then_record(UploadKind::JobDescription, &file, move |stored| async move {
            insert_job_description(db, user.id, original, &stored).await
        })
        .await?;
    info!(user_id = user.id, jd_id = row.id, "Uploaded job description {}", row.original_filename);

    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /jds
pub async fn handle_list_jds(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<JobDescriptionRow>>, AppError> {
    Ok(Json(user.scope(&state).list().await?))
}

/// GET /jds/:id
pub async fn handle_get_jd(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<i64>,
) -> Result<Json<JobDescriptionRow>, AppError> {
    Ok(Json(user.scope(&state).get(id).await?))
}

/// DELETE /jds/:id
pub async fn handle_delete_jd(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<i64>,
) -> Result<StatusCode, AppError> {
    let scope = user.scope(&state);
    let jd: JobDescriptionRow = scope.get(id).await?;
    if count_referencing(&state.db, ReferenceColumn::JobDescription, jd.id).await? > 0 {
        return Err(JobDescriptionRow::still_referenced());
    }

    let deleted: JobDescriptionRow = scope.delete(id).await?;
    state.uploads.remove(std::path::Path::new(&deleted.file_path)).await;
    info!(user_id = user.id, jd_id = id, "Deleted job description");
    Ok(StatusCode::NO_CONTENT)
}
