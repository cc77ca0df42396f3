use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use tracing::info;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::extract::{AppMultipart, AppPath};
use crate::models::resume::ResumeRow;
use crate::models::template::TemplateRow;
use crate::resumes::store::set_jade_format;
use crate::state::AppState;
use crate::templates::convert::{render_jade, ConversionResponse};
use crate::templates::store::{find_active, insert_template, set_active};
use crate::uploads::{read_file_field, UploadKind};

/// POST /jade/upload
pub async fn handle_upload_template(
    State(state): State<AppState>,
    user: AuthUser,
    AppMultipart(mut multipart): AppMultipart,
) -> Result<(StatusCode, Json<TemplateRow>), AppError> {
    let file = read_file_field(&mut multipart).await?;
    UploadKind::Template.validate(&file, state.config.max_upload_bytes)?;
    let content = std::str::from_utf8(&file.bytes)
        .map_err(|_| AppError::Validation("Template must be UTF-8 text".to_string()))?;

    let (db, original) = (&state.db, file.original_name.as_str());
    let row = state
        .uploads
        .store_then_record(UploadKind::Template, &file, move |stored| async move {
            insert_template(db, user.id, original, &stored, content).await
        })
        .await?;
    info!(user_id = user.id, template_id = row.id, "Uploaded template {}", row.name);

    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /jade/templates
pub async fn handle_list_templates(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<TemplateRow>>, AppError> {
    Ok(Json(user.scope(&state).list().await?))
}

/// PUT /jade/templates/:id/activate
pub async fn handle_activate_template(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<i64>,
) -> Result<Json<TemplateRow>, AppError> {
    Ok(Json(set_active(&state.db, id, user.id).await?))
}

/// DELETE /jade/templates/:id
pub async fn handle_delete_template(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(id): AppPath<i64>,
) -> Result<StatusCode, AppError> {
    let deleted: TemplateRow = user.scope(&state).delete(id).await?;
    state.uploads.remove(std::path::Path::new(&deleted.file_path)).await;
    info!(user_id = user.id, template_id = id, "Deleted template");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /jade/convert/:resume_id
pub async fn handle_convert_resume(
    State(state): State<AppState>,
    user: AuthUser,
    AppPath(resume_id): AppPath<i64>,
) -> Result<Json<ConversionResponse>, AppError> {
    let resume: ResumeRow = user.scope(&state).get(resume_id).await?;
    let template = find_active(&state.db, user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("No active Jade template found".to_string()))?;

    let jade_format = render_jade(&resume, &template);
    set_jade_format(&state.db, resume.id, user.id, &jade_format).await?;
    info!(user_id = user.id, resume_id, template_id = template.id, "Converted resume");

    Ok(Json(ConversionResponse {
        resume_id,
        jade_format,
        template_used: template.name,
        conversion_successful: true,
    }))
}
