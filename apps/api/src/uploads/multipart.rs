use std::path::Path;

use axum::extract::Multipart;
use bytes::Bytes;

use crate::errors::AppError;

/// Name of the multipart field carrying the uploaded document.
pub const FILE_FIELD: &str = "file";

#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Client-supplied name, reduced to its final path component.
    pub original_name: String,
    pub bytes: Bytes,
}

/// Reads the `file` field from a multipart body. Other fields are ignored.
pub async fn read_file_field(multipart: &mut Multipart) -> Result<UploadedFile, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {}", e.body_text())))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let original_name = field
            .file_name()
            .map(base_name)
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "upload".to_string());
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {}", e.body_text())))?;
        return Ok(UploadedFile {
            original_name,
            bytes,
        });
    }
    Err(AppError::Validation("No file uploaded".to_string()))
}

/// Final path component of a client-supplied name; handles both separators.
fn base_name(name: &str) -> String {
    let last = name.rsplit(['/', '\\']).next().unwrap_or(name);
    Path::new(last)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
