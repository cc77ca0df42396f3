//! File uploads: multipart intake, validation, and on-disk storage.

pub mod multipart;
pub mod store;

pub use multipart::{read_file_field, UploadedFile};
pub use store::{StoredFile, UploadStore};

use crate::errors::AppError;

/// The three kinds of document users upload. Each kind has its own
/// subdirectory under the upload root and its own extension allowlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Resume,
    JobDescription,
    Template,
}

impl UploadKind {
    pub fn dir_name(self) -> &'static str {
        match self {
            UploadKind::Resume => "resumes",
            UploadKind::JobDescription => "jds",
            UploadKind::Template => "jade_templates",
        }
    }

    pub fn allowed_extensions(self) -> &'static [&'static str] {
        match self {
            UploadKind::Resume => &["pdf", "doc", "docx"],
            UploadKind::JobDescription => &["pdf", "doc", "docx", "txt"],
            UploadKind::Template => &["txt", "md", "json"],
        }
    }

    /// Checks size and extension. Content is not inspected.
    pub fn validate(self, file: &UploadedFile, max_bytes: usize) -> Result<(), AppError> {
        if file.bytes.is_empty() {
            return Err(AppError::Validation("Uploaded file is empty".to_string()));
        }
        if file.bytes.len() > max_bytes {
            return Err(AppError::Validation(format!(
                "File exceeds the {max_bytes} byte upload limit"
            )));
        }
        let allowed = self.allowed_extensions();
        match store::extension_of(&file.original_name) {
            Some(ext) if allowed.contains(&ext.as_str()) => Ok(()),
            _ => Err(AppError::Validation(format!(
                "Only {} files are allowed",
                allowed
                    .iter()
                    .map(|e| e.to_uppercase())
                    .collect::<Vec<_>>()
                    .join(", ")
            ))),
        }
    }
}
