use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::Utc;
use rand::Rng;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

use super::{UploadKind, UploadedFile};
use crate::errors::AppError;

const MAX_NAME_ATTEMPTS: usize = 5;
const MAX_EXTENSION_LEN: usize = 10;

/// A file persisted under the upload root.
#[derive(Debug, Clone)]
pub struct StoredFile {
    /// Generated storage name, independent of the client's file name.
    pub filename: String,
    pub path: PathBuf,
    pub size: i64,
}

impl StoredFile {
    pub fn path_string(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }
}

/// Disk storage rooted at the configured upload directory.
#[derive(Debug, Clone)]
pub struct UploadStore {
    root: PathBuf,
}

impl UploadStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn dir_for(&self, kind: UploadKind) -> PathBuf {
        self.root.join(kind.dir_name())
    }

    /// Writes the bytes under a freshly generated name in the kind's directory.
    /// Existing files are never overwritten.
    pub async fn save(&self, kind: UploadKind, file: &UploadedFile) -> Result<StoredFile, AppError> {
        let dir = self.dir_for(kind);
        fs::create_dir_all(&dir).await?;

        for _ in 0..MAX_NAME_ATTEMPTS {
            let filename = generate_storage_name(&file.original_name);
            let path = dir.join(&filename);
            let mut handle = match OpenOptions::new().write(true).create_new(true).open(&path).await {
                Ok(handle) => handle,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            };

            let written = async {
                handle.write_all(&file.bytes).await?;
                handle.flush().await
            }
            .await;
            if let Err(e) = written {
                drop(handle);
                self.remove(&path).await;
                return Err(e.into());
            }

            info!("Stored upload {} ({} bytes)", path.display(), file.bytes.len());
            return Ok(StoredFile {
                filename,
                path,
                size: file.bytes.len() as i64,
            });
        }

        Err(AppError::Internal(anyhow::anyhow!(
            "could not find a free storage name in {}",
            dir.display()
        )))
    }

    /// Saves the file, then runs `record` with it. If `record` fails, the
    /// stored file is removed so no orphaned bytes remain.
    pub async fn store_then_record<T, F, Fut>(
        &self,
        kind: UploadKind,
        file: &UploadedFile,
        record: F,
    ) -> Result<T, AppError>
    where
        F: FnOnce(StoredFile) -> Fut,
        Fut: Future<Output = Result<T, AppError>>,
    {
        let stored = self.save(kind, file).await?;
        let path = stored.path.clone();
        match record(stored).await {
            Ok(value) => Ok(value),
            Err(e) => {
                self.remove(&path).await;
                Err(e)
            }
        }
    }

    /// Best-effort delete; failures are logged, not returned.
    pub async fn remove(&self, path: &Path) {
        match fs::remove_file(path).await {
            Ok(()) => info!("Removed upload {}", path.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to remove upload {}: {e}", path.display()),
        }
    }
}

/// `<unix millis>-<random 0..1e9><.ext>`. The client's name contributes only
/// its extension, and only when it is short and alphanumeric.
pub fn generate_storage_name(original: &str) -> String {
    let suffix: u32 = rand::thread_rng().gen_range(0..1_000_000_000);
    let ext = extension_of(original)
        .map(|e| format!(".{e}"))
        .unwrap_or_default();
    format!("{}-{}{}", Utc::now().timestamp_millis(), suffix, ext)
}

/// Lowercased extension, if it is safe to reuse in a storage name.
pub fn extension_of(name: &str) -> Option<String> {
    let ext = Path::new(name).extension()?.to_str()?;
    let valid = !ext.is_empty()
        && ext.len() <= MAX_EXTENSION_LEN
        && ext.chars().all(|c| c.is_ascii_alphanumeric());
    valid.then(|| ext.to_ascii_lowercase())
}
