//! Meal image storage on the local filesystem
//!
//! Files live flat in one directory and are served under `/uploads/`.

use anyhow::{Context, Result};
use chrono::Utc;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];
const MAX_NAME_ATTEMPTS: u32 = 16;

/// Meal image store
#[derive(Debug, Clone)]
pub struct ImageStore {
    dir: PathBuf,
}

impl ImageStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the storage directory if needed
    pub async fn ensure_dir(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("Failed to create upload directory {}", self.dir.display()))
    }

    /// Write an uploaded image and return the stored filename
    ///
    /// Never overwrites: a name already on disk gets a numbered suffix.
    pub async fn save(&self, original_name: &str, bytes: &[u8]) -> Result<String> {
        self.ensure_dir().await?;

        let millis = Utc::now().timestamp_millis();
        for attempt in 0..MAX_NAME_ATTEMPTS {
            let name = stored_name(original_name, millis, attempt);
            let path = self.dir.join(&name);
            match write_new(&path, bytes).await {
                Ok(()) => {
                    info!(file = %name, size = bytes.len(), "Stored meal image");
                    return Ok(name);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => {
                    return Err(e).with_context(|| format!("Failed to write image {}", path.display()))
                }
            }
        }
        anyhow::bail!("No free file name for image {}", original_name)
    }

    /// Remove a stored image; a missing file is not an error
    pub async fn remove(&self, name: &str) {
        let path = self.dir.join(sanitize(name));
        match tokio::fs::remove_file(&path).await {
            Ok(()) => info!(file = %name, "Removed meal image"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!(file = %name, error = %e, "Failed to remove meal image"),
        }
    }
}

async fn write_new(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await?;
    file.write_all(bytes).await?;
    file.flush().await
}

/// `{unix_millis}-{sanitized original name}`, with `-{attempt}` after the
/// timestamp on retries
pub fn stored_name(original_name: &str, unix_millis: i64, attempt: u32) -> String {
    match attempt {
        0 => format!("{}-{}", unix_millis, sanitize(original_name)),
        n => format!("{}-{}-{}", unix_millis, n, sanitize(original_name)),
    }
}

/// Whether an upload is an image, judged by extension and declared type
pub fn is_image(file_name: &str, content_type: Option<&str>) -> bool {
    let known_extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.iter().any(|known| known.eq_ignore_ascii_case(ext)));
    let image_type = content_type.map_or(true, |ct| ct.starts_with("image/"));
    known_extension && image_type
}

/// Keep the final path component and only `[A-Za-z0-9._-]` from it
fn sanitize(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();

    if cleaned.trim_matches('.').is_empty() {
        "image".to_string()
    } else {
        cleaned
    }
}
