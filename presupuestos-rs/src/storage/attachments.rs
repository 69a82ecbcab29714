use crate::error::{LedgerError, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;
use uuid::Uuid;

/// Stores uploaded quote documents under a base directory.
///
/// Client filenames are never used as-is: path components are stripped and
/// the stored name carries a generated prefix, so two uploads with the same
/// name cannot collide.
#[derive(Clone)]
pub struct AttachmentStorage {
    base_path: PathBuf,
}

impl AttachmentStorage {
    pub fn new(base_path: String) -> Self {
        Self {
            base_path: PathBuf::from(base_path),
        }
    }

    /// Store an uploaded document and return the filename it was saved under
    pub async fn store(&self, client_name: &str, data: &[u8]) -> Result<String> {
        self.ensure_base_dir().await?;

        let filename = generate_filename(client_name);
        let tmp_path = self.base_path.join(format!(".{}.tmp", filename));
        let final_path = self.base_path.join(&filename);

        // Write to a temp name first, then rename into place
        fs::write(&tmp_path, data).await?;
        fs::rename(&tmp_path, &final_path).await?;

        info!("Stored attachment as {}", final_path.display());

        Ok(filename)
    }

    /// Absolute path of a stored attachment
    pub fn path_of(&self, filename: &str) -> PathBuf {
        self.base_path.join(filename)
    }

    async fn ensure_base_dir(&self) -> Result<()> {
        if !self.base_path.exists() {
            fs::create_dir_all(&self.base_path).await.map_err(|e| {
                LedgerError::Storage(format!(
                    "Failed to create directory {:?}: {}",
                    self.base_path, e
                ))
            })?;
        }
        Ok(())
    }
}

/// Build a collision-free stored name from the client filename
fn generate_filename(client_name: &str) -> String {
    let sanitized = sanitize_filename(client_name);
    format!("{}_{}", Uuid::new_v4().simple(), sanitized)
}

/// Strip path components and drop characters that have no business in a
/// filename. An empty or fully-stripped name falls back to "adjunto".
fn sanitize_filename(client_name: &str) -> String {
    let base = Path::new(client_name)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let cleaned: String = base
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .collect();

    let cleaned = cleaned.trim_matches('.').to_string();
    if cleaned.is_empty() {
        "adjunto".to_string()
    } else {
        cleaned
    }
}
