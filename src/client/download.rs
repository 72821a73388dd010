use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::{
    client::submitter::SubmitterClient,
    error::{GatewayError, Result},
};

/// Derives the save name from the prompt: its first 20 characters with every
/// non-alphanumeric replaced by `_`, stamped to avoid collisions.
pub fn download_file_name(prompt: &str, stamp_millis: i64) -> String {
    let sanitized: String = prompt
        .chars()
        .take(20)
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();

    format!("generated-{}-{}.jpg", sanitized, stamp_millis)
}

impl SubmitterClient {
    /// Saves the displayed reference into `dir` under the derived file name.
    /// A remote URL is fetched into a transient buffer that lives only for
    /// the write; a failure here never touches the displayed image.
    pub async fn download_to(
        &self,
        reference: &str,
        prompt: &str,
        dir: &Path,
    ) -> Result<PathBuf> {
        let bytes = self
            .fetch_image_bytes(reference)
            .await
            .map_err(|e| GatewayError::DownloadError(e.to_string()))?;

        let path = dir.join(download_file_name(prompt, Utc::now().timestamp_millis()));

        std::fs::write(&path, &bytes).map_err(|e| GatewayError::DownloadError(e.to_string()))?;

        log::info!("Saved image to {}", path.display());
        Ok(path)
    }
}
