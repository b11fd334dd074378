// Spool files for multipart uploads
//
// Upload bodies are streamed to a file under the media temp dir before
// the backend sees them. TempUpload removes that file on drop, which
// covers the success path and every early return alike.

use crate::api::common::{ApiError, ApiResult};
use axum::extract::multipart::{Field, MultipartError};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

/// Map a multipart parse failure to a 400
pub fn multipart_error(err: MultipartError) -> ApiError {
    ApiError::bad_request(format!("Malformed multipart body: {err}"))
}

/// Read a text field of a multipart body
pub async fn field_text(field: Field<'_>) -> ApiResult<String> {
    field.text().await.map_err(multipart_error)
}

/// Spooled multipart field, removed from disk on drop
#[derive(Debug)]
pub struct TempUpload {
    path: PathBuf,
}

impl TempUpload {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempUpload {
    fn drop(&mut self) {
        if let Err(err) = std::fs::remove_file(&self.path) {
            if err.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %err,
                    "failed to remove spooled upload"
                );
            }
        }
    }
}

fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/webp" => "webp",
        "video/mp4" => "mp4",
        "video/quicktime" => "mov",
        _ => "bin",
    }
}

/// Stream a multipart field into a spool file under `temp_dir`.
///
/// The content type must be in `allowed_types` and the body must stay
/// within `max_bytes`; the size cap is enforced while streaming so an
/// oversized body stops early instead of filling the disk.
pub async fn spool_field(
    temp_dir: &Path,
    mut field: Field<'_>,
    allowed_types: &[&str],
    max_bytes: usize,
) -> ApiResult<TempUpload> {
    let content_type = field.content_type().unwrap_or("").to_string();
    if !allowed_types.contains(&content_type.as_str()) {
        return Err(ApiError::bad_request(format!(
            "Unsupported file type: {}",
            if content_type.is_empty() {
                "unknown"
            } else {
                &content_type
            }
        )));
    }

    let path = temp_dir.join(format!(
        "{}.{}",
        Uuid::now_v7(),
        extension_for(&content_type)
    ));
    let mut file = tokio::fs::File::create(&path)
        .await
        .map_err(|err| ApiError::Internal(err.into()))?;
    // Guard armed before the first write so every exit path cleans up
    let spooled = TempUpload { path };

    let mut written = 0usize;
    loop {
        let chunk = field
            .chunk()
            .await
            .map_err(|err| ApiError::bad_request(format!("Malformed upload body: {err}")))?;
        let Some(chunk) = chunk else { break };

        written += chunk.len();
        if written > max_bytes {
            return Err(ApiError::bad_request(format!(
                "File too large (limit {} MB)",
                max_bytes / (1024 * 1024)
            )));
        }
        file.write_all(&chunk)
            .await
            .map_err(|err| ApiError::Internal(err.into()))?;
    }

    if written == 0 {
        return Err(ApiError::bad_request("Uploaded file is empty"));
    }

    file.flush()
        .await
        .map_err(|err| ApiError::Internal(err.into()))?;
    Ok(spooled)
}
