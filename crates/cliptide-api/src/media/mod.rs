// Media storage for uploaded assets
//
// Uploaded bodies are spooled to a temp file by the handler, then pushed
// to the configured backend here. Production talks to a remote media
// service over HTTP; dev mode copies files into a local directory.

pub mod temp;

pub use temp::{field_text, multipart_error, spool_field, TempUpload};

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Result of a successful upload
#[derive(Debug, Clone)]
pub struct UploadedMedia {
    /// Public URL clients fetch the asset from
    pub url: String,
    /// Backend handle used for deletion
    pub public_id: String,
    /// Playback length in seconds, reported for video uploads only
    pub duration: Option<f64>,
}

/// Media storage backend
///
/// - Remote: HTTP media service (production)
/// - Local: local directory (development)
#[derive(Clone)]
pub enum MediaStore {
    Remote(RemoteMediaStore),
    Local(LocalMediaStore),
}

impl MediaStore {
    /// Create a media store from environment configuration.
    ///
    /// `MEDIA_UPLOAD_URL` (with `MEDIA_API_KEY`) selects the remote
    /// backend. Without it, files land under `MEDIA_LOCAL_DIR` and URLs
    /// are built from `MEDIA_BASE_URL`. Spool files go to
    /// `MEDIA_TEMP_DIR`, defaulting to a subdirectory of the system
    /// temp dir.
    pub fn from_env() -> Result<Self> {
        let temp_dir = std::env::var("MEDIA_TEMP_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| std::env::temp_dir().join("cliptide-uploads"));
        std::fs::create_dir_all(&temp_dir).with_context(|| {
            format!("Failed to create upload temp dir: {}", temp_dir.display())
        })?;

        match std::env::var("MEDIA_UPLOAD_URL") {
            Ok(upload_url) if !upload_url.is_empty() => {
                let api_key = std::env::var("MEDIA_API_KEY")
                    .context("MEDIA_API_KEY must be set when MEDIA_UPLOAD_URL is configured")?;
                tracing::info!("Using remote media service at {}", upload_url);
                Ok(Self::remote(upload_url, api_key, temp_dir))
            }
            _ => {
                let root = std::env::var("MEDIA_LOCAL_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from("./media"));
                let base_url = std::env::var("MEDIA_BASE_URL")
                    .unwrap_or_else(|_| "http://localhost:8000/media".to_string());
                tracing::info!("Using local media directory at {}", root.display());
                Self::local(root, base_url, temp_dir)
            }
        }
    }

    pub fn remote(upload_url: String, api_key: String, temp_dir: PathBuf) -> Self {
        Self::Remote(RemoteMediaStore {
            client: reqwest::Client::new(),
            upload_url,
            api_key,
            temp_dir,
        })
    }

    pub fn local(root: PathBuf, base_url: String, temp_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&root)
            .with_context(|| format!("Failed to create media dir: {}", root.display()))?;
        Ok(Self::Local(LocalMediaStore {
            root,
            base_url,
            temp_dir,
        }))
    }

    /// Directory multipart bodies are spooled into
    pub fn temp_dir(&self) -> &Path {
        match self {
            Self::Remote(store) => &store.temp_dir,
            Self::Local(store) => &store.temp_dir,
        }
    }

    /// Push a spooled file to the backend
    pub async fn upload(&self, local_path: &Path) -> Result<UploadedMedia> {
        match self {
            Self::Remote(store) => store.upload(local_path).await,
            Self::Local(store) => store.upload(local_path).await,
        }
    }

    /// Remove an asset by its public id. Missing assets are not an
    /// error, deletion only has to converge.
    pub async fn delete(&self, public_id: &str) -> Result<()> {
        match self {
            Self::Remote(store) => store.delete(public_id).await,
            Self::Local(store) => store.delete(public_id).await,
        }
    }

    /// Best-effort removal of the asset behind a stored URL.
    /// Failures are logged and swallowed, callers never fail on cleanup.
    pub async fn delete_by_url(&self, url: &str) {
        let Some(public_id) = public_id_from_url(url) else {
            return;
        };
        if let Err(err) = self.delete(&public_id).await {
            tracing::warn!(url, error = %err, "failed to delete media asset");
        }
    }
}

/// Recover the backend public id from a stored URL.
/// Both backends name assets by their final path segment.
fn public_id_from_url(url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let segment = path.rsplit('/').next()?;
    if segment.is_empty() || segment.contains(':') {
        return None;
    }
    Some(segment.to_string())
}

/// Remote media service over HTTP.
///
/// Upload is a multipart POST of the file; the service answers with
/// `{url, publicId, duration?}`. Delete is a DELETE on the public id.
#[derive(Clone)]
pub struct RemoteMediaStore {
    client: reqwest::Client,
    upload_url: String,
    api_key: String,
    temp_dir: PathBuf,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoteUploadResponse {
    url: String,
    public_id: String,
    duration: Option<f64>,
}

impl RemoteMediaStore {
    async fn upload(&self, local_path: &Path) -> Result<UploadedMedia> {
        let file_name = local_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload.bin")
            .to_string();
        let bytes = tokio::fs::read(local_path)
            .await
            .with_context(|| format!("Failed to read spool file: {}", local_path.display()))?;

        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name);
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(&self.upload_url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .context("Failed to reach media service")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Media upload failed ({}): {}", status, body);
        }

        let body: RemoteUploadResponse = response
            .json()
            .await
            .context("Failed to parse media service response")?;

        Ok(UploadedMedia {
            url: body.url,
            public_id: body.public_id,
            duration: body.duration,
        })
    }

    async fn delete(&self, public_id: &str) -> Result<()> {
        let url = format!("{}/{}", self.upload_url.trim_end_matches('/'), public_id);
        let response = self
            .client
            .delete(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .context("Failed to reach media service")?;

        // 404 means the asset is already gone
        if !response.status().is_success() && response.status() != reqwest::StatusCode::NOT_FOUND {
            anyhow::bail!("Media delete failed ({})", response.status());
        }
        Ok(())
    }
}

/// Local-directory backend for development.
///
/// Files are copied under the media root and served by whatever fronts
/// that directory. Duration stays unknown, local mode does not probe
/// media files.
#[derive(Clone)]
pub struct LocalMediaStore {
    root: PathBuf,
    base_url: String,
    temp_dir: PathBuf,
}

impl LocalMediaStore {
    async fn upload(&self, local_path: &Path) -> Result<UploadedMedia> {
        let extension = local_path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("bin");
        let public_id = format!("{}.{}", Uuid::now_v7(), extension);
        let dest = self.root.join(&public_id);

        tokio::fs::copy(local_path, &dest)
            .await
            .with_context(|| format!("Failed to store media file: {}", dest.display()))?;

        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), public_id);
        Ok(UploadedMedia {
            url,
            public_id,
            duration: None,
        })
    }

    async fn delete(&self, public_id: &str) -> Result<()> {
        // Public ids are generated flat file names; anything with path
        // separators never came from this store.
        if public_id.contains('/') || public_id.contains("..") {
            anyhow::bail!("Invalid media public id: {public_id}");
        }
        let path = self.root.join(public_id);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => {
                Err(err).with_context(|| format!("Failed to delete media file: {}", path.display()))
            }
        }
    }
}
