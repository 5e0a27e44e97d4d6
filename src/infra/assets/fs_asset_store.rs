use crate::domain::ports::AssetStore;
use crate::error::AppError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::error;
use uuid::Uuid;

const ALLOWED_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "gif"];

/// Stores catalog images under a configured root directory and addresses
/// them by `/images/<name>` URLs.
pub struct FsAssetStore {
    root: PathBuf,
}

impl FsAssetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, url: &str) -> PathBuf {
        let name = url.rsplit('/').next().unwrap_or(url);
        self.root.join(name)
    }
}

fn validated_extension(filename: &str) -> Result<String, AppError> {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .filter(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
        .ok_or_else(|| {
            AppError::Validation(
                "Invalid file type. Only jpg, jpeg, png, and gif are allowed.".to_string(),
            )
        })
}

#[async_trait]
impl AssetStore for FsAssetStore {
    async fn store(&self, filename: &str, bytes: &[u8]) -> Result<String, AppError> {
        if bytes.is_empty() {
            return Err(AppError::Validation("No file uploaded".to_string()));
        }

        let extension = validated_extension(filename)?;
        let name = format!("{}.{}", Uuid::new_v4(), extension);

        tokio::fs::create_dir_all(&self.root).await.map_err(|e| {
            error!("Failed to create asset directory {:?}: {}", self.root, e);
            AppError::Internal
        })?;

        tokio::fs::write(self.root.join(&name), bytes).await.map_err(|e| {
            error!("Failed to write asset {}: {}", name, e);
            AppError::Internal
        })?;

        Ok(format!("/images/{name}"))
    }

    async fn delete(&self, url: &str) -> Result<(), AppError> {
        match tokio::fs::remove_file(self.path_for(url)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => {
                error!("Failed to delete asset {}: {}", url, e);
                Err(AppError::Internal)
            }
        }
    }
}
