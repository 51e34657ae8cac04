use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;

use storefront_media::{BlobStore, BlobStoreError};

use crate::blob_store::{path_from_url, public_url};

/// Object store backed by a local directory.
///
/// Object `products/p/a.png` lives at `{root}/products/p/a.png` and is
/// published as `{base_url}/products/p/a.png`. Content types are not kept.
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    root: PathBuf,
    base_url: String,
}

impl FsBlobStore {
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File location of `path`. Only plain relative paths are accepted, so
    /// objects never land outside `root`.
    fn resolve(&self, path: &str) -> Option<PathBuf> {
        let relative = Path::new(path.trim_start_matches('/'));
        let plain = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if !plain || relative.as_os_str().is_empty() {
            return None;
        }
        Some(self.root.join(relative))
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn upload(&self, bytes: &[u8], path: &str, _content_type: &str) -> Result<String, BlobStoreError> {
        let file = self
            .resolve(path)
            .ok_or_else(|| BlobStoreError::Upload(format!("invalid object path '{path}'")))?;
        if let Some(dir) = file.parent() {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| BlobStoreError::Backend(format!("{}: {e}", dir.display())))?;
        }
        tokio::fs::write(&file, bytes)
            .await
            .map_err(|e| BlobStoreError::Upload(format!("{}: {e}", file.display())))?;
        tracing::debug!(path, size = bytes.len(), file = %file.display(), "object written");
        Ok(public_url(&self.base_url, path.trim_start_matches('/')))
    }

    async fn remove(&self, path: &str) -> Result<(), BlobStoreError> {
        let file = self
            .resolve(path)
            .ok_or_else(|| BlobStoreError::NotFound(path.to_string()))?;
        match tokio::fs::remove_file(&file).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(BlobStoreError::NotFound(path.to_string())),
            Err(e) => Err(BlobStoreError::Backend(format!("{}: {e}", file.display()))),
        }
    }

    fn object_path(&self, url: &str) -> Option<String> {
        path_from_url(&self.base_url, url)
    }
}
