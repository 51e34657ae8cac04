use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use storefront_media::{BlobStore, BlobStoreError};

/// `{base_url}/{path}`.
pub(crate) fn public_url(base_url: &str, path: &str) -> String {
    format!("{base_url}/{path}")
}

/// Inverse of [`public_url`]; `None` for urls outside `base_url`.
pub(crate) fn path_from_url(base_url: &str, url: &str) -> Option<String> {
    url.strip_prefix(base_url)?
        .strip_prefix('/')
        .filter(|path| !path.is_empty())
        .map(str::to_string)
}

#[derive(Debug, Clone)]
struct StoredObject {
    bytes: Vec<u8>,
    content_type: String,
}

/// In-memory object store for image binaries.
///
/// Public urls are `{base_url}/{path}`. Intended for tests/dev.
#[derive(Debug)]
pub struct InMemoryBlobStore {
    base_url: String,
    objects: RwLock<HashMap<String, StoredObject>>,
}

impl InMemoryBlobStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            objects: RwLock::new(HashMap::new()),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn contains(&self, path: &str) -> bool {
        self.objects
            .read()
            .map(|objects| objects.contains_key(path))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.objects.read().map(|objects| objects.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bytes and content type stored at `path`.
    pub fn get(&self, path: &str) -> Option<(Vec<u8>, String)> {
        let objects = self.objects.read().ok()?;
        objects
            .get(path)
            .map(|o| (o.bytes.clone(), o.content_type.clone()))
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn upload(&self, bytes: &[u8], path: &str, content_type: &str) -> Result<String, BlobStoreError> {
        let path = path.trim_start_matches('/');
        if path.is_empty() {
            return Err(BlobStoreError::Upload("empty object path".to_string()));
        }
        let mut objects = self
            .objects
            .write()
            .map_err(|_| BlobStoreError::Backend("lock poisoned".to_string()))?;
        objects.insert(
            path.to_string(),
            StoredObject {
                bytes: bytes.to_vec(),
                content_type: content_type.to_string(),
            },
        );
        tracing::debug!(path, size = bytes.len(), "object stored");
        Ok(public_url(&self.base_url, path))
    }

    async fn remove(&self, path: &str) -> Result<(), BlobStoreError> {
        let mut objects = self
            .objects
            .write()
            .map_err(|_| BlobStoreError::Backend("lock poisoned".to_string()))?;
        objects
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| BlobStoreError::NotFound(path.to_string()))
    }

    fn object_path(&self, url: &str) -> Option<String> {
        path_from_url(&self.base_url, url)
    }
}
