use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_core::{ImageId, ProductId};

/// Which of the two session lists an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaList {
    Pending,
    Persisted,
}

impl core::fmt::Display for MediaList {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MediaList::Pending => f.write_str("pending"),
            MediaList::Persisted => f.write_str("persisted"),
        }
    }
}

/// One `sort_order` write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderUpdate {
    pub image_id: ImageId,
    pub sort_order: i32,
}

/// A file attached in the editor but not yet uploaded.
///
/// Carries its bytes and a `data:` URL preview so it can be shown next to
/// persisted images before it has a record of its own.
#[derive(Clone, PartialEq, Eq)]
pub struct PendingImage {
    local_id: Uuid,
    file_name: String,
    content_type: String,
    bytes: Vec<u8>,
    preview: String,
}

impl PendingImage {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        let content_type = content_type.into();
        let preview = format!("data:{content_type};base64,{}", STANDARD.encode(&bytes));
        Self {
            local_id: Uuid::now_v7(),
            file_name: file_name.into(),
            content_type,
            bytes,
            preview,
        }
    }

    pub fn local_id(&self) -> Uuid {
        self.local_id
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn preview(&self) -> &str {
        &self.preview
    }

    /// Object path in the blob store: `products/{product}/{local_id}.{ext}`.
    pub fn object_path(&self, product_id: ProductId) -> String {
        match self.extension() {
            Some(ext) => format!("products/{product_id}/{}.{ext}", self.local_id),
            None => format!("products/{product_id}/{}", self.local_id),
        }
    }

    fn extension(&self) -> Option<String> {
        std::path::Path::new(&self.file_name)
            .extension()
            .and_then(|e| e.to_str())
            .filter(|e| !e.is_empty())
            .map(|e| e.to_ascii_lowercase())
    }
}

// Bytes and previews are large; keep debug output readable.
impl core::fmt::Debug for PendingImage {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PendingImage")
            .field("local_id", &self.local_id)
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}
