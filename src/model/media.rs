//! Media asset types for images embedded in a document package.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A validated image extracted from the package's media directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaAsset {
    /// Position among the valid assets, in package listing order
    pub ordinal: usize,

    /// Entry name inside the package (e.g., "word/media/image1.png")
    pub name: String,

    /// Raw binary data
    #[serde(skip_serializing, default)]
    pub data: Vec<u8>,

    /// MIME type (e.g., "image/png")
    pub mime_type: String,

    /// Width in pixels
    pub width: u32,

    /// Height in pixels
    pub height: u32,
}

impl MediaAsset {
    /// Create a new asset.
    pub fn new(ordinal: usize, name: impl Into<String>, data: Vec<u8>) -> Self {
        let mime_type = Self::detect_mime_type(&data)
            .unwrap_or("application/octet-stream")
            .to_string();
        Self {
            ordinal,
            name: name.into(),
            data,
            mime_type,
            width: 0,
            height: 0,
        }
    }

    /// Set pixel dimensions.
    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Get the size of the asset data in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// File name without the package directory.
    pub fn file_name(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }

    /// Height / width ratio, 1.0 when dimensions are unknown.
    pub fn aspect_ratio(&self) -> f64 {
        if self.width == 0 || self.height == 0 {
            1.0
        } else {
            self.height as f64 / self.width as f64
        }
    }

    /// Get the file extension based on MIME type, falling back to the entry name.
    pub fn extension(&self) -> &str {
        match self.mime_type.as_str() {
            "image/jpeg" => "jpeg",
            "image/png" => "png",
            "image/gif" => "gif",
            "image/tiff" => "tiff",
            "image/bmp" => "bmp",
            "image/webp" => "webp",
            _ => self
                .file_name()
                .rsplit_once('.')
                .map(|(_, ext)| ext)
                .unwrap_or("bin"),
        }
    }

    /// Detect MIME type from data magic bytes.
    pub fn detect_mime_type(data: &[u8]) -> Option<&'static str> {
        if data.len() < 8 {
            return None;
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some("image/jpeg");
        }

        // PNG: 89 50 4E 47 0D 0A 1A 0A
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
            return Some("image/png");
        }

        // GIF: GIF87a or GIF89a
        if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
            return Some("image/gif");
        }

        // TIFF: 49 49 2A 00 (little-endian) or 4D 4D 00 2A (big-endian)
        if data.starts_with(&[0x49, 0x49, 0x2A, 0x00])
            || data.starts_with(&[0x4D, 0x4D, 0x00, 0x2A])
        {
            return Some("image/tiff");
        }

        // BMP: BM
        if data.starts_with(b"BM") {
            return Some("image/bmp");
        }

        // WEBP: RIFF....WEBP
        if data.len() >= 12 && data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
            return Some("image/webp");
        }

        None
    }
}

/// The valid media assets of one document, in package order.
///
/// Assets are shared read-only with the regions that reference them.
#[derive(Debug, Clone, Default)]
pub struct MediaStore {
    assets: Vec<Arc<MediaAsset>>,
}

impl MediaStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an asset; its ordinal is reassigned to its position.
    pub fn push(&mut self, mut asset: MediaAsset) {
        asset.ordinal = self.assets.len();
        self.assets.push(Arc::new(asset));
    }

    /// Get an asset by ordinal.
    pub fn get(&self, ordinal: usize) -> Option<&Arc<MediaAsset>> {
        self.assets.get(ordinal)
    }

    /// Number of valid assets.
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// Check if the store holds no assets.
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Iterate over assets in ordinal order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<MediaAsset>> {
        self.assets.iter()
    }
}

impl FromIterator<MediaAsset> for MediaStore {
    fn from_iter<I: IntoIterator<Item = MediaAsset>>(iter: I) -> Self {
        let mut store = Self::new();
        for asset in iter {
            store.push(asset);
        }
        store
    }
}
