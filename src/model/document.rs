//! Document-level types.

use super::{Block, MediaStore};
use crate::report::Warning;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Identity of a source document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceId {
    /// Original path, if the document was loaded from disk
    pub path: Option<PathBuf>,

    /// Base name used to name outputs (file stem of the path)
    pub base_name: String,
}

impl SourceId {
    /// Identity derived from a file path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        let base_name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "document".to_string());
        Self {
            path: Some(path.to_path_buf()),
            base_name,
        }
    }

    /// Identity for an in-memory document.
    pub fn named(base_name: impl Into<String>) -> Self {
        Self {
            path: None,
            base_name: base_name.into(),
        }
    }
}

impl Default for SourceId {
    fn default() -> Self {
        Self::named("document")
    }
}

impl std::fmt::Display for SourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{}", path.display()),
            None => write!(f, "{}", self.base_name),
        }
    }
}

/// A parsed DOCX document: ordered blocks plus its media store.
#[derive(Debug, Clone, Default)]
pub struct Document {
    /// Source identity
    pub source: SourceId,

    /// Body blocks in document order
    pub blocks: Vec<Block>,

    /// Valid media assets in package order
    pub media: MediaStore,

    /// Recoverable problems met while loading
    pub warnings: Vec<Warning>,
}

impl Document {
    /// Create a new empty document.
    pub fn new(source: SourceId) -> Self {
        Self {
            source,
            ..Default::default()
        }
    }

    /// Create a document from blocks, without media.
    pub fn from_blocks(source: SourceId, blocks: Vec<Block>) -> Self {
        Self {
            source,
            blocks,
            ..Default::default()
        }
    }

    /// Attach a media store.
    pub fn with_media(mut self, media: MediaStore) -> Self {
        self.media = media;
        self
    }

    /// Add a block to the document.
    pub fn add_block(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Iterate over blocks in order. Can be restarted by calling again.
    pub fn blocks(&self) -> std::slice::Iter<'_, Block> {
        self.blocks.iter()
    }

    /// Get the number of blocks.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Total number of media anchors in the body.
    pub fn anchor_count(&self) -> usize {
        self.blocks.iter().map(Block::media_count).sum()
    }

    /// Check if the document has any blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Get plain text content of the entire document.
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(Block::plain_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
