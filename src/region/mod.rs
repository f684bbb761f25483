//! Marker-delimited regions.
//!
//! A region is the content between `<sol_start id=N>` and the next
//! `<sol_end>`. [`RegionScanner`] walks the block stream of one document and
//! yields each region as soon as it closes; [`RegionBuilder`] accumulates the
//! open region and pairs media anchors with assets by ordinal.

mod builder;
mod clean;
mod scanner;
mod token;

pub use builder::{MediaCursor, RegionBuilder};
pub use clean::clean;
pub use scanner::{scan, RegionScanner, ScanContext};
pub use token::{tokenize, Token};

use crate::model::{MediaAsset, Table};
use serde::Serialize;
use std::sync::Arc;

/// Text written in place of an image when no asset is left for its anchor.
pub const MISSING_IMAGE_PLACEHOLDER: &str = "[image]";

/// One piece of region content, in output order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RegionBlock {
    /// Cleaned paragraph text (may be empty for a blank line)
    Paragraph {
        /// Paragraph text
        text: String,
    },

    /// A copy of a source table
    Table(Table),

    /// An image paired with its anchor
    Image(Arc<MediaAsset>),

    /// An anchor with no asset left to pair with
    MissingImage {
        /// Zero-based index of the anchor among region anchors
        anchor: usize,
    },
}

impl RegionBlock {
    /// Create a paragraph block.
    pub fn paragraph(text: impl Into<String>) -> Self {
        RegionBlock::Paragraph { text: text.into() }
    }

    /// Paragraph text, if this is a paragraph.
    pub fn as_paragraph(&self) -> Option<&str> {
        match self {
            RegionBlock::Paragraph { text } => Some(text),
            _ => None,
        }
    }

    /// Check if this block places an image.
    pub fn is_image(&self) -> bool {
        matches!(self, RegionBlock::Image(_))
    }
}

/// A closed region.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Region {
    /// Id from the start marker
    pub id: String,

    /// Content in document order
    pub blocks: Vec<RegionBlock>,

    /// False when the document ended before an end marker
    pub terminated: bool,
}

impl Region {
    /// Paragraph texts, in order.
    pub fn paragraphs(&self) -> Vec<&str> {
        self.blocks.iter().filter_map(RegionBlock::as_paragraph).collect()
    }

    /// Number of images placed.
    pub fn image_count(&self) -> usize {
        self.blocks.iter().filter(|b| b.is_image()).count()
    }

    /// Number of tables.
    pub fn table_count(&self) -> usize {
        self.blocks
            .iter()
            .filter(|b| matches!(b, RegionBlock::Table(_)))
            .count()
    }

    /// Number of anchors without an image.
    pub fn missing_image_count(&self) -> usize {
        self.blocks
            .iter()
            .filter(|b| matches!(b, RegionBlock::MissingImage { .. }))
            .count()
    }

    /// Ordinals of the placed assets, in order.
    pub fn media_ordinals(&self) -> Vec<usize> {
        self.blocks
            .iter()
            .filter_map(|b| match b {
                RegionBlock::Image(asset) => Some(asset.ordinal),
                _ => None,
            })
            .collect()
    }

    /// Check if the region has no content.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}
