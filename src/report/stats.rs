//! Counters collected while splitting.

use serde::{Deserialize, Serialize};

/// Statistics collected during splitting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitStats {
    /// Body blocks read from the source
    pub block_count: u32,

    /// Media anchors seen in the body
    pub anchor_count: u32,

    /// Valid media assets in the package
    pub media_count: u32,

    /// Media entries rejected by validation
    pub media_rejected: u32,

    /// Regions closed by the scanner
    pub region_count: u32,

    /// Paragraphs emitted into regions
    pub paragraph_count: u32,

    /// Tables emitted into regions
    pub table_count: u32,

    /// Images placed into regions
    pub image_count: u32,

    /// Anchors left without an image
    pub missing_image_count: u32,
}

impl SplitStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment paragraph count.
    pub fn add_paragraph(&mut self) {
        self.paragraph_count += 1;
    }

    /// Increment table count.
    pub fn add_table(&mut self) {
        self.table_count += 1;
    }

    /// Increment image count.
    pub fn add_image(&mut self) {
        self.image_count += 1;
    }

    /// Increment missing image count.
    pub fn add_missing_image(&mut self) {
        self.missing_image_count += 1;
    }

    /// Increment region count.
    pub fn add_region(&mut self) {
        self.region_count += 1;
    }

    /// Merge another stats instance into this one.
    pub fn merge(&mut self, other: &SplitStats) {
        self.block_count += other.block_count;
        self.anchor_count += other.anchor_count;
        self.media_count += other.media_count;
        self.media_rejected += other.media_rejected;
        self.region_count += other.region_count;
        self.paragraph_count += other.paragraph_count;
        self.table_count += other.table_count;
        self.image_count += other.image_count;
        self.missing_image_count += other.missing_image_count;
    }
}
