//! Structured results of splitting a document.
//!
//! Nothing that goes wrong with a single region, marker or media asset stops
//! a document from being processed. Those conditions are collected as
//! [`Warning`]s in the [`SplitReport`] instead.

mod json;
mod stats;

pub use json::{to_json, JsonFormat};
pub use stats::SplitStats;

use crate::model::SourceId;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A recoverable problem met while processing one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// A media entry failed image validation and was excluded.
    MalformedMedia {
        /// Entry name inside the package
        name: String,
        /// Why validation failed
        reason: String,
    },

    /// A marker-like token did not match the marker grammar.
    UnparsableMarker {
        /// Index of the block containing the token
        block: usize,
        /// The token as written
        raw: String,
    },

    /// The document ended while a region was still open.
    UnterminatedRegion {
        /// Region id
        id: String,
    },

    /// More region media anchors than valid media assets.
    MediaStarvation {
        /// Region id
        id: String,
        /// Zero-based index of the anchor among region anchors
        anchor: usize,
    },

    /// An end marker appeared with no open region.
    StrayEndMarker {
        /// Index of the block containing the marker
        block: usize,
    },

    /// A region id was used more than once in the same document.
    DuplicateRegionId {
        /// Region id
        id: String,
        /// File name the duplicate was written to
        file_name: String,
    },

    /// A region's artifact could not be written.
    WriteFailed {
        /// Region id
        id: String,
        /// Underlying error
        reason: String,
    },

    /// The body XML was malformed; blocks after the error were not read.
    TruncatedBody {
        /// Number of blocks read before the error
        blocks_read: usize,
        /// Underlying error
        reason: String,
    },
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Warning::MalformedMedia { name, reason } => {
                write!(f, "skipped malformed media {}: {}", name, reason)
            }
            Warning::UnparsableMarker { block, raw } => {
                write!(f, "unparsable marker {} in block {}", raw, block)
            }
            Warning::UnterminatedRegion { id } => {
                write!(f, "region {} has no end marker; closed at end of document", id)
            }
            Warning::MediaStarvation { id, anchor } => {
                write!(f, "no media left for anchor {} in region {}", anchor, id)
            }
            Warning::StrayEndMarker { block } => {
                write!(f, "end marker without open region in block {}", block)
            }
            Warning::DuplicateRegionId { id, file_name } => {
                write!(f, "region id {} repeated; written as {}", id, file_name)
            }
            Warning::WriteFailed { id, reason } => {
                write!(f, "failed to write region {}: {}", id, reason)
            }
            Warning::TruncatedBody {
                blocks_read,
                reason,
            } => write!(
                f,
                "document body truncated after {} blocks: {}",
                blocks_read, reason
            ),
        }
    }
}

/// One region artifact that was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrittenRegion {
    /// Region id
    pub id: String,

    /// Output file path
    pub path: PathBuf,

    /// Number of output blocks
    pub block_count: usize,

    /// Number of images placed
    pub image_count: usize,

    /// Whether the region had an end marker
    pub terminated: bool,
}

/// Result of splitting one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitReport {
    /// Source document identity
    pub source: SourceId,

    /// Directory holding this document's outputs
    pub output_dir: PathBuf,

    /// Region artifacts in the order they were written
    pub regions: Vec<WrittenRegion>,

    /// Recoverable problems
    pub warnings: Vec<Warning>,

    /// Counters collected while splitting
    pub stats: SplitStats,
}

impl SplitReport {
    /// Create an empty report.
    pub fn new(source: SourceId, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            source,
            output_dir: output_dir.into(),
            regions: Vec::new(),
            warnings: Vec::new(),
            stats: SplitStats::default(),
        }
    }

    /// Number of regions written.
    pub fn regions_written(&self) -> usize {
        self.regions.len()
    }

    /// Check whether any warning was reported.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Ids of the written regions, in order.
    pub fn region_ids(&self) -> Vec<&str> {
        self.regions.iter().map(|r| r.id.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_display() {
        let w = Warning::UnterminatedRegion { id: "5".into() };
        assert_eq!(
            w.to_string(),
            "region 5 has no end marker; closed at end of document"
        );

        let w = Warning::MediaStarvation {
            id: "3".into(),
            anchor: 2,
        };
        assert_eq!(w.to_string(), "no media left for anchor 2 in region 3");
    }

    #[test]
    fn test_report_accessors() {
        let mut report = SplitReport::new(SourceId::named("doc"), "out/doc");
        assert_eq!(report.regions_written(), 0);
        assert!(!report.has_warnings());

        report.regions.push(WrittenRegion {
            id: "7".into(),
            path: PathBuf::from("out/doc/section_7.docx"),
            block_count: 1,
            image_count: 0,
            terminated: true,
        });
        report.warnings.push(Warning::StrayEndMarker { block: 0 });

        assert_eq!(report.region_ids(), vec!["7"]);
        assert!(report.has_warnings());
    }
}
