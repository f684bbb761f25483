//! Region accumulation and media pairing.

use std::sync::Arc;

use crate::model::{MediaAsset, MediaStore, Table};

use super::clean::clean;
use super::{Region, RegionBlock};

/// Hands out media assets to region anchors in text order, one per anchor.
///
/// Each anchor consumes an ordinal whether or not an asset is left for it.
#[derive(Debug, Clone, Default)]
pub struct MediaCursor {
    store: MediaStore,
    next: usize,
}

impl MediaCursor {
    /// Create a cursor at the first asset of a store.
    pub fn new(store: MediaStore) -> Self {
        Self { store, next: 0 }
    }

    /// Consume the next ordinal. Returns the anchor index and its asset, if any.
    pub fn consume(&mut self) -> (usize, Option<Arc<MediaAsset>>) {
        let anchor = self.next;
        self.next += 1;
        (anchor, self.store.get(anchor).cloned())
    }

    /// Number of anchors seen so far.
    pub fn consumed(&self) -> usize {
        self.next
    }

    /// Assets not yet paired with an anchor.
    pub fn remaining(&self) -> usize {
        self.store.len().saturating_sub(self.next)
    }
}

/// Accumulator for the currently open region.
#[derive(Debug)]
pub struct RegionBuilder {
    id: String,
    blocks: Vec<RegionBlock>,
    buffer: String,
}

impl RegionBuilder {
    /// Open a region.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            blocks: Vec::new(),
            buffer: String::new(),
        }
    }

    /// Region id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Buffer text of the current block.
    pub fn push_text(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    /// Place a media anchor: flush the text before it, then the image or a
    /// placeholder when no asset is left.
    pub fn push_media(&mut self, anchor: usize, asset: Option<Arc<MediaAsset>>) {
        self.flush();
        self.blocks.push(match asset {
            Some(asset) => RegionBlock::Image(asset),
            None => RegionBlock::MissingImage { anchor },
        });
    }

    /// Append a table as-is.
    pub fn push_table(&mut self, table: Table) {
        self.flush();
        self.blocks.push(RegionBlock::Table(table));
    }

    /// Finish the current block. When `keep_blank` is set and the block's
    /// text cleans to nothing, an empty paragraph is kept.
    pub fn end_block(&mut self, keep_blank: bool) {
        if !self.flush() && keep_blank {
            self.blocks.push(RegionBlock::paragraph(String::new()));
        }
    }

    /// Close the region.
    pub fn finish(mut self, terminated: bool) -> Region {
        self.flush();
        Region {
            id: self.id,
            blocks: self.blocks,
            terminated,
        }
    }

    /// Emit buffered text as a paragraph if it cleans to something.
    fn flush(&mut self) -> bool {
        let text = clean(&std::mem::take(&mut self.buffer));
        if text.is_empty() {
            return false;
        }
        self.blocks.push(RegionBlock::Paragraph { text });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(count: usize) -> MediaStore {
        (0..count)
            .map(|i| MediaAsset::new(i, format!("word/media/image{}.png", i + 1), Vec::new()))
            .collect()
    }

    #[test]
    fn test_cursor_is_monotonic() {
        let mut cursor = MediaCursor::new(store(2));
        let (anchor, asset) = cursor.consume();
        assert_eq!(anchor, 0);
        assert_eq!(asset.unwrap().ordinal, 0);
        assert_eq!(cursor.remaining(), 1);

        let (anchor, asset) = cursor.consume();
        assert_eq!(anchor, 1);
        assert_eq!(asset.unwrap().ordinal, 1);

        let (anchor, asset) = cursor.consume();
        assert_eq!(anchor, 2);
        assert!(asset.is_none());
        assert_eq!(cursor.remaining(), 0);
        assert_eq!(cursor.consumed(), 3);
    }

    #[test]
    fn test_media_splits_text() {
        let mut cursor = MediaCursor::new(store(1));
        let mut builder = RegionBuilder::new("3");
        builder.push_text("Before");
        let (anchor, asset) = cursor.consume();
        builder.push_media(anchor, asset);
        builder.push_text("After");
        let region = builder.finish(true);

        assert_eq!(region.blocks.len(), 3);
        assert_eq!(region.blocks[0], RegionBlock::paragraph("Before"));
        assert!(region.blocks[1].is_image());
        assert_eq!(region.blocks[2], RegionBlock::paragraph("After"));
    }

    #[test]
    fn test_starved_anchor_becomes_placeholder() {
        let mut builder = RegionBuilder::new("1");
        builder.push_media(4, None);
        let region = builder.finish(true);

        assert_eq!(region.blocks, vec![RegionBlock::MissingImage { anchor: 4 }]);
        assert_eq!(region.missing_image_count(), 1);
    }

    #[test]
    fn test_blank_blocks() {
        let mut builder = RegionBuilder::new("1");
        builder.push_text("   ");
        builder.end_block(true);
        builder.push_text("<sub_id end>");
        builder.end_block(false);
        let region = builder.finish(true);

        assert_eq!(region.paragraphs(), vec![""]);
    }

    #[test]
    fn test_table_flushes_buffer() {
        let mut builder = RegionBuilder::new("1");
        builder.push_text("caption");
        builder.push_table(Table::from_rows([["a", "b"]]));
        let region = builder.finish(false);

        assert_eq!(region.paragraphs(), vec!["caption"]);
        assert_eq!(region.table_count(), 1);
        assert!(!region.terminated);
    }
}
