//! Block and run types.

use super::Table;
use serde::{Deserialize, Serialize};

/// A body-level content block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// A paragraph of text, possibly with embedded media
    Text(TextBlock),

    /// A table
    Table(Table),
}

impl Block {
    /// Create a text block from plain text.
    pub fn text(text: impl Into<String>) -> Self {
        Block::Text(TextBlock::with_text(text))
    }

    /// Check if this block is a text block.
    pub fn is_text(&self) -> bool {
        matches!(self, Block::Text(_))
    }

    /// Check if this block is a table.
    pub fn is_table(&self) -> bool {
        matches!(self, Block::Table(_))
    }

    /// Number of media anchors inside the block.
    pub fn media_count(&self) -> usize {
        match self {
            Block::Text(t) => t.media_count(),
            Block::Table(t) => t.media_refs,
        }
    }

    /// Get plain text content of the block.
    pub fn plain_text(&self) -> String {
        match self {
            Block::Text(t) => t.content(),
            Block::Table(t) => t.plain_text(),
        }
    }
}

/// The smallest addressable fragment of a text block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Run {
    /// Plain text
    Text {
        /// The text content
        text: String,
    },

    /// Reference to embedded media (no text payload)
    Media,
}

impl Run {
    /// Create a text run.
    pub fn text(text: impl Into<String>) -> Self {
        Run::Text { text: text.into() }
    }

    /// Check if this run references media.
    pub fn is_media(&self) -> bool {
        matches!(self, Run::Media)
    }
}

/// A paragraph as an ordered sequence of runs.
///
/// Adjacent text runs are merged on insertion, so a marker that the source
/// split across several formatting runs is still one contiguous string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextBlock {
    /// Runs in document order
    pub runs: Vec<Run>,
}

impl TextBlock {
    /// Create a new empty text block.
    pub fn new() -> Self {
        Self { runs: Vec::new() }
    }

    /// Create a text block with plain text.
    pub fn with_text(text: impl Into<String>) -> Self {
        let mut block = Self::new();
        block.push_text(text);
        block
    }

    /// Append text, merging with a preceding text run.
    pub fn push_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if text.is_empty() {
            return;
        }
        match self.runs.last_mut() {
            Some(Run::Text { text: last }) => last.push_str(&text),
            _ => self.runs.push(Run::Text { text }),
        }
    }

    /// Append an embedded media reference.
    pub fn push_media(&mut self) {
        self.runs.push(Run::Media);
    }

    /// Concatenated text of all text runs.
    pub fn content(&self) -> String {
        self.runs
            .iter()
            .filter_map(|run| match run {
                Run::Text { text } => Some(text.as_str()),
                Run::Media => None,
            })
            .collect()
    }

    /// Number of media runs.
    pub fn media_count(&self) -> usize {
        self.runs.iter().filter(|r| r.is_media()).count()
    }

    /// Check if the block has neither text nor media.
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_text_merges_runs() {
        let mut block = TextBlock::new();
        block.push_text("<sol_");
        block.push_text("start id=");
        block.push_text("4>");
        assert_eq!(block.runs.len(), 1);
        assert_eq!(block.content(), "<sol_start id=4>");
    }

    #[test]
    fn test_media_splits_runs() {
        let mut block = TextBlock::with_text("Before");
        block.push_media();
        block.push_text("After");

        assert_eq!(
            block.runs,
            vec![Run::text("Before"), Run::Media, Run::text("After")]
        );
        assert_eq!(block.content(), "BeforeAfter");
        assert_eq!(block.media_count(), 1);
    }

    #[test]
    fn test_empty_text_is_ignored() {
        let mut block = TextBlock::new();
        block.push_text("");
        assert!(block.is_empty());
    }

    #[test]
    fn test_block_variants() {
        let block = Block::text("hello");
        assert!(block.is_text());
        assert!(!block.is_table());
        assert_eq!(block.media_count(), 0);
        assert_eq!(block.plain_text(), "hello");
    }
}
