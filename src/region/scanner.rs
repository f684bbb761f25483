//! Single-pass region scanner.
//!
//! The scanner is a two-state machine, `Idle` or inside one open region,
//! driven token by token across the blocks of a document. Only one region
//! can be open at a time.

use std::borrow::Borrow;
use std::collections::VecDeque;

use crate::model::{Block, Document, MediaStore, Run, Table, TextBlock};
use crate::report::Warning;

use super::builder::{MediaCursor, RegionBuilder};
use super::token::{tokenize, Token};
use super::Region;

/// Per-document scanning state shared by all regions of that document.
#[derive(Debug, Default)]
pub struct ScanContext {
    cursor: MediaCursor,
    warnings: Vec<Warning>,
    block_index: usize,
}

impl ScanContext {
    /// Create a context over a document's media.
    pub fn new(media: MediaStore) -> Self {
        Self {
            cursor: MediaCursor::new(media),
            ..Default::default()
        }
    }

    /// Warnings raised so far.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Take the warnings raised so far.
    pub fn take_warnings(&mut self) -> Vec<Warning> {
        std::mem::take(&mut self.warnings)
    }

    /// Media anchors paired so far, with or without an asset.
    pub fn anchors_seen(&self) -> usize {
        self.cursor.consumed()
    }

    /// Assets never paired with an anchor.
    pub fn unused_media(&self) -> usize {
        self.cursor.remaining()
    }

    /// Blocks scanned so far.
    pub fn blocks_scanned(&self) -> usize {
        self.block_index
    }

    fn warn(&mut self, warning: Warning) {
        log::warn!("{}", warning);
        self.warnings.push(warning);
    }
}

/// Iterator of the regions of one document, in the order they close.
pub struct RegionScanner<I> {
    blocks: I,
    ctx: ScanContext,
    open: Option<RegionBuilder>,
    closing: bool,
    ready: VecDeque<Region>,
    exhausted: bool,
}

impl<I, B> RegionScanner<I>
where
    I: Iterator<Item = B>,
    B: Borrow<Block>,
{
    /// Scan `blocks`, pairing anchors with the assets of `media`.
    pub fn new(blocks: impl IntoIterator<IntoIter = I>, media: MediaStore) -> Self {
        Self::with_context(blocks, ScanContext::new(media))
    }

    /// Scan `blocks` with an existing context.
    pub fn with_context(blocks: impl IntoIterator<IntoIter = I>, ctx: ScanContext) -> Self {
        Self {
            blocks: blocks.into_iter(),
            ctx,
            open: None,
            closing: false,
            ready: VecDeque::new(),
            exhausted: false,
        }
    }

    /// Scanning state.
    pub fn context(&self) -> &ScanContext {
        &self.ctx
    }

    /// Take the warnings raised so far.
    pub fn take_warnings(&mut self) -> Vec<Warning> {
        self.ctx.take_warnings()
    }

    /// Give up the scanner and keep its state.
    pub fn into_context(self) -> ScanContext {
        self.ctx
    }

    fn scan_block(&mut self, block: &Block) {
        match block {
            Block::Text(text) => self.scan_text(text),
            Block::Table(table) => self.scan_table(table),
        }
        self.ctx.block_index += 1;
    }

    fn scan_text(&mut self, block: &TextBlock) {
        let mut saw_marker = false;

        for run in &block.runs {
            match run {
                Run::Text { text } => {
                    for token in tokenize(text) {
                        saw_marker |= token.is_marker();
                        self.apply(token);
                    }
                }
                Run::Media => self.place_media(),
            }
        }

        if let Some(builder) = self.open.as_mut() {
            builder.end_block(!saw_marker && block.media_count() == 0);
        }
        if self.closing {
            self.close(true);
        }
    }

    fn apply(&mut self, token: Token<'_>) {
        match token {
            Token::StartRegion(id) => match &self.open {
                None => self.open_region(id),
                Some(_) if self.closing => {
                    self.close(true);
                    self.open_region(id);
                }
                Some(open) => {
                    log::debug!("ignoring start of region {} inside region {}", id, open.id())
                }
            },
            Token::EndRegion => {
                if self.open.is_some() {
                    self.closing = true;
                } else {
                    let block = self.ctx.block_index;
                    self.ctx.warn(Warning::StrayEndMarker { block });
                }
            }
            Token::Malformed(raw) => {
                let block = self.ctx.block_index;
                self.ctx.warn(Warning::UnparsableMarker {
                    block,
                    raw: raw.to_string(),
                });
            }
            Token::SubIdOpen(_) | Token::SubIdClose | Token::Annotation(_) => {}
            Token::Text(span) => {
                if let Some(builder) = self.open.as_mut() {
                    builder.push_text(span);
                }
            }
        }
    }

    fn place_media(&mut self) {
        // Only anchors inside a region take an asset.
        let Some(builder) = self.open.as_mut() else {
            return;
        };
        let (anchor, asset) = self.ctx.cursor.consume();
        if asset.is_none() {
            let id = builder.id().to_string();
            self.ctx.warn(Warning::MediaStarvation { id, anchor });
        }
        builder.push_media(anchor, asset);
    }

    fn scan_table(&mut self, table: &Table) {
        // Tables are copied as cell text; their anchors take no asset.
        if let Some(builder) = self.open.as_mut() {
            builder.push_table(table.clone());
        }
    }

    fn open_region(&mut self, id: &str) {
        log::debug!("region {} opened at block {}", id, self.ctx.block_index);
        self.open = Some(RegionBuilder::new(id));
    }

    fn close(&mut self, terminated: bool) {
        self.closing = false;
        if let Some(builder) = self.open.take() {
            let region = builder.finish(terminated);
            log::debug!(
                "region {} closed with {} blocks",
                region.id,
                region.blocks.len()
            );
            self.ready.push_back(region);
        }
    }
}

impl<I, B> Iterator for RegionScanner<I>
where
    I: Iterator<Item = B>,
    B: Borrow<Block>,
{
    type Item = Region;

    fn next(&mut self) -> Option<Region> {
        loop {
            if let Some(region) = self.ready.pop_front() {
                return Some(region);
            }
            if self.exhausted {
                return None;
            }
            match self.blocks.next() {
                Some(block) => self.scan_block(block.borrow()),
                None => {
                    self.exhausted = true;
                    if let Some(open) = &self.open {
                        let id = open.id().to_string();
                        self.ctx.warn(Warning::UnterminatedRegion { id });
                        self.close(false);
                    }
                }
            }
        }
    }
}

/// Scan a whole document, returning its regions and the warnings raised.
pub fn scan(document: &Document) -> (Vec<Region>, Vec<Warning>) {
    let mut scanner = RegionScanner::new(document.blocks(), document.media.clone());
    let regions: Vec<Region> = scanner.by_ref().collect();
    (regions, scanner.into_context().take_warnings())
}
