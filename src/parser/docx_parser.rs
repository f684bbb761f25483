//! DOCX package parser.

use std::io::{Cursor, Read};
use std::path::Path;

use zip::ZipArchive;

use crate::detect::{has_zip_magic, resolve_main_part};
use crate::error::{Error, Result};
use crate::model::{Document, SourceId};
use crate::report::Warning;

use super::body::BlockStream;
use super::media::{extract_media, MediaExtraction};
use super::options::{ErrorMode, ParseOptions};

/// DOCX document parser.
///
/// Holds the main document part and the validated media of one package.
/// The block stream can be walked any number of times.
pub struct DocxParser {
    source: SourceId,
    main_part: String,
    xml: String,
    media: MediaExtraction,
    options: ParseOptions,
}

impl DocxParser {
    /// Open a DOCX file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ParseOptions::default())
    }

    /// Open a DOCX file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        Self::load(&data, options, SourceId::from_path(path))
    }

    /// Parse a DOCX from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, ParseOptions::default())
    }

    /// Parse a DOCX from bytes with custom options.
    pub fn from_bytes_with_options(data: &[u8], options: ParseOptions) -> Result<Self> {
        Self::load(data, options, SourceId::default())
    }

    /// Parse a DOCX from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_reader_with_options(reader, ParseOptions::default())
    }

    /// Parse a DOCX from a reader with custom options.
    pub fn from_reader_with_options<R: Read>(mut reader: R, options: ParseOptions) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes_with_options(&data, options)
    }

    /// Replace the source identity used to name outputs.
    pub fn with_source(mut self, source: SourceId) -> Self {
        self.source = source;
        self
    }

    fn load(data: &[u8], options: ParseOptions, source: SourceId) -> Result<Self> {
        if !has_zip_magic(data) {
            return Err(Error::UnknownFormat);
        }

        let mut archive = ZipArchive::new(Cursor::new(data)).map_err(|_| Error::UnknownFormat)?;
        let main_part = resolve_main_part(&mut archive)?;

        let mut xml = String::new();
        archive.by_name(&main_part)?.read_to_string(&mut xml)?;

        let media = if options.extract_media {
            extract_media(&mut archive, &options)?
        } else {
            MediaExtraction::default()
        };

        log::debug!(
            "opened {} (main part {}, {} media assets)",
            source,
            main_part,
            media.assets.len()
        );

        Ok(Self {
            source,
            main_part,
            xml,
            media,
            options,
        })
    }

    /// Source identity.
    pub fn source(&self) -> &SourceId {
        &self.source
    }

    /// Path of the main document part inside the package.
    pub fn main_part(&self) -> &str {
        &self.main_part
    }

    /// A fresh stream over the body blocks, starting at the first block.
    pub fn blocks(&self) -> BlockStream<'_> {
        BlockStream::new(&self.xml)
    }

    /// Validated media and rejections.
    pub fn media(&self) -> &MediaExtraction {
        &self.media
    }

    /// Read every block and return the document.
    ///
    /// In lenient mode malformed body XML ends the block list instead of
    /// failing; a [`Warning::TruncatedBody`] records where.
    pub fn parse(&self) -> Result<Document> {
        let mut document =
            Document::new(self.source.clone()).with_media(self.media.assets.clone());
        document.warnings = self.media.warnings();

        for block in self.blocks() {
            match block {
                Ok(block) => document.add_block(block),
                Err(e) if self.options.error_mode == ErrorMode::Lenient => {
                    log::warn!(
                        "{}: body truncated after {} blocks: {}",
                        self.source,
                        document.block_count(),
                        e
                    );
                    document.warnings.push(Warning::TruncatedBody {
                        blocks_read: document.block_count(),
                        reason: e.to_string(),
                    });
                    break;
                }
                Err(e) => return Err(e),
            }
        }

        Ok(document)
    }
}
