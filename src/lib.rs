//! # solsplit
//!
//! Split marker-delimited solution regions out of DOCX documents.
//!
//! A source document marks regions inline with `<sol_start id=N>` and
//! `<sol_end>`. Each region is written as its own standalone `.docx`,
//! keeping the original order of its paragraphs, tables and images.
//!
//! ## Quick Start
//!
//! ```no_run
//! use solsplit::split_file;
//!
//! fn main() -> solsplit::Result<()> {
//!     let report = split_file("answers.docx", "out")?;
//!     for region in &report.regions {
//!         println!("{} -> {}", region.id, region.path.display());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Streaming body reader**: paragraphs and tables straight from the package XML
//! - **Marker scanner**: one open region at a time, sub-id markers stripped
//! - **Media pairing**: the N-th image anchor gets the N-th valid media asset
//! - **Standalone output**: minimal DOCX packages with inline images
//! - **Structured reports**: recoverable problems as warnings, JSON output
//! - **Parallel batches**: one document per Rayon task

pub mod detect;
pub mod error;
pub mod model;
pub mod parser;
pub mod region;
pub mod report;
pub mod split;
pub mod writer;

// Re-export commonly used types
pub use detect::{detect_format_from_bytes, detect_format_from_path, is_docx, DocxFormat};
pub use error::{Error, Result};
pub use model::{
    Block, Document, MediaAsset, MediaStore, Run, SourceId, Table, TextBlock,
};
pub use parser::{DocxParser, ErrorMode, MediaValidation, ParseOptions};
pub use region::{clean, scan, Region, RegionBlock, RegionScanner};
pub use report::{JsonFormat, SplitReport, SplitStats, Warning, WrittenRegion};
pub use split::{
    collect_docx_files, split_bytes, split_document, split_file, split_file_with_options,
    split_many,
};
pub use writer::{DocxWriter, WriteOptions};

use std::io::Read;
use std::path::{Path, PathBuf};

/// Parse a DOCX file and return a structured document.
///
/// # Example
///
/// ```no_run
/// use solsplit::parse_file;
///
/// let doc = parse_file("answers.docx").unwrap();
/// println!("Blocks: {}", doc.block_count());
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Document> {
    DocxParser::open(path)?.parse()
}

/// Parse a DOCX file with custom options.
///
/// # Example
///
/// ```no_run
/// use solsplit::{parse_file_with_options, ParseOptions};
///
/// let options = ParseOptions::new().lenient();
/// let doc = parse_file_with_options("answers.docx", options).unwrap();
/// ```
pub fn parse_file_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Document> {
    DocxParser::open_with_options(path, options)?.parse()
}

/// Parse a DOCX from bytes.
pub fn parse_bytes(data: &[u8]) -> Result<Document> {
    DocxParser::from_bytes(data)?.parse()
}

/// Parse a DOCX from a reader.
///
/// # Example
///
/// ```no_run
/// use solsplit::parse_reader;
/// use std::fs::File;
///
/// let file = File::open("answers.docx").unwrap();
/// let doc = parse_reader(file).unwrap();
/// ```
pub fn parse_reader<R: Read>(reader: R) -> Result<Document> {
    DocxParser::from_reader(reader)?.parse()
}

/// Scan a DOCX file and return its regions without writing anything.
///
/// # Example
///
/// ```no_run
/// use solsplit::extract_regions;
///
/// let regions = extract_regions("answers.docx").unwrap();
/// for region in &regions {
///     println!("{}: {:?}", region.id, region.paragraphs());
/// }
/// ```
pub fn extract_regions<P: AsRef<Path>>(path: P) -> Result<Vec<Region>> {
    let doc = parse_file(path)?;
    Ok(scan(&doc).0)
}

/// Builder for splitting DOCX documents.
///
/// # Example
///
/// ```no_run
/// use solsplit::Solsplit;
///
/// let report = Solsplit::new()
///     .lenient()
///     .with_captions(false)
///     .with_image_width(3.0)
///     .split_file("answers.docx", "out")?;
/// println!("{} regions", report.regions_written());
/// # Ok::<(), solsplit::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Solsplit {
    parse_options: ParseOptions,
    write_options: WriteOptions,
}

impl Solsplit {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep the blocks read before malformed body XML.
    pub fn lenient(mut self) -> Self {
        self.parse_options = self.parse_options.lenient();
        self
    }

    /// Set how media entries are validated.
    pub fn with_media_validation(mut self, validation: MediaValidation) -> Self {
        self.parse_options = self.parse_options.with_media_validation(validation);
        self
    }

    /// Set the package directory searched for media.
    pub fn with_media_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.parse_options = self.parse_options.with_media_prefix(prefix);
        self
    }

    /// Set the image display width in inches.
    pub fn with_image_width(mut self, inches: f64) -> Self {
        self.write_options = self.write_options.with_image_width(inches);
        self
    }

    /// Enable or disable the `Image: {name}` caption before each image (on by default).
    pub fn with_captions(mut self, captions: bool) -> Self {
        self.write_options = self.write_options.with_captions(captions);
        self
    }

    /// Enable or disable the `images/` dump.
    pub fn with_saved_images(mut self, save: bool) -> Self {
        self.write_options = self.write_options.with_saved_images(save);
        self
    }

    /// Set the placeholder text for missing images.
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.write_options = self.write_options.with_placeholder(placeholder);
        self
    }

    /// Write artifacts straight into the output root.
    pub fn flat(mut self) -> Self {
        self.write_options = self.write_options.flat();
        self
    }

    /// Parse options in effect.
    pub fn parse_options(&self) -> &ParseOptions {
        &self.parse_options
    }

    /// Write options in effect.
    pub fn write_options(&self) -> &WriteOptions {
        &self.write_options
    }

    /// Parse a file without splitting it.
    pub fn parse<P: AsRef<Path>>(&self, path: P) -> Result<Document> {
        DocxParser::open_with_options(path, self.parse_options.clone())?.parse()
    }

    /// Split one file.
    pub fn split_file<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        path: P,
        output_root: Q,
    ) -> Result<SplitReport> {
        split_file_with_options(path, output_root, &self.parse_options, &self.write_options)
    }

    /// Split a document held in memory.
    pub fn split_bytes<Q: AsRef<Path>>(
        &self,
        data: &[u8],
        base_name: &str,
        output_root: Q,
    ) -> Result<SplitReport> {
        split_bytes(
            data,
            base_name,
            output_root,
            &self.parse_options,
            &self.write_options,
        )
    }

    /// Split several files in parallel.
    pub fn split_many<Q: AsRef<Path> + Sync>(
        &self,
        paths: &[PathBuf],
        output_root: Q,
    ) -> Vec<(PathBuf, Result<SplitReport>)> {
        split_many(paths, output_root, &self.parse_options, &self.write_options)
    }
}
