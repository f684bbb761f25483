//! DOCX format detection and validation.

use crate::error::{Error, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;
use zip::ZipArchive;

/// Package format information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocxFormat {
    /// Path of the main document part inside the package
    pub main_part: String,
    /// Number of entries in the package
    pub entry_count: usize,
}

impl std::fmt::Display for DocxFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DOCX ({} entries)", self.entry_count)
    }
}

/// Zip local file header magic: PK\x03\x04
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

/// Conventional location of the main document part.
pub const DEFAULT_MAIN_PART: &str = "word/document.xml";

/// Package relationships part.
const PACKAGE_RELS: &str = "_rels/.rels";

/// Relationship type suffix of the main document part.
const OFFICE_DOCUMENT_REL: &str = "/officeDocument";

/// Check whether bytes start with a zip local file header.
pub fn has_zip_magic(data: &[u8]) -> bool {
    data.starts_with(ZIP_MAGIC)
}

/// Detect a DOCX package from a file path.
///
/// # Example
/// ```no_run
/// use solsplit::detect::detect_format_from_path;
///
/// let format = detect_format_from_path("answers.docx").unwrap();
/// println!("main part: {}", format.main_part);
/// ```
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<DocxFormat> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    detect_format_from_bytes(&data)
}

/// Detect a DOCX package from its full bytes.
///
/// # Returns
/// * `Ok(DocxFormat)` if the data is a zip containing `word/document.xml`
/// * `Err(Error::UnknownFormat)` if the data is not a zip
/// * `Err(Error::MissingPart)` if the zip has no main document part
pub fn detect_format_from_bytes(data: &[u8]) -> Result<DocxFormat> {
    if !has_zip_magic(data) {
        return Err(Error::UnknownFormat);
    }

    let mut archive = ZipArchive::new(Cursor::new(data)).map_err(|_| Error::UnknownFormat)?;
    let entry_count = archive.len();
    let main_part = resolve_main_part(&mut archive)?;

    Ok(DocxFormat {
        main_part,
        entry_count,
    })
}

/// Find the main document part of an open package.
///
/// The target of the `officeDocument` relationship in `_rels/.rels` wins;
/// packages without usable relationships fall back to `word/document.xml`.
pub fn resolve_main_part<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<String> {
    if let Some(target) = office_document_target(archive) {
        if archive.index_for_name(&target).is_some() {
            return Ok(target);
        }
        log::debug!("officeDocument target {} not in package", target);
    }

    if archive.index_for_name(DEFAULT_MAIN_PART).is_some() {
        Ok(DEFAULT_MAIN_PART.to_string())
    } else {
        Err(Error::MissingPart(DEFAULT_MAIN_PART.to_string()))
    }
}

fn office_document_target<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Option<String> {
    let mut xml = String::new();
    archive
        .by_name(PACKAGE_RELS)
        .ok()?
        .read_to_string(&mut xml)
        .ok()?;

    let mut reader = Reader::from_str(&xml);
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e))
                if e.local_name().as_ref() == b"Relationship" =>
            {
                let mut rel_type = None;
                let mut target = None;
                for attr in e.attributes().flatten() {
                    let value = attr.unescape_value().ok()?.into_owned();
                    match attr.key.local_name().as_ref() {
                        b"Type" => rel_type = Some(value),
                        b"Target" => target = Some(value),
                        _ => {}
                    }
                }
                if let (Some(t), Some(target)) = (rel_type, target) {
                    if t.ends_with(OFFICE_DOCUMENT_REL) {
                        return Some(target.trim_start_matches('/').to_string());
                    }
                }
            }
            Ok(Event::Eof) | Err(_) => return None,
            _ => {}
        }
    }
}

/// Check if a file is a DOCX package.
pub fn is_docx<P: AsRef<Path>>(path: P) -> bool {
    detect_format_from_path(path).is_ok()
}

/// Check if bytes represent a DOCX package.
pub fn is_docx_bytes(data: &[u8]) -> bool {
    detect_format_from_bytes(data).is_ok()
}

/// Check whether a path has a `.docx` extension (case-insensitive).
pub fn has_docx_extension<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("docx"))
        .unwrap_or(false)
}
