//! Media extraction from the package's media directory.

use std::fs;
use std::io::{Cursor, Read, Seek};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use zip::ZipArchive;

use crate::error::Result;
use crate::model::{MediaAsset, MediaStore};
use crate::report::Warning;

use super::options::{MediaValidation, ParseOptions};

/// A media entry that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedMedia {
    /// Entry name inside the package
    pub name: String,
    /// Why validation failed
    pub reason: String,
}

/// Result of scanning the media directory.
#[derive(Debug, Clone, Default)]
pub struct MediaExtraction {
    /// Valid assets in archive order, with dense ordinals
    pub assets: MediaStore,
    /// Entries that were skipped
    pub rejected: Vec<RejectedMedia>,
}

impl MediaExtraction {
    /// Rejections as report warnings.
    pub fn warnings(&self) -> Vec<Warning> {
        self.rejected
            .iter()
            .map(|r| Warning::MalformedMedia {
                name: r.name.clone(),
                reason: r.reason.clone(),
            })
            .collect()
    }

    /// Write every valid asset's bytes into `dir`, returning the written paths.
    pub fn persist_to<P: AsRef<Path>>(&self, dir: P) -> Result<Vec<PathBuf>> {
        persist_assets(&self.assets, dir)
    }
}

/// Write the bytes of every asset in a store into `dir`.
pub fn persist_assets<P: AsRef<Path>>(store: &MediaStore, dir: P) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let mut written = Vec::with_capacity(store.len());
    for asset in store.iter() {
        let path = dir.join(asset.file_name());
        fs::write(&path, &asset.data)?;
        written.push(path);
    }
    Ok(written)
}

/// Read all file entries under the media prefix, in central directory order.
///
/// Entries that cannot be read or fail validation are excluded and do not
/// consume an ordinal.
pub fn extract_media<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    options: &ParseOptions,
) -> Result<MediaExtraction> {
    let mut extraction = MediaExtraction::default();

    for index in 0..archive.len() {
        let Some(name) = archive.name_for_index(index) else {
            continue;
        };
        if name.ends_with('/') || !name.starts_with(&options.media_prefix) {
            continue;
        }
        let name = name.to_string();

        // Unreadable entries (encrypted, unsupported method, bad header)
        // are rejected like invalid images.
        let mut entry = match archive.by_index(index) {
            Ok(entry) => entry,
            Err(e) => {
                reject(&mut extraction, name, e.to_string());
                continue;
            }
        };
        let mut data = Vec::new();
        if let Err(e) = entry.read_to_end(&mut data) {
            reject(&mut extraction, name, e.to_string());
            continue;
        }

        match validate(&data, options.media_validation) {
            Ok((width, height)) => {
                let ordinal = extraction.assets.len();
                extraction
                    .assets
                    .push(MediaAsset::new(ordinal, name, data).with_dimensions(width, height));
            }
            Err(reason) => reject(&mut extraction, name, reason),
        }
    }

    log::debug!(
        "extracted {} media assets ({} rejected)",
        extraction.assets.len(),
        extraction.rejected.len()
    );
    Ok(extraction)
}

fn reject(extraction: &mut MediaExtraction, name: String, reason: String) {
    log::warn!("skipping media {}: {}", name, reason);
    extraction.rejected.push(RejectedMedia { name, reason });
}

/// Check that bytes are a readable image and return its pixel dimensions.
pub fn validate(data: &[u8], mode: MediaValidation) -> std::result::Result<(u32, u32), String> {
    match mode {
        MediaValidation::Decode => {
            let img = image::load_from_memory(data).map_err(|e| e.to_string())?;
            Ok((img.width(), img.height()))
        }
        MediaValidation::Sniff => image::ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| e.to_string())?
            .into_dimensions()
            .map_err(|e| e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::unstable::write::FileOptionsExt;
    use zip::write::SimpleFileOptions;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbImage::new(width, height);
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    fn archive(entries: &[(&str, Vec<u8>)]) -> ZipArchive<Cursor<Vec<u8>>> {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, data) in entries {
            zip.start_file(*name, SimpleFileOptions::default()).unwrap();
            zip.write_all(data).unwrap();
        }
        let bytes = zip.finish().unwrap().into_inner();
        ZipArchive::new(Cursor::new(bytes)).unwrap()
    }

    #[test]
    fn test_extract_in_archive_order() {
        let mut zip = archive(&[
            ("word/media/image2.png", png(4, 2)),
            ("word/document.xml", b"<w:document/>".to_vec()),
            ("word/media/image1.png", png(1, 1)),
        ]);
        let extraction = extract_media(&mut zip, &ParseOptions::default()).unwrap();

        assert_eq!(extraction.assets.len(), 2);
        let first = extraction.assets.get(0).unwrap();
        assert_eq!(first.name, "word/media/image2.png");
        assert_eq!((first.width, first.height), (4, 2));
        assert_eq!(extraction.assets.get(1).unwrap().name, "word/media/image1.png");
    }

    #[test]
    fn test_invalid_media_is_rejected_without_ordinal() {
        let mut zip = archive(&[
            ("word/media/image1.png", png(2, 2)),
            ("word/media/broken.png", b"not an image at all".to_vec()),
            ("word/media/image3.png", png(3, 3)),
        ]);
        let extraction = extract_media(&mut zip, &ParseOptions::default()).unwrap();

        assert_eq!(extraction.assets.len(), 2);
        assert_eq!(extraction.assets.get(1).unwrap().name, "word/media/image3.png");
        assert_eq!(extraction.assets.get(1).unwrap().ordinal, 1);
        assert_eq!(extraction.rejected.len(), 1);
        assert_eq!(extraction.rejected[0].name, "word/media/broken.png");
        assert!(matches!(
            extraction.warnings()[0],
            Warning::MalformedMedia { .. }
        ));
    }

    #[test]
    fn test_unreadable_entry_is_rejected() {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        zip.start_file("word/media/image1.png", SimpleFileOptions::default())
            .unwrap();
        zip.write_all(&png(1, 1)).unwrap();
        zip.start_file(
            "word/media/locked.png",
            SimpleFileOptions::default().with_deprecated_encryption(b"pw"),
        )
        .unwrap();
        zip.write_all(&png(2, 2)).unwrap();
        zip.start_file("word/media/image3.png", SimpleFileOptions::default())
            .unwrap();
        zip.write_all(&png(3, 3)).unwrap();
        let bytes = zip.finish().unwrap().into_inner();
        let mut zip = ZipArchive::new(Cursor::new(bytes)).unwrap();

        let extraction = extract_media(&mut zip, &ParseOptions::default()).unwrap();

        assert_eq!(extraction.assets.len(), 2);
        assert_eq!(extraction.assets.get(1).unwrap().name, "word/media/image3.png");
        assert_eq!(extraction.assets.get(1).unwrap().ordinal, 1);
        assert_eq!(extraction.rejected.len(), 1);
        assert_eq!(extraction.rejected[0].name, "word/media/locked.png");
    }

    #[test]
    fn test_sniff_mode_reads_dimensions() {
        let data = png(7, 3);
        assert_eq!(validate(&data, MediaValidation::Sniff), Ok((7, 3)));
        assert!(validate(b"garbage", MediaValidation::Sniff).is_err());
    }

    #[test]
    fn test_custom_prefix() {
        let mut zip = archive(&[
            ("word/media/image1.png", png(1, 1)),
            ("custom/pic.png", png(1, 1)),
        ]);
        let options = ParseOptions::new().with_media_prefix("custom");
        let extraction = extract_media(&mut zip, &options).unwrap();

        assert_eq!(extraction.assets.len(), 1);
        assert_eq!(extraction.assets.get(0).unwrap().name, "custom/pic.png");
    }

    #[test]
    fn test_persist_to() {
        let mut zip = archive(&[("word/media/image1.png", png(1, 1))]);
        let extraction = extract_media(&mut zip, &ParseOptions::default()).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let written = extraction.persist_to(dir.path().join("images")).unwrap();

        assert_eq!(written.len(), 1);
        assert!(written[0].ends_with("images/image1.png"));
        assert_eq!(fs::read(&written[0]).unwrap(), png(1, 1));
    }
}
