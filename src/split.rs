//! Per-document split pipeline.
//!
//! Loads a document, scans its regions, and writes one artifact per region
//! under `{output_root}/{base_name}/`, together with an `images/` directory
//! holding every valid media asset. Problems confined to one region or one
//! asset are collected in the [`SplitReport`]; only problems with the
//! document as a whole are returned as errors.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::detect::has_docx_extension;
use crate::error::Result;
use crate::model::{Document, SourceId};
use crate::parser::{persist_assets, DocxParser, ParseOptions};
use crate::region::{Region, RegionBlock, RegionScanner};
use crate::report::{SplitReport, SplitStats, Warning, WrittenRegion};
use crate::writer::{ArtifactNamer, DocxWriter, WriteOptions};

/// Directory, inside a document's output directory, that receives its media.
pub const IMAGES_DIR: &str = "images";

/// Split an already parsed document into region artifacts.
pub fn split_document<P: AsRef<Path>>(
    document: &Document,
    output_root: P,
    options: &WriteOptions,
) -> Result<SplitReport> {
    let output_root = output_root.as_ref();
    let output_dir = if options.per_document_dir {
        output_root.join(&document.source.base_name)
    } else {
        output_root.to_path_buf()
    };

    let mut report = SplitReport::new(document.source.clone(), &output_dir);
    report.warnings.extend(document.warnings.iter().cloned());
    report.stats = document_stats(document);

    fs::create_dir_all(&output_dir)?;
    if options.save_images && !document.media.is_empty() {
        persist_assets(&document.media, output_dir.join(IMAGES_DIR))?;
    }

    let writer = DocxWriter::new(options.clone());
    let mut namer = ArtifactNamer::new();
    let mut scanner = RegionScanner::new(document.blocks(), document.media.clone());

    while let Some(region) = scanner.next() {
        report.warnings.extend(scanner.take_warnings());
        count_region(&mut report.stats, &region);

        let name = namer.name(&region.id);
        if name.duplicate {
            let warning = Warning::DuplicateRegionId {
                id: region.id.clone(),
                file_name: name.file_name.clone(),
            };
            log::warn!("{}: {}", document.source, warning);
            report.warnings.push(warning);
        }

        let path = output_dir.join(&name.file_name);
        match writer.write_to(&region, &path) {
            Ok(()) => report.regions.push(WrittenRegion {
                id: region.id.clone(),
                path,
                block_count: region.blocks.len(),
                image_count: region.image_count(),
                terminated: region.terminated,
            }),
            Err(e) => {
                let warning = Warning::WriteFailed {
                    id: region.id.clone(),
                    reason: e.to_string(),
                };
                log::warn!("{}: {}", document.source, warning);
                report.warnings.push(warning);
            }
        }
    }
    report.warnings.extend(scanner.take_warnings());

    log::info!(
        "{}: {} regions written, {} warnings",
        document.source,
        report.regions_written(),
        report.warnings.len()
    );
    Ok(report)
}

/// Split a DOCX file with default options.
pub fn split_file<P: AsRef<Path>, Q: AsRef<Path>>(path: P, output_root: Q) -> Result<SplitReport> {
    split_file_with_options(
        path,
        output_root,
        &ParseOptions::default(),
        &WriteOptions::default(),
    )
}

/// Split a DOCX file with custom options.
pub fn split_file_with_options<P: AsRef<Path>, Q: AsRef<Path>>(
    path: P,
    output_root: Q,
    parse_options: &ParseOptions,
    write_options: &WriteOptions,
) -> Result<SplitReport> {
    let document = DocxParser::open_with_options(path, parse_options.clone())?.parse()?;
    split_document(&document, output_root, write_options)
}

/// Split a DOCX held in memory. `base_name` names the output directory.
pub fn split_bytes<Q: AsRef<Path>>(
    data: &[u8],
    base_name: &str,
    output_root: Q,
    parse_options: &ParseOptions,
    write_options: &WriteOptions,
) -> Result<SplitReport> {
    let document = DocxParser::from_bytes_with_options(data, parse_options.clone())?
        .with_source(SourceId::named(base_name))
        .parse()?;
    split_document(&document, output_root, write_options)
}

/// Split several files in parallel, one document per task.
///
/// Each document succeeds or fails on its own; results keep the input order.
pub fn split_many<Q: AsRef<Path> + Sync>(
    paths: &[PathBuf],
    output_root: Q,
    parse_options: &ParseOptions,
    write_options: &WriteOptions,
) -> Vec<(PathBuf, Result<SplitReport>)> {
    paths
        .par_iter()
        .map(|path| {
            let result =
                split_file_with_options(path, output_root.as_ref(), parse_options, write_options);
            if let Err(e) = &result {
                log::error!("{}: {}", path.display(), e);
            }
            (path.clone(), result)
        })
        .collect()
}

/// List the `.docx` files directly inside `dir`, sorted by name.
///
/// Word lock files (`~$name.docx`) are skipped.
pub fn collect_docx_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_lock_file = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.starts_with("~$"))
            .unwrap_or(false);
        if path.is_file() && has_docx_extension(&path) && !is_lock_file {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn document_stats(document: &Document) -> SplitStats {
    let rejected = document
        .warnings
        .iter()
        .filter(|w| matches!(w, Warning::MalformedMedia { .. }))
        .count();
    SplitStats {
        block_count: document.block_count() as u32,
        anchor_count: document.anchor_count() as u32,
        media_count: document.media.len() as u32,
        media_rejected: rejected as u32,
        ..Default::default()
    }
}

fn count_region(stats: &mut SplitStats, region: &Region) {
    stats.add_region();
    for block in &region.blocks {
        match block {
            RegionBlock::Paragraph { .. } => stats.add_paragraph(),
            RegionBlock::Table(_) => stats.add_table(),
            RegionBlock::Image(_) => stats.add_image(),
            RegionBlock::MissingImage { .. } => stats.add_missing_image(),
        }
    }
}
