//! Standalone DOCX output for one region.
//!
//! Each artifact is a minimal WordprocessingML package: content types,
//! package and document relationships, core properties, the main document
//! part and the media it references.

use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;
use std::sync::Arc;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::Result;
use crate::model::{MediaAsset, Table};
use crate::region::{Region, RegionBlock};

use super::options::WriteOptions;

/// English Metric Units per inch.
pub const EMU_PER_INCH: f64 = 914_400.0;

const NS_W: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_WP: &str = "http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing";
const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const NS_PIC: &str = "http://schemas.openxmlformats.org/drawingml/2006/picture";
const NS_RELS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const NS_CONTENT_TYPES: &str = "http://schemas.openxmlformats.org/package/2006/content-types";

const REL_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
const REL_CORE_PROPERTIES: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
const REL_IMAGE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";

const CT_MAIN: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";
const CT_CORE: &str = "application/vnd.openxmlformats-package.core-properties+xml";
const CT_RELS: &str = "application/vnd.openxmlformats-package.relationships+xml";

type XmlWriter = Writer<Cursor<Vec<u8>>>;

/// An image as stored in the output package.
struct PackagedImage {
    rel_id: String,
    target: String,
    asset: Arc<MediaAsset>,
}

/// Writes regions as standalone `.docx` packages.
#[derive(Debug, Clone, Default)]
pub struct DocxWriter {
    options: WriteOptions,
}

impl DocxWriter {
    /// Create a writer.
    pub fn new(options: WriteOptions) -> Self {
        Self { options }
    }

    /// Output options.
    pub fn options(&self) -> &WriteOptions {
        &self.options
    }

    /// Write a region to `path`, creating parent directories.
    pub fn write_to<P: AsRef<Path>>(&self, region: &Region, path: P) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.to_bytes(region)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, bytes)?;
        log::info!("wrote region {} to {}", region.id, path.display());
        Ok(())
    }

    /// Serialize a region into the bytes of a `.docx` package.
    pub fn to_bytes(&self, region: &Region) -> Result<Vec<u8>> {
        let images: Vec<PackagedImage> = region
            .blocks
            .iter()
            .filter_map(|block| match block {
                RegionBlock::Image(asset) => Some(asset.clone()),
                _ => None,
            })
            .enumerate()
            .map(|(i, asset)| PackagedImage {
                rel_id: format!("rId{}", i + 1),
                target: format!("media/image{}.{}", i + 1, asset.extension()),
                asset,
            })
            .collect();

        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

        zip.start_file("[Content_Types].xml", options)?;
        zip.write_all(&content_types(&images)?)?;

        zip.start_file("_rels/.rels", options)?;
        zip.write_all(&package_relationships()?)?;

        zip.start_file("docProps/core.xml", options)?;
        zip.write_all(&core_properties(region)?)?;

        zip.start_file("word/document.xml", options)?;
        zip.write_all(&self.document(region, &images)?)?;

        zip.start_file("word/_rels/document.xml.rels", options)?;
        zip.write_all(&document_relationships(&images)?)?;

        for image in &images {
            zip.start_file(format!("word/{}", image.target), options)?;
            zip.write_all(&image.asset.data)?;
        }

        Ok(zip.finish()?.into_inner())
    }

    fn document(&self, region: &Region, images: &[PackagedImage]) -> Result<Vec<u8>> {
        let mut w = xml_writer()?;
        start(
            &mut w,
            "w:document",
            &[
                ("xmlns:w", NS_W),
                ("xmlns:r", NS_R),
                ("xmlns:wp", NS_WP),
                ("xmlns:a", NS_A),
                ("xmlns:pic", NS_PIC),
            ],
        )?;
        start(&mut w, "w:body", &[])?;

        let mut images = images.iter();
        for block in &region.blocks {
            match block {
                RegionBlock::Paragraph { text } => write_paragraph(&mut w, text)?,
                RegionBlock::Table(table) => write_table(&mut w, table)?,
                RegionBlock::Image(_) => {
                    if let Some(image) = images.next() {
                        if self.options.image_captions {
                            let caption = format!("Image: {}", image.asset.file_name());
                            write_paragraph(&mut w, &caption)?;
                        }
                        self.write_image(&mut w, image)?;
                    }
                }
                RegionBlock::MissingImage { .. } => {
                    write_paragraph(&mut w, &self.options.placeholder)?
                }
            }
        }

        write_section_properties(&mut w)?;
        end(&mut w, "w:body")?;
        end(&mut w, "w:document")?;
        Ok(w.into_inner().into_inner())
    }

    fn write_image(&self, w: &mut XmlWriter, image: &PackagedImage) -> Result<()> {
        let (cx, cy) = self.extent(&image.asset);
        let (cx, cy) = (cx.to_string(), cy.to_string());
        let doc_pr_id = image.rel_id.trim_start_matches("rId").to_string();
        let picture_name = format!("Picture {}", doc_pr_id);
        let name = image.asset.file_name();

        start(w, "w:p", &[])?;
        start(w, "w:r", &[])?;
        start(w, "w:drawing", &[])?;
        start(
            w,
            "wp:inline",
            &[("distT", "0"), ("distB", "0"), ("distL", "0"), ("distR", "0")],
        )?;
        empty(w, "wp:extent", &[("cx", cx.as_str()), ("cy", cy.as_str())])?;
        empty(
            w,
            "wp:docPr",
            &[("id", doc_pr_id.as_str()), ("name", picture_name.as_str())],
        )?;
        start(w, "wp:cNvGraphicFramePr", &[])?;
        empty(w, "a:graphicFrameLocks", &[("noChangeAspect", "1")])?;
        end(w, "wp:cNvGraphicFramePr")?;

        start(w, "a:graphic", &[])?;
        start(w, "a:graphicData", &[("uri", NS_PIC)])?;
        start(w, "pic:pic", &[])?;

        start(w, "pic:nvPicPr", &[])?;
        empty(w, "pic:cNvPr", &[("id", "0"), ("name", name)])?;
        empty(w, "pic:cNvPicPr", &[])?;
        end(w, "pic:nvPicPr")?;

        start(w, "pic:blipFill", &[])?;
        empty(w, "a:blip", &[("r:embed", image.rel_id.as_str())])?;
        start(w, "a:stretch", &[])?;
        empty(w, "a:fillRect", &[])?;
        end(w, "a:stretch")?;
        end(w, "pic:blipFill")?;

        start(w, "pic:spPr", &[])?;
        start(w, "a:xfrm", &[])?;
        empty(w, "a:off", &[("x", "0"), ("y", "0")])?;
        empty(w, "a:ext", &[("cx", cx.as_str()), ("cy", cy.as_str())])?;
        end(w, "a:xfrm")?;
        start(w, "a:prstGeom", &[("prst", "rect")])?;
        empty(w, "a:avLst", &[])?;
        end(w, "a:prstGeom")?;
        end(w, "pic:spPr")?;

        end(w, "pic:pic")?;
        end(w, "a:graphicData")?;
        end(w, "a:graphic")?;
        end(w, "wp:inline")?;
        end(w, "w:drawing")?;
        end(w, "w:r")?;
        end(w, "w:p")?;
        Ok(())
    }

    /// Display size in EMU: configured width, height from the aspect ratio.
    fn extent(&self, asset: &MediaAsset) -> (i64, i64) {
        let cx = self.options.image_width_inches * EMU_PER_INCH;
        let cy = cx * asset.aspect_ratio();
        (cx.round() as i64, cy.round() as i64)
    }
}

fn xml_writer() -> Result<XmlWriter> {
    let mut w = Writer::new(Cursor::new(Vec::new()));
    w.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
    Ok(w)
}

fn start(w: &mut XmlWriter, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
    let elem = BytesStart::new(name).with_attributes(attrs.iter().copied());
    w.write_event(Event::Start(elem))?;
    Ok(())
}

fn empty(w: &mut XmlWriter, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
    let elem = BytesStart::new(name).with_attributes(attrs.iter().copied());
    w.write_event(Event::Empty(elem))?;
    Ok(())
}

fn end(w: &mut XmlWriter, name: &str) -> Result<()> {
    w.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn text_element(w: &mut XmlWriter, name: &str, attrs: &[(&str, &str)], text: &str) -> Result<()> {
    start(w, name, attrs)?;
    w.write_event(Event::Text(BytesText::new(text)))?;
    end(w, name)
}

/// A paragraph with one run; tabs and newlines become `w:tab` and `w:br`.
fn write_paragraph(w: &mut XmlWriter, text: &str) -> Result<()> {
    if text.is_empty() {
        return empty(w, "w:p", &[]);
    }

    start(w, "w:p", &[])?;
    start(w, "w:r", &[])?;
    let mut segment = String::new();
    for ch in text.chars() {
        match ch {
            '\t' | '\n' => {
                if !segment.is_empty() {
                    text_element(w, "w:t", &[("xml:space", "preserve")], &segment)?;
                    segment.clear();
                }
                empty(w, if ch == '\t' { "w:tab" } else { "w:br" }, &[])?;
            }
            '\r' => {}
            _ => segment.push(ch),
        }
    }
    if !segment.is_empty() {
        text_element(w, "w:t", &[("xml:space", "preserve")], &segment)?;
    }
    end(w, "w:r")?;
    end(w, "w:p")
}

fn write_table(w: &mut XmlWriter, table: &Table) -> Result<()> {
    let columns = table.column_count();
    if columns == 0 {
        return empty(w, "w:p", &[]);
    }

    start(w, "w:tbl", &[])?;
    start(w, "w:tblPr", &[])?;
    empty(w, "w:tblW", &[("w:w", "0"), ("w:type", "auto")])?;
    start(w, "w:tblBorders", &[])?;
    for side in ["w:top", "w:left", "w:bottom", "w:right", "w:insideH", "w:insideV"] {
        empty(
            w,
            side,
            &[
                ("w:val", "single"),
                ("w:sz", "4"),
                ("w:space", "0"),
                ("w:color", "auto"),
            ],
        )?;
    }
    end(w, "w:tblBorders")?;
    end(w, "w:tblPr")?;

    start(w, "w:tblGrid", &[])?;
    for _ in 0..columns {
        empty(w, "w:gridCol", &[])?;
    }
    end(w, "w:tblGrid")?;

    for row in 0..table.row_count() {
        start(w, "w:tr", &[])?;
        for col in 0..columns {
            start(w, "w:tc", &[])?;
            start(w, "w:tcPr", &[])?;
            empty(w, "w:tcW", &[("w:w", "0"), ("w:type", "auto")])?;
            end(w, "w:tcPr")?;
            for line in table.cell(row, col).unwrap_or("").split('\n') {
                write_paragraph(w, line)?;
            }
            end(w, "w:tc")?;
        }
        end(w, "w:tr")?;
    }

    end(w, "w:tbl")
}

fn write_section_properties(w: &mut XmlWriter) -> Result<()> {
    start(w, "w:sectPr", &[])?;
    empty(w, "w:pgSz", &[("w:w", "11906"), ("w:h", "16838")])?;
    empty(
        w,
        "w:pgMar",
        &[
            ("w:top", "1440"),
            ("w:right", "1440"),
            ("w:bottom", "1440"),
            ("w:left", "1440"),
            ("w:header", "708"),
            ("w:footer", "708"),
            ("w:gutter", "0"),
        ],
    )?;
    end(w, "w:sectPr")
}

fn content_types(images: &[PackagedImage]) -> Result<Vec<u8>> {
    let mut w = xml_writer()?;
    start(&mut w, "Types", &[("xmlns", NS_CONTENT_TYPES)])?;
    empty(
        &mut w,
        "Default",
        &[("Extension", "rels"), ("ContentType", CT_RELS)],
    )?;
    empty(
        &mut w,
        "Default",
        &[("Extension", "xml"), ("ContentType", "application/xml")],
    )?;

    let mut seen: Vec<&str> = Vec::new();
    for image in images {
        let ext = image.asset.extension();
        if seen.contains(&ext) {
            continue;
        }
        seen.push(ext);
        empty(
            &mut w,
            "Default",
            &[("Extension", ext), ("ContentType", image.asset.mime_type.as_str())],
        )?;
    }

    empty(
        &mut w,
        "Override",
        &[("PartName", "/word/document.xml"), ("ContentType", CT_MAIN)],
    )?;
    empty(
        &mut w,
        "Override",
        &[("PartName", "/docProps/core.xml"), ("ContentType", CT_CORE)],
    )?;
    end(&mut w, "Types")?;
    Ok(w.into_inner().into_inner())
}

fn package_relationships() -> Result<Vec<u8>> {
    let mut w = xml_writer()?;
    start(&mut w, "Relationships", &[("xmlns", NS_RELS)])?;
    empty(
        &mut w,
        "Relationship",
        &[
            ("Id", "rId1"),
            ("Type", REL_OFFICE_DOCUMENT),
            ("Target", "word/document.xml"),
        ],
    )?;
    empty(
        &mut w,
        "Relationship",
        &[
            ("Id", "rId2"),
            ("Type", REL_CORE_PROPERTIES),
            ("Target", "docProps/core.xml"),
        ],
    )?;
    end(&mut w, "Relationships")?;
    Ok(w.into_inner().into_inner())
}

fn document_relationships(images: &[PackagedImage]) -> Result<Vec<u8>> {
    let mut w = xml_writer()?;
    start(&mut w, "Relationships", &[("xmlns", NS_RELS)])?;
    for image in images {
        empty(
            &mut w,
            "Relationship",
            &[
                ("Id", image.rel_id.as_str()),
                ("Type", REL_IMAGE),
                ("Target", image.target.as_str()),
            ],
        )?;
    }
    end(&mut w, "Relationships")?;
    Ok(w.into_inner().into_inner())
}

fn core_properties(region: &Region) -> Result<Vec<u8>> {
    let now = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();
    let title = format!("section {}", region.id);

    let mut w = xml_writer()?;
    start(
        &mut w,
        "cp:coreProperties",
        &[
            (
                "xmlns:cp",
                "http://schemas.openxmlformats.org/package/2006/metadata/core-properties",
            ),
            ("xmlns:dc", "http://purl.org/dc/elements/1.1/"),
            ("xmlns:dcterms", "http://purl.org/dc/terms/"),
            ("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"),
        ],
    )?;
    text_element(&mut w, "dc:title", &[], &title)?;
    text_element(&mut w, "dc:creator", &[], env!("CARGO_PKG_NAME"))?;
    let dated = [("xsi:type", "dcterms:W3CDTF")];
    text_element(&mut w, "dcterms:created", &dated, &now)?;
    text_element(&mut w, "dcterms:modified", &dated, &now)?;
    end(&mut w, "cp:coreProperties")?;
    Ok(w.into_inner().into_inner())
}
