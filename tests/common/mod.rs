//! Shared fixtures: DOCX packages built in memory.

#![allow(dead_code)]

use std::io::{Cursor, Write};

use zip::unstable::write::FileOptionsExt;
use zip::write::SimpleFileOptions;

/// Body content of a fixture document.
pub enum Part<'a> {
    /// A paragraph with one text run
    Text(&'a str),
    /// A paragraph of text runs and drawings; `None` is a drawing
    Mixed(Vec<Option<&'a str>>),
    /// A table of plain text cells
    Table(Vec<Vec<&'a str>>),
}

/// Builder for fixture packages.
#[derive(Default)]
pub struct DocxFixture<'a> {
    parts: Vec<Part<'a>>,
    media: Vec<(String, Vec<u8>, bool)>,
}

impl<'a> DocxFixture<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, text: &'a str) -> Self {
        self.parts.push(Part::Text(text));
        self
    }

    pub fn mixed(mut self, runs: Vec<Option<&'a str>>) -> Self {
        self.parts.push(Part::Mixed(runs));
        self
    }

    pub fn table(mut self, rows: Vec<Vec<&'a str>>) -> Self {
        self.parts.push(Part::Table(rows));
        self
    }

    pub fn media(mut self, name: &str, data: Vec<u8>) -> Self {
        self.media.push((format!("word/media/{}", name), data, false));
        self
    }

    /// A media entry stored with legacy zip encryption, unreadable without a password.
    pub fn encrypted_media(mut self, name: &str, data: Vec<u8>) -> Self {
        self.media.push((format!("word/media/{}", name), data, true));
        self
    }

    pub fn document_xml(&self) -> String {
        let mut body = String::new();
        for part in &self.parts {
            match part {
                Part::Text(text) => body.push_str(&paragraph(&[Some(text)])),
                Part::Mixed(runs) => body.push_str(&paragraph(runs)),
                Part::Table(rows) => {
                    body.push_str("<w:tbl>");
                    for row in rows {
                        body.push_str("<w:tr>");
                        for cell in row {
                            body.push_str("<w:tc>");
                            body.push_str(&paragraph(&[Some(cell)]));
                            body.push_str("</w:tc>");
                        }
                        body.push_str("</w:tr>");
                    }
                    body.push_str("</w:tbl>");
                }
            }
        }
        format!(
            concat!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
                r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" "#,
                r#"xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing">"#,
                r#"<w:body>{}<w:sectPr/></w:body></w:document>"#
            ),
            body
        )
    }

    pub fn build(&self) -> Vec<u8> {
        let options = SimpleFileOptions::default();
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));

        zip.start_file("_rels/.rels", options).unwrap();
        zip.write_all(ROOT_RELS.as_bytes()).unwrap();
        zip.start_file("word/document.xml", options).unwrap();
        zip.write_all(self.document_xml().as_bytes()).unwrap();
        for (name, data, encrypted) in &self.media {
            let entry_options = if *encrypted {
                options.with_deprecated_encryption(b"secret")
            } else {
                options
            };
            zip.start_file(name.as_str(), entry_options).unwrap();
            zip.write_all(data).unwrap();
        }
        zip.finish().unwrap().into_inner()
    }
}

const ROOT_RELS: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>"#,
    r#"</Relationships>"#
);

fn paragraph(runs: &[Option<&str>]) -> String {
    let mut xml = String::from("<w:p>");
    for run in runs {
        match run {
            Some(text) => xml.push_str(&format!(
                r#"<w:r><w:t xml:space="preserve">{}</w:t></w:r>"#,
                escape(text)
            )),
            None => xml.push_str(
                r#"<w:r><w:drawing><wp:inline><wp:extent cx="914400" cy="914400"/></wp:inline></w:drawing></w:r>"#,
            ),
        }
    }
    xml.push_str("</w:p>");
    xml
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// A valid PNG of the given size.
pub fn png(width: u32, height: u32) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    image::RgbImage::new(width, height)
        .write_to(&mut out, image::ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

/// Bytes that carry a PNG signature but no image.
pub fn broken_png() -> Vec<u8> {
    let mut data = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    data.extend_from_slice(b"truncated");
    data
}
