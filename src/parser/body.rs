//! Streaming reader for the main document part.
//!
//! Turns `word/document.xml` into an ordered sequence of [`Block`]s without
//! building a DOM. Only body-level paragraphs and tables become blocks;
//! block-level content controls are flattened into the body.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{Error, Result};
use crate::model::{Block, Table, TextBlock};

/// Largest horizontal span honoured for a merged cell.
const MAX_GRID_SPAN: usize = 63;

/// Lazy iterator over the blocks of a document body.
///
/// A new stream over the same XML starts again from the first block.
/// After the first error the stream ends.
pub struct BlockStream<'a> {
    reader: Reader<&'a [u8]>,
    in_body: bool,
    finished: bool,
}

impl<'a> BlockStream<'a> {
    /// Create a stream over the XML of a main document part.
    pub fn new(xml: &'a str) -> Self {
        let mut reader = Reader::from_str(xml);
        reader.trim_text(false);
        Self {
            reader,
            in_body: false,
            finished: false,
        }
    }

    fn next_block(&mut self) -> Result<Option<Block>> {
        loop {
            match self.reader.read_event()? {
                Event::Start(e) => match e.local_name().as_ref() {
                    b"body" => self.in_body = true,
                    _ if !self.in_body => {}
                    b"p" => return read_paragraph(&mut self.reader).map(|p| Some(Block::Text(p))),
                    b"tbl" => return read_table(&mut self.reader).map(|t| Some(Block::Table(t))),
                    b"sdt" | b"sdtContent" | b"customXml" => {}
                    _ => {
                        self.reader.read_to_end(e.name())?;
                    }
                },
                Event::Empty(e) if self.in_body && e.local_name().as_ref() == b"p" => {
                    return Ok(Some(Block::Text(TextBlock::new())));
                }
                Event::End(e) if e.local_name().as_ref() == b"body" => return Ok(None),
                Event::Eof if self.in_body => {
                    return Err(Error::Xml("unexpected end of document body".to_string()))
                }
                Event::Eof => return Ok(None),
                _ => {}
            }
        }
    }
}

impl Iterator for BlockStream<'_> {
    type Item = Result<Block>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.next_block() {
            Ok(Some(block)) => Some(Ok(block)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

/// Read a paragraph whose start tag was just consumed.
fn read_paragraph(reader: &mut Reader<&[u8]>) -> Result<TextBlock> {
    let mut block = TextBlock::new();
    let mut in_text = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"t" => in_text = true,
                b"tab" => block.push_text("\t"),
                b"br" | b"cr" => block.push_text("\n"),
                b"drawing" | b"pict" => {
                    block.push_media();
                    reader.read_to_end(e.name())?;
                }
                // Properties carry tab stops; Fallback duplicates the Choice branch.
                b"pPr" | b"rPr" | b"Fallback" | b"delText" | b"instrText" => {
                    reader.read_to_end(e.name())?;
                }
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"tab" => block.push_text("\t"),
                b"br" | b"cr" => block.push_text("\n"),
                b"drawing" | b"pict" => block.push_media(),
                _ => {}
            },
            Event::Text(t) if in_text => block.push_text(t.unescape()?.into_owned()),
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => return Ok(block),
                _ => {}
            },
            Event::Eof => return Err(Error::Xml("unexpected end inside paragraph".to_string())),
            _ => {}
        }
    }
}

/// Read a table whose start tag was just consumed.
fn read_table(reader: &mut Reader<&[u8]>) -> Result<Table> {
    let mut table = Table::new();
    let mut row: Option<Vec<String>> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"tr" => row = Some(Vec::new()),
                b"tc" => {
                    let cell = read_cell(reader)?;
                    table.media_refs += cell.media;
                    if let Some(row) = row.as_mut() {
                        row.extend(std::iter::repeat(cell.text).take(cell.span));
                    }
                }
                b"tblPr" | b"tblGrid" | b"trPr" | b"tblPrEx" | b"sdtPr" => {
                    reader.read_to_end(e.name())?;
                }
                _ => {}
            },
            Event::End(e) => match e.local_name().as_ref() {
                b"tr" => {
                    if let Some(row) = row.take() {
                        table.add_row(row);
                    }
                }
                b"tbl" => {
                    table.normalize();
                    return Ok(table);
                }
                _ => {}
            },
            Event::Eof => return Err(Error::Xml("unexpected end inside table".to_string())),
            _ => {}
        }
    }
}

struct Cell {
    text: String,
    span: usize,
    media: usize,
}

fn read_cell(reader: &mut Reader<&[u8]>) -> Result<Cell> {
    let mut lines = Vec::new();
    let mut span = 1;
    let mut media = 0;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"p" => {
                    let paragraph = read_paragraph(reader)?;
                    media += paragraph.media_count();
                    lines.push(paragraph.content());
                }
                b"tbl" => {
                    let nested = read_table(reader)?;
                    media += nested.media_refs;
                    lines.push(nested.plain_text());
                }
                b"tcPr" => span = read_cell_span(reader)?,
                _ => {}
            },
            Event::Empty(e) if e.local_name().as_ref() == b"p" => lines.push(String::new()),
            Event::End(e) if e.local_name().as_ref() == b"tc" => {
                return Ok(Cell {
                    text: lines.join("\n"),
                    span,
                    media,
                });
            }
            Event::Eof => return Err(Error::Xml("unexpected end inside table cell".to_string())),
            _ => {}
        }
    }
}

fn read_cell_span(reader: &mut Reader<&[u8]>) -> Result<usize> {
    let mut span = 1;
    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"gridSpan" => {
                if let Some(value) = attr_value(&e, b"val")? {
                    span = value.trim().parse::<usize>().unwrap_or(1).clamp(1, MAX_GRID_SPAN);
                }
            }
            Event::End(e) if e.local_name().as_ref() == b"tcPr" => return Ok(span),
            Event::Eof => return Err(Error::Xml("unexpected end inside cell properties".to_string())),
            _ => {}
        }
    }
}

fn attr_value(e: &BytesStart<'_>, key: &[u8]) -> Result<Option<String>> {
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.local_name().as_ref() == key {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Run;

    fn doc(body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}<w:sectPr><w:pgSz w:w="11906"/></w:sectPr></w:body></w:document>"#,
            body
        )
    }

    fn blocks(xml: &str) -> Vec<Block> {
        BlockStream::new(xml).collect::<Result<Vec<_>>>().unwrap()
    }

    // ==================== Paragraphs ====================

    #[test]
    fn test_split_runs_are_merged() {
        let xml = doc(r#"<w:p><w:r><w:t>&lt;sol_</w:t></w:r><w:r><w:rPr><w:b/></w:rPr><w:t>start id=4&gt;</w:t></w:r></w:p>"#);
        let blocks = blocks(&xml);

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].plain_text(), "<sol_start id=4>");
    }

    #[test]
    fn test_tabs_breaks_and_preserved_spaces() {
        let xml = doc(r#"<w:p><w:pPr><w:tabs><w:tab w:val="left" w:pos="720"/></w:tabs></w:pPr><w:r><w:t xml:space="preserve">a </w:t><w:tab/><w:t>b</w:t><w:br/><w:t>c</w:t></w:r></w:p>"#);
        assert_eq!(blocks(&xml)[0].plain_text(), "a \tb\nc");
    }

    #[test]
    fn test_drawing_becomes_single_media_run() {
        let xml = doc(r#"<w:p><w:r><w:t>Before</w:t></w:r><w:r><w:drawing><wp:inline><a:graphic><a:graphicData><w:t>ignored</w:t></a:graphicData></a:graphic></wp:inline></w:drawing></w:r><w:r><w:t>After</w:t></w:r></w:p>"#);
        let blocks = blocks(&xml);

        match &blocks[0] {
            Block::Text(t) => assert_eq!(
                t.runs,
                vec![Run::text("Before"), Run::Media, Run::text("After")]
            ),
            other => panic!("expected text block, got {:?}", other),
        }
    }

    #[test]
    fn test_alternate_content_counts_once() {
        let xml = doc(r#"<w:p><w:r><mc:AlternateContent><mc:Choice Requires="wps"><w:drawing/></mc:Choice><mc:Fallback><w:pict><v:shape/></w:pict></mc:Fallback></mc:AlternateContent></w:r></w:p>"#);
        assert_eq!(blocks(&xml)[0].media_count(), 1);
    }

    #[test]
    fn test_deleted_text_is_ignored() {
        let xml = doc(r#"<w:p><w:del><w:r><w:delText>gone</w:delText></w:r></w:del><w:r><w:t>kept</w:t></w:r></w:p>"#);
        assert_eq!(blocks(&xml)[0].plain_text(), "kept");
    }

    #[test]
    fn test_empty_paragraph() {
        let xml = doc(r#"<w:p/><w:p><w:pPr/></w:p>"#);
        let blocks = blocks(&xml);
        assert_eq!(blocks.len(), 2);
        assert!(blocks.iter().all(|b| b.plain_text().is_empty()));
    }

    #[test]
    fn test_content_control_is_flattened() {
        let xml = doc(r#"<w:p><w:r><w:t>one</w:t></w:r></w:p><w:sdt><w:sdtPr><w:alias w:val="x"/></w:sdtPr><w:sdtContent><w:p><w:r><w:t>two</w:t></w:r></w:p></w:sdtContent></w:sdt><w:p><w:r><w:t>three</w:t></w:r></w:p>"#);
        let texts: Vec<String> = blocks(&xml).iter().map(Block::plain_text).collect();
        assert_eq!(texts, vec!["one", "two", "three"]);
    }

    // ==================== Tables ====================

    #[test]
    fn test_table_cells_and_grid_span() {
        let xml = doc(r#"<w:tbl><w:tblPr/><w:tblGrid><w:gridCol/><w:gridCol/></w:tblGrid><w:tr><w:tc><w:p><w:r><w:t>A</w:t></w:r></w:p></w:tc><w:tc><w:p><w:r><w:t>B</w:t></w:r></w:p><w:p><w:r><w:t>B2</w:t></w:r></w:p></w:tc></w:tr><w:tr><w:tc><w:tcPr><w:gridSpan w:val="2"/></w:tcPr><w:p><w:r><w:t>wide</w:t></w:r></w:p></w:tc></w:tr></w:tbl>"#);
        let blocks = blocks(&xml);

        match &blocks[0] {
            Block::Table(t) => {
                assert_eq!(t.row_count(), 2);
                assert_eq!(t.column_count(), 2);
                assert_eq!(t.cell(0, 1), Some("B\nB2"));
                assert_eq!(t.cell(1, 0), Some("wide"));
                assert_eq!(t.cell(1, 1), Some("wide"));
            }
            other => panic!("expected table, got {:?}", other),
        }
    }

    #[test]
    fn test_table_counts_media_refs() {
        let xml = doc(r#"<w:tbl><w:tr><w:tc><w:p><w:r><w:drawing/></w:r></w:p></w:tc></w:tr></w:tbl>"#);
        assert_eq!(blocks(&xml)[0].media_count(), 1);
    }

    #[test]
    fn test_blocks_in_document_order() {
        let xml = doc(r#"<w:p><w:r><w:t>x</w:t></w:r></w:p><w:tbl><w:tr><w:tc><w:p/></w:tc></w:tr></w:tbl><w:p><w:r><w:t>y</w:t></w:r></w:p>"#);
        let blocks = blocks(&xml);
        assert_eq!(blocks.len(), 3);
        assert!(blocks[0].is_text());
        assert!(blocks[1].is_table());
        assert!(blocks[2].is_text());
    }

    // ==================== Restart & Errors ====================

    #[test]
    fn test_stream_is_restartable() {
        let xml = doc(r#"<w:p><w:r><w:t>x</w:t></w:r></w:p>"#);
        assert_eq!(blocks(&xml), blocks(&xml));
    }

    #[test]
    fn test_malformed_xml_yields_error_then_ends() {
        let xml = r#"<w:document><w:body><w:p><w:r><w:t>ok</w:t></w:r></w:p><w:p><w:r><w:t>bad</w:x></w:r></w:p></w:body></w:document>"#;
        let mut stream = BlockStream::new(xml);

        assert!(matches!(stream.next(), Some(Ok(_))));
        assert!(matches!(stream.next(), Some(Err(_))));
        assert!(stream.next().is_none());
    }

    #[test]
    fn test_truncated_body_is_error() {
        let xml = r#"<w:document><w:body><w:p><w:r><w:t>ok</w:t></w:r></w:p>"#;
        let mut stream = BlockStream::new(xml);

        assert!(matches!(stream.next(), Some(Ok(_))));
        assert!(matches!(stream.next(), Some(Err(Error::Xml(_)))));
    }
}
