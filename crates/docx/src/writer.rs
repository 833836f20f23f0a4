//! DOCX package writer.

use notes_core::{Error, OutputDocument, Result, Section};
use quick_xml::escape::escape;
use std::fmt::Write as FmtWrite;
use std::io::{Cursor, Seek, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/><Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/></Types>"#;

const PACKAGE_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/></Relationships>"#;

const DOCUMENT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

const STYLES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:docDefaults><w:rPrDefault><w:rPr><w:rFonts w:ascii="Calibri" w:hAnsi="Calibri" w:eastAsia="Calibri" w:cs="Calibri"/><w:sz w:val="22"/><w:szCs w:val="22"/><w:lang w:val="en-US"/></w:rPr></w:rPrDefault><w:pPrDefault><w:pPr><w:spacing w:after="160" w:line="259" w:lineRule="auto"/></w:pPr></w:pPrDefault></w:docDefaults><w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:qFormat/></w:style><w:style w:type="paragraph" w:styleId="Title"><w:name w:val="Title"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/><w:pPr><w:spacing w:after="0" w:line="240" w:lineRule="auto"/><w:contextualSpacing/></w:pPr><w:rPr><w:sz w:val="56"/><w:szCs w:val="56"/></w:rPr></w:style><w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/><w:pPr><w:keepNext/><w:keepLines/><w:spacing w:before="240" w:after="0"/><w:outlineLvl w:val="0"/></w:pPr><w:rPr><w:color w:val="2F5496"/><w:sz w:val="32"/><w:szCs w:val="32"/></w:rPr></w:style></w:styles>"#;

const SECTION_PROPERTIES_XML: &str = r#"<w:sectPr><w:pgSz w:w="12240" w:h="15840"/><w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440" w:header="720" w:footer="720" w:gutter="0"/></w:sectPr>"#;

/// Title font size in half-points (16pt).
const TITLE_SIZE_HALF_POINTS: u32 = 32;

/// Serializes an [`OutputDocument`] into a Word (.docx) package.
pub struct DocxWriter {
    compression: CompressionMethod,
}

impl DocxWriter {
    /// Create a writer that deflates package parts.
    pub fn new() -> Self {
        Self {
            compression: CompressionMethod::Deflated,
        }
    }

    /// Serialize the document into an in-memory DOCX.
    pub fn write(&self, document: &OutputDocument) -> Result<Vec<u8>> {
        let cursor = self.write_to(document, Cursor::new(Vec::new()))?;
        Ok(cursor.into_inner())
    }

    /// Serialize the document into the given writer, returning it once the
    /// package is finished.
    pub fn write_to<W: Write + Seek>(&self, document: &OutputDocument, writer: W) -> Result<W> {
        let mut zip = ZipWriter::new(writer);
        let options = FileOptions::default().compression_method(self.compression);

        let parts = [
            ("[Content_Types].xml", CONTENT_TYPES_XML.to_string()),
            ("_rels/.rels", PACKAGE_RELS_XML.to_string()),
            ("docProps/core.xml", core_properties_xml(&document.title)),
            ("word/_rels/document.xml.rels", DOCUMENT_RELS_XML.to_string()),
            ("word/styles.xml", STYLES_XML.to_string()),
            ("word/document.xml", document_xml(document)?),
        ];

        for (name, content) in parts {
            zip.start_file(name, options)
                .map_err(|e| Error::RenderError(format!("Failed to start '{}': {}", name, e)))?;
            zip.write_all(content.as_bytes())
                .map_err(|e| Error::RenderError(format!("Failed to write '{}': {}", name, e)))?;
        }

        log::debug!("Wrote DOCX with {} sections", document.sections.len());

        zip.finish()
            .map_err(|e| Error::RenderError(format!("Failed to finish DOCX: {}", e)))
    }
}

impl Default for DocxWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Build `word/document.xml`.
///
/// Layout: centered bold title, blank paragraph, then for every section a
/// `Heading1` paragraph, the body paragraph, and a blank separator.
fn document_xml(document: &OutputDocument) -> Result<String> {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>"#,
    );

    write!(
        xml,
        r#"<w:p><w:pPr><w:pStyle w:val="Title"/><w:jc w:val="center"/></w:pPr><w:r><w:rPr><w:b/><w:sz w:val="{size}"/><w:szCs w:val="{size}"/></w:rPr>"#,
        size = TITLE_SIZE_HALF_POINTS
    )
    .map_err(fmt_error)?;
    write_run_content(&mut xml, &document.title)?;
    xml.push_str("</w:r></w:p><w:p/>");

    for section in &document.sections {
        write_section(&mut xml, section)?;
    }

    xml.push_str(SECTION_PROPERTIES_XML);
    xml.push_str("</w:body></w:document>");
    Ok(xml)
}

fn write_section(xml: &mut String, section: &Section) -> Result<()> {
    xml.push_str(r#"<w:p><w:pPr><w:pStyle w:val="Heading1"/></w:pPr><w:r>"#);
    write_run_content(xml, &section.heading)?;
    xml.push_str("</w:r></w:p>");

    xml.push_str("<w:p><w:r>");
    write_run_content(xml, &section.body)?;
    xml.push_str("</w:r></w:p><w:p/>");
    Ok(())
}

/// Write the inside of a `w:r`: text runs with `w:br` for newlines and
/// `w:tab` for tabs.
fn write_run_content(xml: &mut String, text: &str) -> Result<()> {
    for (line_idx, line) in text.split('\n').enumerate() {
        if line_idx > 0 {
            xml.push_str("<w:br/>");
        }
        for (tab_idx, chunk) in line.split('\t').enumerate() {
            if tab_idx > 0 {
                xml.push_str("<w:tab/>");
            }
            let chunk = strip_invalid_chars(chunk);
            if !chunk.is_empty() {
                write!(xml, r#"<w:t xml:space="preserve">{}</w:t>"#, escape(chunk.as_str()))
                    .map_err(fmt_error)?;
            }
        }
    }
    Ok(())
}

/// Drop characters outside the XML 1.0 `Char` production.
fn strip_invalid_chars(text: &str) -> String {
    text.chars().filter(|c| is_xml_char(*c)).collect()
}

fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r'
            | '\u{20}'..='\u{D7FF}'
            | '\u{E000}'..='\u{FFFD}'
            | '\u{10000}'..='\u{10FFFF}'
    )
}

fn core_properties_xml(title: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"><dc:title>{}</dc:title></cp:coreProperties>"#,
        escape(strip_invalid_chars(title).as_str())
    )
}

fn fmt_error(e: std::fmt::Error) -> Error {
    Error::RenderError(format!("Failed to build document XML: {}", e))
}
