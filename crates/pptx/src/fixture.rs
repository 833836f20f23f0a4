//! In-memory PPTX decks for tests.
//!
//! Builds just enough of an OOXML package for [`crate::PptxReader`]:
//! presentation part and relationships, one part per slide, and a notes
//! slide for every slide that has notes. Slide relationships are numbered in
//! reverse deck order so that readers relying on `rId` numbering get caught.

use quick_xml::escape::escape;
use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::ZipWriter;

const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const PKG_REL_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const DRAWING_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const PRESENTATION_NS: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";

enum NotesSource {
    None,
    Paragraphs(Vec<String>),
    Raw(String),
}

/// Builder for a minimal PPTX package.
pub struct PptxBuilder {
    slides: Vec<NotesSource>,
    slide_id_list: bool,
    presentation_xml: bool,
}

impl Default for PptxBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PptxBuilder {
    pub fn new() -> Self {
        Self {
            slides: Vec::new(),
            slide_id_list: true,
            presentation_xml: true,
        }
    }

    /// Append a slide whose notes slide holds these paragraphs.
    pub fn slide(mut self, paragraphs: &[&str]) -> Self {
        self.slides.push(NotesSource::Paragraphs(
            paragraphs.iter().map(|p| p.to_string()).collect(),
        ));
        self
    }

    /// Append a slide with no notes slide at all.
    pub fn slide_without_notes(mut self) -> Self {
        self.slides.push(NotesSource::None);
        self
    }

    /// Append a slide whose notes part is the given XML, verbatim.
    pub fn raw_notes_slide(mut self, xml: impl Into<String>) -> Self {
        self.slides.push(NotesSource::Raw(xml.into()));
        self
    }

    /// Leave `p:sldIdLst` out of presentation.xml.
    pub fn without_slide_id_list(mut self) -> Self {
        self.slide_id_list = false;
        self
    }

    /// Leave presentation.xml out of the package entirely.
    pub fn without_presentation_xml(mut self) -> Self {
        self.presentation_xml = false;
        self
    }

    /// Write the package and return its bytes.
    pub fn build(self) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default();
        let count = self.slides.len();
        let rid = |idx: usize| format!("rId{}", count - idx + 1);

        let mut put = |name: &str, content: &str| {
            zip.start_file(name, options).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        };

        put("[Content_Types].xml", &content_types(count));
        put(
            "_rels/.rels",
            &format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="{PKG_REL_NS}"><Relationship Id="rId1" Type="{REL_NS}/officeDocument" Target="ppt/presentation.xml"/></Relationships>"#
            ),
        );

        if self.presentation_xml {
            let ids: String = if self.slide_id_list {
                let entries: String = (0..count)
                    .map(|idx| format!(r#"<p:sldId id="{}" r:id="{}"/>"#, 256 + idx, rid(idx)))
                    .collect();
                format!("<p:sldIdLst>{}</p:sldIdLst>", entries)
            } else {
                String::new()
            };
            put(
                "ppt/presentation.xml",
                &format!(
                    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:presentation xmlns:a="{DRAWING_NS}" xmlns:r="{REL_NS}" xmlns:p="{PRESENTATION_NS}"><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst>{ids}<p:sldSz cx="9144000" cy="6858000"/></p:presentation>"#
                ),
            );
        }

        let mut rels = format!(
            r#"<Relationship Id="rId1" Type="{REL_NS}/slideMaster" Target="slideMasters/slideMaster1.xml"/>"#
        );
        for idx in 0..count {
            rels.push_str(&format!(
                r#"<Relationship Id="{}" Type="{REL_NS}/slide" Target="slides/slide{}.xml"/>"#,
                rid(idx),
                idx + 1
            ));
        }
        put(
            "ppt/_rels/presentation.xml.rels",
            &format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="{PKG_REL_NS}">{rels}</Relationships>"#
            ),
        );

        for (idx, notes) in self.slides.iter().enumerate() {
            let number = idx + 1;
            put(
                &format!("ppt/slides/slide{}.xml", number),
                &format!(
                    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:sld xmlns:a="{DRAWING_NS}" xmlns:r="{REL_NS}" xmlns:p="{PRESENTATION_NS}"><p:cSld><p:spTree/></p:cSld></p:sld>"#
                ),
            );

            let notes_xml = match notes {
                NotesSource::None => None,
                NotesSource::Paragraphs(paragraphs) => {
                    let refs: Vec<&str> = paragraphs.iter().map(String::as_str).collect();
                    Some(notes_slide_xml(&refs))
                }
                NotesSource::Raw(xml) => Some(xml.clone()),
            };

            let mut slide_rels = format!(
                r#"<Relationship Id="rId1" Type="{REL_NS}/slideLayout" Target="../slideLayouts/slideLayout1.xml"/>"#
            );
            if let Some(xml) = notes_xml {
                slide_rels.push_str(&format!(
                    r#"<Relationship Id="rId2" Type="{REL_NS}/notesSlide" Target="../notesSlides/notesSlide{}.xml"/>"#,
                    number
                ));
                put(&format!("ppt/notesSlides/notesSlide{}.xml", number), &xml);
            }
            put(
                &format!("ppt/slides/_rels/slide{}.xml.rels", number),
                &format!(
                    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="{PKG_REL_NS}">{slide_rels}</Relationships>"#
                ),
            );
        }

        zip.finish().unwrap().into_inner()
    }
}

fn content_types(slide_count: usize) -> String {
    let overrides: String = (1..=slide_count)
        .map(|n| {
            format!(
                r#"<Override PartName="/ppt/slides/slide{n}.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>"#
            )
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/>{overrides}</Types>"#
    )
}

/// A notes slide the way PowerPoint lays it out: slide image, body, and
/// slide number placeholders, with the paragraphs in the body.
pub fn notes_slide_xml(paragraphs: &[&str]) -> String {
    let body: String = paragraphs
        .iter()
        .map(|p| {
            if p.is_empty() {
                "<a:p/>".to_string()
            } else {
                format!("<a:p><a:r><a:rPr lang=\"en-US\"/><a:t>{}</a:t></a:r></a:p>", escape(p))
            }
        })
        .collect();

    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:notes xmlns:a="{DRAWING_NS}" xmlns:r="{REL_NS}" xmlns:p="{PRESENTATION_NS}"><p:cSld><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/><p:sp><p:nvSpPr><p:cNvPr id="2" name="Slide Image Placeholder 1"/><p:cNvSpPr/><p:nvPr><p:ph type="sldImg"/></p:nvPr></p:nvSpPr><p:spPr/></p:sp><p:sp><p:nvSpPr><p:cNvPr id="3" name="Notes Placeholder 2"/><p:cNvSpPr/><p:nvPr><p:ph type="body" idx="1"/></p:nvPr></p:nvSpPr><p:spPr/><p:txBody><a:bodyPr/><a:lstStyle/>{body}</p:txBody></p:sp><p:sp><p:nvSpPr><p:cNvPr id="4" name="Slide Number Placeholder 3"/><p:cNvSpPr/><p:nvPr><p:ph type="sldNum" idx="5"/></p:nvPr></p:nvSpPr><p:spPr/><p:txBody><a:bodyPr/><a:lstStyle/><a:p><a:fld id="{{B6F15528-21DE-4FAA-801E-634DDDAF4B2B}}" type="slidenum"><a:t>1</a:t></a:fld></a:p></p:txBody></p:sp></p:spTree></p:cSld></p:notes>"#
    )
}
