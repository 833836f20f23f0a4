//! PPTX notes reader implementation.

use notes_core::{Error, NotesBlock, Presentation, PresentationFormat, Result, Slide};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use zip::ZipArchive;

const PRESENTATION_PATH: &str = "ppt/presentation.xml";
const PRESENTATION_RELS_PATH: &str = "ppt/_rels/presentation.xml.rels";

/// Reader for the speaker notes of PPTX (Office Open XML) files.
pub struct PptxReader;

impl PptxReader {
    /// Create a new PPTX reader.
    pub fn new() -> Self {
        Self
    }

    /// Open and read a PPTX file from disk.
    ///
    /// The file handle lives only for the duration of this call.
    pub fn open(&self, path: &Path) -> Result<Presentation> {
        let file = File::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::NotFound(path.display().to_string()),
            _ => Error::IoError(e),
        })?;

        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown");

        self.read(BufReader::new(file), filename)
    }

    /// Read a PPTX deck from any seekable reader.
    pub fn read<R: Read + Seek>(&self, reader: R, filename: &str) -> Result<Presentation> {
        let mut archive = ZipArchive::new(reader)
            .map_err(|e| Error::ZipError(format!("Failed to open ZIP: {}", e)))?;

        let mut presentation = Presentation::new(filename, PresentationFormat::Pptx);

        let slide_order = self.get_slide_order(&mut archive)?;
        log::debug!("Found {} slides in {}", slide_order.len(), filename);

        for (idx, slide_path) in slide_order.iter().enumerate() {
            let slide = self.parse_slide(&mut archive, slide_path, idx + 1)?;
            presentation.add_slide(slide);
        }

        Ok(presentation)
    }

    /// Get the ordered list of slide paths.
    ///
    /// `p:sldIdLst` in presentation.xml is authoritative. Decks without one
    /// fall back to ordering slide relationships by their trailing number.
    fn get_slide_order<R: Read + Seek>(&self, archive: &mut ZipArchive<R>) -> Result<Vec<String>> {
        let rels_content = self.read_file_from_archive(archive, PRESENTATION_RELS_PATH)?;
        let rels = parse_relationships(&rels_content)?;

        let slide_rels: Vec<&Relationship> = rels.iter().filter(|r| r.is_slide()).collect();

        let presentation_xml = self.read_file_from_archive(archive, PRESENTATION_PATH)?;
        let slide_ids = parse_slide_id_list(&presentation_xml)?;

        if !slide_ids.is_empty() {
            let mut paths = Vec::with_capacity(slide_ids.len());
            for rid in &slide_ids {
                let rel = slide_rels.iter().find(|r| &r.id == rid).ok_or_else(|| {
                    Error::PptxParseError(format!(
                        "Slide id list references unknown relationship '{}'",
                        rid
                    ))
                })?;
                paths.push(resolve_target("ppt", &rel.target));
            }
            return Ok(paths);
        }

        log::debug!("No slide id list in presentation.xml, ordering by relationship number");

        let mut slides: Vec<(String, Option<usize>)> = slide_rels
            .iter()
            .map(|rel| {
                let order_num =
                    extract_slide_number(&rel.id).or_else(|| extract_slide_number(&rel.target));
                (resolve_target("ppt", &rel.target), order_num)
            })
            .collect();

        slides.sort_by(|a, b| match (a.1, b.1) {
            (Some(na), Some(nb)) => na.cmp(&nb),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.0.cmp(&b.0),
        });

        Ok(slides.into_iter().map(|(path, _)| path).collect())
    }

    /// Read a single slide's notes block, if it has one.
    fn parse_slide<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        slide_path: &str,
        slide_number: usize,
    ) -> Result<Slide> {
        if archive.by_name(slide_path).is_err() {
            return Err(Error::PptxParseError(format!(
                "Slide {} is missing from the archive: {}",
                slide_number, slide_path
            )));
        }

        let slide = Slide::new(slide_number);

        let notes_path = match self.find_notes_path(archive, slide_path)? {
            Some(path) => path,
            None => {
                log::debug!("Slide {} has no notes slide", slide_number);
                return Ok(slide);
            }
        };

        let notes_xml = self.read_file_from_archive(archive, &notes_path)?;
        match parse_notes_xml(&notes_xml)? {
            Some(block) => Ok(slide.with_notes(block)),
            None => {
                log::debug!(
                    "Notes slide {} for slide {} has no body placeholder",
                    notes_path,
                    slide_number
                );
                Ok(slide)
            }
        }
    }

    /// Locate the notes slide through the slide's own relationships.
    fn find_notes_path<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        slide_path: &str,
    ) -> Result<Option<String>> {
        let rels_path = rels_path_for(slide_path);
        if archive.by_name(&rels_path).is_err() {
            return Ok(None);
        }

        let rels_content = self.read_file_from_archive(archive, &rels_path)?;
        let rels = parse_relationships(&rels_content)?;

        let base_dir = slide_path
            .rsplit_once('/')
            .map(|(dir, _)| dir)
            .unwrap_or("");

        Ok(rels
            .iter()
            .find(|r| r.rel_type.ends_with("/notesSlide"))
            .map(|r| resolve_target(base_dir, &r.target)))
    }

    /// Read a file from the ZIP archive.
    fn read_file_from_archive<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        path: &str,
    ) -> Result<String> {
        let mut file = archive
            .by_name(path)
            .map_err(|e| Error::ZipError(format!("File not found in archive '{}': {}", path, e)))?;

        let mut content = String::new();
        file.read_to_string(&mut content)
            .map_err(|e| Error::ZipError(format!("Failed to read '{}': {}", path, e)))?;

        Ok(content)
    }
}

impl Default for PptxReader {
    fn default() -> Self {
        Self::new()
    }
}

/// A single `Relationship` entry from a `.rels` part.
#[derive(Debug, Default)]
struct Relationship {
    id: String,
    rel_type: String,
    target: String,
}

impl Relationship {
    fn is_slide(&self) -> bool {
        self.rel_type.ends_with("/slide")
    }
}

/// Parse every `Relationship` element in a `.rels` part.
fn parse_relationships(xml: &str) -> Result<Vec<Relationship>> {
    let mut rels = Vec::new();
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if e.local_name().as_ref() == b"Relationship" =>
            {
                let mut rel = Relationship::default();
                for attr in e.attributes().flatten() {
                    let value = String::from_utf8_lossy(&attr.value).to_string();
                    match attr.key.as_ref() {
                        b"Id" => rel.id = value,
                        b"Type" => rel.rel_type = value,
                        b"Target" => rel.target = value,
                        _ => {}
                    }
                }
                rels.push(rel);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!(
                    "Error parsing relationships: {}",
                    e
                )));
            }
            _ => {}
        }
    }

    Ok(rels)
}

/// Collect the `r:id` of every `p:sldId` in presentation order.
fn parse_slide_id_list(xml: &str) -> Result<Vec<String>> {
    let mut ids = Vec::new();
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if e.local_name().as_ref() == b"sldId" =>
            {
                for attr in e.attributes().flatten() {
                    if attr.key.local_name().as_ref() == b"id" && attr.key.prefix().is_some() {
                        ids.push(String::from_utf8_lossy(&attr.value).to_string());
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!(
                    "Error parsing presentation.xml: {}",
                    e
                )));
            }
            _ => {}
        }
    }

    Ok(ids)
}

/// Extract the body placeholder's paragraphs from a notes slide.
///
/// Other placeholders (slide image, slide number, header/footer) are ignored.
/// Returns `None` when the notes slide has no body placeholder.
fn parse_notes_xml(xml: &str) -> Result<Option<NotesBlock>> {
    let mut reader = Reader::from_str(xml);

    let mut block: Option<NotesBlock> = None;
    let mut in_shape = false;
    let mut is_body = false;
    let mut in_text_body = false;
    let mut in_paragraph = false;
    let mut in_text = false;
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"sp" => {
                    in_shape = true;
                    is_body = false;
                    paragraphs.clear();
                }
                b"ph" if in_shape => is_body = is_body_placeholder(e),
                b"txBody" if in_shape => in_text_body = true,
                b"p" if in_text_body => {
                    in_paragraph = true;
                    current.clear();
                }
                b"t" if in_paragraph => in_text = true,
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match e.local_name().as_ref() {
                b"ph" if in_shape => is_body = is_body_placeholder(e),
                b"p" if in_text_body => paragraphs.push(String::new()),
                b"br" if in_paragraph => current.push('\n'),
                _ => {}
            },
            Ok(Event::Text(ref e)) if in_text => {
                let text = e
                    .unescape()
                    .map_err(|e| Error::XmlError(format!("Invalid text in notes: {}", e)))?;
                current.push_str(&text);
            }
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" if in_paragraph => {
                    in_paragraph = false;
                    paragraphs.push(std::mem::take(&mut current));
                }
                b"txBody" => in_text_body = false,
                b"sp" => {
                    if is_body && block.is_none() {
                        block = Some(NotesBlock::new(std::mem::take(&mut paragraphs)));
                    }
                    in_shape = false;
                    is_body = false;
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!("Error parsing notes slide: {}", e)));
            }
            _ => {}
        }
    }

    Ok(block)
}

fn is_body_placeholder(e: &BytesStart) -> bool {
    e.attributes()
        .flatten()
        .any(|attr| attr.key.as_ref() == b"type" && attr.value.as_ref() == b"body")
}

/// The `.rels` part that belongs to a given part,
/// e.g. `ppt/slides/slide1.xml` -> `ppt/slides/_rels/slide1.xml.rels`.
fn rels_path_for(part: &str) -> String {
    match part.rsplit_once('/') {
        Some((dir, file)) => format!("{}/_rels/{}.rels", dir, file),
        None => format!("_rels/{}.rels", part),
    }
}

/// Resolve a relationship target against the directory of its source part.
///
/// Absolute targets (leading `/`) are package-rooted; `..` and `.`
/// segments are collapsed.
fn resolve_target(base_dir: &str, target: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();

    let joined = match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None if base_dir.is_empty() => target.to_string(),
        None => format!("{}/{}", base_dir, target),
    };

    for segment in joined.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    segments.join("/")
}

/// Extract a slide number from a string like "rId2" or "slide3.xml".
fn extract_slide_number(s: &str) -> Option<usize> {
    let s = s.trim_end_matches(".xml").trim_end_matches(".rels");

    let digits: String = s.chars().rev().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    let digits: String = digits.chars().rev().collect();
    digits.parse().ok()
}
