//! Domain types for representing a slide deck and its extracted notes.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// A slide deck as read from its container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Presentation {
    /// Original filename (without path).
    pub filename: String,

    /// Detected format of the source file.
    pub format: PresentationFormat,

    /// Slides in presentation order.
    pub slides: Vec<Slide>,
}

impl Presentation {
    /// Create a new, empty presentation with the given filename and format.
    pub fn new(filename: impl Into<String>, format: PresentationFormat) -> Self {
        Self {
            filename: filename.into(),
            format,
            slides: Vec::new(),
        }
    }

    /// Add a slide to the presentation.
    pub fn add_slide(&mut self, slide: Slide) {
        self.slides.push(slide);
    }

    /// Number of slides in the deck.
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }
}

/// The format of the source presentation file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PresentationFormat {
    /// Modern PPTX (Office Open XML).
    Pptx,
}

impl PresentationFormat {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "pptx" => Some(Self::Pptx),
            _ => None,
        }
    }

    /// Detect format from a file name such as `deck.pptx`.
    pub fn from_filename(name: &str) -> Option<Self> {
        Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// Detect format from file magic bytes.
    pub fn from_magic(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < 4 {
            return None;
        }

        // PPTX is a ZIP file (PK\x03\x04)
        if bytes.starts_with(&[0x50, 0x4B, 0x03, 0x04]) {
            return Some(Self::Pptx);
        }

        None
    }

    /// The canonical file extension, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pptx => "pptx",
        }
    }
}

/// A single slide in the deck.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slide {
    /// 1-based slide number.
    pub number: usize,

    /// The speaker-notes block, if the slide has one.
    pub notes: Option<NotesBlock>,
}

impl Slide {
    /// Create a slide without notes.
    pub fn new(number: usize) -> Self {
        Self {
            number,
            notes: None,
        }
    }

    /// Attach a notes block to this slide.
    pub fn with_notes(mut self, notes: NotesBlock) -> Self {
        self.notes = Some(notes);
        self
    }
}

/// The speaker-notes text region of a slide, one string per paragraph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotesBlock {
    pub paragraphs: Vec<String>,
}

impl NotesBlock {
    pub fn new(paragraphs: Vec<String>) -> Self {
        Self { paragraphs }
    }

    /// Paragraphs joined by newlines, with surrounding whitespace trimmed.
    pub fn text(&self) -> String {
        self.paragraphs.join("\n").trim().to_string()
    }
}

/// The extracted note text for one slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteEntry {
    /// 1-based slide number.
    pub slide_number: usize,

    /// Trimmed note text, empty when the slide has no notes.
    pub text: String,
}

impl NoteEntry {
    pub fn new(slide_number: usize, text: impl Into<String>) -> Self {
        Self {
            slide_number,
            text: text.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Target format for a rendered document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Word-processing document (Office Open XML).
    Docx,
    /// UTF-8 markdown text.
    Markdown,
}

impl OutputFormat {
    /// Detect the output format from a path's extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .as_deref()
        {
            Some("docx") => Some(Self::Docx),
            Some("md") | Some("markdown") => Some(Self::Markdown),
            _ => None,
        }
    }

    /// File extension, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Docx => "docx",
            Self::Markdown => "md",
        }
    }

    /// MIME type used when serving the document.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            Self::Markdown => "text/markdown; charset=utf-8",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            PresentationFormat::from_extension("PPTX"),
            Some(PresentationFormat::Pptx)
        );
        assert_eq!(PresentationFormat::from_extension("txt"), None);
        assert_eq!(
            PresentationFormat::from_filename("deck.pptx"),
            Some(PresentationFormat::Pptx)
        );
        assert_eq!(PresentationFormat::from_filename("deck.txt"), None);
        assert_eq!(PresentationFormat::from_filename("pptx"), None);
    }

    #[test]
    fn test_format_from_magic() {
        assert_eq!(
            PresentationFormat::from_magic(b"PK\x03\x04rest"),
            Some(PresentationFormat::Pptx)
        );
        assert_eq!(PresentationFormat::from_magic(b"PK"), None);
        assert_eq!(PresentationFormat::from_magic(b"%PDF-1.7"), None);
    }

    #[test]
    fn test_notes_block_text_joins_and_trims() {
        let block = NotesBlock::new(vec![
            "  Hello".to_string(),
            "World  ".to_string(),
            String::new(),
        ]);
        assert_eq!(block.text(), "Hello\nWorld");
    }

    #[test]
    fn test_output_format_from_path() {
        assert_eq!(
            OutputFormat::from_path(Path::new("out/notes.DOCX")),
            Some(OutputFormat::Docx)
        );
        assert_eq!(
            OutputFormat::from_path(Path::new("notes.md")),
            Some(OutputFormat::Markdown)
        );
        assert_eq!(OutputFormat::from_path(Path::new("notes")), None);
    }
}
