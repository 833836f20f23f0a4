//! Per-slide notes extraction.
//!
//! Produces exactly one entry per slide, in deck order. Slides without a
//! notes block yield an empty entry rather than being skipped, since the
//! renderer numbers slides by position.

use crate::types::{NoteEntry, Presentation};

/// Walks a presentation's slides and pulls out their trimmed notes text.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotesExtractor;

impl NotesExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract one [`NoteEntry`] per slide, numbered by position.
    pub fn extract(&self, presentation: &Presentation) -> Vec<NoteEntry> {
        let entries: Vec<NoteEntry> = presentation
            .slides
            .iter()
            .enumerate()
            .map(|(idx, slide)| {
                let text = slide
                    .notes
                    .as_ref()
                    .map(|block| block.text())
                    .unwrap_or_default();
                NoteEntry::new(idx + 1, text)
            })
            .collect();

        log::debug!(
            "Extracted notes from {} slides ({} with text)",
            entries.len(),
            entries.iter().filter(|e| !e.is_empty()).count()
        );

        entries
    }

    /// Extract the notes as plain strings, one per slide.
    pub fn extract_texts(&self, presentation: &Presentation) -> Vec<String> {
        self.extract(presentation)
            .into_iter()
            .map(|entry| entry.text)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{NotesBlock, PresentationFormat, Slide};

    fn deck(notes: Vec<Option<Vec<&str>>>) -> Presentation {
        let mut presentation = Presentation::new("deck.pptx", PresentationFormat::Pptx);
        for (idx, paragraphs) in notes.into_iter().enumerate() {
            let mut slide = Slide::new(idx + 1);
            if let Some(paragraphs) = paragraphs {
                slide = slide.with_notes(NotesBlock::new(
                    paragraphs.iter().map(|p| p.to_string()).collect(),
                ));
            }
            presentation.add_slide(slide);
        }
        presentation
    }

    #[test]
    fn test_one_entry_per_slide() {
        let presentation = deck(vec![None, Some(vec!["Foo"]), None, Some(vec!["  "])]);
        let entries = NotesExtractor::new().extract(&presentation);

        assert_eq!(entries.len(), 4);
        let numbers: Vec<usize> = entries.iter().map(|e| e.slide_number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4]);
        assert_eq!(entries[0].text, "");
        assert_eq!(entries[1].text, "Foo");
        assert_eq!(entries[3].text, "");
    }

    #[test]
    fn test_internal_newlines_preserved() {
        let presentation = deck(vec![Some(vec!["", "  Hello", "World", "  "])]);
        let texts = NotesExtractor::new().extract_texts(&presentation);
        assert_eq!(texts, vec!["Hello\nWorld".to_string()]);
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let presentation = deck(vec![Some(vec!["a"]), None, Some(vec!["b", "c"])]);
        let extractor = NotesExtractor::new();
        assert_eq!(extractor.extract(&presentation), extractor.extract(&presentation));
    }

    #[test]
    fn test_empty_deck() {
        let presentation = deck(vec![]);
        assert!(NotesExtractor::new().extract(&presentation).is_empty());
    }
}
