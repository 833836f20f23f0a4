//! Document rendering for extracted notes.
//!
//! Turns the ordered note entries into an [`OutputDocument`]: a title plus
//! one section per slide, headed "Slide N". The serializers in
//! [`crate::markdown`] and the `notes-docx` crate take it from there.

use crate::error::{Error, Result};
use crate::types::NoteEntry;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Title placed at the top of every rendered document.
pub const DEFAULT_TITLE: &str = "Speaker Notes";

/// Body used for slides without notes under [`EmptyNotesPolicy::Placeholder`].
pub const PLACEHOLDER_TEXT: &str = "No notes for this slide.";

/// What to do with slides whose notes are empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyNotesPolicy {
    /// Leave the slide out of the document entirely.
    #[default]
    Skip,
    /// Emit the slide with a placeholder body.
    Placeholder,
}

impl FromStr for EmptyNotesPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "skip" | "skip-empty" => Ok(Self::Skip),
            "placeholder" => Ok(Self::Placeholder),
            other => Err(format!(
                "unknown empty-notes policy '{}' (expected 'skip' or 'placeholder')",
                other
            )),
        }
    }
}

impl fmt::Display for EmptyNotesPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Skip => f.write_str("skip"),
            Self::Placeholder => f.write_str("placeholder"),
        }
    }
}

/// One heading plus its body text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub heading: String,
    pub body: String,
}

/// A rendered document, ready for serialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputDocument {
    pub title: String,
    pub sections: Vec<Section>,
}

impl OutputDocument {
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// Builds an [`OutputDocument`] from note entries.
#[derive(Debug, Clone)]
pub struct DocumentRenderer {
    policy: EmptyNotesPolicy,
    title: String,
}

impl Default for DocumentRenderer {
    fn default() -> Self {
        Self {
            policy: EmptyNotesPolicy::default(),
            title: DEFAULT_TITLE.to_string(),
        }
    }
}

impl DocumentRenderer {
    /// Create a renderer that skips empty slides and uses the default title.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set how slides with empty notes are handled.
    pub fn with_policy(mut self, policy: EmptyNotesPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replace the document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn policy(&self) -> EmptyNotesPolicy {
        self.policy
    }

    /// Render the entries into a document.
    ///
    /// Entries must be numbered `1..=N` in order, exactly as the extractor
    /// produces them; anything else is a [`Error::RenderError`].
    pub fn render(&self, entries: &[NoteEntry]) -> Result<OutputDocument> {
        for (idx, entry) in entries.iter().enumerate() {
            if entry.slide_number != idx + 1 {
                return Err(Error::RenderError(format!(
                    "note entry at position {} is numbered {}, expected {}",
                    idx,
                    entry.slide_number,
                    idx + 1
                )));
            }
        }

        let sections: Vec<Section> = entries
            .iter()
            .filter_map(|entry| {
                let body = entry.text.trim();
                if body.is_empty() {
                    match self.policy {
                        EmptyNotesPolicy::Skip => return None,
                        EmptyNotesPolicy::Placeholder => {
                            return Some(self.section(entry, PLACEHOLDER_TEXT))
                        }
                    }
                }
                Some(self.section(entry, body))
            })
            .collect();

        log::debug!(
            "Rendered {} of {} slides with policy '{}'",
            sections.len(),
            entries.len(),
            self.policy
        );

        Ok(OutputDocument {
            title: self.title.clone(),
            sections,
        })
    }

    fn section(&self, entry: &NoteEntry, body: &str) -> Section {
        Section {
            heading: format!("Slide {}", entry.slide_number),
            body: body.to_string(),
        }
    }
}
