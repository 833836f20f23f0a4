//! Core data model, notes extraction, and document rendering for
//! speaker-notes conversion.

pub mod error;
pub mod extract;
pub mod filename;
pub mod markdown;
pub mod render;
pub mod types;

pub use error::{Error, Result};
pub use extract::NotesExtractor;
pub use filename::{notes_filename, secure_filename};
pub use markdown::to_markdown;
pub use render::{DocumentRenderer, EmptyNotesPolicy, OutputDocument, Section};
pub use types::{NoteEntry, NotesBlock, OutputFormat, Presentation, PresentationFormat, Slide};
