//! DOCX (Office Open XML) writer backend for rendered speaker notes.
//!
//! Packages an [`notes_core::OutputDocument`] as a minimal Word document:
//! a title, then a heading and body paragraph per section.

pub mod writer;

pub use writer::DocxWriter;
