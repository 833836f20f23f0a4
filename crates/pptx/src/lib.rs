//! PPTX (Office Open XML) reader backend for speaker-notes extraction.
//!
//! Reads .pptx files, which are ZIP archives of XML parts, and exposes each
//! slide's notes block in deck order.

pub mod parser;

#[cfg(any(test, feature = "fixtures"))]
pub mod fixture;

pub use parser::PptxReader;
