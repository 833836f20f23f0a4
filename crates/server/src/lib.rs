//! HTTP upload service for converting PowerPoint speaker notes to Word.
//!
//! `POST /upload` takes a .pptx, answers with the extracted notes and a
//! one-shot download link; `GET /download/{token}` hands the rendered DOCX
//! back exactly once.

pub mod config;
pub mod error;
pub mod routes;
pub mod store;

pub use config::ServerConfig;
pub use error::ApiError;
pub use routes::{router, AppState};
pub use store::{DocumentStore, StoredDocument};
