//! Routing and request handlers.

use crate::config::ServerConfig;
use crate::error::ApiError;
use crate::store::DocumentStore;
use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::header;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use notes_core::{
    notes_filename, DocumentRenderer, Error, NotesExtractor, OutputFormat, PresentationFormat,
};
use notes_docx::DocxWriter;
use notes_pptx::PptxReader;
use serde::Serialize;
use std::io::Cursor;
use std::sync::Arc;

const INDEX_HTML: &str = r#"<!doctype html>
<html>
<head><meta charset="utf-8"><title>Speaker Notes to Word</title></head>
<body>
<h1>PowerPoint Speaker Notes to Word Converter</h1>
<form action="/upload" method="post" enctype="multipart/form-data">
<input type="file" name="file" accept=".pptx" required>
<button type="submit">Convert</button>
</form>
</body>
</html>
"#;

/// State shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<DocumentStore>,
    pub renderer: DocumentRenderer,
}

impl AppState {
    pub fn new(store: DocumentStore, renderer: DocumentRenderer) -> Self {
        Self {
            store: Arc::new(store),
            renderer,
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(
            DocumentStore::new(config.download_ttl(), config.max_pending_downloads),
            DocumentRenderer::new().with_policy(config.empty_notes),
        )
    }
}

/// Body of a successful `POST /upload`.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub notes: Vec<String>,
    pub doc_url: String,
}

/// Build the application router.
pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(|| async { "OK" }))
        .route("/upload", post(upload))
        .route("/download/:token", get(download))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Handler for `POST /upload`.
async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut upload: Option<(String, Bytes)> = None;

    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or_default().to_string();
            let data = field.bytes().await?;
            upload = Some((filename, data));
            break;
        }
    }

    let (filename, data) = upload.ok_or_else(|| ApiError::bad_request("No file part"))?;
    validate_upload(&filename, &data)?;

    log::info!("Converting {} ({} bytes)", filename, data.len());

    let renderer = state.renderer.clone();
    let name = filename.clone();
    let (notes, docx) = tokio::task::spawn_blocking(move || convert_deck(&data, &name, &renderer))
        .await
        .map_err(|e| ApiError::internal(format!("Conversion task failed: {}", e)))??;

    let download_name = notes_filename(&filename, OutputFormat::Docx);
    let token = state
        .store
        .insert(download_name, OutputFormat::Docx.mime_type(), docx);

    Ok(Json(UploadResponse {
        success: true,
        notes,
        doc_url: format!("/download/{}", token),
    }))
}

/// Reject uploads that are not worth handing to the reader.
fn validate_upload(filename: &str, data: &[u8]) -> notes_core::Result<()> {
    let invalid = |message: &str| Err(Error::ValidationError(message.to_string()));

    if filename.is_empty() {
        return invalid("No selected file");
    }
    if PresentationFormat::from_filename(filename) != Some(PresentationFormat::Pptx) {
        return invalid("File must be a PowerPoint (.pptx) file");
    }
    if data.is_empty() {
        return invalid("Uploaded file is empty");
    }
    if PresentationFormat::from_magic(data).is_none() {
        return invalid("File is not a valid PowerPoint (.pptx) file");
    }
    Ok(())
}

/// Read, extract, render and package a deck held in memory.
fn convert_deck(
    data: &[u8],
    filename: &str,
    renderer: &DocumentRenderer,
) -> notes_core::Result<(Vec<String>, Vec<u8>)> {
    let presentation = PptxReader::new().read(Cursor::new(data), filename)?;
    let entries = NotesExtractor::new().extract(&presentation);
    let document = renderer.render(&entries)?;
    let docx = DocxWriter::new().write(&document)?;

    let notes = entries.into_iter().map(|entry| entry.text).collect();
    Ok((notes, docx))
}

/// Handler for `GET /download/{token}`.
async fn download(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Response, ApiError> {
    let document = state
        .store
        .take(&token)
        .ok_or_else(|| ApiError::not_found("File not found"))?;

    log::info!(
        "Serving {} ({} bytes)",
        document.filename,
        document.bytes.len()
    );

    let headers = [
        (header::CONTENT_TYPE, document.content_type.to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", document.filename),
        ),
    ];

    Ok((headers, document.bytes).into_response())
}
