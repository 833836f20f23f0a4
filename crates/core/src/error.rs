//! Error types for speaker-notes conversion.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading a deck or rendering its notes.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to open, read, or write a file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// An input path or stored document does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The input was rejected before any parsing was attempted.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// The file format is not supported or could not be detected.
    #[error("Unsupported or unrecognized file format: {0}")]
    UnsupportedFormat(String),

    /// Failed to parse the PPTX file structure.
    #[error("PPTX parsing error: {0}")]
    PptxParseError(String),

    /// ZIP archive error.
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML parsing error.
    #[error("XML parsing error: {0}")]
    XmlError(String),

    /// The note sequence was malformed or the output could not be serialized.
    #[error("Render error: {0}")]
    RenderError(String),
}

impl Error {
    /// Whether this error means the input container was malformed.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            Error::PptxParseError(_) | Error::ZipError(_) | Error::XmlError(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_family() {
        assert!(Error::ZipError("bad".into()).is_parse_error());
        assert!(Error::XmlError("bad".into()).is_parse_error());
        assert!(Error::PptxParseError("bad".into()).is_parse_error());
        assert!(!Error::RenderError("bad".into()).is_parse_error());
        assert!(!Error::NotFound("x".into()).is_parse_error());
    }

    #[test]
    fn test_display_carries_message() {
        let err = Error::ValidationError("File must be a PowerPoint (.pptx) file".into());
        assert_eq!(
            err.to_string(),
            "Validation error: File must be a PowerPoint (.pptx) file"
        );
    }
}
