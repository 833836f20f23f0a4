//! Upload filename sanitizing and output name derivation.

use crate::types::OutputFormat;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

/// Characters allowed to survive in a sanitized filename.
static UNSAFE_CHARS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_.-]").unwrap());

/// Reduce a client-supplied filename to a safe ASCII name.
///
/// - Decomposes Unicode (NFKD) and drops anything non-ASCII
/// - Turns path separators into spaces, then whitespace runs into `_`
/// - Removes characters outside `[A-Za-z0-9_.-]`
/// - Strips leading and trailing `.` and `_`
///
/// The result may be empty.
pub fn secure_filename(name: &str) -> String {
    let ascii: String = name.nfkd().filter(|c| c.is_ascii()).collect();
    let ascii = ascii.replace(['/', '\\'], " ");
    let joined = ascii.split_whitespace().collect::<Vec<_>>().join("_");

    UNSAFE_CHARS_REGEX
        .replace_all(&joined, "")
        .trim_matches(|c| c == '.' || c == '_')
        .to_string()
}

/// Derive the download name for a deck's rendered notes, e.g.
/// `Team Deck.pptx` becomes `Team_Deck_notes.docx`.
pub fn notes_filename(upload_name: &str, format: OutputFormat) -> String {
    let safe = secure_filename(upload_name);
    let stem = Path::new(&safe)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();

    if stem.is_empty() {
        format!("speaker_notes.{}", format.extension())
    } else {
        format!("{}_notes.{}", stem, format.extension())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_name_unchanged() {
        assert_eq!(secure_filename("deck.pptx"), "deck.pptx");
    }

    #[test]
    fn test_whitespace_joined_with_underscores() {
        assert_eq!(
            secure_filename("Tabling Training  2025.pptx"),
            "Tabling_Training_2025.pptx"
        );
    }

    #[test]
    fn test_path_components_flattened() {
        assert_eq!(secure_filename("../../etc/passwd"), "etc_passwd");
        assert_eq!(secure_filename(r"C:\decks\q3.pptx"), "C_decks_q3.pptx");
    }

    #[test]
    fn test_non_ascii_decomposed() {
        assert_eq!(secure_filename("Résumé déck.pptx"), "Resume_deck.pptx");
        assert_eq!(secure_filename("日本.pptx"), "pptx");
    }

    #[test]
    fn test_notes_filename() {
        assert_eq!(
            notes_filename("Team Deck.pptx", OutputFormat::Docx),
            "Team_Deck_notes.docx"
        );
        assert_eq!(
            notes_filename("deck.pptx", OutputFormat::Markdown),
            "deck_notes.md"
        );
        assert_eq!(
            notes_filename("???", OutputFormat::Docx),
            "speaker_notes.docx"
        );
    }
}
