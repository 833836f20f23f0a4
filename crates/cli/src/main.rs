//! CLI tool for converting PowerPoint speaker notes to Word or markdown.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use notes_core::render::DEFAULT_TITLE;
use notes_core::{
    to_markdown, DocumentRenderer, EmptyNotesPolicy, Error, NotesExtractor, OutputDocument,
    OutputFormat, PresentationFormat,
};
use notes_docx::DocxWriter;
use notes_pptx::PptxReader;
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::{Path, PathBuf};

/// Extract speaker notes from a PowerPoint deck into a Word or markdown document.
#[derive(Parser, Debug)]
#[command(name = "notes-convert")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input PowerPoint file (.pptx)
    input: PathBuf,

    /// Output file (.docx or .md)
    output: PathBuf,

    /// Output format (default: from the output extension, else docx)
    #[arg(short, long, value_enum)]
    format: Option<FormatArg>,

    /// How to handle slides without notes: skip or placeholder
    #[arg(short, long, default_value = "placeholder")]
    empty_notes: EmptyNotesPolicy,

    /// Document title
    #[arg(short, long, default_value = DEFAULT_TITLE)]
    title: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum FormatArg {
    Docx,
    Markdown,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Docx => OutputFormat::Docx,
            FormatArg::Markdown => OutputFormat::Markdown,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let slide_count = convert(&args)?;

    if args.verbose {
        eprintln!("Successfully processed {} slides", slide_count);
        eprintln!("Written to: {}", args.output.display());
    }

    Ok(())
}

/// Run the whole conversion, returning the number of slides processed.
fn convert(args: &Args) -> Result<usize> {
    if !args.input.exists() {
        return Err(Error::NotFound(format!(
            "Input file '{}' does not exist",
            args.input.display()
        ))
        .into());
    }

    detect_format(&args.input)?;

    log::debug!("Reading {}", args.input.display());
    let presentation = PptxReader::new()
        .open(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;

    let entries = NotesExtractor::new().extract(&presentation);

    let document = DocumentRenderer::new()
        .with_policy(args.empty_notes)
        .with_title(args.title.as_str())
        .render(&entries)
        .context("Failed to render notes")?;

    let format = output_format(args);
    log::debug!(
        "Rendering {} sections as {}",
        document.sections.len(),
        format.extension()
    );

    let content = serialize(&document, format)?;
    write_output(&args.output, &content)?;

    Ok(presentation.slide_count())
}

/// Check the input looks like a PPTX, by signature first and then extension.
fn detect_format(input_path: &Path) -> Result<PresentationFormat> {
    let file = File::open(input_path)
        .with_context(|| format!("Failed to open {}", input_path.display()))?;
    let mut reader = BufReader::new(file);

    let mut magic = Vec::with_capacity(8);
    reader
        .by_ref()
        .take(8)
        .read_to_end(&mut magic)
        .with_context(|| "Failed to read file header")?;

    PresentationFormat::from_magic(&magic)
        .or_else(|| {
            input_path
                .extension()
                .and_then(|e| e.to_str())
                .and_then(PresentationFormat::from_extension)
        })
        .ok_or_else(|| {
            Error::UnsupportedFormat(format!(
                "{} (expected a .pptx file)",
                input_path.display()
            ))
            .into()
        })
}

fn output_format(args: &Args) -> OutputFormat {
    args.format
        .map(OutputFormat::from)
        .or_else(|| OutputFormat::from_path(&args.output))
        .unwrap_or(OutputFormat::Docx)
}

fn serialize(document: &OutputDocument, format: OutputFormat) -> Result<Vec<u8>> {
    match format {
        OutputFormat::Docx => DocxWriter::new()
            .write(document)
            .context("Failed to write DOCX"),
        OutputFormat::Markdown => Ok(to_markdown(document).into_bytes()),
    }
}

/// Write output to a file, removing it again if the write fails part way.
fn write_output(path: &Path, content: &[u8]) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    write_or_remove(path, file, content)
}

fn write_or_remove<W: Write>(path: &Path, mut out: W, content: &[u8]) -> Result<()> {
    let written = out
        .write_all(content)
        .and_then(|_| out.flush())
        .with_context(|| format!("Failed to write to {}", path.display()));

    if written.is_err() {
        drop(out);
        if let Err(e) = std::fs::remove_file(path) {
            log::warn!("Failed to remove partial output {}: {}", path.display(), e);
        }
    }

    written
}

#[cfg(test)]
mod tests {
    use super::*;
    use notes_pptx::fixture::PptxBuilder;
    use std::io::{self, Cursor};
    use zip::ZipArchive;

    fn args(argv: &[&str]) -> Args {
        let mut full = vec!["notes-convert"];
        full.extend_from_slice(argv);
        Args::try_parse_from(full).unwrap()
    }

    fn write_deck(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        let bytes = PptxBuilder::new()
            .slide_without_notes()
            .slide(&["Foo"])
            .slide(&["  "])
            .build();
        std::fs::write(&path, bytes).unwrap();
        path
    }

    #[test]
    fn test_wrong_argument_count_is_usage_error() {
        let err = Args::try_parse_from(["notes-convert", "only-input.pptx"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
        assert_eq!(err.exit_code(), 2);

        let err =
            Args::try_parse_from(["notes-convert", "a.pptx", "b.docx", "c.docx"]).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_missing_input_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("missing.pptx");
        let output = dir.path().join("out.docx");

        let err = convert(&args(&[
            input.to_str().unwrap(),
            output.to_str().unwrap(),
        ]))
        .unwrap_err();

        assert!(err.to_string().contains("does not exist"));
        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::NotFound(_))));
        assert!(!output.exists());
    }

    /// Lets a few bytes reach the file, then fails like a full disk.
    struct ShortWriter(File);

    impl Write for ShortWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.write_all(&buf[..buf.len().min(4)])?;
            Err(io::Error::new(io::ErrorKind::Other, "no space left on device"))
        }

        fn flush(&mut self) -> io::Result<()> {
            self.0.flush()
        }
    }

    #[test]
    fn test_failed_write_removes_partial_output() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("notes.md");
        let file = File::create(&output).unwrap();

        let err = write_or_remove(&output, ShortWriter(file), b"# Speaker Notes\n").unwrap_err();

        assert!(err.to_string().contains("Failed to write to"));
        assert!(format!("{:#}", err).contains("no space left on device"));
        assert!(!output.exists());
    }

    #[test]
    fn test_write_output_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("notes.md");
        write_output(&output, b"# Speaker Notes\n").unwrap();
        assert_eq!(std::fs::read(&output).unwrap(), b"# Speaker Notes\n");
    }

    #[test]
    fn test_markdown_with_placeholder_default() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_deck(dir.path(), "deck.pptx");
        let output = dir.path().join("notes.md");

        let count = convert(&args(&[
            input.to_str().unwrap(),
            output.to_str().unwrap(),
        ]))
        .unwrap();

        assert_eq!(count, 3);
        let markdown = std::fs::read_to_string(&output).unwrap();
        assert_eq!(
            markdown,
            "# Speaker Notes\n\n\
             ## Slide 1\n\nNo notes for this slide.\n\n\
             ## Slide 2\n\nFoo\n\n\
             ## Slide 3\n\nNo notes for this slide.\n"
        );
    }

    #[test]
    fn test_markdown_skip_policy() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_deck(dir.path(), "deck.pptx");
        let output = dir.path().join("notes.txt");

        convert(&args(&[
            input.to_str().unwrap(),
            output.to_str().unwrap(),
            "--format",
            "markdown",
            "--empty-notes",
            "skip",
        ]))
        .unwrap();

        let markdown = std::fs::read_to_string(&output).unwrap();
        assert_eq!(markdown, "# Speaker Notes\n\n## Slide 2\n\nFoo\n");
    }

    #[test]
    fn test_docx_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_deck(dir.path(), "deck.pptx");
        let output = dir.path().join("notes.docx");

        convert(&args(&[
            input.to_str().unwrap(),
            output.to_str().unwrap(),
        ]))
        .unwrap();

        let bytes = std::fs::read(&output).unwrap();
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut document = String::new();
        archive
            .by_name("word/document.xml")
            .unwrap()
            .read_to_string(&mut document)
            .unwrap();
        assert!(document.contains("Slide 3"));
        assert!(document.contains("No notes for this slide."));
    }

    #[test]
    fn test_corrupt_input_leaves_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("broken.pptx");
        std::fs::write(&input, b"PK\x03\x04 not really a zip").unwrap();
        let output = dir.path().join("notes.docx");

        let err = convert(&args(&[
            input.to_str().unwrap(),
            output.to_str().unwrap(),
        ]))
        .unwrap_err();

        assert!(format!("{:#}", err).contains("ZIP"));
        assert!(!output.exists());
    }

    #[test]
    fn test_unrecognized_input_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("notes.txt");
        std::fs::write(&input, b"plain text").unwrap();
        let output = dir.path().join("notes.docx");

        let err = convert(&args(&[
            input.to_str().unwrap(),
            output.to_str().unwrap(),
        ]))
        .unwrap_err();

        assert!(err
            .to_string()
            .contains("Unsupported or unrecognized file format"));
    }

    #[test]
    fn test_output_format_resolution() {
        assert_eq!(output_format(&args(&["a.pptx", "b.md"])), OutputFormat::Markdown);
        assert_eq!(output_format(&args(&["a.pptx", "b.docx"])), OutputFormat::Docx);
        assert_eq!(output_format(&args(&["a.pptx", "b"])), OutputFormat::Docx);
        assert_eq!(
            output_format(&args(&["a.pptx", "b.docx", "-f", "markdown"])),
            OutputFormat::Markdown
        );
    }
}
