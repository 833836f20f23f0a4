//! Markdown output.
//!
//! The title becomes a level-1 header and each section a level-2 header,
//! with the body as a plain paragraph and blank lines between blocks.
//! Line breaks inside a body are hard breaks, and body lines that would read
//! as headers are escaped.

use crate::render::OutputDocument;

/// Serialize a rendered document as markdown text.
///
/// # Example output
/// ```text
/// # Speaker Notes
///
/// ## Slide 2
///
/// Foo
/// ```
pub fn to_markdown(document: &OutputDocument) -> String {
    let mut blocks = vec![format!("# {}", document.title)];

    for section in &document.sections {
        blocks.push(format!("## {}", section.heading));
        blocks.push(body_markdown(&section.body));
    }

    format!("{}\n", blocks.join("\n\n"))
}

fn body_markdown(body: &str) -> String {
    let lines: Vec<String> = body.lines().map(escape_line).collect();
    let mut out = String::new();

    for (idx, line) in lines.iter().enumerate() {
        out.push_str(line);
        if let Some(next) = lines.get(idx + 1) {
            if !line.trim().is_empty() && !next.trim().is_empty() {
                out.push('\\');
            }
            out.push('\n');
        }
    }
    out
}

/// Escape a leading `#` or a setext underline (`===`, `---`).
fn escape_line(line: &str) -> String {
    let trimmed = line.trim_start();
    let indent = &line[..line.len() - trimmed.len()];

    if trimmed.starts_with('#') || is_setext_underline(trimmed) {
        format!("{}\\{}", indent, trimmed)
    } else {
        line.to_string()
    }
}

fn is_setext_underline(line: &str) -> bool {
    let line = line.trim_end();
    !line.is_empty() && (line.chars().all(|c| c == '=') || line.chars().all(|c| c == '-'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Section;

    #[test]
    fn test_title_only() {
        let doc = OutputDocument {
            title: "Speaker Notes".to_string(),
            sections: Vec::new(),
        };
        assert_eq!(to_markdown(&doc), "# Speaker Notes\n");
    }

    #[test]
    fn test_sections_separated_by_blank_lines() {
        let doc = OutputDocument {
            title: "Speaker Notes".to_string(),
            sections: vec![
                Section {
                    heading: "Slide 1".to_string(),
                    body: "Hello\nWorld".to_string(),
                },
                Section {
                    heading: "Slide 3".to_string(),
                    body: "Bye".to_string(),
                },
            ],
        };
        let expected =
            "# Speaker Notes\n\n## Slide 1\n\nHello\\\nWorld\n\n## Slide 3\n\nBye\n";
        assert_eq!(to_markdown(&doc), expected);
    }

    #[test]
    fn test_header_lines_in_body_escaped() {
        let doc = OutputDocument {
            title: "Speaker Notes".to_string(),
            sections: vec![Section {
                heading: "Slide 1".to_string(),
                body: "# Agenda\n## Slide 9\nreal note\n===".to_string(),
            }],
        };
        let markdown = to_markdown(&doc);

        assert_eq!(
            markdown,
            "# Speaker Notes\n\n## Slide 1\n\n\\# Agenda\\\n\\## Slide 9\\\nreal note\\\n\\===\n"
        );
        assert_eq!(markdown.lines().filter(|l| l.starts_with("## ")).count(), 1);
    }

    #[test]
    fn test_blank_lines_in_body_kept_as_paragraph_breaks() {
        let doc = OutputDocument {
            title: "Speaker Notes".to_string(),
            sections: vec![Section {
                heading: "Slide 1".to_string(),
                body: "First\n\n  #3 item\nQ - A".to_string(),
            }],
        };
        assert_eq!(
            to_markdown(&doc),
            "# Speaker Notes\n\n## Slide 1\n\nFirst\n\n  \\#3 item\\\nQ - A\n"
        );
    }
}
