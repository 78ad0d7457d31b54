use docx_rs::{
    DocumentChild, Paragraph, ParagraphChild, RunChild, Table, TableCellContent, TableChild,
    TableRowChild,
};

use super::ExtractionError;

pub const DOCX_UNREADABLE: &str = "Failed to parse Word document.";

/// Raw text of a `.docx` body: one line per paragraph, table cells included
/// in reading order. Formatting is dropped.
///
/// Blocking: call through `spawn_blocking`.
pub fn extract_docx_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    let docx = docx_rs::read_docx(bytes).map_err(|e| {
        tracing::warn!("docx decode failed: {e}");
        ExtractionError::Unreadable(DOCX_UNREADABLE.to_string())
    })?;

    let mut lines = Vec::new();
    for child in &docx.document.children {
        match child {
            DocumentChild::Paragraph(p) => lines.push(paragraph_text(p)),
            DocumentChild::Table(t) => collect_table(t, &mut lines),
            _ => {}
        }
    }
    Ok(lines.join("\n"))
}

fn paragraph_text(paragraph: &Paragraph) -> String {
    let mut text = String::new();
    push_children(&paragraph.children, &mut text);
    text
}

/// Hyperlinks nest their own runs; contact lines (email, GitHub, LinkedIn)
/// usually live there.
fn push_children(children: &[ParagraphChild], text: &mut String) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => {
                for run_child in &run.children {
                    match run_child {
                        RunChild::Text(t) => text.push_str(&t.text),
                        RunChild::Tab(_) => text.push('\t'),
                        RunChild::Break(_) => text.push('\n'),
                        _ => {}
                    }
                }
            }
            ParagraphChild::Hyperlink(link) => push_children(&link.children, text),
            _ => {}
        }
    }
}

fn collect_table(table: &Table, lines: &mut Vec<String>) {
    for row in &table.rows {
        let TableChild::TableRow(row) = row;
        for cell in &row.cells {
            let TableRowChild::TableCell(cell) = cell;
            for content in &cell.children {
                match content {
                    TableCellContent::Paragraph(p) => lines.push(paragraph_text(p)),
                    TableCellContent::Table(nested) => collect_table(nested, lines),
                    _ => {}
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use docx_rs::{Docx, Hyperlink, HyperlinkType, Run, TableCell, TableRow};

    use super::*;

    fn pack(docx: Docx) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        docx.build().pack(&mut cursor).unwrap();
        cursor.into_inner()
    }

    #[test]
    fn test_paragraphs_become_lines() {
        let bytes = pack(
            Docx::new()
                .add_paragraph(Paragraph::new().add_run(Run::new().add_text("Jane Doe")))
                .add_paragraph(
                    Paragraph::new()
                        .add_run(Run::new().add_text("Backend "))
                        .add_run(Run::new().add_text("Engineer")),
                ),
        );

        let text = extract_docx_text(&bytes).unwrap();
        assert_eq!(text, "Jane Doe\nBackend Engineer");
    }

    #[test]
    fn test_table_cells_are_included() {
        let table = Table::new(vec![TableRow::new(vec![
            TableCell::new().add_paragraph(Paragraph::new().add_run(Run::new().add_text("Rust"))),
            TableCell::new().add_paragraph(Paragraph::new().add_run(Run::new().add_text("Go"))),
        ])]);
        let bytes = pack(
            Docx::new()
                .add_paragraph(Paragraph::new().add_run(Run::new().add_text("Skills")))
                .add_table(table),
        );

        let text = extract_docx_text(&bytes).unwrap();
        assert!(text.starts_with("Skills"));
        assert!(text.contains("Rust"));
        assert!(text.contains("Go"));
    }

    #[test]
    fn test_hyperlink_text_is_kept() {
        let bytes = pack(
            Docx::new().add_paragraph(
                Paragraph::new()
                    .add_run(Run::new().add_text("Contact: "))
                    .add_hyperlink(
                        Hyperlink::new("contact", HyperlinkType::Anchor)
                            .add_run(Run::new().add_text("github.com/janedoe")),
                    )
                    .add_run(Run::new().add_text(" | jane@example.com")),
            ),
        );

        let text = extract_docx_text(&bytes).unwrap();
        assert_eq!(text, "Contact: github.com/janedoe | jane@example.com");
    }

    #[test]
    fn test_not_a_zip_is_unreadable() {
        let err = extract_docx_text(b"PK but not really").unwrap_err();
        assert_eq!(err, ExtractionError::Unreadable(DOCX_UNREADABLE.to_string()));
    }
}
