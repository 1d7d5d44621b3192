use super::layout::wrap_text;
use super::{ReportDocument, SectionBody};

const TEXT_COLUMNS: usize = 80;

/// Plain-text rendition of the report, markdown-flavoured.
pub fn render_text(doc: &ReportDocument) -> String {
    let mut out = format!("# {}\n\n{}\n", doc.title, doc.date_line());

    for section in &doc.sections {
        out.push_str(&format!("\n## {}\n\n", section.heading));
        match &section.body {
            SectionBody::Lines(lines) => {
                for line in lines {
                    out.push_str(&format!("- {line}\n"));
                }
            }
            SectionBody::Paragraphs(paragraphs) => {
                for (i, paragraph) in paragraphs.iter().enumerate() {
                    if i > 0 {
                        out.push('\n');
                    }
                    for line in wrap_text(paragraph, TEXT_COLUMNS) {
                        out.push_str(&line);
                        out.push('\n');
                    }
                }
            }
        }
    }

    out.push_str("\n---\n");
    for note in &doc.footnotes {
        out.push_str(note);
        out.push('\n');
    }
    out
}
