//! Fixed page geometry for the report, in PDF points on a US-letter page.
//!
//! Coordinates are measured from the top-left corner; renderers flip the
//! y axis if their backend needs it.

use serde::{Deserialize, Serialize};

use super::{ReportDocument, SectionBody};

pub const PAGE_WIDTH_PT: f32 = 612.0;
pub const PAGE_HEIGHT_PT: f32 = 792.0;
pub const LEFT_MARGIN_PT: f32 = 40.0;
pub const TOP_PT: f32 = 40.0;
pub const WRAP_WIDTH_PT: f32 = 520.0;
pub const FOOTNOTE_TOP_PT: f32 = 750.0;

/// Mean Helvetica glyph advance as a fraction of the font size.
const AVERAGE_GLYPH_WIDTH: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontStyle {
    Regular,
    Bold,
    Italic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedText {
    pub text: String,
    pub style: FontStyle,
    pub size: f32,
    pub x: f32,
    /// Baseline, from the top of the page
    pub y: f32,
}

/// Greedy word wrap to `max_chars` columns. Words longer than a line are
/// kept whole.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > max_chars {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Columns that fit in `width_pt` at `font_size`.
pub fn columns_for(width_pt: f32, font_size: f32) -> usize {
    (width_pt / (font_size * AVERAGE_GLYPH_WIDTH)).floor().max(1.0) as usize
}

struct Cursor {
    y: f32,
    placed: Vec<PlacedText>,
}

impl Cursor {
    fn put(&mut self, text: &str, style: FontStyle, size: f32) {
        self.placed.push(PlacedText {
            text: text.to_string(),
            style,
            size,
            x: LEFT_MARGIN_PT,
            y: self.y,
        });
    }

    fn wrapped(&mut self, text: &str, style: FontStyle, size: f32, leading: f32) {
        for line in wrap_text(text, columns_for(WRAP_WIDTH_PT, size)) {
            self.put(&line, style, size);
            self.y += leading;
        }
    }
}

/// Place every piece of the document on the page.
pub fn layout(doc: &ReportDocument) -> Vec<PlacedText> {
    let mut cursor = Cursor {
        y: TOP_PT,
        placed: Vec::new(),
    };

    cursor.put(&doc.title, FontStyle::Bold, 20.0);
    cursor.y += 26.0;
    cursor.put(&doc.date_line(), FontStyle::Regular, 12.0);
    cursor.y += 24.0;

    for section in &doc.sections {
        cursor.put(&section.heading, FontStyle::Bold, 14.0);
        cursor.y += 18.0;
        match &section.body {
            SectionBody::Lines(lines) => {
                for line in lines {
                    cursor.wrapped(line, FontStyle::Regular, 11.0, 14.0);
                }
                cursor.y += 6.0;
            }
            SectionBody::Paragraphs(paragraphs) => {
                for paragraph in paragraphs {
                    cursor.wrapped(paragraph, FontStyle::Regular, 10.0, 12.0);
                    cursor.y += 4.0;
                }
            }
        }
    }

    cursor.y = FOOTNOTE_TOP_PT;
    for note in &doc.footnotes {
        cursor.put(note, FontStyle::Italic, 7.0);
        cursor.y += 10.0;
    }

    cursor.placed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::{compute, CalculationInput};
    use crate::report::build_report;
    use chrono::NaiveDate;

    #[test]
    fn test_wrap_text() {
        assert_eq!(wrap_text("a bb ccc dddd", 6), vec!["a bb", "ccc", "dddd"]);
        assert_eq!(wrap_text("unbreakable", 4), vec!["unbreakable"]);
        assert_eq!(wrap_text("", 10), vec![""]);
    }

    #[test]
    fn test_columns_for_body_text() {
        assert_eq!(columns_for(WRAP_WIDTH_PT, 11.0), 94);
        assert_eq!(columns_for(WRAP_WIDTH_PT, 10.0), 104);
    }

    #[test]
    fn test_layout_starts_with_title_and_pins_footnotes() {
        let input = CalculationInput {
            endpoints: 250,
            ..CalculationInput::default()
        };
        let doc = build_report(&input, &compute(&input), NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
        let placed = layout(&doc);

        let title = &placed[0];
        assert_eq!(title.text, "WatchGuard MDR ROI Report");
        assert_eq!(title.style, FontStyle::Bold);
        assert_eq!(title.y, TOP_PT);

        let footnotes: Vec<&PlacedText> =
            placed.iter().filter(|p| p.style == FontStyle::Italic).collect();
        assert_eq!(footnotes.len(), 4);
        assert_eq!(footnotes[0].y, FOOTNOTE_TOP_PT);
        assert_eq!(footnotes[3].y, FOOTNOTE_TOP_PT + 30.0);

        // Body stays above the footnotes on a single page.
        let last_body = placed
            .iter()
            .filter(|p| p.style != FontStyle::Italic)
            .map(|p| p.y)
            .fold(0.0_f32, f32::max);
        assert!(last_body < FOOTNOTE_TOP_PT, "body overflows into footnotes at {last_body}");
    }
}
