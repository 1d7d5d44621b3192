//! PDF rendering of the laid-out report. Needs the `pdf` feature; without it
//! every call reports the renderer as unavailable.

use super::ReportDocument;
use crate::RoiResult;

#[cfg(feature = "pdf")]
pub fn render_pdf(doc: &ReportDocument) -> RoiResult<Vec<u8>> {
    use printpdf::{BuiltinFont, Mm, PdfDocument};

    use super::layout::{layout, FontStyle, PAGE_HEIGHT_PT, PAGE_WIDTH_PT};
    use crate::error::RoiError;

    fn mm(points: f32) -> Mm {
        Mm(points * 25.4 / 72.0)
    }
    let render_err = |e: printpdf::Error| RoiError::RenderError(e.to_string());

    let (pdf, page, layer) =
        PdfDocument::new(&doc.title, mm(PAGE_WIDTH_PT), mm(PAGE_HEIGHT_PT), "Report");
    let canvas = pdf.get_page(page).get_layer(layer);
    let regular = pdf.add_builtin_font(BuiltinFont::Helvetica).map_err(render_err)?;
    let bold = pdf.add_builtin_font(BuiltinFont::HelveticaBold).map_err(render_err)?;
    let italic = pdf
        .add_builtin_font(BuiltinFont::HelveticaOblique)
        .map_err(render_err)?;

    let doc = ascii_document(doc);
    let placed = layout(&doc);
    for item in &placed {
        let font = match item.style {
            FontStyle::Regular => &regular,
            FontStyle::Bold => &bold,
            FontStyle::Italic => &italic,
        };
        // PDF user space grows upwards from the bottom edge.
        canvas.use_text(
            item.text.as_str(),
            item.size,
            mm(item.x),
            mm(PAGE_HEIGHT_PT - item.y),
            font,
        );
    }
    tracing::debug!(items = placed.len(), "rendered report page");

    pdf.save_to_bytes().map_err(render_err)
}

/// Builtin Type1 fonts only encode ASCII reliably; transliterate every
/// string (`"Zürich"` -> `"Zurich"`) before layout so wrapping sees the
/// final text.
#[cfg(feature = "pdf")]
fn ascii_document(doc: &ReportDocument) -> ReportDocument {
    use super::{ReportSection, SectionBody};

    let ascii = |s: &String| deunicode::deunicode(s);
    ReportDocument {
        title: ascii(&doc.title),
        generated_on: doc.generated_on,
        sections: doc
            .sections
            .iter()
            .map(|section| ReportSection {
                heading: ascii(&section.heading),
                body: match &section.body {
                    SectionBody::Lines(lines) => SectionBody::Lines(lines.iter().map(ascii).collect()),
                    SectionBody::Paragraphs(paragraphs) => {
                        SectionBody::Paragraphs(paragraphs.iter().map(ascii).collect())
                    }
                },
            })
            .collect(),
        footnotes: doc.footnotes.iter().map(ascii).collect(),
    }
}

#[cfg(not(feature = "pdf"))]
pub fn render_pdf(_doc: &ReportDocument) -> RoiResult<Vec<u8>> {
    Err(crate::error::RoiError::RendererUnavailable(
        "PDF library not loaded: build mdr-roi-core with the `pdf` feature".into(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::{compute, CalculationInput};
    use crate::report::build_report;
    use chrono::NaiveDate;

    fn sample_doc() -> ReportDocument {
        let input = CalculationInput {
            endpoints: 100,
            ..CalculationInput::default()
        };
        build_report(&input, &compute(&input), NaiveDate::from_ymd_opt(2026, 10, 19).unwrap())
    }

    #[cfg(feature = "pdf")]
    #[test]
    fn test_pdf_bytes_have_pdf_header() {
        let bytes = render_pdf(&sample_doc()).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
    }

    #[cfg(feature = "pdf")]
    #[test]
    fn test_user_labels_transliterated_to_ascii() {
        use crate::calculator::Country;

        let input = CalculationInput {
            endpoints: 100,
            existing_products: vec!["Sécurité Pro".into(), "Firebox".into()],
            country: Country::Unlisted("Österreich".into()),
            ..CalculationInput::default()
        };
        let doc = build_report(&input, &compute(&input), NaiveDate::from_ymd_opt(2026, 10, 19).unwrap());
        let ascii = ascii_document(&doc);

        let lines = match &ascii.section("Your Inputs").unwrap().body {
            crate::report::SectionBody::Lines(lines) => lines.clone(),
            _ => unreachable!(),
        };
        assert!(lines.contains(&"Existing products: Securite Pro, Firebox".to_string()));
        assert!(lines.contains(&"Country: Osterreich".to_string()));
        assert!(ascii
            .sections
            .iter()
            .all(|s| s.heading.is_ascii()));
        assert!(render_pdf(&doc).unwrap().starts_with(b"%PDF-"));
    }

    #[cfg(not(feature = "pdf"))]
    #[test]
    fn test_pdf_unavailable_without_feature() {
        match render_pdf(&sample_doc()).unwrap_err() {
            crate::error::RoiError::RendererUnavailable(msg) => assert!(msg.contains("pdf")),
            e => panic!("Expected RendererUnavailable, got {e:?}"),
        }
    }
}
