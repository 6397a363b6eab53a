//! One-page PDF report: title, two-line insight summary and the forecast table.
//!
//! Only the builtin Helvetica faces are used, so text must stay within the
//! WinAnsi character set.

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};

use crate::domain::{Forecast, Insight};
use crate::report::ReportError;

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 20.0;
const LINE_MM: f32 = 7.0;

const TITLE_PT: f32 = 16.0;
const BODY_PT: f32 = 11.0;

/// Render the report and return the PDF bytes.
pub fn render_pdf(forecast: &Forecast, insight: &Insight) -> Result<Vec<u8>, ReportError> {
    let title = format!("Energy Potential Forecast Report: {}", forecast.source);
    let (doc, page, layer) = PdfDocument::new(
        title.as_str(),
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Layer 1",
    );
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ReportError::Pdf(e.to_string()))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| ReportError::Pdf(e.to_string()))?;
    let layer = doc.get_page(page).get_layer(layer);

    let mut cursor = Cursor::new(&layer);
    cursor.line(&title, TITLE_PT, &bold);
    cursor.gap();

    for line in insight.summary_lines() {
        cursor.line(&line, BODY_PT, &regular);
    }
    cursor.gap();

    cursor.line(&format!("{:<10}{:>20}", "Year", "Potential (MW)"), BODY_PT, &bold);
    for p in &forecast.points {
        cursor.line(&format!("{:<10}{:>20.2}", p.year, p.yhat), BODY_PT, &regular);
    }
    cursor.gap();

    let generated = chrono::Utc::now().format("%Y-%m-%d %H:%M UTC");
    cursor.line(&format!("Generated {generated}"), BODY_PT - 2.0, &regular);

    doc.save_to_bytes().map_err(|e| ReportError::Pdf(e.to_string()))
}

/// Top-down text placement on a single page.
struct Cursor<'a> {
    layer: &'a PdfLayerReference,
    y: f32,
}

impl<'a> Cursor<'a> {
    fn new(layer: &'a PdfLayerReference) -> Self {
        Self {
            layer,
            y: PAGE_HEIGHT_MM - MARGIN_MM,
        }
    }

    fn line(&mut self, text: &str, size: f32, font: &IndirectFontRef) {
        self.layer.use_text(text, size, Mm(MARGIN_MM), Mm(self.y), font);
        self.y -= LINE_MM;
    }

    fn gap(&mut self) {
        self.y -= LINE_MM / 2.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ForecastPoint;
    use crate::report::summarize;

    #[test]
    fn renders_a_pdf_document() {
        let forecast = Forecast {
            source: "Surya".to_string(),
            points: (2025..=2030)
                .map(|year| ForecastPoint {
                    year,
                    yhat: f64::from(year - 2000),
                })
                .collect(),
        };
        let insight = summarize(&forecast).unwrap();
        let bytes = render_pdf(&forecast, &insight).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 500);
    }
}
