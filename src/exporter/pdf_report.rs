// Styled PDF report: summary, top five, full table.
use crate::model::{ExportError, MarketRecord, SummaryStats};
use crate::utils::{format_change, format_compact_usd, format_price, format_thousands};
use printpdf::path::PaintMode;
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
    Rect, Rgb,
};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

// US Letter
const PAGE_W: f32 = 215.9;
const PAGE_H: f32 = 279.4;
const MARGIN: f32 = 18.0;
const PT_TO_MM: f32 = 0.3528;
// Helvetica averages about half an em per glyph.
const GLYPH_EM: f32 = 0.5;

const HEADER_ROW_H: f32 = 9.0;
const BODY_ROW_H: f32 = 7.0;
const HEADER_FONT: f32 = 11.0;
const BODY_FONT: f32 = 9.0;

const TOP_COLUMNS: [(&str, f32); 5] = [
    ("Rank", 16.0),
    ("Name", 58.0),
    ("Symbol", 28.0),
    ("Market Cap", 45.0),
    ("Price (USD)", 32.0),
];

const DATA_COLUMNS: [(&str, f32); 5] = [
    ("Name", 52.0),
    ("Symbol", 26.0),
    ("Price (USD)", 35.0),
    ("Market Cap", 40.0),
    ("24h Change", 26.0),
];

fn rgb(r: u8, g: u8, b: u8) -> Color {
    Color::Rgb(Rgb::new(
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0,
        None,
    ))
}

fn light_blue() -> Color {
    rgb(173, 216, 230)
}

fn white_smoke() -> Color {
    rgb(245, 245, 245)
}

fn beige() -> Color {
    rgb(245, 245, 220)
}

fn black() -> Color {
    rgb(0, 0, 0)
}

fn pdf_err<E: std::fmt::Debug>(e: E) -> ExportError {
    ExportError::Pdf(format!("{:?}", e))
}

fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * GLYPH_EM * PT_TO_MM
}

/// Builtin fonts only cover Latin-1.
fn pdf_safe(text: &str) -> String {
    text.chars()
        .map(|c| if (c as u32) < 0x100 { c } else { '?' })
        .collect()
}

fn fit(text: &str, width: f32, size: f32) -> String {
    let max_chars = ((width - 2.0) / (size * GLYPH_EM * PT_TO_MM)).floor().max(1.0) as usize;
    let safe = pdf_safe(text);
    if safe.chars().count() <= max_chars {
        return safe;
    }
    let mut cut: String = safe.chars().take(max_chars.saturating_sub(1)).collect();
    cut.push('.');
    cut
}

struct ReportWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    /// Distance of the next free line from the page bottom, in mm.
    cursor: f32,
}

impl ReportWriter {
    fn new(title: &str) -> Result<Self, ExportError> {
        let (doc, page, layer) = PdfDocument::new(title, Mm(PAGE_W), Mm(PAGE_H), "Layer 1");
        let regular = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_err)?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(pdf_err)?;
        let layer = doc.get_page(page).get_layer(layer);
        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            cursor: PAGE_H - MARGIN,
        })
    }

    fn new_page(&mut self) {
        let (page, layer) = self.doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.cursor = PAGE_H - MARGIN;
    }

    /// Starts a new page when `height` does not fit; returns whether it did.
    fn ensure_space(&mut self, height: f32) -> bool {
        if self.cursor - height < MARGIN {
            self.new_page();
            true
        } else {
            false
        }
    }

    fn spacer(&mut self, height: f32) {
        if !self.ensure_space(height) {
            self.cursor -= height;
        }
    }

    fn line(&mut self, text: &str, size: f32, bold: bool, centered: bool) {
        let line_h = size * PT_TO_MM * 1.5;
        self.ensure_space(line_h);
        self.cursor -= line_h;
        let text = pdf_safe(text);
        let x = if centered {
            ((PAGE_W - text_width(&text, size)) / 2.0).max(MARGIN)
        } else {
            MARGIN
        };
        let font = if bold { &self.bold } else { &self.regular };
        self.layer.set_fill_color(black());
        self.layer.use_text(text, size, Mm(x), Mm(self.cursor), font);
    }

    fn heading(&mut self, text: &str) {
        // keep a heading on the same page as at least one table row
        self.ensure_space(14.0 * PT_TO_MM * 1.5 + HEADER_ROW_H + BODY_ROW_H);
        self.line(text, 14.0, true, false);
        self.spacer(2.0);
    }

    fn row(&mut self, cells: &[(String, f32)], header: bool) {
        let (height, size, fill, ink) = if header {
            (HEADER_ROW_H, HEADER_FONT, light_blue(), white_smoke())
        } else {
            (BODY_ROW_H, BODY_FONT, beige(), black())
        };
        let top = self.cursor;
        let mut x = MARGIN;

        for (text, width) in cells {
            let width = *width;
            self.layer.set_fill_color(fill.clone());
            self.layer.set_outline_color(black());
            self.layer.set_outline_thickness(0.75);
            self.layer.add_rect(
                Rect::new(Mm(x), Mm(top - height), Mm(x + width), Mm(top))
                    .with_mode(PaintMode::FillStroke),
            );

            let text = fit(text, width, size);
            let tx = x + ((width - text_width(&text, size)) / 2.0).max(1.0);
            let ty = top - height / 2.0 - size * PT_TO_MM * 0.35;
            let font = if header { &self.bold } else { &self.regular };
            self.layer.set_fill_color(ink.clone());
            self.layer.use_text(text, size, Mm(tx), Mm(ty), font);

            x += width;
        }
        self.cursor -= height;
    }

    /// Draws a grid table, repeating the header row on every page it spans.
    fn table(&mut self, columns: &[(&str, f32)], rows: &[Vec<String>]) {
        let header: Vec<(String, f32)> = columns.iter().map(|(h, w)| (h.to_string(), *w)).collect();
        self.ensure_space(HEADER_ROW_H + BODY_ROW_H);
        self.row(&header, true);

        for values in rows {
            if self.ensure_space(BODY_ROW_H) {
                self.row(&header, true);
            }
            let cells: Vec<(String, f32)> = values
                .iter()
                .cloned()
                .zip(columns.iter().map(|(_, w)| *w))
                .collect();
            self.row(&cells, false);
        }
    }

    fn save(self, path: &Path) -> Result<(), ExportError> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.doc.save(&mut writer).map_err(pdf_err)
    }
}

fn summary_lines(stats: &SummaryStats) -> Vec<String> {
    let or_none = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());
    vec![
        format!("Total Cryptocurrencies: {}", stats.total_count),
        format!("Total Market Cap: {}", format_compact_usd(stats.total_market_cap)),
        format!("Average Price (USD): ${}", format_thousands(stats.average_price, 2)),
        format!("Average 24h Change: {}", format_change(stats.average_change_24h)),
        format!("Highest Priced Coin: {}", or_none(&stats.highest_priced)),
        format!("Top Gainer (24h): {}", or_none(&stats.top_gainer)),
        format!("Top Loser (24h): {}", or_none(&stats.top_loser)),
    ]
}

pub fn write_pdf(
    path: &Path,
    records: &[MarketRecord],
    stats: &SummaryStats,
) -> Result<(), ExportError> {
    let mut report = ReportWriter::new("Cryptocurrency Market Analysis Report")?;

    report.line("Cryptocurrency Market Analysis Report", 20.0, true, true);
    report.spacer(6.0);
    report.line(
        &format!(
            "Generated on: {} UTC",
            stats.generated_at.format("%Y-%m-%d %H:%M:%S")
        ),
        10.0,
        false,
        false,
    );
    report.spacer(6.0);

    report.heading("Summary Statistics");
    for line in summary_lines(stats) {
        report.line(&line, 10.0, false, false);
    }
    report.spacer(6.0);

    report.heading("Top 5 Cryptocurrencies by Market Cap");
    let top_rows: Vec<Vec<String>> = stats
        .top_by_market_cap
        .iter()
        .enumerate()
        .map(|(i, r)| {
            vec![
                (i + 1).to_string(),
                r.name.clone(),
                r.symbol.clone(),
                format_compact_usd(r.market_cap),
                format_price(r.price),
            ]
        })
        .collect();
    report.table(&TOP_COLUMNS, &top_rows);
    report.spacer(8.0);

    report.heading("Cryptocurrency Data Table");
    let data_rows: Vec<Vec<String>> = records
        .iter()
        .map(|r| {
            vec![
                r.name.clone(),
                r.symbol.clone(),
                format_price(r.price),
                format!("${}", format_thousands(r.market_cap, 0)),
                format_change(r.change_24h),
            ]
        })
        .collect();
    report.table(&DATA_COLUMNS, &data_rows);

    report.save(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_truncates_long_text() {
        let cut = fit("A very long cryptocurrency name indeed", 20.0, 9.0);
        assert!(cut.ends_with('.'));
        assert!(text_width(&cut, 9.0) <= 20.0);
        assert_eq!(fit("BTC", 20.0, 9.0), "BTC");
    }

    #[test]
    fn non_latin_glyphs_are_replaced() {
        assert_eq!(pdf_safe("Café 币"), "Café ?");
    }

    #[test]
    fn tables_fit_the_page_width() {
        let usable = PAGE_W - 2.0 * MARGIN;
        assert!(TOP_COLUMNS.iter().map(|(_, w)| w).sum::<f32>() <= usable);
        assert!(DATA_COLUMNS.iter().map(|(_, w)| w).sum::<f32>() <= usable);
    }
}
