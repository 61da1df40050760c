//! PDF statement rendering
//!
//! Direct layout over printpdf's builtin Helvetica, A4 portrait. The
//! builtin fonts are WinAnsi-encoded and have no rupee glyph, so amounts
//! are printed with an `Rs.` prefix here (the WhatsApp text keeps ₹).

use std::io::BufWriter;

use anyhow::Context;
use printpdf::{BuiltinFont, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point};

use super::StatementData;
use crate::utils::time::format_date;

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 15.0;
const BOTTOM: f32 = 25.0;

// Table column x positions (Mm)
const COL_DATE: f32 = MARGIN;
const COL_ITEMS: f32 = 45.0;
const COL_TOTAL: f32 = 120.0;
const COL_ADVANCE: f32 = 145.0;
const COL_REMAINING: f32 = 172.0;

fn push_line(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    text: &str,
    font_size: f32,
    x: f32,
    y: f32,
) {
    layer.use_text(text, font_size, Mm(x), Mm(y), font);
}

fn divider(layer: &PdfLayerReference, y: f32) {
    layer.add_line(Line {
        points: vec![
            (Point::new(Mm(MARGIN), Mm(y)), false),
            (Point::new(Mm(PAGE_WIDTH - MARGIN), Mm(y)), false),
        ],
        is_closed: false,
    });
}

fn money(v: f64) -> String {
    format!("Rs. {:.2}", v)
}

/// One-line item summary for the table: "Supari x2, Mix x1"
fn line_summary(txn: &shared::models::Transaction) -> String {
    if txn.items.is_empty() {
        return "Advance payment".to_string();
    }
    let joined = txn
        .items
        .iter()
        .map(|l| format!("{} x{}", l.name, l.quantity))
        .collect::<Vec<_>>()
        .join(", ");
    if joined.chars().count() > 44 {
        let head: String = joined.chars().take(41).collect();
        format!("{head}...")
    } else {
        joined
    }
}

/// Render an A4 statement PDF, returning the raw bytes.
pub fn render(data: &StatementData) -> anyhow::Result<Vec<u8>> {
    let title = format!("Customer Statement - {}", data.customer.name);
    let (doc, page1, layer1) = PdfDocument::new(&title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");

    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| anyhow::anyhow!("builtin font: {e}"))?;
    let font_bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| anyhow::anyhow!("builtin font: {e}"))?;

    let mut layer = doc.get_page(page1).get_layer(layer1);
    let mut y: f32 = PAGE_HEIGHT - 20.0;

    // Header
    push_line(&layer, &font_bold, &data.business_name, 18.0, MARGIN, y);
    y -= 8.0;
    push_line(&layer, &font, "Account Statement", 13.0, MARGIN, y);
    y -= 6.0;
    push_line(
        &layer,
        &font,
        &format!(
            "Period: {} - {}",
            format_date(data.from),
            format_date(data.to)
        ),
        10.0,
        MARGIN,
        y,
    );
    y -= 4.0;
    divider(&layer, y);

    // Customer block
    y -= 8.0;
    push_line(&layer, &font_bold, "Customer:", 11.0, MARGIN, y);
    push_line(&layer, &font, &data.customer.name, 11.0, 45.0, y);
    y -= 6.0;
    push_line(&layer, &font_bold, "Serial No:", 11.0, MARGIN, y);
    push_line(
        &layer,
        &font,
        &data.customer.serial_number.to_string(),
        11.0,
        45.0,
        y,
    );
    y -= 6.0;
    push_line(&layer, &font_bold, "Mobile:", 11.0, MARGIN, y);
    push_line(&layer, &font, &data.customer.mobile, 11.0, 45.0, y);
    if !data.customer.address.is_empty() {
        y -= 6.0;
        push_line(&layer, &font_bold, "Address:", 11.0, MARGIN, y);
        push_line(&layer, &font, &data.customer.address, 11.0, 45.0, y);
    }
    y -= 4.0;
    divider(&layer, y);

    // Table header
    y -= 8.0;
    table_header(&layer, &font_bold, y);
    y -= 2.0;
    divider(&layer, y);
    y -= 6.0;

    for txn in &data.transactions {
        if y < BOTTOM {
            let (page, inner) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
            layer = doc.get_page(page).get_layer(inner);
            y = PAGE_HEIGHT - 20.0;
            table_header(&layer, &font_bold, y);
            y -= 2.0;
            divider(&layer, y);
            y -= 6.0;
        }

        push_line(&layer, &font, &format_date(txn.created_at), 9.0, COL_DATE, y);
        push_line(&layer, &font, &line_summary(txn), 9.0, COL_ITEMS, y);
        push_line(&layer, &font, &money(txn.total_amount), 9.0, COL_TOTAL, y);
        push_line(&layer, &font, &money(txn.advance_payment), 9.0, COL_ADVANCE, y);
        push_line(
            &layer,
            &font,
            &money(txn.remaining_amount),
            9.0,
            COL_REMAINING,
            y,
        );
        y -= 6.0;
    }

    if data.transactions.is_empty() {
        push_line(
            &layer,
            &font,
            "No transactions in this period.",
            10.0,
            COL_DATE,
            y,
        );
        y -= 6.0;
    }

    // Totals footer
    if y < BOTTOM + 20.0 {
        let (page, inner) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        layer = doc.get_page(page).get_layer(inner);
        y = PAGE_HEIGHT - 20.0;
    }
    divider(&layer, y + 2.0);
    y -= 6.0;
    push_line(&layer, &font_bold, "Total Purchases:", 11.0, COL_TOTAL - 40.0, y);
    push_line(&layer, &font, &money(data.totals.total_amount), 11.0, COL_REMAINING, y);
    y -= 6.0;
    push_line(&layer, &font_bold, "Amount Paid:", 11.0, COL_TOTAL - 40.0, y);
    push_line(&layer, &font, &money(data.totals.total_advance), 11.0, COL_REMAINING, y);
    y -= 6.0;
    push_line(
        &layer,
        &font_bold,
        &format!("{}:", data.totals.closing_label()),
        11.0,
        COL_TOTAL - 40.0,
        y,
    );
    push_line(
        &layer,
        &font_bold,
        &money(data.totals.outstanding.abs()),
        11.0,
        COL_REMAINING,
        y,
    );

    let mut writer = BufWriter::new(Vec::new());
    doc.save(&mut writer)
        .map_err(|e| anyhow::anyhow!("pdf save: {e}"))?;
    writer.into_inner().context("pdf buffer flush")
}

fn table_header(layer: &PdfLayerReference, font_bold: &IndirectFontRef, y: f32) {
    push_line(layer, font_bold, "Date", 10.0, COL_DATE, y);
    push_line(layer, font_bold, "Items", 10.0, COL_ITEMS, y);
    push_line(layer, font_bold, "Total", 10.0, COL_TOTAL, y);
    push_line(layer, font_bold, "Advance", 10.0, COL_ADVANCE, y);
    push_line(layer, font_bold, "Remaining", 10.0, COL_REMAINING, y);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statement::{summarize, test_customer, test_transaction};

    #[test]
    fn renders_a_pdf_document() {
        let transactions: Vec<_> = (0..60)
            .map(|i| test_transaction(100.0 + i as f64, 50.0))
            .collect();
        let totals = summarize(&transactions);
        let data = StatementData {
            business_name: "Test Traders".into(),
            customer: test_customer(),
            transactions,
            from: 1_714_521_600_000,
            to: 1_717_113_600_000,
            totals,
        };

        let bytes = render(&data).expect("pdf renders");
        // %PDF magic and a non-trivial body (60 rows forces pagination)
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 2000);
    }

    #[test]
    fn empty_range_still_renders() {
        let data = StatementData {
            business_name: "Test Traders".into(),
            customer: test_customer(),
            transactions: vec![],
            from: 0,
            to: 0,
            totals: Default::default(),
        };
        assert!(render(&data).unwrap().starts_with(b"%PDF"));
    }
}
