//! A4 invoice rendering with the PDF built-in Helvetica fonts.
//!
//! Layout runs top to bottom with a y cursor in millimetres. Items that do
//! not fit continue on a new page with the table header repeated, and every
//! page gets the footer with its page number.

use crate::config::PdfBranding;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point, Polygon, Rgb,
};
use rust_decimal::Decimal;
use service_core::currency::format_with_symbol;
use service_core::error::AppError;
use service_core::models::{Customer, Invoice};
use std::io::BufWriter;

/// Every PDF amount is printed in this currency regardless of the invoice's.
pub const PDF_CURRENCY: &str = "USD";

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 15.0;
const ROW_HEIGHT: f32 = 7.0;
/// Lowest y a table row may start at before breaking to a new page.
const CONTENT_FLOOR: f32 = 35.0;
const CONTINUATION_TOP: f32 = 275.0;

const BRAND_BLUE: (u8, u8, u8) = (25, 103, 210);
const STRIPE: (u8, u8, u8) = (240, 245, 250);
const TEXT_DARK: (u8, u8, u8) = (33, 33, 33);
const TEXT_MUTED: (u8, u8, u8) = (110, 110, 110);
const WHITE: (u8, u8, u8) = (255, 255, 255);

const COL_DESCRIPTION: f32 = MARGIN + 2.0;
const COL_QTY: f32 = 118.0;
const COL_UNIT_PRICE_RIGHT: f32 = 160.0;
const COL_AMOUNT_RIGHT: f32 = PAGE_WIDTH - MARGIN - 2.0;
const DESCRIPTION_MAX_CHARS: usize = 55;
const NOTES_MAX_CHARS: usize = 95;

pub struct RenderedPdf {
    pub bytes: Vec<u8>,
    pub pages: usize,
}

/// Due date shown on the document: the invoice's own, else issue + 30 days.
pub fn resolve_due_date(invoice: &Invoice, issue_date: NaiveDate) -> NaiveDate {
    invoice
        .due_date
        .unwrap_or_else(|| issue_date + Duration::days(30))
}

pub fn pdf_filename(invoice_number: &str) -> String {
    format!("invoice-{}.pdf", invoice_number)
}

fn money(amount: Decimal) -> String {
    format_with_symbol(amount, PDF_CURRENCY)
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", kept)
}

/// Greedy word wrap; words longer than `width` are hard-split.
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let mut word: String = word.to_string();
            while word.chars().count() > width {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                let head: String = word.chars().take(width).collect();
                word = word.chars().skip(width).collect();
                lines.push(head);
            }
            let needed = if current.is_empty() {
                word.chars().count()
            } else {
                current.chars().count() + 1 + word.chars().count()
            };
            if needed > width && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(&word);
        }
        lines.push(current);
    }
    lines
}

/// Approximate Helvetica advance width; used only to right-align numbers.
fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * 0.55 * 0.3528
}

fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb(Rgb::new(
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0,
        None,
    ))
}

fn render_error(e: impl std::fmt::Display) -> AppError {
    AppError::InternalError(anyhow::anyhow!("Failed to render PDF: {}", e))
}

struct PageWriter<'a> {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    page: usize,
    y: f32,
    branding: &'a PdfBranding,
    generated_at: NaiveDateTime,
}

impl<'a> PageWriter<'a> {
    fn new(
        title: &str,
        branding: &'a PdfBranding,
        generated_at: NaiveDateTime,
    ) -> Result<Self, AppError> {
        let (doc, page, layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        let layer = doc.get_page(page).get_layer(layer);
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(render_error)?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(render_error)?;

        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            page: 1,
            y: PAGE_HEIGHT,
            branding,
            generated_at,
        })
    }

    fn text(&self, text: &str, size: f32, x: f32, y: f32, bold: bool, color: (u8, u8, u8)) {
        let font = if bold { &self.bold } else { &self.regular };
        self.layer.set_fill_color(rgb(color));
        self.layer.use_text(text, size, Mm(x), Mm(y), font);
    }

    fn text_right(&self, text: &str, size: f32, right: f32, y: f32, bold: bool, color: (u8, u8, u8)) {
        self.text(text, size, right - text_width(text, size), y, bold, color);
    }

    fn fill_rect(&self, x: f32, y: f32, width: f32, height: f32, color: (u8, u8, u8)) {
        let corners = vec![
            (Point::new(Mm(x), Mm(y)), false),
            (Point::new(Mm(x + width), Mm(y)), false),
            (Point::new(Mm(x + width), Mm(y + height)), false),
            (Point::new(Mm(x), Mm(y + height)), false),
        ];
        self.layer.set_fill_color(rgb(color));
        self.layer.add_polygon(Polygon {
            rings: vec![corners],
            mode: PaintMode::Fill,
            winding_order: WindingOrder::NonZero,
        });
    }

    fn rule(&self, y: f32, color: (u8, u8, u8)) {
        self.layer.set_outline_color(rgb(color));
        self.layer.set_outline_thickness(0.5);
        self.layer.add_line(Line {
            points: vec![
                (Point::new(Mm(MARGIN), Mm(y)), false),
                (Point::new(Mm(PAGE_WIDTH - MARGIN), Mm(y)), false),
            ],
            is_closed: false,
        });
    }

    fn footer(&self) {
        self.rule(20.0, TEXT_MUTED);
        let issuer = format!(
            "{} | {} | {}",
            self.branding.company_name, self.branding.website, self.branding.email
        );
        self.text(&issuer, 8.0, MARGIN, 14.0, false, TEXT_MUTED);
        let stamp = format!(
            "Generated on {} | Page {}",
            self.generated_at.format("%d-%m-%Y %H:%M"),
            self.page
        );
        self.text(&stamp, 8.0, MARGIN, 9.0, false, TEXT_MUTED);
    }

    /// Finish the current page and continue on a fresh one.
    fn next_page(&mut self) {
        self.footer();
        let (page, layer) = self.doc.add_page(
            Mm(PAGE_WIDTH),
            Mm(PAGE_HEIGHT),
            format!("Page {} Layer 1", self.page + 1),
        );
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.page += 1;
        self.y = CONTINUATION_TOP;
    }

    /// Break to a new page unless `height` fits above the footer.
    fn reserve(&mut self, height: f32) -> bool {
        if self.y - height < CONTENT_FLOOR {
            self.next_page();
            return true;
        }
        false
    }

    fn header_band(&mut self) {
        let branding = self.branding;
        self.fill_rect(0.0, 262.0, PAGE_WIDTH, 35.0, BRAND_BLUE);
        self.text(&branding.company_name, 22.0, MARGIN, 280.0, true, WHITE);
        self.text(&branding.tagline, 10.0, MARGIN, 272.0, false, WHITE);
        self.text_right(&branding.website, 9.0, PAGE_WIDTH - MARGIN, 283.0, false, WHITE);
        self.text_right(&branding.email, 9.0, PAGE_WIDTH - MARGIN, 277.0, false, WHITE);
        self.text_right(&branding.phone, 9.0, PAGE_WIDTH - MARGIN, 271.0, false, WHITE);
        self.y = 250.0;
    }

    fn metadata(&mut self, invoice: &Invoice, issue_date: NaiveDate) {
        self.text("INVOICE", 20.0, MARGIN, self.y, true, TEXT_DARK);

        let right = PAGE_WIDTH - MARGIN;
        let rows = [
            format!("Invoice No: {}", invoice.invoice_number),
            format!("Issue Date: {}", issue_date.format("%d-%m-%Y")),
            format!(
                "Due Date: {}",
                resolve_due_date(invoice, issue_date).format("%d-%m-%Y")
            ),
            format!(
                "Status: {}",
                invoice.payment_status.as_str().replace('_', " ").to_uppercase()
            ),
        ];
        let mut y = self.y + 2.0;
        for row in rows.iter() {
            self.text_right(row, 10.0, right, y, false, TEXT_DARK);
            y -= 5.5;
        }
        self.y = y - 6.0;
    }

    fn parties(&mut self, invoice: &Invoice, customer: Option<&Customer>) {
        let from_x = MARGIN;
        let bill_x = 110.0;
        let top = self.y;

        self.text("FROM", 10.0, from_x, top, true, BRAND_BLUE);
        self.text("BILL TO", 10.0, bill_x, top, true, BRAND_BLUE);

        let branding = self.branding;
        let from_lines = [
            branding.company_name.clone(),
            branding.website.clone(),
            branding.email.clone(),
            branding.phone.clone(),
        ];

        let bill_lines: Vec<String> = match customer {
            Some(c) => {
                let city_line = [c.city.as_deref(), c.postal_code.as_deref()]
                    .into_iter()
                    .flatten()
                    .filter(|s| !s.trim().is_empty())
                    .collect::<Vec<_>>()
                    .join(" ");
                [
                    Some(c.name.clone()),
                    c.company_name.clone(),
                    c.address.clone(),
                    Some(city_line),
                    c.country.clone(),
                    Some(c.email.clone()),
                    c.phone.clone(),
                ]
                .into_iter()
                .flatten()
                .filter(|line| !line.trim().is_empty())
                .collect()
            }
            None => [invoice.customer_name.clone(), invoice.customer_email.clone()]
                .into_iter()
                .flatten()
                .collect(),
        };

        let mut y = top - 6.0;
        for (i, line) in from_lines.iter().enumerate() {
            self.text(line, 10.0, from_x, y, i == 0, TEXT_DARK);
            y -= 5.0;
        }
        let from_bottom = y;

        let mut y = top - 6.0;
        for (i, line) in bill_lines.iter().enumerate() {
            self.text(&truncate(line, 45), 10.0, bill_x, y, i == 0, TEXT_DARK);
            y -= 5.0;
        }

        self.y = from_bottom.min(y) - 8.0;
    }

    fn table_header(&mut self) {
        let width = PAGE_WIDTH - 2.0 * MARGIN;
        self.fill_rect(MARGIN, self.y - 2.5, width, 8.0, BRAND_BLUE);
        self.text("Description", 10.0, COL_DESCRIPTION, self.y, true, WHITE);
        self.text("Qty", 10.0, COL_QTY, self.y, true, WHITE);
        self.text_right("Unit Price", 10.0, COL_UNIT_PRICE_RIGHT, self.y, true, WHITE);
        self.text_right("Amount", 10.0, COL_AMOUNT_RIGHT, self.y, true, WHITE);
        self.y -= 8.0;
    }

    fn items(&mut self, invoice: &Invoice) {
        self.table_header();
        let width = PAGE_WIDTH - 2.0 * MARGIN;

        for (index, item) in invoice.items.iter().enumerate() {
            if self.reserve(ROW_HEIGHT) {
                self.table_header();
            }
            if index % 2 == 1 {
                self.fill_rect(MARGIN, self.y - 2.5, width, ROW_HEIGHT, STRIPE);
            }
            self.text(
                &truncate(&item.description, DESCRIPTION_MAX_CHARS),
                9.5,
                COL_DESCRIPTION,
                self.y,
                false,
                TEXT_DARK,
            );
            self.text(&item.quantity.to_string(), 9.5, COL_QTY, self.y, false, TEXT_DARK);
            self.text_right(
                &money(item.unit_price),
                9.5,
                COL_UNIT_PRICE_RIGHT,
                self.y,
                false,
                TEXT_DARK,
            );
            self.text_right(
                &money(item.line_total()),
                9.5,
                COL_AMOUNT_RIGHT,
                self.y,
                false,
                TEXT_DARK,
            );
            self.y -= ROW_HEIGHT;
        }
        self.rule(self.y + 3.0, TEXT_MUTED);
        self.y -= 6.0;
    }

    fn totals(&mut self, invoice: &Invoice) {
        self.reserve(40.0);

        let label_x = 120.0;
        let mut rows = vec![
            ("Subtotal".to_string(), money(invoice.subtotal)),
            (
                format!("Tax ({:.1}%)", invoice.tax),
                money(invoice.tax_amount()),
            ),
        ];
        if invoice.discount > Decimal::ZERO {
            rows.push(("Discount".to_string(), format!("-{}", money(invoice.discount))));
        }

        for (label, amount) in rows.iter() {
            self.text(label, 10.0, label_x, self.y, false, TEXT_DARK);
            self.text_right(amount, 10.0, COL_AMOUNT_RIGHT, self.y, false, TEXT_DARK);
            self.y -= 6.0;
        }

        self.y -= 2.0;
        let band_width = PAGE_WIDTH - MARGIN - (label_x - 3.0);
        self.fill_rect(label_x - 3.0, self.y - 3.0, band_width, 10.0, BRAND_BLUE);
        self.text("TOTAL", 12.0, label_x, self.y, true, WHITE);
        self.text_right(&money(invoice.total), 12.0, COL_AMOUNT_RIGHT, self.y, true, WHITE);
        self.y -= 16.0;
    }

    fn notes(&mut self, invoice: &Invoice, due_date: NaiveDate) {
        let mut lines: Vec<String> = invoice
            .notes
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .map(|n| wrap_text(n, NOTES_MAX_CHARS))
            .unwrap_or_default();
        lines.push(format!(
            "Payment is due by {}. Please include the invoice number with your payment.",
            due_date.format("%d-%m-%Y")
        ));

        self.reserve(12.0);
        self.text("Notes & Terms", 11.0, MARGIN, self.y, true, BRAND_BLUE);
        self.y -= 6.0;
        for line in lines.iter() {
            self.reserve(5.0);
            self.text(line, 9.0, MARGIN, self.y, false, TEXT_DARK);
            self.y -= 5.0;
        }
    }

    fn finish(self) -> Result<RenderedPdf, AppError> {
        self.footer();
        let pages = self.page;
        let mut writer = BufWriter::new(Vec::<u8>::new());
        self.doc.save(&mut writer).map_err(render_error)?;
        let bytes = writer.into_inner().map_err(render_error)?;
        Ok(RenderedPdf { bytes, pages })
    }
}

/// Invoice document renderer for one issuer.
#[derive(Debug, Clone)]
pub struct InvoicePdf {
    branding: PdfBranding,
}

impl InvoicePdf {
    pub fn new(branding: PdfBranding) -> Self {
        Self { branding }
    }

    /// Render `invoice`. The issue date printed is the generation date.
    pub fn render(
        &self,
        invoice: &Invoice,
        customer: Option<&Customer>,
        generated_at: NaiveDateTime,
    ) -> Result<RenderedPdf, AppError> {
        let issue_date = generated_at.date();
        let title = format!("Invoice {}", invoice.invoice_number);
        let mut writer = PageWriter::new(&title, &self.branding, generated_at)?;

        writer.header_band();
        writer.metadata(invoice, issue_date);
        writer.parties(invoice, customer);
        writer.items(invoice);
        writer.totals(invoice);
        writer.notes(invoice, resolve_due_date(invoice, issue_date));
        writer.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn generated_at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 1)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    fn invoice_with_items(count: usize) -> Invoice {
        let items: Vec<_> = (0..count)
            .map(|i| json!({ "description": format!("Line {}", i), "quantity": 1, "unit_price": 10, "total": 10 }))
            .collect();
        serde_json::from_value(json!({
            "id": "inv-1",
            "customer_id": "c-1",
            "invoice_number": "INV-2026-0001",
            "items": items,
            "subtotal": count * 10,
            "tax": 10,
            "discount": 5,
            "total": count * 10,
            "notes": "Thanks for your business"
        }))
        .unwrap()
    }

    #[test]
    fn due_date_prefers_invoice_value() {
        let issue = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let mut invoice = invoice_with_items(0);
        assert_eq!(
            resolve_due_date(&invoice, issue),
            NaiveDate::from_ymd_opt(2026, 3, 31).unwrap()
        );

        invoice.due_date = NaiveDate::from_ymd_opt(2026, 4, 15);
        assert_eq!(
            resolve_due_date(&invoice, issue),
            NaiveDate::from_ymd_opt(2026, 4, 15).unwrap()
        );
    }

    #[test]
    fn filename_uses_invoice_number() {
        assert_eq!(pdf_filename("INV-2026-0001"), "invoice-INV-2026-0001.pdf");
    }

    #[test]
    fn long_text_is_truncated_and_wrapped() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghijkl", 8), "abcde...");

        let lines = wrap_text("alpha beta gamma delta", 11);
        assert_eq!(lines, vec!["alpha beta", "gamma delta"]);

        let lines = wrap_text("abcdefghij", 4);
        assert_eq!(lines, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn renders_single_page_pdf() {
        let pdf = InvoicePdf::new(PdfBranding::default())
            .render(&invoice_with_items(3), None, generated_at())
            .unwrap();

        assert!(pdf.bytes.starts_with(b"%PDF"));
        assert_eq!(pdf.pages, 1);
    }

    #[test]
    fn many_items_continue_on_new_pages() {
        let pdf = InvoicePdf::new(PdfBranding::default())
            .render(&invoice_with_items(60), None, generated_at())
            .unwrap();

        assert!(pdf.pages >= 2);
        assert!(pdf.bytes.starts_with(b"%PDF"));
    }
}
