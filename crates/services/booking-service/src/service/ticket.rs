//! Ticket rendering - single A5 page PDF with a QR code.
//!
//! The QR code encodes `BOOKING:<booking id>` and is drawn as filled
//! squares, one per dark module.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use printpdf::{BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, PdfLayerReference, Rect, Rgb};
use qrcode::QrCode;
use regex::Regex;

use common::{AppError, AppResult};
use domain::{
    BookingDetails, TICKET_FILENAME_ID_LEN, TICKET_FILENAME_TITLE_LEN, TICKET_QR_PREFIX,
};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

static FILENAME_UNSAFE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9]").expect("filename regex is valid"));

/// A5 page, in millimetres
pub const PAGE_WIDTH: f32 = 148.0;
pub const PAGE_HEIGHT: f32 = 210.0;
const MARGIN: f32 = 14.0;

/// Side of the QR square, quiet zone included
pub const QR_SIZE: f32 = 50.0;
pub const QR_LEFT: f32 = (PAGE_WIDTH - QR_SIZE) / 2.0;
pub const QR_BOTTOM: f32 = 28.0;
/// Light modules around the symbol, as recommended by the QR standard
const QR_QUIET_ZONE: usize = 4;

/// A rendered ticket ready to be sent to the client
#[derive(Debug, Clone)]
pub struct Ticket {
    pub filename: String,
    pub content: Vec<u8>,
}

/// Renders a confirmed booking into a printable document.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait TicketRenderer: Send + Sync {
    fn render(&self, details: &BookingDetails) -> AppResult<Vec<u8>>;
}

/// The text a ticket carries, independent of the output format
#[derive(Debug, Clone, PartialEq)]
pub struct TicketContent {
    pub title: String,
    pub date: String,
    pub location: String,
    pub attendee: String,
    pub confirmation_id: String,
    pub qr_payload: String,
    pub footer: String,
}

impl TicketContent {
    pub fn new(details: &BookingDetails, generated_at: DateTime<Utc>) -> Self {
        Self {
            title: details.event.title.clone(),
            date: format_event_date(details.event.date),
            location: details.event.location.clone(),
            attendee: details.participant.email.clone(),
            confirmation_id: details.booking.id.to_string(),
            qr_payload: qr_payload(details.booking.id),
            footer: format!(
                "Generated on {} | Present this ticket at the event entrance.",
                generated_at.format("%B %-d, %Y")
            ),
        }
    }
}

/// `BOOKING:<id>`
pub fn qr_payload(booking_id: uuid::Uuid) -> String {
    format!("{}{}", TICKET_QR_PREFIX, booking_id)
}

/// e.g. `Friday, March 15, 2030 at 07:30 PM`
pub fn format_event_date(date: DateTime<Utc>) -> String {
    date.format("%A, %B %-d, %Y at %I:%M %p").to_string()
}

/// `ticket-<title>-<id8>.pdf`, with the title reduced to ASCII alphanumerics
/// and underscores and cut to 30 characters.
pub fn ticket_filename(details: &BookingDetails) -> String {
    let title: String = FILENAME_UNSAFE
        .replace_all(&details.event.title, "_")
        .chars()
        .take(TICKET_FILENAME_TITLE_LEN)
        .collect();
    let id: String = details
        .booking
        .id
        .to_string()
        .chars()
        .take(TICKET_FILENAME_ID_LEN)
        .collect();

    format!("ticket-{}-{}.pdf", title, id)
}

/// Square module matrix of a QR symbol, row-major, `true` = dark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrMatrix {
    pub width: usize,
    pub modules: Vec<bool>,
}

impl QrMatrix {
    pub fn encode(payload: &str) -> AppResult<Self> {
        let code = QrCode::new(payload.as_bytes())
            .map_err(|e| AppError::internal(format!("QR encoding failed: {}", e)))?;

        Ok(Self {
            width: code.width(),
            modules: code
                .to_colors()
                .into_iter()
                .map(|c| c == qrcode::Color::Dark)
                .collect(),
        })
    }

    pub fn is_dark(&self, x: usize, y: usize) -> bool {
        self.modules[y * self.width + x]
    }

    /// Page rectangles of the dark modules, as drawn on the ticket.
    ///
    /// The symbol and its quiet zone fill the `QR_SIZE` square whose
    /// bottom-left corner is (`QR_LEFT`, `QR_BOTTOM`). Row 0 is the top row,
    /// while page coordinates grow upwards.
    pub fn module_rects(&self) -> Vec<ModuleRect> {
        let cell = QR_SIZE / (self.width + 2 * QR_QUIET_ZONE) as f32;
        let top = QR_BOTTOM + QR_SIZE;

        let mut rects = Vec::new();
        for y in 0..self.width {
            for x in 0..self.width {
                if !self.is_dark(x, y) {
                    continue;
                }
                let left = QR_LEFT + (x + QR_QUIET_ZONE) as f32 * cell;
                let upper = top - (y + QR_QUIET_ZONE) as f32 * cell;
                rects.push(ModuleRect {
                    left,
                    bottom: upper - cell,
                    right: left + cell,
                    top: upper,
                });
            }
        }
        rects
    }
}

/// Filled square in page millimetres, origin at the bottom-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModuleRect {
    pub left: f32,
    pub bottom: f32,
    pub right: f32,
    pub top: f32,
}

/// printpdf-backed renderer
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfTicketRenderer;

impl PdfTicketRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl TicketRenderer for PdfTicketRenderer {
    fn render(&self, details: &BookingDetails) -> AppResult<Vec<u8>> {
        let content = TicketContent::new(details, Utc::now());
        let qr = QrMatrix::encode(&content.qr_payload)?;
        render_pdf(&content, &qr)
    }
}

fn pdf_error(e: printpdf::Error) -> AppError {
    AppError::internal(format!("PDF rendering failed: {}", e))
}

fn black() -> Color {
    Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None))
}

fn grey() -> Color {
    Color::Rgb(Rgb::new(0.4, 0.4, 0.4, None))
}

fn render_pdf(content: &TicketContent, qr: &QrMatrix) -> AppResult<Vec<u8>> {
    let (doc, page, layer) =
        PdfDocument::new("Event Ticket", Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Ticket");
    let layer = doc.get_page(page).get_layer(layer);

    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(pdf_error)?;
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(pdf_error)?;

    // Header band
    layer.set_fill_color(Color::Rgb(Rgb::new(0.15, 0.25, 0.55, None)));
    layer.add_rect(Rect::new(
        Mm(0.0),
        Mm(PAGE_HEIGHT - 30.0),
        Mm(PAGE_WIDTH),
        Mm(PAGE_HEIGHT),
    ));
    layer.set_fill_color(Color::Rgb(Rgb::new(1.0, 1.0, 1.0, None)));
    layer.use_text("EVENT TICKET", 22.0, Mm(MARGIN), Mm(PAGE_HEIGHT - 19.0), &bold);

    layer.set_fill_color(black());
    layer.use_text(&content.title, 16.0, Mm(MARGIN), Mm(PAGE_HEIGHT - 44.0), &bold);

    let mut y = PAGE_HEIGHT - 60.0;
    for (label, value) in [
        ("DATE & TIME", content.date.as_str()),
        ("LOCATION", content.location.as_str()),
        ("ATTENDEE", content.attendee.as_str()),
        ("CONFIRMATION ID", content.confirmation_id.as_str()),
    ] {
        field(&layer, &bold, &regular, label, value, y);
        y -= 14.0;
    }

    draw_qr(&layer, qr);

    layer.set_fill_color(grey());
    layer.use_text(&content.footer, 7.0, Mm(MARGIN), Mm(12.0), &regular);

    doc.save_to_bytes().map_err(pdf_error)
}

fn field(
    layer: &PdfLayerReference,
    bold: &IndirectFontRef,
    regular: &IndirectFontRef,
    label: &str,
    value: &str,
    y: f32,
) {
    layer.set_fill_color(grey());
    layer.use_text(label, 8.0, Mm(MARGIN), Mm(y), bold);
    layer.set_fill_color(black());
    layer.use_text(value, 11.0, Mm(MARGIN), Mm(y - 5.0), regular);
}

fn draw_qr(layer: &PdfLayerReference, qr: &QrMatrix) {
    layer.set_fill_color(black());
    for r in qr.module_rects() {
        layer.add_rect(Rect::new(Mm(r.left), Mm(r.bottom), Mm(r.right), Mm(r.top)));
    }
}
