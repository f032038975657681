//! Ticket tests: the rendered PDF carries the booking fields and a QR code
//! that scans back to its booking.

use chrono::Utc;
use lopdf::content::Content;
use lopdf::{Document, Object};
use uuid::Uuid;

use booking_service_lib::service::ticket::{
    QrMatrix, TicketContent, PAGE_HEIGHT, PAGE_WIDTH, QR_SIZE,
};
use booking_service_lib::service::{PdfTicketRenderer, TicketRenderer};
use domain::{Booking, BookingDetails, BookingStatus, Event, EventStatus, User};

const PIXELS_PER_MM: f32 = 8.0;
const PT_PER_MM: f32 = 72.0 / 25.4;

fn confirmed_details() -> BookingDetails {
    let participant = User::new(Uuid::new_v4(), "ada@example.com".into(), "hash".into());
    let event_id = Uuid::new_v4();
    BookingDetails {
        booking: Booking {
            id: Uuid::new_v4(),
            event_id,
            participant_id: participant.id,
            status: BookingStatus::Confirmed,
            created_at: Utc::now(),
        },
        event: Event {
            id: event_id,
            title: "Rust Meetup".into(),
            description: "Monthly meetup".into(),
            date: Utc::now(),
            location: "Grand Hall".into(),
            capacity: 10,
            confirmed_count: 1,
            status: EventStatus::Published,
            organizer_id: Uuid::new_v4(),
            created_at: Utc::now(),
        },
        participant,
    }
}

/// Paint page rectangles `(left, bottom, right, top)` in millimetres black on
/// a white A5 page and decode the single QR symbol found on it.
fn scan(rects: &[(f32, f32, f32, f32)]) -> String {
    let width = (PAGE_WIDTH * PIXELS_PER_MM).ceil() as usize;
    let height = (PAGE_HEIGHT * PIXELS_PER_MM).ceil() as usize;
    let px = |mm: f32| (mm * PIXELS_PER_MM).round().max(0.0) as usize;

    let mut pixels = vec![255u8; width * height];
    for &(left, bottom, right, top) in rects {
        let (x0, x1) = (px(left).min(width), px(right).min(width));
        let (y0, y1) = (px(PAGE_HEIGHT - top).min(height), px(PAGE_HEIGHT - bottom).min(height));
        for y in y0..y1 {
            pixels[y * width + x0..y * width + x1].fill(0);
        }
    }

    let mut image =
        rqrr::PreparedImage::prepare_from_greyscale(width, height, |x, y| pixels[y * width + x]);
    let grids = image.detect_grids();
    assert_eq!(grids.len(), 1, "expected exactly one QR symbol");
    let (_, content) = grids[0].decode().unwrap();
    content
}

/// Decompressed content stream operations of the single ticket page.
fn page_operations(bytes: &[u8]) -> Vec<lopdf::content::Operation> {
    let doc = Document::load_mem(bytes).unwrap();
    let pages = doc.get_pages();
    assert_eq!(pages.len(), 1, "ticket is a single page");
    let page_id = *pages.values().next().unwrap();
    let data = doc.get_page_content(page_id).unwrap();
    Content::decode(&data).unwrap().operations
}

fn shown_text(operations: &[lopdf::content::Operation]) -> Vec<String> {
    fn strings(object: &Object, out: &mut String) {
        match object {
            Object::String(bytes, _) => out.push_str(&String::from_utf8_lossy(bytes)),
            Object::Array(items) => items.iter().for_each(|item| strings(item, out)),
            _ => {}
        }
    }

    operations
        .iter()
        .filter(|op| op.operator == "Tj" || op.operator == "TJ")
        .map(|op| {
            let mut text = String::new();
            op.operands.iter().for_each(|o| strings(o, &mut text));
            text
        })
        .collect()
}

/// `re` rectangles small enough to be QR modules, converted to millimetres.
fn drawn_modules(operations: &[lopdf::content::Operation]) -> Vec<(f32, f32, f32, f32)> {
    operations
        .iter()
        .filter(|op| op.operator == "re" && op.operands.len() == 4)
        .map(|op| {
            let v: Vec<f32> = op
                .operands
                .iter()
                .map(|o| o.as_float().unwrap() / PT_PER_MM)
                .collect();
            (v[0], v[1], v[0] + v[2], v[1] + v[3])
        })
        .filter(|(left, _, right, _)| right - left < QR_SIZE / 10.0)
        .collect()
}

#[test]
fn test_ticket_qr_scans_to_booking_id() {
    let details = confirmed_details();
    let content = TicketContent::new(&details, Utc::now());
    let qr = QrMatrix::encode(&content.qr_payload).unwrap();

    let rects: Vec<_> = qr
        .module_rects()
        .iter()
        .map(|r| (r.left, r.bottom, r.right, r.top))
        .collect();

    assert_eq!(scan(&rects), format!("BOOKING:{}", details.booking.id));
}

#[test]
fn test_rendered_pdf_qr_scans_to_booking_id() {
    let details = confirmed_details();
    let bytes = PdfTicketRenderer::new().render(&details).unwrap();
    let modules = drawn_modules(&page_operations(&bytes));

    let qr = QrMatrix::encode(&format!("BOOKING:{}", details.booking.id)).unwrap();
    assert_eq!(modules.len(), qr.module_rects().len());
    assert_eq!(scan(&modules), format!("BOOKING:{}", details.booking.id));
}

#[test]
fn test_rendered_pdf_shows_booking_fields() {
    let details = confirmed_details();
    let bytes = PdfTicketRenderer::new().render(&details).unwrap();
    let text = shown_text(&page_operations(&bytes));
    let booking_id = details.booking.id.to_string();

    for expected in [
        "EVENT TICKET",
        "Rust Meetup",
        "LOCATION",
        "Grand Hall",
        "ATTENDEE",
        "ada@example.com",
        "CONFIRMATION ID",
        booking_id.as_str(),
    ] {
        assert!(
            text.iter().any(|t| t == expected),
            "missing {:?} in {:?}",
            expected,
            text
        );
    }
    assert!(text
        .iter()
        .any(|t| t.ends_with("Present this ticket at the event entrance.")));
}

#[test]
fn test_renderer_produces_pdf_document() {
    let bytes = PdfTicketRenderer::new().render(&confirmed_details()).unwrap();

    assert!(bytes.starts_with(b"%PDF"));
    assert!(bytes.windows(5).any(|w| w == b"%%EOF"));
}
