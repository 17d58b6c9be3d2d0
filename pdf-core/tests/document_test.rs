use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use pdf_core::{BuiltinFont, Color, PdfDocument, TextAlign, TextStyle};
use pretty_assertions::assert_eq;

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

fn count(haystack: &[u8], needle: &[u8]) -> usize {
    haystack.windows(needle.len()).filter(|w| *w == needle).count()
}

#[test]
fn create_empty_document() {
    let mut doc = PdfDocument::new(Vec::<u8>::new()).unwrap();
    doc.begin_page(595.0, 842.0).unwrap();
    doc.end_page().unwrap();
    let bytes = doc.end_document().unwrap();
    assert!(bytes.starts_with(b"%PDF-1.7"));
    assert!(contains(&bytes, b"%%EOF"));
    assert!(contains(&bytes, b"/MediaBox [0 0 595.0 842.0]"));
}

#[test]
fn fonts_are_declared_win_ansi() {
    let doc = PdfDocument::new(Vec::<u8>::new()).unwrap();
    let bytes = doc.end_document().unwrap();
    assert_eq!(count(&bytes, b"/Encoding /WinAnsiEncoding"), 4);
    assert!(contains(&bytes, b"/BaseFont /Helvetica-BoldOblique"));
}

#[test]
fn set_info_appears_in_output() {
    let mut doc = PdfDocument::new(Vec::<u8>::new()).unwrap();
    doc.set_info("Creator", "quote generator");
    doc.set_info("Title", "Presupuesto N° 0001");
    doc.begin_page(595.0, 842.0).unwrap();
    let bytes = doc.end_document().unwrap();
    assert!(contains(&bytes, b"/Creator (quote generator)"));
    assert!(contains(&bytes, b"(Presupuesto N\xb0 0001)"));
    assert!(contains(&bytes, b"/Info "));
}

#[test]
fn place_text_in_content_stream() {
    let mut doc = PdfDocument::new(Vec::<u8>::new()).unwrap();
    doc.begin_page(595.0, 842.0).unwrap();
    doc.place_text(
        "Dirección",
        40.0,
        772.0,
        &TextStyle::new(BuiltinFont::HelveticaBold, 16.0),
    );
    let bytes = doc.end_document().unwrap();
    assert!(contains(&bytes, b"/F2 16 Tf\n40 772 Td\n(Direcci\xf3n) Tj"));
}

#[test]
fn right_aligned_text_ends_at_x() {
    let mut doc = PdfDocument::new(Vec::<u8>::new()).unwrap();
    doc.begin_page(595.0, 842.0).unwrap();
    // "10" is 11.12pt wide at 10pt.
    doc.place_text_aligned("10", 520.0, 100.0, &TextStyle::new(BuiltinFont::Helvetica, 10.0), TextAlign::Right);
    let bytes = doc.end_document().unwrap();
    assert!(contains(&bytes, b"508.88 100 Td"));
}

#[test]
fn lines_are_stroked_with_state_saved() {
    let mut doc = PdfDocument::new(Vec::<u8>::new()).unwrap();
    doc.begin_page(595.0, 842.0).unwrap();
    doc.save_state()
        .set_stroke_color(Color::gray(0.5))
        .set_line_width(0.5)
        .move_to(40.0, 760.0)
        .line_to(555.0, 760.0)
        .stroke()
        .restore_state();
    let bytes = doc.end_document().unwrap();
    assert!(contains(
        &bytes,
        b"q\n0.5 0.5 0.5 RG\n0.5 w\n40 760 m\n555 760 l\nS\nQ\n"
    ));
}

/// end_page flushes page data to the writer instead of buffering
/// everything until end_document.
#[test]
fn end_page_flushes_to_writer() {
    struct TrackingWriter {
        byte_count: Rc<RefCell<usize>>,
        inner: Vec<u8>,
    }

    impl Write for TrackingWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            let n = self.inner.write(buf)?;
            *self.byte_count.borrow_mut() += n;
            Ok(n)
        }
        fn flush(&mut self) -> io::Result<()> {
            self.inner.flush()
        }
    }

    let counter = Rc::new(RefCell::new(0usize));
    let writer = TrackingWriter {
        byte_count: counter.clone(),
        inner: Vec::new(),
    };

    let mut doc = PdfDocument::new(writer).unwrap();
    let after_init = *counter.borrow();

    doc.begin_page(595.0, 842.0).unwrap();
    doc.place_text("Hola", 20.0, 20.0, &TextStyle::default());
    assert_eq!(*counter.borrow(), after_init);

    doc.end_page().unwrap();
    assert!(*counter.borrow() > after_init);
}

#[test]
fn begin_page_closes_open_page() {
    let mut doc = PdfDocument::new(Vec::<u8>::new()).unwrap();
    doc.begin_page(595.0, 842.0).unwrap();
    doc.begin_page(595.0, 842.0).unwrap();
    assert_eq!(doc.page_count(), 1);
    let bytes = doc.end_document().unwrap();
    assert!(contains(&bytes, b"/Count 2"));
}

#[test]
fn end_page_without_page_is_an_error() {
    let mut doc = PdfDocument::new(Vec::<u8>::new()).unwrap();
    assert!(doc.end_page().is_err());
}

#[test]
fn compression_applies_flate_to_content() {
    let make_pdf = |compress: bool| -> Vec<u8> {
        let mut doc = PdfDocument::new(Vec::<u8>::new()).unwrap();
        doc.set_compression(compress);
        doc.begin_page(595.0, 842.0).unwrap();
        for i in 0..40 {
            doc.place_text(
                &format!("Línea {} de contenido repetitivo", i),
                40.0,
                800.0 - i as f64 * 15.0,
                &TextStyle::default(),
            );
        }
        doc.end_document().unwrap()
    };

    let plain = make_pdf(false);
    let packed = make_pdf(true);
    assert!(!contains(&plain, b"FlateDecode"));
    assert!(contains(&packed, b"/Filter /FlateDecode"));
    assert!(packed.len() < plain.len());
}
