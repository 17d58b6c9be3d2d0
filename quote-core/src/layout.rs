//! A4 page layout of quotes and delivery notes.
//!
//! Coordinates are PDF points from the bottom-left corner. The renderer
//! keeps a cursor `y`, the baseline of the next element, and walks it
//! down the page; the item table is handed to `pdf_core` tables, whose
//! cursor tracks the top of the next row.

use pdf_core::{
    thumbnail_size, wrap, BuiltinFont, Cell, CellStyle, Color, Column, FitResult, FontMetrics,
    ImageError, PdfDocument, Rect, Row, Table, TableCursor, TextAlign, TextStyle,
};
use tracing::{debug, warn};

use crate::config::QuoteConfig;
use crate::currency::{format_foreign, format_local, format_number, Currency};
use crate::error::{QuoteError, Result};
use crate::model::{CurrencyMode, Document, DocumentMetadata};
use crate::numbering::format_sequence;
use crate::pricing::ComputedLineItem;

pub const PAGE_WIDTH: f64 = 595.0;
pub const PAGE_HEIGHT: f64 = 842.0;

const LEFT_X: f64 = 40.0;
const RIGHT_X: f64 = PAGE_WIDTH - 40.0;
const TOTALS_RIGHT_X: f64 = 520.0;
const SECOND_COLUMN_X: f64 = 280.0;
const BOTTOM_MARGIN: f64 = 40.0;
/// Rows may not start below this line.
const BREAK_BELOW: f64 = 110.0;
const CONTINUATION_TOP: f64 = PAGE_HEIGHT - 70.0;
const LOGO_BOX: f64 = 120.0;
const LOGO_TOP: f64 = PAGE_HEIGHT - 20.0;
const DESCRIPTION_WIDTH: f64 = 480.0;
const DESCRIPTION_LEADING: f64 = 12.0;
const HEADER_GRAY: f64 = 0.9;

/// Rendered PDF bytes.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

/// `PRESUPUESTO N° 0001`
pub fn document_title(metadata: &DocumentMetadata) -> String {
    format!(
        "{} N° {}",
        metadata.kind.title(),
        format_sequence(metadata.sequence_number)
    )
}

/// Lay out `document` on A4 pages. `logo` bytes that fail to decode are
/// skipped with a warning.
pub fn render(
    document: &Document,
    logo: Option<&[u8]>,
    config: &QuoteConfig,
) -> Result<RenderedDocument> {
    let mut pdf = PdfDocument::new(Vec::new())?;
    pdf.set_compression(config.compress);
    pdf.set_info("Title", &document_title(&document.metadata))
        .set_info("Creator", &config.creator);
    pdf.begin_page(PAGE_WIDTH, PAGE_HEIGHT)?;

    let mut renderer = Renderer {
        pdf,
        document,
        y: PAGE_HEIGHT,
    };
    if document.metadata.display.show_logo {
        if let Some(bytes) = logo {
            renderer.logo(bytes)?;
        }
    }
    renderer.header();
    renderer.currency_line();
    renderer.title();
    renderer.dates();
    renderer.client()?;
    renderer.items()?;
    renderer.totals()?;

    let mut pdf = renderer.pdf;
    pdf.end_page()?;
    let page_count = pdf.page_count();
    let bytes = pdf.end_document()?;
    Ok(RenderedDocument { bytes, page_count })
}

fn regular(size: f64) -> TextStyle {
    TextStyle::new(BuiltinFont::Helvetica, size)
}

fn bold(size: f64) -> TextStyle {
    TextStyle::new(BuiltinFont::HelveticaBold, size)
}

fn oblique(size: f64) -> TextStyle {
    TextStyle::new(BuiltinFont::HelveticaOblique, size)
}

struct Renderer<'a> {
    pdf: PdfDocument<Vec<u8>>,
    document: &'a Document,
    y: f64,
}

impl Renderer<'_> {
    fn new_page(&mut self) -> Result<()> {
        self.pdf.begin_page(PAGE_WIDTH, PAGE_HEIGHT)?;
        self.y = CONTINUATION_TOP;
        Ok(())
    }

    /// Draw a left-aligned line at the cursor and move down by `advance`.
    fn line(&mut self, text: &str, style: TextStyle, advance: f64) {
        self.pdf.place_text(text, LEFT_X, self.y, &style);
        self.y -= advance;
    }

    fn logo(&mut self, bytes: &[u8]) -> Result<()> {
        let image = match self.pdf.load_image_bytes(bytes.to_vec()) {
            Ok(image) => image,
            Err(ImageError::Io(e)) => return Err(e.into()),
            Err(e) => {
                let err = QuoteError::ImageDecodeFailure(e.to_string());
                warn!(error = %err, "rendering without logo");
                return Ok(());
            }
        };
        if let Some((width, height)) = self.pdf.image_dimensions(&image) {
            let size = thumbnail_size(width, height, LOGO_BOX, LOGO_BOX);
            self.pdf.place_image(
                &image,
                RIGHT_X - size.width,
                LOGO_TOP - size.height,
                size.width,
                size.height,
            );
        }
        Ok(())
    }

    fn header(&mut self) {
        let document = self.document;
        let metadata = &document.metadata;
        let company = &metadata.company;
        let display = &metadata.display;

        self.pdf.place_text(
            &company.name.to_uppercase(),
            LEFT_X,
            PAGE_HEIGHT - 50.0,
            &bold(16.0),
        );
        self.pdf
            .save_state()
            .set_stroke_color(Color::BLACK)
            .set_line_width(1.0)
            .move_to(LEFT_X, PAGE_HEIGHT - 60.0)
            .line_to(RIGHT_X, PAGE_HEIGHT - 60.0)
            .stroke()
            .restore_state();

        self.y = PAGE_HEIGHT - 80.0;
        if display.show_tax_id && !company.tax_id.trim().is_empty() {
            self.line(&format!("CUIT/CUIL: {}", company.tax_id), regular(10.0), 14.0);
        }
        if display.show_address && !company.address.trim().is_empty() {
            self.line(&format!("Dirección: {}", company.address), regular(10.0), 14.0);
        }
        if display.show_email && !company.email.trim().is_empty() {
            self.line(
                &format!("Correo electrónico: {}", company.email),
                regular(10.0),
                18.0,
            );
        }
    }

    fn currency_line(&mut self) {
        let text = match self.document.currency_mode {
            CurrencyMode::Local => format!("Moneda: {}", Currency::Ars.code()),
            CurrencyMode::Foreign => format!(
                "Moneda: {} - Cotización: {} {}",
                Currency::Usd.code(),
                format_local(self.document.exchange_rate),
                Currency::Ars.code()
            ),
        };
        self.line(&text, oblique(9.0), 25.0);
    }

    fn title(&mut self) {
        let title = document_title(&self.document.metadata);
        self.pdf
            .place_text_aligned(&title, PAGE_WIDTH / 2.0, self.y, &bold(18.0), TextAlign::Center);
        self.y -= 45.0;
    }

    fn dates(&mut self) {
        let document = self.document;
        let metadata = &document.metadata;
        if metadata.display.show_issue_date {
            let text = format!("Fecha de emisión: {}", metadata.issue_date.format("%d/%m/%Y"));
            self.pdf.place_text(&text, LEFT_X, self.y, &regular(10.0));
        }
        if metadata.display.show_valid_until {
            let text = format!("Válido hasta: {}", metadata.valid_until.format("%d/%m/%Y"));
            self.pdf.place_text(&text, SECOND_COLUMN_X, self.y, &regular(10.0));
        }
        self.y -= 30.0;
    }

    fn client(&mut self) -> Result<()> {
        let document = self.document;
        let metadata = &document.metadata;
        let client = &metadata.client;

        self.line("CLIENTE", bold(12.0), 15.0);
        self.line(&client.name, regular(10.0), 15.0);
        if metadata.display.show_client_id {
            self.line(
                &format!("{}: {}", client.id_type, client.id_number),
                regular(10.0),
                20.0,
            );
        } else {
            self.y -= 5.0;
        }

        let description = client.description.trim();
        if metadata.display.show_description && !description.is_empty() {
            let style = oblique(9.0);
            for text in wrap(description, DESCRIPTION_WIDTH, style, &FontMetrics) {
                if self.y < BOTTOM_MARGIN {
                    debug!("client description continues on a new page");
                    self.new_page()?;
                }
                self.line(&text, style, DESCRIPTION_LEADING);
            }
            self.y -= 8.0;
        }
        Ok(())
    }

    fn items(&mut self) -> Result<()> {
        let table = item_table();
        let header = header_row();
        let document = self.document;
        let rows: Vec<Row> = document
            .items
            .iter()
            .enumerate()
            .map(|(index, item)| item_row(index + 1, item))
            .collect();

        // The header only starts a page together with the first row, unless
        // that row would not fit on any page.
        let header_height = table.row_height(&header);
        let lead = header_height + rows.first().map_or(0.0, |row| table.row_height(row));
        let crowded = |y: f64, height: f64| y < BREAK_BELOW || y - height < BOTTOM_MARGIN;
        if crowded(self.y, lead)
            && (lead <= CONTINUATION_TOP - BOTTOM_MARGIN || crowded(self.y, header_height))
        {
            debug!(y = self.y, "item table starts on a new page");
            self.new_page()?;
        }
        let mut cursor = TableCursor::new(&table_area(&table, self.y));
        self.pdf.place_row(&table, &header, &mut cursor);

        for (index, row) in rows.iter().enumerate() {
            // The header counts as a placed row: break only once a data row is down.
            if cursor.rows_placed() > 1 && !table.fits(row, &cursor) {
                debug!(
                    row = index + 1,
                    y = cursor.current_y(),
                    page = self.pdf.page_count() + 1,
                    "item table page break"
                );
                self.new_page()?;
                cursor.reset(&table_area(&table, CONTINUATION_TOP));
                self.pdf.place_row(&table, &header, &mut cursor);
            }
            // Taller than the space left on a page: place it anyway rather than loop.
            if self.pdf.fit_row(&table, row, &mut cursor)? == FitResult::BoxFull {
                self.pdf.place_row(&table, row, &mut cursor);
            }
        }
        self.y = cursor.current_y();
        Ok(())
    }

    fn totals(&mut self) -> Result<()> {
        let document = self.document;
        let totals = &document.totals;
        let mut lines = vec![(
            format!("Subtotal: {}", format_local(totals.subtotal_sum)),
            bold(10.0),
            16.0,
        )];
        if totals.discount_sum != 0.0 {
            lines.push((
                format!("Descuentos aplicados: -{}", format_local(totals.discount_sum)),
                regular(10.0),
                16.0,
            ));
        }
        if totals.tax_rate != 0.0 {
            lines.push((
                format!(
                    "IVA ({}%): {}",
                    format_number(totals.tax_rate),
                    format_local(totals.tax_amount)
                ),
                regular(10.0),
                18.0,
            ));
        }
        lines.push((
            format!("TOTAL: {}", format_local(totals.grand_total)),
            bold(12.0),
            22.0,
        ));
        if let Some(usd) = totals.foreign_equivalent {
            lines.push((
                format!("Equivalente USD: {}", format_foreign(usd)),
                regular(10.0),
                16.0,
            ));
        }

        self.y -= 25.0;
        let height: f64 = lines.iter().map(|(_, _, advance)| advance).sum();
        if self.y - height < BOTTOM_MARGIN {
            debug!(y = self.y, "totals moved to a new page");
            self.new_page()?;
        }
        for (text, style, advance) in lines {
            self.pdf
                .place_text_aligned(&text, TOTALS_RIGHT_X, self.y, &style, TextAlign::Right);
            self.y -= advance;
        }
        Ok(())
    }
}

/// `#`, description, quantity, unit price, line total. The description
/// column leaves 220pt of text after padding.
fn item_table() -> Table {
    let mut table = Table::new(vec![
        Column::single_line(20.0),
        Column::wrapping(226.0),
        Column::single_line(44.0),
        Column::single_line(80.0),
        Column::single_line(100.0),
    ]);
    table.break_below = BREAK_BELOW;
    table
}

fn table_area(table: &Table, top: f64) -> Rect {
    Rect {
        x: LEFT_X,
        y: top,
        width: table.width(),
        height: top - BOTTOM_MARGIN,
    }
}

fn header_row() -> Row {
    let left = CellStyle {
        font: BuiltinFont::HelveticaBold,
        ..CellStyle::default()
    };
    let right = CellStyle {
        text_align: TextAlign::Right,
        ..left
    };
    let mut row = Row::new(vec![
        Cell::styled("#", left),
        Cell::styled("DESCRIPCIÓN", left),
        Cell::styled("CANT.", left),
        Cell::styled("P.UNIT. (ARS)", right),
        Cell::styled("TOTAL (ARS)", right),
    ]);
    row.background_color = Some(Color::gray(HEADER_GRAY));
    row
}

fn item_row(index: usize, line: &ComputedLineItem) -> Row {
    let right = CellStyle {
        text_align: TextAlign::Right,
        ..CellStyle::default()
    };
    Row::new(vec![
        Cell::new(index.to_string()),
        Cell::new(line.item.description.as_str()),
        Cell::new(format_number(line.item.quantity)),
        Cell::styled(format_local(line.item.unit_price), right),
        Cell::styled(format_local(line.subtotal), right),
    ])
}
