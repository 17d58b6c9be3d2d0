use crate::document::format_coord;
use crate::fonts::{BuiltinFont, FontMetrics};
use crate::graphics::Color;
use crate::wrap::{wrap, FitResult, Rect, TextStyle};
use crate::writer::encode_text;

// -------------------------------------------------------
// Public types
// -------------------------------------------------------

/// Horizontal alignment of text inside a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Right,
    Center,
}

/// Style options for a table cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellStyle {
    pub font: BuiltinFont,
    /// Font size in points.
    pub font_size: f64,
    /// Padding applied to all four sides, in points.
    pub padding: f64,
    pub text_align: TextAlign,
}

impl Default for CellStyle {
    fn default() -> Self {
        CellStyle {
            font: BuiltinFont::Helvetica,
            font_size: 10.0,
            padding: 3.0,
            text_align: TextAlign::Left,
        }
    }
}

impl CellStyle {
    fn text_style(&self) -> TextStyle {
        TextStyle::new(self.font, self.font_size)
    }
}

/// A single table cell containing text and style.
#[derive(Debug, Clone)]
pub struct Cell {
    pub text: String,
    pub style: CellStyle,
}

impl Cell {
    /// Create a cell with the default style.
    pub fn new(text: impl Into<String>) -> Self {
        Cell::styled(text, CellStyle::default())
    }

    /// Create a cell with an explicit style.
    pub fn styled(text: impl Into<String>, style: CellStyle) -> Self {
        Cell {
            text: text.into(),
            style,
        }
    }
}

/// A row of cells in a table.
#[derive(Debug, Clone)]
pub struct Row {
    pub cells: Vec<Cell>,
    /// Optional background color applied to the entire row.
    pub background_color: Option<Color>,
}

impl Row {
    /// Create a row with no background.
    pub fn new(cells: Vec<Cell>) -> Self {
        Row {
            cells,
            background_color: None,
        }
    }
}

/// One table column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Column {
    /// Width in points, padding included.
    pub width: f64,
    /// Whether text word-wraps (growing the row) or stays on one line.
    pub wrap: bool,
}

impl Column {
    /// A column whose text word-wraps and grows the row height.
    pub fn wrapping(width: f64) -> Self {
        Column { width, wrap: true }
    }

    /// A single-line column.
    pub fn single_line(width: f64) -> Self {
        Column { width, wrap: false }
    }
}

/// Table layout configuration. Holds columns and the page-break rule;
/// does not store row data. The caller supplies one `Row` at a time to
/// `fit_row`.
#[derive(Debug, Clone)]
pub struct Table {
    pub columns: Vec<Column>,
    /// A row may not start below this y coordinate; `fit_row` reports
    /// `BoxFull` instead. Defaults to the bottom of the rect (no extra rule).
    pub break_below: f64,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Self {
        Table {
            columns,
            break_below: f64::NEG_INFINITY,
        }
    }

    /// Total width of all columns.
    pub fn width(&self) -> f64 {
        self.columns.iter().map(|c| c.width).sum()
    }

    /// Height a row needs: its tallest cell.
    pub fn row_height(&self, row: &Row) -> f64 {
        self.columns
            .iter()
            .zip(&row.cells)
            .map(|(col, cell)| {
                let lines = cell_lines(cell, col).len() as f64;
                lines * cell.style.text_style().line_height() + 2.0 * cell.style.padding
            })
            .fold(0.0_f64, f64::max)
    }

    /// Whether `row` can start at the cursor without breaking the page rule
    /// or crossing the bottom of the cursor's rect.
    pub fn fits(&self, row: &Row, cursor: &TableCursor) -> bool {
        cursor.current_y >= self.break_below
            && cursor.current_y - self.row_height(row) >= cursor.rect.bottom()
    }

    /// Generate content stream bytes for `row` if it fits at the cursor.
    pub(crate) fn generate_row_ops(
        &self,
        row: &Row,
        cursor: &mut TableCursor,
    ) -> (Vec<u8>, FitResult) {
        if !self.fits(row, cursor) {
            return (Vec::new(), FitResult::BoxFull);
        }
        (self.place_row_ops(row, cursor), FitResult::Stop)
    }

    /// Generate content stream bytes for `row` unconditionally and
    /// advance the cursor past it.
    pub(crate) fn place_row_ops(&self, row: &Row, cursor: &mut TableCursor) -> Vec<u8> {
        let row_height = self.row_height(row);
        let top = cursor.current_y;
        let mut output = Vec::new();

        if let Some(bg) = row.background_color {
            output.extend_from_slice(b"q\n");
            output.extend_from_slice(bg.fill_op().as_bytes());
            output.extend_from_slice(
                format!(
                    "{} {} {} {} re\nf\nQ\n",
                    format_coord(cursor.rect.x),
                    format_coord(top - row_height),
                    format_coord(self.width()),
                    format_coord(row_height),
                )
                .as_bytes(),
            );
        }

        let mut col_x = cursor.rect.x;
        for (col, cell) in self.columns.iter().zip(&row.cells) {
            render_cell(cell, col, col_x, top, &mut output);
            col_x += col.width;
        }

        cursor.current_y -= row_height;
        cursor.rows_placed += 1;
        output
    }
}

/// Tracks where the next row will be placed within a page.
///
/// Created once per table area, then passed to each `fit_row` call.
/// Call `reset()` when starting a new page to restore the cursor to
/// the top of the new rect.
#[derive(Debug, Clone)]
pub struct TableCursor {
    pub(crate) rect: Rect,
    /// Top of the next row (PDF absolute coordinates, from page bottom).
    pub(crate) current_y: f64,
    pub(crate) rows_placed: usize,
}

impl TableCursor {
    /// Create a cursor positioned at the top of `rect`.
    pub fn new(rect: &Rect) -> Self {
        TableCursor {
            rect: *rect,
            current_y: rect.y,
            rows_placed: 0,
        }
    }

    /// Reset to the top of a new rect. Call this when starting a new page.
    pub fn reset(&mut self, rect: &Rect) {
        *self = TableCursor::new(rect);
    }

    /// Rows placed since the cursor was created or last reset.
    pub fn rows_placed(&self) -> usize {
        self.rows_placed
    }

    /// Returns the Y coordinate where the next row would be placed.
    ///
    /// After placing all rows, this equals the bottom edge of the last row.
    pub fn current_y(&self) -> f64 {
        self.current_y
    }
}

// -------------------------------------------------------
// Rendering helpers
// -------------------------------------------------------

/// Lines of a cell: word-wrapped for wrapping columns, otherwise the
/// text as one line. Always at least one line so empty cells keep height.
fn cell_lines(cell: &Cell, col: &Column) -> Vec<String> {
    let lines: Vec<String> = if col.wrap {
        let avail = (col.width - 2.0 * cell.style.padding).max(0.0);
        wrap(&cell.text, avail, cell.style.text_style(), &FontMetrics).collect()
    } else {
        vec![cell.text.clone()]
    };
    if lines.is_empty() {
        vec![String::new()]
    } else {
        lines
    }
}

/// Render the text content of a single cell, one text object per line.
fn render_cell(cell: &Cell, col: &Column, cell_x: f64, row_top: f64, output: &mut Vec<u8>) {
    let style = &cell.style;
    let lh = style.text_style().line_height();
    // Baseline: top of cell minus top padding minus font size (approximates ascent)
    let first_baseline = row_top - style.padding - style.font_size;

    for (i, line) in cell_lines(cell, col).iter().enumerate() {
        if line.is_empty() {
            continue;
        }
        let width = FontMetrics::measure_text(line, style.font, style.font_size);
        let x = match style.text_align {
            TextAlign::Left => cell_x + style.padding,
            TextAlign::Right => cell_x + col.width - style.padding - width,
            TextAlign::Center => cell_x + (col.width - width) / 2.0,
        };
        let y = first_baseline - i as f64 * lh;
        output.extend_from_slice(
            format!(
                "BT\n/{} {} Tf\n{} {} Td\n(",
                style.font.pdf_name(),
                format_coord(style.font_size),
                format_coord(x),
                format_coord(y),
            )
            .as_bytes(),
        );
        output.extend_from_slice(&encode_text(line));
        output.extend_from_slice(b") Tj\nET\n");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect() -> Rect {
        Rect { x: 40.0, y: 700.0, width: 500.0, height: 660.0 }
    }

    #[test]
    fn row_height_follows_wrapped_lines() {
        let table = Table::new(vec![Column::wrapping(60.0), Column::single_line(60.0)]);
        let one = Row::new(vec![Cell::new("short"), Cell::new("x")]);
        let many = Row::new(vec![
            Cell::new("several words that will not fit on one line"),
            Cell::new("x"),
        ]);
        assert_eq!(table.row_height(&one), 18.0);
        assert!(table.row_height(&many) >= 3.0 * 12.0 + 6.0);
    }

    #[test]
    fn single_line_column_never_wraps() {
        let table = Table::new(vec![Column::single_line(10.0)]);
        let row = Row::new(vec![Cell::new("a long unbroken label")]);
        assert_eq!(table.row_height(&row), 18.0);
    }

    #[test]
    fn break_below_rejects_low_rows() {
        let mut table = Table::new(vec![Column::wrapping(100.0)]);
        table.break_below = 110.0;
        let mut cursor = TableCursor::new(&rect());
        cursor.current_y = 109.0;
        let (ops, result) = table.generate_row_ops(&Row::new(vec![Cell::new("a")]), &mut cursor);
        assert_eq!(result, FitResult::BoxFull);
        assert!(ops.is_empty());
        assert_eq!(cursor.rows_placed(), 0);
    }

    #[test]
    fn right_aligned_text_ends_at_padding() {
        let table = Table::new(vec![Column::single_line(100.0)]);
        let style = CellStyle { text_align: TextAlign::Right, padding: 0.0, ..CellStyle::default() };
        let row = Row::new(vec![Cell::styled("10", style)]);
        let mut cursor = TableCursor::new(&rect());
        let ops = table.place_row_ops(&row, &mut cursor);
        // "10" in Helvetica 10pt is 11.12pt wide: 40 + 100 - 11.12
        assert!(String::from_utf8_lossy(&ops).contains("128.88 690 Td"));
    }

    #[test]
    fn placing_advances_cursor() {
        let table = Table::new(vec![Column::wrapping(100.0)]);
        let mut cursor = TableCursor::new(&rect());
        table.place_row_ops(&Row::new(vec![Cell::new("a")]), &mut cursor);
        assert_eq!(cursor.current_y(), 700.0 - 18.0);
        assert_eq!(cursor.rows_placed(), 1);
        cursor.reset(&rect());
        assert_eq!(cursor.rows_placed(), 0);
    }
}
