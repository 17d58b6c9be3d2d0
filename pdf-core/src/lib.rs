pub mod document;
pub mod fonts;
pub mod graphics;
pub mod images;
pub mod objects;
pub mod tables;
pub mod wrap;
pub mod writer;

pub use document::PdfDocument;
pub use fonts::{BuiltinFont, FontMetrics, TextMeasure};
pub use graphics::Color;
pub use images::{thumbnail_size, ImageError, ImageId, ImageSize};
pub use tables::{Cell, CellStyle, Column, Row, Table, TableCursor, TextAlign};
pub use wrap::{wrap, FitResult, Rect, TextStyle, WrapLines};
pub use writer::encode_text;
