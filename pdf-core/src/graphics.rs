use crate::document::format_coord;

/// RGB color for PDF graphics operations.
///
/// Each component is in the range 0.0 (none) to 1.0 (full intensity).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Color {
    pub const BLACK: Color = Color { r: 0.0, g: 0.0, b: 0.0 };

    /// Create a color from RGB components (each 0.0–1.0).
    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Color { r, g, b }
    }

    /// Create a grayscale color (r = g = b = level).
    pub fn gray(level: f64) -> Self {
        Color::rgb(level, level, level)
    }

    /// Content-stream operator setting this as the fill color.
    pub(crate) fn fill_op(&self) -> String {
        format!("{} rg\n", self.components())
    }

    /// Content-stream operator setting this as the stroke color.
    pub(crate) fn stroke_op(&self) -> String {
        format!("{} RG\n", self.components())
    }

    fn components(&self) -> String {
        format!(
            "{} {} {}",
            format_coord(self.r),
            format_coord(self.g),
            format_coord(self.b)
        )
    }
}
