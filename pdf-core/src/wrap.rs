use std::iter::Peekable;
use std::str::SplitWhitespace;

use crate::fonts::{BuiltinFont, FontMetrics, TextMeasure};

/// Result of fitting content into a bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitResult {
    /// All content has been placed.
    Stop,
    /// The bounding box is full but content remains.
    BoxFull,
}

/// A bounding rectangle for placement.
/// (x, y) is the upper-left corner in PDF coordinates; content flows
/// downward from `y` to `y - height`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Lowest y coordinate content may reach.
    pub fn bottom(&self) -> f64 {
        self.y - self.height
    }
}

/// Text styling options.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font: BuiltinFont,
    pub font_size: f64,
}

impl TextStyle {
    pub fn new(font: BuiltinFont, font_size: f64) -> Self {
        TextStyle { font, font_size }
    }

    /// Style from a PDF base font name such as `"Helvetica-Oblique"`.
    pub fn named(font_name: &str, font_size: f64) -> Option<Self> {
        BuiltinFont::from_name(font_name).map(|font| TextStyle::new(font, font_size))
    }

    /// Baseline-to-baseline distance for this style.
    pub fn line_height(&self) -> f64 {
        FontMetrics::line_height(self.font, self.font_size)
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        TextStyle::new(BuiltinFont::Helvetica, 12.0)
    }
}

/// Lines produced by [`wrap`], computed lazily one at a time.
pub struct WrapLines<'a, M: TextMeasure + ?Sized> {
    words: Peekable<SplitWhitespace<'a>>,
    max_width: f64,
    style: TextStyle,
    metrics: &'a M,
}

impl<M: TextMeasure + ?Sized> Iterator for WrapLines<'_, M> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        // An overlong first word still forms a line of its own.
        let mut line = self.words.next()?.to_string();
        while let Some(word) = self.words.peek() {
            let candidate = format!("{} {}", line, word);
            let width =
                self.metrics
                    .text_width(&candidate, self.style.font, self.style.font_size);
            if width > self.max_width {
                break;
            }
            line = candidate;
            self.words.next();
        }
        Some(line)
    }
}

/// Greedy word-wrap of `text` into lines no wider than `max_width`
/// points, measured with `metrics`.
///
/// Words are never split: a word wider than the budget occupies a line
/// by itself. Whitespace-only input yields no lines.
pub fn wrap<'a, M: TextMeasure + ?Sized>(
    text: &'a str,
    max_width: f64,
    style: TextStyle,
    metrics: &'a M,
) -> WrapLines<'a, M> {
    WrapLines {
        words: text.split_whitespace().peekable(),
        max_width,
        style,
        metrics,
    }
}
