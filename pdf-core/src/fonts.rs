/// Font identifier for the Helvetica family of standard PDF fonts.
/// These fonts are guaranteed available in all PDF viewers
/// without embedding, and are declared with `WinAnsiEncoding`
/// so Spanish accents render without a font program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BuiltinFont {
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
    HelveticaBoldOblique,
}

impl BuiltinFont {
    /// Every builtin font, in resource-name order.
    pub const ALL: [BuiltinFont; 4] = [
        BuiltinFont::Helvetica,
        BuiltinFont::HelveticaBold,
        BuiltinFont::HelveticaOblique,
        BuiltinFont::HelveticaBoldOblique,
    ];

    /// Returns the PDF resource name used in content streams
    /// (e.g. "F1"). Fixed mapping by variant order.
    pub fn pdf_name(&self) -> &'static str {
        match self {
            BuiltinFont::Helvetica => "F1",
            BuiltinFont::HelveticaBold => "F2",
            BuiltinFont::HelveticaOblique => "F3",
            BuiltinFont::HelveticaBoldOblique => "F4",
        }
    }

    /// Returns the PDF BaseFont name (e.g. "Helvetica-Bold").
    pub fn pdf_base_name(&self) -> &'static str {
        match self {
            BuiltinFont::Helvetica => "Helvetica",
            BuiltinFont::HelveticaBold => "Helvetica-Bold",
            BuiltinFont::HelveticaOblique => "Helvetica-Oblique",
            BuiltinFont::HelveticaBoldOblique => "Helvetica-BoldOblique",
        }
    }

    /// Look up a BuiltinFont by its PDF base name string.
    /// Returns None if the name doesn't match any variant.
    pub fn from_name(name: &str) -> Option<BuiltinFont> {
        BuiltinFont::ALL
            .into_iter()
            .find(|font| font.pdf_base_name() == name)
    }

    fn is_bold(&self) -> bool {
        matches!(
            self,
            BuiltinFont::HelveticaBold | BuiltinFont::HelveticaBoldOblique
        )
    }
}

/// Helvetica widths for ASCII 32..=126, 1/1000 em (Adobe AFM).
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

/// Helvetica-Bold widths for ASCII 32..=126, 1/1000 em (Adobe AFM).
#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Default width for characters outside the mapped range (1/1000 em).
const DEFAULT_WIDTH: u16 = 278;

/// Accented Latin-1 letters take the width of their base letter in
/// every Helvetica weight.
fn base_letter(ch: char) -> Option<char> {
    let base = match ch {
        'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' => 'A',
        'È' | 'É' | 'Ê' | 'Ë' => 'E',
        'Ì' | 'Í' | 'Î' | 'Ï' => 'I',
        'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' => 'O',
        'Ù' | 'Ú' | 'Û' | 'Ü' => 'U',
        'Ñ' => 'N',
        'Ç' => 'C',
        'Ý' => 'Y',
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'è' | 'é' | 'ê' | 'ë' => 'e',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' => 'o',
        'ù' | 'ú' | 'û' | 'ü' => 'u',
        'ñ' => 'n',
        'ý' | 'ÿ' => 'y',
        _ => return None,
    };
    Some(base)
}

/// Widths of the non-letter WinAnsi symbols a quote is likely to carry.
fn symbol_width(font: BuiltinFont, ch: char) -> Option<u16> {
    let bold = font.is_bold();
    let w = match ch {
        '\u{a0}' => 278,
        '°' => 400,
        'º' => 365,
        'ª' => 370,
        '¡' => 333,
        '¿' => 611,
        '«' | '»' => 556,
        '€' | '¢' | '£' | '§' | '–' => 556,
        '—' => 1000,
        '•' => 350,
        '·' => 278,
        '×' => 584,
        '©' | '®' => 737,
        'ß' => 611,
        'ç' if bold => 556,
        'ç' => 500,
        'µ' if bold => 611,
        'µ' => 556,
        '‘' | '’' if bold => 278,
        '‘' | '’' => 222,
        '“' | '”' if bold => 500,
        '“' | '”' => 333,
        _ => return None,
    };
    Some(w)
}

/// External text-measurement capability.
///
/// Layout code measures through this trait so a rendering backend can
/// supply its own metrics.
pub trait TextMeasure {
    /// Width of `text` in points when set in `font` at `font_size`.
    fn text_width(&self, text: &str, font: BuiltinFont, font_size: f64) -> f64;
}

/// Font metrics for built-in PDF fonts.
#[derive(Debug, Clone, Copy, Default)]
pub struct FontMetrics;

impl FontMetrics {
    /// Returns the width of a character in 1/1000 em units.
    pub fn char_width(font: BuiltinFont, ch: char) -> u16 {
        let table = if font.is_bold() {
            &HELVETICA_BOLD_WIDTHS
        } else {
            &HELVETICA_WIDTHS
        };
        let lookup = |c: char| {
            let code = c as u32;
            if (32..=126).contains(&code) {
                Some(table[(code - 32) as usize])
            } else {
                None
            }
        };
        lookup(ch)
            .or_else(|| base_letter(ch).and_then(lookup))
            .or_else(|| symbol_width(font, ch))
            .unwrap_or(DEFAULT_WIDTH)
    }

    /// Measures the width of a text string in points.
    pub fn measure_text(text: &str, font: BuiltinFont, font_size: f64) -> f64 {
        let total: u32 = text
            .chars()
            .map(|ch| Self::char_width(font, ch) as u32)
            .sum();
        total as f64 * font_size / 1000.0
    }

    /// Returns the line height for a given font size
    /// (1.2x multiplier).
    pub fn line_height(_font: BuiltinFont, font_size: f64) -> f64 {
        font_size * 1.2
    }
}

impl TextMeasure for FontMetrics {
    fn text_width(&self, text: &str, font: BuiltinFont, font_size: f64) -> f64 {
        Self::measure_text(text, font, font_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_name_round_trips_every_font() {
        for font in BuiltinFont::ALL {
            assert_eq!(BuiltinFont::from_name(font.pdf_base_name()), Some(font));
        }
        assert_eq!(BuiltinFont::from_name("Comic Sans"), None);
    }

    #[test]
    fn accented_letters_use_base_width() {
        let f = BuiltinFont::Helvetica;
        assert_eq!(FontMetrics::char_width(f, 'Ó'), FontMetrics::char_width(f, 'O'));
        assert_eq!(FontMetrics::char_width(f, 'í'), FontMetrics::char_width(f, 'i'));
        assert_eq!(
            FontMetrics::char_width(BuiltinFont::HelveticaBold, 'É'),
            FontMetrics::char_width(BuiltinFont::HelveticaBold, 'E'),
        );
    }

    #[test]
    fn degree_sign_has_afm_width() {
        assert_eq!(FontMetrics::char_width(BuiltinFont::HelveticaBold, '°'), 400);
    }

    #[test]
    fn oblique_shares_upright_widths() {
        let text = "Presupuesto N° 0001";
        assert_eq!(
            FontMetrics::measure_text(text, BuiltinFont::Helvetica, 10.0),
            FontMetrics::measure_text(text, BuiltinFont::HelveticaOblique, 10.0),
        );
    }
}
