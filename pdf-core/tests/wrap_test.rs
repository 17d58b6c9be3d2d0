use pdf_core::{wrap, BuiltinFont, FontMetrics, TextMeasure, TextStyle};
use proptest::prelude::*;

fn style() -> TextStyle {
    TextStyle::new(BuiltinFont::Helvetica, 10.0)
}

#[test]
fn wraps_spanish_description_at_width() {
    let text = "Instalación de cañería de agua fría y caliente en baño principal";
    let lines: Vec<String> = wrap(text, 120.0, style(), &FontMetrics).collect();
    assert!(lines.len() > 1);
    for line in &lines {
        assert!(FontMetrics.text_width(line, BuiltinFont::Helvetica, 10.0) <= 120.0);
    }
    assert_eq!(lines.join(" "), text);
}

#[test]
fn measure_is_pluggable_through_trait_object() {
    let measure: &dyn TextMeasure = &FontMetrics;
    let lines: Vec<String> = wrap("uno dos tres", 1000.0, style(), measure).collect();
    assert_eq!(lines, vec!["uno dos tres".to_string()]);
}

proptest! {
    #[test]
    fn lines_fit_unless_single_word(words in prop::collection::vec("[a-zñáé]{1,14}", 0..30), width in 20.0f64..300.0) {
        let text = words.join(" ");
        let lines: Vec<String> = wrap(&text, width, style(), &FontMetrics).collect();
        for line in &lines {
            let w = FontMetrics.text_width(line, BuiltinFont::Helvetica, 10.0);
            prop_assert!(w <= width || !line.contains(' '));
        }
        // Words are never split or reordered.
        let rejoined: Vec<&str> = lines.iter().flat_map(|l| l.split(' ')).collect();
        prop_assert_eq!(rejoined, words.iter().map(String::as_str).collect::<Vec<_>>());
    }
}
