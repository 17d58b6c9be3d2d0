//! Lenient parsing of amounts typed by people: `"$ 1.234,56"`,
//! `"1234,5"`, `"USD 10"`.

use crate::error::{QuoteError, Result};

/// Parse a decimal number written with Argentine or plain formatting.
///
/// Currency markers (`$`, `ARS`, `USD`) and all whitespace are dropped.
/// When both `.` and `,` appear, `.` groups thousands and `,` is the
/// decimal point; a lone `,` is also the decimal point.
pub fn parse_tolerant(input: &str) -> Result<f64> {
    let cleaned: String = input
        .replace('$', "")
        .replace("ARS", "")
        .replace("USD", "")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    let normalized = if cleaned.contains('.') && cleaned.contains(',') {
        cleaned.replace('.', "").replace(',', ".")
    } else {
        cleaned.replace(',', ".")
    };

    match normalized.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(QuoteError::InvalidNumberFormat(input.to_string())),
    }
}

/// Like [`parse_tolerant`], rounded to the nearest integer
/// (halves away from zero).
pub fn parse_tolerant_int(input: &str) -> Result<i64> {
    let value = parse_tolerant(input)?.round();
    if value < i64::MIN as f64 || value > i64::MAX as f64 {
        return Err(QuoteError::InvalidNumberFormat(input.to_string()));
    }
    Ok(value as i64)
}
