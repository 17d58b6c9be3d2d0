use serde::{Deserialize, Serialize};

/// Currencies a document can be expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Argentine peso, the local currency.
    Ars,
    /// US dollar, the foreign currency.
    Usd,
}

impl Currency {
    /// Prefix printed before amounts.
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Ars => "$",
            Currency::Usd => "U$D",
        }
    }

    /// ISO code shown in currency annotations.
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Ars => "ARS",
            Currency::Usd => "USD",
        }
    }
}

/// Format an amount as `<sign><symbol> <int with . groups>,<cents>`,
/// e.g. `-$ 1.234,50`. Non-finite values print as zero.
pub fn format_currency(value: f64, currency: Currency) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    let abs = value.abs();
    let mut whole = abs.trunc();
    let mut cents = ((abs - whole) * 100.0).round();
    if cents >= 100.0 {
        whole += 1.0;
        cents = 0.0;
    }
    let sign = if value < 0.0 && (whole > 0.0 || cents > 0.0) {
        "-"
    } else {
        ""
    };
    format!(
        "{}{} {},{:02}",
        sign,
        currency.symbol(),
        group_thousands(&format!("{:.0}", whole)),
        cents as u8
    )
}

pub fn format_local(value: f64) -> String {
    format_currency(value, Currency::Ars)
}

pub fn format_foreign(value: f64) -> String {
    format_currency(value, Currency::Usd)
}

/// Plain number for quantities and rates: `3`, `2,5`, `10,5`.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string().replace('.', ",")
    }
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}
