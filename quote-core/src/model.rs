use std::fmt;

use chrono::{Days, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::pricing::{ComputedLineItem, DocumentTotals};

/// Days a quote stays valid when the request names no end date.
pub const DEFAULT_VALIDITY_DAYS: u64 = 7;

/// Discount applied to a single line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Discount {
    /// Fixed amount subtracted from the line base.
    Amount(f64),
    /// Percentage of the line base.
    Percent(f64),
}

impl Default for Discount {
    fn default() -> Self {
        Discount::Amount(0.0)
    }
}

/// One row of the item table as entered by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    pub quantity: f64,
    pub unit_price: f64,
    #[serde(default)]
    pub discount: Discount,
}

impl LineItem {
    pub fn new(description: impl Into<String>, quantity: f64, unit_price: f64) -> Self {
        LineItem {
            description: description.into(),
            quantity,
            unit_price,
            discount: Discount::default(),
        }
    }

    pub fn with_discount(mut self, discount: Discount) -> Self {
        self.discount = discount;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    #[default]
    Quote,
    DeliveryNote,
}

impl DocumentKind {
    /// Heading printed in the document title.
    pub fn title(&self) -> &'static str {
        match self {
            DocumentKind::Quote => "PRESUPUESTO",
            DocumentKind::DeliveryNote => "REMITO",
        }
    }

    /// First component of the suggested file name.
    pub fn file_stem(&self) -> &'static str {
        match self {
            DocumentKind::Quote => "Presupuesto",
            DocumentKind::DeliveryNote => "Remito",
        }
    }
}

/// Kind of identification number a client is registered under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IdType {
    #[default]
    Cuit,
    Dni,
    Cuil,
}

impl fmt::Display for IdType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdType::Cuit => f.write_str("CUIT"),
            IdType::Dni => f.write_str("DNI"),
            IdType::Cuil => f.write_str("CUIL"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurrencyMode {
    /// Amounts in pesos only.
    #[default]
    Local,
    /// Amounts in pesos plus a dollar equivalent at the exchange rate.
    Foreign,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyInfo {
    pub name: String,
    pub tax_id: String,
    pub address: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientInfo {
    pub name: String,
    pub id_type: IdType,
    pub id_number: String,
    /// Free-text note printed under the client block.
    pub description: String,
}

/// Which optional parts of the document are printed. All on by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayOptions {
    pub show_logo: bool,
    pub show_tax_id: bool,
    pub show_address: bool,
    pub show_email: bool,
    pub show_issue_date: bool,
    pub show_valid_until: bool,
    pub show_client_id: bool,
    pub show_description: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        DisplayOptions {
            show_logo: true,
            show_tax_id: true,
            show_address: true,
            show_email: true,
            show_issue_date: true,
            show_valid_until: true,
            show_client_id: true,
            show_description: true,
        }
    }
}

/// Everything the host supplies to generate one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRequest {
    #[serde(default)]
    pub kind: DocumentKind,
    #[serde(default)]
    pub company: CompanyInfo,
    #[serde(default)]
    pub client: ClientInfo,
    #[serde(default)]
    pub items: Vec<LineItem>,
    #[serde(default = "today")]
    pub issue_date: NaiveDate,
    /// Defaults to [`DEFAULT_VALIDITY_DAYS`] after the issue date.
    #[serde(default)]
    pub valid_until: Option<NaiveDate>,
    /// Tax percentage applied to the discounted subtotal.
    #[serde(default)]
    pub tax_rate: f64,
    #[serde(default)]
    pub currency_mode: CurrencyMode,
    /// Pesos per dollar; only used in foreign mode.
    #[serde(default)]
    pub exchange_rate: f64,
    #[serde(default)]
    pub display: DisplayOptions,
    /// Raw PNG or JPEG bytes. Supplied by the host, never serialized.
    #[serde(skip)]
    pub logo: Option<Vec<u8>>,
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

impl QuoteRequest {
    /// An empty request issued today.
    pub fn new(kind: DocumentKind) -> Self {
        QuoteRequest {
            kind,
            company: CompanyInfo::default(),
            client: ClientInfo::default(),
            items: Vec::new(),
            issue_date: today(),
            valid_until: None,
            tax_rate: 0.0,
            currency_mode: CurrencyMode::Local,
            exchange_rate: 0.0,
            display: DisplayOptions::default(),
            logo: None,
        }
    }

    /// The end of validity, explicit or defaulted.
    pub fn validity_date(&self) -> NaiveDate {
        self.valid_until.unwrap_or_else(|| {
            self.issue_date
                .checked_add_days(Days::new(DEFAULT_VALIDITY_DAYS))
                .unwrap_or(self.issue_date)
        })
    }

    pub fn metadata(&self, sequence_number: u64) -> DocumentMetadata {
        DocumentMetadata {
            sequence_number,
            issue_date: self.issue_date,
            valid_until: self.validity_date(),
            kind: self.kind,
            company: self.company.clone(),
            client: self.client.clone(),
            display: self.display,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentMetadata {
    pub sequence_number: u64,
    pub issue_date: NaiveDate,
    pub valid_until: NaiveDate,
    pub kind: DocumentKind,
    pub company: CompanyInfo,
    pub client: ClientInfo,
    pub display: DisplayOptions,
}

/// A fully computed document, ready for layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub metadata: DocumentMetadata,
    pub items: Vec<ComputedLineItem>,
    pub totals: DocumentTotals,
    pub currency_mode: CurrencyMode,
    pub exchange_rate: f64,
}
