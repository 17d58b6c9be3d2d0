pub mod config;
pub mod currency;
pub mod error;
pub mod generate;
pub mod layout;
pub mod model;
pub mod numbering;
pub mod parse;
pub mod pricing;

pub use config::QuoteConfig;
pub use currency::{format_currency, format_foreign, format_local, Currency};
pub use error::{Field, QuoteError, Result};
pub use generate::{generate, validate, GeneratedDocument, Outcome, ValidationWarning};
pub use layout::{render, RenderedDocument};
pub use model::{
    ClientInfo, CompanyInfo, CurrencyMode, Discount, DisplayOptions, Document, DocumentKind,
    DocumentMetadata, IdType, LineItem, QuoteRequest,
};
pub use numbering::{
    format_sequence, next_sequence_number, suggested_filename, FileSequenceStore,
    MemorySequenceStore, SequenceStore,
};
pub use parse::{parse_tolerant, parse_tolerant_int};
pub use pricing::{
    compute_document_totals, compute_line_item, summary_lines, ComputedLineItem, DocumentTotals,
};
