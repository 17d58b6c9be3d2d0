use serde::Serialize;
use tracing::{info, warn};

use crate::config::QuoteConfig;
use crate::error::{Field, QuoteError, Result};
use crate::layout;
use crate::model::{Document, QuoteRequest};
use crate::numbering::{next_sequence_number, suggested_filename, SequenceStore};
use crate::pricing::{compute_document_totals, compute_line_item, ComputedLineItem, DocumentTotals};

/// A request problem the user can fix, reported instead of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationWarning {
    pub field: Field,
    /// User-facing text.
    pub message: String,
}

impl ValidationWarning {
    fn missing(field: Field) -> Self {
        let message = match field {
            Field::ClientName => "Por favor completar el cliente.",
            Field::Items => "Por favor completar los ítems.",
        };
        ValidationWarning {
            field,
            message: message.to_string(),
        }
    }
}

impl From<ValidationWarning> for QuoteError {
    fn from(warning: ValidationWarning) -> Self {
        QuoteError::MissingRequiredField(warning.field)
    }
}

#[derive(Debug, Clone)]
pub struct GeneratedDocument {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub totals: DocumentTotals,
    pub sequence_number: u64,
    pub page_count: usize,
}

#[derive(Debug, Clone)]
pub enum Outcome {
    Generated(GeneratedDocument),
    /// Nothing was rendered and no number was claimed.
    Rejected(Vec<ValidationWarning>),
}

impl Outcome {
    /// The document, or the first warning as a `MissingRequiredField`.
    pub fn into_result(self) -> Result<GeneratedDocument> {
        match self {
            Outcome::Generated(document) => Ok(document),
            Outcome::Rejected(warnings) => Err(warnings
                .into_iter()
                .next()
                .map(QuoteError::from)
                .unwrap_or(QuoteError::MissingRequiredField(Field::Items))),
        }
    }
}

/// Fields that must be filled before generation.
pub fn validate(request: &QuoteRequest) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    if request.client.name.trim().is_empty() {
        warnings.push(ValidationWarning::missing(Field::ClientName));
    }
    if request.items.is_empty() {
        warnings.push(ValidationWarning::missing(Field::Items));
    }
    warnings
}

/// Validate, price, number and render one document.
///
/// Validation problems come back as [`Outcome::Rejected`]. A failure while
/// rendering aborts the whole call; bytes are kept in memory until the
/// document is complete, so nothing partial is ever handed out.
pub fn generate(
    request: &QuoteRequest,
    store: &dyn SequenceStore,
    config: &QuoteConfig,
) -> Result<Outcome> {
    let warnings = validate(request);
    if !warnings.is_empty() {
        warn!(count = warnings.len(), "quote request rejected");
        return Ok(Outcome::Rejected(warnings));
    }

    let items: Vec<ComputedLineItem> = request.items.iter().map(compute_line_item).collect();
    let totals = compute_document_totals(
        &items,
        request.tax_rate,
        request.currency_mode,
        request.exchange_rate,
    );
    let sequence_number = next_sequence_number(store);

    let document = Document {
        metadata: request.metadata(sequence_number),
        items,
        totals,
        currency_mode: request.currency_mode,
        exchange_rate: request.exchange_rate,
    };
    let rendered = layout::render(&document, request.logo.as_deref(), config)?;
    let filename = suggested_filename(request.kind, sequence_number, &request.client.name);

    info!(
        sequence = sequence_number,
        pages = rendered.page_count,
        bytes = rendered.bytes.len(),
        %filename,
        "document generated"
    );
    Ok(Outcome::Generated(GeneratedDocument {
        bytes: rendered.bytes,
        filename,
        totals,
        sequence_number,
        page_count: rendered.page_count,
    }))
}
