use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{QuoteError, Result};
use crate::numbering::FileSequenceStore;

pub const COUNTER_PATH_VAR: &str = "QUOTE_COUNTER_PATH";
pub const COMPRESS_VAR: &str = "QUOTE_COMPRESS";
pub const CREATOR_VAR: &str = "QUOTE_CREATOR";

/// Generation settings shared by every request of a host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuoteConfig {
    /// File holding the last issued sequence number.
    pub counter_path: PathBuf,
    /// Flate-compress page content streams.
    pub compress: bool,
    /// Value of the PDF `Creator` info entry.
    pub creator: String,
}

impl Default for QuoteConfig {
    fn default() -> Self {
        QuoteConfig {
            counter_path: PathBuf::from("last_presupuesto.txt"),
            compress: true,
            creator: concat!("quote-core ", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl QuoteConfig {
    /// Defaults overridden by `QUOTE_COUNTER_PATH`, `QUOTE_COMPRESS`
    /// and `QUOTE_CREATOR`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = QuoteConfig::default();
        if let Some(path) = lookup(COUNTER_PATH_VAR).filter(|p| !p.trim().is_empty()) {
            config.counter_path = PathBuf::from(path);
        }
        if let Some(value) = lookup(COMPRESS_VAR) {
            config.compress = parse_bool(COMPRESS_VAR, &value)?;
        }
        if let Some(creator) = lookup(CREATOR_VAR) {
            config.creator = creator;
        }
        Ok(config)
    }

    /// The file-backed counter at `counter_path`.
    pub fn counter_store(&self) -> FileSequenceStore {
        FileSequenceStore::new(self.counter_path.clone())
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(QuoteError::Config(format!(
            "{} must be a boolean, got {:?}",
            key, other
        ))),
    }
}
