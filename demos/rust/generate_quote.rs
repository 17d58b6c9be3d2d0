/// Quote example: load a JSON request, generate the PDF, write it out.
///
/// Run with:
///   cargo run --example generate_quote -p quote-demos -- [request.json] [logo.png]
///
/// Without arguments the bundled `data/sample_quote.json` is used. The
/// counter file and compression follow `QUOTE_COUNTER_PATH`,
/// `QUOTE_COMPRESS` and `QUOTE_CREATOR`; `RUST_LOG=debug` shows page breaks.
use std::error::Error;
use std::fs;
use std::path::Path;

use quote_core::{generate, summary_lines, Outcome, QuoteConfig, QuoteRequest};
use tracing_subscriber::EnvFilter;

const SAMPLE: &str = include_str!("../data/sample_quote.json");
const OUTPUT_DIR: &str = "demos/output";

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let json = match args.next() {
        Some(path) => fs::read_to_string(path)?,
        None => SAMPLE.to_string(),
    };
    let mut request: QuoteRequest = serde_json::from_str(&json)?;
    if let Some(logo) = args.next() {
        request.logo = Some(fs::read(logo)?);
    }

    let config = QuoteConfig::from_env()?;
    let store = config.counter_store();

    match generate(&request, &store, &config)? {
        Outcome::Generated(document) => {
            for line in summary_lines(&document.totals, request.exchange_rate) {
                println!("{}", line);
            }
            fs::create_dir_all(OUTPUT_DIR)?;
            let path = Path::new(OUTPUT_DIR).join(&document.filename);
            fs::write(&path, &document.bytes)?;
            println!(
                "Written {} ({} pages) to {}",
                document.filename,
                document.page_count,
                path.display()
            );
        }
        Outcome::Rejected(warnings) => {
            for warning in &warnings {
                eprintln!("{}", warning.message);
            }
            std::process::exit(2);
        }
    }
    Ok(())
}
