//! Document sequence numbers.
//!
//! Numbers come from a [`SequenceStore`]. The file store keeps the last
//! issued number as plain decimal text, the format hosts already have on
//! disk. Increments are serialized within a process; two processes
//! sharing one file may still collide.

use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use chrono::{Datelike, Local, NaiveDateTime, Timelike};
use tracing::warn;

use crate::error::{QuoteError, Result};
use crate::model::DocumentKind;

/// Source of monotonically increasing document numbers.
pub trait SequenceStore {
    /// Claim the next number.
    fn next(&self) -> Result<u64>;
}

/// Counter persisted in a single text file.
#[derive(Debug)]
pub struct FileSequenceStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileSequenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileSequenceStore {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn unavailable(&self, err: impl std::fmt::Display) -> QuoteError {
        QuoteError::CounterStoreUnavailable(format!("{}: {}", self.path.display(), err))
    }
}

impl SequenceStore for FileSequenceStore {
    fn next(&self) -> Result<u64> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| self.unavailable("counter lock poisoned"))?;

        let mut file = match OpenOptions::new().read(true).write(true).open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                let mut file = OpenOptions::new()
                    .write(true)
                    .create_new(true)
                    .open(&self.path)
                    .map_err(|e| self.unavailable(e))?;
                file.write_all(b"1").map_err(|e| self.unavailable(e))?;
                file.sync_all().map_err(|e| self.unavailable(e))?;
                return Ok(1);
            }
            Err(e) => return Err(self.unavailable(e)),
        };

        let mut content = String::new();
        file.read_to_string(&mut content)
            .map_err(|e| self.unavailable(e))?;
        let content = content.trim();
        let last: u64 = if content.is_empty() {
            0
        } else {
            content
                .parse()
                .map_err(|_| self.unavailable(format!("unreadable counter {:?}", content)))?
        };
        let next = last
            .checked_add(1)
            .ok_or_else(|| self.unavailable("counter overflow"))?;

        overwrite(&mut file, next).map_err(|e| self.unavailable(e))?;
        Ok(next)
    }
}

fn overwrite(file: &mut File, value: u64) -> io::Result<()> {
    file.seek(SeekFrom::Start(0))?;
    file.set_len(0)?;
    file.write_all(value.to_string().as_bytes())?;
    file.sync_all()
}

/// In-memory counter for tests and hosts that persist numbers elsewhere.
#[derive(Debug, Default)]
pub struct MemorySequenceStore {
    last: AtomicU64,
}

impl MemorySequenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose next number is `last + 1`.
    pub fn starting_after(last: u64) -> Self {
        MemorySequenceStore {
            last: AtomicU64::new(last),
        }
    }

    /// The most recently issued number, 0 if none.
    pub fn last(&self) -> u64 {
        self.last.load(Ordering::SeqCst)
    }
}

impl SequenceStore for MemorySequenceStore {
    fn next(&self) -> Result<u64> {
        Ok(self.last.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

/// Next number from `store`, or a `YYYYMMDDhhmmss` timestamp when the
/// store fails. Timestamp numbers are not monotonic with the counter.
pub fn next_sequence_number(store: &dyn SequenceStore) -> u64 {
    match store.next() {
        Ok(n) => n,
        Err(err) => {
            let fallback = timestamp_sequence(Local::now().naive_local());
            warn!(error = %err, fallback, "sequence store failed; numbering from clock");
            fallback
        }
    }
}

/// `now` as the decimal number `YYYYMMDDhhmmss`.
pub fn timestamp_sequence(now: NaiveDateTime) -> u64 {
    let date = now.year().max(0) as u64 * 10_000
        + u64::from(now.month()) * 100
        + u64::from(now.day());
    let time = u64::from(now.hour()) * 10_000
        + u64::from(now.minute()) * 100
        + u64::from(now.second());
    date * 1_000_000 + time
}

/// Zero-padded display form, at least four digits.
pub fn format_sequence(n: u64) -> String {
    format!("{:04}", n)
}

/// `Presupuesto_0007_Juan_Perez.pdf`
///
/// Spaces and path separators become `_`, so the result is always a single
/// file name component.
pub fn suggested_filename(kind: DocumentKind, sequence_number: u64, client: &str) -> String {
    let client = if client.trim().is_empty() { "cliente" } else { client };
    let client: String = client
        .chars()
        .map(|c| if matches!(c, ' ' | '/' | '\\') { '_' } else { c })
        .collect();
    format!(
        "{}_{}_{}.pdf",
        kind.file_stem(),
        format_sequence(sequence_number),
        client
    )
}
