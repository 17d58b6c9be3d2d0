use std::fs;

use quote_core::{
    next_sequence_number, FileSequenceStore, QuoteConfig, QuoteError, SequenceStore,
};
use tempfile::tempdir;

#[test]
fn counts_one_two_three_from_missing_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("last_presupuesto.txt");
    let store = FileSequenceStore::new(&path);

    assert_eq!(store.next().unwrap(), 1);
    assert_eq!(fs::read_to_string(&path).unwrap(), "1");
    assert_eq!(store.next().unwrap(), 2);
    assert_eq!(store.next().unwrap(), 3);
    assert_eq!(fs::read_to_string(&path).unwrap(), "3");
}

#[test]
fn continues_existing_counter() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("counter.txt");
    fs::write(&path, "99\n").unwrap();
    let store = FileSequenceStore::new(&path);
    assert_eq!(store.next().unwrap(), 100);
    assert_eq!(fs::read_to_string(&path).unwrap(), "100");
}

#[test]
fn empty_file_counts_as_zero() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("counter.txt");
    fs::write(&path, "").unwrap();
    assert_eq!(FileSequenceStore::new(&path).next().unwrap(), 1);
}

#[test]
fn garbage_counter_is_unavailable() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("counter.txt");
    fs::write(&path, "doce").unwrap();
    let store = FileSequenceStore::new(&path);
    assert!(matches!(
        store.next(),
        Err(QuoteError::CounterStoreUnavailable(_))
    ));
    // The unreadable file is left untouched.
    assert_eq!(fs::read_to_string(&path).unwrap(), "doce");
}

#[test]
fn unreachable_counter_falls_back_to_timestamp() {
    let dir = tempdir().unwrap();
    let store = FileSequenceStore::new(dir.path().join("missing-dir").join("counter.txt"));
    assert!(store.next().is_err());
    let n = next_sequence_number(&store);
    assert!(n >= 20_000_101_000_000);
}

#[test]
fn config_builds_store_at_counter_path() {
    let dir = tempdir().unwrap();
    let config = QuoteConfig {
        counter_path: dir.path().join("n.txt"),
        ..QuoteConfig::default()
    };
    let store = config.counter_store();
    assert_eq!(store.next().unwrap(), 1);
    assert_eq!(store.next().unwrap(), 2);
}
