//! Tests for JournalWriter and JournalRecovery
//!
//! These tests verify:
//! - Recovery from an empty or clean journal
//! - Torn tails (partial header, partial payload) are ignored
//! - CRC mismatches stop the scan
//! - Truncation and LSN continuity

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use libris::config::SyncStrategy;
use libris::journal::{FileWrite, JournalEntry, JournalRecovery, JournalWriter};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_journal() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("journal.log");
    (temp_dir, path)
}

fn writes(n: usize) -> Vec<FileWrite> {
    vec![FileWrite::new("loans.seq", format!("{}\n", n))]
}

fn write_entries_via_writer(path: &PathBuf, count: usize) {
    let mut writer = JournalWriter::open(path, SyncStrategy::Always).unwrap();
    for i in 0..count {
        writer.append(writes(i)).unwrap();
    }
}

// =============================================================================
// Clean Journal Tests
// =============================================================================

#[test]
fn test_recover_empty_file() {
    let (_temp, path) = setup_temp_journal();
    File::create(&path).unwrap();

    let (entries, result) = JournalRecovery::recover(&path).unwrap();

    assert!(entries.is_empty());
    assert_eq!(result.entries_recovered, 0);
    assert_eq!(result.entries_corrupted, 0);
    assert_eq!(result.last_lsn, 0);
    assert!(!result.was_truncated);
}

#[test]
fn test_recover_multiple_entries() {
    let (_temp, path) = setup_temp_journal();
    write_entries_via_writer(&path, 3);

    let (entries, result) = JournalRecovery::recover(&path).unwrap();

    assert_eq!(result.entries_recovered, 3);
    assert_eq!(result.last_lsn, 3);
    assert!(!result.was_truncated);
    for (i, entry) in entries.iter().enumerate() {
        assert_eq!(entry.lsn, (i + 1) as u64);
        assert_eq!(entry.writes, writes(i));
    }
}

// =============================================================================
// Torn / Corrupted Tail Tests
// =============================================================================

#[test]
fn test_recover_partial_payload_at_tail() {
    let (_temp, path) = setup_temp_journal();
    write_entries_via_writer(&path, 1);

    let mut torn = JournalEntry::new(2, writes(9)).serialize().unwrap();
    torn.truncate(20);
    let mut file = OpenOptions::new().append(true).open(&path).unwrap();
    file.write_all(&torn).unwrap();

    let (entries, result) = JournalRecovery::recover(&path).unwrap();

    assert_eq!(entries.len(), 1);
    assert_eq!(result.last_lsn, 1);
    assert_eq!(result.entries_corrupted, 1);
    assert!(result.was_truncated);
}

#[test]
fn test_recover_crc_mismatch_stops_scan() {
    let (_temp, path) = setup_temp_journal();

    let good = JournalEntry::new(1, writes(1)).serialize().unwrap();
    let mut bad = JournalEntry::new(2, writes(2)).serialize().unwrap();
    let third = JournalEntry::new(3, writes(3)).serialize().unwrap();
    if let Some(byte) = bad.last_mut() {
        *byte ^= 0xFF;
    }

    let mut file = File::create(&path).unwrap();
    file.write_all(&good).unwrap();
    file.write_all(&bad).unwrap();
    file.write_all(&third).unwrap();
    file.sync_all().unwrap();

    let (entries, result) = JournalRecovery::recover(&path).unwrap();

    assert_eq!(entries.len(), 1);
    assert_eq!(result.entries_recovered, 1);
    assert_eq!(result.entries_corrupted, 1);
    assert!(result.was_truncated);
}

#[test]
fn test_verify_matches_recover() {
    let (_temp, path) = setup_temp_journal();
    write_entries_via_writer(&path, 2);

    let result = JournalRecovery::verify(&path).unwrap();

    assert_eq!(result.entries_recovered, 2);
    assert_eq!(result.last_lsn, 2);
}

// =============================================================================
// Writer Tests
// =============================================================================

#[test]
fn test_truncate_empties_journal_and_keeps_lsn() {
    let (_temp, path) = setup_temp_journal();
    let mut writer = JournalWriter::open(&path, SyncStrategy::Always).unwrap();

    assert_eq!(writer.append(writes(0)).unwrap(), 1);
    writer.truncate().unwrap();
    assert_eq!(std::fs::metadata(&path).unwrap().len(), 0);

    assert_eq!(writer.append(writes(1)).unwrap(), 2);

    let (entries, _) = JournalRecovery::recover(&path).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].lsn, 2);
}

#[test]
fn test_resume_after_continues_numbering() {
    let (_temp, path) = setup_temp_journal();
    let mut writer = JournalWriter::open(&path, SyncStrategy::Never).unwrap();

    writer.resume_after(41);

    assert_eq!(writer.next_lsn(), 42);
    assert_eq!(writer.append(writes(0)).unwrap(), 42);
}
