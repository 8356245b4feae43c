//! Tests for JournalEntry framing and JournalReader
//!
//! These tests verify:
//! - Header layout (LSN, CRC, length)
//! - CRC and LSN checks on decode
//! - Reader behaviour at clean and torn ends

use libris::journal::{FileWrite, JournalEntry, JournalReader, HEADER_SIZE};
use libris::LibrisError;

// =============================================================================
// Helper Functions
// =============================================================================

fn sample_entry(lsn: u64) -> JournalEntry {
    JournalEntry::new(
        lsn,
        vec![
            FileWrite::new("books.csv", "ISBN,Title\nB1,\"Dune, Part One\"\n"),
            FileWrite::new("loans.seq", "3\n"),
        ],
    )
}

// =============================================================================
// Framing Tests
// =============================================================================

#[test]
fn test_serialize_header_layout() {
    let entry = sample_entry(42);
    let bytes = entry.serialize().unwrap();

    assert!(bytes.len() > HEADER_SIZE);
    assert_eq!(u64::from_be_bytes(bytes[0..8].try_into().unwrap()), 42);

    let len = u32::from_be_bytes(bytes[12..16].try_into().unwrap()) as usize;
    assert_eq!(bytes.len(), HEADER_SIZE + len);

    let crc = u32::from_be_bytes(bytes[8..12].try_into().unwrap());
    assert_eq!(crc, crc32fast::hash(&bytes[HEADER_SIZE..]));
}

#[test]
fn test_deserialize_recovers_writes() {
    let entry = sample_entry(7);
    let bytes = entry.serialize().unwrap();
    let crc = u32::from_be_bytes(bytes[8..12].try_into().unwrap());

    let decoded = JournalEntry::deserialize(7, crc, &bytes[HEADER_SIZE..]).unwrap();

    assert_eq!(decoded, entry);
    assert_eq!(decoded.writes[0].file_name, "books.csv");
}

#[test]
fn test_deserialize_rejects_bad_crc() {
    let bytes = sample_entry(1).serialize().unwrap();

    let err = JournalEntry::deserialize(1, 0xDEAD_BEEF, &bytes[HEADER_SIZE..]).unwrap_err();

    assert!(matches!(err, LibrisError::JournalCorruption(_)));
}

#[test]
fn test_deserialize_rejects_lsn_mismatch() {
    let bytes = sample_entry(1).serialize().unwrap();
    let crc = u32::from_be_bytes(bytes[8..12].try_into().unwrap());

    let err = JournalEntry::deserialize(2, crc, &bytes[HEADER_SIZE..]).unwrap_err();

    assert!(matches!(err, LibrisError::JournalCorruption(_)));
}

// =============================================================================
// Reader Tests
// =============================================================================

#[test]
fn test_reader_empty_is_clean_end() {
    let mut reader = JournalReader::from_bytes(Vec::new());
    assert!(reader.next_entry().unwrap().is_none());
}

#[test]
fn test_reader_reads_in_order() {
    let mut bytes = sample_entry(1).serialize().unwrap();
    bytes.extend(sample_entry(2).serialize().unwrap());

    let mut reader = JournalReader::from_bytes(bytes);

    assert_eq!(reader.next_entry().unwrap().unwrap().lsn, 1);
    assert_eq!(reader.next_entry().unwrap().unwrap().lsn, 2);
    assert!(reader.next_entry().unwrap().is_none());
}

#[test]
fn test_reader_torn_header() {
    let mut reader = JournalReader::from_bytes(vec![0u8; HEADER_SIZE - 1]);

    let err = reader.next_entry().unwrap_err();
    assert!(matches!(err, LibrisError::JournalCorruption(_)));
    assert_eq!(reader.position(), 0);
}

#[test]
fn test_reader_torn_payload() {
    let mut bytes = sample_entry(1).serialize().unwrap();
    bytes.truncate(HEADER_SIZE + 3);

    let mut reader = JournalReader::from_bytes(bytes);

    assert!(matches!(
        reader.next_entry(),
        Err(LibrisError::JournalCorruption(_))
    ));
}
