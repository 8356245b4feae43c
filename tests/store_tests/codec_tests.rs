//! Tests for the delimited-text codec
//!
//! These tests verify:
//! - Header row and field order on encode
//! - Quoting of commas, quotes and line breaks
//! - Decoding of quoted fields, CRLF input and empty values
//! - Rejection of malformed rows

use libris::storage::{decode_table, encode_table, Record};
use libris::LibrisError;

const FIELDS: [&str; 3] = ["ISBN", "Title", "Author"];

fn book(isbn: &str, title: &str, author: &str) -> Record {
    Record::new()
        .with("ISBN", isbn)
        .with("Title", title)
        .with("Author", author)
}

// =============================================================================
// Encode Tests
// =============================================================================

#[test]
fn test_encode_header_only() {
    assert_eq!(encode_table(&FIELDS, &[]), "ISBN,Title,Author\n");
}

#[test]
fn test_encode_follows_field_order() {
    let record = Record::new()
        .with("Author", "Herbert")
        .with("ISBN", "B1")
        .with("Title", "Dune");

    assert_eq!(
        encode_table(&FIELDS, &[record]),
        "ISBN,Title,Author\nB1,Dune,Herbert\n"
    );
}

#[test]
fn test_encode_missing_field_is_empty() {
    let record = Record::new().with("ISBN", "B1");

    assert_eq!(encode_table(&FIELDS, &[record]), "ISBN,Title,Author\nB1,,\n");
}

#[test]
fn test_encode_quotes_special_values() {
    let text = encode_table(
        &FIELDS,
        &[book("B1", "Dune, Part One", "Frank \"Frank\" Herbert")],
    );

    assert_eq!(
        text,
        "ISBN,Title,Author\nB1,\"Dune, Part One\",\"Frank \"\"Frank\"\" Herbert\"\n"
    );
}

// =============================================================================
// Decode Tests
// =============================================================================

#[test]
fn test_decode_empty_text() {
    assert!(decode_table("").unwrap().is_empty());
    assert!(decode_table("ISBN,Title,Author\n").unwrap().is_empty());
}

#[test]
fn test_decode_quoted_and_multiline_fields() {
    let text = "ISBN,Title,Author\nB1,\"Dune, Part One\",\"Line one\nLine two\"\n";

    let records = decode_table(text).unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].get("Title"), Some("Dune, Part One"));
    assert_eq!(records[0].get("Author"), Some("Line one\nLine two"));
}

#[test]
fn test_decode_keeps_empty_values() {
    let text = "LoanID,ReturnDate\n1,\n2,2024-01-02\n";

    let records = decode_table(text).unwrap();

    assert_eq!(records[0].get("ReturnDate"), Some(""));
    assert_eq!(records[1].get("ReturnDate"), Some("2024-01-02"));
}

#[test]
fn test_decode_accepts_crlf_and_missing_final_newline() {
    let records = decode_table("ISBN,Title,Author\r\nB1,Dune,Herbert").unwrap();

    assert_eq!(records, vec![book("B1", "Dune", "Herbert")]);
}

#[test]
fn test_decode_preserves_text_through_encode() {
    let original = vec![
        book("B1", "Dune, Part One", "Herbert"),
        book("B2", "\"Quoted\"", ""),
        book("B3", "Two\r\nLines", "X"),
    ];

    let decoded = decode_table(&encode_table(&FIELDS, &original)).unwrap();

    assert_eq!(decoded, original);
}

// =============================================================================
// Malformed Input Tests
// =============================================================================

#[test]
fn test_decode_rejects_wrong_column_count() {
    let err = decode_table("ISBN,Title,Author\nB1,Dune\n").unwrap_err();

    match err {
        LibrisError::CorruptRecord(msg) => assert!(msg.contains("row 2")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_decode_rejects_unterminated_quote() {
    assert!(matches!(
        decode_table("ISBN,Title\nB1,\"Dune\n"),
        Err(LibrisError::CorruptRecord(_))
    ));
}

#[test]
fn test_decode_rejects_stray_quote() {
    assert!(matches!(
        decode_table("ISBN,Title\nB1,Du\"ne\n"),
        Err(LibrisError::CorruptRecord(_))
    ));
}
