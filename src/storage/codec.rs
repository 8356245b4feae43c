//! Delimited-text codec
//!
//! Encoding and decoding of whole datasets.
//!
//! ## Table Format
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ header:  name[0],name[1],...,name[n-1]\n     │
//! │ row:     value[0],value[1],...,value[n-1]\n  │
//! │ ... repeated for each record ...             │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! ### Quoting
//! - A value containing `,` `"` `\r` or `\n` is wrapped in `"`
//! - An embedded `"` is written as `""`
//! - Every other value is written verbatim

use std::mem;

use crate::error::{LibrisError, Result};
use super::Record;

/// Field separator
pub const DELIMITER: char = ',';

/// Quote character
pub const QUOTE: char = '"';

// =============================================================================
// Encoding
// =============================================================================

/// Encode a header row plus every record, fields in `field_order`
///
/// A record missing one of the named fields emits an empty value;
/// fields not named in `field_order` are dropped.
pub fn encode_table(field_order: &[&str], records: &[Record]) -> String {
    let mut out = String::new();
    encode_row(&mut out, field_order.iter().copied());

    for record in records {
        encode_row(
            &mut out,
            field_order.iter().map(|name| record.get(name).unwrap_or("")),
        );
    }

    out
}

/// Append one row (terminated by `\n`) to `out`
fn encode_row<'a>(out: &mut String, values: impl Iterator<Item = &'a str>) {
    for (i, value) in values.enumerate() {
        if i > 0 {
            out.push(DELIMITER);
        }
        encode_field(out, value);
    }
    out.push('\n');
}

fn encode_field(out: &mut String, value: &str) {
    let needs_quotes = value
        .chars()
        .any(|c| c == DELIMITER || c == QUOTE || c == '\r' || c == '\n');

    if !needs_quotes {
        out.push_str(value);
        return;
    }

    out.push(QUOTE);
    for c in value.chars() {
        if c == QUOTE {
            out.push(QUOTE);
        }
        out.push(c);
    }
    out.push(QUOTE);
}

// =============================================================================
// Decoding
// =============================================================================

/// Decode a whole table into records keyed by the header row
///
/// Empty input (or a header with no rows) yields no records. Every row
/// must have exactly as many values as the header.
pub fn decode_table(text: &str) -> Result<Vec<Record>> {
    let mut rows = parse_rows(text)?.into_iter();

    let header = match rows.next() {
        Some(header) => header,
        None => return Ok(Vec::new()),
    };

    let mut records: Vec<Record> = Vec::new();
    for (i, row) in rows.enumerate() {
        if row.len() != header.len() {
            return Err(LibrisError::CorruptRecord(format!(
                "row {}: expected {} fields, got {}",
                i + 2,
                header.len(),
                row.len()
            )));
        }

        records.push(header.iter().cloned().zip(row).collect());
    }

    Ok(records)
}

/// Split text into rows of raw field values
///
/// Blank lines are skipped. Quoted fields may span lines.
fn parse_rows(text: &str) -> Result<Vec<Vec<String>>> {
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut row_has_content = false;
    let mut line = 1usize;

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                QUOTE if chars.peek() == Some(&QUOTE) => {
                    chars.next();
                    field.push(QUOTE);
                }
                QUOTE => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            QUOTE if field.is_empty() => {
                in_quotes = true;
                row_has_content = true;
            }
            QUOTE => {
                return Err(LibrisError::CorruptRecord(format!(
                    "line {}: unexpected quote inside unquoted field",
                    line
                )));
            }
            DELIMITER => {
                row.push(mem::take(&mut field));
                row_has_content = true;
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                if row_has_content || !field.is_empty() {
                    row.push(mem::take(&mut field));
                    rows.push(mem::take(&mut row));
                }
                row_has_content = false;
                line += 1;
            }
            _ => {
                field.push(c);
                row_has_content = true;
            }
        }
    }

    if in_quotes {
        return Err(LibrisError::CorruptRecord(format!(
            "line {}: unterminated quoted field",
            line
        )));
    }

    if row_has_content || !field.is_empty() {
        row.push(field);
        rows.push(row);
    }

    Ok(rows)
}
