//! Storage Module
//!
//! Persistent storage layer: named tabular datasets kept as delimited text.
//!
//! ## Responsibilities
//! - Load a dataset as an ordered sequence of records
//! - Save a dataset atomically (temp file + rename)
//! - Commit several datasets as one journalled batch
//! - Replay an interrupted commit on open
//!
//! ## File Format
//! ```text
//! ┌────────────────────────────────────────┐
//! │ Header row                             │
//! │   ISBN,Title,Author,...                │
//! ├────────────────────────────────────────┤
//! │ Record rows (one per line)             │
//! │   978-0,"Dune, Part One",Herbert,...   │
//! │ ... (fields in header order)           │
//! └────────────────────────────────────────┘
//! ```
//!
//! Fields holding a comma, quote or line break are quoted, with embedded
//! quotes doubled. Lines end in `\n`; `\r\n` is accepted on read.

mod codec;
mod dataset;
mod manager;
mod record;

pub use codec::{decode_table, encode_table};
pub use dataset::{Dataset, LOAN_SEQUENCE_FILE};
pub use manager::{CommitBatch, RecordStore};
pub use record::Record;
