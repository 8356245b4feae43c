//! Commit Journal Module
//!
//! Makes a save that touches several dataset files atomic.
//!
//! ## Responsibilities
//! - Append the full new contents of every file in a commit before any file
//!   is replaced
//! - CRC32 checksums for torn-write detection
//! - Log Sequence Numbers (LSN) for ordering
//! - Replay of a commit whose apply step was interrupted
//!
//! ## Commit Protocol
//! 1. Append one entry holding every file write, then sync
//! 2. Replace each file (temp file + rename)
//! 3. Truncate the journal
//!
//! A crash before step 1 completes leaves a torn entry, which recovery
//! ignores: nothing was applied. A crash during step 2 leaves a whole entry,
//! which recovery re-applies: every write is a full-file snapshot, so
//! re-applying is idempotent.
//!
//! ## File Format
//! ```text
//! ┌─────────────────────────────────────────┐
//! │ Entry 1                                 │
//! │ ┌─────────┬─────────┬────────┬────────┐ │
//! │ │ LSN (8) │ CRC (4) │Len (4) │ Data   │ │
//! │ └─────────┴─────────┴────────┴────────┘ │
//! ├─────────────────────────────────────────┤
//! │ Entry 2 ...                             │
//! └─────────────────────────────────────────┘
//! ```

mod entry;
mod reader;
mod recovery;
mod writer;

pub use entry::{FileWrite, JournalEntry, HEADER_SIZE};
pub use reader::JournalReader;
pub use recovery::{JournalRecovery, RecoveryResult};
pub use writer::JournalWriter;
