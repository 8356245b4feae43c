//! Journal Recovery
//!
//! Finds the commits that must be re-applied after a crash.

use std::path::Path;

use crate::error::{LibrisError, Result};
use super::{JournalEntry, JournalReader};

/// Handles journal recovery after a crash
pub struct JournalRecovery;

/// Result of a recovery scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveryResult {
    /// Number of whole entries found
    pub entries_recovered: u64,

    /// Number of torn or corrupted entries skipped
    pub entries_corrupted: u64,

    /// Last valid LSN (0 if none)
    pub last_lsn: u64,

    /// Whether the scan stopped at a torn or corrupted tail
    pub was_truncated: bool,
}

impl JournalRecovery {
    /// Recover entries from a journal file
    ///
    /// This will:
    /// 1. Read all whole entries in order
    /// 2. Stop at the first torn or corrupted entry; it was never
    ///    acknowledged, so nothing after it counts either
    /// 3. Return the whole entries for re-application
    pub fn recover(path: &Path) -> Result<(Vec<JournalEntry>, RecoveryResult)> {
        let mut reader = JournalReader::open(path)?;
        let mut entries = Vec::new();
        let mut result = RecoveryResult {
            entries_recovered: 0,
            entries_corrupted: 0,
            last_lsn: 0,
            was_truncated: false,
        };

        loop {
            match reader.next_entry() {
                Ok(Some(entry)) => {
                    result.entries_recovered += 1;
                    result.last_lsn = entry.lsn;
                    entries.push(entry);
                }
                Ok(None) => break,
                Err(LibrisError::JournalCorruption(reason)) => {
                    tracing::warn!(
                        offset = reader.position(),
                        "Ignoring journal tail: {}",
                        reason
                    );
                    result.entries_corrupted += 1;
                    result.was_truncated = true;
                    break;
                }
                Err(LibrisError::Serialization(reason)) => {
                    tracing::warn!(
                        offset = reader.position(),
                        "Ignoring undecodable journal entry: {}",
                        reason
                    );
                    result.entries_corrupted += 1;
                    result.was_truncated = true;
                    break;
                }
                Err(e) => return Err(e),
            }
        }

        Ok((entries, result))
    }

    /// Scan a journal file without returning its entries
    pub fn verify(path: &Path) -> Result<RecoveryResult> {
        let (_, result) = Self::recover(path)?;
        Ok(result)
    }
}
