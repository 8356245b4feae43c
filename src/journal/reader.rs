//! Journal Reader
//!
//! Reads framed entries from the journal file.

use std::fs;
use std::path::Path;

use crate::error::{LibrisError, Result};
use super::{JournalEntry, HEADER_SIZE};

/// Reads entries from the journal file
///
/// The journal only ever holds the commits that have not yet been fully
/// applied, so it is read into memory in one go.
pub struct JournalReader {
    bytes: Vec<u8>,
    position: usize,
}

impl JournalReader {
    /// Open a journal file for reading
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self::from_bytes(fs::read(path)?))
    }

    /// Read from an in-memory copy of a journal
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes, position: 0 }
    }

    /// Read the next entry
    ///
    /// Returns:
    /// - `Ok(Some(entry))`: a whole, checksummed entry
    /// - `Ok(None)`: clean end of journal
    /// - `Err(JournalCorruption)`: torn tail or checksum mismatch
    pub fn next_entry(&mut self) -> Result<Option<JournalEntry>> {
        let remaining = &self.bytes[self.position..];
        if remaining.is_empty() {
            return Ok(None);
        }

        if remaining.len() < HEADER_SIZE {
            return Err(LibrisError::JournalCorruption(format!(
                "torn header at offset {}: {} of {} bytes",
                self.position,
                remaining.len(),
                HEADER_SIZE
            )));
        }

        let lsn = u64::from_be_bytes(read_array(&remaining[0..8]));
        let crc = u32::from_be_bytes(read_array(&remaining[8..12]));
        let len = u32::from_be_bytes(read_array(&remaining[12..16])) as usize;

        let body = &remaining[HEADER_SIZE..];
        if body.len() < len {
            return Err(LibrisError::JournalCorruption(format!(
                "torn entry at LSN {}: {} of {} payload bytes",
                lsn,
                body.len(),
                len
            )));
        }

        let entry = JournalEntry::deserialize(lsn, crc, &body[..len])?;
        self.position += HEADER_SIZE + len;

        Ok(Some(entry))
    }

    /// Byte offset of the next unread entry
    pub fn position(&self) -> usize {
        self.position
    }
}

fn read_array<const N: usize>(slice: &[u8]) -> [u8; N] {
    let mut array = [0u8; N];
    array.copy_from_slice(slice);
    array
}
