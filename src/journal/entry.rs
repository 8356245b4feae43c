//! Journal Entry definitions
//!
//! Defines the structure of individual journal entries and their framing.

use serde::{Deserialize, Serialize};

use crate::error::{LibrisError, Result};

/// Header size: LSN (8) + CRC (4) + Len (4)
pub const HEADER_SIZE: usize = 16;

/// A single committed batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Log Sequence Number - monotonically increasing
    pub lsn: u64,

    /// Timestamp (unix millis) when the entry was created
    pub timestamp: i64,

    /// Full new contents of every file in the commit
    pub writes: Vec<FileWrite>,
}

/// Replacement contents for one file in the data directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileWrite {
    /// File name relative to the data directory
    pub file_name: String,

    /// Complete new file contents
    pub contents: String,
}

impl FileWrite {
    pub fn new(file_name: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            contents: contents.into(),
        }
    }
}

impl JournalEntry {
    /// Create an entry stamped with the current time
    pub fn new(lsn: u64, writes: Vec<FileWrite>) -> Self {
        Self {
            lsn,
            timestamp: chrono::Utc::now().timestamp_millis(),
            writes,
        }
    }

    /// Frame the entry: LSN (8) | CRC (4) | Len (4) | bincode payload
    pub fn serialize(&self) -> Result<Vec<u8>> {
        let payload = bincode::serialize(self)?;
        let len = u32::try_from(payload.len()).map_err(|_| {
            LibrisError::Serialization(format!(
                "journal entry too large: {} bytes",
                payload.len()
            ))
        })?;
        let crc = crc32fast::hash(&payload);

        let mut bytes = Vec::with_capacity(HEADER_SIZE + payload.len());
        bytes.extend_from_slice(&self.lsn.to_be_bytes());
        bytes.extend_from_slice(&crc.to_be_bytes());
        bytes.extend_from_slice(&len.to_be_bytes());
        bytes.extend_from_slice(&payload);

        Ok(bytes)
    }

    /// Decode an entry from its payload, checking CRC and header LSN
    pub fn deserialize(header_lsn: u64, crc: u32, payload: &[u8]) -> Result<Self> {
        let actual = crc32fast::hash(payload);
        if actual != crc {
            return Err(LibrisError::JournalCorruption(format!(
                "CRC mismatch at LSN {}: expected {:08x}, got {:08x}",
                header_lsn, crc, actual
            )));
        }

        let entry: JournalEntry = bincode::deserialize(payload)?;
        if entry.lsn != header_lsn {
            return Err(LibrisError::JournalCorruption(format!(
                "LSN mismatch: header {}, payload {}",
                header_lsn, entry.lsn
            )));
        }

        Ok(entry)
    }
}
