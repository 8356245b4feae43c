//! Journal Writer
//!
//! Handles appending commit entries to the journal file.

use std::fs::{File, OpenOptions};
use std::io::{Seek, SeekFrom, Write};
use std::path::Path;

use crate::config::SyncStrategy;
use crate::error::Result;
use super::{FileWrite, JournalEntry};

/// Writes entries to the journal file
pub struct JournalWriter {
    file: File,

    /// LSN the next append will receive
    next_lsn: u64,

    sync_strategy: SyncStrategy,
}

impl JournalWriter {
    /// Open or create a journal file
    ///
    /// Appends go to the end of any existing content; callers recover and
    /// truncate a journal before writing to it.
    pub fn open(path: &Path, sync_strategy: SyncStrategy) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(path)?;

        Ok(Self {
            file,
            next_lsn: 1,
            sync_strategy,
        })
    }

    /// Continue numbering after `last_lsn`
    pub fn resume_after(&mut self, last_lsn: u64) {
        self.next_lsn = self.next_lsn.max(last_lsn + 1);
    }

    /// Append one commit and return its LSN
    ///
    /// A failed append leaves the file as it was, so a later entry never
    /// lands behind a torn one.
    pub fn append(&mut self, writes: Vec<FileWrite>) -> Result<u64> {
        let lsn = self.next_lsn;
        let bytes = JournalEntry::new(lsn, writes).serialize()?;

        let start = self.file.metadata()?.len();
        if let Err(e) = self.write_frame(&bytes) {
            if let Err(rollback) = self.discard_from(start) {
                tracing::error!(lsn, "Could not drop torn journal tail: {}", rollback);
            }
            return Err(e);
        }

        self.next_lsn += 1;
        Ok(lsn)
    }

    /// Force sync to disk
    pub fn sync(&mut self) -> Result<()> {
        self.file.sync_all()?;
        Ok(())
    }

    /// Drop every entry (all commits have been applied)
    ///
    /// LSNs keep increasing across truncations.
    pub fn truncate(&mut self) -> Result<()> {
        self.file.set_len(0)?;
        self.file.seek(SeekFrom::Start(0))?;
        if self.sync_strategy == SyncStrategy::Always {
            self.file.sync_all()?;
        }
        Ok(())
    }

    /// Get the LSN the next append will receive
    pub fn next_lsn(&self) -> u64 {
        self.next_lsn
    }

    fn write_frame(&mut self, bytes: &[u8]) -> Result<()> {
        self.file.write_all(bytes)?;
        if self.sync_strategy == SyncStrategy::Always {
            self.sync()?;
        }
        Ok(())
    }

    /// Cut the file back to `len` bytes; appends continue from there
    fn discard_from(&mut self, len: u64) -> Result<()> {
        self.file.set_len(len)?;
        Ok(())
    }
}
