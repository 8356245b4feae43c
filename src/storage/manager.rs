//! Record Store
//!
//! Reads and writes whole datasets in the data directory.
//!
//! ## Responsibilities
//! - Load a dataset into records (missing file = empty dataset)
//! - Replace a dataset atomically with a header row plus records
//! - Commit several files as one journalled batch
//! - Re-apply interrupted commits on open

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::config::SyncStrategy;
use crate::error::{LibrisError, Result};
use crate::journal::{FileWrite, JournalRecovery, JournalWriter};

use super::{decode_table, encode_table, Dataset, Record};

/// Files staged for one atomic commit
#[derive(Debug, Default)]
pub struct CommitBatch {
    writes: Vec<FileWrite>,
}

impl CommitBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage the full new contents of a dataset
    pub fn dataset(mut self, dataset: Dataset, field_order: &[&str], records: &[Record]) -> Self {
        self.writes.push(FileWrite::new(
            dataset.file_name(),
            encode_table(field_order, records),
        ));
        self
    }

    /// Stage a single-value counter file
    pub fn counter(mut self, file_name: &str, value: u64) -> Self {
        self.writes.push(FileWrite::new(file_name, format!("{}\n", value)));
        self
    }

    /// Files staged so far
    pub fn writes(&self) -> &[FileWrite] {
        &self.writes
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }
}

/// Manages the datasets in one data directory
///
/// ## Concurrency:
/// - Loads and single-dataset saves need no lock (rename is atomic)
/// - `journal`: one commit at a time within this process
/// - `pending`: locked only while `journal` is held
/// - Nothing guards against a second process using the same directory
pub struct RecordStore {
    /// Directory holding every dataset
    data_dir: PathBuf,

    /// Commit journal (exclusive access for append/apply/truncate)
    journal: Mutex<JournalWriter>,

    /// Journalled writes whose apply step failed; completed before the
    /// next load, save or commit
    pending: Mutex<Option<Vec<FileWrite>>>,

    sync_strategy: SyncStrategy,
}

impl RecordStore {
    const JOURNAL_FILENAME: &'static str = "journal.log";

    /// Open or create a store in the given directory
    ///
    /// On startup:
    /// 1. Create directory if it doesn't exist
    /// 2. Re-apply any whole commits left in the journal
    /// 3. Truncate the journal (drops a torn tail too)
    pub fn open(data_dir: &Path, sync_strategy: SyncStrategy) -> Result<Self> {
        fs::create_dir_all(data_dir)?;

        let journal_path = data_dir.join(Self::JOURNAL_FILENAME);
        let store = Self {
            data_dir: data_dir.to_path_buf(),
            journal: Mutex::new(JournalWriter::open(&journal_path, sync_strategy)?),
            pending: Mutex::new(None),
            sync_strategy,
        };

        let (entries, result) = JournalRecovery::recover(&journal_path)?;
        if result.entries_recovered > 0 || result.entries_corrupted > 0 {
            tracing::info!(
                recovered = result.entries_recovered,
                corrupted = result.entries_corrupted,
                last_lsn = result.last_lsn,
                "Journal recovery"
            );
        }

        for entry in &entries {
            store.apply(&entry.writes)?;
            tracing::info!(lsn = entry.lsn, files = entry.writes.len(), "Re-applied commit");
        }

        {
            let mut journal = store.journal.lock();
            journal.resume_after(result.last_lsn);
            journal.truncate()?;
        }

        Ok(store)
    }

    /// Load every record of a dataset, in file order
    pub fn load(&self, dataset: Dataset) -> Result<Vec<Record>> {
        self.settle_pending()?;

        let path = self.dataset_path(dataset);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(%dataset, "Dataset file missing; treating as empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let records = decode_table(&text).map_err(|e| match e {
            LibrisError::CorruptRecord(reason) => {
                LibrisError::CorruptRecord(format!("{}: {}", dataset.file_name(), reason))
            }
            other => other,
        })?;

        tracing::debug!(%dataset, records = records.len(), "Loaded dataset");
        Ok(records)
    }

    /// Replace a dataset with a header row plus `records`
    ///
    /// Readers see either the old file or the new one, never a mix.
    pub fn save(&self, dataset: Dataset, field_order: &[&str], records: &[Record]) -> Result<()> {
        self.settle_pending()?;
        self.write_atomic(dataset.file_name(), &encode_table(field_order, records))?;
        tracing::debug!(%dataset, records = records.len(), "Saved dataset");
        Ok(())
    }

    /// Read a counter file written by [`CommitBatch::counter`]
    pub fn load_counter(&self, file_name: &str) -> Result<Option<u64>> {
        self.settle_pending()?;

        let text = match fs::read_to_string(self.data_dir.join(file_name)) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }

        trimmed.parse().map(Some).map_err(|_| {
            LibrisError::CorruptRecord(format!("{}: not a counter: '{}'", file_name, trimmed))
        })
    }

    /// Commit every staged file as one unit
    ///
    /// Steps:
    /// 1. Append the batch to the journal (synced)
    /// 2. Replace each file
    /// 3. Truncate the journal
    ///
    /// Once step 1 succeeds the commit is durable. If step 2 fails part-way
    /// the error is returned, the entry stays in the journal, and the
    /// remaining files are written before this store serves another load,
    /// save or commit (or on the next open). Until then those calls fail
    /// rather than expose a half-applied commit.
    pub fn commit(&self, batch: CommitBatch) -> Result<u64> {
        if batch.is_empty() {
            return Ok(0);
        }

        let mut journal = self.journal.lock();
        self.settle_locked(&mut journal)?;

        let lsn = journal.append(batch.writes.clone())?;

        if let Err(e) = self.apply(&batch.writes) {
            tracing::error!(lsn, "Commit applied part-way, completing before next access: {}", e);
            *self.pending.lock() = Some(batch.writes);
            return Err(e);
        }
        journal.truncate()?;

        tracing::info!(
            lsn,
            files = ?batch.writes.iter().map(|w| w.file_name.as_str()).collect::<Vec<_>>(),
            "Committed"
        );
        Ok(lsn)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the data directory path
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Get the file path of a dataset
    pub fn dataset_path(&self, dataset: Dataset) -> PathBuf {
        self.data_dir.join(dataset.file_name())
    }

    /// Get the journal file path
    pub fn journal_path(&self) -> PathBuf {
        self.data_dir.join(Self::JOURNAL_FILENAME)
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn settle_pending(&self) -> Result<()> {
        let mut journal = self.journal.lock();
        self.settle_locked(&mut journal)
    }

    /// Finish a commit whose apply step failed; caller holds `journal`
    fn settle_locked(&self, journal: &mut JournalWriter) -> Result<()> {
        let mut pending = self.pending.lock();
        let Some(writes) = pending.take() else {
            return Ok(());
        };

        if let Err(e) = self.apply(&writes) {
            *pending = Some(writes);
            return Err(e);
        }
        journal.truncate()?;

        tracing::info!(files = writes.len(), "Completed pending commit");
        Ok(())
    }

    fn apply(&self, writes: &[FileWrite]) -> Result<()> {
        for write in writes {
            self.write_atomic(&write.file_name, &write.contents)?;
        }
        Ok(())
    }

    /// Write `contents` to a sibling temp file, then rename over `file_name`
    fn write_atomic(&self, file_name: &str, contents: &str) -> Result<()> {
        let target = self.data_dir.join(file_name);
        let temp = self.data_dir.join(format!("{}.tmp", file_name));

        {
            let mut file = File::create(&temp)?;
            file.write_all(contents.as_bytes())?;
            if self.sync_strategy == SyncStrategy::Always {
                file.sync_all()?;
            }
        }

        fs::rename(&temp, &target)?;
        Ok(())
    }
}
