//! Configuration for Libris
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

/// Main configuration for a Libris instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Root directory for all data files
    /// Internal structure:
    ///   {data_dir}/
    ///     ├── books.csv
    ///     ├── members.csv
    ///     ├── loans.csv
    ///     ├── loans.seq        (last issued loan id)
    ///     └── journal.log      (commit journal)
    pub data_dir: PathBuf,

    // -------------------------------------------------------------------------
    // Journal Configuration
    // -------------------------------------------------------------------------
    /// Sync strategy: when to fsync the journal and dataset files
    pub sync_strategy: SyncStrategy,

    // -------------------------------------------------------------------------
    // Loan Configuration
    // -------------------------------------------------------------------------
    /// Days between issue date and due date
    pub loan_period_days: u32,

    // -------------------------------------------------------------------------
    // Credential Configuration
    // -------------------------------------------------------------------------
    /// SHA-256 rounds applied when hashing a new secret
    pub hash_iterations: u32,
}

/// Sync strategy for journal and dataset writes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStrategy {
    /// fsync every journal append and every dataset file (safest)
    Always,

    /// Leave flushing to the OS (tests and benchmarks)
    Never,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            sync_strategy: SyncStrategy::Always,
            loan_period_days: 14,
            hash_iterations: 10_000,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the data directory (root for all datasets)
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = path.into();
        self
    }

    /// Set the sync strategy
    pub fn sync_strategy(mut self, strategy: SyncStrategy) -> Self {
        self.config.sync_strategy = strategy;
        self
    }

    /// Set the loan period (in days)
    pub fn loan_period_days(mut self, days: u32) -> Self {
        self.config.loan_period_days = days;
        self
    }

    /// Set the number of hashing rounds for new secrets
    pub fn hash_iterations(mut self, rounds: u32) -> Self {
        self.config.hash_iterations = rounds;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
