//! Dataset names
//!
//! The three persisted tables and the files they live in.

use std::fmt;

/// File holding the last issued loan id
pub const LOAN_SEQUENCE_FILE: &str = "loans.seq";

/// One of the persisted tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dataset {
    Books,
    Members,
    Loans,
}

impl Dataset {
    /// Every dataset, in the order they are initialised
    pub const ALL: [Dataset; 3] = [Dataset::Books, Dataset::Members, Dataset::Loans];

    /// Short name used in logs and error messages
    pub fn name(&self) -> &'static str {
        match self {
            Dataset::Books => "books",
            Dataset::Members => "members",
            Dataset::Loans => "loans",
        }
    }

    /// File name relative to the data directory
    pub fn file_name(&self) -> &'static str {
        match self {
            Dataset::Books => "books.csv",
            Dataset::Members => "members.csv",
            Dataset::Loans => "loans.csv",
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
