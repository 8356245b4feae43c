//! Error types for Libris
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using LibrisError
pub type Result<T> = std::result::Result<T, LibrisError>;

/// Unified error type for Libris operations
#[derive(Debug, Error)]
pub enum LibrisError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("Storage I/O error: {0}")]
    StorageIo(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Record Errors
    // -------------------------------------------------------------------------
    #[error("Corrupt record: {0}")]
    CorruptRecord(String),

    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    #[error("Not found: {0}")]
    NotFound(String),

    // -------------------------------------------------------------------------
    // Loan Errors
    // -------------------------------------------------------------------------
    #[error("Book not found: {isbn}")]
    BookNotFound { isbn: String },

    #[error("No copies available: {isbn}")]
    NoCopiesAvailable { isbn: String },

    #[error("Loan not found or already returned: member {member_id}, book {isbn}")]
    LoanNotFound { member_id: String, isbn: String },

    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    // -------------------------------------------------------------------------
    // Journal Errors
    // -------------------------------------------------------------------------
    #[error("Journal corruption detected: {0}")]
    JournalCorruption(String),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Access Errors
    // -------------------------------------------------------------------------
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<bincode::Error> for LibrisError {
    fn from(e: bincode::Error) -> Self {
        LibrisError::Serialization(e.to_string())
    }
}
