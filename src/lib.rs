//! # Libris
//!
//! A small library management tool with:
//! - Catalogue, member and loan datasets kept as CSV files
//! - A commit journal so multi-file updates apply all-or-nothing
//! - A loan state machine that keeps availability counters consistent
//! - Salted credential hashes and explicit librarian/member roles
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     CLI (libris binary)                      │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                        Library                               │
//! │              (one writer, clock, config)                     │
//! └──────┬──────────────┬──────────────┬──────────────┬─────────┘
//!        │              │              │              │
//!        ▼              ▼              ▼              ▼
//!  ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐
//!  │ Catalogue │  │  Members  │  │   Loans   │  │ Reporting │
//!  └─────┬─────┘  └─────┬─────┘  └─────┬─────┘  └─────┬─────┘
//!        └──────────────┴──────┬───────┴──────────────┘
//!                              ▼
//!                    ┌───────────────────┐
//!                    │   Record Store    │──▶ Journal
//!                    │   (CSV datasets)  │
//!                    └───────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;
pub mod clock;

pub mod journal;
pub mod storage;
pub mod model;
pub mod credentials;
pub mod catalogue;
pub mod members;
pub mod loans;
pub mod reporting;
pub mod library;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{LibrisError, Result};
pub use config::Config;
pub use library::Library;
pub use model::{Book, Loan, LoanState, Member, NewMember, Role};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of Libris
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
