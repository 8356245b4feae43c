//! Library tests
//!
//! End-to-end behaviour of the facade against a temp data directory.

mod member_tests;

use std::sync::Arc;

use chrono::NaiveDate;
use libris::clock::FixedClock;
use libris::config::{Config, SyncStrategy};
use libris::{Library, NewMember, Role};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn test_config(temp_dir: &TempDir) -> Config {
    Config::builder()
        .data_dir(temp_dir.path())
        .sync_strategy(SyncStrategy::Never)
        .hash_iterations(4) // Cheap hashing for test speed
        .build()
}

/// Empty library pinned to 2024-03-01
pub fn setup_library() -> (TempDir, Arc<FixedClock>, Library) {
    let temp_dir = TempDir::new().unwrap();
    let clock = Arc::new(FixedClock::new(date(2024, 3, 1)));
    let library = Library::open_with_clock(test_config(&temp_dir), clock.clone()).unwrap();
    (temp_dir, clock, library)
}

/// Library with librarian `L1`, member `M1`, and book `ISBN001` (2 copies)
pub fn setup_stocked_library() -> (TempDir, Arc<FixedClock>, Library) {
    let (temp_dir, clock, library) = setup_library();

    library
        .register_member(
            NewMember::new("L1", "Librarian", "lib-secret", "lib@example.com")
                .role(Role::Librarian),
        )
        .unwrap();
    library
        .register_member(NewMember::new("M1", "Ada", "ada-secret", "ada@example.com"))
        .unwrap();
    library.add_book("ISBN001", "Dune", "Frank Herbert", 2).unwrap();

    (temp_dir, clock, library)
}

pub fn available(library: &Library, isbn: &str) -> u32 {
    library.find_book(isbn).unwrap().unwrap().copies_available
}
