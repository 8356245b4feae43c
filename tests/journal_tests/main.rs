//! Journal tests

mod entry_tests;
mod recovery_tests;
