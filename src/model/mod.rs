//! Model Module
//!
//! Typed views of the three datasets.
//!
//! Each model knows its persisted field order and converts to and from a
//! [`Record`](crate::storage::Record). Dates stay as the `YYYY-MM-DD` text
//! they are stored as.

mod book;
mod loan;
mod member;

pub use book::Book;
pub use loan::{Loan, LoanState};
pub use member::{Member, NewMember, Role};

use crate::error::{LibrisError, Result};

/// Parse a numeric field, naming it in the error
pub(crate) fn parse_number<T: std::str::FromStr>(field: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        LibrisError::CorruptRecord(format!("field '{}': not a number: '{}'", field, value))
    })
}
