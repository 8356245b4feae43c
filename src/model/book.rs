use crate::error::{LibrisError, Result};
use crate::storage::Record;

use super::parse_number;

/// A catalogue entry and its availability counter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub copies_total: u32,
    pub copies_available: u32,
}

impl Book {
    /// Persisted field order
    pub const FIELDS: [&'static str; 5] =
        ["ISBN", "Title", "Author", "CopiesTotal", "CopiesAvailable"];

    /// A new book with every copy on the shelf
    pub fn new(
        isbn: impl Into<String>,
        title: impl Into<String>,
        author: impl Into<String>,
        copies_total: u32,
    ) -> Self {
        Self {
            isbn: isbn.into(),
            title: title.into(),
            author: author.into(),
            copies_total,
            copies_available: copies_total,
        }
    }

    pub fn from_record(record: &Record) -> Result<Self> {
        let book = Self {
            isbn: record.require("ISBN")?.to_string(),
            title: record.require("Title")?.to_string(),
            author: record.require("Author")?.to_string(),
            copies_total: parse_number("CopiesTotal", record.require("CopiesTotal")?)?,
            copies_available: parse_number(
                "CopiesAvailable",
                record.require("CopiesAvailable")?,
            )?,
        };

        if book.copies_available > book.copies_total {
            return Err(LibrisError::CorruptRecord(format!(
                "book {}: {} copies available of {} total",
                book.isbn, book.copies_available, book.copies_total
            )));
        }

        Ok(book)
    }

    pub fn to_record(&self) -> Record {
        Record::new()
            .with("ISBN", self.isbn.as_str())
            .with("Title", self.title.as_str())
            .with("Author", self.author.as_str())
            .with("CopiesTotal", self.copies_total.to_string())
            .with("CopiesAvailable", self.copies_available.to_string())
    }
}
