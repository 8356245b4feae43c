//! Catalogue Ledger
//!
//! Book records and their availability counters.
//!
//! ## Invariant
//! For every book: `0 ≤ copies_available ≤ copies_total`. Counter changes
//! that would break it fail with `InvariantViolation`; nothing is clamped.

use crate::error::{LibrisError, Result};
use crate::model::Book;
use crate::storage::Record;

/// In-memory working copy of the books dataset
#[derive(Debug, Clone, Default)]
pub struct Catalogue {
    books: Vec<Book>,
}

impl Catalogue {
    pub fn new(books: Vec<Book>) -> Self {
        Self { books }
    }

    pub fn from_records(records: &[Record]) -> Result<Self> {
        let books = records
            .iter()
            .map(Book::from_record)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { books })
    }

    pub fn to_records(&self) -> Vec<Record> {
        self.books.iter().map(Book::to_record).collect()
    }

    /// First book with this isbn
    pub fn find_book(&self, isbn: &str) -> Option<&Book> {
        self.books.iter().find(|book| book.isbn == isbn)
    }

    /// Add a new title with every copy available
    ///
    /// Fails with `DuplicateKey` if the isbn is already catalogued.
    pub fn add_book(
        &mut self,
        isbn: &str,
        title: &str,
        author: &str,
        total_copies: u32,
    ) -> Result<&Book> {
        if self.find_book(isbn).is_some() {
            return Err(LibrisError::DuplicateKey(format!("ISBN {}", isbn)));
        }

        self.books.push(Book::new(isbn, title, author, total_copies));
        Ok(&self.books[self.books.len() - 1])
    }

    /// Take one copy off the shelf
    pub fn decrement_availability(&mut self, isbn: &str) -> Result<u32> {
        let book = self
            .books
            .iter_mut()
            .find(|book| book.isbn == isbn)
            .ok_or_else(|| LibrisError::NotFound(format!("ISBN {}", isbn)))?;

        book.copies_available = book.copies_available.checked_sub(1).ok_or_else(|| {
            LibrisError::InvariantViolation(format!(
                "ISBN {}: availability would drop below zero",
                isbn
            ))
        })?;

        Ok(book.copies_available)
    }

    /// Put one copy back on the shelf, for every record with this isbn
    ///
    /// Every matching record is checked before any is changed.
    pub fn increment_availability(&mut self, isbn: &str) -> Result<usize> {
        let mut matched = 0;
        for book in self.books.iter().filter(|book| book.isbn == isbn) {
            if book.copies_available >= book.copies_total {
                return Err(LibrisError::InvariantViolation(format!(
                    "ISBN {}: availability would exceed {} total copies",
                    isbn, book.copies_total
                )));
            }
            matched += 1;
        }

        if matched == 0 {
            return Err(LibrisError::NotFound(format!("ISBN {}", isbn)));
        }

        for book in self.books.iter_mut().filter(|book| book.isbn == isbn) {
            book.copies_available += 1;
        }

        Ok(matched)
    }

    /// Books whose title or author contains `keyword`, ignoring case
    pub fn search(&self, keyword: &str) -> Vec<&Book> {
        let needle = keyword.to_lowercase();
        self.books
            .iter()
            .filter(|book| {
                book.title.to_lowercase().contains(&needle)
                    || book.author.to_lowercase().contains(&needle)
            })
            .collect()
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}
