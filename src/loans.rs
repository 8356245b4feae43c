//! Loan Engine
//!
//! The issue/return state machine.
//!
//! ## Loan States
//! ```text
//!   issue ──▶ Outstanding ──return──▶ Returned (terminal)
//! ```
//!
//! ## Responsibilities
//! - Issue a copy: check availability, assign the next loan id, decrement
//! - Return a copy: close the first outstanding match, increment
//! - Stage every touched dataset and commit them together
//!
//! [`LoanLedger`] is the pure in-memory half; [`LoanEngine`] loads a fresh
//! working copy from the store for each operation and commits it back.

use chrono::{Days, NaiveDate};

use crate::catalogue::Catalogue;
use crate::clock::{format_date, Clock};
use crate::error::{LibrisError, Result};
use crate::model::{Book, Loan};
use crate::storage::{CommitBatch, Dataset, Record, RecordStore, LOAN_SEQUENCE_FILE};

// =============================================================================
// LoanLedger
// =============================================================================

/// In-memory working copy of the loans dataset plus the loan id sequence
#[derive(Debug, Clone, Default)]
pub struct LoanLedger {
    loans: Vec<Loan>,

    /// Highest loan id ever handed out
    last_loan_id: u64,
}

impl LoanLedger {
    /// Build from loaded records and the persisted sequence
    ///
    /// The sequence never goes below the largest id already on file, so a
    /// missing or stale counter cannot cause a collision.
    pub fn from_records(records: &[Record], sequence: Option<u64>) -> Result<Self> {
        let loans = records
            .iter()
            .map(Loan::from_record)
            .collect::<Result<Vec<_>>>()?;

        let max_on_file = loans.iter().map(|loan| loan.loan_id).max().unwrap_or(0);

        Ok(Self {
            loans,
            last_loan_id: sequence.unwrap_or(0).max(max_on_file),
        })
    }

    pub fn to_records(&self) -> Vec<Record> {
        self.loans.iter().map(Loan::to_record).collect()
    }

    /// Issue one copy of `isbn` to `member_id` on `today`
    ///
    /// Steps:
    /// 1. Resolve the book (`BookNotFound`)
    /// 2. Check availability (`NoCopiesAvailable`)
    /// 3. Take the copy off the shelf
    /// 4. Record an outstanding loan due `loan_period_days` later
    pub fn issue(
        &mut self,
        catalogue: &mut Catalogue,
        member_id: &str,
        isbn: &str,
        today: NaiveDate,
        loan_period_days: u32,
    ) -> Result<Loan> {
        let book = catalogue
            .find_book(isbn)
            .ok_or_else(|| LibrisError::BookNotFound {
                isbn: isbn.to_string(),
            })?;

        if book.copies_available == 0 {
            return Err(LibrisError::NoCopiesAvailable {
                isbn: isbn.to_string(),
            });
        }

        let due = today
            .checked_add_days(Days::new(u64::from(loan_period_days)))
            .ok_or_else(|| {
                LibrisError::InvariantViolation(format!("due date out of range from {}", today))
            })?;

        let loan_id = self.last_loan_id.checked_add(1).ok_or_else(|| {
            LibrisError::InvariantViolation("loan id sequence exhausted".to_string())
        })?;

        catalogue.decrement_availability(isbn)?;

        let loan = Loan {
            loan_id,
            member_id: member_id.to_string(),
            isbn: isbn.to_string(),
            issue_date: format_date(today),
            due_date: format_date(due),
            return_date: None,
        };

        self.last_loan_id = loan_id;
        self.loans.push(loan.clone());

        Ok(loan)
    }

    /// Close the first outstanding loan of `isbn` held by `member_id`
    ///
    /// Fails with `LoanNotFound` both when no such loan was ever issued and
    /// when every matching loan is already returned.
    pub fn return_loan(
        &mut self,
        catalogue: &mut Catalogue,
        member_id: &str,
        isbn: &str,
        today: NaiveDate,
    ) -> Result<Loan> {
        let index = self
            .loans
            .iter()
            .position(|loan| loan.matches_outstanding(member_id, isbn))
            .ok_or_else(|| LibrisError::LoanNotFound {
                member_id: member_id.to_string(),
                isbn: isbn.to_string(),
            })?;

        match catalogue.increment_availability(isbn) {
            Ok(_) => {}
            Err(LibrisError::NotFound(_)) => {
                tracing::warn!(isbn, "Returned a loan for a book missing from the catalogue");
            }
            Err(e) => return Err(e),
        }

        let loan = &mut self.loans[index];
        loan.return_date = Some(format_date(today));

        Ok(loan.clone())
    }

    /// Every loan held (now or before) by a member, in issue order
    pub fn for_member<'a>(&'a self, member_id: &'a str) -> impl Iterator<Item = &'a Loan> + 'a {
        self.loans.iter().filter(move |loan| loan.member_id == member_id)
    }

    pub fn loans(&self) -> &[Loan] {
        &self.loans
    }

    pub fn into_loans(self) -> Vec<Loan> {
        self.loans
    }

    pub fn last_loan_id(&self) -> u64 {
        self.last_loan_id
    }
}

// =============================================================================
// LoanEngine
// =============================================================================

/// Runs loan operations against the store
///
/// Each operation loads its own working copy and either commits every
/// change it made or none of them.
pub struct LoanEngine<'a> {
    store: &'a RecordStore,
    clock: &'a dyn Clock,
    loan_period_days: u32,
}

impl<'a> LoanEngine<'a> {
    pub fn new(store: &'a RecordStore, clock: &'a dyn Clock, loan_period_days: u32) -> Self {
        Self {
            store,
            clock,
            loan_period_days,
        }
    }

    /// Issue a book
    ///
    /// Commits loans, books and the loan sequence together.
    pub fn issue(&self, member_id: &str, isbn: &str) -> Result<Loan> {
        let mut catalogue = self.load_catalogue()?;
        let mut ledger = self.load_ledger()?;

        let loan = ledger.issue(
            &mut catalogue,
            member_id,
            isbn,
            self.clock.today(),
            self.loan_period_days,
        )?;

        self.store.commit(
            CommitBatch::new()
                .dataset(Dataset::Loans, &Loan::FIELDS, &ledger.to_records())
                .dataset(Dataset::Books, &Book::FIELDS, &catalogue.to_records())
                .counter(LOAN_SEQUENCE_FILE, ledger.last_loan_id()),
        )?;

        tracing::info!(
            loan_id = loan.loan_id,
            member_id,
            isbn,
            due = %loan.due_date,
            "Issued loan"
        );
        Ok(loan)
    }

    /// Return a book
    ///
    /// Commits loans and books together.
    pub fn return_loan(&self, member_id: &str, isbn: &str) -> Result<Loan> {
        let mut ledger = self.load_ledger()?;
        let mut catalogue = self.load_catalogue()?;

        let loan = ledger.return_loan(&mut catalogue, member_id, isbn, self.clock.today())?;

        self.store.commit(
            CommitBatch::new()
                .dataset(Dataset::Loans, &Loan::FIELDS, &ledger.to_records())
                .dataset(Dataset::Books, &Book::FIELDS, &catalogue.to_records()),
        )?;

        tracing::info!(loan_id = loan.loan_id, member_id, isbn, "Returned loan");
        Ok(loan)
    }

    /// Every loan a member has held, in issue order
    pub fn loans_for_member(&self, member_id: &str) -> Result<Vec<Loan>> {
        let ledger = self.load_ledger()?;
        Ok(ledger.for_member(member_id).cloned().collect())
    }

    /// Current loan ledger
    pub fn load_ledger(&self) -> Result<LoanLedger> {
        LoanLedger::from_records(
            &self.store.load(Dataset::Loans)?,
            self.store.load_counter(LOAN_SEQUENCE_FILE)?,
        )
    }

    fn load_catalogue(&self) -> Result<Catalogue> {
        Catalogue::from_records(&self.store.load(Dataset::Books)?)
    }
}
