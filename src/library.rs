//! Library Module
//!
//! The facade every caller (CLI, tests) goes through.
//!
//! ## Responsibilities
//! - Open the data directory and recover interrupted commits
//! - Route catalogue, member and loan operations
//! - Serialize mutating operations within this process
//! - Supply "today" from the configured clock

use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::catalogue::Catalogue;
use crate::clock::{format_date, Clock, SystemClock};
use crate::config::Config;
use crate::error::{LibrisError, Result};
use crate::loans::{LoanEngine, LoanLedger};
use crate::members::MemberDirectory;
use crate::model::{Book, Loan, Member, NewMember, Role};
use crate::reporting::OverdueReport;
use crate::storage::{Dataset, RecordStore};

/// A library rooted at one data directory
///
/// ## Concurrency Model: one session, one writer
///
/// - Every operation re-reads the datasets it needs; nothing is cached
///   between operations
/// - Mutating operations hold `write_lock` from load to commit, so two
///   threads sharing a `Library` cannot interleave
/// - Another process writing the same directory is NOT excluded: two
///   concurrent issues can both see the last copy and both take it
pub struct Library {
    config: Config,
    store: RecordStore,
    clock: Arc<dyn Clock>,

    /// Serializes load → validate → commit sequences
    write_lock: Mutex<()>,
}

impl Library {
    /// Open or create a library with the given config and the system clock
    pub fn open(config: Config) -> Result<Self> {
        Self::open_with_clock(config, Arc::new(SystemClock))
    }

    /// Open or create a library whose dates come from `clock`
    pub fn open_with_clock(config: Config, clock: Arc<dyn Clock>) -> Result<Self> {
        if config.loan_period_days == 0 {
            return Err(LibrisError::Config(
                "loan period must be at least one day".to_string(),
            ));
        }
        if config.hash_iterations == 0 {
            return Err(LibrisError::Config(
                "hash iterations must be at least one".to_string(),
            ));
        }

        let store = RecordStore::open(&config.data_dir, config.sync_strategy)?;
        tracing::debug!(data_dir = %config.data_dir.display(), "Library opened");

        Ok(Self {
            config,
            store,
            clock,
            write_lock: Mutex::new(()),
        })
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified data directory
    pub fn open_path(path: &Path) -> Result<Self> {
        Self::open(Config::builder().data_dir(path).build())
    }

    // =========================================================================
    // Catalogue
    // =========================================================================

    /// Add a title to the catalogue
    pub fn add_book(
        &self,
        isbn: &str,
        title: &str,
        author: &str,
        total_copies: u32,
    ) -> Result<Book> {
        let _write_guard = self.write_lock.lock();

        let mut catalogue = self.catalogue()?;
        let book = catalogue
            .add_book(isbn, title, author, total_copies)
            .map_err(|e| reject("add_book", e))?
            .clone();

        self.store
            .save(Dataset::Books, &Book::FIELDS, &catalogue.to_records())?;

        tracing::info!(isbn, copies = total_copies, "Added book");
        Ok(book)
    }

    pub fn find_book(&self, isbn: &str) -> Result<Option<Book>> {
        Ok(self.catalogue()?.find_book(isbn).cloned())
    }

    /// Books whose title or author contains `keyword`, ignoring case
    pub fn search_catalogue(&self, keyword: &str) -> Result<Vec<Book>> {
        Ok(self.catalogue()?.search(keyword).into_iter().cloned().collect())
    }

    pub fn books(&self) -> Result<Vec<Book>> {
        Ok(self.catalogue()?.books().to_vec())
    }

    // =========================================================================
    // Members
    // =========================================================================

    /// Register a member; join date is today
    pub fn register_member(&self, new: NewMember) -> Result<Member> {
        let _write_guard = self.write_lock.lock();
        self.register_locked(new)
    }

    /// Register the first librarian
    ///
    /// Allowed while no member holds the librarian role, which covers an
    /// empty directory and members files written before roles existed.
    /// Fails with `Unauthorized` once a librarian exists.
    pub fn bootstrap_librarian(&self, new: NewMember) -> Result<Member> {
        let _write_guard = self.write_lock.lock();

        if self.directory()?.has_librarian() {
            return Err(LibrisError::Unauthorized(
                "library already has a librarian; ask them to register you".to_string(),
            ));
        }

        self.register_locked(new.role(Role::Librarian))
    }

    pub fn find_member(&self, member_id: &str) -> Result<Option<Member>> {
        Ok(self.directory()?.find_member(member_id).cloned())
    }

    /// Check credentials
    ///
    /// Returns `Ok(None)` for an unknown id and for a wrong secret alike.
    pub fn verify_member(&self, member_id: &str, secret: &str) -> Result<Option<Member>> {
        let member = self
            .directory()?
            .verify(member_id, secret, self.config.hash_iterations)
            .cloned();
        if member.is_none() {
            tracing::warn!("Rejected login");
        }
        Ok(member)
    }

    // =========================================================================
    // Loans
    // =========================================================================

    /// Issue a book to a registered member
    pub fn issue(&self, member_id: &str, isbn: &str) -> Result<Loan> {
        let _write_guard = self.write_lock.lock();

        if self.directory()?.find_member(member_id).is_none() {
            return Err(reject(
                "issue",
                LibrisError::NotFound(format!("member {}", member_id)),
            ));
        }

        self.loan_engine()
            .issue(member_id, isbn)
            .map_err(|e| reject("issue", e))
    }

    /// Return the member's first outstanding loan of `isbn`
    pub fn return_loan(&self, member_id: &str, isbn: &str) -> Result<Loan> {
        let _write_guard = self.write_lock.lock();

        self.loan_engine()
            .return_loan(member_id, isbn)
            .map_err(|e| reject("return", e))
    }

    /// Every loan a member has held, in issue order
    pub fn loans_for_member(&self, member_id: &str) -> Result<Vec<Loan>> {
        self.loan_engine().loans_for_member(member_id)
    }

    pub fn loans(&self) -> Result<Vec<Loan>> {
        Ok(self.loan_engine().load_ledger()?.into_loans())
    }

    // =========================================================================
    // Reporting
    // =========================================================================

    /// Outstanding loans due strictly before `as_of` (`YYYY-MM-DD`)
    pub fn overdue_report(&self, as_of: &str) -> Result<OverdueReport> {
        let ledger: LoanLedger = self.loan_engine().load_ledger()?;
        Ok(OverdueReport::new(ledger.into_loans(), as_of))
    }

    /// Overdue report as of today
    pub fn overdue_today(&self) -> Result<OverdueReport> {
        self.overdue_report(&self.today())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Today as `YYYY-MM-DD`
    pub fn today(&self) -> String {
        format_date(self.clock.today())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn data_dir(&self) -> &Path {
        self.store.data_dir()
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn catalogue(&self) -> Result<Catalogue> {
        Catalogue::from_records(&self.store.load(Dataset::Books)?)
    }

    fn directory(&self) -> Result<MemberDirectory> {
        MemberDirectory::from_records(&self.store.load(Dataset::Members)?)
    }

    fn loan_engine(&self) -> LoanEngine<'_> {
        LoanEngine::new(&self.store, self.clock.as_ref(), self.config.loan_period_days)
    }

    /// Caller must hold `write_lock`
    fn register_locked(&self, new: NewMember) -> Result<Member> {
        let mut directory = self.directory()?;
        let member = directory
            .register(new, &self.today(), self.config.hash_iterations)
            .map_err(|e| reject("register", e))?
            .clone();

        self.store
            .save(Dataset::Members, &Member::FIELDS, &directory.to_records())?;

        tracing::info!(member_id = %member.member_id, role = %member.role, "Registered member");
        Ok(member)
    }
}

/// Log a rejected operation and pass the error through
fn reject(operation: &str, err: LibrisError) -> LibrisError {
    tracing::warn!(operation, "Rejected: {}", err);
    err
}
