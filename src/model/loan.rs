use crate::error::Result;
use crate::storage::Record;

use super::parse_number;

/// Where a loan is in its lifecycle
///
/// `Outstanding → Returned` is the only transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoanState {
    Outstanding,
    Returned,
}

/// One loan of one copy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loan {
    pub loan_id: u64,
    pub member_id: String,
    pub isbn: String,

    /// `YYYY-MM-DD`
    pub issue_date: String,

    /// `YYYY-MM-DD`, issue date plus the loan period
    pub due_date: String,

    /// `None` while outstanding
    pub return_date: Option<String>,
}

impl Loan {
    /// Persisted field order
    pub const FIELDS: [&'static str; 6] =
        ["LoanID", "MemberID", "ISBN", "IssueDate", "DueDate", "ReturnDate"];

    pub fn from_record(record: &Record) -> Result<Self> {
        let return_date = record.require("ReturnDate")?;

        Ok(Self {
            loan_id: parse_number("LoanID", record.require("LoanID")?)?,
            member_id: record.require("MemberID")?.to_string(),
            isbn: record.require("ISBN")?.to_string(),
            issue_date: record.require("IssueDate")?.to_string(),
            due_date: record.require("DueDate")?.to_string(),
            return_date: (!return_date.is_empty()).then(|| return_date.to_string()),
        })
    }

    pub fn to_record(&self) -> Record {
        Record::new()
            .with("LoanID", self.loan_id.to_string())
            .with("MemberID", self.member_id.as_str())
            .with("ISBN", self.isbn.as_str())
            .with("IssueDate", self.issue_date.as_str())
            .with("DueDate", self.due_date.as_str())
            .with("ReturnDate", self.return_date.as_deref().unwrap_or(""))
    }

    pub fn state(&self) -> LoanState {
        match self.return_date {
            Some(_) => LoanState::Returned,
            None => LoanState::Outstanding,
        }
    }

    pub fn is_outstanding(&self) -> bool {
        self.state() == LoanState::Outstanding
    }

    /// Whether this loan is the one a return for `member_id`/`isbn` closes
    pub fn matches_outstanding(&self, member_id: &str, isbn: &str) -> bool {
        self.is_outstanding() && self.member_id == member_id && self.isbn == isbn
    }
}
