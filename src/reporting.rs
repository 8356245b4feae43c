//! Reporting
//!
//! Overdue-loan views. Pure reads.
//!
//! A loan is overdue on `as_of` when it is outstanding and its due date
//! sorts strictly before `as_of` as text. Dates are zero-padded
//! `YYYY-MM-DD`, so text order is calendar order; the comparison is done
//! on the stored strings, not on parsed dates.

use std::slice;

use crate::model::Loan;

/// Whether `loan` is overdue on `as_of`
pub fn is_overdue(loan: &Loan, as_of: &str) -> bool {
    loan.is_outstanding() && loan.due_date.as_str() < as_of
}

/// Overdue loans as of a date
///
/// Holds the loans it was built from and filters lazily; iterate it as
/// many times as needed.
#[derive(Debug, Clone)]
pub struct OverdueReport {
    as_of: String,
    loans: Vec<Loan>,
}

impl OverdueReport {
    pub fn new(loans: Vec<Loan>, as_of: impl Into<String>) -> Self {
        Self {
            as_of: as_of.into(),
            loans,
        }
    }

    /// Iterate the overdue loans in ledger order
    pub fn iter(&self) -> OverdueIter<'_> {
        OverdueIter {
            loans: self.loans.iter(),
            as_of: &self.as_of,
        }
    }

    /// The date the report was taken on
    pub fn as_of(&self) -> &str {
        &self.as_of
    }

    pub fn count(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

impl<'a> IntoIterator for &'a OverdueReport {
    type Item = &'a Loan;
    type IntoIter = OverdueIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the overdue loans of a report
pub struct OverdueIter<'a> {
    loans: slice::Iter<'a, Loan>,
    as_of: &'a str,
}

impl<'a> Iterator for OverdueIter<'a> {
    type Item = &'a Loan;

    fn next(&mut self) -> Option<Self::Item> {
        let as_of = self.as_of;
        self.loans.by_ref().find(|loan| is_overdue(loan, as_of))
    }
}
