//! Calendar clock
//!
//! Every date the library writes comes from a [`Clock`], so tests can pin
//! or advance "today".

use chrono::{Days, Local, NaiveDate};
use parking_lot::Mutex;

/// Persisted date format
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Source of the current calendar date
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// The local system date
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A date that only changes when told to
#[derive(Debug)]
pub struct FixedClock {
    today: Mutex<NaiveDate>,
}

impl FixedClock {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today: Mutex::new(today),
        }
    }

    pub fn set(&self, today: NaiveDate) {
        *self.today.lock() = today;
    }

    pub fn advance_days(&self, days: u64) {
        let mut today = self.today.lock();
        if let Some(next) = today.checked_add_days(Days::new(days)) {
            *today = next;
        }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        *self.today.lock()
    }
}

/// Render a date as `YYYY-MM-DD`
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, DATE_FORMAT).ok()
}
