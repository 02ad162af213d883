//! Payroll period model.
//!
//! This module defines [`PayrollMonth`], the calendar month a salary slip
//! is computed for, together with its host-convention string identifier
//! ("YYYY - MonthName") used by variable-pay lookups and slip registers.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Month names as used in period identifiers and month-amount tables.
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// A payroll period: one calendar month for one run of the payroll.
///
/// Construct with [`PayrollMonth::new`] so the month number and year range
/// are checked once; the date helpers rely on that check.
///
/// # Example
///
/// ```
/// use payroll_engine::models::PayrollMonth;
///
/// let period = PayrollMonth::new(2024, 2).unwrap();
/// assert_eq!(period.days_in_month(), 29);
/// assert_eq!(period.identifier(), "2024 - February");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PayrollMonth {
    /// The calendar year.
    pub year: i32,
    /// The calendar month, 1 (January) through 12 (December).
    pub month: u32,
}

impl PayrollMonth {
    /// Creates a payroll month, validating the month number and year range.
    pub fn new(year: i32, month: u32) -> EngineResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(EngineError::CalculationError {
                message: format!("month {} is out of range 1-12", month),
            });
        }
        if !(1900..=2100).contains(&year) {
            return Err(EngineError::CalculationError {
                message: format!("year {} is out of the supported range 1900-2100", year),
            });
        }
        Ok(Self { year, month })
    }

    /// The payroll month a date falls in.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// First day of the month.
    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).expect("validated payroll month")
    }

    /// Last day of the month.
    pub fn last_day(&self) -> NaiveDate {
        let next_first = if self.month == 12 {
            NaiveDate::from_ymd_opt(self.year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(self.year, self.month + 1, 1)
        };
        next_first
            .and_then(|d| d.pred_opt())
            .expect("validated payroll month")
    }

    /// Number of calendar days in the month.
    pub fn days_in_month(&self) -> u32 {
        self.last_day().day()
    }

    /// Whether the date falls within this month.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Iterates every calendar day of the month in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        self.first_day()
            .iter_days()
            .take(self.days_in_month() as usize)
    }

    /// English month name, e.g. "February".
    pub fn month_name(&self) -> &'static str {
        MONTH_NAMES[(self.month - 1) as usize]
    }

    /// The host-convention period identifier, e.g. "2024 - February".
    ///
    /// Variable-pay assignments and slip registers are keyed by this string.
    pub fn identifier(&self) -> String {
        format!("{} - {}", self.year, self.month_name())
    }

    /// Parses a period identifier back into a payroll month.
    ///
    /// Month names are matched case-insensitively, so "2024 - february"
    /// parses the same as "2024 - February".
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::CalculationError`] when the string does not
    /// follow the "YYYY - MonthName" convention.
    pub fn from_identifier(identifier: &str) -> EngineResult<Self> {
        let invalid = || EngineError::CalculationError {
            message: format!("invalid period identifier '{}'", identifier),
        };

        let (year_part, month_part) = identifier.split_once(" - ").ok_or_else(invalid)?;
        let year: i32 = year_part.trim().parse().map_err(|_| invalid())?;
        let month = MONTH_NAMES
            .iter()
            .position(|name| name.eq_ignore_ascii_case(month_part.trim()))
            .ok_or_else(invalid)?;

        Self::new(year, (month + 1) as u32)
    }
}
