//! Employee model and related types.
//!
//! An [`Employee`] carries the identity and designations payroll needs:
//! division (for variable pay), weekly-off day (for day accounting),
//! statutory registration numbers and bank details (for the registers),
//! and an append-only [`EmploymentPeriod`] history with exactly one open
//! period for the current employment.

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Day of the week for weekly-off designations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayOfWeek {
    /// Monday.
    Monday,
    /// Tuesday.
    Tuesday,
    /// Wednesday.
    Wednesday,
    /// Thursday.
    Thursday,
    /// Friday.
    Friday,
    /// Saturday.
    Saturday,
    /// Sunday.
    Sunday,
}

impl DayOfWeek {
    /// The matching chrono weekday for calendar arithmetic.
    pub fn to_weekday(self) -> Weekday {
        match self {
            DayOfWeek::Monday => Weekday::Mon,
            DayOfWeek::Tuesday => Weekday::Tue,
            DayOfWeek::Wednesday => Weekday::Wed,
            DayOfWeek::Thursday => Weekday::Thu,
            DayOfWeek::Friday => Weekday::Fri,
            DayOfWeek::Saturday => Weekday::Sat,
            DayOfWeek::Sunday => Weekday::Sun,
        }
    }
}

/// One employment stint at a company.
///
/// `end_date` of `None` marks the current employment. Transfers append a
/// new period and close the previous one; nothing is renamed or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmploymentPeriod {
    /// The employing company.
    pub company: String,
    /// First day of the stint.
    pub start_date: NaiveDate,
    /// Last day of the stint; `None` while the employment is current.
    pub end_date: Option<NaiveDate>,
}

impl EmploymentPeriod {
    /// Whether this is the current (open-ended) employment.
    pub fn is_current(&self) -> bool {
        self.end_date.is_none()
    }
}

/// Bank account details for the bank advice register.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankAccount {
    /// The employee's bank.
    pub bank_name: String,
    /// Branch IFSC code.
    pub ifsc_code: String,
    /// Account number.
    pub account_number: String,
}

/// An employee subject to monthly payroll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Division the employee belongs to; required for variable pay.
    #[serde(default)]
    pub division: Option<String>,
    /// Designated weekly-off day, if any.
    #[serde(default)]
    pub weekly_off: Option<DayOfWeek>,
    /// Date the employee joined; attendance before this date is invalid.
    pub date_of_joining: NaiveDate,
    /// Date of birth, shown on statutory registers.
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    /// ESIC registration number, shown on the ESI register.
    #[serde(default)]
    pub esic_number: Option<String>,
    /// PF account number, shown on the PF register.
    #[serde(default)]
    pub pf_number: Option<String>,
    /// Universal Account Number, shown on the PF register.
    #[serde(default)]
    pub uan_number: Option<String>,
    /// Bank details for the bank advice register.
    #[serde(default)]
    pub bank_account: Option<BankAccount>,
    /// Employment stints in chronological order, most recent last.
    #[serde(default)]
    pub employment_history: Vec<EmploymentPeriod>,
}

impl Employee {
    /// The current employment period, if the history has one.
    pub fn current_employment(&self) -> Option<&EmploymentPeriod> {
        self.employment_history.iter().find(|p| p.is_current())
    }

    /// Validates the employment history invariants.
    ///
    /// The history must be in chronological order, closed periods must not
    /// overlap, at most one period may be open, and only the last period
    /// may be the open one.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidEmployee`] describing the violation.
    pub fn validate_employment_history(&self) -> EngineResult<()> {
        let open_count = self
            .employment_history
            .iter()
            .filter(|p| p.is_current())
            .count();
        if open_count > 1 {
            return Err(EngineError::InvalidEmployee {
                field: "employment_history".to_string(),
                message: "more than one open employment period".to_string(),
            });
        }

        for pair in self.employment_history.windows(2) {
            match pair[0].end_date {
                None => {
                    return Err(EngineError::InvalidEmployee {
                        field: "employment_history".to_string(),
                        message: "open employment period is not the most recent".to_string(),
                    });
                }
                Some(end) => {
                    if pair[1].start_date <= end {
                        return Err(EngineError::InvalidEmployee {
                            field: "employment_history".to_string(),
                            message: format!(
                                "periods starting {} and {} overlap",
                                pair[0].start_date, pair[1].start_date
                            ),
                        });
                    }
                }
            }
        }

        for period in &self.employment_history {
            if let Some(end) = period.end_date {
                if end < period.start_date {
                    return Err(EngineError::InvalidEmployee {
                        field: "employment_history".to_string(),
                        message: format!(
                            "period at {} ends before it starts",
                            period.start_date
                        ),
                    });
                }
            }
        }

        Ok(())
    }
}
