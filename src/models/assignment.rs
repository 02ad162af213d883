//! Compensation assignment models.
//!
//! A [`CompensationAssignment`] is the set of earning and deduction line
//! templates effective for an employee over a date range. The
//! [`AssignmentHistory`] owns all of an employee's assignments, enforces
//! the non-overlap invariant at construction, and answers "which
//! assignment is active on this date" for the component resolver.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::ComponentKind;

/// One earning or deduction row of an assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentLine {
    /// The catalog component this line instantiates.
    pub component_name: String,
    /// Short code shown on slips and registers.
    pub abbreviation: String,
    /// Semantic tag copied from the catalog entry.
    #[serde(default)]
    pub kind: ComponentKind,
    /// The assigned amount. For month-varying components this is only a
    /// participation marker; the payable amount comes from the component's
    /// month table.
    pub base_amount: Decimal,
    /// Whether the amount prorates by payment days.
    #[serde(default)]
    pub depends_on_attendance: bool,
    /// Whether the amount is looked up from the component's month table.
    #[serde(default)]
    pub is_month_varying: bool,
    /// Employer-side contributions are excluded from net pay.
    #[serde(default)]
    pub is_employer_side: bool,
}

/// An employee's compensation structure over a date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompensationAssignment {
    /// The employee the assignment belongs to.
    pub employee_id: String,
    /// First date the assignment applies (inclusive).
    pub effective_from: NaiveDate,
    /// Last date the assignment applies (inclusive); `None` = open-ended.
    pub effective_to: Option<NaiveDate>,
    /// Earning lines in slip order.
    pub earnings: Vec<ComponentLine>,
    /// Deduction lines in slip order.
    pub deductions: Vec<ComponentLine>,
}

impl CompensationAssignment {
    /// Whether the assignment covers the date.
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        date >= self.effective_from && self.effective_to.is_none_or(|to| date <= to)
    }

    fn validate(&self) -> EngineResult<()> {
        if let Some(to) = self.effective_to {
            if to < self.effective_from {
                return Err(EngineError::InvalidAssignment {
                    employee_id: self.employee_id.clone(),
                    message: format!(
                        "effective_to {} is before effective_from {}",
                        to, self.effective_from
                    ),
                });
            }
        }
        for line in self.earnings.iter().chain(self.deductions.iter()) {
            if line.base_amount < Decimal::ZERO {
                return Err(EngineError::InvalidAssignment {
                    employee_id: self.employee_id.clone(),
                    message: format!(
                        "component '{}' has a negative base amount",
                        line.component_name
                    ),
                });
            }
        }
        Ok(())
    }
}

/// All assignments for one employee, validated to never overlap.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{AssignmentHistory, CompensationAssignment};
/// use chrono::NaiveDate;
///
/// let history = AssignmentHistory::new(
///     "EMP-0001".to_string(),
///     vec![CompensationAssignment {
///         employee_id: "EMP-0001".to_string(),
///         effective_from: NaiveDate::from_ymd_opt(2023, 4, 1).unwrap(),
///         effective_to: None,
///         earnings: vec![],
///         deductions: vec![],
///     }],
/// )
/// .unwrap();
///
/// let feb = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
/// assert!(history.active_on(feb).is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssignmentHistory {
    employee_id: String,
    assignments: Vec<CompensationAssignment>,
}

impl AssignmentHistory {
    /// Builds a history, enforcing per-assignment validity and the
    /// non-overlap invariant across assignments.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidAssignment`] for a foreign employee
    /// id, an inverted date range, a negative line amount, or two
    /// assignments whose ranges overlap.
    pub fn new(
        employee_id: String,
        mut assignments: Vec<CompensationAssignment>,
    ) -> EngineResult<Self> {
        for assignment in &assignments {
            if assignment.employee_id != employee_id {
                return Err(EngineError::InvalidAssignment {
                    employee_id,
                    message: format!(
                        "assignment effective {} belongs to employee '{}'",
                        assignment.effective_from, assignment.employee_id
                    ),
                });
            }
            assignment.validate()?;
        }

        assignments.sort_by_key(|a| a.effective_from);
        for pair in assignments.windows(2) {
            let overlaps = match pair[0].effective_to {
                // An open-ended assignment covers every later date.
                None => true,
                Some(to) => pair[1].effective_from <= to,
            };
            if overlaps {
                return Err(EngineError::InvalidAssignment {
                    employee_id,
                    message: format!(
                        "assignments effective {} and {} overlap",
                        pair[0].effective_from, pair[1].effective_from
                    ),
                });
            }
        }

        Ok(Self {
            employee_id,
            assignments,
        })
    }

    /// The employee this history belongs to.
    pub fn employee_id(&self) -> &str {
        &self.employee_id
    }

    /// All assignments, sorted by effective_from.
    pub fn assignments(&self) -> &[CompensationAssignment] {
        &self.assignments
    }

    /// The assignment active on the date, most recently started first in
    /// case of ties.
    pub fn active_on(&self, date: NaiveDate) -> Option<&CompensationAssignment> {
        self.assignments
            .iter()
            .filter(|a| a.is_active_on(date))
            .max_by_key(|a| a.effective_from)
    }
}
