//! Bulk payroll generation and bulk attendance marking.
//!
//! Both drivers share the same failure posture: one employee's problem is
//! recorded and the run continues. A batch never aborts part-way.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calculation::assembler::assemble_payroll;
use crate::calculation::day_accounting::WeeklyOffPolicy;
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::models::{
    AssignmentHistory, AttendanceRecord, AttendanceSheet, AttendanceStatus, Employee,
    PayrollMonth, PayrollRecord, SlipRegister,
};

/// One employee's inputs for a batch payroll run.
#[derive(Debug, Clone)]
pub struct PayrollInput {
    /// The employee being paid.
    pub employee: Employee,
    /// The employee's assignment history.
    pub assignments: AssignmentHistory,
    /// The employee's attendance sheet.
    pub attendance: AttendanceSheet,
}

/// One employee's recorded failure in a bulk run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeFailure {
    /// The employee the failure belongs to.
    pub employee_id: String,
    /// Human-readable reason.
    pub reason: String,
}

/// The aggregate outcome of a batch payroll run.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    /// Successfully computed and registered records, in input order.
    pub records: Vec<PayrollRecord>,
    /// Number of employees whose slip was registered.
    pub success_count: usize,
    /// Number of employees that failed.
    pub failed_count: usize,
    /// Per-employee failure reasons, in input order.
    pub error_messages: Vec<EmployeeFailure>,
}

/// Computes and registers payroll for many employees in one run.
///
/// An employee whose period already has a submitted slip is rejected
/// through the register before any computation. Every other failure
/// (missing assignment, unassigned variable pay, mismatched inputs) is
/// recorded against that employee and the run moves on. Results follow
/// input order.
pub fn run_payroll_batch(
    inputs: &[PayrollInput],
    period: PayrollMonth,
    policy: WeeklyOffPolicy,
    config: &EngineConfig,
    register: &mut SlipRegister,
) -> BatchOutcome {
    let mut records = Vec::new();
    let mut error_messages = Vec::new();

    for input in inputs {
        let employee_id = input.employee.id.clone();

        if register.submitted_for(&employee_id, period).is_some() {
            error_messages.push(EmployeeFailure {
                employee_id: employee_id.clone(),
                reason: EngineError::DuplicateSlip {
                    employee_id,
                    period: period.identifier(),
                }
                .to_string(),
            });
            continue;
        }

        let outcome = assemble_payroll(
            &input.employee,
            &input.assignments,
            &input.attendance,
            period,
            policy,
            config,
        )
        .and_then(|record| register.submit(record.clone()).map(|_| record));

        match outcome {
            Ok(record) => records.push(record),
            Err(err) => error_messages.push(EmployeeFailure {
                employee_id,
                reason: err.to_string(),
            }),
        }
    }

    BatchOutcome {
        success_count: records.len(),
        failed_count: error_messages.len(),
        records,
        error_messages,
    }
}

/// The aggregate outcome of a bulk attendance marking run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkOutcome {
    /// Records written.
    pub created: u32,
    /// Employees skipped because the date was already marked.
    pub skipped: u32,
    /// Employees considered.
    pub total: u32,
    /// Per-employee rejection reasons (future date, before joining).
    pub errors: Vec<EmployeeFailure>,
}

/// Marks one status for many employees on one date.
///
/// An employee already marked on the date is skipped, never an error;
/// rewriting an existing day is a correction workflow, not a bulk one.
/// Dates in the future (except OnLeave) or before an employee's joining
/// are rejected per employee.
pub fn mark_attendance_bulk(
    roster: Vec<(&Employee, &mut AttendanceSheet)>,
    date: NaiveDate,
    status: AttendanceStatus,
    today: NaiveDate,
) -> MarkOutcome {
    let total = roster.len() as u32;
    let mut created = 0;
    let mut skipped = 0;
    let mut errors = Vec::new();

    for (employee, sheet) in roster {
        if sheet.has_record_on(date) {
            skipped += 1;
            continue;
        }

        let record = AttendanceRecord {
            employee_id: employee.id.clone(),
            date,
            status,
        };
        match sheet.mark(record, employee.date_of_joining, today) {
            Ok(()) => created += 1,
            Err(err) => errors.push(EmployeeFailure {
                employee_id: employee.id.clone(),
                reason: err.to_string(),
            }),
        }
    }

    MarkOutcome {
        created,
        skipped,
        total,
        errors,
    }
}
