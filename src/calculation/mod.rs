//! Calculation logic for the payroll engine.
//!
//! This module contains the payroll computation pipeline: attendance day
//! accounting, salary component resolution against the catalog, statutory
//! deduction calculation (provident fund, ESIC, professional tax),
//! assembly of the final payroll record, and the bulk drivers for batch
//! payroll generation and bulk attendance marking.

mod assembler;
mod batch;
mod component_resolver;
mod day_accounting;
mod statutory;

pub use assembler::assemble_payroll;
pub use batch::{
    BatchOutcome, EmployeeFailure, MarkOutcome, PayrollInput, mark_attendance_bulk,
    run_payroll_batch,
};
pub use component_resolver::{ComponentResolution, resolve_components};
pub use day_accounting::{DayAccountingResult, WeeklyOffPolicy, count_payroll_days};
pub use statutory::{
    DeductionResult, EarningsSummary, calculate_deductions, prorate_by_attendance, round_money,
};
