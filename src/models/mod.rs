//! Core data models for the payroll computation engine.
//!
//! This module contains all the domain models used throughout the engine.

mod assignment;
mod attendance;
mod component;
mod employee;
mod payroll_record;
mod period;
mod register;

pub use assignment::{AssignmentHistory, CompensationAssignment, ComponentLine};
pub use attendance::{AttendanceRecord, AttendanceSheet, AttendanceStatus};
pub use component::{
    ComponentCatalog, ComponentKind, ComponentSide, MonthlyAmounts, SalaryComponent,
};
pub use employee::{BankAccount, DayOfWeek, Employee, EmploymentPeriod};
pub use payroll_record::{
    AuditStep, AuditTrace, AuditWarning, DayTally, PayrollRecord, SlipLine, SlipTotals,
};
pub use period::{PayrollMonth, MONTH_NAMES};
pub use register::{RegisteredSlip, SlipRegister, SlipStatus};
