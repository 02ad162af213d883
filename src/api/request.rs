//! Request types for the payroll engine API.
//!
//! This module defines the JSON request structures for the `/calculate`
//! and `/payslips` endpoints. Attendance and assignment entries omit the
//! employee id on the wire; the handlers stamp it from the enclosing
//! employee when converting to models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::WeeklyOffPolicy;
use crate::models::{
    AttendanceRecord, AttendanceStatus, CompensationAssignment, ComponentKind, ComponentLine,
    DayOfWeek, Employee,
};

/// Request body for the `/calculate` endpoint.
///
/// Contains all information needed to compute one employee's salary slip
/// for a payroll month.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationRequest {
    /// The employee information.
    pub employee: EmployeeRequest,
    /// The payroll month for the calculation.
    pub period: PeriodRequest,
    /// How weekly offs enter the working-day count.
    #[serde(default)]
    pub weekly_off_policy: WeeklyOffPolicy,
    /// The employee's attendance marks for the month.
    #[serde(default)]
    pub attendance: Vec<AttendanceRecordRequest>,
    /// The employee's compensation assignments.
    pub assignments: Vec<AssignmentRequest>,
}

/// Request body for the `/payslips` endpoint.
///
/// Generates slips for a roster of employees in one period and submits
/// them to the engine's slip register.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRequest {
    /// The payroll month for the batch.
    pub period: PeriodRequest,
    /// How weekly offs enter the working-day count.
    #[serde(default)]
    pub weekly_off_policy: WeeklyOffPolicy,
    /// The employees to generate slips for, in order.
    pub employees: Vec<BatchEmployeeRequest>,
}

/// One employee's inputs within a batch request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchEmployeeRequest {
    /// The employee information.
    pub employee: EmployeeRequest,
    /// The employee's attendance marks for the month.
    #[serde(default)]
    pub attendance: Vec<AttendanceRecordRequest>,
    /// The employee's compensation assignments.
    pub assignments: Vec<AssignmentRequest>,
}

/// Employee information in a calculation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeRequest {
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
    /// Date the employee joined.
    pub date_of_joining: NaiveDate,
}

/// Payroll month in a calculation request.
///
/// Validated into a [`crate::models::PayrollMonth`] by the handler, so an
/// out-of-range month is reported as a validation error rather than a
/// deserialization failure.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PeriodRequest {
    /// The calendar year.
    pub year: i32,
    /// The calendar month, 1 through 12.
    pub month: u32,
}

/// One daily attendance mark in a calculation request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AttendanceRecordRequest {
    /// The calendar date.
    pub date: NaiveDate,
    /// The marked status.
    pub status: AttendanceStatus,
}

/// One compensation assignment in a calculation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentRequest {
    /// First date the assignment applies (inclusive).
    pub effective_from: NaiveDate,
    /// Last date the assignment applies (inclusive); omit for open-ended.
    #[serde(default)]
    pub effective_to: Option<NaiveDate>,
    /// Earning lines in slip order.
    #[serde(default)]
    pub earnings: Vec<ComponentLineRequest>,
    /// Deduction lines in slip order.
    #[serde(default)]
    pub deductions: Vec<ComponentLineRequest>,
}

/// One earning or deduction line in an assignment request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentLineRequest {
    /// The catalog component this line instantiates.
    pub component_name: String,
    /// Short code shown on slips and registers.
    pub abbreviation: String,
    /// Semantic tag copied from the catalog entry.
    #[serde(default)]
    pub kind: ComponentKind,
    /// The assigned amount.
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

impl From<EmployeeRequest> for Employee {
    fn from(req: EmployeeRequest) -> Self {
        Employee {
            id: req.id,
            name: req.name,
            division: req.division,
            weekly_off: req.weekly_off,
            date_of_joining: req.date_of_joining,
            date_of_birth: None,
            esic_number: None,
            pf_number: None,
            uan_number: None,
            bank_account: None,
            employment_history: vec![],
        }
    }
}

impl From<ComponentLineRequest> for ComponentLine {
    fn from(req: ComponentLineRequest) -> Self {
        ComponentLine {
            component_name: req.component_name,
            abbreviation: req.abbreviation,
            kind: req.kind,
            base_amount: req.base_amount,
            depends_on_attendance: req.depends_on_attendance,
            is_month_varying: req.is_month_varying,
            is_employer_side: req.is_employer_side,
        }
    }
}

impl AttendanceRecordRequest {
    /// Stamps the record with the employee it belongs to.
    pub fn into_record(self, employee_id: &str) -> AttendanceRecord {
        AttendanceRecord {
            employee_id: employee_id.to_string(),
            date: self.date,
            status: self.status,
        }
    }
}

impl AssignmentRequest {
    /// Stamps the assignment with the employee it belongs to.
    pub fn into_assignment(self, employee_id: &str) -> CompensationAssignment {
        CompensationAssignment {
            employee_id: employee_id.to_string(),
            effective_from: self.effective_from,
            effective_to: self.effective_to,
            earnings: self.earnings.into_iter().map(Into::into).collect(),
            deductions: self.deductions.into_iter().map(Into::into).collect(),
        }
    }
}
