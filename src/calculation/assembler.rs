//! Payroll assembly.
//!
//! This module orchestrates one employee's monthly payroll: it selects
//! the active compensation assignment, runs day accounting over the
//! attendance sheet, resolves component lines, prorates the earning side,
//! applies the division's variable-pay percentage, computes statutory
//! deductions, and produces the final [`PayrollRecord`] with its audit
//! trace.

use std::time::Instant;

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::calculation::component_resolver::resolve_components;
use crate::calculation::day_accounting::{count_payroll_days, WeeklyOffPolicy};
use crate::calculation::statutory::{
    calculate_deductions, prorate_by_attendance, round_money, EarningsSummary,
};
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AssignmentHistory, AttendanceSheet, AuditStep, AuditTrace, AuditWarning, ComponentKind,
    DayTally, Employee, PayrollMonth, PayrollRecord, SlipLine, SlipTotals,
};

/// The outcome of the variable-pay percentage lookup.
struct VariableOutcome {
    /// Multiplier applied to variable lines, as a 0-1 fraction.
    fraction: Decimal,
    audit_step: AuditStep,
    warning: Option<AuditWarning>,
}

/// Assembles one employee's payroll record for a month.
///
/// The assignment active on the last day of the month supplies the
/// component lines. Attendance-dependent earnings prorate by payment
/// days over working days; variable-kind earnings are further scaled by
/// the division's percentage for the period, and drop off the slip when
/// that scaling lands on zero. Statutory deductions run on the computed
/// earning totals. Net pay is total earnings less employee-side
/// deductions; employer-side contributions are tracked separately.
///
/// A slip is still produced when the attendance sheet has no records for
/// the month: nothing is counted absent, so payment days equal working
/// days, and the audit trace carries a `NO_ATTENDANCE` warning.
///
/// # Errors
///
/// - [`EngineError::AssignmentNotFound`] when no assignment covers the
///   month
/// - [`EngineError::VariablePayNotAssigned`] when the employee's division
///   has no percentage for the period but a variable line is assigned
/// - [`EngineError::InvalidAttendance`] / [`EngineError::InvalidAssignment`]
///   when the sheet or history belongs to a different employee
///
/// # Examples
///
/// ```no_run
/// use payroll_engine::calculation::{assemble_payroll, WeeklyOffPolicy};
/// use payroll_engine::config::ConfigLoader;
/// use payroll_engine::models::{
///     AssignmentHistory, AttendanceSheet, CompensationAssignment, ComponentKind, ComponentLine,
///     DayOfWeek, Employee, PayrollMonth,
/// };
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let loader = ConfigLoader::load("config").unwrap();
/// let employee = Employee {
///     id: "EMP-0001".to_string(),
///     name: "Asha Kulkarni".to_string(),
///     division: None,
///     weekly_off: Some(DayOfWeek::Sunday),
///     date_of_joining: NaiveDate::from_ymd_opt(2021, 8, 16).unwrap(),
///     date_of_birth: None,
///     esic_number: None,
///     pf_number: None,
///     uan_number: None,
///     bank_account: None,
///     employment_history: vec![],
/// };
/// let history = AssignmentHistory::new(
///     "EMP-0001".to_string(),
///     vec![CompensationAssignment {
///         employee_id: "EMP-0001".to_string(),
///         effective_from: NaiveDate::from_ymd_opt(2023, 4, 1).unwrap(),
///         effective_to: None,
///         earnings: vec![ComponentLine {
///             component_name: "Basic".to_string(),
///             abbreviation: "B".to_string(),
///             kind: ComponentKind::Basic,
///             base_amount: Decimal::from_str("10000").unwrap(),
///             depends_on_attendance: true,
///             is_month_varying: false,
///             is_employer_side: false,
///         }],
///         deductions: vec![],
///     }],
/// )
/// .unwrap();
/// let sheet = AttendanceSheet::empty("EMP-0001".to_string());
/// let period = PayrollMonth::new(2024, 2).unwrap();
///
/// let record = assemble_payroll(
///     &employee,
///     &history,
///     &sheet,
///     period,
///     WeeklyOffPolicy::ExcludeWeeklyOffs,
///     loader.config(),
/// )
/// .unwrap();
/// assert_eq!(record.days.working_days, 25);
/// ```
pub fn assemble_payroll(
    employee: &Employee,
    history: &AssignmentHistory,
    sheet: &AttendanceSheet,
    period: PayrollMonth,
    policy: WeeklyOffPolicy,
    config: &EngineConfig,
) -> EngineResult<PayrollRecord> {
    let start_time = Instant::now();

    if sheet.employee_id() != employee.id {
        return Err(EngineError::InvalidAttendance {
            employee_id: employee.id.clone(),
            message: format!(
                "attendance sheet belongs to employee '{}'",
                sheet.employee_id()
            ),
        });
    }
    if history.employee_id() != employee.id {
        return Err(EngineError::InvalidAssignment {
            employee_id: employee.id.clone(),
            message: format!(
                "assignment history belongs to employee '{}'",
                history.employee_id()
            ),
        });
    }

    let reference_date = period.last_day();
    let assignment = history
        .active_on(reference_date)
        .ok_or_else(|| EngineError::AssignmentNotFound {
            employee_id: employee.id.clone(),
            date: reference_date,
        })?;

    let mut all_audit_steps: Vec<AuditStep> = Vec::new();
    let mut all_warnings: Vec<AuditWarning> = Vec::new();
    let mut step_number: u32 = 1;

    if sheet.for_month(period).is_empty() {
        all_warnings.push(AuditWarning {
            code: "NO_ATTENDANCE".to_string(),
            message: format!(
                "No attendance records for {}; payment days assume a full month",
                period.identifier()
            ),
            severity: "medium".to_string(),
        });
    }

    // Step 1: count the month's days from the attendance sheet.
    let day_result = count_payroll_days(sheet, period, employee.weekly_off, policy, step_number);
    let tally = day_result.tally;
    all_audit_steps.push(day_result.audit_step);
    step_number += 1;

    if tally.payment_days == Decimal::ZERO && !sheet.for_month(period).is_empty() {
        all_warnings.push(AuditWarning {
            code: "ZERO_PAYMENT_DAYS".to_string(),
            message: "Absences cover every working day; all prorated amounts are zero".to_string(),
            severity: "high".to_string(),
        });
    }

    // Step 2: resolve the assignment into slip lines for this month.
    let resolution = resolve_components(assignment, config.catalog(), period, step_number);
    all_audit_steps.push(resolution.audit_step);
    step_number += 1;

    // Step 3: look up the variable-pay percentage when a variable line
    // survived resolution.
    let has_variable = resolution
        .earnings
        .iter()
        .any(|line| line.kind == ComponentKind::Variable);
    let variable_fraction = if has_variable {
        let outcome = resolve_variable_fraction(employee, period, config, step_number)?;
        all_audit_steps.push(outcome.audit_step);
        all_warnings.extend(outcome.warning);
        step_number += 1;
        outcome.fraction
    } else {
        Decimal::ZERO
    };

    // Step 4: prorate and scale the earning side.
    let (earnings, earnings_step) =
        compute_earnings(resolution.earnings, &tally, variable_fraction, step_number);
    all_audit_steps.push(earnings_step);
    step_number += 1;

    let summary = EarningsSummary::from_lines(&earnings);

    // Steps 5..: statutory and prorated deductions, one step per line.
    let deduction_result = calculate_deductions(
        &resolution.deductions,
        &summary,
        &tally,
        config.statutory(),
        period,
        step_number,
    );
    all_audit_steps.extend(deduction_result.audit_steps);

    let totals = SlipTotals {
        total_earnings: summary.total_earnings,
        total_basic_da: summary.basic_da,
        total_deductions: deduction_result.total_deductions,
        total_employer_contribution: deduction_result.total_employer_contribution,
        retention_total: deduction_result.retention_total,
        net_pay: summary.total_earnings - deduction_result.total_deductions,
    };

    let duration_us = start_time.elapsed().as_micros() as u64;

    Ok(PayrollRecord {
        slip_id: Uuid::new_v4(),
        timestamp: Utc::now(),
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        employee_id: employee.id.clone(),
        employee_name: employee.name.clone(),
        period,
        days: tally,
        earnings,
        deductions: deduction_result.lines,
        totals,
        audit_trace: AuditTrace {
            steps: all_audit_steps,
            warnings: all_warnings,
            duration_us,
        },
    })
}

/// Resolves the variable-pay fraction for an employee with at least one
/// variable line.
///
/// An employee without a division earns no variable pay; that is a
/// warning, not an error. An employee whose division has no entry for
/// the period is a data gap the operator must fix, so it fails the slip.
fn resolve_variable_fraction(
    employee: &Employee,
    period: PayrollMonth,
    config: &EngineConfig,
    step_number: u32,
) -> EngineResult<VariableOutcome> {
    let (fraction, percentage, warning) = match employee.division.as_deref() {
        None => (
            Decimal::ZERO,
            Decimal::ZERO,
            Some(AuditWarning {
                code: "VARIABLE_WITHOUT_DIVISION".to_string(),
                message: format!(
                    "Employee '{}' has a variable component but no division; variable pay omitted",
                    employee.id
                ),
                severity: "medium".to_string(),
            }),
        ),
        Some(division) => {
            let percentage = config
                .variable_pay()
                .percentage_for(division, period)
                .ok_or_else(|| EngineError::VariablePayNotAssigned {
                    division: division.to_string(),
                    period: period.identifier(),
                })?;
            (percentage / Decimal::ONE_HUNDRED, percentage, None)
        }
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "variable_pay".to_string(),
        rule_name: "Variable Pay Percentage".to_string(),
        input: serde_json::json!({
            "division": employee.division,
            "period": period.identifier()
        }),
        output: serde_json::json!({
            "percentage": percentage.normalize().to_string()
        }),
        reasoning: match employee.division.as_deref() {
            Some(division) => format!(
                "Division {} earns {}% of variable pay for {}",
                division,
                percentage.normalize(),
                period.identifier()
            ),
            None => "No division assigned; variable pay percentage is 0".to_string(),
        },
    };

    Ok(VariableOutcome {
        fraction,
        audit_step,
        warning,
    })
}

/// Prorates attendance-dependent earning lines and scales variable ones.
///
/// Variable lines that scale to zero are dropped; other lines keep their
/// computed amount even when it is zero, so a no-pay month still shows
/// its structure.
fn compute_earnings(
    resolved: Vec<SlipLine>,
    tally: &DayTally,
    variable_fraction: Decimal,
    step_number: u32,
) -> (Vec<SlipLine>, AuditStep) {
    let mut lines = Vec::with_capacity(resolved.len());
    let mut omitted: Vec<String> = Vec::new();

    for mut line in resolved {
        let mut amount = line.base_amount;
        if line.depends_on_attendance {
            amount = prorate_by_attendance(amount, tally.working_days, tally.payment_days);
        }
        if line.kind == ComponentKind::Variable {
            amount = round_money(amount * variable_fraction);
            if amount == Decimal::ZERO {
                omitted.push(line.component_name);
                continue;
            }
        }
        line.amount = amount;
        lines.push(line);
    }

    let audit_step = AuditStep {
        step_number,
        rule_id: "earnings_proration".to_string(),
        rule_name: "Earning Proration".to_string(),
        input: serde_json::json!({
            "working_days": tally.working_days,
            "payment_days": tally.payment_days.normalize().to_string(),
            "variable_fraction": variable_fraction.normalize().to_string()
        }),
        output: serde_json::json!({
            "lines": lines
                .iter()
                .map(|line| serde_json::json!({
                    "component": line.component_name,
                    "amount": line.amount.normalize().to_string()
                }))
                .collect::<Vec<_>>(),
            "omitted": omitted
        }),
        reasoning: format!(
            "Paid {} of {} working days across {} earning lines",
            tally.payment_days.normalize(),
            tally.working_days,
            lines.len()
        ),
    };

    (lines, audit_step)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigLoader;
    use crate::models::{
        AttendanceRecord, AttendanceStatus, CompensationAssignment, ComponentLine, DayOfWeek,
    };
    use chrono::{Datelike, NaiveDate, Weekday};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn load_config() -> EngineConfig {
        ConfigLoader::load("./config")
            .expect("Failed to load config")
            .config()
            .clone()
    }

    fn create_test_employee() -> Employee {
        Employee {
            id: "EMP-0001".to_string(),
            name: "Asha Kulkarni".to_string(),
            division: Some("Stitching".to_string()),
            weekly_off: Some(DayOfWeek::Sunday),
            date_of_joining: date("2021-08-16"),
            date_of_birth: None,
            esic_number: None,
            pf_number: None,
            uan_number: None,
            bank_account: None,
            employment_history: vec![],
        }
    }

    fn earning(name: &str, abbr: &str, kind: ComponentKind, base: &str) -> ComponentLine {
        ComponentLine {
            component_name: name.to_string(),
            abbreviation: abbr.to_string(),
            kind,
            base_amount: dec(base),
            depends_on_attendance: true,
            is_month_varying: false,
            is_employer_side: false,
        }
    }

    fn statutory_line(name: &str, abbr: &str, kind: ComponentKind) -> ComponentLine {
        ComponentLine {
            component_name: name.to_string(),
            abbreviation: abbr.to_string(),
            kind,
            base_amount: Decimal::ONE,
            depends_on_attendance: false,
            is_month_varying: false,
            is_employer_side: kind == ComponentKind::EsicEmployer,
        }
    }

    fn create_test_history() -> AssignmentHistory {
        AssignmentHistory::new(
            "EMP-0001".to_string(),
            vec![CompensationAssignment {
                employee_id: "EMP-0001".to_string(),
                effective_from: date("2023-04-01"),
                effective_to: None,
                earnings: vec![
                    earning("Basic", "B", ComponentKind::Basic, "10000"),
                    earning("Dearness Allowance", "DA", ComponentKind::DearnessAllowance, "2000"),
                    earning("Conveyance", "CA", ComponentKind::Conveyance, "1000"),
                    earning("Variable Salary", "VS", ComponentKind::Variable, "5000"),
                ],
                deductions: vec![
                    statutory_line("Provident Fund", "PF", ComponentKind::ProvidentFund),
                    statutory_line("ESIC", "ESIC", ComponentKind::EsicEmployee),
                    statutory_line("ESIC Employer", "ESIC-ER", ComponentKind::EsicEmployer),
                    statutory_line("Professional Tax", "PT", ComponentKind::ProfessionalTax),
                ],
            }],
        )
        .unwrap()
    }

    fn february() -> PayrollMonth {
        PayrollMonth::new(2024, 2).unwrap()
    }

    /// A sheet marking every non-Sunday day of the month with one status.
    fn sheet_with(status: AttendanceStatus, period: PayrollMonth) -> AttendanceSheet {
        let records = period
            .days()
            .filter(|d| d.weekday() != Weekday::Sun)
            .map(|d| AttendanceRecord {
                employee_id: "EMP-0001".to_string(),
                date: d,
                status,
            })
            .collect();
        AttendanceSheet::new("EMP-0001".to_string(), records).unwrap()
    }

    fn full_month_sheet(period: PayrollMonth) -> AttendanceSheet {
        sheet_with(AttendanceStatus::Present, period)
    }

    /// PA-001: a fully attended February slip end to end
    #[test]
    fn test_full_month_slip() {
        let record = assemble_payroll(
            &create_test_employee(),
            &create_test_history(),
            &full_month_sheet(february()),
            february(),
            WeeklyOffPolicy::ExcludeWeeklyOffs,
            &load_config(),
        )
        .unwrap();

        assert_eq!(record.days.working_days, 25);
        assert_eq!(record.days.payment_days, dec("25"));

        // Basic, DA, Conveyance, Variable Salary, plus the seasonal
        // Attendance Bonus swept in for February.
        let names: Vec<&str> = record
            .earnings
            .iter()
            .map(|l| l.component_name.as_str())
            .collect();
        assert_eq!(
            names,
            vec![
                "Basic",
                "Dearness Allowance",
                "Conveyance",
                "Variable Salary",
                "Attendance Bonus"
            ]
        );

        // Stitching earns 60% of the 5,000 variable base in February.
        let variable = &record.earnings[3];
        assert_eq!(variable.amount, dec("3000.00"));

        // 10,000 + 2,000 + 1,000 + 3,000 + 1,000
        assert_eq!(record.totals.total_earnings, dec("17000.00"));
        assert_eq!(record.totals.total_basic_da, dec("12000.00"));

        // PF 12% of 12,000; ESIC 0.75% of 16,000; PT 300 in February.
        assert_eq!(record.deduction_total_of_kind(ComponentKind::ProvidentFund), dec("1440.00"));
        assert_eq!(record.deduction_total_of_kind(ComponentKind::EsicEmployee), dec("120.00"));
        assert_eq!(record.deduction_total_of_kind(ComponentKind::ProfessionalTax), dec("300"));

        assert_eq!(record.totals.total_deductions, dec("1860.00"));
        assert_eq!(record.totals.total_employer_contribution, dec("520.00"));
        assert_eq!(record.totals.net_pay, dec("15140.00"));
        assert_eq!(record.totals.retention_total, Decimal::ZERO);

        assert_eq!(record.employee_id, "EMP-0001");
        assert_eq!(record.period, february());
        assert!(record.audit_trace.warnings.is_empty());
    }

    /// PA-002: absences prorate attendance-dependent lines
    #[test]
    fn test_absences_prorate_earnings() {
        let period = february();
        let mut records: Vec<AttendanceRecord> = period
            .days()
            .filter(|d| d.weekday() != Weekday::Sun)
            .map(|d| AttendanceRecord {
                employee_id: "EMP-0001".to_string(),
                date: d,
                status: AttendanceStatus::Present,
            })
            .collect();
        for record in records.iter_mut().take(5) {
            record.status = AttendanceStatus::Absent;
        }
        let sheet = AttendanceSheet::new("EMP-0001".to_string(), records).unwrap();

        let record = assemble_payroll(
            &create_test_employee(),
            &create_test_history(),
            &sheet,
            period,
            WeeklyOffPolicy::ExcludeWeeklyOffs,
            &load_config(),
        )
        .unwrap();

        assert_eq!(record.days.payment_days, dec("20"));

        // (10,000 / 25) x 20
        assert_eq!(record.earnings[0].amount, dec("8000.00"));
        // Variable: 5,000 prorated to 4,000, then 60%.
        assert_eq!(record.earnings[3].amount, dec("2400.00"));
        // The swept Attendance Bonus is not attendance-dependent.
        assert_eq!(record.earnings[4].amount, dec("1000"));

        // Gross 13,800; PF 12% of 9,600; ESIC 0.75% of 13,000; PT 300.
        assert_eq!(record.totals.total_earnings, dec("13800.00"));
        assert_eq!(record.totals.total_deductions, dec("1549.50"));
        assert_eq!(record.totals.net_pay, dec("12250.50"));
    }

    /// PA-003: a month with no covering assignment fails by name
    #[test]
    fn test_missing_assignment_fails() {
        let history = AssignmentHistory::new(
            "EMP-0001".to_string(),
            vec![CompensationAssignment {
                employee_id: "EMP-0001".to_string(),
                effective_from: date("2024-06-01"),
                effective_to: None,
                earnings: vec![earning("Basic", "B", ComponentKind::Basic, "10000")],
                deductions: vec![],
            }],
        )
        .unwrap();

        let result = assemble_payroll(
            &create_test_employee(),
            &history,
            &full_month_sheet(february()),
            february(),
            WeeklyOffPolicy::ExcludeWeeklyOffs,
            &load_config(),
        );
        assert!(matches!(
            result,
            Err(EngineError::AssignmentNotFound { .. })
        ));
    }

    /// PA-004: a variable line without a division drops with a warning
    #[test]
    fn test_variable_without_division_omits_line() {
        let mut employee = create_test_employee();
        employee.division = None;

        let record = assemble_payroll(
            &employee,
            &create_test_history(),
            &full_month_sheet(february()),
            february(),
            WeeklyOffPolicy::ExcludeWeeklyOffs,
            &load_config(),
        )
        .unwrap();

        assert!(record
            .earnings
            .iter()
            .all(|l| l.kind != ComponentKind::Variable));
        assert_eq!(record.totals.total_earnings, dec("14000.00"));
        assert_eq!(record.audit_trace.warnings.len(), 1);
        assert_eq!(record.audit_trace.warnings[0].code, "VARIABLE_WITHOUT_DIVISION");
    }

    /// PA-005: a division with no percentage for the period fails the slip
    #[test]
    fn test_variable_unassigned_period_fails() {
        let period = PayrollMonth::new(2024, 4).unwrap();
        let result = assemble_payroll(
            &create_test_employee(),
            &create_test_history(),
            &full_month_sheet(period),
            period,
            WeeklyOffPolicy::ExcludeWeeklyOffs,
            &load_config(),
        );

        match result {
            Err(EngineError::VariablePayNotAssigned { division, period }) => {
                assert_eq!(division, "Stitching");
                assert_eq!(period, "2024 - April");
            }
            other => panic!("Expected VariablePayNotAssigned, got {:?}", other),
        }
    }

    /// PA-006: an empty sheet pays the full month and is flagged
    #[test]
    fn test_empty_sheet_pays_full_month_with_warning() {
        let record = assemble_payroll(
            &create_test_employee(),
            &create_test_history(),
            &AttendanceSheet::empty("EMP-0001".to_string()),
            february(),
            WeeklyOffPolicy::ExcludeWeeklyOffs,
            &load_config(),
        )
        .unwrap();

        assert_eq!(record.days.present_days, Decimal::ZERO);
        assert_eq!(record.days.payment_days, dec("25"));
        assert!(record
            .audit_trace
            .warnings
            .iter()
            .any(|w| w.code == "NO_ATTENDANCE"));
    }

    /// PA-007: a fully absent month zeroes prorated lines and warns
    #[test]
    fn test_fully_absent_month() {
        let record = assemble_payroll(
            &create_test_employee(),
            &create_test_history(),
            &sheet_with(AttendanceStatus::Absent, february()),
            february(),
            WeeklyOffPolicy::ExcludeWeeklyOffs,
            &load_config(),
        )
        .unwrap();

        assert_eq!(record.days.payment_days, Decimal::ZERO);
        // Basic prorates to zero but stays on the slip; the variable line
        // scales to zero and drops.
        assert_eq!(record.earnings[0].amount, dec("0.00"));
        assert!(record
            .earnings
            .iter()
            .all(|l| l.kind != ComponentKind::Variable));
        assert!(record
            .audit_trace
            .warnings
            .iter()
            .any(|w| w.code == "ZERO_PAYMENT_DAYS"));
    }

    /// PA-008: ESIC lines stay on the slip at zero above the ceiling
    #[test]
    fn test_high_gross_zeroes_esic() {
        let history = AssignmentHistory::new(
            "EMP-0001".to_string(),
            vec![CompensationAssignment {
                employee_id: "EMP-0001".to_string(),
                effective_from: date("2023-04-01"),
                effective_to: None,
                earnings: vec![earning("Basic", "B", ComponentKind::Basic, "25000")],
                deductions: vec![
                    statutory_line("Provident Fund", "PF", ComponentKind::ProvidentFund),
                    statutory_line("ESIC", "ESIC", ComponentKind::EsicEmployee),
                    statutory_line("ESIC Employer", "ESIC-ER", ComponentKind::EsicEmployer),
                ],
            }],
        )
        .unwrap();

        let record = assemble_payroll(
            &create_test_employee(),
            &history,
            &full_month_sheet(february()),
            february(),
            WeeklyOffPolicy::ExcludeWeeklyOffs,
            &load_config(),
        )
        .unwrap();

        // Gross is 26,000 with the February bonus; both ESIC lines are
        // zero but present.
        assert_eq!(record.totals.total_earnings, dec("26000.00"));
        assert_eq!(record.deduction_total_of_kind(ComponentKind::EsicEmployee), Decimal::ZERO);
        assert_eq!(record.totals.total_employer_contribution, Decimal::ZERO);
        assert_eq!(record.deductions.len(), 3);

        // PF caps at the 15,000 wage ceiling.
        assert_eq!(record.deduction_total_of_kind(ComponentKind::ProvidentFund), dec("1800.00"));
    }

    /// PA-009: retention deposits feed the retention total
    #[test]
    fn test_retention_total_tracked() {
        let history = AssignmentHistory::new(
            "EMP-0001".to_string(),
            vec![CompensationAssignment {
                employee_id: "EMP-0001".to_string(),
                effective_from: date("2023-04-01"),
                effective_to: None,
                earnings: vec![earning("Basic", "B", ComponentKind::Basic, "10000")],
                deductions: vec![ComponentLine {
                    component_name: "Retention Deposit".to_string(),
                    abbreviation: "RD".to_string(),
                    kind: ComponentKind::Retention,
                    base_amount: dec("500"),
                    depends_on_attendance: false,
                    is_month_varying: false,
                    is_employer_side: false,
                }],
            }],
        )
        .unwrap();

        let record = assemble_payroll(
            &create_test_employee(),
            &history,
            &full_month_sheet(february()),
            february(),
            WeeklyOffPolicy::ExcludeWeeklyOffs,
            &load_config(),
        )
        .unwrap();

        assert_eq!(record.totals.retention_total, dec("500"));
        assert_eq!(record.totals.net_pay, dec("10500.00"));
    }

    /// PA-010: audit steps are strictly sequential across the pipeline
    #[test]
    fn test_audit_steps_sequential() {
        let record = assemble_payroll(
            &create_test_employee(),
            &create_test_history(),
            &full_month_sheet(february()),
            february(),
            WeeklyOffPolicy::ExcludeWeeklyOffs,
            &load_config(),
        )
        .unwrap();

        let steps = &record.audit_trace.steps;
        assert!(!steps.is_empty());
        for (i, step) in steps.iter().enumerate() {
            assert_eq!(step.step_number, i as u32 + 1);
        }
        assert_eq!(steps[0].rule_id, "day_accounting");
        assert_eq!(steps[1].rule_id, "component_resolution");
        assert_eq!(steps[2].rule_id, "variable_pay");
        assert_eq!(steps[3].rule_id, "earnings_proration");
        assert_eq!(steps[4].rule_id, "provident_fund");
    }

    #[test]
    fn test_foreign_sheet_rejected() {
        let result = assemble_payroll(
            &create_test_employee(),
            &create_test_history(),
            &AttendanceSheet::empty("EMP-0099".to_string()),
            february(),
            WeeklyOffPolicy::ExcludeWeeklyOffs,
            &load_config(),
        );
        assert!(matches!(
            result,
            Err(EngineError::InvalidAttendance { .. })
        ));
    }

    #[test]
    fn test_slip_metadata_populated() {
        let record = assemble_payroll(
            &create_test_employee(),
            &create_test_history(),
            &full_month_sheet(february()),
            february(),
            WeeklyOffPolicy::ExcludeWeeklyOffs,
            &load_config(),
        )
        .unwrap();

        assert_eq!(record.engine_version, env!("CARGO_PKG_VERSION"));
        assert_eq!(record.employee_name, "Asha Kulkarni");
        assert!(!record.slip_id.is_nil());
    }
}
