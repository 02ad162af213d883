//! Attendance day accounting.
//!
//! This module turns one month of attendance records into the day counts
//! payroll runs on: working days under the company's weekly-off policy,
//! fractional present and absent totals, and the payment days the slip
//! amounts are prorated by.

use chrono::Datelike;
use rust_decimal::Decimal;

use crate::models::{
    AttendanceSheet, AttendanceStatus, AuditStep, DayOfWeek, DayTally, PayrollMonth,
};

/// How weekly offs enter the working-day count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeeklyOffPolicy {
    /// Weekly offs are paid days; working days span the whole month.
    IncludeWeeklyOffs,
    /// Weekly offs are unpaid; working days exclude them.
    #[default]
    ExcludeWeeklyOffs,
}

/// The result of day accounting, including the tally and its audit step.
#[derive(Debug, Clone)]
pub struct DayAccountingResult {
    /// The day counts for the month.
    pub tally: DayTally,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Counts the payroll days for one employee's month.
///
/// This function derives the day tally by:
/// 1. Counting calendar days and designated weekly offs in the month
/// 2. Deriving working days under the weekly-off policy
/// 3. Folding each attendance record into the present/absent counters
/// 4. Computing payment days as working days less absences and leave
///    without pay, floored at zero
///
/// Days with no attendance record contribute to no counter: they are
/// neither present nor absent. A missing weekly-off designation counts
/// zero weekly offs, which makes both policies equivalent.
///
/// # Arguments
///
/// * `sheet` - The employee's attendance sheet
/// * `period` - The payroll month
/// * `weekly_off` - The employee's designated weekly-off weekday, if any
/// * `policy` - The company's weekly-off counting policy
/// * `step_number` - The step number for audit trail sequencing
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::{WeeklyOffPolicy, count_payroll_days};
/// use payroll_engine::models::{AttendanceSheet, DayOfWeek, PayrollMonth};
///
/// let sheet = AttendanceSheet::empty("EMP-0001".to_string());
/// let period = PayrollMonth::new(2024, 2).unwrap();
/// let result = count_payroll_days(
///     &sheet,
///     period,
///     Some(DayOfWeek::Sunday),
///     WeeklyOffPolicy::ExcludeWeeklyOffs,
///     1,
/// );
/// assert_eq!(result.tally.working_days, 25);
/// ```
pub fn count_payroll_days(
    sheet: &AttendanceSheet,
    period: PayrollMonth,
    weekly_off: Option<DayOfWeek>,
    policy: WeeklyOffPolicy,
    step_number: u32,
) -> DayAccountingResult {
    let total_calendar_days = period.days_in_month();

    let weekly_off_days = match weekly_off {
        Some(day) => {
            let weekday = day.to_weekday();
            period.days().filter(|date| date.weekday() == weekday).count() as u32
        }
        None => 0,
    };

    let working_days = match policy {
        WeeklyOffPolicy::IncludeWeeklyOffs => total_calendar_days,
        WeeklyOffPolicy::ExcludeWeeklyOffs => total_calendar_days - weekly_off_days,
    };

    let half = Decimal::new(5, 1);
    let mut present_days = Decimal::ZERO;
    let mut absent_days = Decimal::ZERO;
    let mut half_days = 0u32;
    let mut lwp_days = 0u32;
    let mut holiday_days = 0u32;

    let records = sheet.for_month(period);
    for record in &records {
        match record.status {
            AttendanceStatus::Present
            | AttendanceStatus::OnLeave
            | AttendanceStatus::WorkFromHome => present_days += Decimal::ONE,
            AttendanceStatus::HalfDay => {
                present_days += half;
                absent_days += half;
                half_days += 1;
            }
            AttendanceStatus::Absent => absent_days += Decimal::ONE,
            AttendanceStatus::LeaveWithoutPay => lwp_days += 1,
            AttendanceStatus::Holiday => holiday_days += 1,
            // A weekly-off record is already reflected in the day counts.
            AttendanceStatus::WeeklyOff => {}
        }
    }

    let absent_including_lwp = absent_days + Decimal::from(lwp_days);
    let mut payment_days = (Decimal::from(working_days) - absent_including_lwp).round_dp(2);
    if payment_days < Decimal::ZERO {
        payment_days = Decimal::ZERO;
    }

    let tally = DayTally {
        total_calendar_days,
        weekly_off_days,
        working_days,
        present_days,
        absent_days,
        half_days,
        lwp_days,
        holiday_days,
        payment_days,
    };

    let policy_str = match policy {
        WeeklyOffPolicy::IncludeWeeklyOffs => "include_weekly_offs",
        WeeklyOffPolicy::ExcludeWeeklyOffs => "exclude_weekly_offs",
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "day_accounting".to_string(),
        rule_name: "Attendance Day Accounting".to_string(),
        input: serde_json::json!({
            "period": period.identifier(),
            "policy": policy_str,
            "weekly_off": weekly_off.map(|day| format!("{:?}", day)),
            "record_count": records.len()
        }),
        output: serde_json::json!({
            "total_calendar_days": total_calendar_days,
            "weekly_off_days": weekly_off_days,
            "working_days": working_days,
            "present_days": present_days.normalize().to_string(),
            "absent_days": absent_days.normalize().to_string(),
            "lwp_days": lwp_days,
            "holiday_days": holiday_days,
            "payment_days": payment_days.normalize().to_string()
        }),
        reasoning: format!(
            "{} calendar days, {} weekly offs ({}): {} working days; {} absent + {} LWP leaves {} payment days",
            total_calendar_days,
            weekly_off_days,
            policy_str,
            working_days,
            absent_days.normalize(),
            lwp_days,
            payment_days.normalize()
        ),
    };

    DayAccountingResult { tally, audit_step }
}
