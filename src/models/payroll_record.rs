//! Payroll record models.
//!
//! This module contains the [`PayrollRecord`] type and its associated
//! structures that capture all outputs from a monthly payroll computation:
//! the day tally, resolved slip lines, totals, and the audit trace.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ComponentKind, PayrollMonth};

/// Day counts for one employee's payroll month.
///
/// Present and absent totals are fractional because a half day contributes
/// 0.5 to each. Leave without pay is kept out of `absent_days` and
/// reported separately; [`DayTally::absent_including_lwp`] gives the
/// combined figure pay is docked by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayTally {
    /// Days in the calendar month.
    pub total_calendar_days: u32,
    /// Calendar days matching the designated weekly-off weekday.
    pub weekly_off_days: u32,
    /// Days the employee was expected to work, per the counting policy.
    pub working_days: u32,
    /// Full days present, plus 0.5 per half day.
    pub present_days: Decimal,
    /// Full days absent, plus 0.5 per half day. Excludes leave without pay.
    pub absent_days: Decimal,
    /// Number of half-day records.
    pub half_days: u32,
    /// Days of leave without pay.
    pub lwp_days: u32,
    /// Declared holidays marked in attendance.
    pub holiday_days: u32,
    /// Days actually paid: working days less absences and leave without
    /// pay, floored at zero.
    pub payment_days: Decimal,
}

impl DayTally {
    /// The absent total used for pay: absences plus leave without pay.
    pub fn absent_including_lwp(&self) -> Decimal {
        self.absent_days + Decimal::from(self.lwp_days)
    }
}

/// A single resolved line on a salary slip.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{ComponentKind, SlipLine};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let line = SlipLine {
///     component_name: "Basic".to_string(),
///     abbreviation: "B".to_string(),
///     kind: ComponentKind::Basic,
///     base_amount: Decimal::from_str("12000").unwrap(),
///     amount: Decimal::from_str("11040").unwrap(),
///     depends_on_attendance: true,
///     is_employer_side: false,
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlipLine {
    /// The component this line resolves.
    pub component_name: String,
    /// Short code shown on slips and registers.
    pub abbreviation: String,
    /// Semantic tag driving statutory dispatch.
    pub kind: ComponentKind,
    /// The amount before proration and statutory rules.
    pub base_amount: Decimal,
    /// The final payable amount.
    pub amount: Decimal,
    /// Whether the amount was prorated by payment days.
    pub depends_on_attendance: bool,
    /// Employer-side contributions are excluded from net pay.
    pub is_employer_side: bool,
}

/// Aggregated totals for a payroll record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlipTotals {
    /// Sum of all earning lines.
    pub total_earnings: Decimal,
    /// Sum of basic and dearness-allowance earnings; the provident fund
    /// wage before capping.
    pub total_basic_da: Decimal,
    /// Sum of employee-side deduction lines.
    pub total_deductions: Decimal,
    /// Sum of employer-side contribution lines; never part of net pay.
    pub total_employer_contribution: Decimal,
    /// Sum of retention-deposit deductions, tracked for the deposit ledger.
    pub retention_total: Decimal,
    /// total_earnings − total_deductions.
    pub net_pay: Decimal,
}

/// A single step in the audit trace recording a calculation decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during calculation.
///
/// Warnings indicate conditions that don't prevent computation but may
/// need review, such as an empty attendance sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

/// The complete audit trace for a payroll computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
    /// The total calculation duration in microseconds.
    pub duration_us: u64,
}

/// The complete result of one employee's monthly payroll computation.
///
/// Immutable once computed: recomputation produces a fresh record with a
/// new slip id, never a patched one.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{AuditTrace, DayTally, PayrollMonth, PayrollRecord, SlipTotals};
/// use chrono::Utc;
/// use rust_decimal::Decimal;
/// use uuid::Uuid;
///
/// let record = PayrollRecord {
///     slip_id: Uuid::new_v4(),
///     timestamp: Utc::now(),
///     engine_version: "1.0.0".to_string(),
///     employee_id: "EMP-0001".to_string(),
///     employee_name: "Asha Kulkarni".to_string(),
///     period: PayrollMonth::new(2024, 2).unwrap(),
///     days: DayTally {
///         total_calendar_days: 29,
///         weekly_off_days: 4,
///         working_days: 25,
///         present_days: Decimal::from(25),
///         absent_days: Decimal::ZERO,
///         half_days: 0,
///         lwp_days: 0,
///         holiday_days: 0,
///         payment_days: Decimal::from(25),
///     },
///     earnings: vec![],
///     deductions: vec![],
///     totals: SlipTotals {
///         total_earnings: Decimal::ZERO,
///         total_basic_da: Decimal::ZERO,
///         total_deductions: Decimal::ZERO,
///         total_employer_contribution: Decimal::ZERO,
///         retention_total: Decimal::ZERO,
///         net_pay: Decimal::ZERO,
///     },
///     audit_trace: AuditTrace {
///         steps: vec![],
///         warnings: vec![],
///         duration_us: 0,
///     },
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollRecord {
    /// Unique identifier for this slip.
    pub slip_id: Uuid,
    /// When the computation was performed.
    pub timestamp: DateTime<Utc>,
    /// The version of the engine that performed the computation.
    pub engine_version: String,
    /// The employee the slip is for.
    pub employee_id: String,
    /// The employee's display name.
    pub employee_name: String,
    /// The payroll month.
    pub period: PayrollMonth,
    /// Day counts for the month.
    pub days: DayTally,
    /// Resolved earning lines in slip order.
    pub earnings: Vec<SlipLine>,
    /// Resolved deduction lines in slip order.
    pub deductions: Vec<SlipLine>,
    /// Aggregated totals.
    pub totals: SlipTotals,
    /// Complete audit trace of calculation decisions.
    pub audit_trace: AuditTrace,
}

impl PayrollRecord {
    /// The slip's total for lines of one kind, employee side only.
    pub fn deduction_total_of_kind(&self, kind: ComponentKind) -> Decimal {
        self.deductions
            .iter()
            .filter(|line| line.kind == kind && !line.is_employer_side)
            .map(|line| line.amount)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn sample_tally() -> DayTally {
        DayTally {
            total_calendar_days: 29,
            weekly_off_days: 4,
            working_days: 25,
            present_days: dec("23.5"),
            absent_days: dec("0.5"),
            half_days: 1,
            lwp_days: 1,
            holiday_days: 0,
            payment_days: dec("23.5"),
        }
    }

    fn sample_line(name: &str, kind: ComponentKind, amount: &str) -> SlipLine {
        SlipLine {
            component_name: name.to_string(),
            abbreviation: name[..1].to_string(),
            kind,
            base_amount: dec(amount),
            amount: dec(amount),
            depends_on_attendance: false,
            is_employer_side: false,
        }
    }

    fn sample_record() -> PayrollRecord {
        PayrollRecord {
            slip_id: Uuid::nil(),
            timestamp: DateTime::parse_from_rfc3339("2024-03-01T09:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
            engine_version: "1.0.0".to_string(),
            employee_id: "EMP-0001".to_string(),
            employee_name: "Asha Kulkarni".to_string(),
            period: PayrollMonth::new(2024, 2).unwrap(),
            days: sample_tally(),
            earnings: vec![
                sample_line("Basic", ComponentKind::Basic, "12000"),
                sample_line("House Rent Allowance", ComponentKind::Other, "4000"),
            ],
            deductions: vec![sample_line(
                "Provident Fund",
                ComponentKind::ProvidentFund,
                "1440",
            )],
            totals: SlipTotals {
                total_earnings: dec("16000"),
                total_basic_da: dec("12000"),
                total_deductions: dec("1440"),
                total_employer_contribution: dec("0"),
                retention_total: dec("0"),
                net_pay: dec("14560"),
            },
            audit_trace: AuditTrace {
                steps: vec![],
                warnings: vec![],
                duration_us: 900,
            },
        }
    }

    /// PR-001: absent-including-LWP folds leave without pay into absence
    #[test]
    fn test_absent_including_lwp() {
        let tally = sample_tally();
        assert_eq!(tally.absent_including_lwp(), dec("1.5"));
    }

    /// PR-002: net pay equals earnings minus employee-side deductions
    #[test]
    fn test_net_pay_consistency() {
        let record = sample_record();
        let earnings: Decimal = record.earnings.iter().map(|l| l.amount).sum();
        let deductions: Decimal = record
            .deductions
            .iter()
            .filter(|l| !l.is_employer_side)
            .map(|l| l.amount)
            .sum();
        assert_eq!(record.totals.net_pay, earnings - deductions);
    }

    /// PR-003: kind totals ignore employer-side lines
    #[test]
    fn test_deduction_total_of_kind_skips_employer_side() {
        let mut record = sample_record();
        record.deductions.push(SlipLine {
            component_name: "ESIC Employer".to_string(),
            abbreviation: "ESIC-ER".to_string(),
            kind: ComponentKind::EsicEmployer,
            base_amount: dec("1"),
            amount: dec("617.50"),
            depends_on_attendance: false,
            is_employer_side: true,
        });

        assert_eq!(
            record.deduction_total_of_kind(ComponentKind::ProvidentFund),
            dec("1440")
        );
        assert_eq!(
            record.deduction_total_of_kind(ComponentKind::EsicEmployer),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_serialize_payroll_record() {
        let record = sample_record();
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"slip_id\":\"00000000-0000-0000-0000-000000000000\""));
        assert!(json.contains("\"engine_version\":\"1.0.0\""));
        assert!(json.contains("\"employee_id\":\"EMP-0001\""));
        assert!(json.contains("\"period\":{"));
        assert!(json.contains("\"earnings\":["));
        assert!(json.contains("\"deductions\":["));
        assert!(json.contains("\"totals\":{"));
        assert!(json.contains("\"audit_trace\":{"));
    }

    #[test]
    fn test_deserialize_payroll_record() {
        let json = serde_json::to_string(&sample_record()).unwrap();
        let record: PayrollRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, sample_record());
    }

    #[test]
    fn test_slip_line_serialization() {
        let line = sample_line("Basic", ComponentKind::Basic, "12000");
        let json = serde_json::to_string(&line).unwrap();
        assert!(json.contains("\"component_name\":\"Basic\""));
        assert!(json.contains("\"kind\":\"basic\""));
        assert!(json.contains("\"base_amount\":\"12000\""));
    }

    #[test]
    fn test_audit_step_serialization() {
        let step = AuditStep {
            step_number: 1,
            rule_id: "day_accounting".to_string(),
            rule_name: "Attendance day accounting".to_string(),
            input: serde_json::json!({"policy": "exclude_weekly_offs"}),
            output: serde_json::json!({"working_days": 25}),
            reasoning: "25 working days after 4 weekly offs".to_string(),
        };

        let json = serde_json::to_string(&step).unwrap();
        assert!(json.contains("\"step_number\":1"));
        assert!(json.contains("\"rule_id\":\"day_accounting\""));
        assert!(json.contains("\"rule_name\":\"Attendance day accounting\""));
    }

    #[test]
    fn test_audit_steps_ordered() {
        let trace = AuditTrace {
            steps: vec![
                AuditStep {
                    step_number: 1,
                    rule_id: "day_accounting".to_string(),
                    rule_name: "First".to_string(),
                    input: serde_json::json!({}),
                    output: serde_json::json!({}),
                    reasoning: "First".to_string(),
                },
                AuditStep {
                    step_number: 2,
                    rule_id: "component_resolution".to_string(),
                    rule_name: "Second".to_string(),
                    input: serde_json::json!({}),
                    output: serde_json::json!({}),
                    reasoning: "Second".to_string(),
                },
            ],
            warnings: vec![],
            duration_us: 1000,
        };

        let step_numbers: Vec<u32> = trace.steps.iter().map(|s| s.step_number).collect();
        assert_eq!(step_numbers, vec![1, 2]);
    }

    #[test]
    fn test_audit_warning_serialization() {
        let warning = AuditWarning {
            code: "NO_ATTENDANCE".to_string(),
            message: "No attendance records found for the period".to_string(),
            severity: "medium".to_string(),
        };

        let json = serde_json::to_string(&warning).unwrap();
        assert!(json.contains("\"code\":\"NO_ATTENDANCE\""));
        assert!(json.contains("\"severity\":\"medium\""));
    }

    #[test]
    fn test_day_tally_serialization() {
        let tally = sample_tally();
        let json = serde_json::to_string(&tally).unwrap();
        assert!(json.contains("\"total_calendar_days\":29"));
        assert!(json.contains("\"working_days\":25"));
        assert!(json.contains("\"present_days\":\"23.5\""));
        assert!(json.contains("\"lwp_days\":1"));
    }
}
