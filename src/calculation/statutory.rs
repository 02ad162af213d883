//! Statutory deduction calculation.
//!
//! This module computes the deduction side of a salary slip: provident
//! fund, ESIC, and professional tax by their statutory formulas, and the
//! remaining deductions by attendance proration. Dispatch is on each
//! line's [`ComponentKind`] tag.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::{PfWageBase, StatutoryConfig};
use crate::models::{AuditStep, ComponentKind, DayTally, PayrollMonth, SlipLine};

/// Earning-side figures the statutory formulas run on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EarningsSummary {
    /// Sum of all earning lines.
    pub total_earnings: Decimal,
    /// Sum of basic and dearness-allowance lines.
    pub basic_da: Decimal,
    /// Sum of conveyance lines; excluded from the ESIC wage.
    pub conveyance: Decimal,
}

impl EarningsSummary {
    /// Sums the computed earning lines by kind.
    pub fn from_lines(lines: &[SlipLine]) -> Self {
        let mut summary = Self {
            total_earnings: Decimal::ZERO,
            basic_da: Decimal::ZERO,
            conveyance: Decimal::ZERO,
        };
        for line in lines {
            summary.total_earnings += line.amount;
            match line.kind {
                ComponentKind::Basic | ComponentKind::DearnessAllowance => {
                    summary.basic_da += line.amount;
                }
                ComponentKind::Conveyance => summary.conveyance += line.amount,
                _ => {}
            }
        }
        summary
    }

    /// The ESIC wage: gross earnings less conveyance.
    pub fn esic_wage(&self) -> Decimal {
        self.total_earnings - self.conveyance
    }
}

/// The result of deduction calculation, including lines and audit steps.
#[derive(Debug, Clone)]
pub struct DeductionResult {
    /// Deduction lines with computed amounts, in slip order.
    pub lines: Vec<SlipLine>,
    /// Sum of employee-side deduction amounts.
    pub total_deductions: Decimal,
    /// Sum of employer-side contribution amounts.
    pub total_employer_contribution: Decimal,
    /// Sum of retention-deposit amounts, for the deposit ledger.
    pub retention_total: Decimal,
    /// One audit step per deduction line, in order.
    pub audit_steps: Vec<AuditStep>,
}

/// Rounds a money amount to two decimal places, half away from zero.
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Prorates a base amount by payment days against working days.
pub fn prorate_by_attendance(base: Decimal, working_days: u32, payment_days: Decimal) -> Decimal {
    if working_days == 0 {
        return base;
    }
    round_money(base / Decimal::from(working_days) * payment_days)
}

/// Calculates the deduction side of a slip.
///
/// Each resolved deduction line is computed by its kind:
/// - Provident fund: the configured percent of the PF wage (basic + DA,
///   capped or uncapped per configuration)
/// - ESIC employee and employer: the respective percent of (gross −
///   conveyance), zero once that wage reaches the ceiling
/// - Professional tax: the flat monthly amount, with the February
///   override
/// - Everything else: prorated by payment days when attendance-dependent,
///   otherwise passed through
///
/// Statutory lines stay on the slip even when their formula yields zero
/// (an ESIC line above the ceiling shows 0). Amounts are rounded to two
/// decimal places.
///
/// # Arguments
///
/// * `resolved` - The resolver's deduction lines, bases in place
/// * `earnings` - Earning-side totals the formulas run on
/// * `tally` - The day tally for proration
/// * `statutory` - The statutory configuration
/// * `period` - The payroll month (February drives professional tax)
/// * `start_step_number` - The starting step number for audit sequencing
///
/// # Examples
///
/// ```no_run
/// use payroll_engine::calculation::{EarningsSummary, calculate_deductions};
/// use payroll_engine::config::ConfigLoader;
/// use payroll_engine::models::{ComponentKind, DayTally, PayrollMonth, SlipLine};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let loader = ConfigLoader::load("config").unwrap();
/// let pf_line = SlipLine {
///     component_name: "Provident Fund".to_string(),
///     abbreviation: "PF".to_string(),
///     kind: ComponentKind::ProvidentFund,
///     base_amount: Decimal::ONE,
///     amount: Decimal::ONE,
///     depends_on_attendance: false,
///     is_employer_side: false,
/// };
/// let earnings = EarningsSummary {
///     total_earnings: Decimal::from_str("16000").unwrap(),
///     basic_da: Decimal::from_str("12000").unwrap(),
///     conveyance: Decimal::ZERO,
/// };
/// let tally = DayTally {
///     total_calendar_days: 29,
///     weekly_off_days: 4,
///     working_days: 25,
///     present_days: Decimal::from_str("25").unwrap(),
///     absent_days: Decimal::ZERO,
///     half_days: 0,
///     lwp_days: 0,
///     holiday_days: 0,
///     payment_days: Decimal::from_str("25").unwrap(),
/// };
/// let period = PayrollMonth::new(2024, 2).unwrap();
///
/// let result = calculate_deductions(&[pf_line], &earnings, &tally, loader.statutory(), period, 3);
/// // 12% of min(12,000, 15,000) = 1,440
/// assert_eq!(result.lines[0].amount, Decimal::from_str("1440").unwrap());
/// ```
pub fn calculate_deductions(
    resolved: &[SlipLine],
    earnings: &EarningsSummary,
    tally: &DayTally,
    statutory: &StatutoryConfig,
    period: PayrollMonth,
    start_step_number: u32,
) -> DeductionResult {
    let mut lines = Vec::with_capacity(resolved.len());
    let mut audit_steps = Vec::with_capacity(resolved.len());
    let mut total_deductions = Decimal::ZERO;
    let mut total_employer_contribution = Decimal::ZERO;
    let mut retention_total = Decimal::ZERO;
    let mut current_step = start_step_number;

    for line in resolved {
        let (amount, audit_step) = match line.kind {
            ComponentKind::ProvidentFund => {
                provident_fund(line, earnings, statutory, current_step)
            }
            ComponentKind::EsicEmployee => esic(
                line,
                earnings,
                statutory.esic.employee_percent,
                statutory,
                "esic_employee",
                current_step,
            ),
            ComponentKind::EsicEmployer => esic(
                line,
                earnings,
                statutory.esic.employer_percent,
                statutory,
                "esic_employer",
                current_step,
            ),
            ComponentKind::ProfessionalTax => professional_tax(line, statutory, period, current_step),
            _ => prorated_deduction(line, tally, current_step),
        };
        current_step += 1;

        if line.is_employer_side {
            total_employer_contribution += amount;
        } else {
            total_deductions += amount;
        }
        if line.kind == ComponentKind::Retention {
            retention_total += amount;
        }

        let mut computed = line.clone();
        computed.amount = amount;
        lines.push(computed);
        audit_steps.push(audit_step);
    }

    DeductionResult {
        lines,
        total_deductions,
        total_employer_contribution,
        retention_total,
        audit_steps,
    }
}

fn provident_fund(
    line: &SlipLine,
    earnings: &EarningsSummary,
    statutory: &StatutoryConfig,
    step_number: u32,
) -> (Decimal, AuditStep) {
    let (wage, wage_base_str) = match statutory.pf.wage_base {
        PfWageBase::Capped { ceiling } => (earnings.basic_da.min(ceiling), "capped"),
        PfWageBase::Uncapped => (earnings.basic_da, "uncapped"),
    };
    let amount = round_money(wage * statutory.pf.percent / Decimal::ONE_HUNDRED);

    let audit_step = AuditStep {
        step_number,
        rule_id: "provident_fund".to_string(),
        rule_name: "Provident Fund Deduction".to_string(),
        input: serde_json::json!({
            "component": line.component_name,
            "basic_da": earnings.basic_da.normalize().to_string(),
            "wage_base": wage_base_str,
            "pf_wage": wage.normalize().to_string(),
            "percent": statutory.pf.percent.normalize().to_string()
        }),
        output: serde_json::json!({
            "amount": amount.normalize().to_string()
        }),
        reasoning: format!(
            "PF = {}% of {} wage {} = {}",
            statutory.pf.percent.normalize(),
            wage_base_str,
            wage.normalize(),
            amount.normalize()
        ),
    };
    (amount, audit_step)
}

fn esic(
    line: &SlipLine,
    earnings: &EarningsSummary,
    percent: Decimal,
    statutory: &StatutoryConfig,
    rule_id: &str,
    step_number: u32,
) -> (Decimal, AuditStep) {
    let wage = earnings.esic_wage();
    let eligible = wage < statutory.esic.gross_ceiling;
    let amount = if eligible {
        round_money(wage * percent / Decimal::ONE_HUNDRED)
    } else {
        Decimal::ZERO
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: rule_id.to_string(),
        rule_name: "ESIC Contribution".to_string(),
        input: serde_json::json!({
            "component": line.component_name,
            "gross": earnings.total_earnings.normalize().to_string(),
            "conveyance": earnings.conveyance.normalize().to_string(),
            "esic_wage": wage.normalize().to_string(),
            "ceiling": statutory.esic.gross_ceiling.normalize().to_string(),
            "percent": percent.normalize().to_string()
        }),
        output: serde_json::json!({
            "eligible": eligible,
            "amount": amount.normalize().to_string()
        }),
        reasoning: if eligible {
            format!(
                "ESIC wage {} is below the {} ceiling: {}% = {}",
                wage.normalize(),
                statutory.esic.gross_ceiling.normalize(),
                percent.normalize(),
                amount.normalize()
            )
        } else {
            format!(
                "ESIC wage {} is at or above the {} ceiling: no contribution",
                wage.normalize(),
                statutory.esic.gross_ceiling.normalize()
            )
        },
    };
    (amount, audit_step)
}

fn professional_tax(
    line: &SlipLine,
    statutory: &StatutoryConfig,
    period: PayrollMonth,
    step_number: u32,
) -> (Decimal, AuditStep) {
    let february = period.month == 2;
    let amount = if february {
        statutory.professional_tax.february_amount
    } else {
        statutory.professional_tax.monthly_amount
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "professional_tax".to_string(),
        rule_name: "Professional Tax Deduction".to_string(),
        input: serde_json::json!({
            "component": line.component_name,
            "month": period.month_name()
        }),
        output: serde_json::json!({
            "amount": amount.normalize().to_string()
        }),
        reasoning: if february {
            format!(
                "February professional tax collects the annual balance: {}",
                amount.normalize()
            )
        } else {
            format!("Flat monthly professional tax: {}", amount.normalize())
        },
    };
    (amount, audit_step)
}

fn prorated_deduction(line: &SlipLine, tally: &DayTally, step_number: u32) -> (Decimal, AuditStep) {
    let prorated = line.depends_on_attendance && tally.working_days > 0;
    let amount = if prorated {
        prorate_by_attendance(line.base_amount, tally.working_days, tally.payment_days)
    } else {
        line.base_amount
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "deduction_proration".to_string(),
        rule_name: "Deduction Proration".to_string(),
        input: serde_json::json!({
            "component": line.component_name,
            "base_amount": line.base_amount.normalize().to_string(),
            "depends_on_attendance": line.depends_on_attendance,
            "working_days": tally.working_days,
            "payment_days": tally.payment_days.normalize().to_string()
        }),
        output: serde_json::json!({
            "amount": amount.normalize().to_string()
        }),
        reasoning: if prorated {
            format!(
                "{} prorated: ({} / {}) x {} = {}",
                line.component_name,
                line.base_amount.normalize(),
                tally.working_days,
                tally.payment_days.normalize(),
                amount.normalize()
            )
        } else {
            format!(
                "{} passed through at its base amount {}",
                line.component_name,
                line.base_amount.normalize()
            )
        },
    };
    (amount, audit_step)
}
