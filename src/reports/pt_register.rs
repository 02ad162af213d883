//! Professional tax register.
//!
//! The payslip charges professional tax as a flat monthly amount with a
//! February override; the statutory return classifies employees against
//! the gross-salary slab table. The register reports both figures side
//! by side so the difference is visible instead of hidden.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::config::StatutoryConfig;
use crate::models::{ComponentKind, PayrollMonth, SlipRegister};

/// One employee's row on the PT register.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PtRegisterRow {
    /// The taxed employee.
    pub employee_id: String,
    /// Display name, the register's sort key.
    pub employee_name: String,
    /// The slip's gross earnings, the slab classification input.
    pub gross_salary: Decimal,
    /// Professional tax actually deducted on the slip.
    pub slip_pt: Decimal,
    /// Professional tax per the slab table for this gross.
    pub slab_pt: Decimal,
}

/// The PT register for one period.
#[derive(Debug, Clone, Serialize)]
pub struct PtRegister {
    /// Period identifier, "YYYY - MonthName".
    pub period: String,
    /// Rows sorted by employee name.
    pub rows: Vec<PtRegisterRow>,
    /// Total professional tax deducted on slips.
    pub total_slip_pt: Decimal,
    /// Total professional tax per the slab table.
    pub total_slab_pt: Decimal,
}

/// Builds the PT register from the period's submitted slips.
///
/// Employees with no professional tax on their slip are skipped.
pub fn build_pt_register(
    register: &SlipRegister,
    statutory: &StatutoryConfig,
    period: PayrollMonth,
) -> PtRegister {
    let mut rows: Vec<PtRegisterRow> = register
        .submitted_in(period)
        .into_iter()
        .filter_map(|record| {
            let slip_pt = record.deduction_total_of_kind(ComponentKind::ProfessionalTax);
            if slip_pt <= Decimal::ZERO {
                return None;
            }
            let gross_salary = record.totals.total_earnings;
            Some(PtRegisterRow {
                employee_id: record.employee_id.clone(),
                employee_name: record.employee_name.clone(),
                gross_salary,
                slip_pt,
                slab_pt: statutory.slab_amount_for(gross_salary),
            })
        })
        .collect();

    rows.sort_by(|a, b| {
        a.employee_name
            .cmp(&b.employee_name)
            .then_with(|| a.employee_id.cmp(&b.employee_id))
    });

    let total_slip_pt = rows.iter().map(|r| r.slip_pt).sum();
    let total_slab_pt = rows.iter().map(|r| r.slab_pt).sum();

    PtRegister {
        period: period.identifier(),
        rows,
        total_slip_pt,
        total_slab_pt,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigLoader;
    use crate::models::{AuditTrace, DayTally, PayrollRecord, SlipLine, SlipTotals};
    use chrono::Utc;
    use std::str::FromStr;
    use uuid::Uuid;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn february() -> PayrollMonth {
        PayrollMonth::new(2024, 2).unwrap()
    }

    fn statutory() -> StatutoryConfig {
        ConfigLoader::load("./config")
            .expect("Failed to load config")
            .statutory()
            .clone()
    }

    fn slip(employee_id: &str, name: &str, gross: &str, pt: &str) -> PayrollRecord {
        let deductions = if pt == "0" {
            vec![]
        } else {
            vec![SlipLine {
                component_name: "Professional Tax".to_string(),
                abbreviation: "PT".to_string(),
                kind: ComponentKind::ProfessionalTax,
                base_amount: Decimal::ONE,
                amount: dec(pt),
                depends_on_attendance: false,
                is_employer_side: false,
            }]
        };
        PayrollRecord {
            slip_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            engine_version: "1.0.0".to_string(),
            employee_id: employee_id.to_string(),
            employee_name: name.to_string(),
            period: february(),
            days: DayTally {
                total_calendar_days: 29,
                weekly_off_days: 4,
                working_days: 25,
                present_days: dec("25"),
                absent_days: Decimal::ZERO,
                half_days: 0,
                lwp_days: 0,
                holiday_days: 0,
                payment_days: dec("25"),
            },
            earnings: vec![],
            deductions,
            totals: SlipTotals {
                total_earnings: dec(gross),
                total_basic_da: Decimal::ZERO,
                total_deductions: dec(pt),
                total_employer_contribution: Decimal::ZERO,
                retention_total: Decimal::ZERO,
                net_pay: dec(gross) - dec(pt),
            },
            audit_trace: AuditTrace {
                steps: vec![],
                warnings: vec![],
                duration_us: 0,
            },
        }
    }

    /// PT-001: slip and slab amounts report side by side
    #[test]
    fn test_register_shows_both_mechanisms() {
        let mut register = SlipRegister::new();
        // February slip: flat 300 deducted; the 16,000 gross slab says 200.
        register
            .submit(slip("EMP-0001", "Asha Kulkarni", "16000", "300"))
            .unwrap();
        // A low gross lands in the 60-rupee band.
        register
            .submit(slip("EMP-0002", "Ravi Narang", "3000", "300"))
            .unwrap();

        let report = build_pt_register(&register, &statutory(), february());

        assert_eq!(report.rows.len(), 2);
        assert_eq!(report.rows[0].slip_pt, dec("300"));
        assert_eq!(report.rows[0].slab_pt, dec("200"));
        assert_eq!(report.rows[1].slab_pt, dec("60"));
        assert_eq!(report.total_slip_pt, dec("600"));
        assert_eq!(report.total_slab_pt, dec("260"));
    }

    /// PT-002: slips without professional tax stay off the register
    #[test]
    fn test_register_skips_untaxed_slips() {
        let mut register = SlipRegister::new();
        register
            .submit(slip("EMP-0001", "Asha Kulkarni", "16000", "0"))
            .unwrap();

        let report = build_pt_register(&register, &statutory(), february());
        assert!(report.rows.is_empty());
        assert_eq!(report.total_slip_pt, Decimal::ZERO);
    }
}
