//! Provident fund register.
//!
//! The statutory monthly PF return. Amounts here are recomputed from the
//! capped statutory wage rather than copied off the slip, so the register
//! stays correct even when the payslip runs the uncapped formula variant.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{Employee, PayrollMonth, SlipRegister};

/// Statutory PF wage ceiling for the register.
pub const PF_WAGE_CEILING: Decimal = Decimal::from_parts(15000, 0, 0, false, 0);

/// Contribution rate applied to the PF wage.
const PF_RATE_PERCENT: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

/// Share of the employer contribution routed to the pension scheme.
const EMPLOYER_EPS_SHARE: Decimal = Decimal::from_parts(6944, 0, 0, false, 4);

/// Share of the employer contribution staying in the PF account.
const EMPLOYER_PF_SHARE: Decimal = Decimal::from_parts(3056, 0, 0, false, 4);

/// One employee's row on the PF register.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PfRegisterRow {
    /// The contributing employee.
    pub employee_id: String,
    /// Display name, the register's sort key.
    pub employee_name: String,
    /// PF account number from the employee profile.
    pub pf_number: Option<String>,
    /// Universal Account Number from the employee profile.
    pub uan_number: Option<String>,
    /// Payment days on the slip.
    pub days_paid: Decimal,
    /// The slip's basic plus dearness allowance total.
    pub basic_da: Decimal,
    /// Contribution wage: basic+DA capped at the statutory ceiling.
    pub pf_wage: Decimal,
    /// Employee contribution, rounded to the rupee.
    pub employee_pf: Decimal,
    /// Employer pension-scheme share, rounded to the rupee.
    pub employer_eps: Decimal,
    /// Employer PF share, rounded to the rupee.
    pub employer_pf: Decimal,
    /// Basic+DA above the ceiling, contributing nothing.
    pub non_contributory_wage: Decimal,
}

/// Column totals across the register.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PfRegisterTotals {
    /// Total contribution wage.
    pub pf_wage: Decimal,
    /// Total employee contributions.
    pub employee_pf: Decimal,
    /// Total employer pension-scheme shares.
    pub employer_eps: Decimal,
    /// Total employer PF shares.
    pub employer_pf: Decimal,
}

/// The PF register for one period.
#[derive(Debug, Clone, Serialize)]
pub struct PfRegister {
    /// Period identifier, "YYYY - MonthName".
    pub period: String,
    /// Rows sorted by employee name.
    pub rows: Vec<PfRegisterRow>,
    /// Column totals.
    pub totals: PfRegisterTotals,
}

/// Builds the PF register from the period's submitted slips.
///
/// Employees whose slip carries no basic+DA are skipped: with no
/// contribution wage there is nothing to return. Rupee amounts round to
/// whole numbers the way the statutory forms expect.
pub fn build_pf_register(
    register: &SlipRegister,
    employees: &[Employee],
    period: PayrollMonth,
) -> PfRegister {
    let mut rows: Vec<PfRegisterRow> = register
        .submitted_in(period)
        .into_iter()
        .filter(|record| record.totals.total_basic_da > Decimal::ZERO)
        .map(|record| {
            let basic_da = record.totals.total_basic_da;
            let pf_wage = basic_da.min(PF_WAGE_CEILING);
            let employee_pf = (pf_wage * PF_RATE_PERCENT / Decimal::ONE_HUNDRED).round();
            let employer_eps = (employee_pf * EMPLOYER_EPS_SHARE).round();
            let employer_pf = (employee_pf * EMPLOYER_PF_SHARE).round();
            let profile = employees.iter().find(|e| e.id == record.employee_id);

            PfRegisterRow {
                employee_id: record.employee_id.clone(),
                employee_name: record.employee_name.clone(),
                pf_number: profile.and_then(|e| e.pf_number.clone()),
                uan_number: profile.and_then(|e| e.uan_number.clone()),
                days_paid: record.days.payment_days,
                basic_da,
                pf_wage,
                employee_pf,
                employer_eps,
                employer_pf,
                non_contributory_wage: (basic_da - PF_WAGE_CEILING).max(Decimal::ZERO),
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        a.employee_name
            .cmp(&b.employee_name)
            .then_with(|| a.employee_id.cmp(&b.employee_id))
    });

    let totals = rows.iter().fold(PfRegisterTotals::default(), |mut acc, row| {
        acc.pf_wage += row.pf_wage;
        acc.employee_pf += row.employee_pf;
        acc.employer_eps += row.employer_eps;
        acc.employer_pf += row.employer_pf;
        acc
    });

    PfRegister {
        period: period.identifier(),
        rows,
        totals,
    }
}
