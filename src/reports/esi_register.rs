//! ESI contribution register.
//!
//! The statutory monthly ESIC return: per contributing employee, the
//! days paid, the gross salary, and the employee and employer
//! contributions taken from the slip's ESIC lines.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{ComponentKind, Employee, PayrollMonth, PayrollRecord, SlipRegister};

/// One employee's row on the ESI register.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EsiRegisterRow {
    /// The contributing employee.
    pub employee_id: String,
    /// Display name, the register's sort key.
    pub employee_name: String,
    /// ESIC registration number from the employee profile.
    pub esic_number: Option<String>,
    /// Payment days on the slip.
    pub days_paid: Decimal,
    /// The slip's gross earnings.
    pub gross_salary: Decimal,
    /// Employee-side ESIC contribution.
    pub employee_esi: Decimal,
    /// Employer-side ESIC contribution.
    pub employer_esi: Decimal,
    /// Combined contribution.
    pub total_esi: Decimal,
}

/// Column totals across the register.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EsiRegisterTotals {
    /// Total employee contributions.
    pub employee_esi: Decimal,
    /// Total employer contributions.
    pub employer_esi: Decimal,
    /// Combined total.
    pub total_esi: Decimal,
}

/// The ESI register for one period.
#[derive(Debug, Clone, Serialize)]
pub struct EsiRegister {
    /// Period identifier, "YYYY - MonthName".
    pub period: String,
    /// Rows sorted by employee name.
    pub rows: Vec<EsiRegisterRow>,
    /// Column totals.
    pub totals: EsiRegisterTotals,
}

fn esic_amount(record: &PayrollRecord, kind: ComponentKind) -> Decimal {
    record
        .deductions
        .iter()
        .filter(|line| line.kind == kind)
        .map(|line| line.amount)
        .sum()
}

/// Builds the ESI register from the period's submitted slips.
///
/// Employees whose combined ESIC contribution is zero are skipped; a
/// slip above the wage ceiling carries zero-amount ESIC lines and has
/// nothing to return.
pub fn build_esi_register(
    register: &SlipRegister,
    employees: &[Employee],
    period: PayrollMonth,
) -> EsiRegister {
    let mut rows: Vec<EsiRegisterRow> = register
        .submitted_in(period)
        .into_iter()
        .filter_map(|record| {
            let employee_esi = esic_amount(record, ComponentKind::EsicEmployee);
            let employer_esi = esic_amount(record, ComponentKind::EsicEmployer);
            let total_esi = employee_esi + employer_esi;
            if total_esi == Decimal::ZERO {
                return None;
            }

            let profile = employees.iter().find(|e| e.id == record.employee_id);
            Some(EsiRegisterRow {
                employee_id: record.employee_id.clone(),
                employee_name: record.employee_name.clone(),
                esic_number: profile.and_then(|e| e.esic_number.clone()),
                days_paid: record.days.payment_days,
                gross_salary: record.totals.total_earnings,
                employee_esi,
                employer_esi,
                total_esi,
            })
        })
        .collect();

    rows.sort_by(|a, b| {
        a.employee_name
            .cmp(&b.employee_name)
            .then_with(|| a.employee_id.cmp(&b.employee_id))
    });

    let totals = rows.iter().fold(EsiRegisterTotals::default(), |mut acc, row| {
        acc.employee_esi += row.employee_esi;
        acc.employer_esi += row.employer_esi;
        acc.total_esi += row.total_esi;
        acc
    });

    EsiRegister {
        period: period.identifier(),
        rows,
        totals,
    }
}
