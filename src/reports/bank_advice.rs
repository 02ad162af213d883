//! Bank advice register.
//!
//! One row per submitted slip: the employee's bank particulars next to
//! the net pay the bank should transfer.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{Employee, PayrollMonth, SlipRegister};

/// Placeholder shown when an employee has no bank profile on file.
const MISSING_DETAIL: &str = "-";

/// One employee's row on the bank advice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BankAdviceRow {
    /// The employee being paid.
    pub employee_id: String,
    /// Display name, the register's sort key.
    pub employee_name: String,
    /// The employee's bank, or a dash when no profile exists.
    pub bank_name: String,
    /// Branch IFSC code, or a dash.
    pub ifsc_code: String,
    /// Account number, or a dash.
    pub account_number: String,
    /// Net pay to transfer.
    pub net_salary: Decimal,
}

/// The bank advice for one period.
#[derive(Debug, Clone, Serialize)]
pub struct BankAdvice {
    /// Period identifier, "YYYY - MonthName".
    pub period: String,
    /// Rows sorted by employee name.
    pub rows: Vec<BankAdviceRow>,
    /// Grand total of net pay across all rows.
    pub total_net_pay: Decimal,
}

/// Builds the bank advice from the period's submitted slips.
///
/// Every submitted slip gets a row; employees without a bank profile in
/// the roster keep their row with dashed bank particulars so the advice
/// still accounts for their net pay.
pub fn build_bank_advice(
    register: &SlipRegister,
    employees: &[Employee],
    period: PayrollMonth,
) -> BankAdvice {
    let mut rows: Vec<BankAdviceRow> = register
        .submitted_in(period)
        .into_iter()
        .map(|record| {
            let account = employees
                .iter()
                .find(|e| e.id == record.employee_id)
                .and_then(|e| e.bank_account.as_ref());
            BankAdviceRow {
                employee_id: record.employee_id.clone(),
                employee_name: record.employee_name.clone(),
                bank_name: account.map_or(MISSING_DETAIL.to_string(), |a| a.bank_name.clone()),
                ifsc_code: account.map_or(MISSING_DETAIL.to_string(), |a| a.ifsc_code.clone()),
                account_number: account
                    .map_or(MISSING_DETAIL.to_string(), |a| a.account_number.clone()),
                net_salary: record.totals.net_pay,
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        a.employee_name
            .cmp(&b.employee_name)
            .then_with(|| a.employee_id.cmp(&b.employee_id))
    });
    let total_net_pay = rows.iter().map(|r| r.net_salary).sum();

    BankAdvice {
        period: period.identifier(),
        rows,
        total_net_pay,
    }
}
