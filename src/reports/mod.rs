//! Statutory registers derived from submitted payroll records.
//!
//! Each register is a pure derivation over the slip register for one
//! period: bank advice for salary transfer, and the PF, ESI, and
//! professional tax returns. Rows sort by employee name and skip
//! employees with nothing to report.

mod bank_advice;
mod esi_register;
mod pf_register;
mod pt_register;

pub use bank_advice::{BankAdvice, BankAdviceRow, build_bank_advice};
pub use esi_register::{EsiRegister, EsiRegisterRow, EsiRegisterTotals, build_esi_register};
pub use pf_register::{
    PF_WAGE_CEILING, PfRegister, PfRegisterRow, PfRegisterTotals, build_pf_register,
};
pub use pt_register::{PtRegister, PtRegisterRow, build_pt_register};
