//! Monthly payroll computation engine
//!
//! This crate computes monthly salary slips from attendance sheets and
//! compensation assignments: day accounting, component resolution with
//! variable pay, statutory deductions (PF, ESIC, professional tax), and
//! the statutory registers derived from submitted slips.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod reports;
