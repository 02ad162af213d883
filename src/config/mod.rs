//! Configuration loading and management for the payroll engine.
//!
//! This module provides functionality to load engine configuration from
//! YAML files, including statutory deduction rules, the salary component
//! catalog, and variable-pay percentage assignments.
//!
//! # Example
//!
//! ```no_run
//! use payroll_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config").unwrap();
//! println!("ESIC ceiling: {}", config.statutory().esic.gross_ceiling);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    ComponentsConfig, DivisionPercentage, EngineConfig, EsicConfig, PfConfig, PfWageBase,
    ProfessionalTaxConfig, ProfessionalTaxSlab, StatutoryConfig, VariablePayConfig,
    VariablePayPeriod, VariablePayTable,
};
