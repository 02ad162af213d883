//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading engine
//! configuration from YAML files.

use rust_decimal::Decimal;
use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};
use crate::models::{ComponentCatalog, PayrollMonth, SalaryComponent};

use super::types::{
    ComponentsConfig, EngineConfig, StatutoryConfig, VariablePayConfig, VariablePayTable,
};

/// Loads and provides access to engine configuration.
///
/// The `ConfigLoader` reads YAML configuration files from a directory
/// and provides methods to query statutory rules, salary components,
/// and variable-pay percentages.
///
/// # Directory Structure
///
/// The configuration directory should have the following structure:
/// ```text
/// config/
/// ├── statutory.yaml     # PF, ESIC, and professional tax rules
/// ├── components.yaml    # The salary component catalog
/// └── variable_pay.yaml  # Per-division variable-pay percentages
/// ```
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::ConfigLoader;
/// use payroll_engine::models::PayrollMonth;
///
/// let loader = ConfigLoader::load("./config").unwrap();
///
/// // Get a component from the catalog
/// let component = loader.get_component("Basic").unwrap();
/// println!("Component: {} ({})", component.name, component.abbreviation);
///
/// // Get the variable-pay percentage for a division
/// let period = PayrollMonth::new(2024, 2).unwrap();
/// let percentage = loader.get_variable_percentage("Stitching", period).unwrap();
/// println!("Variable pay: {}%", percentage);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: EngineConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration directory (e.g., "./config")
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing
    /// - Any file contains invalid YAML
    /// - Any loaded section fails its consistency checks
    ///
    /// # Example
    ///
    /// ```no_run
    /// use payroll_engine::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::load("./config")?;
    /// # Ok::<(), payroll_engine::error::EngineError>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        // Load statutory.yaml
        let statutory_path = path.join("statutory.yaml");
        let statutory = Self::load_yaml::<StatutoryConfig>(&statutory_path)?;

        // Load components.yaml
        let components_path = path.join("components.yaml");
        let components_config = Self::load_yaml::<ComponentsConfig>(&components_path)?;
        let catalog = ComponentCatalog::new(components_config.components)?;

        // Load variable_pay.yaml
        let variable_pay_path = path.join("variable_pay.yaml");
        let variable_pay_config = Self::load_yaml::<VariablePayConfig>(&variable_pay_path)?;
        let variable_pay = VariablePayTable::new(variable_pay_config.assignments)?;

        let config = EngineConfig::new(statutory, catalog, variable_pay)?;

        Ok(Self { config })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the underlying engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the statutory deduction rules.
    pub fn statutory(&self) -> &StatutoryConfig {
        self.config.statutory()
    }

    /// Returns the component catalog.
    pub fn catalog(&self) -> &ComponentCatalog {
        self.config.catalog()
    }

    /// Gets a component from the catalog by its exact name.
    ///
    /// # Arguments
    ///
    /// * `name` - The component name (e.g., "Provident Fund")
    ///
    /// # Returns
    ///
    /// Returns the component if declared, or `InvalidComponent` error.
    pub fn get_component(&self, name: &str) -> EngineResult<&SalaryComponent> {
        self.config
            .catalog()
            .get(name)
            .ok_or_else(|| EngineError::InvalidComponent {
                name: name.to_string(),
                message: "not declared in the component catalog".to_string(),
            })
    }

    /// Gets the variable-pay percentage for a division and period.
    ///
    /// # Arguments
    ///
    /// * `division` - The division the employee belongs to
    /// * `period` - The payroll month
    ///
    /// # Returns
    ///
    /// Returns the percentage (0-100), or `VariablePayNotAssigned` when
    /// the period or division has no entry.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use payroll_engine::config::ConfigLoader;
    /// use payroll_engine::models::PayrollMonth;
    ///
    /// let loader = ConfigLoader::load("./config")?;
    /// let period = PayrollMonth::new(2024, 2).unwrap();
    /// let percentage = loader.get_variable_percentage("Stitching", period)?;
    /// println!("Variable pay: {}%", percentage);
    /// # Ok::<(), payroll_engine::error::EngineError>(())
    /// ```
    pub fn get_variable_percentage(
        &self,
        division: &str,
        period: PayrollMonth,
    ) -> EngineResult<Decimal> {
        self.config
            .variable_pay()
            .percentage_for(division, period)
            .ok_or_else(|| EngineError::VariablePayNotAssigned {
                division: division.to_string(),
                period: period.identifier(),
            })
    }
}
