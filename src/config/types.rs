//! Configuration types for statutory deduction rules and variable pay.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::{EngineError, EngineResult};
use crate::models::{ComponentCatalog, PayrollMonth, SalaryComponent};

/// Employee State Insurance Corporation contribution rules.
#[derive(Debug, Clone, Deserialize)]
pub struct EsicConfig {
    /// Employee contribution, percent of the ESIC wage.
    pub employee_percent: Decimal,
    /// Employer contribution, percent of the ESIC wage.
    pub employer_percent: Decimal,
    /// ESIC applies only while the wage is strictly below this ceiling.
    pub gross_ceiling: Decimal,
}

/// Which wage the provident fund percentage is applied to.
///
/// Both variants are in active use; a deployment must choose one
/// explicitly, there is no default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PfWageBase {
    /// Basic plus dearness allowance, capped at the statutory ceiling.
    Capped {
        /// The wage ceiling, 15,000 under the current EPF scheme.
        ceiling: Decimal,
    },
    /// The full basic plus dearness allowance, uncapped.
    Uncapped,
}

/// Provident fund contribution rules.
#[derive(Debug, Clone, Deserialize)]
pub struct PfConfig {
    /// Employee contribution, percent of the PF wage.
    pub percent: Decimal,
    /// The wage the percentage applies to.
    pub wage_base: PfWageBase,
}

/// One gross-salary band of the professional tax slab table.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfessionalTaxSlab {
    /// Lower bound of the band, inclusive.
    pub from_gross: Decimal,
    /// Upper bound of the band, inclusive. The top band is open-ended.
    pub to_gross: Option<Decimal>,
    /// Monthly tax for salaries in this band.
    pub amount: Decimal,
}

/// Professional tax rules.
///
/// Salary slips apply the flat monthly amount (with the February
/// override); the slab table is used by the statutory register report.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfessionalTaxConfig {
    /// Flat monthly deduction outside February.
    pub monthly_amount: Decimal,
    /// Flat deduction in February, when the annual balance is collected.
    pub february_amount: Decimal,
    /// Gross-salary bands for register reporting.
    pub slabs: Vec<ProfessionalTaxSlab>,
}

/// Statutory configuration from statutory.yaml.
#[derive(Debug, Clone, Deserialize)]
pub struct StatutoryConfig {
    /// ESIC contribution rules.
    pub esic: EsicConfig,
    /// Provident fund contribution rules.
    pub pf: PfConfig,
    /// Professional tax rules.
    pub professional_tax: ProfessionalTaxConfig,
}

impl StatutoryConfig {
    /// Checks the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`] when a rate is outside
    /// 0-100, a ceiling is not positive, or the slab table is unordered
    /// or overlapping.
    pub fn validate(&self) -> EngineResult<()> {
        let percent_range = Decimal::ZERO..=Decimal::ONE_HUNDRED;
        for (name, percent) in [
            ("esic.employee_percent", self.esic.employee_percent),
            ("esic.employer_percent", self.esic.employer_percent),
            ("pf.percent", self.pf.percent),
        ] {
            if !percent_range.contains(&percent) {
                return Err(EngineError::InvalidConfig {
                    message: format!("{} must be between 0 and 100, got {}", name, percent),
                });
            }
        }

        if self.esic.gross_ceiling <= Decimal::ZERO {
            return Err(EngineError::InvalidConfig {
                message: format!(
                    "esic.gross_ceiling must be positive, got {}",
                    self.esic.gross_ceiling
                ),
            });
        }
        if let PfWageBase::Capped { ceiling } = self.pf.wage_base {
            if ceiling <= Decimal::ZERO {
                return Err(EngineError::InvalidConfig {
                    message: format!("pf wage ceiling must be positive, got {}", ceiling),
                });
            }
        }

        if self.professional_tax.monthly_amount < Decimal::ZERO
            || self.professional_tax.february_amount < Decimal::ZERO
        {
            return Err(EngineError::InvalidConfig {
                message: "professional tax amounts must not be negative".to_string(),
            });
        }
        self.validate_slabs()
    }

    fn validate_slabs(&self) -> EngineResult<()> {
        let slabs = &self.professional_tax.slabs;
        for (index, slab) in slabs.iter().enumerate() {
            if slab.amount < Decimal::ZERO {
                return Err(EngineError::InvalidConfig {
                    message: format!("professional tax slab {} has a negative amount", index),
                });
            }
            if let Some(to_gross) = slab.to_gross {
                if to_gross < slab.from_gross {
                    return Err(EngineError::InvalidConfig {
                        message: format!("professional tax slab {} has an inverted range", index),
                    });
                }
            } else if index + 1 != slabs.len() {
                return Err(EngineError::InvalidConfig {
                    message: format!(
                        "professional tax slab {} is open-ended but not the last band",
                        index
                    ),
                });
            }
        }
        for pair in slabs.windows(2) {
            let prev_to = pair[0].to_gross.expect("checked: only last band open-ended");
            if pair[1].from_gross <= prev_to {
                return Err(EngineError::InvalidConfig {
                    message: format!(
                        "professional tax slabs overlap at gross {}",
                        pair[1].from_gross
                    ),
                });
            }
        }
        Ok(())
    }

    /// The register slab amount for a gross salary, zero when no band matches.
    pub fn slab_amount_for(&self, gross: Decimal) -> Decimal {
        self.professional_tax
            .slabs
            .iter()
            .find(|slab| {
                gross >= slab.from_gross && slab.to_gross.is_none_or(|to_gross| gross <= to_gross)
            })
            .map(|slab| slab.amount)
            .unwrap_or(Decimal::ZERO)
    }
}

/// Variable-pay percentage for one division.
#[derive(Debug, Clone, Deserialize)]
pub struct DivisionPercentage {
    /// The division the percentage applies to.
    pub division: String,
    /// Percentage of the variable component's base paid this period, 0-100.
    pub percentage: Decimal,
}

/// Variable-pay percentages for one payroll period.
#[derive(Debug, Clone, Deserialize)]
pub struct VariablePayPeriod {
    /// The period identifier, e.g. "2024 - February".
    pub period: String,
    /// Per-division percentages for the period.
    pub divisions: Vec<DivisionPercentage>,
}

/// Components configuration file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct ComponentsConfig {
    /// The declared salary components, in slip order.
    pub components: Vec<SalaryComponent>,
}

/// Variable-pay configuration file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct VariablePayConfig {
    /// Per-period variable-pay assignments.
    pub assignments: Vec<VariablePayPeriod>,
}

/// Validated per-division, per-period variable-pay percentages.
#[derive(Debug, Clone)]
pub struct VariablePayTable {
    assignments: Vec<VariablePayPeriod>,
}

impl VariablePayTable {
    /// Builds the table, validating every assignment.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`] when a period identifier is
    /// malformed or repeated, a division appears twice in one period, a
    /// percentage is outside 0-100, or a period's percentages sum to more
    /// than 100.
    pub fn new(assignments: Vec<VariablePayPeriod>) -> EngineResult<Self> {
        for (index, assignment) in assignments.iter().enumerate() {
            PayrollMonth::from_identifier(&assignment.period).map_err(|_| {
                EngineError::InvalidConfig {
                    message: format!(
                        "variable pay assignment {} has invalid period '{}'",
                        index, assignment.period
                    ),
                }
            })?;

            if assignments[..index]
                .iter()
                .any(|earlier| earlier.period == assignment.period)
            {
                return Err(EngineError::InvalidConfig {
                    message: format!(
                        "duplicate variable pay assignment for period '{}'",
                        assignment.period
                    ),
                });
            }

            let mut total = Decimal::ZERO;
            for (division_index, entry) in assignment.divisions.iter().enumerate() {
                if entry.percentage < Decimal::ZERO || entry.percentage > Decimal::ONE_HUNDRED {
                    return Err(EngineError::InvalidConfig {
                        message: format!(
                            "variable pay percentage for division '{}' in '{}' must be 0-100",
                            entry.division, assignment.period
                        ),
                    });
                }
                if assignment.divisions[..division_index]
                    .iter()
                    .any(|earlier| earlier.division == entry.division)
                {
                    return Err(EngineError::InvalidConfig {
                        message: format!(
                            "division '{}' appears twice in period '{}'",
                            entry.division, assignment.period
                        ),
                    });
                }
                total += entry.percentage;
            }
            if total > Decimal::ONE_HUNDRED {
                return Err(EngineError::InvalidConfig {
                    message: format!(
                        "variable pay percentages for '{}' exceed 100",
                        assignment.period
                    ),
                });
            }
        }

        Ok(Self { assignments })
    }

    /// The percentage assigned to a division for a period, if any.
    pub fn percentage_for(&self, division: &str, period: PayrollMonth) -> Option<Decimal> {
        let identifier = period.identifier();
        self.assignments
            .iter()
            .find(|assignment| assignment.period == identifier)?
            .divisions
            .iter()
            .find(|entry| entry.division == division)
            .map(|entry| entry.percentage)
    }

    /// All validated assignments.
    pub fn assignments(&self) -> &[VariablePayPeriod] {
        &self.assignments
    }
}

/// The complete engine configuration loaded from YAML files.
///
/// This struct aggregates all configuration loaded from the various
/// YAML files in a configuration directory.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Statutory deduction rules.
    statutory: StatutoryConfig,
    /// The declared salary components.
    catalog: ComponentCatalog,
    /// Variable-pay percentages.
    variable_pay: VariablePayTable,
}

impl EngineConfig {
    /// Creates a new EngineConfig from its component parts.
    pub fn new(
        statutory: StatutoryConfig,
        catalog: ComponentCatalog,
        variable_pay: VariablePayTable,
    ) -> EngineResult<Self> {
        statutory.validate()?;
        Ok(Self {
            statutory,
            catalog,
            variable_pay,
        })
    }

    /// Returns the statutory deduction rules.
    pub fn statutory(&self) -> &StatutoryConfig {
        &self.statutory
    }

    /// Returns the component catalog.
    pub fn catalog(&self) -> &ComponentCatalog {
        &self.catalog
    }

    /// Returns the variable-pay table.
    pub fn variable_pay(&self) -> &VariablePayTable {
        &self.variable_pay
    }
}
