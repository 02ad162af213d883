//! Salary component models.
//!
//! This module defines the component catalog: every earning or deduction
//! that can appear on a salary slip is described by a [`SalaryComponent`],
//! tagged with a [`ComponentKind`] that drives statutory dispatch and
//! gross-composition accounting. Month-varying components (seasonal
//! bonuses, festival advances) own an immutable [`MonthlyAmounts`] table
//! keyed by calendar month.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::period::MONTH_NAMES;

/// Which side of the slip a component lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentSide {
    /// Adds to gross earnings.
    Earning,
    /// Subtracts from gross earnings (or is an employer-side contribution).
    Deduction,
}

/// Semantic tag on a component, dispatched by `match` wherever the source
/// system matched on name substrings.
///
/// Earning-side kinds identify the lines statutory rules need (basic and
/// dearness allowance feed provident fund, conveyance adjusts the ESIC
/// base, variable lines scale with the division's variable-pay
/// percentage). Deduction-side kinds select the statutory formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    /// Basic salary; part of the provident fund wage.
    Basic,
    /// Dearness allowance; part of the provident fund wage.
    DearnessAllowance,
    /// Conveyance allowance; excluded from the ESIC wage base.
    Conveyance,
    /// Scales with the division's variable-pay percentage for the month.
    Variable,
    /// Employee or employer provident fund contribution.
    ProvidentFund,
    /// Employee ESIC contribution (0.75% band).
    EsicEmployee,
    /// Employer ESIC contribution (3.25% band).
    EsicEmployer,
    /// Professional tax (month-dependent flat amount on the slip).
    ProfessionalTax,
    /// Retention deposit withheld from pay and returned later.
    Retention,
    /// No special treatment.
    #[default]
    Other,
}

impl ComponentKind {
    /// Whether the kind is meaningful on the given side of the slip.
    pub fn valid_for_side(&self, side: ComponentSide) -> bool {
        match self {
            ComponentKind::Basic
            | ComponentKind::DearnessAllowance
            | ComponentKind::Conveyance
            | ComponentKind::Variable => side == ComponentSide::Earning,
            ComponentKind::ProvidentFund
            | ComponentKind::EsicEmployee
            | ComponentKind::EsicEmployer
            | ComponentKind::ProfessionalTax
            | ComponentKind::Retention => side == ComponentSide::Deduction,
            ComponentKind::Other => true,
        }
    }
}

/// Immutable per-month amount table for a month-varying component.
///
/// Serialized as a map keyed by English month name, the same shape the
/// twelve-row month tables take in configuration:
///
/// ```yaml
/// monthly_amounts:
///   January: 0
///   June: 5000
/// ```
///
/// Months without an entry behave like a zero amount: the component is
/// omitted for them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, Decimal>",
    into = "BTreeMap<String, Decimal>"
)]
pub struct MonthlyAmounts {
    amounts: BTreeMap<u32, Decimal>,
}

impl MonthlyAmounts {
    /// The amount for a month (1-12), if the table has an entry.
    pub fn amount_for(&self, month: u32) -> Option<Decimal> {
        self.amounts.get(&month).copied()
    }
}

impl TryFrom<BTreeMap<String, Decimal>> for MonthlyAmounts {
    type Error = String;

    fn try_from(named: BTreeMap<String, Decimal>) -> Result<Self, Self::Error> {
        let mut amounts = BTreeMap::new();
        for (name, amount) in named {
            let month = MONTH_NAMES
                .iter()
                .position(|m| m.eq_ignore_ascii_case(&name))
                .map(|i| i as u32 + 1)
                .ok_or_else(|| format!("unknown month name '{}'", name))?;
            if amount < Decimal::ZERO {
                return Err(format!("negative amount for {}", name));
            }
            amounts.insert(month, amount);
        }
        Ok(Self { amounts })
    }
}

impl From<MonthlyAmounts> for BTreeMap<String, Decimal> {
    fn from(table: MonthlyAmounts) -> Self {
        table
            .amounts
            .into_iter()
            .map(|(month, amount)| (MONTH_NAMES[(month - 1) as usize].to_string(), amount))
            .collect()
    }
}

/// A salary component definition from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryComponent {
    /// Display name, unique within the catalog.
    pub name: String,
    /// Short code used on slips and registers (e.g. "B", "DA", "PF").
    pub abbreviation: String,
    /// Earning or deduction.
    pub side: ComponentSide,
    /// Semantic tag for statutory dispatch; defaults to no special
    /// treatment.
    #[serde(default)]
    pub kind: ComponentKind,
    /// Whether amounts prorate by payment days against working days.
    #[serde(default)]
    pub depends_on_attendance: bool,
    /// Employer-side contributions are excluded from net pay.
    #[serde(default)]
    pub is_employer_side: bool,
    /// Present only for month-varying components.
    #[serde(default)]
    pub monthly_amounts: Option<MonthlyAmounts>,
}

impl SalaryComponent {
    /// Whether the component's amount is looked up per calendar month.
    pub fn is_month_varying(&self) -> bool {
        self.monthly_amounts.is_some()
    }
}

/// The validated set of salary components known to the engine.
///
/// Names are unique (case-insensitively) and each component's kind is
/// coherent with its side. Iteration order is the catalog's declaration
/// order, which keeps resolution output deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentCatalog {
    components: Vec<SalaryComponent>,
}

impl ComponentCatalog {
    /// Builds a catalog, validating name uniqueness and kind/side
    /// coherence.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidComponent`] naming the offending
    /// component.
    pub fn new(components: Vec<SalaryComponent>) -> EngineResult<Self> {
        for (index, component) in components.iter().enumerate() {
            if !component.kind.valid_for_side(component.side) {
                return Err(EngineError::InvalidComponent {
                    name: component.name.clone(),
                    message: format!(
                        "kind {:?} is not valid on the {:?} side",
                        component.kind, component.side
                    ),
                });
            }
            let clash = components[..index]
                .iter()
                .any(|other| other.name.eq_ignore_ascii_case(&component.name));
            if clash {
                return Err(EngineError::InvalidComponent {
                    name: component.name.clone(),
                    message: "duplicate component name".to_string(),
                });
            }
        }
        Ok(Self { components })
    }

    /// Looks up a component by exact name.
    pub fn get(&self, name: &str) -> Option<&SalaryComponent> {
        self.components.iter().find(|c| c.name == name)
    }

    /// All components in declaration order.
    pub fn components(&self) -> &[SalaryComponent] {
        &self.components
    }

    /// Month-varying components on one side, in declaration order.
    pub fn month_varying(&self, side: ComponentSide) -> impl Iterator<Item = &SalaryComponent> {
        self.components
            .iter()
            .filter(move |c| c.side == side && c.is_month_varying())
    }
}
