//! Salary component resolution.
//!
//! This module turns an employee's active compensation assignment into the
//! slip's earning and deduction lines for one month. Month-varying
//! components take their base from the catalog's per-month table; fixed
//! components take the assignment's stored base. Zero-amount lines are
//! never emitted. Amounts here are bases only: proration and statutory
//! formulas run later in the pipeline.

use rust_decimal::Decimal;

use crate::models::{
    AuditStep, CompensationAssignment, ComponentCatalog, ComponentLine, ComponentSide,
    PayrollMonth, SlipLine,
};

/// The result of resolving components, including the lines and audit step.
#[derive(Debug, Clone)]
pub struct ComponentResolution {
    /// Resolved earning lines in slip order.
    pub earnings: Vec<SlipLine>,
    /// Resolved deduction lines in slip order.
    pub deductions: Vec<SlipLine>,
    /// The audit step recording this resolution.
    pub audit_step: AuditStep,
}

/// Resolves the slip lines for one employee and month.
///
/// This function produces the two ordered line lists by:
/// 1. Walking the assignment's earning and deduction lines in order,
///    replacing month-varying bases with the catalog's table amount for
///    the target month and dropping lines that resolve to zero or less
/// 2. Sweeping the catalog for month-varying components the assignment
///    does not carry, appending any with a positive amount for the month
///    (seasonal components left out of the static assignment)
///
/// The output is deterministic: assignment order first, then swept
/// components in catalog declaration order. Each line's `amount` starts
/// equal to its resolved base; later pipeline stages replace it.
///
/// # Arguments
///
/// * `assignment` - The employee's compensation assignment active in the month
/// * `catalog` - The component catalog with month-varying tables
/// * `period` - The payroll month
/// * `step_number` - The step number for audit trail sequencing
///
/// # Examples
///
/// ```no_run
/// use payroll_engine::calculation::resolve_components;
/// # let assignment: payroll_engine::models::CompensationAssignment = unimplemented!();
/// # let catalog: payroll_engine::models::ComponentCatalog = unimplemented!();
/// # let period = payroll_engine::models::PayrollMonth::new(2024, 2).unwrap();
///
/// let resolution = resolve_components(&assignment, &catalog, period, 1);
/// for line in &resolution.earnings {
///     println!("{}: {}", line.component_name, line.base_amount);
/// }
/// ```
pub fn resolve_components(
    assignment: &CompensationAssignment,
    catalog: &ComponentCatalog,
    period: PayrollMonth,
    step_number: u32,
) -> ComponentResolution {
    let mut omitted: Vec<String> = Vec::new();

    let mut earnings = resolve_side(&assignment.earnings, catalog, period, &mut omitted);
    let mut deductions = resolve_side(&assignment.deductions, catalog, period, &mut omitted);
    sweep_seasonal(&mut earnings, catalog, ComponentSide::Earning, period);
    sweep_seasonal(&mut deductions, catalog, ComponentSide::Deduction, period);

    let audit_step = AuditStep {
        step_number,
        rule_id: "component_resolution".to_string(),
        rule_name: "Salary Component Resolution".to_string(),
        input: serde_json::json!({
            "period": period.identifier(),
            "assignment_effective_from": assignment.effective_from.to_string(),
            "assignment_earning_lines": assignment.earnings.len(),
            "assignment_deduction_lines": assignment.deductions.len()
        }),
        output: serde_json::json!({
            "earnings": line_summaries(&earnings),
            "deductions": line_summaries(&deductions),
            "omitted": omitted
        }),
        reasoning: format!(
            "Resolved {} earning and {} deduction lines for {}; omitted {} zero-amount line(s)",
            earnings.len(),
            deductions.len(),
            period.identifier(),
            omitted.len()
        ),
    };

    ComponentResolution {
        earnings,
        deductions,
        audit_step,
    }
}

/// Resolves one side of the assignment, recording omissions.
fn resolve_side(
    lines: &[ComponentLine],
    catalog: &ComponentCatalog,
    period: PayrollMonth,
    omitted: &mut Vec<String>,
) -> Vec<SlipLine> {
    let mut resolved = Vec::new();
    for line in lines {
        let component = catalog.get(&line.component_name);
        let table = component.and_then(|c| c.monthly_amounts.as_ref());

        let base = if line.is_month_varying || table.is_some() {
            // The catalog's table is authoritative for month-varying
            // components; a missing entry behaves like zero.
            table.and_then(|t| t.amount_for(period.month))
        } else {
            Some(line.base_amount)
        };

        match base {
            Some(amount) if amount > Decimal::ZERO => resolved.push(SlipLine {
                component_name: line.component_name.clone(),
                abbreviation: line.abbreviation.clone(),
                kind: line.kind,
                base_amount: amount,
                amount,
                depends_on_attendance: line.depends_on_attendance,
                is_employer_side: line.is_employer_side,
            }),
            _ => omitted.push(line.component_name.clone()),
        }
    }
    resolved
}

/// Appends catalog month-varying components the assignment left out.
fn sweep_seasonal(
    resolved: &mut Vec<SlipLine>,
    catalog: &ComponentCatalog,
    side: ComponentSide,
    period: PayrollMonth,
) {
    for component in catalog.month_varying(side) {
        if resolved
            .iter()
            .any(|line| line.component_name == component.name)
        {
            continue;
        }
        let amount = component
            .monthly_amounts
            .as_ref()
            .and_then(|table| table.amount_for(period.month));
        if let Some(amount) = amount {
            if amount > Decimal::ZERO {
                resolved.push(SlipLine {
                    component_name: component.name.clone(),
                    abbreviation: component.abbreviation.clone(),
                    kind: component.kind,
                    base_amount: amount,
                    amount,
                    depends_on_attendance: component.depends_on_attendance,
                    is_employer_side: component.is_employer_side,
                });
            }
        }
    }
}

fn line_summaries(lines: &[SlipLine]) -> Vec<serde_json::Value> {
    lines
        .iter()
        .map(|line| {
            serde_json::json!({
                "component": line.component_name,
                "base": line.base_amount.normalize().to_string()
            })
        })
        .collect()
}
