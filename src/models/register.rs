//! In-memory salary slip register.
//!
//! The register enforces the one-slip-per-employee-per-month rule: at most
//! one submitted [`PayrollRecord`] may exist for any (employee, period)
//! pair. Cancelled slips stay in the register for reference but no longer
//! block a fresh submission.

use serde::Serialize;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};

use super::{PayrollMonth, PayrollRecord};

/// The lifecycle state of a registered slip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SlipStatus {
    /// The slip is live and blocks further submissions for its period.
    Submitted,
    /// The slip was cancelled; the period is open for resubmission.
    Cancelled,
}

/// A payroll record together with its register status.
#[derive(Debug, Clone, Serialize)]
pub struct RegisteredSlip {
    /// The immutable computed record.
    pub record: PayrollRecord,
    /// Whether the slip is submitted or cancelled.
    pub status: SlipStatus,
}

/// Holds every slip ever submitted and polices duplicates.
///
/// # Example
///
/// ```no_run
/// use payroll_engine::models::SlipRegister;
///
/// let mut register = SlipRegister::new();
/// # let record: payroll_engine::models::PayrollRecord = unimplemented!();
/// let slip_id = register.submit(record)?;
/// register.cancel(slip_id)?;
/// # Ok::<(), payroll_engine::error::EngineError>(())
/// ```
#[derive(Debug, Default, Serialize)]
pub struct SlipRegister {
    slips: Vec<RegisteredSlip>,
}

impl SlipRegister {
    /// Creates an empty register.
    pub fn new() -> Self {
        Self::default()
    }

    /// Submits a computed record, returning its slip id.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::DuplicateSlip`] when a submitted slip already
    /// covers the record's employee and period.
    pub fn submit(&mut self, record: PayrollRecord) -> EngineResult<Uuid> {
        if self
            .submitted_for(&record.employee_id, record.period)
            .is_some()
        {
            return Err(EngineError::DuplicateSlip {
                employee_id: record.employee_id.clone(),
                period: record.period.identifier(),
            });
        }

        let slip_id = record.slip_id;
        self.slips.push(RegisteredSlip {
            record,
            status: SlipStatus::Submitted,
        });
        Ok(slip_id)
    }

    /// Cancels a submitted slip, freeing its period for resubmission.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::SlipNotFound`] when no submitted slip has
    /// the given id. Cancelling an already-cancelled slip is also an error.
    pub fn cancel(&mut self, slip_id: Uuid) -> EngineResult<()> {
        let slip = self
            .slips
            .iter_mut()
            .find(|slip| slip.record.slip_id == slip_id && slip.status == SlipStatus::Submitted)
            .ok_or_else(|| EngineError::SlipNotFound {
                slip_id: slip_id.to_string(),
            })?;
        slip.status = SlipStatus::Cancelled;
        Ok(())
    }

    /// The submitted slip for an employee and period, if any.
    pub fn submitted_for(
        &self,
        employee_id: &str,
        period: PayrollMonth,
    ) -> Option<&PayrollRecord> {
        self.slips
            .iter()
            .find(|slip| {
                slip.status == SlipStatus::Submitted
                    && slip.record.employee_id == employee_id
                    && slip.record.period == period
            })
            .map(|slip| &slip.record)
    }

    /// All submitted slips for a period, in submission order.
    ///
    /// Statutory registers and the bank advice are built from this view;
    /// cancelled slips never appear in them.
    pub fn submitted_in(&self, period: PayrollMonth) -> Vec<&PayrollRecord> {
        self.slips
            .iter()
            .filter(|slip| slip.status == SlipStatus::Submitted && slip.record.period == period)
            .map(|slip| &slip.record)
            .collect()
    }

    /// The number of slips ever submitted, including cancelled ones.
    pub fn len(&self) -> usize {
        self.slips.len()
    }

    /// Whether the register holds no slips at all.
    pub fn is_empty(&self) -> bool {
        self.slips.is_empty()
    }
}
