//! Attendance models.
//!
//! This module defines [`AttendanceStatus`], [`AttendanceRecord`], and
//! [`AttendanceSheet`] — the per-employee collection of daily records that
//! feeds day accounting. The sheet is the write boundary for attendance:
//! construction and marking enforce the one-record-per-day invariant and
//! the marking rules (no future dates except approved leave, nothing before
//! the joining date).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::PayrollMonth;

/// Daily attendance status for an employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    /// Worked a full day.
    Present,
    /// Did not work and was not on approved leave.
    Absent,
    /// Worked half a day; counts 0.5 present and 0.5 absent.
    HalfDay,
    /// On approved paid leave; counts as present for pay.
    OnLeave,
    /// The employee's designated weekly off day.
    WeeklyOff,
    /// A declared holiday; tracked separately from presence and absence.
    Holiday,
    /// Leave without pay; reduces payable days like an absence but is
    /// reported separately.
    LeaveWithoutPay,
    /// Worked remotely; counts as present for pay.
    WorkFromHome,
}

impl AttendanceStatus {
    /// Whether a record with this status may be dated in the future.
    ///
    /// Approved leave is routinely recorded ahead of time; everything else
    /// can only be marked for today or earlier.
    pub fn allowed_in_future(&self) -> bool {
        matches!(self, AttendanceStatus::OnLeave)
    }
}

/// One employee's attendance on one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// The employee the record belongs to.
    pub employee_id: String,
    /// The calendar date.
    pub date: NaiveDate,
    /// The marked status.
    pub status: AttendanceStatus,
}

/// A validated collection of attendance records for a single employee.
///
/// At most one record exists per date. Records are kept sorted by date.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{AttendanceRecord, AttendanceSheet, AttendanceStatus};
/// use chrono::NaiveDate;
///
/// let sheet = AttendanceSheet::new(
///     "EMP-0001".to_string(),
///     vec![AttendanceRecord {
///         employee_id: "EMP-0001".to_string(),
///         date: NaiveDate::from_ymd_opt(2024, 2, 5).unwrap(),
///         status: AttendanceStatus::Present,
///     }],
/// )
/// .unwrap();
/// assert_eq!(sheet.records().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttendanceSheet {
    employee_id: String,
    records: Vec<AttendanceRecord>,
}

impl AttendanceSheet {
    /// Builds a sheet from existing records, enforcing the per-date
    /// uniqueness invariant.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidAttendance`] if any record belongs to a
    /// different employee, or [`EngineError::DuplicateAttendance`] if two
    /// records share a date.
    pub fn new(employee_id: String, mut records: Vec<AttendanceRecord>) -> EngineResult<Self> {
        for record in &records {
            if record.employee_id != employee_id {
                return Err(EngineError::InvalidAttendance {
                    employee_id: employee_id.clone(),
                    message: format!(
                        "record dated {} belongs to employee '{}'",
                        record.date, record.employee_id
                    ),
                });
            }
        }

        records.sort_by_key(|r| r.date);
        for pair in records.windows(2) {
            if pair[0].date == pair[1].date {
                return Err(EngineError::DuplicateAttendance {
                    employee_id,
                    date: pair[0].date,
                });
            }
        }

        Ok(Self {
            employee_id,
            records,
        })
    }

    /// An empty sheet for an employee with no attendance marked yet.
    pub fn empty(employee_id: String) -> Self {
        Self {
            employee_id,
            records: Vec::new(),
        }
    }

    /// The employee this sheet belongs to.
    pub fn employee_id(&self) -> &str {
        &self.employee_id
    }

    /// All records, sorted by date.
    pub fn records(&self) -> &[AttendanceRecord] {
        &self.records
    }

    /// Whether any record exists for the date.
    pub fn has_record_on(&self, date: NaiveDate) -> bool {
        self.records.iter().any(|r| r.date == date)
    }

    /// Records falling within the payroll month, in date order.
    pub fn for_month(&self, period: PayrollMonth) -> Vec<&AttendanceRecord> {
        self.records
            .iter()
            .filter(|r| period.contains(r.date))
            .collect()
    }

    /// Marks attendance for one date, enforcing the marking rules.
    ///
    /// # Errors
    ///
    /// - [`EngineError::DuplicateAttendance`] if the date is already marked.
    /// - [`EngineError::InvalidAttendance`] for a wrong-employee record, a
    ///   future date with a status other than on-leave, or a date before
    ///   the employee joined.
    pub fn mark(
        &mut self,
        record: AttendanceRecord,
        date_of_joining: NaiveDate,
        today: NaiveDate,
    ) -> EngineResult<()> {
        if record.employee_id != self.employee_id {
            return Err(EngineError::InvalidAttendance {
                employee_id: self.employee_id.clone(),
                message: format!("record belongs to employee '{}'", record.employee_id),
            });
        }
        if self.has_record_on(record.date) {
            return Err(EngineError::DuplicateAttendance {
                employee_id: self.employee_id.clone(),
                date: record.date,
            });
        }
        if record.date > today && !record.status.allowed_in_future() {
            return Err(EngineError::InvalidAttendance {
                employee_id: self.employee_id.clone(),
                message: format!("cannot mark attendance for future date {}", record.date),
            });
        }
        if record.date < date_of_joining {
            return Err(EngineError::InvalidAttendance {
                employee_id: self.employee_id.clone(),
                message: format!(
                    "date {} is before the joining date {}",
                    record.date, date_of_joining
                ),
            });
        }

        let position = self
            .records
            .partition_point(|existing| existing.date < record.date);
        self.records.insert(position, record);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn record(employee: &str, on: &str, status: AttendanceStatus) -> AttendanceRecord {
        AttendanceRecord {
            employee_id: employee.to_string(),
            date: date(on),
            status,
        }
    }

    /// AT-001: duplicate dates are rejected at construction
    #[test]
    fn test_new_rejects_duplicate_dates() {
        let result = AttendanceSheet::new(
            "EMP-0001".to_string(),
            vec![
                record("EMP-0001", "2024-02-05", AttendanceStatus::Present),
                record("EMP-0001", "2024-02-05", AttendanceStatus::Absent),
            ],
        );
        assert!(matches!(
            result,
            Err(EngineError::DuplicateAttendance { .. })
        ));
    }

    /// AT-002: records for another employee are rejected
    #[test]
    fn test_new_rejects_foreign_records() {
        let result = AttendanceSheet::new(
            "EMP-0001".to_string(),
            vec![record("EMP-0002", "2024-02-05", AttendanceStatus::Present)],
        );
        assert!(matches!(result, Err(EngineError::InvalidAttendance { .. })));
    }

    /// AT-003: records are sorted by date regardless of input order
    #[test]
    fn test_new_sorts_records_by_date() {
        let sheet = AttendanceSheet::new(
            "EMP-0001".to_string(),
            vec![
                record("EMP-0001", "2024-02-10", AttendanceStatus::Absent),
                record("EMP-0001", "2024-02-05", AttendanceStatus::Present),
                record("EMP-0001", "2024-02-07", AttendanceStatus::HalfDay),
            ],
        )
        .unwrap();
        let dates: Vec<NaiveDate> = sheet.records().iter().map(|r| r.date).collect();
        assert_eq!(
            dates,
            vec![date("2024-02-05"), date("2024-02-07"), date("2024-02-10")]
        );
    }

    /// AT-004: marking an already-marked date is a duplicate
    #[test]
    fn test_mark_rejects_duplicate_date() {
        let mut sheet = AttendanceSheet::new(
            "EMP-0001".to_string(),
            vec![record("EMP-0001", "2024-02-05", AttendanceStatus::Present)],
        )
        .unwrap();

        let result = sheet.mark(
            record("EMP-0001", "2024-02-05", AttendanceStatus::Absent),
            date("2023-01-01"),
            date("2024-02-20"),
        );
        assert!(matches!(
            result,
            Err(EngineError::DuplicateAttendance { .. })
        ));
        assert_eq!(sheet.records().len(), 1);
    }

    /// AT-005: future dates are rejected except for on-leave
    #[test]
    fn test_mark_rejects_future_date_except_leave() {
        let mut sheet = AttendanceSheet::empty("EMP-0001".to_string());
        let today = date("2024-02-20");

        let result = sheet.mark(
            record("EMP-0001", "2024-02-25", AttendanceStatus::Present),
            date("2023-01-01"),
            today,
        );
        assert!(matches!(result, Err(EngineError::InvalidAttendance { .. })));

        sheet
            .mark(
                record("EMP-0001", "2024-02-25", AttendanceStatus::OnLeave),
                date("2023-01-01"),
                today,
            )
            .unwrap();
        assert!(sheet.has_record_on(date("2024-02-25")));
    }

    /// AT-006: dates before joining are rejected
    #[test]
    fn test_mark_rejects_date_before_joining() {
        let mut sheet = AttendanceSheet::empty("EMP-0001".to_string());
        let result = sheet.mark(
            record("EMP-0001", "2024-02-05", AttendanceStatus::Present),
            date("2024-02-10"),
            date("2024-02-20"),
        );
        assert!(matches!(result, Err(EngineError::InvalidAttendance { .. })));
    }

    #[test]
    fn test_mark_keeps_records_sorted() {
        let mut sheet = AttendanceSheet::empty("EMP-0001".to_string());
        let joining = date("2023-01-01");
        let today = date("2024-02-20");

        sheet
            .mark(
                record("EMP-0001", "2024-02-10", AttendanceStatus::Present),
                joining,
                today,
            )
            .unwrap();
        sheet
            .mark(
                record("EMP-0001", "2024-02-05", AttendanceStatus::Present),
                joining,
                today,
            )
            .unwrap();

        let dates: Vec<NaiveDate> = sheet.records().iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![date("2024-02-05"), date("2024-02-10")]);
    }

    #[test]
    fn test_for_month_filters_by_period() {
        let sheet = AttendanceSheet::new(
            "EMP-0001".to_string(),
            vec![
                record("EMP-0001", "2024-01-31", AttendanceStatus::Present),
                record("EMP-0001", "2024-02-05", AttendanceStatus::Present),
                record("EMP-0001", "2024-02-29", AttendanceStatus::Absent),
                record("EMP-0001", "2024-03-01", AttendanceStatus::Present),
            ],
        )
        .unwrap();

        let period = PayrollMonth::new(2024, 2).unwrap();
        let in_month = sheet.for_month(period);
        assert_eq!(in_month.len(), 2);
        assert_eq!(in_month[0].date, date("2024-02-05"));
        assert_eq!(in_month[1].date, date("2024-02-29"));
    }

    #[test]
    fn test_empty_sheet_has_no_records() {
        let sheet = AttendanceSheet::empty("EMP-0001".to_string());
        assert_eq!(sheet.employee_id(), "EMP-0001");
        assert!(sheet.records().is_empty());
        assert!(!sheet.has_record_on(date("2024-02-05")));
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_string(&AttendanceStatus::Present).unwrap(),
            "\"present\""
        );
        assert_eq!(
            serde_json::to_string(&AttendanceStatus::HalfDay).unwrap(),
            "\"half_day\""
        );
        assert_eq!(
            serde_json::to_string(&AttendanceStatus::LeaveWithoutPay).unwrap(),
            "\"leave_without_pay\""
        );
        assert_eq!(
            serde_json::to_string(&AttendanceStatus::WorkFromHome).unwrap(),
            "\"work_from_home\""
        );
    }

    #[test]
    fn test_deserialize_attendance_record() {
        let json = r#"{
            "employee_id": "EMP-0001",
            "date": "2024-02-05",
            "status": "on_leave"
        }"#;
        let parsed: AttendanceRecord = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.employee_id, "EMP-0001");
        assert_eq!(parsed.date, date("2024-02-05"));
        assert_eq!(parsed.status, AttendanceStatus::OnLeave);
    }

    #[test]
    fn test_serialize_sheet() {
        let sheet = AttendanceSheet::new(
            "EMP-0001".to_string(),
            vec![record("EMP-0001", "2024-02-05", AttendanceStatus::Present)],
        )
        .unwrap();
        let json = serde_json::to_string(&sheet).unwrap();
        assert!(json.contains("\"employee_id\":\"EMP-0001\""));
        assert!(json.contains("\"date\":\"2024-02-05\""));
        assert!(json.contains("\"status\":\"present\""));
    }
}
