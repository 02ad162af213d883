//! Error types for the payroll computation engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur during payroll computation.

use chrono::NaiveDate;
use thiserror::Error;

/// The main error type for the payroll computation engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use payroll_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/file.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/file.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Configuration parsed but failed a consistency check.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// A description of the inconsistency.
        message: String,
    },

    /// No compensation assignment is active for the employee on the date.
    ///
    /// The employee is not payroll-eligible for the period; batch drivers
    /// record this and move on rather than aborting.
    #[error("No active compensation assignment for employee '{employee_id}' on {date}")]
    AssignmentNotFound {
        /// The employee whose assignment was requested.
        employee_id: String,
        /// The date for which an active assignment was requested.
        date: NaiveDate,
    },

    /// A division carries variable-pay components but has no percentage
    /// assigned for the period.
    #[error("No variable pay assignment for division '{division}' in period '{period}'")]
    VariablePayNotAssigned {
        /// The division that required a percentage.
        division: String,
        /// The period identifier, e.g. "2024 - February".
        period: String,
    },

    /// A second attendance record was supplied for the same employee and date.
    #[error("Duplicate attendance for employee '{employee_id}' on {date}")]
    DuplicateAttendance {
        /// The employee with the conflicting records.
        employee_id: String,
        /// The date marked twice.
        date: NaiveDate,
    },

    /// A payroll record already exists for the employee and period.
    #[error("Salary slip already exists for employee '{employee_id}' in period '{period}'")]
    DuplicateSlip {
        /// The employee with an existing slip.
        employee_id: String,
        /// The period identifier, e.g. "2024 - February".
        period: String,
    },

    /// No submitted slip with the given id exists in the register.
    #[error("No submitted salary slip with id '{slip_id}'")]
    SlipNotFound {
        /// The slip id that was requested.
        slip_id: String,
    },

    /// An attendance record violated a marking rule.
    #[error("Invalid attendance for employee '{employee_id}': {message}")]
    InvalidAttendance {
        /// The employee the record belongs to.
        employee_id: String,
        /// A description of the violated rule.
        message: String,
    },

    /// A compensation assignment was invalid or inconsistent.
    #[error("Invalid assignment for employee '{employee_id}': {message}")]
    InvalidAssignment {
        /// The employee the assignment belongs to.
        employee_id: String,
        /// A description of what made the assignment invalid.
        message: String,
    },

    /// An employee record was invalid or contained inconsistent data.
    #[error("Invalid employee field '{field}': {message}")]
    InvalidEmployee {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// A salary component definition was invalid.
    #[error("Invalid salary component '{name}': {message}")]
    InvalidComponent {
        /// The component name.
        name: String,
        /// A description of what made the component invalid.
        message: String,
    },

    /// A general calculation error occurred.
    #[error("Calculation error: {message}")]
    CalculationError {
        /// A description of the calculation error.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/file.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/file.yaml"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = EngineError::ConfigParseError {
            path: "/config/bad.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/bad.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_invalid_config_displays_message() {
        let error = EngineError::InvalidConfig {
            message: "variable pay percentages for '2024 - February' exceed 100".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid configuration: variable pay percentages for '2024 - February' exceed 100"
        );
    }

    #[test]
    fn test_assignment_not_found_displays_employee_and_date() {
        let error = EngineError::AssignmentNotFound {
            employee_id: "EMP-0007".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
        };
        assert_eq!(
            error.to_string(),
            "No active compensation assignment for employee 'EMP-0007' on 2024-02-01"
        );
    }

    #[test]
    fn test_variable_pay_not_assigned_displays_division_and_period() {
        let error = EngineError::VariablePayNotAssigned {
            division: "Stitching".to_string(),
            period: "2024 - February".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "No variable pay assignment for division 'Stitching' in period '2024 - February'"
        );
    }

    #[test]
    fn test_duplicate_attendance_displays_employee_and_date() {
        let error = EngineError::DuplicateAttendance {
            employee_id: "EMP-0001".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 2, 12).unwrap(),
        };
        assert_eq!(
            error.to_string(),
            "Duplicate attendance for employee 'EMP-0001' on 2024-02-12"
        );
    }

    #[test]
    fn test_duplicate_slip_displays_employee_and_period() {
        let error = EngineError::DuplicateSlip {
            employee_id: "EMP-0001".to_string(),
            period: "2024 - February".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Salary slip already exists for employee 'EMP-0001' in period '2024 - February'"
        );
    }

    #[test]
    fn test_slip_not_found_displays_id() {
        let error = EngineError::SlipNotFound {
            slip_id: "00000000-0000-0000-0000-000000000000".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "No submitted salary slip with id '00000000-0000-0000-0000-000000000000'"
        );
    }

    #[test]
    fn test_invalid_employee_displays_field_and_message() {
        let error = EngineError::InvalidEmployee {
            field: "employment_history".to_string(),
            message: "more than one open employment period".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid employee field 'employment_history': more than one open employment period"
        );
    }

    #[test]
    fn test_invalid_component_displays_name_and_message() {
        let error = EngineError::InvalidComponent {
            name: "Attendance Bonus".to_string(),
            message: "negative amount for March".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid salary component 'Attendance Bonus': negative amount for March"
        );
    }

    #[test]
    fn test_calculation_error_displays_message() {
        let error = EngineError::CalculationError {
            message: "negative payment days".to_string(),
        };
        assert_eq!(error.to_string(), "Calculation error: negative payment days");
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_config_not_found() -> EngineResult<()> {
            Err(EngineError::ConfigNotFound {
                path: "/test".to_string(),
            })
        }

        fn propagates_error() -> EngineResult<()> {
            returns_config_not_found()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
