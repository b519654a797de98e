use std::fmt;

use serde::Serialize;

use crate::schema::Severity;

/// Violation count recorded when the predicate could not be executed.
pub const ERROR_COUNT: i64 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ValidationStatus {
    Pass,
    Warn,
    Info,
    Fail,
    Error,
    Skip,
}

impl ValidationStatus {
    /// Whether this status makes the whole validation run unsuccessful.
    pub fn is_failure(self) -> bool {
        matches!(self, ValidationStatus::Fail | ValidationStatus::Error)
    }
}

impl fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ValidationStatus::Pass => "PASS",
            ValidationStatus::Warn => "WARN",
            ValidationStatus::Info => "INFO",
            ValidationStatus::Fail => "FAIL",
            ValidationStatus::Error => "ERROR",
            ValidationStatus::Skip => "SKIP",
        };
        f.write_str(s)
    }
}

/// Classify an executed predicate's violation count.
///
/// Negative counts never come from a successful query and are treated as
/// an execution error.
pub fn classify(violations: i64, severity: Severity) -> ValidationStatus {
    match (violations, severity) {
        (n, _) if n < 0 => ValidationStatus::Error,
        (0, _) => ValidationStatus::Pass,
        (_, Severity::Hard) => ValidationStatus::Fail,
        (_, Severity::Temporal) => ValidationStatus::Info,
        (_, Severity::Soft | Severity::Unspecified) => ValidationStatus::Warn,
    }
}
