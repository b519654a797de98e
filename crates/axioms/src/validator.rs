//! Sequential evaluation of axiom definitions.

use serde::Serialize;
use tracing::{error, info, warn};

use crate::classify::{classify, ValidationStatus, ERROR_COUNT};
use crate::executor::PredicateExecutor;
use crate::schema::{AxiomDefinition, Severity};

/// Outcome of one axiom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub axiom_id: String,
    pub status: ValidationStatus,
    /// `None` when skipped, [`ERROR_COUNT`] when the predicate failed.
    pub violation_count: Option<i64>,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Results of a validation pass, in definition order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub results: Vec<ValidationResult>,
}

impl ValidationReport {
    /// No `FAIL` and no `ERROR`. `WARN` and `INFO` never gate success.
    pub fn success(&self) -> bool {
        !self.results.iter().any(|r| r.status.is_failure())
    }

    pub fn count(&self, status: ValidationStatus) -> usize {
        self.results.iter().filter(|r| r.status == status).count()
    }

    pub fn get(&self, axiom_id: &str) -> Option<&ValidationResult> {
        self.results.iter().find(|r| r.axiom_id == axiom_id)
    }

    pub fn log_summary(&self) {
        info!(
            total = self.results.len(),
            pass = self.count(ValidationStatus::Pass),
            warn = self.count(ValidationStatus::Warn),
            info = self.count(ValidationStatus::Info),
            fail = self.count(ValidationStatus::Fail),
            error = self.count(ValidationStatus::Error),
            skip = self.count(ValidationStatus::Skip),
            success = self.success(),
            "validation finished"
        );
    }
}

/// Evaluates axioms one at a time, in order.
pub struct Validator<E> {
    executor: E,
}

impl<E: PredicateExecutor> Validator<E> {
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    pub async fn validate(&mut self, axioms: &[AxiomDefinition]) -> ValidationReport {
        let mut report = ValidationReport::default();
        for axiom in axioms {
            let result = self.evaluate(axiom).await;
            log_result(&result);
            report.results.push(result);
        }
        report
    }

    /// Evaluate one axiom. A failing predicate is classified, never propagated.
    pub async fn evaluate(&mut self, axiom: &AxiomDefinition) -> ValidationResult {
        let result = |status, violation_count, message| ValidationResult {
            axiom_id: axiom.id.clone(),
            status,
            violation_count,
            severity: axiom.severity,
            message,
        };

        let Some(query) = axiom.query() else {
            return result(
                ValidationStatus::Skip,
                None,
                Some("no validation query".to_string()),
            );
        };

        match self.executor.count(query).await {
            Ok(count) => {
                let count = count.unwrap_or(0);
                result(classify(count, axiom.severity), Some(count), None)
            }
            Err(e) => result(
                ValidationStatus::Error,
                Some(ERROR_COUNT),
                Some(e.to_string()),
            ),
        }
    }

    pub fn into_executor(self) -> E {
        self.executor
    }
}

fn log_result(r: &ValidationResult) {
    let count = r.violation_count.unwrap_or(0);
    match r.status {
        ValidationStatus::Pass => info!(axiom_id = %r.axiom_id, "PASS"),
        ValidationStatus::Info => {
            info!(axiom_id = %r.axiom_id, violations = count, severity = %r.severity, "INFO")
        }
        ValidationStatus::Warn => {
            warn!(axiom_id = %r.axiom_id, violations = count, severity = %r.severity, "WARN")
        }
        ValidationStatus::Fail => {
            error!(axiom_id = %r.axiom_id, violations = count, severity = %r.severity, "FAIL")
        }
        ValidationStatus::Error => error!(
            axiom_id = %r.axiom_id,
            error = r.message.as_deref().unwrap_or_default(),
            "ERROR"
        ),
        ValidationStatus::Skip => info!(axiom_id = %r.axiom_id, "SKIP: no validation query"),
    }
}
