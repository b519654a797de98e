//! Axiom definition schema as declared in `AXIOMS.yaml`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How a non-zero violation count is classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum Severity {
    /// Violations fail the run.
    Hard,
    /// Violations warn.
    Soft,
    /// Violations are informational; the rule is expected to be temporarily broken.
    Temporal,
    /// Absent or unrecognised severity, treated like `Soft`.
    #[default]
    Unspecified,
}

impl Severity {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_uppercase().as_str() {
            "HARD" => Severity::Hard,
            "SOFT" => Severity::Soft,
            "TEMPORAL" => Severity::Temporal,
            _ => Severity::Unspecified,
        }
    }
}

impl From<Option<String>> for Severity {
    fn from(s: Option<String>) -> Self {
        s.as_deref().map(Severity::parse).unwrap_or_default()
    }
}

impl From<Severity> for Option<String> {
    fn from(s: Severity) -> Self {
        match s {
            Severity::Unspecified => None,
            other => Some(other.to_string()),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Hard => write!(f, "HARD"),
            Severity::Soft => write!(f, "SOFT"),
            Severity::Temporal => write!(f, "TEMPORAL"),
            Severity::Unspecified => write!(f, "UNSPECIFIED"),
        }
    }
}

/// One declarative rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxiomDefinition {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub severity: Severity,
    /// SQL returning the violation count in its first row and column.
    #[serde(rename = "validation_query", default, skip_serializing_if = "Option::is_none")]
    pub predicate_query: Option<String>,
}

impl AxiomDefinition {
    /// The predicate, unless absent or blank.
    pub fn query(&self) -> Option<&str> {
        self.predicate_query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
    }
}
