use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::error::DefinitionError;
use crate::schema::AxiomDefinition;

#[derive(Debug, Default, Deserialize)]
struct AxiomsFile {
    #[serde(default)]
    axioms: Option<Vec<AxiomDefinition>>,
}

/// Load axiom definitions in declaration order.
pub fn load_definitions(path: &Path) -> Result<Vec<AxiomDefinition>, DefinitionError> {
    if !path.exists() {
        return Err(DefinitionError::NotFound(path.to_path_buf()));
    }
    let axioms = parse_definitions(&fs::read_to_string(path)?)?;
    info!(path = %path.display(), axioms = axioms.len(), "loaded axiom definitions");
    Ok(axioms)
}

/// Parse an `AXIOMS.yaml` document. An empty document has no axioms.
pub fn parse_definitions(yaml: &str) -> Result<Vec<AxiomDefinition>, DefinitionError> {
    if yaml.trim().is_empty() {
        return Ok(Vec::new());
    }
    let file: Option<AxiomsFile> = serde_yaml::from_str(yaml)?;
    Ok(file.unwrap_or_default().axioms.unwrap_or_default())
}
