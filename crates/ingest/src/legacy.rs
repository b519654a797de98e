//! Conversion of legacy `ENTITY_INDEX` files to the current index format.
//!
//! Legacy entries carry a bare `name`, a `trust_level` and an `original_doc`.
//! Converted entries get a qualified name: promoted names move to the shared
//! scope and are owned by every partner domain, everything else is scoped to
//! the converting domain.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use ontosync_core::EntityDescriptor;

use crate::loader::Result;

const CANONICAL_TRUST: &str = "CANONICAL";

#[derive(Debug, Clone, Deserialize)]
pub struct LegacyEntity {
    pub name: String,
    #[serde(default)]
    pub semantic_doc: Option<String>,
    #[serde(default)]
    pub original_doc: Option<String>,
    #[serde(default)]
    pub trust_level: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LegacyIndexFile {
    #[serde(default)]
    entities: Option<Vec<LegacyEntity>>,
}

#[derive(Debug, Serialize)]
struct IndexFileOut<'a> {
    entities: &'a [EntityDescriptor],
}

/// How one domain's legacy index is promoted.
#[derive(Debug, Clone)]
pub struct Migration {
    /// Domain owning the legacy index, e.g. `SAAS`.
    pub domain_id: String,
    /// Qualified-name prefix of the shared scope, e.g. `ECOSYSTEM.`.
    pub shared_prefix: String,
    /// Legacy names promoted to the shared scope.
    pub promoted: BTreeSet<String>,
    /// Domains owning promoted entities.
    pub partners: BTreeSet<String>,
}

impl Migration {
    /// Convert one legacy entry.
    pub fn convert(&self, legacy: &LegacyEntity) -> EntityDescriptor {
        let (qualified_name, domains) = if self.promoted.contains(&legacy.name) {
            let mut domains = self.partners.clone();
            domains.insert(self.domain_id.clone());
            (format!("{}{}", self.shared_prefix, legacy.name), domains)
        } else {
            (
                format!("{}.{}", self.domain_id, legacy.name),
                BTreeSet::from([self.domain_id.clone()]),
            )
        };

        // Legacy docs were relative to the index directory; the new layout is one level down.
        let agentic_doc_ref = legacy.original_doc.as_deref().map(|doc| {
            if doc.starts_with("..") {
                doc.to_string()
            } else {
                format!("../{}", doc.replace('\\', "/"))
            }
        });

        let tier = if legacy.trust_level.as_deref() == Some(CANONICAL_TRUST) { 1 } else { 2 };

        EntityDescriptor {
            qualified_name,
            semantic_doc_ref: legacy.semantic_doc.clone(),
            agentic_doc_ref,
            domains,
            tier,
            status: "ACTIVE".to_string(),
        }
    }

    /// Convert every entry of a legacy index document, preserving order.
    pub fn convert_yaml(&self, yaml: &str) -> Result<Vec<EntityDescriptor>> {
        if yaml.trim().is_empty() {
            return Ok(Vec::new());
        }
        let file: Option<LegacyIndexFile> = serde_yaml::from_str(yaml)?;
        Ok(file
            .unwrap_or_default()
            .entities
            .unwrap_or_default()
            .iter()
            .map(|e| self.convert(e))
            .collect())
    }

    /// Convert the legacy index at `from` and write the result to `to`.
    ///
    /// Returns `Ok(None)` when the legacy file does not exist.
    pub fn run(&self, from: &Path, to: &Path) -> Result<Option<usize>> {
        if !from.exists() {
            warn!(domain = %self.domain_id, path = %from.display(), "legacy index not found, skipping");
            return Ok(None);
        }
        let entities = self.convert_yaml(&fs::read_to_string(from)?)?;
        let yaml = serde_yaml::to_string(&IndexFileOut { entities: &entities })?;
        fs::write(to, yaml)?;
        info!(
            domain = %self.domain_id,
            entities = entities.len(),
            path = %to.display(),
            "wrote migrated index"
        );
        Ok(Some(entities.len()))
    }
}
