//! Core [`Registry`] struct: registry parsing and per-domain index loading.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

use ontosync_core::{DomainDescriptor, EntityDescriptor};

use super::error::{IndexLoad, IndexStatus, LoadError, Result, SkippedDomain};

#[derive(Debug, Deserialize)]
struct RegistryFile {
    #[serde(default)]
    domains: Vec<RegistryEntry>,
}

#[derive(Debug, Deserialize)]
struct RegistryEntry {
    id: String,
    root_path: PathBuf,
    /// Newer-style index reference.
    #[serde(default)]
    ontology_index: Option<PathBuf>,
    /// Legacy index reference.
    #[serde(default)]
    entity_index: Option<PathBuf>,
}

impl RegistryEntry {
    /// The newer-style reference wins when both are declared.
    fn into_descriptor(self) -> std::result::Result<DomainDescriptor, SkippedDomain> {
        match self.ontology_index.or(self.entity_index) {
            Some(index_reference) => Ok(DomainDescriptor {
                id: self.id,
                root_path: self.root_path,
                index_reference,
            }),
            None => Err(SkippedDomain {
                domain_id: self.id,
                reason: "no index reference declared".to_string(),
            }),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct IndexFile {
    #[serde(default)]
    entities: Option<Vec<EntityDescriptor>>,
}

/// The ordered list of domains taking part in a sync run.
#[derive(Debug, Clone)]
pub struct Registry {
    /// Path the registry was read from.
    pub path: PathBuf,
    /// Domains in registry order.
    pub domains: Vec<DomainDescriptor>,
    /// Entries dropped because they declare no index.
    pub skipped: Vec<SkippedDomain>,
}

impl Registry {
    /// Load and parse the registry file.
    ///
    /// A missing file is fatal ([`LoadError::NotFound`]).
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(LoadError::NotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)?;
        let mut registry = Self::parse(&content)?;
        registry.path = path.to_path_buf();
        info!(
            path = %path.display(),
            domains = registry.domains.len(),
            skipped = registry.skipped.len(),
            "loaded domain registry"
        );
        Ok(registry)
    }

    /// Parse registry YAML without touching the filesystem.
    pub fn parse(yaml: &str) -> Result<Self> {
        let file: RegistryFile = serde_yaml::from_str(yaml)?;
        let mut domains = Vec::with_capacity(file.domains.len());
        let mut skipped = Vec::new();
        for entry in file.domains {
            match entry.into_descriptor() {
                Ok(domain) => domains.push(domain),
                Err(skip) => {
                    warn!(domain = %skip.domain_id, reason = %skip.reason, "skipping registry entry");
                    skipped.push(skip);
                }
            }
        }
        Ok(Self {
            path: PathBuf::new(),
            domains,
            skipped,
        })
    }

    /// Load the entity index of one domain.
    ///
    /// Never fails: a missing index is reported as [`IndexStatus::Skipped`],
    /// an unreadable one as [`IndexStatus::Failed`].
    pub fn load_index(domain: &DomainDescriptor) -> IndexLoad {
        let path = domain.index_path();
        if !path.exists() {
            warn!(domain = %domain.id, path = %path.display(), "index not found, skipping domain");
            return IndexLoad {
                path,
                status: IndexStatus::Skipped {
                    reason: "index not found".to_string(),
                },
            };
        }

        let status = match fs::read_to_string(&path)
            .map_err(LoadError::from)
            .and_then(|content| parse_index(&content))
        {
            Ok(entities) => {
                info!(domain = %domain.id, entities = entities.len(), "loaded entity index");
                IndexStatus::Loaded { entities }
            }
            Err(e) => {
                warn!(domain = %domain.id, path = %path.display(), error = %e, "failed to load index");
                IndexStatus::Failed {
                    error: e.to_string(),
                }
            }
        };
        IndexLoad { path, status }
    }
}

/// Parse index YAML. Blank input and a missing `entities` key are empty indexes.
pub(super) fn parse_index(yaml: &str) -> Result<Vec<EntityDescriptor>> {
    if yaml.trim().is_empty() {
        return Ok(Vec::new());
    }
    let file: Option<IndexFile> = serde_yaml::from_str(yaml)?;
    Ok(file.unwrap_or_default().entities.unwrap_or_default())
}
