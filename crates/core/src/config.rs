use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

fn profiled_env_u16(profile: &str, key: &str, default: u16) -> u16 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn profiled_env_u32(profile: &str, key: &str, default: u32) -> u32 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Default reserved prefix for entities jointly owned by several domains.
pub const DEFAULT_SHARED_PREFIX: &str = "ECOSYSTEM.";

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub sources: SourcesConfig,
    pub postgres: PostgresConfig,
    pub ontology: OntologyConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// With a non-empty profile (e.g. `PROD`), every key is first looked up as
    /// `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            sources: SourcesConfig::from_env_profiled(p),
            postgres: PostgresConfig::from_env_profiled(p),
            ontology: OntologyConfig::from_env_profiled(p),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!("  registry:    {}", self.sources.registry_path.display());
        tracing::info!("  axioms:      {}", self.sources.axioms_path.display());
        tracing::info!("  postgres:    host={}, db={}, configured={}", self.postgres.host, self.postgres.database, self.postgres.is_configured());
        tracing::info!("  ontology:    table={}, shared_prefix={}", self.ontology.entity_table, self.ontology.shared_prefix);
    }
}

// ── Input sources ─────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesConfig {
    /// Top-level domain registry YAML.
    pub registry_path: PathBuf,
    /// Declarative axiom definitions YAML.
    pub axioms_path: PathBuf,
}

impl SourcesConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            registry_path: PathBuf::from(profiled_env_or(
                p,
                "ONTOSYNC_REGISTRY",
                "federation/DOMAIN_REGISTRY.yaml",
            )),
            axioms_path: PathBuf::from(profiled_env_or(p, "ONTOSYNC_AXIOMS", "ontology/AXIOMS.yaml")),
        }
    }
}

// ── PostgreSQL ────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostgresConfig {
    /// Full connection URL; takes precedence over the individual fields.
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub database: String,
    pub username: Option<String>,
    #[serde(skip_serializing)]
    pub password: Option<String>,
    pub ssl_mode: String,
    pub max_connections: u32,
}

impl PostgresConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            url: profiled_env_opt(p, "PG_URL"),
            host: profiled_env_or(p, "PG_HOST", "localhost"),
            port: profiled_env_u16(p, "PG_PORT", 5432),
            database: profiled_env_or(p, "PG_DATABASE", "ontology"),
            username: profiled_env_opt(p, "PG_USERNAME"),
            password: profiled_env_opt(p, "PG_PASSWORD"),
            ssl_mode: profiled_env_or(p, "PG_SSL_MODE", "prefer"),
            max_connections: profiled_env_u32(p, "PG_MAX_CONNECTIONS", 5),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.url.is_some() || self.username.is_some()
    }
}

// ── Ontology store ────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OntologyConfig {
    /// Qualified-name prefix of cross-domain entities.
    pub shared_prefix: String,
    /// Table holding canonical entities.
    pub entity_table: String,
}

impl OntologyConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            shared_prefix: profiled_env_or(p, "ONTOSYNC_SHARED_PREFIX", DEFAULT_SHARED_PREFIX),
            entity_table: profiled_env_or(p, "ONTOSYNC_ENTITY_TABLE", "public.ontology_entities"),
        }
    }

    /// Whether `qualified_name` lives in the shared (accretion-only) scope.
    pub fn is_shared(&self, qualified_name: &str) -> bool {
        qualified_name.starts_with(&self.shared_prefix)
    }
}

impl Default for OntologyConfig {
    fn default() -> Self {
        Self {
            shared_prefix: DEFAULT_SHARED_PREFIX.to_string(),
            entity_table: "public.ontology_entities".to_string(),
        }
    }
}
