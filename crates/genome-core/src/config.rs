//! Service configuration
//!
//! Loadable from TOML or YAML; every field has a default.
//!
//! ```toml
//! [schema]
//! feature = ["endpoint", "method"]
//! component = ["ui_hint"]
//!
//! [snapshots]
//! max_retained = 32
//! auto_every = 100
//!
//! [fragments]
//! elite = ["hero", "nav"]
//! key_template = "{hint}"
//! max_alternatives = 3
//! ```

use crate::error::{GenomeError, Result};
use crate::loader::DocumentFormat;
use genome_fragments::{ResolverConfig, HINT_PLACEHOLDER};
use genome_log::SnapshotPolicy;
use genome_model::LevelSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenomeConfig {
    /// Required attribute keys per level
    pub schema: LevelSchema,

    /// Snapshot retention and automatic capture
    pub snapshots: SnapshotPolicy,

    /// Fragment resolution
    pub fragments: FragmentsConfig,
}

/// Fragment resolution settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FragmentsConfig {
    /// Curated keys returned for every scope
    pub elite: Vec<String>,

    /// Contextual key template
    pub key_template: String,

    /// Suggestions returned with a missing key
    pub max_alternatives: usize,
}

impl Default for FragmentsConfig {
    fn default() -> Self {
        let resolver = ResolverConfig::default();
        Self {
            elite: Vec::new(),
            key_template: resolver.key_template,
            max_alternatives: resolver.max_alternatives,
        }
    }
}

impl FragmentsConfig {
    /// Resolver settings
    #[must_use]
    pub fn resolver_config(&self) -> ResolverConfig {
        ResolverConfig {
            key_template: self.key_template.clone(),
            max_alternatives: self.max_alternatives,
        }
    }
}

impl GenomeConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With schema
    #[inline]
    #[must_use]
    pub fn with_schema(mut self, schema: LevelSchema) -> Self {
        self.schema = schema;
        self
    }

    /// With elite fragment keys
    #[must_use]
    pub fn with_elite<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fragments.elite = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Parse TOML
    ///
    /// # Errors
    /// [`GenomeError::Config`] on syntax or validation failure
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let config: Self = toml::from_str(input).map_err(|e| GenomeError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse YAML
    ///
    /// # Errors
    /// [`GenomeError::Config`] on syntax or validation failure
    pub fn from_yaml_str(input: &str) -> Result<Self> {
        let config: Self =
            serde_yaml::from_str(input).map_err(|e| GenomeError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a `.toml`, `.yaml` or `.yml` file
    ///
    /// # Errors
    /// [`GenomeError::Io`] if unreadable, [`GenomeError::Config`] otherwise
    pub fn from_path(path: &Path) -> Result<Self> {
        let input = std::fs::read_to_string(path).map_err(|source| GenomeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml_str(&input)?,
            _ => match DocumentFormat::from_path(path) {
                Some(DocumentFormat::Yaml) => Self::from_yaml_str(&input)?,
                _ => {
                    return Err(GenomeError::Config(format!(
                        "unsupported config format: {}",
                        path.display()
                    )))
                }
            },
        };
        tracing::debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// Check cross-field constraints
    ///
    /// # Errors
    /// [`GenomeError::Config`] for a zero `auto_every` or `max_retained`, or a
    /// key template without `{hint}`
    pub fn validate(&self) -> Result<()> {
        if self.snapshots.auto_every == Some(0) {
            return Err(GenomeError::Config(
                "snapshots.auto_every must be positive".to_string(),
            ));
        }
        if self.snapshots.max_retained == Some(0) {
            return Err(GenomeError::Config(
                "snapshots.max_retained must be positive".to_string(),
            ));
        }
        if !self.fragments.key_template.contains(HINT_PLACEHOLDER) {
            return Err(GenomeError::Config(format!(
                "fragments.key_template must contain {HINT_PLACEHOLDER}"
            )));
        }
        Ok(())
    }
}
