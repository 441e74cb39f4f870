//! Reading genome documents, fragment catalogs and edit batches
//!
//! Documents are JSON or YAML, chosen by file extension.

use crate::error::{GenomeError, Result};
use crate::request::EditRequest;
use genome_fragments::InMemoryCatalog;
use genome_model::{Genome, GenomeDocument, LevelSchema};
use serde::de::DeserializeOwned;
use std::path::Path;

/// Serialized document format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// `.json`
    Json,
    /// `.yaml` / `.yml`
    Yaml,
}

impl DocumentFormat {
    /// Format implied by a file extension
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }

    fn parse<T: DeserializeOwned>(self, input: &str) -> std::result::Result<T, String> {
        match self {
            Self::Json => serde_json::from_str(input).map_err(|e| e.to_string()),
            Self::Yaml => serde_yaml::from_str(input).map_err(|e| e.to_string()),
        }
    }
}

fn read(path: &Path) -> Result<(String, DocumentFormat)> {
    let format = DocumentFormat::from_path(path).ok_or_else(|| GenomeError::InvalidDocument {
        path: Some(path.to_path_buf()),
        reason: "expected a .json, .yaml or .yml file".to_string(),
    })?;
    let input = std::fs::read_to_string(path).map_err(|source| GenomeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok((input, format))
}

fn decode<T: DeserializeOwned>(input: &str, format: DocumentFormat, path: Option<&Path>) -> Result<T> {
    format.parse(input).map_err(|reason| GenomeError::InvalidDocument {
        path: path.map(Path::to_path_buf),
        reason,
    })
}

/// Parse and validate a genome document
///
/// # Errors
/// [`GenomeError::InvalidDocument`] on a parse failure; the validation
/// error (e.g. `DuplicateId`) otherwise
pub fn parse_genome(input: &str, format: DocumentFormat, schema: &LevelSchema) -> Result<Genome> {
    let doc: GenomeDocument = decode(input, format, None)?;
    Ok(Genome::from_document(doc, schema)?)
}

/// Read, parse and validate a genome file
///
/// # Errors
/// As [`parse_genome`], plus [`GenomeError::Io`]
pub fn load_genome(path: &Path, schema: &LevelSchema) -> Result<Genome> {
    let (input, format) = read(path)?;
    let doc: GenomeDocument = decode(&input, format, Some(path))?;
    let genome = Genome::from_document(doc, schema)?;
    tracing::info!(
        path = %path.display(),
        nodes = genome.len(),
        fingerprint = %genome.fingerprint().short(),
        "genome loaded"
    );
    Ok(genome)
}

/// Read a fragment catalog of `key: markup` entries
///
/// # Errors
/// [`GenomeError::Io`] or [`GenomeError::Fragment`]
pub fn load_catalog(path: &Path) -> Result<InMemoryCatalog> {
    let (input, format) = read(path)?;
    let catalog = match format {
        DocumentFormat::Json => InMemoryCatalog::from_json(&input)?,
        DocumentFormat::Yaml => InMemoryCatalog::from_yaml(&input)?,
    };
    Ok(catalog)
}

/// Read a list of edit requests
///
/// # Errors
/// [`GenomeError::Io`] or [`GenomeError::InvalidDocument`]
pub fn load_edits(path: &Path) -> Result<Vec<EditRequest>> {
    let (input, format) = read(path)?;
    decode(&input, format, Some(path))
}
