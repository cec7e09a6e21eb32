//! Configuration document and its on-disk loader.
//!
//! The document has three sections, each mapping endpoint names to fragments.
//! Fragments are kept as untyped values here; the factory decodes each one on
//! its own so a single malformed entry cannot break the rest of the document.
//!
//! YAML is the default format. Files with a `.toml` extension are read as TOML.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::catalog::Section;

pub const DEFAULT_CONFIG_DIR: &str = "config";
pub const DEFAULT_CONFIG_FILE: &str = "race_config.yaml";

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("configuration file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration: {0}")]
    Parse(String),

    #[error("configuration document is empty")]
    Empty,
}

/// Parsed configuration document: section → endpoint name → fragment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigDocument {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub static_endpoints: BTreeMap<String, Value>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub year_dependent_endpoints: BTreeMap<String, Value>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub race_specific_endpoints: BTreeMap<String, Value>,
}

/// A section written as `static_endpoints:` with no entries parses as null.
fn null_as_empty<'de, D>(deserializer: D) -> Result<BTreeMap<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<BTreeMap<String, Value>>::deserialize(deserializer)?.unwrap_or_default())
}

impl ConfigDocument {
    pub fn from_yaml_str(content: &str) -> Result<Self, DocumentError> {
        if content.trim().is_empty() {
            return Err(DocumentError::Empty);
        }
        serde_yml::from_str(content).map_err(|e| DocumentError::Parse(e.to_string()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self, DocumentError> {
        if content.trim().is_empty() {
            return Err(DocumentError::Empty);
        }
        toml::from_str(content).map_err(|e| DocumentError::Parse(e.to_string()))
    }

    /// Read and parse a document, choosing the format from the file extension.
    pub fn from_file(path: &Path) -> Result<Self, DocumentError> {
        if !path.exists() {
            return Err(DocumentError::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path).map_err(|source| DocumentError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let is_toml = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("toml"));
        if is_toml {
            Self::from_toml_str(&content)
        } else {
            Self::from_yaml_str(&content)
        }
    }

    pub fn section(&self, section: Section) -> &BTreeMap<String, Value> {
        match section {
            Section::Static => &self.static_endpoints,
            Section::YearDependent => &self.year_dependent_endpoints,
            Section::RaceSpecific => &self.race_specific_endpoints,
        }
    }

    /// Total number of declared entries across all sections.
    pub fn entry_count(&self) -> usize {
        Section::ALL.iter().map(|s| self.section(*s).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entry_count() == 0
    }
}

/// Where the pipeline finds its configuration document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSettings {
    pub config_dir: PathBuf,
    pub config_file: String,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            config_dir: PathBuf::from(DEFAULT_CONFIG_DIR),
            config_file: DEFAULT_CONFIG_FILE.to_string(),
        }
    }
}

impl PipelineSettings {
    pub fn new(config_dir: impl Into<PathBuf>, config_file: impl Into<String>) -> Self {
        Self {
            config_dir: config_dir.into(),
            config_file: config_file.into(),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.config_dir.join(&self.config_file)
    }
}
