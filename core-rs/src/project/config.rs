/**
 * config.rs
 * Parser for .battinfo.yaml project files
 *
 * Format:
 * ```yaml
 * apiVersion: battinfo/v1
 * kind: Project
 * metadata:
 *   name: battinfo-examples
 * spec:
 *   metadataDir: metadata
 *   ontology:
 *     source: https://w3id.org/emmo/domain/battery/inferred
 *     format: turtle
 *   contexts:
 *     https://example.org/context.jsonld: file://./contexts/local.jsonld
 * ```
 */

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use oxigraph::io::RdfFormat;

use crate::errors::BattinfoError;
use crate::{DEFAULT_METADATA_DIR, DEFAULT_ONTOLOGY_URL, PROJECT_FILE};

pub const API_VERSION: &str = "battinfo/v1";

/// .battinfo.yaml file structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    pub api_version: String,
    pub kind: String,
    pub metadata: Metadata,
    pub spec: Spec,
}

/// Project metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Metadata {
    pub name: String,
}

/// Serialization of the ontology document, when it can't be sniffed
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OntologyFormat {
    Turtle,
    NTriples,
    NQuads,
    TriG,
    N3,
    RdfXml,
}

impl OntologyFormat {
    pub fn rdf_format(self) -> RdfFormat {
        match self {
            OntologyFormat::Turtle => RdfFormat::Turtle,
            OntologyFormat::NTriples => RdfFormat::NTriples,
            OntologyFormat::NQuads => RdfFormat::NQuads,
            OntologyFormat::TriG => RdfFormat::TriG,
            OntologyFormat::N3 => RdfFormat::N3,
            OntologyFormat::RdfXml => RdfFormat::RdfXml,
        }
    }
}

/// Ontology source configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OntologyConfig {
    /// http(s):// URL, file:// reference or plain path
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<OntologyFormat>,
}

impl Default for OntologyConfig {
    fn default() -> Self {
        Self {
            source: DEFAULT_ONTOLOGY_URL.to_string(),
            format: None,
        }
    }
}

/// Project specification
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Spec {
    #[serde(default = "default_metadata_dir")]
    pub metadata_dir: PathBuf,
    #[serde(default)]
    pub ontology: OntologyConfig,
    /// Remote @context reference -> local replacement
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub contexts: BTreeMap<String, String>,
}

fn default_metadata_dir() -> PathBuf {
    PathBuf::from(DEFAULT_METADATA_DIR)
}

impl ProjectConfig {
    /// Load a project file from the given path
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, BattinfoError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(BattinfoError::FileNotFound(
                path.to_string_lossy().to_string(),
            ));
        }

        let content = fs::read_to_string(path)?;

        let config: ProjectConfig = serde_yaml::from_str(&content).map_err(|e| {
            BattinfoError::ParseError(format!("Invalid {} YAML: {}", PROJECT_FILE, e))
        })?;

        config.validate()?;

        Ok(config)
    }

    /// Load the project file from a project root, falling back to defaults
    /// when the root has none.
    pub fn load_or_default<P: AsRef<Path>>(project_root: P) -> Result<Self, BattinfoError> {
        let path = project_root.as_ref().join(PROJECT_FILE);
        if path.exists() {
            tracing::debug!("[ProjectConfig] Loading {}", path.display());
            Self::load(path)
        } else {
            tracing::debug!("[ProjectConfig] No {} in {}, using defaults", PROJECT_FILE, project_root.as_ref().display());
            Ok(Self::new("battinfo"))
        }
    }

    /// Validate project structure
    ///
    /// Ensures:
    /// - apiVersion is "battinfo/v1"
    /// - kind is "Project"
    /// - metadata.name and spec.ontology.source are non-empty
    pub fn validate(&self) -> Result<(), BattinfoError> {
        if self.api_version != API_VERSION {
            return Err(BattinfoError::ValidationError(format!(
                "Invalid apiVersion: expected '{}', got '{}'",
                API_VERSION, self.api_version
            )));
        }

        if self.kind != "Project" {
            return Err(BattinfoError::ValidationError(format!(
                "Invalid kind: expected 'Project', got '{}'",
                self.kind
            )));
        }

        if self.metadata.name.is_empty() {
            return Err(BattinfoError::ValidationError(
                "metadata.name cannot be empty".to_string(),
            ));
        }

        if self.spec.ontology.source.trim().is_empty() {
            return Err(BattinfoError::ValidationError(
                "spec.ontology.source cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Save the project file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), BattinfoError> {
        let yaml = serde_yaml::to_string(self).map_err(|e| {
            BattinfoError::SerializationError(format!("Failed to serialize {}: {}", PROJECT_FILE, e))
        })?;

        fs::write(path.as_ref(), yaml)?;

        Ok(())
    }

    /// Create a config with default spec values
    pub fn new(name: impl Into<String>) -> Self {
        ProjectConfig {
            api_version: API_VERSION.to_string(),
            kind: "Project".to_string(),
            metadata: Metadata { name: name.into() },
            spec: Spec {
                metadata_dir: default_metadata_dir(),
                ontology: OntologyConfig::default(),
                contexts: BTreeMap::new(),
            },
        }
    }

    /// Metadata directory resolved against the project root
    pub fn metadata_dir(&self, project_root: &Path) -> PathBuf {
        if self.spec.metadata_dir.is_absolute() {
            self.spec.metadata_dir.clone()
        } else {
            project_root.join(&self.spec.metadata_dir)
        }
    }
}
