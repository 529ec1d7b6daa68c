//! Error types for battinfo core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BattinfoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Unsupported source reference: {0}")]
    UnsupportedSource(String),

    #[error("JSON-LD error: {0}")]
    JsonLd(String),

    #[error("Graph error: {0}")]
    Graph(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Ontology error: {0}")]
    Ontology(String),

    #[error("Unknown ontology term: {0}")]
    TermNotFound(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<reqwest::Error> for BattinfoError {
    fn from(err: reqwest::Error) -> Self {
        match err.url() {
            Some(url) => BattinfoError::Http(format!("{} ({})", err, url)),
            None => BattinfoError::Http(err.to_string()),
        }
    }
}

impl From<crate::ontology::library::OntologyError> for BattinfoError {
    fn from(err: crate::ontology::library::OntologyError) -> Self {
        use crate::ontology::library::OntologyError;
        match err {
            OntologyError::UnknownTerm(name) => BattinfoError::TermNotFound(name),
            other => BattinfoError::Ontology(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, BattinfoError>;
