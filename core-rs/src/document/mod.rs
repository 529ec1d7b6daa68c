// document/mod.rs - Metadata directory access
//
// Reads the JSON-LD metadata documents the notebooks run against. Documents
// are addressed by file name relative to the metadata directory; absolute
// paths are taken as-is.

use crate::errors::{BattinfoError, Result};
use reqwest::Url;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const DOCUMENT_EXTENSIONS: [&str; 2] = ["json", "jsonld"];

/// `file://` URL of a local path, relative paths taken from the working directory.
///
/// `Url` leaves `[`, `]`, `^` and `|` alone in paths; IRI parsers reject them.
pub fn file_url(path: &Path) -> Result<Url> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };

    let url = Url::from_file_path(&absolute).map_err(|_| {
        BattinfoError::UnsupportedSource(format!("{} has no file:// form", absolute.display()))
    })?;

    let mut escaped = String::with_capacity(url.as_str().len());
    for c in url.as_str().chars() {
        match c {
            '[' => escaped.push_str("%5B"),
            ']' => escaped.push_str("%5D"),
            '^' => escaped.push_str("%5E"),
            '|' => escaped.push_str("%7C"),
            _ => escaped.push(c),
        }
    }
    Url::parse(&escaped).map_err(|e| BattinfoError::UnsupportedSource(format!("{}: {}", escaped, e)))
}

/// A parsed metadata document and where it was read from
#[derive(Debug, Clone)]
pub struct MetadataDocument {
    pub path: PathBuf,
    pub value: Value,
}

impl MetadataDocument {
    /// `file://` IRI of the document, used as the JSON-LD base
    pub fn base_iri(&self) -> Result<String> {
        Ok(file_url(&self.path)?.into())
    }

    /// Directory containing the document
    pub fn directory(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }
}

/// The metadata directory
#[derive(Debug, Clone)]
pub struct MetadataStore {
    root: PathBuf,
}

impl MetadataStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of a document name
    pub fn resolve(&self, name: &str) -> PathBuf {
        let path = Path::new(name);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// Read and parse a document
    pub fn load(&self, name: &str) -> Result<MetadataDocument> {
        let path = self.resolve(name);
        if !path.is_file() {
            return Err(BattinfoError::FileNotFound(path.display().to_string()));
        }

        tracing::debug!("[MetadataStore] Reading {}", path.display());
        let content = fs::read_to_string(&path)?;
        let value: Value = serde_json::from_str(&content).map_err(|e| {
            BattinfoError::ParseError(format!("{}: {}", path.display(), e))
        })?;

        Ok(MetadataDocument { path, value })
    }

    /// JSON-LD documents under the metadata directory, sorted, relative to it
    pub fn list(&self) -> Result<Vec<PathBuf>> {
        if !self.root.is_dir() {
            return Err(BattinfoError::FileNotFound(self.root.display().to_string()));
        }

        let mut documents = Vec::new();
        for entry in WalkDir::new(&self.root).follow_links(true) {
            let entry = entry.map_err(|e| BattinfoError::Io(e.into()))?;
            if !entry.file_type().is_file() {
                continue;
            }

            let is_document = entry
                .path()
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| DOCUMENT_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
                .unwrap_or(false);

            if is_document {
                if let Ok(relative) = entry.path().strip_prefix(&self.root) {
                    documents.push(relative.to_path_buf());
                }
            }
        }

        documents.sort();
        Ok(documents)
    }
}
