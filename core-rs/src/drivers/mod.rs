//! Drivers module for document retrieval
//!
//! Provides the SourceDriver trait and implementations:
//! - FileSystemDriver: local files
//! - HttpDriver: remote ontologies and contexts over http(s)
//! - SourceDriverChain: picks one of the above per location
//! - MemoryDriver: canned documents, for tests and offline runs

mod traits;
mod filesystem;
mod http;

pub use traits::{FetchedDocument, SourceDriver, SourceLocation};
pub use filesystem::FileSystemDriver;
pub use http::{HttpDriver, RDF_ACCEPT};

use crate::errors::{BattinfoError, Result};
use std::collections::HashMap;

/// Dispatches local locations to the filesystem and remote ones to HTTP
#[derive(Debug, Clone)]
pub struct SourceDriverChain {
    filesystem: FileSystemDriver,
    http: HttpDriver,
}

impl SourceDriverChain {
    pub fn new() -> Result<Self> {
        Ok(Self {
            filesystem: FileSystemDriver::new(),
            http: HttpDriver::new()?,
        })
    }
}

impl SourceDriver for SourceDriverChain {
    fn fetch(&self, location: &SourceLocation) -> Result<FetchedDocument> {
        match location {
            SourceLocation::Local(_) => self.filesystem.fetch(location),
            SourceLocation::Remote(_) => self.http.fetch(location),
        }
    }
}

/// Serves documents from memory, keyed by the location's display form
#[derive(Debug, Clone, Default)]
pub struct MemoryDriver {
    documents: HashMap<String, (Option<String>, Vec<u8>)>,
}

impl MemoryDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a document under a URL or path
    pub fn with_document(
        mut self,
        location: impl Into<String>,
        content_type: Option<&str>,
        body: impl Into<Vec<u8>>,
    ) -> Self {
        self.documents.insert(
            location.into(),
            (content_type.map(str::to_string), body.into()),
        );
        self
    }
}

impl SourceDriver for MemoryDriver {
    fn fetch(&self, location: &SourceLocation) -> Result<FetchedDocument> {
        let key = location.to_string();
        let (content_type, body) = self
            .documents
            .get(&key)
            .ok_or_else(|| BattinfoError::FileNotFound(key.clone()))?;

        Ok(FetchedDocument {
            location: location.clone(),
            content_type: content_type.clone(),
            body: body.clone(),
        })
    }
}
