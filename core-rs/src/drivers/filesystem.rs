//! FileSystemDriver: reads local documents

use crate::drivers::traits::{FetchedDocument, SourceDriver, SourceLocation};
use crate::errors::{BattinfoError, Result};
use std::fs;

/// Local file driver
#[derive(Debug, Clone, Default)]
pub struct FileSystemDriver;

impl FileSystemDriver {
    /// Create new FileSystemDriver
    ///
    /// # Example
    ///
    /// ```
    /// use battinfo_core::drivers::FileSystemDriver;
    ///
    /// let driver = FileSystemDriver::new();
    /// ```
    pub fn new() -> Self {
        Self
    }
}

impl SourceDriver for FileSystemDriver {
    fn fetch(&self, location: &SourceLocation) -> Result<FetchedDocument> {
        let path = match location {
            SourceLocation::Local(path) => path,
            SourceLocation::Remote(url) => {
                return Err(BattinfoError::UnsupportedSource(format!(
                    "FileSystemDriver cannot fetch remote URL {}",
                    url
                )))
            }
        };

        if !path.exists() {
            return Err(BattinfoError::FileNotFound(path.display().to_string()));
        }

        if path.is_dir() {
            return Err(BattinfoError::ValidationError(format!(
                "Path is a directory: {}",
                path.display()
            )));
        }

        tracing::debug!("[FileSystemDriver] Reading {}", path.display());
        let body = fs::read(path)?;

        Ok(FetchedDocument {
            location: location.clone(),
            content_type: None,
            body,
        })
    }
}
