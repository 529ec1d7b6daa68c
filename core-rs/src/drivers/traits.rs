//! Source driver trait for battinfo
//!
//! Defines the interface for everything that fetches raw documents
//! (ontologies, remote JSON-LD contexts). Implementations include:
//! - FileSystemDriver (local files, file:// references)
//! - HttpDriver (http:// and https:// URLs)
//! - SourceDriverChain (dispatches on the location kind)

use crate::errors::{BattinfoError, Result};
use std::fmt;
use std::path::{Path, PathBuf};

/// Where a document lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocation {
    /// Local filesystem path
    Local(PathBuf),

    /// Remote http(s) URL
    Remote(String),
}

impl SourceLocation {
    /// Parse a source reference.
    ///
    /// Accepts `http(s)://` URLs, `file://` references and plain paths.
    /// Relative paths (and `file://./...`) resolve against `base_dir`.
    ///
    /// # Example
    ///
    /// ```
    /// use battinfo_core::drivers::SourceLocation;
    /// use std::path::{Path, PathBuf};
    ///
    /// let loc = SourceLocation::parse("file://./onto.ttl", Path::new("/project")).unwrap();
    /// assert_eq!(loc, SourceLocation::Local(PathBuf::from("/project/onto.ttl")));
    /// ```
    pub fn parse(reference: &str, base_dir: &Path) -> Result<Self> {
        let reference = reference.trim();

        if reference.is_empty() {
            return Err(BattinfoError::UnsupportedSource("empty reference".to_string()));
        }

        if reference.starts_with("http://") || reference.starts_with("https://") {
            return Ok(SourceLocation::Remote(reference.to_string()));
        }

        if let Some(path_str) = reference.strip_prefix("file://") {
            let path = match path_str.strip_prefix("./") {
                Some(rest) => base_dir.join(rest),
                None => PathBuf::from(path_str),
            };
            return Ok(SourceLocation::Local(path));
        }

        if reference.contains("://") {
            return Err(BattinfoError::UnsupportedSource(format!(
                "{} (expected http(s)://, file:// or a path)",
                reference
            )));
        }

        let path = Path::new(reference);
        if path.is_absolute() {
            Ok(SourceLocation::Local(path.to_path_buf()))
        } else {
            Ok(SourceLocation::Local(base_dir.join(path)))
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, SourceLocation::Remote(_))
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceLocation::Local(path) => write!(f, "{}", path.display()),
            SourceLocation::Remote(url) => f.write_str(url),
        }
    }
}

/// A fetched document body plus whatever the transport said about it
#[derive(Debug, Clone)]
pub struct FetchedDocument {
    pub location: SourceLocation,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl FetchedDocument {
    /// Body decoded as UTF-8
    pub fn text(&self) -> Result<&str> {
        std::str::from_utf8(&self.body).map_err(|e| {
            BattinfoError::ParseError(format!("{} is not valid UTF-8: {}", self.location, e))
        })
    }

    /// Media type without parameters, lowercased
    pub fn media_type(&self) -> Option<String> {
        self.content_type
            .as_deref()
            .and_then(|ct| ct.split(';').next())
            .map(|mt| mt.trim().to_ascii_lowercase())
            .filter(|mt| !mt.is_empty())
    }

    /// File extension of the location's last path segment
    pub fn extension(&self) -> Option<String> {
        let name = match &self.location {
            SourceLocation::Local(path) => path.file_name()?.to_string_lossy().to_string(),
            SourceLocation::Remote(url) => {
                let without_query = url.split(['?', '#']).next().unwrap_or(url);
                without_query.rsplit('/').next()?.to_string()
            }
        };
        let (_, ext) = name.rsplit_once('.')?;
        if ext.is_empty() {
            None
        } else {
            Some(ext.to_ascii_lowercase())
        }
    }
}

/// Anything that can fetch a document body for a location
pub trait SourceDriver {
    fn fetch(&self, location: &SourceLocation) -> Result<FetchedDocument>;
}

impl<T: SourceDriver + ?Sized> SourceDriver for &T {
    fn fetch(&self, location: &SourceLocation) -> Result<FetchedDocument> {
        (**self).fetch(location)
    }
}

impl<T: SourceDriver + ?Sized> SourceDriver for Box<T> {
    fn fetch(&self, location: &SourceLocation) -> Result<FetchedDocument> {
        (**self).fetch(location)
    }
}
