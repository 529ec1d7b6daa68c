//! HttpDriver: fetches ontologies and remote JSON-LD contexts
//!
//! One blocking GET per document, no caching and no retries.

use crate::drivers::traits::{FetchedDocument, SourceDriver, SourceLocation};
use crate::errors::{BattinfoError, Result};
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE};

/// Media types we can parse, most preferred first
pub const RDF_ACCEPT: &str = "text/turtle, application/n-triples;q=0.9, application/rdf+xml;q=0.8, \
application/ld+json;q=0.7, application/json;q=0.6, */*;q=0.1";

/// HTTP driver
#[derive(Debug, Clone)]
pub struct HttpDriver {
    client: Client,
    accept: String,
}

impl HttpDriver {
    /// Create new HttpDriver
    ///
    /// # Example
    ///
    /// ```no_run
    /// use battinfo_core::drivers::HttpDriver;
    ///
    /// let driver = HttpDriver::new().unwrap();
    /// ```
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("battinfo/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            accept: RDF_ACCEPT.to_string(),
        })
    }

    /// Override the Accept header sent with every request
    pub fn with_accept(mut self, accept: impl Into<String>) -> Self {
        self.accept = accept.into();
        self
    }

    pub fn accept(&self) -> &str {
        &self.accept
    }
}

impl SourceDriver for HttpDriver {
    fn fetch(&self, location: &SourceLocation) -> Result<FetchedDocument> {
        let url = match location {
            SourceLocation::Remote(url) => url,
            SourceLocation::Local(path) => {
                return Err(BattinfoError::UnsupportedSource(format!(
                    "HttpDriver cannot read local path {}",
                    path.display()
                )))
            }
        };

        tracing::info!("[HttpDriver] GET {}", url);

        let response = self
            .client
            .get(url)
            .header(ACCEPT, &self.accept)
            .send()?
            .error_for_status()?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        // Redirects (w3id.org) land somewhere else; keep the final URL so the
        // extension sniffing sees the real file name.
        let final_url = response.url().to_string();
        let body = response.bytes()?.to_vec();

        tracing::debug!(
            "[HttpDriver] {} -> {} ({} bytes, content-type {:?})",
            url,
            final_url,
            body.len(),
            content_type
        );

        Ok(FetchedDocument {
            location: SourceLocation::Remote(final_url),
            content_type,
            body,
        })
    }
}
