//! JSON-LD metadata documents as triples.
//!
//! Parsing is oxigraph's JSON-LD reader. It never touches the network:
//! remote `@context`s are resolved up front (see [`context_references`]) and
//! handed to the parser through [`RemoteContexts`], keyed by absolute URL.

use oxigraph::io::{JsonLdProfileSet, LoadedDocument, RdfFormat, RdfParser};
use oxigraph::model::Triple;
use reqwest::Url;
use serde_json::Value;
use std::collections::HashMap;
use std::error::Error;
use std::panic::{RefUnwindSafe, UnwindSafe};

use crate::errors::{BattinfoError, Result};

const JSON_LD: RdfFormat = RdfFormat::JsonLd {
    profile: JsonLdProfileSet::empty(),
};

#[derive(Debug, Clone)]
struct RemoteContext {
    url: String,
    body: Vec<u8>,
}

/// Context documents fetched ahead of parsing
#[derive(Debug, Clone, Default)]
pub struct RemoteContexts {
    contexts: HashMap<String, RemoteContext>,
}

impl RemoteContexts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a context body.
    ///
    /// `reference` is the absolute URL the document refers to, `url` where
    /// the body was actually read from. Relative references nested in the
    /// body resolve against `url`.
    pub fn insert(&mut self, reference: &str, url: &str, body: impl Into<Vec<u8>>) {
        self.contexts.insert(
            normalize(reference),
            RemoteContext {
                url: url.to_string(),
                body: body.into(),
            },
        );
    }

    pub fn contains(&self, reference: &str) -> bool {
        self.contexts.contains_key(&normalize(reference))
    }

    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }

    fn loader(
        &self,
    ) -> impl Fn(&str) -> std::result::Result<LoadedDocument, Box<dyn Error + Send + Sync>>
           + Send
           + Sync
           + UnwindSafe
           + RefUnwindSafe
           + 'static {
        let contexts = self.contexts.clone();
        move |iri: &str| {
            let context = contexts
                .get(&normalize(iri))
                .ok_or_else(|| format!("remote context {} was not resolved before parsing", iri))?;
            Ok(LoadedDocument {
                url: context.url.clone(),
                content: context.body.clone(),
                format: JSON_LD,
            })
        }
    }
}

fn normalize(reference: &str) -> String {
    Url::parse(reference)
        .map(String::from)
        .unwrap_or_else(|_| reference.to_string())
}

/// Convert a JSON-LD document into triples.
///
/// `base` is the document's own IRI, used for relative `@id`s. Named graphs
/// are merged into the default graph.
pub fn to_triples(document: &Value, contexts: &RemoteContexts, base: Option<&str>) -> Result<Vec<Triple>> {
    let body = serde_json::to_vec(document)?;

    let mut parser = RdfParser::from_format(JSON_LD);
    if let Some(base) = base {
        parser = parser
            .with_base_iri(base)
            .map_err(|e| BattinfoError::JsonLd(format!("invalid base IRI {}: {}", base, e)))?;
    }

    let mut triples = Vec::new();
    for quad in parser
        .for_reader(body.as_slice())
        .with_document_loader(contexts.loader())
    {
        let quad = quad.map_err(|e| BattinfoError::JsonLd(e.to_string()))?;
        triples.push(Triple::from(quad));
    }

    tracing::debug!("[JsonLd] Produced {} triples", triples.len());
    Ok(triples)
}

/// Every string-valued `@context` reference in the document, first occurrence order
pub fn context_references(document: &Value) -> Vec<String> {
    let mut refs = Vec::new();
    collect_references(document, &mut refs);
    refs
}

fn collect_references(value: &Value, refs: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            for (key, inner) in map {
                if key == "@context" {
                    collect_context_value(inner, refs);
                } else {
                    collect_references(inner, refs);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_references(item, refs);
            }
        }
        _ => {}
    }
}

fn collect_context_value(value: &Value, refs: &mut Vec<String>) {
    match value {
        Value::String(reference) => {
            if !refs.contains(reference) {
                refs.push(reference.clone());
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_context_value(item, refs);
            }
        }
        // Scoped contexts can refer to remote ones too
        Value::Object(map) => {
            for inner in map.values() {
                if let Value::Object(definition) = inner {
                    if let Some(scoped) = definition.get("@context") {
                        collect_context_value(scoped, refs);
                    }
                }
            }
        }
        _ => {}
    }
}
