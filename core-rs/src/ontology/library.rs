/**
 * library.rs
 * Ontology loaded into an in-memory store, with a label index over its terms
 */

use oxigraph::io::{RdfFormat, RdfParser};
use oxigraph::sparql::{Query, QueryResults};
use oxigraph::store::Store;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

use crate::drivers::{FetchedDocument, SourceDriver, SourceLocation};
use crate::errors::{BattinfoError, Result as BattinfoResult};
use crate::graph::ResultRows;
use crate::ontology::query::{Binding, QueryRow, TermResolver};
use crate::ontology::vocab::{LABEL_PREDICATES, TERM_KINDS};
use crate::project::OntologyFormat;

#[derive(Error, Debug)]
pub enum OntologyError {
    #[error("Failed to load ontology: {0}")]
    LoadError(String),

    #[error("Failed to parse RDF: {0}")]
    ParseError(String),

    #[error("Query error: {0}")]
    QueryError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Oxigraph error: {0}")]
    StoreError(String),

    #[error("Unknown term: {0}")]
    UnknownTerm(String),
}

/// An ontology term and its labels, most preferred first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OntologyTerm {
    pub iri: String,
    pub labels: Vec<String>,
}

impl OntologyTerm {
    pub fn first_label(&self) -> Option<&str> {
        self.labels.first().map(String::as_str)
    }

    /// Fragment or last path segment of the IRI
    pub fn local_name(&self) -> &str {
        local_name(&self.iri)
    }
}

pub struct OntologyLibrary {
    store: Store,
    source: String,
    terms: HashMap<String, OntologyTerm>,
    names: HashMap<String, String>,
    folded_names: HashMap<String, String>,
}

impl OntologyLibrary {
    /// Empty library
    pub fn new() -> Result<Self, OntologyError> {
        let store = Store::new().map_err(|e| OntologyError::StoreError(e.to_string()))?;

        Ok(Self {
            store,
            source: String::new(),
            terms: HashMap::new(),
            names: HashMap::new(),
            folded_names: HashMap::new(),
        })
    }

    /// Fetch an ontology through `driver` and index it.
    ///
    /// `reference` is an http(s) URL, a `file://` reference or a path
    /// (relative paths resolve against `base_dir`).
    pub fn load<D: SourceDriver + ?Sized>(
        reference: &str,
        format: Option<OntologyFormat>,
        base_dir: &Path,
        driver: &D,
    ) -> BattinfoResult<Self> {
        let location = SourceLocation::parse(reference, base_dir)?;
        tracing::info!("[OntologyLibrary] Loading ontology from {}", location);

        let document = driver.fetch(&location)?;

        let mut library = Self::new()?;
        library.load_document(&document, format)?;
        library.source = reference.to_string();
        library.rebuild_index()?;

        tracing::info!(
            "[OntologyLibrary] Indexed {} terms ({} names)",
            library.terms.len(),
            library.names.len()
        );
        Ok(library)
    }

    /// Build from in-memory Turtle
    pub fn from_turtle(turtle: &str) -> Result<Self, OntologyError> {
        let mut library = Self::new()?;
        library
            .store
            .load_from_reader(RdfFormat::Turtle, turtle.as_bytes())
            .map_err(|e| OntologyError::ParseError(e.to_string()))?;
        library.source = "inline".to_string();
        library.rebuild_index()?;
        Ok(library)
    }

    fn load_document(&mut self, document: &FetchedDocument, explicit: Option<OntologyFormat>) -> Result<(), OntologyError> {
        let format = detect_format(document, explicit);
        tracing::debug!("[OntologyLibrary] Parsing {} as {}", document.location, format.name());

        let mut parser = RdfParser::from_format(format);
        if let SourceLocation::Remote(url) = &document.location {
            parser = parser
                .with_base_iri(url.as_str())
                .map_err(|e| OntologyError::LoadError(format!("invalid base IRI {}: {}", url, e)))?;
        }

        self.store
            .load_from_reader(parser, document.body.as_slice())
            .map_err(|e| OntologyError::ParseError(format!("{}: {}", document.location, e)))?;

        Ok(())
    }

    fn rebuild_index(&mut self) -> Result<(), OntologyError> {
        struct Entry {
            label: String,
            predicate_rank: usize,
            language_rank: usize,
        }

        let mut entries: HashMap<String, Vec<Entry>> = HashMap::new();

        for (predicate_rank, predicate) in LABEL_PREDICATES.iter().enumerate() {
            let query = format!(
                "SELECT ?term ?label WHERE {{ ?term <{}> ?label . FILTER(isIRI(?term) && isLiteral(?label)) }}",
                predicate.as_str()
            );
            for row in self.query_sparql(&query)? {
                let (Some(Binding::Iri { value: iri }), Some(Binding::Literal { value: label, language, .. })) =
                    (row.get("term"), row.get("label"))
                else {
                    continue;
                };
                entries.entry(iri.clone()).or_default().push(Entry {
                    label: label.clone(),
                    predicate_rank,
                    language_rank: language_rank(language.as_deref()),
                });
            }
        }

        let kinds = TERM_KINDS
            .iter()
            .map(|k| format!("<{}>", k.as_str()))
            .collect::<Vec<_>>()
            .join(", ");
        let query = format!(
            "SELECT DISTINCT ?term WHERE {{ ?term a ?kind . FILTER(isIRI(?term) && ?kind IN ({})) }}",
            kinds
        );
        for row in self.query_sparql(&query)? {
            if let Some(iri) = row.get("term").and_then(Binding::as_iri) {
                entries.entry(iri.to_string()).or_default();
            }
        }

        let mut terms = HashMap::with_capacity(entries.len());
        for (iri, mut found) in entries {
            found.sort_by(|a, b| {
                (a.predicate_rank, a.language_rank, &a.label).cmp(&(b.predicate_rank, b.language_rank, &b.label))
            });
            let mut labels: Vec<String> = Vec::with_capacity(found.len());
            for entry in found {
                if !labels.contains(&entry.label) {
                    labels.push(entry.label);
                }
            }
            terms.insert(iri.clone(), OntologyTerm { iri, labels });
        }

        // Labels win over local names; ties go to the lexically smallest IRI.
        let mut ordered: Vec<&OntologyTerm> = terms.values().collect();
        ordered.sort_by(|a, b| a.iri.cmp(&b.iri));

        let mut names: HashMap<String, String> = HashMap::new();
        for term in &ordered {
            for label in &term.labels {
                names.entry(label.clone()).or_insert_with(|| term.iri.clone());
            }
        }
        for term in &ordered {
            let local = term.local_name();
            if !local.is_empty() {
                names.entry(local.to_string()).or_insert_with(|| term.iri.clone());
            }
        }

        let mut folded_names: HashMap<String, String> = HashMap::new();
        let mut sorted_names: Vec<(&String, &String)> = names.iter().collect();
        sorted_names.sort();
        for (name, iri) in sorted_names {
            folded_names.entry(name.to_lowercase()).or_insert_with(|| iri.clone());
        }

        self.terms = terms;
        self.names = names;
        self.folded_names = folded_names;
        Ok(())
    }

    /// Where this ontology came from
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Name -> IRI.
    ///
    /// Exact label or IRI local name first, then a case-insensitive match.
    pub fn iri(&self, name: &str) -> Result<&str, OntologyError> {
        self.names
            .get(name)
            .or_else(|| self.folded_names.get(&name.to_lowercase()))
            .map(String::as_str)
            .ok_or_else(|| OntologyError::UnknownTerm(name.to_string()))
    }

    pub fn term(&self, iri: &str) -> Option<&OntologyTerm> {
        self.terms.get(iri)
    }

    /// Labels for an IRI, empty when the IRI is unknown or unlabelled
    pub fn labels(&self, iri: &str) -> &[String] {
        self.terms.get(iri).map(|t| t.labels.as_slice()).unwrap_or(&[])
    }

    pub fn first_label(&self, iri: &str) -> Option<&str> {
        self.term(iri).and_then(OntologyTerm::first_label)
    }

    /// Number of indexed terms
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Number of triples in the ontology store
    pub fn triple_count(&self) -> Result<usize, OntologyError> {
        self.store.len().map_err(|e| OntologyError::StoreError(e.to_string()))
    }

    /// Execute SPARQL query over the ontology (named graphs included)
    pub fn query_sparql(&self, query: &str) -> Result<Vec<QueryRow>, OntologyError> {
        let mut parsed = Query::parse(query, None).map_err(|e| OntologyError::QueryError(e.to_string()))?;
        parsed.dataset_mut().set_default_graph_as_union();

        let results = self
            .store
            .query(parsed)
            .map_err(|e| OntologyError::QueryError(e.to_string()))?;

        match results {
            QueryResults::Graph(_) => Err(OntologyError::QueryError(
                "Graph queries not supported".to_string(),
            )),
            other => ResultRows::new(other)
                .collect::<BattinfoResult<Vec<_>>>()
                .map_err(|e| OntologyError::QueryError(e.to_string())),
        }
    }
}

impl TermResolver for OntologyLibrary {
    fn resolve_term(&self, name: &str) -> BattinfoResult<String> {
        self.iri(name)
            .map(str::to_string)
            .map_err(BattinfoError::from)
    }
}

/// Explicit format, then content type, then extension, then Turtle
pub fn detect_format(document: &FetchedDocument, explicit: Option<OntologyFormat>) -> RdfFormat {
    if let Some(format) = explicit {
        return format.rdf_format();
    }
    document
        .media_type()
        .and_then(|mt| RdfFormat::from_media_type(&mt))
        .or_else(|| document.extension().and_then(|ext| RdfFormat::from_extension(&ext)))
        .unwrap_or(RdfFormat::Turtle)
}

fn language_rank(language: Option<&str>) -> usize {
    match language {
        None => 0,
        Some(lang) if lang == "en" || lang.starts_with("en-") => 0,
        Some(_) => 1,
    }
}

fn local_name(iri: &str) -> &str {
    let trimmed = iri.trim_end_matches(['/', '#']);
    match trimmed.rfind(['#', '/', ':']) {
        Some(i) => &trimmed[i + 1..],
        None => trimmed,
    }
}
