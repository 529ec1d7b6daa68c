//! Metadata graph
//!
//! A JSON-LD metadata document parsed by oxigraph and held in an in-memory
//! store. Built once per run and only queried after.

use oxigraph::model::{GraphName, Quad, Triple};
use oxigraph::sparql::{Query, QueryResults, QuerySolutionIter};
use oxigraph::store::Store;
use serde_json::Value;
use std::io::Write;
use std::sync::Arc;

use crate::document::MetadataDocument;
use crate::errors::{BattinfoError, Result};
use crate::jsonld::{self, RemoteContexts};
use crate::ontology::query::{Binding, QueryRow};

const XSD_BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";

pub struct MetadataGraph {
    store: Store,
    triples: Vec<Triple>,
    source: String,
}

impl MetadataGraph {
    /// Parse a loaded document. Its `file://` path is the base for relative ids.
    pub fn from_document(document: &MetadataDocument, contexts: &RemoteContexts) -> Result<Self> {
        let base = document.base_iri()?;
        let mut graph = Self::from_json(&document.value, contexts, Some(&base))?;
        graph.source = document.path.display().to_string();
        Ok(graph)
    }

    pub fn from_json(value: &Value, contexts: &RemoteContexts, base: Option<&str>) -> Result<Self> {
        let triples = jsonld::to_triples(value, contexts, base)?;
        Self::from_triples(triples, base.unwrap_or("inline"))
    }

    /// Repeated triples are kept once, at their first position
    pub fn from_triples(triples: Vec<Triple>, source: &str) -> Result<Self> {
        let store = Store::new().map_err(|e| BattinfoError::Graph(e.to_string()))?;
        let mut kept = Vec::with_capacity(triples.len());
        for triple in triples {
            let quad: Quad = triple.clone().in_graph(GraphName::DefaultGraph);
            let inserted = store
                .insert(&quad)
                .map_err(|e| BattinfoError::Graph(e.to_string()))?;
            if inserted {
                kept.push(triple);
            }
        }

        tracing::info!("[MetadataGraph] Loaded {} triples from {}", kept.len(), source);

        Ok(Self {
            store,
            triples: kept,
            source: source.to_string(),
        })
    }

    /// Distinct triples in the graph
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Distinct triples in document order
    pub fn triples(&self) -> &[Triple] {
        &self.triples
    }

    /// Run a SELECT or ASK query; rows are produced lazily
    pub fn select(&self, query: &str) -> Result<ResultRows> {
        let parsed = Query::parse(query, None)
            .map_err(|e| BattinfoError::Query(format!("syntax error: {}", e)))?;

        tracing::debug!("[MetadataGraph] Executing query:\n{}", query);
        let results = self
            .store
            .query(parsed)
            .map_err(|e| BattinfoError::Query(e.to_string()))?;

        if let QueryResults::Graph(_) = results {
            return Err(BattinfoError::Query(
                "CONSTRUCT and DESCRIBE queries are not supported".to_string(),
            ));
        }
        Ok(ResultRows::new(results))
    }

    /// Dump the graph as N-Triples, one triple per line, document order
    pub fn write_ntriples<W: Write>(&self, mut writer: W) -> Result<()> {
        for triple in &self.triples {
            writeln!(writer, "{} .", triple)?;
        }
        writer.flush()?;
        Ok(())
    }
}

enum RowSource<'a> {
    Solutions(QuerySolutionIter<'a>),
    Boolean(Option<bool>),
    Empty,
}

/// One-shot row iterator over query results.
///
/// ASK results come out as a single row with a boolean `result` variable.
pub struct ResultRows<'a> {
    variables: Arc<[String]>,
    source: RowSource<'a>,
}

impl<'a> ResultRows<'a> {
    pub fn new(results: QueryResults<'a>) -> Self {
        match results {
            QueryResults::Solutions(solutions) => {
                let variables: Arc<[String]> = solutions
                    .variables()
                    .iter()
                    .map(|v| v.as_str().to_string())
                    .collect();
                Self {
                    variables,
                    source: RowSource::Solutions(solutions),
                }
            }
            QueryResults::Boolean(value) => Self {
                variables: Arc::from(vec!["result".to_string()]),
                source: RowSource::Boolean(Some(value)),
            },
            QueryResults::Graph(_) => Self {
                variables: Arc::from(Vec::<String>::new()),
                source: RowSource::Empty,
            },
        }
    }

    /// Declared variables, in projection order
    pub fn variables(&self) -> &[String] {
        &self.variables
    }
}

impl Iterator for ResultRows<'_> {
    type Item = Result<QueryRow>;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.source {
            RowSource::Solutions(solutions) => {
                let solution = match solutions.next()? {
                    Ok(solution) => solution,
                    Err(e) => return Some(Err(BattinfoError::Query(e.to_string()))),
                };
                let values = self
                    .variables
                    .iter()
                    .map(|v| solution.get(v.as_str()).map(Binding::from_term))
                    .collect();
                Some(Ok(QueryRow::new(Arc::clone(&self.variables), values)))
            }
            RowSource::Boolean(value) => {
                let value = value.take()?;
                let binding = Binding::Literal {
                    value: value.to_string(),
                    datatype: XSD_BOOLEAN.to_string(),
                    language: None,
                };
                Some(Ok(QueryRow::new(Arc::clone(&self.variables), vec![Some(binding)])))
            }
            RowSource::Empty => None,
        }
    }
}
