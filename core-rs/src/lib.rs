//! # battinfo - Battery metadata notebooks in Rust
//!
//! Loads a JSON-LD metadata document describing a battery dataset, turns it
//! into an in-memory graph, fetches the battery domain ontology, runs one
//! fixed SPARQL query with ontology IRIs spliced in by label, and prints the
//! rows with ontology terms shown by their labels.
//!
//! ## Pipeline
//!
//! ```text
//!  ontology (http / file)          metadata/<doc>.json
//!          │                               │
//!          ▼                               ▼
//!   OntologyLibrary                 MetadataStore ──► jsonld ──► MetadataGraph
//!   (name -> IRI, IRI -> labels)                                     │
//!          │                                                         │
//!          └──────► SparqlQuery::render ──► MetadataGraph::select ◄──┘
//!                                                  │
//!                                                  ▼
//!                                       Notebook::render (report)
//! ```
//!
//! Two notebooks ship with the crate: `schema` (column units of a tabular
//! data file) and `electrolyte` (solvent composition by volume fraction).

pub mod errors;
pub mod project;
pub mod drivers;
pub mod document;
pub mod jsonld;
pub mod graph;
pub mod ontology;
pub mod report;
pub mod notebooks;
pub mod session;

pub use errors::{BattinfoError, Result};
pub use project::{OntologyConfig, OntologyFormat, ProjectConfig};
pub use drivers::{FileSystemDriver, HttpDriver, MemoryDriver, SourceDriver, SourceDriverChain, SourceLocation};
pub use document::{MetadataDocument, MetadataStore};
pub use jsonld::RemoteContexts;
pub use graph::{MetadataGraph, ResultRows};
pub use ontology::{Binding, OntologyError, OntologyLibrary, OntologyTerm, QueryRow, SparqlQuery, TermResolver};
pub use report::{LabelLookup, RequiredFlag};
pub use notebooks::{ElectrolyteNotebook, Notebook, SchemaNotebook};
pub use session::Session;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Battery domain ontology (EMMO battery domain, inferred)
pub const DEFAULT_ONTOLOGY_URL: &str = "https://w3id.org/emmo/domain/battery/inferred";

/// Metadata directory, relative to the project root
pub const DEFAULT_METADATA_DIR: &str = "metadata";

/// Project file name at the project root
pub const PROJECT_FILE: &str = ".battinfo.yaml";
