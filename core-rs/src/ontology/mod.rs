/**
 * ontology module
 *
 * - library: battery ontology in an Oxigraph store, indexed by label
 * - query: `${Name}` SPARQL templates and result rows
 * - vocab: label and declaration IRIs
 */

pub mod library;
pub mod query;
pub mod vocab;

// Ontology store and label index
pub use library::{detect_format, OntologyError, OntologyLibrary, OntologyTerm};

// Templates and rows shared with the metadata graph
pub use query::{Binding, QueryRow, SparqlQuery, TermResolver};
