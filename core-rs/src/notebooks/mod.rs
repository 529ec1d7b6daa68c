//! Notebooks
//!
//! Each notebook is one fixed pipeline: a metadata document, one query
//! template and a renderer for its rows.
//!
//! - schema: CSVW-style column descriptions with units
//! - electrolyte: electrolyte composition by volume fraction

pub mod electrolyte;
pub mod schema;

pub use electrolyte::{ComponentLine, ElectrolyteNotebook, ElectrolyteReport};
pub use schema::{ColumnReport, SchemaNotebook};

use crate::errors::Result;
use crate::graph::ResultRows;
use crate::ontology::SparqlQuery;
use crate::report::LabelLookup;

pub trait Notebook {
    /// Short name, also the CLI subcommand
    fn name(&self) -> &str;

    /// Metadata document the notebook reads, relative to the metadata directory
    fn document(&self) -> &str;

    /// Query template with `${Name}` placeholders
    fn query(&self) -> SparqlQuery;

    /// Output lines for the query rows
    fn render(&self, rows: ResultRows, labels: &dyn LabelLookup) -> Result<Vec<String>>;
}

/// Both notebooks, in CLI order
pub fn all() -> Vec<Box<dyn Notebook>> {
    vec![
        Box::new(SchemaNotebook::default()),
        Box::new(ElectrolyteNotebook::default()),
    ]
}
