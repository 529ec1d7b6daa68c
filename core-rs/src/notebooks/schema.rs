/**
 * schema.rs
 * Column descriptions of a tabular data file
 */

use std::fmt;

use crate::errors::Result;
use crate::graph::ResultRows;
use crate::notebooks::Notebook;
use crate::ontology::{QueryRow, SparqlQuery};
use crate::report::{display_term, display_value, LabelLookup, RequiredFlag};

const QUERY: &str = r#"
PREFIX csvw: <http://www.w3.org/ns/csvw#>

SELECT ?column ?name ?title ?propertyClass ?unit ?required
WHERE {
    ?column a csvw:Column ;
            csvw:name ?name .
    OPTIONAL { ?column csvw:title ?title }
    OPTIONAL { ?column csvw:propertyUrl ?propertyClass }
    OPTIONAL { ?column ${hasMeasurementUnit} ?unit }
    OPTIONAL { ?column csvw:required ?required }
}
"#;

#[derive(Debug, Clone)]
pub struct SchemaNotebook {
    document: String,
}

impl SchemaNotebook {
    pub fn new(document: impl Into<String>) -> Self {
        Self {
            document: document.into(),
        }
    }
}

impl Default for SchemaNotebook {
    fn default() -> Self {
        Self::new("schema.json")
    }
}

/// One formatted column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnReport {
    pub name: String,
    pub title: String,
    pub property_class: String,
    pub unit: String,
    pub required: RequiredFlag,
}

impl ColumnReport {
    pub fn from_row<L: LabelLookup + ?Sized>(row: &QueryRow, labels: &L) -> Self {
        Self {
            name: display_value(row.get("name")),
            title: display_value(row.get("title")),
            property_class: display_term(row.get("propertyClass"), labels),
            unit: display_term(row.get("unit"), labels),
            required: RequiredFlag::from_binding(row.get("required")),
        }
    }
}

impl fmt::Display for ColumnReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Column: {} ({}), Property Class: {}, Unit: {}, Required: {}",
            self.name, self.title, self.property_class, self.unit, self.required
        )
    }
}

impl Notebook for SchemaNotebook {
    fn name(&self) -> &str {
        "schema"
    }

    fn document(&self) -> &str {
        &self.document
    }

    fn query(&self) -> SparqlQuery {
        SparqlQuery::new(QUERY)
    }

    fn render(&self, rows: ResultRows, labels: &dyn LabelLookup) -> Result<Vec<String>> {
        let mut lines = Vec::new();
        for row in rows {
            lines.push(ColumnReport::from_row(&row?, labels).to_string());
        }
        Ok(lines)
    }
}
