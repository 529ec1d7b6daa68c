//! Result formatting
//!
//! Turns query bindings into the text the notebooks print. Ontology IRIs
//! are shown by their first label; nothing here fails on a missing label.

use std::collections::HashMap;
use std::fmt;

use crate::ontology::query::{Binding, QueryRow};
use crate::ontology::OntologyLibrary;

/// Text shown for an unbound variable
pub const UNBOUND: &str = "N/A";

const XSD_DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";
const XSD_FLOAT: &str = "http://www.w3.org/2001/XMLSchema#float";

/// IRI -> labels, most preferred first
pub trait LabelLookup {
    fn labels(&self, iri: &str) -> &[String];

    fn first_label(&self, iri: &str) -> Option<&str> {
        self.labels(iri).first().map(String::as_str)
    }
}

impl LabelLookup for OntologyLibrary {
    fn labels(&self, iri: &str) -> &[String] {
        OntologyLibrary::labels(self, iri)
    }
}

impl LabelLookup for HashMap<String, Vec<String>> {
    fn labels(&self, iri: &str) -> &[String] {
        self.get(iri).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredFlag {
    Required,
    Optional,
}

impl RequiredFlag {
    /// `true` in any letter case means required; unbound and anything else do not
    pub fn from_binding(binding: Option<&Binding>) -> Self {
        match binding {
            Some(Binding::Literal { value, .. }) if value.eq_ignore_ascii_case("true") => {
                RequiredFlag::Required
            }
            _ => RequiredFlag::Optional,
        }
    }
}

impl fmt::Display for RequiredFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequiredFlag::Required => f.write_str("Required"),
            RequiredFlag::Optional => f.write_str("Optional"),
        }
    }
}

/// Display text for a possibly unbound term.
///
/// IRIs show their first label, or the IRI itself when unlabelled.
/// Literals show their lexical form, blank nodes `_:id`. Doubles print
/// as plain decimals (`3.34E-1` shows as `0.334`).
pub fn display_term<L: LabelLookup + ?Sized>(binding: Option<&Binding>, labels: &L) -> String {
    match binding {
        None => UNBOUND.to_string(),
        Some(Binding::Iri { value }) => labels
            .first_label(value)
            .map(str::to_string)
            .unwrap_or_else(|| value.clone()),
        Some(Binding::BlankNode { value }) => format!("_:{}", value),
        Some(Binding::Literal { value, datatype, .. }) => literal_text(value, datatype),
    }
}

/// Lexical text of a value column, no label lookup
pub fn display_value(binding: Option<&Binding>) -> String {
    match binding {
        None => UNBOUND.to_string(),
        Some(Binding::BlankNode { value }) => format!("_:{}", value),
        Some(Binding::Literal { value, datatype, .. }) => literal_text(value, datatype),
        Some(other) => other.lexical().to_string(),
    }
}

fn literal_text(value: &str, datatype: &str) -> String {
    if datatype == XSD_DOUBLE || datatype == XSD_FLOAT {
        if let Ok(number) = value.parse::<f64>() {
            if number.is_finite() {
                return number.to_string();
            }
        }
    }
    value.to_string()
}

/// Generic `var: value` line for ad hoc queries
pub fn format_row<L: LabelLookup + ?Sized>(row: &QueryRow, labels: &L) -> String {
    row.iter()
        .map(|(variable, value)| format!("{}: {}", variable, display_term(value, labels)))
        .collect::<Vec<_>>()
        .join(", ")
}
