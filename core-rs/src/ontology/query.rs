/**
 * query.rs
 * SPARQL query templates and result rows
 *
 * Templates carry `${Name}` placeholders. Rendering replaces each one with the
 * `<IRI>` the ontology gives for `Name`, once, before the query is parsed.
 */

use once_cell::sync::Lazy;
use oxigraph::model::Term;
use regex::{Captures, Regex};
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};
use std::collections::HashMap;
use std::sync::Arc;

use crate::errors::{BattinfoError, Result};

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_.\-]*)\}").expect("placeholder pattern is valid")
});

/// Name -> IRI resolution used when rendering templates
pub trait TermResolver {
    fn resolve_term(&self, name: &str) -> Result<String>;
}

impl TermResolver for HashMap<String, String> {
    fn resolve_term(&self, name: &str) -> Result<String> {
        self.get(name)
            .cloned()
            .ok_or_else(|| BattinfoError::TermNotFound(name.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SparqlQuery {
    query: String,
}

impl SparqlQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.query
    }

    /// Placeholder names in first-occurrence order, without duplicates
    pub fn placeholders(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for caps in PLACEHOLDER.captures_iter(&self.query) {
            if let Some(name) = caps.get(1).map(|m| m.as_str()) {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        names
    }

    /// Splice ontology IRIs into the template
    ///
    /// # Example
    /// ```
    /// use battinfo_core::ontology::SparqlQuery;
    /// use std::collections::HashMap;
    ///
    /// let mut terms = HashMap::new();
    /// terms.insert("hasMeasurementUnit".to_string(), "https://example.org/battery#hasMeasurementUnit".to_string());
    ///
    /// let query = SparqlQuery::new("SELECT ?u WHERE { ?c ${hasMeasurementUnit} ?u }");
    /// assert_eq!(
    ///     query.render(&terms).unwrap(),
    ///     "SELECT ?u WHERE { ?c <https://example.org/battery#hasMeasurementUnit> ?u }"
    /// );
    /// ```
    pub fn render<R: TermResolver + ?Sized>(&self, resolver: &R) -> Result<String> {
        let mut resolved: HashMap<&str, String> = HashMap::new();
        for name in self.placeholders() {
            let iri = resolver.resolve_term(name)?;
            if iri.contains(['<', '>', '"', ' ', '{', '}', '|', '\\', '^', '`']) {
                return Err(BattinfoError::Query(format!(
                    "IRI for {} cannot be spliced into a query: {}",
                    name, iri
                )));
            }
            tracing::debug!("[SparqlQuery] ${{{}}} -> <{}>", name, iri);
            resolved.insert(name, iri);
        }

        let rendered = PLACEHOLDER.replace_all(&self.query, |caps: &Captures<'_>| {
            let name = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
            match resolved.get(name) {
                Some(iri) => format!("<{}>", iri),
                None => caps[0].to_string(),
            }
        });

        Ok(rendered.into_owned())
    }
}

/// One bound value in a result row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Binding {
    Iri {
        value: String,
    },
    #[serde(rename = "bnode")]
    BlankNode {
        value: String,
    },
    Literal {
        value: String,
        datatype: String,
        #[serde(rename = "xml:lang", skip_serializing_if = "Option::is_none")]
        language: Option<String>,
    },
}

impl Binding {
    pub fn from_term(term: &Term) -> Self {
        match term {
            Term::NamedNode(node) => Binding::Iri {
                value: node.as_str().to_string(),
            },
            Term::BlankNode(node) => Binding::BlankNode {
                value: node.as_str().to_string(),
            },
            Term::Literal(literal) => Binding::Literal {
                value: literal.value().to_string(),
                datatype: literal.datatype().as_str().to_string(),
                language: literal.language().map(str::to_string),
            },
            #[allow(unreachable_patterns)]
            other => Binding::Literal {
                value: other.to_string(),
                datatype: "http://www.w3.org/2001/XMLSchema#string".to_string(),
                language: None,
            },
        }
    }

    /// IRI text, blank node id or literal lexical form
    pub fn lexical(&self) -> &str {
        match self {
            Binding::Iri { value } | Binding::BlankNode { value } | Binding::Literal { value, .. } => value,
        }
    }

    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Binding::Iri { value } => Some(value),
            _ => None,
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Binding::Literal { .. })
    }
}

/// A result row: every declared variable, bound or not
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRow {
    variables: Arc<[String]>,
    values: Vec<Option<Binding>>,
}

impl QueryRow {
    pub fn new(variables: Arc<[String]>, values: Vec<Option<Binding>>) -> Self {
        debug_assert_eq!(variables.len(), values.len());
        Self { variables, values }
    }

    /// Build a row from `(variable, value)` pairs
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, Option<Binding>)>,
        S: Into<String>,
    {
        let (variables, values): (Vec<String>, Vec<Option<Binding>>) =
            pairs.into_iter().map(|(k, v)| (k.into(), v)).unzip();
        Self::new(variables.into(), values)
    }

    pub fn get(&self, variable: &str) -> Option<&Binding> {
        self.variables
            .iter()
            .position(|v| v == variable)
            .and_then(|i| self.values[i].as_ref())
    }

    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&Binding>)> {
        self.variables
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().map(Option::as_ref))
    }

    /// SPARQL-results-JSON style object of the bound variables
    pub fn to_json(&self) -> JsonValue {
        let mut map = Map::new();
        for (variable, value) in self.iter() {
            if let Some(binding) = value {
                map.insert(
                    variable.to_string(),
                    serde_json::to_value(binding).unwrap_or(JsonValue::Null),
                );
            }
        }
        JsonValue::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxigraph::model::{BlankNode, Literal, NamedNode};
    use serde_json::json;

    fn terms() -> HashMap<String, String> {
        let mut map = HashMap::new();
        map.insert("hasConstituent".to_string(), "https://example.org/battery#hasConstituent".to_string());
        map.insert("VolumeFraction".to_string(), "https://example.org/battery#VolumeFraction".to_string());
        map
    }

    #[test]
    fn test_placeholders_are_deduplicated() {
        let q = SparqlQuery::new("?e ${hasConstituent} ?s . ?s ${hasConstituent} ?c . ?f a ${VolumeFraction}");
        assert_eq!(q.placeholders(), vec!["hasConstituent", "VolumeFraction"]);
    }

    #[test]
    fn test_render_splices_iris() {
        let q = SparqlQuery::new("?e ${hasConstituent} ?s . ?s ${hasConstituent} ?c .");
        assert_eq!(
            q.render(&terms()).unwrap(),
            "?e <https://example.org/battery#hasConstituent> ?s . ?s <https://example.org/battery#hasConstituent> ?c ."
        );
    }

    #[test]
    fn test_render_without_placeholders_is_identity() {
        let q = SparqlQuery::new("SELECT * WHERE { ?s ?p ?o }");
        assert!(q.placeholders().is_empty());
        assert_eq!(q.render(&terms()).unwrap(), q.as_str());
    }

    #[test]
    fn test_unknown_name_is_terminal() {
        let q = SparqlQuery::new("?c ${hasMeasurementUnit} ?u");
        let err = q.render(&terms()).unwrap_err();
        assert!(matches!(err, BattinfoError::TermNotFound(name) if name == "hasMeasurementUnit"));
    }

    #[test]
    fn test_unsafe_iri_is_rejected() {
        let mut map = HashMap::new();
        map.insert("x".to_string(), "https://example.org/a> . ?s ?p <b".to_string());
        let err = SparqlQuery::new("?s ${x} ?o").render(&map).unwrap_err();
        assert!(matches!(err, BattinfoError::Query(_)));
    }

    #[test]
    fn test_binding_from_terms() {
        let iri = Term::from(NamedNode::new("https://example.org/battery#Volt").unwrap());
        assert_eq!(
            Binding::from_term(&iri),
            Binding::Iri { value: "https://example.org/battery#Volt".to_string() }
        );

        let lit = Term::from(Literal::new_language_tagged_literal("Voltage", "en").unwrap());
        let binding = Binding::from_term(&lit);
        assert_eq!(binding.lexical(), "Voltage");
        assert!(binding.is_literal());
        assert_eq!(binding.as_iri(), None);

        let blank = Term::from(BlankNode::new("b0").unwrap());
        assert_eq!(Binding::from_term(&blank).lexical(), "b0");
    }

    #[test]
    fn test_row_access() {
        let row = QueryRow::from_pairs(vec![
            ("name", Some(Binding::Literal {
                value: "voltage_volt".to_string(),
                datatype: "http://www.w3.org/2001/XMLSchema#string".to_string(),
                language: None,
            })),
            ("unit", None),
        ]);
        assert_eq!(row.variables(), ["name".to_string(), "unit".to_string()]);
        assert_eq!(row.get("name").map(Binding::lexical), Some("voltage_volt"));
        assert_eq!(row.get("unit"), None);
        assert_eq!(row.get("missing"), None);
        assert_eq!(
            row.to_json(),
            json!({"name": {"type": "literal", "value": "voltage_volt", "datatype": "http://www.w3.org/2001/XMLSchema#string"}})
        );
    }
}
