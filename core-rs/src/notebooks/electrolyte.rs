/**
 * electrolyte.rs
 * Electrolyte composition: solvent components and their volume fractions
 */

use std::fmt;

use crate::errors::Result;
use crate::graph::ResultRows;
use crate::notebooks::Notebook;
use crate::ontology::{Binding, QueryRow, SparqlQuery};
use crate::report::{display_term, display_value, LabelLookup};

// Top-level electrolytes only: nothing has them as a constituent.
const QUERY: &str = r#"
PREFIX rdfs: <http://www.w3.org/2000/01/rdf-schema#>
PREFIX skos: <http://www.w3.org/2004/02/skos/core#>

SELECT ?electrolyte ?electrolyteLabel ?component ?componentLabel ?componentType ?volumeFraction
WHERE {
    ?electrolyte ${hasConstituent} ?solvent .
    ?solvent ${hasConstituent} ?component .
    FILTER NOT EXISTS { ?parent ${hasConstituent} ?electrolyte }
    OPTIONAL { ?electrolyte rdfs:label|skos:prefLabel ?electrolyteLabel }
    OPTIONAL { ?component rdfs:label|skos:prefLabel ?componentLabel }
    OPTIONAL { ?component a ?componentType }
    OPTIONAL {
        ?component ${hasProperty} ?fraction .
        ?fraction a ${VolumeFraction} ;
                  ${hasNumericalValue} ?volumeFraction .
    }
}
"#;

#[derive(Debug, Clone)]
pub struct ElectrolyteNotebook {
    document: String,
}

impl ElectrolyteNotebook {
    pub fn new(document: impl Into<String>) -> Self {
        Self {
            document: document.into(),
        }
    }
}

impl Default for ElectrolyteNotebook {
    fn default() -> Self {
        Self::new("electrolyte.json")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentLine {
    pub label: String,
    pub volume_fraction: String,
}

impl fmt::Display for ComponentLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Component: {}, Volume Fraction: {}", self.label, self.volume_fraction)
    }
}

/// One electrolyte and its components, in the order rows arrived
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElectrolyteReport {
    pub label: String,
    pub components: Vec<ComponentLine>,
    key: String,
    component_keys: Vec<String>,
    explicit_labels: Vec<bool>,
}

impl ElectrolyteReport {
    fn new(key: String, label: String) -> Self {
        Self {
            label,
            components: Vec::new(),
            key,
            component_keys: Vec::new(),
            explicit_labels: Vec::new(),
        }
    }

    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.components.len() + 1);
        lines.push(format!("Electrolyte: {}", self.label));
        lines.extend(self.components.iter().map(ToString::to_string));
        lines
    }

    /// Group rows by electrolyte. Repeated rows for one component
    /// (extra labels or types) print once: the first explicit label wins,
    /// otherwise the type label that sorts first.
    pub fn collect<I, L>(rows: I, labels: &L) -> Result<Vec<ElectrolyteReport>>
    where
        I: IntoIterator<Item = Result<QueryRow>>,
        L: LabelLookup + ?Sized,
    {
        let mut reports: Vec<ElectrolyteReport> = Vec::new();

        for row in rows {
            let row = row?;
            let Some(electrolyte) = row.get("electrolyte") else {
                continue;
            };

            let key = electrolyte.lexical().to_string();
            let index = match reports.iter().position(|r| r.key == key) {
                Some(index) => index,
                None => {
                    let label = labelled(row.get("electrolyteLabel"), Some(electrolyte), labels);
                    reports.push(ElectrolyteReport::new(key, label));
                    reports.len() - 1
                }
            };
            let report = &mut reports[index];

            let component_key = row.get("component").map(|c| c.lexical().to_string()).unwrap_or_default();
            let explicit = row.get("componentLabel").is_some();
            let label = match row.get("componentLabel") {
                Some(label) => label.lexical().to_string(),
                None => labelled(None, row.get("componentType").or(row.get("component")), labels),
            };

            if let Some(i) = report.component_keys.iter().position(|k| *k == component_key) {
                let replace = match (report.explicit_labels[i], explicit) {
                    (true, _) => false,
                    (false, true) => true,
                    (false, false) => label < report.components[i].label,
                };
                if replace {
                    report.components[i].label = label;
                    report.explicit_labels[i] = explicit;
                }
                continue;
            }

            report.component_keys.push(component_key);
            report.explicit_labels.push(explicit);
            report.components.push(ComponentLine {
                label,
                volume_fraction: display_value(row.get("volumeFraction")),
            });
        }

        Ok(reports)
    }
}

fn labelled<L: LabelLookup + ?Sized>(label: Option<&Binding>, term: Option<&Binding>, labels: &L) -> String {
    match label {
        Some(label) => label.lexical().to_string(),
        None => display_term(term, labels),
    }
}

impl Notebook for ElectrolyteNotebook {
    fn name(&self) -> &str {
        "electrolyte"
    }

    fn document(&self) -> &str {
        &self.document
    }

    fn query(&self) -> SparqlQuery {
        SparqlQuery::new(QUERY)
    }

    fn render(&self, rows: ResultRows, labels: &dyn LabelLookup) -> Result<Vec<String>> {
        let reports = ElectrolyteReport::collect(rows, labels)?;
        Ok(reports.iter().flat_map(ElectrolyteReport::lines).collect())
    }
}
