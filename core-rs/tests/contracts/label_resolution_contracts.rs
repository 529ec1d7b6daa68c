// Label resolution contracts
//
// CONTRACT: an IRI known to the label index is always printed as its first
// label, never as the raw IRI. An IRI missing from the index is printed as
// the raw IRI, and never panics.

use battinfo_core::report::{display_term, format_row, UNBOUND};
use battinfo_core::{Binding, OntologyLibrary, QueryRow};

const ONTOLOGY: &str = r#"
@prefix owl: <http://www.w3.org/2002/07/owl#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix skos: <http://www.w3.org/2004/02/skos/core#> .
@prefix b: <https://example.org/battery#> .

b:term_0301 skos:prefLabel "MilliSecond"@en ; skos:altLabel "ms" .
b:term_0302 skos:prefLabel "Volt"@en ; rdfs:label "volt" .
b:term_0303 rdfs:label "Ampere" .
b:term_0999 a owl:Class .
"#;

fn iri(value: &str) -> Binding {
    Binding::Iri { value: value.to_string() }
}

#[test]
fn contract_indexed_iris_print_first_label() {
    let ontology = OntologyLibrary::from_turtle(ONTOLOGY).unwrap();
    for (term, label) in [
        ("https://example.org/battery#term_0301", "MilliSecond"),
        ("https://example.org/battery#term_0302", "Volt"),
        ("https://example.org/battery#term_0303", "Ampere"),
    ] {
        let shown = display_term(Some(&iri(term)), &ontology);
        assert_eq!(shown, label);
        assert_ne!(shown, term);
    }
}

#[test]
fn contract_unknown_iris_print_raw() {
    let ontology = OntologyLibrary::from_turtle(ONTOLOGY).unwrap();
    for term in [
        "https://example.org/battery#term_0999",
        "https://example.org/battery#absent",
        "urn:example:unit",
    ] {
        assert_eq!(display_term(Some(&iri(term)), &ontology), term);
    }
}

#[test]
fn contract_unbound_prints_placeholder() {
    let ontology = OntologyLibrary::from_turtle(ONTOLOGY).unwrap();
    assert_eq!(display_term(None, &ontology), UNBOUND);

    let row = QueryRow::from_pairs(vec![
        ("unit", Some(iri("https://example.org/battery#term_0302"))),
        ("class", None),
    ]);
    assert_eq!(format_row(&row, &ontology), "unit: Volt, class: N/A");
}
