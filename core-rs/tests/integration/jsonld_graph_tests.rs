//! Integration tests for JSON-LD -> graph conversion
//!
//! Covers the bundled documents and remote context resolution through
//! the source drivers.

use battinfo_core::document::file_url;
use battinfo_core::jsonld::{self, RemoteContexts};
use battinfo_core::report::display_value;
use battinfo_core::{
    Binding, FileSystemDriver, MemoryDriver, MetadataGraph, MetadataStore, OntologyLibrary,
    ProjectConfig, QueryRow, Session,
};
use serde_json::json;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn metadata_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("metadata")
}

#[test]
fn test_bundled_documents_are_listed() {
    let store = MetadataStore::new(metadata_dir());
    let listed = store.list().unwrap();
    assert!(listed.contains(&PathBuf::from("schema.json")));
    assert!(listed.contains(&PathBuf::from("electrolyte.json")));
    assert!(listed.iter().all(|p| p.extension().map(|e| e != "ttl").unwrap_or(true)));
}

#[test]
fn test_schema_document_graph() {
    let store = MetadataStore::new(metadata_dir());
    let document = store.load("schema.json").unwrap();
    assert!(jsonld::context_references(&document.value).is_empty());

    let graph = MetadataGraph::from_document(&document, &RemoteContexts::new()).unwrap();
    // table: type, url, tableSchema; schema: type + 3 columns; 3 columns x 6 properties
    assert_eq!(graph.len(), 3 + 4 + 18);

    let rows: Vec<QueryRow> = graph
        .select(
            "PREFIX csvw: <http://www.w3.org/ns/csvw#>
             SELECT ?name ?required WHERE { ?c a csvw:Column ; csvw:name ?name ; csvw:required ?required }",
        )
        .unwrap()
        .collect::<battinfo_core::Result<_>>()
        .unwrap();
    assert_eq!(rows.len(), 3);
    for row in &rows {
        assert_eq!(
            row.get("required"),
            Some(&Binding::Literal {
                value: "true".to_string(),
                datatype: "http://www.w3.org/2001/XMLSchema#boolean".to_string(),
                language: None,
            })
        );
    }
}

#[test]
fn test_relative_url_resolves_against_document() {
    let store = MetadataStore::new(metadata_dir());
    let document = store.load("schema.json").unwrap();
    let graph = MetadataGraph::from_document(&document, &RemoteContexts::new()).unwrap();

    let mut rows = graph
        .select("SELECT ?url WHERE { ?t <http://www.w3.org/ns/csvw#url> ?url }")
        .unwrap();
    let row = rows.next().unwrap().unwrap();
    let url = row.get("url").and_then(Binding::as_iri).unwrap();
    assert!(url.starts_with("file:///"));
    assert!(url.ends_with("/metadata/cycling-data.csv"));
}

#[test]
fn test_volume_fractions_are_doubles() {
    let store = MetadataStore::new(metadata_dir());
    let document = store.load("electrolyte.json").unwrap();
    let graph = MetadataGraph::from_document(&document, &RemoteContexts::new()).unwrap();

    let rows: Vec<QueryRow> = graph
        .select(
            "SELECT ?v WHERE {
               ?f a <https://example.org/battery#term_0101> ;
                  <https://example.org/battery#term_0003> ?v
             }",
        )
        .unwrap()
        .collect::<battinfo_core::Result<_>>()
        .unwrap();

    let mut lexical: Vec<&str> = rows.iter().filter_map(|r| r.get("v")).map(Binding::lexical).collect();
    lexical.sort();
    assert_eq!(lexical, vec!["3.33E-1", "3.33E-1", "3.34E-1"]);

    let mut shown: Vec<String> = rows.iter().map(|r| display_value(r.get("v"))).collect();
    shown.sort();
    assert_eq!(shown, vec!["0.333", "0.333", "0.334"]);
}

#[test]
fn test_relative_context_and_ids_resolve_against_document() {
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join("metadata/contexts")).unwrap();
    fs::write(
        temp.path().join("metadata/contexts/battery.jsonld"),
        json!({"@context": ["prefixes.jsonld", {"@vocab": "https://example.org/battery#"}]}).to_string(),
    )
    .unwrap();
    fs::write(
        temp.path().join("metadata/contexts/prefixes.jsonld"),
        json!({"@context": {"unit": "https://example.org/units/"}}).to_string(),
    )
    .unwrap();
    fs::write(
        temp.path().join("metadata/cell.json"),
        json!({
            "@context": "contexts/battery.jsonld",
            "@id": "../cells/./1",
            "hasMeasurementUnit": {"@id": "unit:Volt"}
        })
        .to_string(),
    )
    .unwrap();

    let session = Session::with_ontology(
        temp.path(),
        ProjectConfig::new("t"),
        FileSystemDriver::new(),
        OntologyLibrary::new().unwrap(),
    );
    let document = session.load_document("cell.json").unwrap();
    let contexts = session.resolve_contexts(&document).unwrap();
    assert_eq!(contexts.len(), 2);

    let graph = session.graph("cell.json").unwrap();
    assert_eq!(graph.len(), 1);
    let triple = &graph.triples()[0];
    let cell = file_url(&temp.path().join("cells/1")).unwrap();
    assert_eq!(triple.subject.to_string(), format!("<{}>", cell));
    assert_eq!(triple.predicate.as_str(), "https://example.org/battery#hasMeasurementUnit");
    assert_eq!(triple.object.to_string(), "<https://example.org/units/Volt>");
}

#[test]
fn test_remote_context_through_session() {
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join("metadata")).unwrap();
    fs::write(
        temp.path().join("metadata/cell.json"),
        json!({
            "@context": ["https://example.org/battery/context.json", {"cell": "https://example.org/cells/"}],
            "@id": "cell:42",
            "@type": "BatteryCell",
            "nominalVoltage": {"@value": "3.7", "@type": "xsd:decimal"}
        })
        .to_string(),
    )
    .unwrap();

    let driver = MemoryDriver::new().with_document(
        "https://example.org/battery/context.json",
        Some("application/ld+json"),
        json!({
            "@context": {
                "@vocab": "https://example.org/battery#",
                "xsd": "http://www.w3.org/2001/XMLSchema#"
            }
        })
        .to_string(),
    );

    let session = Session::with_ontology(temp.path(), ProjectConfig::new("t"), driver, OntologyLibrary::new().unwrap());
    let graph = session.graph("cell.json").unwrap();
    assert_eq!(graph.len(), 2);

    let mut out = Vec::new();
    graph.write_ntriples(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains(
        "<https://example.org/cells/42> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <https://example.org/battery#BatteryCell> ."
    ));
    assert!(text.contains(
        "<https://example.org/cells/42> <https://example.org/battery#nominalVoltage> \"3.7\"^^<http://www.w3.org/2001/XMLSchema#decimal> ."
    ));
}

#[test]
fn test_invalid_context_is_rejected() {
    let value = json!({"@context": 42, "name": "x"});
    assert!(MetadataGraph::from_json(&value, &RemoteContexts::new(), None).is_err());
}
