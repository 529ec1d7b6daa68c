//! Integration tests for the notebook pipelines
//!
//! Runs both notebooks end to end over the bundled metadata documents and
//! demo ontology:
//! - ontology load and name resolution
//! - document -> graph -> query -> formatted lines
//! - failures surfacing as errors

use battinfo_core::{
    BattinfoError, ElectrolyteNotebook, FileSystemDriver, MemoryDriver, Notebook, OntologyLibrary,
    ProjectConfig, SchemaNotebook, Session,
};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn project_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

fn demo_config() -> ProjectConfig {
    let mut config = ProjectConfig::new("pipeline-test");
    config.spec.ontology.source = "file://./metadata/battery-ontology.ttl".to_string();
    config
}

fn demo_session() -> Session<FileSystemDriver> {
    Session::open(project_root(), demo_config(), FileSystemDriver::new()).unwrap()
}

#[test]
fn test_schema_notebook_end_to_end() {
    let session = demo_session();
    let mut lines = session.run(&SchemaNotebook::default()).unwrap();
    lines.sort();

    assert_eq!(
        lines,
        vec![
            "Column: current_ampere (Current), Property Class: ElectricCurrent, Unit: Ampere, Required: Required",
            "Column: test_time_millisecond (Test Time), Property Class: TestTime, Unit: MilliSecond, Required: Required",
            "Column: voltage_volt (Voltage), Property Class: Voltage, Unit: Volt, Required: Required",
        ]
    );
}

#[test]
fn test_electrolyte_notebook_end_to_end() {
    let session = demo_session();
    let lines = session.run(&ElectrolyteNotebook::default()).unwrap();

    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "Electrolyte: 1M LiPF6 in DMC:EC:EMC 1:1:1 (vol.) + 2 wt% VC");
    assert_eq!(
        lines.iter().filter(|l| l.starts_with("Electrolyte: ")).count(),
        1
    );

    let mut components: Vec<&str> = lines[1..].iter().map(String::as_str).collect();
    components.sort();
    assert_eq!(
        components,
        vec![
            "Component: diethylene carbonate, Volume Fraction: 0.333",
            "Component: dimethyl carbonate, Volume Fraction: 0.333",
            "Component: ethylene carbonate, Volume Fraction: 0.334",
        ]
    );
}

#[test]
fn test_session_from_project_file() {
    // The repository's own .battinfo.yaml points at the bundled ontology
    let session = Session::from_project(project_root()).unwrap();
    assert_eq!(session.config().metadata.name, "battinfo-examples");
    assert_eq!(session.ontology().iri("hasConstituent").unwrap(), "https://example.org/battery#term_0001");
    assert_eq!(session.run(&SchemaNotebook::default()).unwrap().len(), 3);
}

#[test]
fn test_ontology_labels_for_fixture_terms() {
    let session = demo_session();
    let ontology = session.ontology();

    assert_eq!(ontology.first_label("https://example.org/battery#term_0302"), Some("Volt"));
    assert_eq!(ontology.labels("https://example.org/battery#term_0302"), ["Volt", "V"]);
    assert_eq!(ontology.iri("VolumeFraction").unwrap(), "https://example.org/battery#term_0101");
    assert_eq!(ontology.iri("volume fraction").unwrap(), "https://example.org/battery#term_0101");
}

#[test]
fn test_notebook_on_other_document() {
    let session = demo_session();
    let lines = session
        .run_document(&ElectrolyteNotebook::default(), "schema.json")
        .unwrap();
    assert!(lines.is_empty());
}

#[test]
fn test_missing_document_is_an_error() {
    let session = demo_session();
    let err = session
        .run(&SchemaNotebook::new("does-not-exist.json"))
        .unwrap_err();
    assert!(matches!(err, BattinfoError::FileNotFound(_)));
}

#[test]
fn test_unreachable_ontology_is_an_error() {
    let mut config = demo_config();
    config.spec.ontology.source = "https://example.org/offline/ontology.ttl".to_string();

    // Nothing registered: every fetch fails
    let result = Session::open(project_root(), config, MemoryDriver::new());
    assert!(result.is_err());
}

#[test]
fn test_ontology_without_required_term() {
    // hasMeasurementUnit is missing from this ontology
    let ontology = OntologyLibrary::from_turtle(
        "<https://example.org/battery#term_0302> <http://www.w3.org/2004/02/skos/core#prefLabel> \"Volt\" .",
    )
    .unwrap();
    let session = Session::with_ontology(project_root(), demo_config(), FileSystemDriver::new(), ontology);

    let err = session.run(&SchemaNotebook::default()).unwrap_err();
    assert!(matches!(err, BattinfoError::TermNotFound(name) if name == "hasMeasurementUnit"));
}

#[test]
fn test_unlabelled_units_fall_back_to_iri() {
    let temp = TempDir::new().unwrap();
    let metadata = temp.path().join("metadata");
    fs::create_dir_all(&metadata).unwrap();
    fs::write(
        metadata.join("schema.json"),
        r#"{
            "@context": {
                "csvw": "http://www.w3.org/ns/csvw#",
                "name": "csvw:name",
                "required": "csvw:required",
                "unit": {"@id": "https://example.org/battery#term_0004", "@type": "@id"}
            },
            "@type": "csvw:Column",
            "name": "temperature_celsius",
            "unit": "https://example.org/units/DegreeCelsius",
            "required": "TRUE"
        }"#,
    )
    .unwrap();

    let ontology_path = project_root().join("metadata/battery-ontology.ttl");
    let ontology = OntologyLibrary::load(
        &ontology_path.display().to_string(),
        None,
        Path::new("/"),
        &FileSystemDriver::new(),
    )
    .unwrap();

    let session = Session::with_ontology(temp.path(), ProjectConfig::new("t"), FileSystemDriver::new(), ontology);
    let lines = session.run(&SchemaNotebook::default()).unwrap();
    assert_eq!(
        lines,
        vec!["Column: temperature_celsius (N/A), Property Class: N/A, Unit: https://example.org/units/DegreeCelsius, Required: Required"]
    );
}

#[test]
fn test_project_path_with_reserved_characters() {
    let temp = TempDir::new().unwrap();
    let project = temp.path().join("runs 100% [cell|a]^{b}");
    let metadata = project.join("metadata");
    fs::create_dir_all(&metadata).unwrap();
    for name in ["schema.json", "electrolyte.json", "battery-ontology.ttl"] {
        fs::copy(project_root().join("metadata").join(name), metadata.join(name)).unwrap();
    }

    let session = Session::open(&project, demo_config(), FileSystemDriver::new()).unwrap();
    assert_eq!(session.run(&SchemaNotebook::default()).unwrap().len(), 3);
    assert_eq!(session.run(&ElectrolyteNotebook::default()).unwrap().len(), 4);
}

#[test]
fn test_every_notebook_has_its_document() {
    let session = demo_session();
    for notebook in battinfo_core::notebooks::all() {
        let path = session.metadata().resolve(notebook.document());
        assert!(path.is_file(), "missing fixture for {}", notebook.name());
    }
}
