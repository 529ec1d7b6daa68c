/// Example: Run both notebooks over the bundled metadata
///
/// Loads the demo ontology from metadata/battery-ontology.ttl, so no
/// network access is needed.
///
/// Usage:
///   cargo run --example run_notebooks
///   cargo run --example run_notebooks -- /path/to/project

use battinfo_core::notebooks;
use battinfo_core::{FileSystemDriver, ProjectConfig, Session};
use std::env;
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let project_root = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")));

    let mut config = ProjectConfig::load_or_default(&project_root)?;
    config.spec.ontology.source = "file://./metadata/battery-ontology.ttl".to_string();
    config.spec.ontology.format = None;

    let session = Session::open(&project_root, config, FileSystemDriver::new())?;
    println!("Ontology: {} terms from {}\n", session.ontology().len(), session.ontology().source());

    for notebook in notebooks::all() {
        println!("== {} ({}) ==", notebook.name(), notebook.document());
        for line in session.run(notebook.as_ref())? {
            println!("{}", line);
        }
        println!();
    }

    Ok(())
}
