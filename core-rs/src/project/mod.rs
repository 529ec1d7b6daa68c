/**
 * project module
 * .battinfo.yaml project configuration
 */

pub mod config;

pub use config::{Metadata, OntologyConfig, OntologyFormat, ProjectConfig, Spec, API_VERSION};
