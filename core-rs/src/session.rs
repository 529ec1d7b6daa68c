// session.rs - One notebook run
//
// Holds the project configuration, the loaded ontology and the metadata
// directory, and wires them together:
//
//   ontology -> document -> graph -> rendered query -> rows -> lines

use std::path::{Path, PathBuf};

use reqwest::Url;

use crate::document::{file_url, MetadataDocument, MetadataStore};
use crate::drivers::{SourceDriver, SourceDriverChain, SourceLocation};
use crate::errors::{BattinfoError, Result};
use crate::graph::{MetadataGraph, ResultRows};
use crate::jsonld::{self, RemoteContexts};
use crate::notebooks::Notebook;
use crate::ontology::{OntologyLibrary, SparqlQuery};
use crate::project::ProjectConfig;

/// Upper bound on distinct remote contexts pulled in for one document
const MAX_REMOTE_CONTEXTS: usize = 64;

pub struct Session<D: SourceDriver = SourceDriverChain> {
    project_root: PathBuf,
    config: ProjectConfig,
    driver: D,
    ontology: OntologyLibrary,
    metadata: MetadataStore,
}

impl Session<SourceDriverChain> {
    /// Open a project directory with the filesystem + HTTP drivers
    pub fn from_project(project_root: impl Into<PathBuf>) -> Result<Self> {
        let project_root = project_root.into();
        let config = ProjectConfig::load_or_default(&project_root)?;
        Self::open(project_root, config, SourceDriverChain::new()?)
    }
}

impl<D: SourceDriver> Session<D> {
    /// Validate the configuration and fetch the ontology
    pub fn open(project_root: impl Into<PathBuf>, config: ProjectConfig, driver: D) -> Result<Self> {
        let project_root = project_root.into();
        config.validate()?;

        let ontology = OntologyLibrary::load(
            &config.spec.ontology.source,
            config.spec.ontology.format,
            &project_root,
            &driver,
        )?;

        Ok(Self::with_ontology(project_root, config, driver, ontology))
    }

    /// Use an already loaded ontology
    pub fn with_ontology(
        project_root: impl Into<PathBuf>,
        config: ProjectConfig,
        driver: D,
        ontology: OntologyLibrary,
    ) -> Self {
        let project_root = project_root.into();
        let metadata = MetadataStore::new(config.metadata_dir(&project_root));

        Self {
            project_root,
            config,
            driver,
            ontology,
            metadata,
        }
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    pub fn ontology(&self) -> &OntologyLibrary {
        &self.ontology
    }

    pub fn metadata(&self) -> &MetadataStore {
        &self.metadata
    }

    pub fn load_document(&self, name: &str) -> Result<MetadataDocument> {
        self.metadata.load(name)
    }

    /// Fetch every remote `@context` the document refers to, transitively.
    ///
    /// References resolve against the document (or the context that holds
    /// them), so the keys are the absolute URLs the JSON-LD parser asks for.
    /// A project override, keyed by the reference as written or by its
    /// absolute URL, wins over the reference itself.
    pub fn resolve_contexts(&self, document: &MetadataDocument) -> Result<RemoteContexts> {
        let origin = file_url(&document.path)?;
        let mut pending: Vec<(String, Url)> = jsonld::context_references(&document.value)
            .into_iter()
            .map(|reference| (reference, origin.clone()))
            .collect();
        pending.reverse();

        let mut contexts = RemoteContexts::new();
        while let Some((reference, referrer)) = pending.pop() {
            let url = referrer.join(&reference).map_err(|e| {
                BattinfoError::JsonLd(format!("bad context reference {} in {}: {}", reference, referrer, e))
            })?;
            if contexts.contains(url.as_str()) {
                continue;
            }
            if contexts.len() >= MAX_REMOTE_CONTEXTS {
                return Err(BattinfoError::JsonLd(format!(
                    "more than {} remote contexts referenced from {}",
                    MAX_REMOTE_CONTEXTS,
                    document.path.display()
                )));
            }

            let location = self.context_location(&reference, &url)?;
            tracing::info!("[Session] Resolving context {} from {}", url, location);

            let fetched = self.driver.fetch(&location)?;
            let raw: serde_json::Value = serde_json::from_slice(&fetched.body).map_err(|e| {
                BattinfoError::JsonLd(format!("context {} is not valid JSON: {}", url, e))
            })?;

            let fetched_url = match &fetched.location {
                SourceLocation::Local(path) => file_url(path)?,
                SourceLocation::Remote(remote) => Url::parse(remote).map_err(|e| {
                    BattinfoError::JsonLd(format!("context {} came from bad URL {}: {}", url, remote, e))
                })?,
            };
            for nested in jsonld::context_references(&raw).into_iter().rev() {
                pending.push((nested, fetched_url.clone()));
            }
            contexts.insert(url.as_str(), fetched_url.as_str(), fetched.body);
        }

        Ok(contexts)
    }

    fn context_location(&self, reference: &str, url: &Url) -> Result<SourceLocation> {
        let overrides = &self.config.spec.contexts;
        if let Some(target) = overrides.get(reference).or_else(|| overrides.get(url.as_str())) {
            tracing::debug!("[Session] Context override {} -> {}", reference, target);
            return SourceLocation::parse(target, &self.project_root);
        }

        match url.scheme() {
            "http" | "https" => Ok(SourceLocation::Remote(url.to_string())),
            "file" => url
                .to_file_path()
                .map(SourceLocation::Local)
                .map_err(|_| BattinfoError::UnsupportedSource(url.to_string())),
            _ => Err(BattinfoError::UnsupportedSource(format!(
                "context {} (expected http(s):// or a local file)",
                url
            ))),
        }
    }

    /// Load a metadata document and build its graph
    pub fn graph(&self, name: &str) -> Result<MetadataGraph> {
        let document = self.load_document(name)?;
        let contexts = self.resolve_contexts(&document)?;
        MetadataGraph::from_document(&document, &contexts)
    }

    /// Splice ontology IRIs into the template and run it
    pub fn select<'a>(&self, graph: &'a MetadataGraph, query: &SparqlQuery) -> Result<ResultRows<'a>> {
        let rendered = query.render(&self.ontology)?;
        graph.select(&rendered)
    }

    /// Run a notebook against its default document
    pub fn run(&self, notebook: &dyn Notebook) -> Result<Vec<String>> {
        self.run_document(notebook, notebook.document())
    }

    /// Run a notebook against another document
    pub fn run_document(&self, notebook: &dyn Notebook, document: &str) -> Result<Vec<String>> {
        tracing::info!("[Session] Running {} notebook on {}", notebook.name(), document);
        let graph = self.graph(document)?;
        let rows = self.select(&graph, &notebook.query())?;
        notebook.render(rows, &self.ontology)
    }
}
