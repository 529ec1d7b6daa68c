//! battinfo - battery metadata notebooks
//!
//! Command-line interface for the library

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use serde_json::json;

use battinfo_core::notebooks::{ElectrolyteNotebook, Notebook, SchemaNotebook};
use battinfo_core::report::format_row;
use battinfo_core::{
    OntologyLibrary, ProjectConfig, QueryRow, Session, SourceDriverChain, SparqlQuery,
};

#[derive(Parser)]
#[command(name = "battinfo")]
#[command(version)]
#[command(about = "Query battery JSON-LD metadata against the battery ontology", long_about = None)]
struct Cli {
    /// Project root directory
    #[arg(long, global = true, default_value = ".")]
    project: PathBuf,

    /// Ontology URL, file:// reference or path (overrides the project file)
    #[arg(long, global = true)]
    ontology: Option<String>,

    /// Metadata directory (overrides the project file)
    #[arg(long, global = true)]
    metadata_dir: Option<PathBuf>,

    /// More diagnostics on stderr (-v info, -vv debug)
    #[arg(long, short = 'v', global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Errors only
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Column names, units and required flags of the tabular data schema
    Schema {
        /// Metadata document (default: schema.json)
        #[arg(long)]
        document: Option<String>,
    },
    /// Electrolyte components and their volume fractions
    Electrolyte {
        /// Metadata document (default: electrolyte.json)
        #[arg(long)]
        document: Option<String>,
    },
    /// Run an ad hoc SELECT query with ${Name} placeholders
    Query {
        /// Metadata document
        document: String,
        /// Query text
        #[arg(long, conflicts_with = "query_file", required_unless_present = "query_file")]
        query: Option<String>,
        /// File containing the query
        #[arg(long)]
        query_file: Option<PathBuf>,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Print the IRI for an ontology name, or the labels of an IRI
    Lookup {
        /// Label, local name or IRI
        term: String,
    },
    /// Dump the parsed triples of a document as N-Triples
    Graph {
        /// Metadata document
        document: String,
    },
    /// List JSON-LD documents in the metadata directory
    List,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        tracing::Level::ERROR
    } else {
        match verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            _ => tracing::Level::DEBUG,
        }
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Project file plus command-line overrides
fn load_config(cli: &Cli) -> Result<ProjectConfig> {
    let mut config = ProjectConfig::load_or_default(&cli.project)
        .with_context(|| format!("Failed to load project at {}", cli.project.display()))?;

    if let Some(ontology) = &cli.ontology {
        config.spec.ontology.source = ontology.clone();
        config.spec.ontology.format = None;
    }
    if let Some(dir) = &cli.metadata_dir {
        config.spec.metadata_dir = dir.clone();
    }

    Ok(config)
}

/// Session with the ontology fetched
fn open_session(cli: &Cli) -> Result<Session> {
    let config = load_config(cli)?;
    let source = config.spec.ontology.source.clone();
    Session::open(&cli.project, config, SourceDriverChain::new()?)
        .with_context(|| format!("Failed to load ontology from {}", source))
}

/// Session for commands that never consult the ontology
fn open_offline_session(cli: &Cli) -> Result<Session> {
    let config = load_config(cli)?;
    Ok(Session::with_ontology(
        &cli.project,
        config,
        SourceDriverChain::new()?,
        OntologyLibrary::new()?,
    ))
}

fn handle_notebook(cli: &Cli, notebook: &dyn Notebook, document: Option<&str>) -> Result<()> {
    let session = open_session(cli)?;
    let document = document.unwrap_or_else(|| notebook.document());

    let lines = session
        .run_document(notebook, document)
        .with_context(|| format!("{} notebook failed on {}", notebook.name(), document))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for line in lines {
        writeln!(out, "{}", line)?;
    }
    Ok(())
}

fn handle_query(
    cli: &Cli,
    document: &str,
    query: Option<&str>,
    query_file: Option<&Path>,
    format: OutputFormat,
) -> Result<()> {
    let text = match (query, query_file) {
        (Some(query), _) => query.to_string(),
        (None, Some(path)) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read query file {}", path.display()))?,
        (None, None) => anyhow::bail!("either --query or --query-file is required"),
    };

    let session = open_session(cli)?;
    let graph = session.graph(document)?;
    let rows = session.select(&graph, &SparqlQuery::new(text))?;
    let variables = rows.variables().to_vec();
    let rows: Vec<QueryRow> = rows.collect::<battinfo_core::Result<_>>()?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Text => {
            for row in &rows {
                writeln!(out, "{}", format_row(row, session.ontology()))?;
            }
        }
        OutputFormat::Json => {
            let bindings: Vec<_> = rows.iter().map(QueryRow::to_json).collect();
            let results = json!({
                "head": { "vars": variables },
                "results": { "bindings": bindings },
            });
            writeln!(out, "{}", serde_json::to_string_pretty(&results)?)?;
        }
    }
    Ok(())
}

fn handle_lookup(cli: &Cli, term: &str) -> Result<()> {
    let session = open_session(cli)?;
    let ontology = session.ontology();

    // An indexed IRI prints its labels; anything else is a name
    if let Some(found) = ontology.term(term) {
        if found.labels.is_empty() {
            println!("{} (no labels)", found.iri);
        }
        for label in &found.labels {
            println!("{}", label);
        }
    } else {
        let iri = ontology
            .iri(term)
            .with_context(|| format!("{} is not a term of {}", term, ontology.source()))?;
        println!("{}", iri);
    }
    Ok(())
}

fn handle_graph(cli: &Cli, document: &str) -> Result<()> {
    let session = open_offline_session(cli)?;
    let graph = session.graph(document)?;
    let stdout = io::stdout();
    graph.write_ntriples(stdout.lock())?;
    Ok(())
}

fn handle_list(cli: &Cli) -> Result<()> {
    let session = open_offline_session(cli)?;
    for path in session.metadata().list()? {
        println!("{}", path.display());
    }
    Ok(())
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Schema { document } => {
            handle_notebook(cli, &SchemaNotebook::default(), document.as_deref())
        }
        Commands::Electrolyte { document } => {
            handle_notebook(cli, &ElectrolyteNotebook::default(), document.as_deref())
        }
        Commands::Query {
            document,
            query,
            query_file,
            format,
        } => handle_query(cli, document, query.as_deref(), query_file.as_deref(), *format),
        Commands::Lookup { term } => handle_lookup(cli, term),
        Commands::Graph { document } => handle_graph(cli, document),
        Commands::List => handle_list(cli),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
