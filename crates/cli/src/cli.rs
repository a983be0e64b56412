use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

/// repograph: turn a source repository into a property graph
#[derive(Parser, Debug)]
#[command(name = "repograph", version)]
#[command(about = "Extract files, functions, classes and their relationships into Neo4j", long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to ./repograph.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// More output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Only warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Walk the repository and write its graph
    Ingest(IngestArgs),
    /// Print the facts extracted from one file as JSON
    Extract(ExtractArgs),
}

#[derive(Args, Debug, Default)]
pub struct IngestArgs {
    /// Repository root
    #[arg(long, env = "REPO_ROOT")]
    pub root: Option<PathBuf>,

    /// Neo4j URI (bolt://, neo4j://, neo4j+s:// or http(s)://)
    #[arg(long, env = "NEO4J_URI")]
    pub uri: Option<String>,

    #[arg(long, env = "NEO4J_USERNAME")]
    pub username: Option<String>,

    #[arg(long, env = "NEO4J_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    #[arg(long, env = "NEO4J_DATABASE")]
    pub database: Option<String>,

    /// Build the graph in memory instead of writing to Neo4j
    #[arg(long)]
    pub dry_run: bool,

    /// Write the in-memory graph as JSON (dry runs only)
    #[arg(long, requires = "dry_run")]
    pub export: Option<PathBuf>,

    /// Ingest files with syntax errors from their partial trees
    #[arg(long)]
    pub tolerate_syntax_errors: bool,

    /// Include files matched by .gitignore
    #[arg(long)]
    pub no_gitignore: bool,

    /// Print the run summary as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Source file to analyze
    pub file: PathBuf,

    /// Extract from partial trees instead of failing on syntax errors
    #[arg(long)]
    pub tolerate_syntax_errors: bool,
}

impl Cli {
    pub fn log_filter(&self) -> &'static str {
        match (self.quiet, self.verbose) {
            (true, _) => "warn",
            (false, 0) => "info",
            (false, 1) => "debug",
            (false, _) => "trace",
        }
    }
}
