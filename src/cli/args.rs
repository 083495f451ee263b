use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "papermill")]
#[command(about = "Render, group and merge document batches from a binding graph")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Render every row against every bound template and merge the results
    Render {
        /// Path to the binding graph JSON
        graph: PathBuf,

        /// Path to the dataset CSV
        data: PathBuf,

        /// Directory containing the templates
        templates: PathBuf,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Config file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Skip the merge stage
        #[arg(long)]
        no_merge: bool,

        /// Fail on ambiguous bindings instead of letting the last one win
        #[arg(long)]
        strict: bool,

        /// Render rows in parallel
        #[arg(long)]
        parallel: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print the archive preview tree for a binding graph
    Preview {
        /// Path to the binding graph JSON
        graph: PathBuf,
    },

    /// Print the initial editor nodes for a dataset and template set
    Nodes {
        /// Path to the dataset CSV
        data: PathBuf,

        /// Directory containing the templates
        templates: PathBuf,
    },

    /// Print version information
    Version,
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
