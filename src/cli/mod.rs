//! CLI module for Papermill

mod args;

pub use args::{Args, Command};

use crate::config::Config;
use crate::data::DataSet;
use crate::error::{Error, Result};
use crate::graph::Graph;
use crate::output::ArchiveModelBuilder;
use crate::pipeline::RenderPipeline;
use crate::scaffold::scaffold_nodes;
use crate::templates::TemplateStore;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Run the CLI application
pub fn run() -> ExitCode {
    let args = Args::parse_args();

    match execute(args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn execute(args: Args) -> Result<()> {
    match args.command {
        Command::Render {
            graph,
            data,
            templates,
            output,
            config,
            no_merge,
            strict,
            parallel,
            verbose,
        } => render(
            &graph, &data, &templates, output, config, no_merge, strict, parallel, verbose,
        ),

        Command::Preview { graph } => {
            let graph = load_graph(&graph)?;
            let tree = ArchiveModelBuilder::new(&graph).build()?;
            println!("{}", serde_json::to_string_pretty(&tree)?);
            Ok(())
        }

        Command::Nodes { data, templates } => {
            let data = DataSet::load(&data)?;
            let templates = TemplateStore::load_dir(&templates)?;
            let nodes = scaffold_nodes(&data, &templates)?;
            println!("{}", serde_json::to_string_pretty(&nodes)?);
            Ok(())
        }

        Command::Version => {
            println!("papermill {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn render(
    graph_path: &Path,
    data_path: &Path,
    templates_path: &Path,
    output: Option<PathBuf>,
    config_path: Option<PathBuf>,
    no_merge: bool,
    strict: bool,
    parallel: bool,
    verbose: bool,
) -> Result<()> {
    // Load config file if it exists
    let mut cfg = if let Some(path) = &config_path {
        Config::load_or_default(path)
    } else {
        Config::load_or_default(Path::new("papermill.toml"))
    };

    // Merge CLI arguments (CLI takes precedence)
    cfg.merge_cli(output, no_merge, strict, parallel);
    cfg.validate()?;

    if verbose {
        println!("Graph: {}", graph_path.display());
        println!("Data: {}", data_path.display());
        println!("Templates: {}", templates_path.display());
        println!("Output: {}", cfg.output.directory.display());
        println!("Merge: {}", cfg.render.merge);
        println!("Strict bindings: {}", cfg.render.strict_bindings);
        println!("Parallel: {}", cfg.render.parallel);
    }

    let graph = load_graph(graph_path)?;
    let data = DataSet::load(data_path)?;
    let templates = TemplateStore::load_dir(templates_path)?;

    println!(
        "Loaded {} nodes, {} rows, {} templates",
        graph.stats().nodes,
        data.len(),
        templates.len()
    );

    let pipeline = RenderPipeline::new(cfg.clone()).with_verbose(verbose);
    let report = pipeline.run(&graph, &data, &templates)?;

    println!("{}", report.summary());

    if !report.render_failures.is_empty() {
        println!("\nRender failures ({}):", report.render_failures.len());
        for failure in report.render_failures.iter().take(5) {
            println!(
                "  row {} x {}: {}",
                failure.row, failure.template, failure.message
            );
        }
        if report.render_failures.len() > 5 {
            println!("  ... and {} more", report.render_failures.len() - 5);
        }
    }

    for failure in &report.merge_failures {
        println!("Merge failure for {}: {}", failure.template, failure.message);
    }

    println!("Output written to: {}", cfg.output.directory.display());

    Ok(())
}

fn load_graph(path: &Path) -> Result<Graph> {
    if !path.exists() {
        return Err(Error::PathNotFound(path.to_path_buf()));
    }
    let json = std::fs::read_to_string(path)?;
    Graph::from_json(&json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_graph_missing() {
        let result = load_graph(Path::new("/nonexistent/graph.json"));
        assert!(matches!(result, Err(Error::PathNotFound(_))));
    }

    #[test]
    fn test_load_graph() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("graph.json");
        fs::write(&path, r#"{"nodes": [], "connections": []}"#).unwrap();

        let graph = load_graph(&path).unwrap();
        assert_eq!(graph.stats().nodes, 0);
    }

    #[test]
    fn test_load_graph_invalid_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("graph.json");
        fs::write(&path, "not json").unwrap();

        assert!(load_graph(&path).is_err());
    }
}
