// Render pipeline
//
// Orchestrates a full run: resolve bindings once per template, fan out
// row x template render-and-write units, then merge. A failing unit is
// recorded and never aborts the rest of the batch; the merge stage starts
// only after every unit has finished.

use crate::binding::{BindingResolver, ResolvedBinding};
use crate::config::Config;
use crate::data::DataSet;
use crate::error::Result;
use crate::graph::Graph;
use crate::output::{ConcatComposer, DocumentComposer, MergeEngine, OutputOrganizer};
use crate::render::{RowRenderer, TemplateRenderer, TeraRenderer};
use crate::templates::TemplateStore;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::path::PathBuf;

/// One failed render unit
#[derive(Debug, Clone)]
pub struct RenderFailure {
    /// Zero-based row index
    pub row: usize,
    pub template: String,
    pub message: String,
}

/// One failed merge group
#[derive(Debug, Clone)]
pub struct MergeFailure {
    pub template: String,
    pub message: String,
}

/// What a run produced and what it could not
#[derive(Debug, Default)]
pub struct RunReport {
    pub documents_written: usize,
    pub merged_written: usize,
    pub render_failures: Vec<RenderFailure>,
    pub merge_failures: Vec<MergeFailure>,
    /// Paths of merged documents, in merge order
    pub merged_paths: Vec<PathBuf>,
}

impl RunReport {
    pub fn is_clean(&self) -> bool {
        self.render_failures.is_empty() && self.merge_failures.is_empty()
    }

    pub fn summary(&self) -> String {
        format!(
            "Wrote {} documents, {} merged, {} render failures, {} merge failures",
            self.documents_written,
            self.merged_written,
            self.render_failures.len(),
            self.merge_failures.len()
        )
    }
}

/// Runs the whole render-organize-merge flow
pub struct RenderPipeline {
    config: Config,
    renderer: Box<dyn TemplateRenderer>,
    composer: Box<dyn DocumentComposer>,
    verbose: bool,
}

impl RenderPipeline {
    /// Create a pipeline with the default text renderer and composer
    pub fn new(config: Config) -> Self {
        Self {
            config,
            renderer: Box::new(TeraRenderer),
            composer: Box::new(ConcatComposer),
            verbose: false,
        }
    }

    /// Swap in a different placeholder-substitution delegate
    pub fn with_renderer(mut self, renderer: Box<dyn TemplateRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    /// Swap in a different document-composition delegate
    pub fn with_composer(mut self, composer: Box<dyn DocumentComposer>) -> Self {
        self.composer = composer;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Execute a full run over every row and every bound template
    pub fn run(
        &self,
        graph: &Graph,
        data: &DataSet,
        templates: &TemplateStore,
    ) -> Result<RunReport> {
        let mut report = RunReport::default();

        let bindings = self.resolve_bindings(graph, templates, data, &mut report);
        let organizer = OutputOrganizer::new(self.config.output.directory.clone());

        self.render_all(data, templates, &bindings, &organizer, &mut report);

        // Barrier: merging scans the tree, so every write must be done
        if self.config.render.merge {
            self.merge_all(graph, &organizer, &mut report);
        }

        Ok(report)
    }

    /// Resolve each template's binding once; templates that cannot be
    /// resolved fail for every row up front
    fn resolve_bindings(
        &self,
        graph: &Graph,
        templates: &TemplateStore,
        data: &DataSet,
        report: &mut RunReport,
    ) -> Vec<ResolvedBinding> {
        let resolver =
            BindingResolver::new(graph).with_strict(self.config.render.strict_bindings);

        let mut bindings = Vec::new();
        for identity in graph.template_identities() {
            let failure = if let Err(e) = templates.require(&identity) {
                Some(e.to_string())
            } else {
                match resolver.resolve(&identity) {
                    Ok(binding) => {
                        bindings.push(binding);
                        None
                    }
                    Err(e) => Some(e.to_string()),
                }
            };

            if let Some(message) = failure {
                for row in &data.rows {
                    report.render_failures.push(RenderFailure {
                        row: row.index,
                        template: identity.clone(),
                        message: message.clone(),
                    });
                }
            }
        }
        bindings
    }

    /// Render and persist every (row, template) unit
    fn render_all(
        &self,
        data: &DataSet,
        templates: &TemplateStore,
        bindings: &[ResolvedBinding],
        organizer: &OutputOrganizer,
        report: &mut RunReport,
    ) {
        let row_renderer = RowRenderer::new(self.renderer.as_ref());
        let total = data.rows.len() * bindings.len();

        let progress = if self.verbose {
            let pb = ProgressBar::new(total as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                    .unwrap()
                    .progress_chars("#>-"),
            );
            Some(pb)
        } else {
            None
        };

        // Destination is computed first so configuration errors surface
        // before any rendering work or file-system side effect
        let render_unit = |row: &crate::data::DataRow,
                           binding: &ResolvedBinding|
         -> std::result::Result<(), RenderFailure> {
            let outcome = organizer.destination(row, binding).and_then(|dest| {
                let template = templates.require(&binding.template)?;
                let rendered = row_renderer.render(row, template, binding)?;
                organizer.persist(&dest, &rendered)
            });

            if let Some(ref pb) = progress {
                pb.inc(1);
            }

            outcome.map_err(|e| RenderFailure {
                row: row.index,
                template: binding.template.clone(),
                message: e.to_string(),
            })
        };

        let outcomes: Vec<std::result::Result<(), RenderFailure>> =
            if self.config.render.parallel {
                data.rows
                    .par_iter()
                    .flat_map_iter(|row| bindings.iter().map(move |b| (row, b)))
                    .map(|(row, binding)| render_unit(row, binding))
                    .collect()
            } else {
                data.rows
                    .iter()
                    .flat_map(|row| bindings.iter().map(move |b| (row, b)))
                    .map(|(row, binding)| render_unit(row, binding))
                    .collect()
            };

        if let Some(pb) = progress {
            pb.finish_with_message("Rendering complete");
        }

        for outcome in outcomes {
            match outcome {
                Ok(()) => report.documents_written += 1,
                Err(failure) => report.render_failures.push(failure),
            }
        }
    }

    /// Merge each template's rendered instances into one document
    fn merge_all(&self, graph: &Graph, organizer: &OutputOrganizer, report: &mut RunReport) {
        let engine = MergeEngine::new(organizer.root(), self.composer.as_ref())
            .with_merged_dir(self.config.output.merged_dir.clone())
            .with_merged_prefix(self.config.output.merged_prefix.clone());

        for identity in graph.template_identities() {
            match engine.merge_template(&identity) {
                Ok(Some(path)) => {
                    report.merged_written += 1;
                    report.merged_paths.push(path);
                }
                Ok(None) => {}
                Err(e) => report.merge_failures.push(MergeFailure {
                    template: identity.clone(),
                    message: e.to_string(),
                }),
            }
        }
    }
}
