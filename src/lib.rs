//! Papermill - Render, group and merge document batches
//!
//! Interprets a user-authored binding graph against a tabular dataset and
//! a set of document templates, writes one rendered document per
//! (row, template) pair into a grouped folder tree, and merges each
//! template's instances into a single combined document.

pub mod binding;
pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod graph;
pub mod output;
pub mod pipeline;
pub mod render;
pub mod scaffold;
pub mod templates;

// Re-export main types
pub use binding::{BindingResolver, FilenamePattern, ResolvedBinding};
pub use config::Config;
pub use data::{DataRow, DataSet};
pub use error::{Error, Result};
pub use graph::{Connection, Graph, GraphSpec, Node, NodeKind};
pub use output::{ArchiveModelBuilder, ConcatComposer, DocumentComposer, MergeEngine, OutputOrganizer, PreviewNode};
pub use pipeline::{RenderFailure, RenderPipeline, RunReport};
pub use render::{RowRenderer, TemplateRenderer, TeraRenderer};
pub use templates::TemplateStore;
