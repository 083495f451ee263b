// Binding resolution
//
// Walks the graph once per template identity and produces an explicit
// binding record: placeholder -> column map, optional folder key, optional
// file name pattern. Absent bindings are represented, not raised; only a
// later stage that cannot proceed without one turns absence into an error.

use crate::error::{Error, Result};
use crate::graph::{Graph, Node, NodeKind};
use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};
use std::collections::BTreeMap;

/// Pattern for <...> token spans in a file name pattern
static TOKEN_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^<>]*>").unwrap());

/// File name generation rule: a pattern with `<...>` token spans and the
/// column whose per-row value fills them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilenamePattern {
    pub pattern: String,
    pub source_column: String,
}

impl FilenamePattern {
    /// Produce a concrete file name by replacing every `<...>` span with
    /// the given value, verbatim
    pub fn file_name(&self, value: &str) -> String {
        TOKEN_PATTERN
            .replace_all(&self.pattern, NoExpand(value))
            .into_owned()
    }
}

/// Everything the render pipeline needs to know about one template,
/// derived once and reused across all rows
#[derive(Debug, Clone)]
pub struct ResolvedBinding {
    /// Template identity this binding belongs to
    pub template: String,
    /// Placeholder label -> column label
    pub placeholders: BTreeMap<String, String>,
    /// Column whose per-row value names the output folder
    pub folder_key: Option<String>,
    /// File name generation rule
    pub filename: Option<FilenamePattern>,
}

/// Resolves the binding graph into per-template binding records
pub struct BindingResolver<'a> {
    graph: &'a Graph,
    strict: bool,
}

impl<'a> BindingResolver<'a> {
    pub fn new(graph: &'a Graph) -> Self {
        Self {
            graph,
            strict: false,
        }
    }

    /// Fail on targets with more than one Column source instead of
    /// letting the last connection win
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Resolve the binding for one template identity
    pub fn resolve(&self, identity: &str) -> Result<ResolvedBinding> {
        let mut placeholders = BTreeMap::new();
        for node in self.graph.nodes_of_kind(NodeKind::Placeholder) {
            if !node.in_category(identity) {
                continue;
            }
            if let Some(column) = self.column_source(node)? {
                placeholders.insert(node.data.label.clone(), column.data.label.clone());
            }
        }

        let folder_key = self.resolve_folder_key()?;

        let template_node = self
            .graph
            .nodes_of_kind(NodeKind::TemplateFile)
            .find(|n| n.in_category(identity));
        let filename = match template_node {
            Some(node) => self.column_source(node)?.map(|column| FilenamePattern {
                pattern: node.data.label.clone(),
                source_column: column.data.label.clone(),
            }),
            None => None,
        };

        Ok(ResolvedBinding {
            template: identity.to_string(),
            placeholders,
            folder_key,
            filename,
        })
    }

    /// Resolve the folder key shared by every template
    pub fn resolve_folder_key(&self) -> Result<Option<String>> {
        let Some(marker) = self.graph.nodes_of_kind(NodeKind::FolderMarker).next() else {
            return Ok(None);
        };
        Ok(self
            .column_source(marker)?
            .map(|column| column.data.label.clone()))
    }

    /// The Column node feeding `target`, if any. Wire order decides when
    /// several are connected: the last one wins, unless strict mode is on.
    fn column_source(&self, target: &Node) -> Result<Option<&'a Node>> {
        let sources = self.graph.sources_of_kind(&target.id, NodeKind::Column);
        if self.strict && sources.len() > 1 {
            return Err(Error::AmbiguousBinding(target.data.label.clone()));
        }
        Ok(sources.last().copied())
    }
}
