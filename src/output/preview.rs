// Archive preview
//
// Read-only interpretation of the binding graph that produces the folder
// tree the editor UI shows before anything is rendered. Mirrors the shape
// the organizer and merge stages will produce, but uses node labels in
// place of per-row values. The folder labels are part of the editor
// contract and must stay byte-identical.

use crate::binding::BindingResolver;
use crate::error::{Error, Result};
use crate::graph::Graph;
use serde::Serialize;

/// Fixed label of the preview root
pub const PREVIEW_ROOT_LABEL: &str = "Архив";
/// Fixed label of the merged-files preview folder
pub const MERGED_FOLDER_LABEL: &str = "1_объединенные файлы";

/// One entry in the preview tree, serialized in the editor's JSON shape
#[derive(Debug, Clone, Serialize)]
pub struct PreviewNode {
    pub label: String,
    #[serde(rename = "type")]
    pub kind: PreviewKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<PreviewNode>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviewKind {
    Folder,
    File,
}

impl PreviewNode {
    pub fn folder(label: impl Into<String>, children: Vec<PreviewNode>) -> Self {
        Self {
            label: label.into(),
            kind: PreviewKind::Folder,
            children: Some(children),
        }
    }

    pub fn file(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            kind: PreviewKind::File,
            children: None,
        }
    }
}

/// Builds the preview folder tree from a graph, without touching data rows
pub struct ArchiveModelBuilder<'a> {
    graph: &'a Graph,
}

impl<'a> ArchiveModelBuilder<'a> {
    pub fn new(graph: &'a Graph) -> Self {
        Self { graph }
    }

    /// Build the preview tree
    ///
    /// A graph without a resolvable folder key cannot be previewed: that
    /// is the same configuration error the render run would hit, surfaced
    /// before any work happens.
    pub fn build(&self) -> Result<PreviewNode> {
        let resolver = BindingResolver::new(self.graph);
        let folder_label = resolver.resolve_folder_key()?.ok_or(Error::MissingFolderKey)?;

        let files = self.file_entries(&resolver);

        Ok(PreviewNode::folder(
            PREVIEW_ROOT_LABEL,
            vec![
                PreviewNode::folder(MERGED_FOLDER_LABEL, vec![]),
                PreviewNode::folder(format!("{}-1", folder_label), files),
                PreviewNode::folder(format!("{}-2", folder_label), vec![]),
                PreviewNode::folder("...", vec![]),
            ],
        ))
    }

    /// Example file entries: each connected template's name pattern with
    /// its token spans filled by the source column's label
    fn file_entries(&self, resolver: &BindingResolver) -> Vec<PreviewNode> {
        let mut entries = Vec::new();
        for identity in self.graph.template_identities() {
            let Ok(binding) = resolver.resolve(&identity) else {
                continue;
            };
            if let Some(filename) = binding.filename {
                entries.push(PreviewNode::file(filename.file_name(&filename.source_column)));
            }
        }
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Connection, GraphSpec, Node, NodeKind};

    fn connect(source: &str, target: &str) -> Connection {
        Connection {
            source: source.to_string(),
            target: target.to_string(),
        }
    }

    fn sample_graph() -> Graph {
        Graph::new(GraphSpec {
            nodes: vec![
                Node::new("v0", NodeKind::TemplateFile, "report <название>.docx")
                    .with_category("report.docx"),
                Node::new("v1", NodeKind::TemplateFile, "letter <кому>.docx")
                    .with_category("letter.docx"),
                Node::new("g0", NodeKind::Column, "name"),
                Node::new("o1", NodeKind::FolderMarker, "разбивать на папки"),
            ],
            connections: vec![
                connect("g0", "v0"),
                connect("g0", "o1"),
                // v1 deliberately unconnected
            ],
        })
    }

    #[test]
    fn test_build_structure() {
        let graph = sample_graph();
        let tree = ArchiveModelBuilder::new(&graph).build().unwrap();

        assert_eq!(tree.label, PREVIEW_ROOT_LABEL);
        assert_eq!(tree.kind, PreviewKind::Folder);

        let children = tree.children.unwrap();
        assert_eq!(children.len(), 4);
        assert_eq!(children[0].label, MERGED_FOLDER_LABEL);
        assert_eq!(children[1].label, "name-1");
        assert_eq!(children[2].label, "name-2");
        assert_eq!(children[3].label, "...");
    }

    #[test]
    fn test_file_entries_use_column_label() {
        let graph = sample_graph();
        let tree = ArchiveModelBuilder::new(&graph).build().unwrap();

        let files = tree.children.unwrap().remove(1).children.unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].label, "report name.docx");
        assert_eq!(files[0].kind, PreviewKind::File);
    }

    #[test]
    fn test_unconnected_template_is_skipped() {
        let graph = sample_graph();
        let tree = ArchiveModelBuilder::new(&graph).build().unwrap();

        let files = tree.children.unwrap().remove(1).children.unwrap();
        assert!(!files.iter().any(|f| f.label.contains("letter")));
    }

    #[test]
    fn test_missing_folder_key_fails() {
        let graph = Graph::new(GraphSpec {
            nodes: vec![
                Node::new("v0", NodeKind::TemplateFile, "report <x>.docx")
                    .with_category("report.docx"),
            ],
            connections: vec![],
        });

        let result = ArchiveModelBuilder::new(&graph).build();
        assert!(matches!(result, Err(Error::MissingFolderKey)));
    }

    #[test]
    fn test_serialized_shape() {
        let graph = sample_graph();
        let tree = ArchiveModelBuilder::new(&graph).build().unwrap();
        let json = serde_json::to_value(&tree).unwrap();

        assert_eq!(json["label"], "Архив");
        assert_eq!(json["type"], "folder");
        assert_eq!(json["children"][0]["children"], serde_json::json!([]));
        // file entries carry no children key
        let file = &json["children"][1]["children"][0];
        assert_eq!(file["type"], "file");
        assert!(file.get("children").is_none());
    }
}
