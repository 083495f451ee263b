// Binding graph model
//
// Typed in-memory view of the node/connection structure authored by the
// graph editor UI. The wire format uses color names for node types; those
// names are part of the editor contract and must round-trip unchanged.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Kind of node in the binding graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// A document template ("violet" in the editor)
    #[serde(rename = "violet")]
    TemplateFile,
    /// A dataset column ("green" in the editor)
    #[serde(rename = "green")]
    Column,
    /// A placeholder declared inside a template ("blue" in the editor)
    #[serde(rename = "blue")]
    Placeholder,
    /// The folder-split marker ("orange" in the editor)
    #[serde(rename = "orange")]
    FolderMarker,
}

/// Payload of a node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeData {
    /// Display label; doubles as the column name, placeholder name, or
    /// file name pattern depending on the node kind
    pub label: String,
    /// Owning template identity for Placeholder and TemplateFile nodes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// A node in the binding graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub data: NodeData,
}

impl Node {
    pub fn new(id: impl Into<String>, kind: NodeKind, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            data: NodeData {
                label: label.into(),
                category: None,
            },
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.data.category = Some(category.into());
        self
    }

    /// Check whether this node belongs to the given template identity
    pub fn in_category(&self, identity: &str) -> bool {
        self.data.category.as_deref() == Some(identity)
    }
}

/// A directed connection: the value at `source` supplies the binding
/// required by `target`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
    pub source: String,
    pub target: String,
}

/// Raw wire shape of a graph
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphSpec {
    pub nodes: Vec<Node>,
    pub connections: Vec<Connection>,
}

/// The binding graph with lookup tables built once at load time
///
/// Node ids are unique; dangling connections are tolerated and simply
/// never match anything.
#[derive(Debug, Default)]
pub struct Graph {
    nodes: Vec<Node>,
    connections: Vec<Connection>,
    /// Node id -> index into `nodes`
    by_id: HashMap<String, usize>,
    /// Target node id -> connection indices, in wire order
    incoming: HashMap<String, Vec<usize>>,
}

impl Graph {
    /// Build a graph from its wire representation
    pub fn new(spec: GraphSpec) -> Self {
        let mut by_id = HashMap::new();
        for (idx, node) in spec.nodes.iter().enumerate() {
            by_id.insert(node.id.clone(), idx);
        }

        let mut incoming: HashMap<String, Vec<usize>> = HashMap::new();
        for (idx, conn) in spec.connections.iter().enumerate() {
            incoming.entry(conn.target.clone()).or_default().push(idx);
        }

        Self {
            nodes: spec.nodes,
            connections: spec.connections,
            by_id,
            incoming,
        }
    }

    /// Parse a graph from editor JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let spec: GraphSpec = serde_json::from_str(json)?;
        Ok(Self::new(spec))
    }

    /// Get a node by id
    pub fn get(&self, id: &str) -> Option<&Node> {
        self.by_id.get(id).map(|&idx| &self.nodes[idx])
    }

    /// Iterate over all nodes
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Iterate over nodes of one kind, in wire order
    pub fn nodes_of_kind(&self, kind: NodeKind) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(move |n| n.kind == kind)
    }

    /// Iterate over all connections
    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.connections.iter()
    }

    /// All sources connected to `target` that resolve to a node of the
    /// given kind, in wire order; dangling sources are skipped
    pub fn sources_of_kind<'a>(&'a self, target: &str, kind: NodeKind) -> Vec<&'a Node> {
        let Some(conns) = self.incoming.get(target) else {
            return Vec::new();
        };
        conns
            .iter()
            .filter_map(|&idx| self.get(&self.connections[idx].source))
            .filter(|n| n.kind == kind)
            .collect()
    }

    /// Whether any connection targets the given node
    pub fn has_incoming(&self, target: &str) -> bool {
        self.incoming.get(target).is_some_and(|c| !c.is_empty())
    }

    /// Template identities declared by TemplateFile nodes, deduplicated,
    /// in first-seen order
    pub fn template_identities(&self) -> Vec<String> {
        let mut seen = Vec::new();
        for node in self.nodes_of_kind(NodeKind::TemplateFile) {
            if let Some(category) = &node.data.category {
                if !seen.iter().any(|s| s == category) {
                    seen.push(category.clone());
                }
            }
        }
        seen
    }

    /// Counts for reporting
    pub fn stats(&self) -> GraphStats {
        GraphStats {
            nodes: self.nodes.len(),
            connections: self.connections.len(),
            templates: self.template_identities().len(),
        }
    }
}

/// Statistics about a binding graph
#[derive(Debug, Clone, Serialize)]
pub struct GraphStats {
    pub nodes: usize,
    pub connections: usize,
    pub templates: usize,
}
