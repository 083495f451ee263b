// Initial node scaffolding
//
// Builds the node set the graph editor starts a session from: one
// TemplateFile node per template, one Column node per dataset column, one
// Placeholder node per variable each template declares, and the single
// FolderMarker node. Ids and labels follow the editor's conventions.

use crate::data::DataSet;
use crate::error::Result;
use crate::graph::{Node, NodeKind};
use crate::output::organizer::template_stem;
use crate::templates::TemplateStore;

/// Label of the folder marker node shown in the editor
pub const FOLDER_MARKER_LABEL: &str = "разбивать на папки";
/// Token left in scaffolded file name patterns for the user to bind
pub const NAME_TOKEN: &str = "<название>";

/// Build the initial nodes for a dataset and template collection
pub fn scaffold_nodes(data: &DataSet, templates: &TemplateStore) -> Result<Vec<Node>> {
    let mut nodes = Vec::new();

    for (idx, identity) in templates.identities().enumerate() {
        let label = format!("{} {}.docx", template_stem(identity), NAME_TOKEN);
        nodes.push(
            Node::new(format!("v{}", idx), NodeKind::TemplateFile, label)
                .with_category(identity),
        );
    }

    for (idx, column) in data.columns.iter().enumerate() {
        nodes.push(Node::new(
            format!("g{}", idx),
            NodeKind::Column,
            column.clone(),
        ));
    }

    for (t_idx, identity) in templates.identities().enumerate() {
        for (p_idx, placeholder) in templates.placeholders(identity)?.into_iter().enumerate() {
            nodes.push(
                Node::new(
                    format!("b{}_{}", t_idx, p_idx),
                    NodeKind::Placeholder,
                    placeholder,
                )
                .with_category(identity),
            );
        }
    }

    nodes.push(Node::new("o1", NodeKind::FolderMarker, FOLDER_MARKER_LABEL));

    Ok(nodes)
}
