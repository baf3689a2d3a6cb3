use crate::comps::Port;
use crate::graph::{EditorGraph, View};
use anyhow::{anyhow, Context, Result};
use egui::{Pos2, Vec2};
use graph_layout::GraphHost;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

/// A graph as stored on disk
///
/// Nodes are referenced by name, so names must be unique.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GraphDocument {
    #[serde(default)]
    pub view: ViewDocument,
    pub nodes: Vec<NodeDocument>,
    #[serde(default)]
    pub connections: Vec<ConnectionDocument>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewDocument {
    pub zoom: f32,
    pub scroll_offset: Vec2,
    pub size: Vec2,
}

impl Default for ViewDocument {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            scroll_offset: Vec2::ZERO,
            size: Vec2::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDocument {
    pub name: String,
    pub position: Pos2,
    pub size: Vec2,
    #[serde(default)]
    pub selected: bool,
    /// Number of input ports, connected or not
    #[serde(default)]
    pub inputs: usize,
    #[serde(default)]
    pub outputs: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionDocument {
    pub from: String,
    pub from_port: usize,
    pub to: String,
    pub to_port: usize,
}

impl GraphDocument {
    /// Build the editor graph described by this document
    ///
    /// # Errors
    /// Returns an error on duplicate node names or connections to unknown
    /// nodes
    pub fn to_graph(&self) -> Result<EditorGraph> {
        let mut graph = EditorGraph::new();
        graph.set_view(View {
            zoom: self.view.zoom,
            scroll_offset: self.view.scroll_offset,
            size: self.view.size,
        });

        let mut by_name = HashMap::new();
        for node in &self.nodes {
            let entity = graph.add_node(node.name.clone(), node.position, node.size);
            if by_name.insert(node.name.as_str(), entity).is_some() {
                return Err(anyhow!("Duplicate node name {:?}", node.name));
            }
            graph.select(entity, node.selected)?;
            for slot in 0..node.inputs {
                graph.add_port(entity, Port::Input, slot)?;
            }
            for slot in 0..node.outputs {
                graph.add_port(entity, Port::Output, slot)?;
            }
        }

        for c in &self.connections {
            let from = by_name
                .get(c.from.as_str())
                .with_context(|| format!("Unknown connection source {:?}", c.from))?;
            let to = by_name
                .get(c.to.as_str())
                .with_context(|| format!("Unknown connection destination {:?}", c.to))?;
            graph.connect(*from, c.from_port, *to, c.to_port)?;
        }

        Ok(graph)
    }

    /// Describe the current state of an editor graph
    pub fn from_graph(graph: &EditorGraph) -> Self {
        let nodes = graph
            .nodes()
            .iter()
            .map(|&node| NodeDocument {
                name: graph.name_of(node).unwrap_or_default(),
                position: graph.position_of(node).unwrap_or(Pos2::ZERO),
                size: graph.size_of(node).unwrap_or(Vec2::ZERO),
                selected: graph.is_selected(node),
                inputs: graph.port_count(node, Port::Input),
                outputs: graph.port_count(node, Port::Output),
            })
            .collect();

        let connections = graph
            .connection_list()
            .into_iter()
            .map(|c| ConnectionDocument {
                from: graph.name_of(c.from_node).unwrap_or_default(),
                from_port: c.from_port,
                to: graph.name_of(c.to_node).unwrap_or_default(),
                to_port: c.to_port,
            })
            .collect();

        let view = graph.view();
        Self {
            view: ViewDocument {
                zoom: view.zoom,
                scroll_offset: view.scroll_offset,
                size: view.size,
            },
            nodes,
            connections,
        }
    }
}

pub fn load_document(path: impl AsRef<Path>) -> Result<GraphDocument> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).with_context(|| format!("Can't read {path:?}"))?;
    let document: GraphDocument =
        ron::from_str(&text).with_context(|| format!("Can't parse {path:?}"))?;
    info!(
        "Loaded {} nodes and {} connections from {path:?}",
        document.nodes.len(),
        document.connections.len()
    );
    Ok(document)
}

pub fn to_ron_string(document: &GraphDocument) -> Result<String> {
    Ok(ron::ser::to_string_pretty(
        document,
        ron::ser::PrettyConfig::default(),
    )?)
}

pub fn save_document(document: &GraphDocument, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    std::fs::write(path, to_ron_string(document)?)
        .with_context(|| format!("Can't write {path:?}"))?;
    info!("Saved {} nodes to {path:?}", document.nodes.len());
    Ok(())
}
