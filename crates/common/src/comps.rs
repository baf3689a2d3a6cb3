use derive_more::From;
use serde::{Deserialize, Serialize};

// Nodes and ports are entities of a hecs world. A port is a child entity of
// its node, and an edge links an output port to an input port.

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct Node;

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize, From)]
pub struct Name(pub String);

/// Marker for the nodes currently selected in the editor
#[derive(Debug, PartialEq, Eq, Copy, Clone, Serialize, Deserialize)]
pub struct Selected;

// FIXME separate in InputPort and OutputPort types
#[derive(Debug, PartialEq, Eq, Copy, Clone, Serialize, Deserialize)]
pub enum Port {
    Output,
    Input,
}

/// Index of a port among the ports of the same kind on its node
#[derive(Debug, PartialEq, Eq, Copy, Clone, Serialize, Deserialize, From)]
pub struct Slot(pub usize);

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, Clone)]
pub struct Edge {
    pub output_port: hecs::Entity,
    pub input_port: hecs::Entity,
}

#[derive(Debug, PartialEq, Copy, Clone, Serialize, Deserialize, From)]
pub struct Size(pub egui::Vec2);

#[derive(Debug, PartialEq, Eq, Copy, Clone, Serialize, Deserialize)]
pub struct Child {
    pub parent: hecs::Entity,
}

pub trait WorldTreeExt {
    fn children(&self, parent: hecs::Entity) -> Vec<hecs::Entity>;
    fn parent(&self, child: hecs::Entity) -> Option<hecs::Entity>;
}

impl WorldTreeExt for hecs::World {
    fn children(&self, parent: hecs::Entity) -> Vec<hecs::Entity> {
        self.query::<&Child>()
            .iter()
            .filter_map(|(e, c)| if c.parent == parent { Some(e) } else { None })
            .collect()
    }

    fn parent(&self, entity: hecs::Entity) -> Option<hecs::Entity> {
        self.get::<&Child>(entity).ok().map(|c| c.parent)
    }
}
