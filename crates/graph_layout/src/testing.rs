//! In-memory host used by the unit tests

use crate::{Connection, GraphHost, Point, Vec2};

#[derive(Debug, Clone)]
pub(crate) struct MemoryNode {
    pub position: Point,
    pub size: Vec2,
    pub selected: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct MemoryHost {
    pub nodes: Vec<MemoryNode>,
    pub connections: Vec<Connection<usize>>,
    pub zoom: f32,
    pub scroll_offset: Vec2,
    pub view_size: Vec2,
    pub writes: usize,
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            connections: Vec::new(),
            zoom: 1.0,
            scroll_offset: Vec2::zero(),
            view_size: Vec2::zero(),
            writes: 0,
        }
    }
}

impl MemoryHost {
    /// Add a selected node of one grid cell at the given pixel position
    pub fn add_node(&mut self, x: f32, y: f32) -> usize {
        self.add_sized_node(x, y, 100.0, 25.0)
    }

    pub fn add_sized_node(&mut self, x: f32, y: f32, width: f32, height: f32) -> usize {
        self.nodes.push(MemoryNode {
            position: Point::new(x, y),
            size: Vec2::new(width, height),
            selected: true,
        });
        self.nodes.len() - 1
    }

    pub fn connect(&mut self, from: usize, from_port: usize, to: usize, to_port: usize) {
        self.connections
            .push(Connection::new(from, from_port, to, to_port));
    }

    pub fn deselect(&mut self, node: usize) {
        self.nodes[node].selected = false;
    }
}

impl GraphHost for MemoryHost {
    type NodeId = usize;

    fn selected_nodes(&self) -> Vec<usize> {
        (0..self.nodes.len())
            .filter(|&node| self.nodes[node].selected)
            .collect()
    }

    fn is_selected(&self, node: usize) -> bool {
        self.nodes.get(node).is_some_and(|n| n.selected)
    }

    fn position(&self, node: usize) -> Point {
        self.nodes[node].position
    }

    fn set_position(&mut self, node: usize, position: Point) {
        self.writes += 1;
        self.nodes[node].position = position;
    }

    fn size(&self, node: usize) -> Vec2 {
        self.nodes[node].size
    }

    fn connection_list(&self) -> Vec<Connection<usize>> {
        self.connections.clone()
    }

    fn zoom(&self) -> f32 {
        self.zoom
    }

    fn scroll_offset(&self) -> Vec2 {
        self.scroll_offset
    }

    fn view_size(&self) -> Vec2 {
        self.view_size
    }
}
