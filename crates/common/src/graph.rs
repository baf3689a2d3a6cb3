use crate::comps::*;
use anyhow::{anyhow, Context, Result};
use egui::{Pos2, Vec2};
use graph_layout::{Connection, GraphHost, Point, Vec2 as LayoutVec2};
use tracing::{debug, warn};

/// Visible area of the graph editor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct View {
    pub zoom: f32,
    pub scroll_offset: Vec2,
    pub size: Vec2,
}

impl Default for View {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            scroll_offset: Vec2::ZERO,
            size: Vec2::ZERO,
        }
    }
}

/// A node graph as edited in the editor
///
/// Nodes keep the order they were added in, which is the order the arranger
/// visits them.
#[derive(Default)]
pub struct EditorGraph {
    world: hecs::World,
    nodes: Vec<hecs::Entity>,
    view: View,
}

impl EditorGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn world(&self) -> &hecs::World {
        &self.world
    }

    /// Nodes in child order
    pub fn nodes(&self) -> &[hecs::Entity] {
        &self.nodes
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn set_view(&mut self, view: View) {
        self.view = view;
    }

    pub fn add_node(&mut self, name: impl Into<String>, position: Pos2, size: Vec2) -> hecs::Entity {
        let node = self
            .world
            .spawn((Node, Name(name.into()), position, Size(size)));
        self.nodes.push(node);
        node
    }

    pub fn node_by_name(&self, name: &str) -> Option<hecs::Entity> {
        self.nodes.iter().copied().find(|&node| {
            self.world
                .get::<&Name>(node)
                .is_ok_and(|n| n.0 == name)
        })
    }

    pub fn name_of(&self, node: hecs::Entity) -> Option<String> {
        self.world.get::<&Name>(node).ok().map(|n| n.0.clone())
    }

    pub fn position_of(&self, node: hecs::Entity) -> Option<Pos2> {
        self.world.get::<&Pos2>(node).ok().map(|p| *p)
    }

    pub fn size_of(&self, node: hecs::Entity) -> Option<Vec2> {
        self.world.get::<&Size>(node).ok().map(|s| s.0)
    }

    /// The port of the given kind and slot on `node`, if it exists
    pub fn port(&self, node: hecs::Entity, kind: Port, slot: usize) -> Option<hecs::Entity> {
        self.world
            .query::<(&Child, &Port, &Slot)>()
            .iter()
            .find_map(|(e, (child, &port, &Slot(s)))| {
                (child.parent == node && port == kind && s == slot).then_some(e)
            })
    }

    /// Number of ports of the given kind on `node`
    pub fn port_count(&self, node: hecs::Entity, kind: Port) -> usize {
        self.world
            .query::<(&Child, &Port)>()
            .iter()
            .filter(|(_, (child, port))| child.parent == node && **port == kind)
            .count()
    }

    /// Get or create a port on `node`
    ///
    /// # Errors
    /// Returns an error if `node` isn't a node of this graph
    pub fn add_port(&mut self, node: hecs::Entity, kind: Port, slot: usize) -> Result<hecs::Entity> {
        if self.world.get::<&Node>(node).is_err() {
            return Err(anyhow!("{node:?} is not a node"));
        }
        if let Some(port) = self.port(node, kind, slot) {
            return Ok(port);
        }
        Ok(self.world.spawn((kind, Slot(slot), Child { parent: node })))
    }

    /// Connect output `from_slot` of `from` to input `to_slot` of `to`,
    /// creating the ports if needed
    pub fn connect(
        &mut self,
        from: hecs::Entity,
        from_slot: usize,
        to: hecs::Entity,
        to_slot: usize,
    ) -> Result<hecs::Entity> {
        let output_port = self
            .add_port(from, Port::Output, from_slot)
            .context("Invalid connection source")?;
        let input_port = self
            .add_port(to, Port::Input, to_slot)
            .context("Invalid connection destination")?;
        debug!("Connecting {from:?}:{from_slot} to {to:?}:{to_slot}");
        Ok(self.world.spawn((Edge {
            output_port,
            input_port,
        },)))
    }

    /// # Errors
    /// Returns an error if `node` isn't a node of this graph
    pub fn select(&mut self, node: hecs::Entity, selected: bool) -> Result<()> {
        if self.world.get::<&Node>(node).is_err() {
            return Err(anyhow!("{node:?} is not a node"));
        }
        if selected {
            self.world.insert_one(node, Selected)?;
        } else {
            // Not being selected already is fine
            let _ = self.world.remove_one::<Selected>(node);
        }
        Ok(())
    }

    pub fn select_all(&mut self) {
        for &node in &self.nodes {
            let _ = self.world.insert_one(node, Selected);
        }
    }

    pub fn clear_selection(&mut self) {
        for &node in &self.nodes {
            let _ = self.world.remove_one::<Selected>(node);
        }
    }

    /// The node a port belongs to, with the port's slot
    fn port_owner(&self, port: hecs::Entity) -> Option<(hecs::Entity, usize)> {
        let parent = self.world.parent(port)?;
        let slot = self.world.get::<&Slot>(port).ok()?.0;
        Some((parent, slot))
    }
}

impl GraphHost for EditorGraph {
    type NodeId = hecs::Entity;

    fn selected_nodes(&self) -> Vec<hecs::Entity> {
        self.nodes
            .iter()
            .copied()
            .filter(|&node| self.is_selected(node))
            .collect()
    }

    fn is_selected(&self, node: hecs::Entity) -> bool {
        self.world.get::<&Selected>(node).is_ok()
    }

    fn position(&self, node: hecs::Entity) -> Point {
        self.position_of(node)
            .map(|p| Point::new(p.x, p.y))
            .unwrap_or_default()
    }

    fn set_position(&mut self, node: hecs::Entity, position: Point) {
        if let Err(e) = self.world.insert_one(node, Pos2::new(position.x, position.y)) {
            warn!("Can't move {node:?}: {e}");
        }
    }

    fn size(&self, node: hecs::Entity) -> LayoutVec2 {
        self.size_of(node)
            .map(|s| LayoutVec2::new(s.x, s.y))
            .unwrap_or_default()
    }

    fn connection_list(&self) -> Vec<Connection<hecs::Entity>> {
        let mut connections = Vec::new();

        for (_, edge) in self.world.query::<&Edge>().iter() {
            let Ok((from_node, from_port)) = self
                .port_owner(edge.output_port)
                .with_context(|| format!("Output port {:?} doesn't have a parent", edge.output_port))
                .inspect_err(|e| warn!("{e}"))
            else {
                continue;
            };

            let Ok((to_node, to_port)) = self
                .port_owner(edge.input_port)
                .with_context(|| format!("Input port {:?} doesn't have a parent", edge.input_port))
                .inspect_err(|e| warn!("{e}"))
            else {
                continue;
            };

            connections.push(Connection::new(from_node, from_port, to_node, to_port));
        }

        connections
    }

    fn zoom(&self) -> f32 {
        self.view.zoom
    }

    fn scroll_offset(&self) -> LayoutVec2 {
        LayoutVec2::new(self.view.scroll_offset.x, self.view.scroll_offset.y)
    }

    fn view_size(&self) -> LayoutVec2 {
        LayoutVec2::new(self.view.size.x, self.view.size.y)
    }
}
