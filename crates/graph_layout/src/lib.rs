//! Automatic arrangement of the selected nodes of a graph editor
//!
//! This crate places the selected nodes of a node graph (shader graphs,
//! visual scripts, media pipelines...) on a coarse grid so that connected
//! nodes read left to right, inputs before outputs, and no two nodes overlap.
//! It is a single heuristic tuned for an "arrange" button, not a general
//! purpose layout engine.
//!
//! The graph stays owned by the editor, which exposes it through the
//! [`GraphHost`] trait. The arranger reads the selection, node sizes and
//! connections, and writes node positions back.
//!
//! # Example
//!
//! ```
//! use graph_layout::{ArrangerConfig, Connection, GraphArranger, GraphHost, Point, Vec2};
//!
//! struct Nodes {
//!     positions: Vec<Point>,
//!     connections: Vec<Connection<usize>>,
//! }
//!
//! impl GraphHost for Nodes {
//!     type NodeId = usize;
//!
//!     fn selected_nodes(&self) -> Vec<usize> {
//!         (0..self.positions.len()).collect()
//!     }
//!     fn is_selected(&self, _node: usize) -> bool {
//!         true
//!     }
//!     fn position(&self, node: usize) -> Point {
//!         self.positions[node]
//!     }
//!     fn set_position(&mut self, node: usize, position: Point) {
//!         self.positions[node] = position;
//!     }
//!     fn size(&self, _node: usize) -> Vec2 {
//!         Vec2::new(100.0, 25.0)
//!     }
//!     fn connection_list(&self) -> Vec<Connection<usize>> {
//!         self.connections.clone()
//!     }
//! }
//!
//! let nodes = Nodes {
//!     positions: vec![Point::new(0.0, 0.0); 2],
//!     connections: vec![Connection::new(0, 0, 1, 0)],
//! };
//!
//! let arranger = GraphArranger::with_host(ArrangerConfig::default(), nodes);
//! arranger.arrange_nodes().unwrap();
//!
//! let nodes = arranger.into_host().unwrap();
//! assert!(nodes.positions[1].x > nodes.positions[0].x);
//! ```

mod arranger;
mod geometry;
mod host;

#[cfg(test)]
mod testing;

pub use arranger::{
    ArrangeError, ArrangeStats, Arrangement, ArrangerConfig, ChunkBookkeeping, GraphArranger,
};
pub use geometry::{GridPos, GridRect, Point, Vec2};
pub use host::{Connection, GraphHost, Slot};
