use crate::{Point, Vec2};
use petgraph::Direction;
use std::fmt::Debug;
use std::hash::Hash;

/// Side of a node a connection is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Input,
    Output,
}

impl From<Slot> for Direction {
    fn from(slot: Slot) -> Self {
        match slot {
            Slot::Input => Direction::Incoming,
            Slot::Output => Direction::Outgoing,
        }
    }
}

/// A link from an output port of one node to an input port of another
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Connection<N> {
    pub from_node: N,
    pub from_port: usize,
    pub to_node: N,
    pub to_port: usize,
}

impl<N> Connection<N> {
    pub fn new(from_node: N, from_port: usize, to_node: N, to_port: usize) -> Self {
        Self {
            from_node,
            from_port,
            to_node,
            to_port,
        }
    }
}

/// The graph widget the arranger works on
///
/// The host owns the nodes and the connections. The arranger only reads
/// selection, sizes and connections, and writes back node positions.
pub trait GraphHost {
    /// The type used to identify nodes in the graph
    type NodeId: Copy + Ord + Hash + Debug;

    /// Selected graph nodes, in child order
    fn selected_nodes(&self) -> Vec<Self::NodeId>;

    fn is_selected(&self, node: Self::NodeId) -> bool;

    /// Position offset of the node, in pixels
    fn position(&self, node: Self::NodeId) -> Point;

    fn set_position(&mut self, node: Self::NodeId, position: Point);

    /// Size of the node, in pixels
    fn size(&self, node: Self::NodeId) -> Vec2;

    /// Every connection of the graph, in the host's own order
    fn connection_list(&self) -> Vec<Connection<Self::NodeId>>;

    fn zoom(&self) -> f32 {
        1.0
    }

    fn scroll_offset(&self) -> Vec2 {
        Vec2::zero()
    }

    /// Size of the visible area of the widget
    fn view_size(&self) -> Vec2 {
        Vec2::zero()
    }
}

impl<H> GraphHost for &mut H
where
    H: GraphHost + ?Sized,
{
    type NodeId = H::NodeId;

    fn selected_nodes(&self) -> Vec<Self::NodeId> {
        (**self).selected_nodes()
    }

    fn is_selected(&self, node: Self::NodeId) -> bool {
        (**self).is_selected(node)
    }

    fn position(&self, node: Self::NodeId) -> Point {
        (**self).position(node)
    }

    fn set_position(&mut self, node: Self::NodeId, position: Point) {
        (**self).set_position(node, position)
    }

    fn size(&self, node: Self::NodeId) -> Vec2 {
        (**self).size(node)
    }

    fn connection_list(&self) -> Vec<Connection<Self::NodeId>> {
        (**self).connection_list()
    }

    fn zoom(&self) -> f32 {
        (**self).zoom()
    }

    fn scroll_offset(&self) -> Vec2 {
        (**self).scroll_offset()
    }

    fn view_size(&self) -> Vec2 {
        (**self).view_size()
    }
}
