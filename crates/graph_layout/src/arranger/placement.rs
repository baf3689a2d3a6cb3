use super::connections::ConnectionIndex;
use super::leftmost::leftmost_connected_node;
use super::occupancy::OccupancyGrid;
use super::{ArrangeStats, ArrangerConfig, ChunkBookkeeping};
use crate::{GraphHost, GridPos, GridRect, Slot};
use std::collections::HashSet;
use tracing::{debug, trace};

/// Furthest grid coordinate placement is allowed to reach
const GRID_LIMIT: f64 = (i32::MAX / 2) as f64;

/// A placed node whose neighbors are still being placed
struct PlacementFrame<N> {
    area: GridRect,
    pending: std::vec::IntoIter<(N, GridPos)>,
}

/// State of a single arrangement pass
///
/// Everything here lives for one call to
/// [`GraphArranger::arrange_nodes`](super::GraphArranger::arrange_nodes) and
/// is dropped afterwards.
pub(crate) struct ArrangeSession<'a, H>
where
    H: GraphHost + ?Sized,
{
    host: &'a mut H,
    config: &'a ArrangerConfig,
    connections: ConnectionIndex<H::NodeId>,
    occupied: OccupancyGrid,
    arranged: HashSet<H::NodeId>,
    chunk_rects: Vec<GridRect>,
}

impl<'a, H> ArrangeSession<'a, H>
where
    H: GraphHost + ?Sized,
{
    pub fn new(host: &'a mut H, config: &'a ArrangerConfig) -> Self {
        let connections = ConnectionIndex::new(host.connection_list());
        Self {
            host,
            config,
            connections,
            occupied: OccupancyGrid::new(config.cell_padding),
            arranged: HashSet::new(),
            chunk_rects: Vec::new(),
        }
    }

    /// Whether every grid coordinate of this pass stays in range
    ///
    /// Placement starts from the cells of selected nodes and moves away from
    /// them by at most the footprints of the nodes it places or offsets by,
    /// i.e. the selection and its direct neighbors.
    pub fn fits_grid(&self) -> bool {
        let cell = (
            f64::from(self.config.cell_size.x),
            f64::from(self.config.cell_size.y),
        );
        let padding = (
            f64::from(self.config.cell_padding.x) * 2.0,
            f64::from(self.config.cell_padding.y) * 2.0,
        );

        let selected = self.host.selected_nodes();
        let mut sized: HashSet<H::NodeId> = selected.iter().copied().collect();
        let mut furthest = 0.0_f64;
        for &node in &selected {
            let position = self.host.position(node);
            furthest = furthest
                .max((f64::from(position.x) / cell.0).abs())
                .max((f64::from(position.y) / cell.1).abs());
            sized.extend(self.connections.connected_nodes(node, Slot::Input));
            sized.extend(self.connections.connected_nodes(node, Slot::Output));
        }

        let extent: f64 = sized
            .into_iter()
            .map(|node| {
                let size = self.host.size(node);
                (f64::from(size.x) / cell.0).ceil().max(0.0)
                    + (f64::from(size.y) / cell.1).ceil().max(0.0)
                    + padding.0
                    + padding.1
            })
            .sum();

        furthest + 2.0 * extent < GRID_LIMIT
    }

    /// Place every selected node, one connected component at a time
    pub fn run(&mut self) -> ArrangeStats {
        let mut stats = ArrangeStats::default();

        for node in self.host.selected_nodes() {
            if self.arranged.contains(&node) {
                continue;
            }

            let anchor =
                leftmost_connected_node(&*self.host, &self.connections, node).unwrap_or(node);
            let grid_position = GridPos::from_pixels(self.host.position(anchor), self.config.cell_size);
            debug!("Arranging component of {node:?} from {anchor:?} at {grid_position:?}");

            let placed = self.arrange_chunk(anchor, grid_position);
            if placed.is_some() {
                stats.chunks += 1;
            }

            let recorded = match (self.config.chunk_bookkeeping, placed) {
                (ChunkBookkeeping::OnFailure, None) => Some(GridRect::default()),
                (ChunkBookkeeping::OnSuccess, Some(rect)) => Some(rect),
                _ => None,
            };
            if let Some(rect) = recorded {
                self.chunk_rects.push(rect);
                stats.recorded_chunks += 1;
            }
        }

        stats.nodes = self.arranged.len();
        stats
    }

    /// Move `grid_position` down past every recorded chunk containing it,
    /// then place the component of `start` from there
    fn arrange_chunk(&mut self, start: H::NodeId, mut grid_position: GridPos) -> Option<GridRect> {
        while self
            .chunk_rects
            .iter()
            .any(|rect| rect.has_point(grid_position))
        {
            grid_position.y += 1;
        }
        self.arrange_node(start, grid_position)
    }

    /// Place `node` and every selected node reachable from it that isn't
    /// arranged yet
    ///
    /// Returns the rectangle covering all of their footprints, or `None` if
    /// `node` isn't selected.
    fn arrange_node(&mut self, node: H::NodeId, grid_position: GridPos) -> Option<GridRect> {
        let mut stack = vec![self.place(node, grid_position)?];

        loop {
            let next = stack.last_mut()?.pending.next();
            match next {
                Some((neighbor, suggested_position)) => {
                    // Placed meanwhile by another branch
                    if self.arranged.contains(&neighbor) {
                        continue;
                    }
                    if let Some(frame) = self.place(neighbor, suggested_position) {
                        stack.push(frame);
                    }
                }
                None => {
                    let done = stack.pop()?;
                    match stack.last_mut() {
                        Some(parent) => parent.area = parent.area.merge(&done.area),
                        None => return Some(done.area),
                    }
                }
            }
        }
    }

    /// Position a single node at the first free row at or below
    /// `grid_position`, and queue its neighbors
    fn place(&mut self, node: H::NodeId, grid_position: GridPos) -> Option<PlacementFrame<H::NodeId>> {
        if !self.host.is_selected(node) {
            return None;
        }
        self.arranged.insert(node);

        let inputs = self.connections.connected_nodes(node, Slot::Input);
        let outputs = self.connections.connected_nodes(node, Slot::Output);

        let grid_size = self.node_grid_size(node);
        let mut final_position = grid_position;
        while self.occupied.covers_existing(final_position, grid_size) {
            final_position.y += 1;
        }
        self.occupied.reserve(final_position, grid_size);

        let position = final_position.to_pixels(self.config.cell_size);
        trace!("Placing {node:?} at {final_position:?} ({position:?})");
        self.host.set_position(node, position);

        let mut pending = Vec::with_capacity(inputs.len() + outputs.len());
        let outputs_position =
            final_position + GridPos::new(grid_size.x, -self.nodes_grid_size(&outputs).y / 2);
        self.queue_connected_nodes(outputs, outputs_position, false, &mut pending);
        let inputs_position = final_position + GridPos::new(0, self.nodes_grid_size(&inputs).y / 2);
        self.queue_connected_nodes(inputs, inputs_position, true, &mut pending);

        Some(PlacementFrame {
            area: self.occupied.footprint(final_position, grid_size),
            pending: pending.into_iter(),
        })
    }

    /// Queue neighbors with their suggested position
    ///
    /// With `use_extra_offsets` the neighbor's own footprint is subtracted,
    /// so input neighbors end next to the node instead of starting there.
    fn queue_connected_nodes(
        &self,
        neighbors: Vec<H::NodeId>,
        suggested_position: GridPos,
        use_extra_offsets: bool,
        pending: &mut Vec<(H::NodeId, GridPos)>,
    ) {
        for neighbor in neighbors {
            let mut position = suggested_position;
            if use_extra_offsets {
                position -= self.node_grid_size(neighbor);
            }
            pending.push((neighbor, position));
        }
    }

    fn node_grid_size(&self, node: H::NodeId) -> GridPos {
        self.config.grid_size(self.host.size(node))
    }

    fn nodes_grid_size(&self, nodes: &[H::NodeId]) -> GridPos {
        nodes
            .iter()
            .fold(GridPos::ZERO, |total, &node| total + self.node_grid_size(node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryHost;
    use crate::Point;
    use test_log::test;

    fn arrange(host: &mut MemoryHost, config: &ArrangerConfig) -> ArrangeStats {
        ArrangeSession::new(host, config).run()
    }

    fn grid_of(host: &MemoryHost, node: usize) -> GridPos {
        GridPos::from_pixels(host.nodes[node].position, GridPos::new(100, 25))
    }

    #[test]
    fn chain_is_placed_left_to_right() {
        let mut host = MemoryHost::default();
        let a = host.add_node(0.0, 0.0);
        let b = host.add_node(0.0, 0.0);
        let c = host.add_node(0.0, 0.0);
        host.connect(a, 0, b, 0);
        host.connect(b, 0, c, 0);

        let stats = arrange(&mut host, &ArrangerConfig::default());

        assert_eq!(stats.nodes, 3);
        assert_eq!(stats.chunks, 1);
        assert_eq!(grid_of(&host, a), GridPos::new(0, 0));
        assert_eq!(grid_of(&host, b), GridPos::new(3, -1));
        assert_eq!(grid_of(&host, c), GridPos::new(6, -2));
    }

    #[test]
    fn inputs_end_left_of_the_node() {
        // Two sources feeding one sink, anchored on the first source
        let mut host = MemoryHost::default();
        let sink = host.add_node(0.0, 0.0);
        let first = host.add_node(0.0, 0.0);
        let second = host.add_node(0.0, 0.0);
        host.connect(first, 0, sink, 0);
        host.connect(second, 0, sink, 1);

        arrange(&mut host, &ArrangerConfig::default());

        // first is the anchor and sink goes right of it. second is queued
        // left of sink, over first, and slides down to the first free rows.
        assert_eq!(grid_of(&host, first), GridPos::new(0, 0));
        assert_eq!(grid_of(&host, sink), GridPos::new(3, -1));
        assert_eq!(grid_of(&host, second), GridPos::new(0, 3));
    }

    #[test]
    fn nodes_move_down_past_occupied_rows() {
        let mut host = MemoryHost::default();
        let a = host.add_node(0.0, 0.0);
        let b = host.add_node(0.0, 0.0);

        arrange(&mut host, &ArrangerConfig::default());

        assert_eq!(grid_of(&host, a), GridPos::new(0, 0));
        assert_eq!(grid_of(&host, b), GridPos::new(0, 3));
    }

    #[test]
    fn unselected_anchor_is_left_alone() {
        let mut host = MemoryHost::default();
        let a = host.add_node(40.0, 40.0);
        let b = host.add_node(0.0, 0.0);
        host.connect(a, 0, b, 0);
        host.deselect(a);

        let stats = arrange(&mut host, &ArrangerConfig::default());

        assert_eq!(stats.nodes, 1);
        assert_eq!(host.nodes[a].position, Point::new(40.0, 40.0));
    }

    #[test]
    fn placed_chunks_are_recorded_on_success() {
        let mut host = MemoryHost::default();
        host.add_node(0.0, 0.0);
        host.add_node(0.0, 0.0);

        let config = ArrangerConfig {
            chunk_bookkeeping: ChunkBookkeeping::OnSuccess,
            ..Default::default()
        };
        let stats = arrange(&mut host, &config);
        assert_eq!(stats.recorded_chunks, 2);
        assert_eq!(stats.chunks, 2);

        let config = ArrangerConfig::default();
        let stats = arrange(&mut host, &config);
        assert_eq!(stats.recorded_chunks, 0);
    }

    #[test]
    fn far_away_nodes_do_not_fit_the_grid() {
        let config = ArrangerConfig::default();

        let mut host = MemoryHost::default();
        host.add_node(-4000.0, 1.0e4);
        assert!(ArrangeSession::new(&mut host, &config).fits_grid());

        host.add_node(1.0e12, 0.0);
        assert!(!ArrangeSession::new(&mut host, &config).fits_grid());

        // Unselected neighbors still offset the selection by their size
        let mut host = MemoryHost::default();
        let a = host.add_node(0.0, 0.0);
        let huge = host.add_sized_node(0.0, 0.0, 10.0, 1.0e12);
        host.connect(huge, 0, a, 0);
        host.deselect(huge);
        assert!(!ArrangeSession::new(&mut host, &config).fits_grid());

        let mut host = MemoryHost::default();
        host.add_node(f32::INFINITY, 0.0);
        assert!(!ArrangeSession::new(&mut host, &config).fits_grid());
    }

    #[test]
    fn negative_positions_round_towards_zero() {
        let mut host = MemoryHost::default();
        let a = host.add_node(-10.0, -10.0);

        arrange(&mut host, &ArrangerConfig::default());

        assert_eq!(host.nodes[a].position, Point::new(0.0, 0.0));
    }

    #[test]
    fn recorded_chunks_push_later_components_down() {
        // A wide node recorded as a chunk, then a node anchored inside it
        let mut host = MemoryHost::default();
        let wide = host.add_sized_node(0.0, 0.0, 800.0, 25.0);
        let small = host.add_node(500.0, 0.0);

        let config = ArrangerConfig {
            chunk_bookkeeping: ChunkBookkeeping::OnSuccess,
            ..Default::default()
        };
        arrange(&mut host, &config);

        assert_eq!(grid_of(&host, wide), GridPos::new(0, 0));
        // The chunk ends at row 1 so the anchor starts at row 2, the padding
        // of the wide node then pushes it one more row down
        assert_eq!(grid_of(&host, small), GridPos::new(5, 3));
    }
}
