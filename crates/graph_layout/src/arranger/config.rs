use crate::{GridPos, Vec2};
use serde::{Deserialize, Serialize};

/// When a placed component's rectangle is kept to push later components down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ChunkBookkeeping {
    /// Record a rectangle only when the component couldn't be placed. Placed
    /// components are then kept apart by the occupancy grid alone.
    #[default]
    OnFailure,
    /// Record the rectangle of every placed component
    OnSuccess,
}

/// Configuration of the grid arranger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArrangerConfig {
    /// Size of a grid cell, in pixels
    pub cell_size: GridPos,

    /// Empty cells kept around every node
    pub cell_padding: GridPos,

    pub chunk_bookkeeping: ChunkBookkeeping,
}

impl Default for ArrangerConfig {
    fn default() -> Self {
        Self {
            cell_size: GridPos::new(100, 25),
            cell_padding: GridPos::new(1, 1),
            chunk_bookkeeping: ChunkBookkeeping::default(),
        }
    }
}

impl ArrangerConfig {
    /// Create a configuration with the given cell size
    pub fn new(cell_size: GridPos) -> Self {
        Self {
            cell_size,
            ..Default::default()
        }
    }

    /// Footprint of a node of the given pixel size, padding included
    pub fn grid_size(&self, size: Vec2) -> GridPos {
        let cells = GridPos::new(
            (size.x / self.cell_size.x as f32).ceil().max(0.0) as i32,
            (size.y / self.cell_size.y as f32).ceil().max(0.0) as i32,
        );
        cells + self.cell_padding.scale(GridPos::new(2, 2))
    }

    pub(crate) fn is_valid(&self) -> bool {
        self.cell_size.x > 0
            && self.cell_size.y > 0
            && self.cell_padding.x >= 0
            && self.cell_padding.y >= 0
    }
}
