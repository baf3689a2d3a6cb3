use crate::{GridPos, GridRect};
use std::collections::HashSet;

/// Set of grid cells claimed by the nodes placed so far
#[derive(Debug, Clone, Default)]
pub(crate) struct OccupancyGrid {
    padding: GridPos,
    cells: HashSet<GridPos>,
}

impl OccupancyGrid {
    pub fn new(padding: GridPos) -> Self {
        Self {
            padding,
            cells: HashSet::new(),
        }
    }

    /// Cells covered by a node of `grid_size` (padding included) placed at
    /// `grid_position`
    pub fn footprint(&self, grid_position: GridPos, grid_size: GridPos) -> GridRect {
        GridRect::new(grid_position - self.padding, grid_size)
    }

    /// Whether a node placed there would cover an already claimed cell
    pub fn covers_existing(&self, grid_position: GridPos, grid_size: GridPos) -> bool {
        let rect = self.footprint(grid_position, grid_size);
        cells_of(rect).any(|cell| self.cells.contains(&cell))
    }

    /// Claim every cell of the node's footprint
    pub fn reserve(&mut self, grid_position: GridPos, grid_size: GridPos) {
        let rect = self.footprint(grid_position, grid_size);
        self.cells.extend(cells_of(rect));
    }

    #[cfg(test)]
    pub fn contains(&self, cell: GridPos) -> bool {
        self.cells.contains(&cell)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.cells.len()
    }
}

fn cells_of(rect: GridRect) -> impl Iterator<Item = GridPos> {
    let end = rect.end();
    (rect.position.x..end.x)
        .flat_map(move |x| (rect.position.y..end.y).map(move |y| GridPos::new(x, y)))
}
