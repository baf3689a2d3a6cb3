use derive_more::{Add, AddAssign, Neg, Sub, SubAssign};
use serde::{Deserialize, Serialize};

/// 2D vector with f32 coordinates, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    /// Create a new vector
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Create a zero vector
    pub fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }
}

/// 2D point with f32 coordinates, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    /// Create a new point
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Integer coordinate on the layout grid
///
/// Also used for extents measured in cells (node footprints, cell sizes).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Add,
    AddAssign,
    Sub,
    SubAssign,
    Neg,
    Serialize,
    Deserialize,
)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub const ZERO: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Cell of the given pixel position, rounded towards zero
    pub fn from_pixels(point: Point, cell_size: GridPos) -> Self {
        Self {
            x: (point.x / cell_size.x as f32) as i32,
            y: (point.y / cell_size.y as f32) as i32,
        }
    }

    /// Pixel position of the top-left corner of this cell
    pub fn to_pixels(self, cell_size: GridPos) -> Point {
        Point::new(
            self.x as f32 * cell_size.x as f32,
            self.y as f32 * cell_size.y as f32,
        )
    }

    /// Component-wise multiplication
    pub fn scale(self, factor: GridPos) -> Self {
        Self {
            x: self.x * factor.x,
            y: self.y * factor.y,
        }
    }
}

/// Axis-aligned rectangle of grid cells
///
/// The rectangle covers `position.x..position.x + size.x` horizontally and
/// the same half-open range vertically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GridRect {
    pub position: GridPos,
    pub size: GridPos,
}

impl GridRect {
    pub fn new(position: GridPos, size: GridPos) -> Self {
        Self { position, size }
    }

    /// One past the bottom-right cell
    pub fn end(&self) -> GridPos {
        self.position + self.size
    }

    pub fn has_point(&self, point: GridPos) -> bool {
        let end = self.end();
        point.x >= self.position.x && point.y >= self.position.y && point.x < end.x && point.y < end.y
    }

    /// Whether the two rectangles share at least one cell
    pub fn intersects(&self, other: &GridRect) -> bool {
        let (a_end, b_end) = (self.end(), other.end());
        self.position.x < b_end.x
            && other.position.x < a_end.x
            && self.position.y < b_end.y
            && other.position.y < a_end.y
    }

    /// Smallest rectangle containing both rectangles
    pub fn merge(&self, other: &GridRect) -> GridRect {
        let position = GridPos::new(
            self.position.x.min(other.position.x),
            self.position.y.min(other.position.y),
        );
        let (a_end, b_end) = (self.end(), other.end());
        let end = GridPos::new(a_end.x.max(b_end.x), a_end.y.max(b_end.y));
        GridRect::new(position, end - position)
    }

    /// Number of cells covered
    pub fn area(&self) -> i64 {
        i64::from(self.size.x.max(0)) * i64::from(self.size.y.max(0))
    }
}
