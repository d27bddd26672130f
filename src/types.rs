//! Newtype wrappers for grid geometry.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A tile coordinate on the grid.
///
/// Coordinates are 1-based with `(1, 1)` in the bottom-left corner. Moving
/// `Up` increases `y`, moving `Right` increases `x`. `(0, 0)` never names a
/// tile and is used as the masked position of terminal states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Masked position stored in terminal state keys.
    pub const MASKED: Position = Position { x: 0, y: 0 };

    /// Tile every episode starts on.
    pub const START: Position = Position { x: 1, y: 1 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The adjacent coordinate in `direction`. May lie off the grid.
    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.offset();
        Self::new(self.x + dx, self.y + dy)
    }

    /// The four orthogonal neighbours in [`Direction::ALL`] order.
    pub fn neighbors(self) -> [Position; 4] {
        Direction::ALL.map(|direction| self.step(direction))
    }

    /// Whether `other` is orthogonally adjacent to this position.
    pub fn is_adjacent(self, other: Position) -> bool {
        (self.x - other.x).abs() + (self.y - other.y).abs() == 1
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Absolute facing of the player, listed clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    fn index(self) -> u8 {
        match self {
            Direction::Up => 0,
            Direction::Right => 1,
            Direction::Down => 2,
            Direction::Left => 3,
        }
    }

    fn from_index(index: u8) -> Self {
        Self::ALL[usize::from(index % 4)]
    }

    /// Grid offset `(dx, dy)` of one step in this direction.
    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, 1),
            Direction::Right => (1, 0),
            Direction::Down => (0, -1),
            Direction::Left => (-1, 0),
        }
    }

    pub fn turn_right(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    pub fn turn_left(self) -> Self {
        Self::from_index(self.index() + 3)
    }

    /// Number of clockwise quarter turns (0-3) needed to face `target`.
    pub fn clockwise_turns_to(self, target: Direction) -> u8 {
        (target.index() + 4 - self.index()) % 4
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Up => "up",
            Direction::Right => "right",
            Direction::Down => "down",
            Direction::Left => "left",
        };
        f.write_str(name)
    }
}

/// Dimensions of a rectangular grid.
///
/// Both sides fit in a byte so positions can be stored in one byte each in
/// state keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize {
    width: u8,
    height: u8,
}

impl GridSize {
    /// The classic 4x4 Wumpus World.
    pub const STANDARD: GridSize = GridSize {
        width: 4,
        height: 4,
    };

    /// Create a grid size, rejecting empty grids.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidConfiguration`] if either side is zero.
    pub fn new(width: u8, height: u8) -> Result<Self, crate::Error> {
        if width == 0 || height == 0 {
            return Err(crate::Error::InvalidConfiguration {
                message: format!("grid size {width}x{height} has no cells"),
            });
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    /// Number of tiles on the grid.
    pub fn cell_count(&self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }

    pub fn contains(&self, position: Position) -> bool {
        (1..=i32::from(self.width)).contains(&position.x)
            && (1..=i32::from(self.height)).contains(&position.y)
    }

    /// Raster index of `position` (row by row, bottom row first).
    pub fn index_of(&self, position: Position) -> Option<usize> {
        if !self.contains(position) {
            return None;
        }
        let row = (position.y - 1) as usize;
        let column = (position.x - 1) as usize;
        Some(row * usize::from(self.width) + column)
    }

    /// All tiles in raster order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + use<> {
        let (width, height) = (i32::from(self.width), i32::from(self.height));
        (1..=height).flat_map(move |y| (1..=width).map(move |x| Position::new(x, y)))
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl fmt::Display for GridSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}
