//! Grid coordinates, travel directions and mirror geometry
//!
//! Cells are addressed by (row, col) with row 0 at the top of the board
//! (black's home row). Moving South increases the row. Linear indices
//! (row-major, 0..64) only appear at the API boundary via
//! [`Cell::index`] / [`Cell::from_index`].

use std::fmt;

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::consts::BOARD_SIZE;
use crate::error::EngineError;

/// A square on the 8x8 board
///
/// Always in bounds: the only constructors are the checked ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "[u8; 2]", into = "[u8; 2]")]
pub struct Cell {
    row: u8,
    col: u8,
}

impl Cell {
    /// Create a cell, rejecting coordinates outside the board
    pub fn new(row: usize, col: usize) -> Result<Self, EngineError> {
        if row < BOARD_SIZE && col < BOARD_SIZE {
            Ok(Self {
                row: row as u8,
                col: col as u8,
            })
        } else {
            Err(EngineError::CellOutOfBounds { row, col })
        }
    }

    /// Create a cell from a row-major linear index (0..64)
    pub fn from_index(index: usize) -> Result<Self, EngineError> {
        if index < BOARD_SIZE * BOARD_SIZE {
            Self::new(index / BOARD_SIZE, index % BOARD_SIZE)
        } else {
            Err(EngineError::InvalidCellIndex(index))
        }
    }

    /// Row-major linear index (0..64)
    #[inline]
    pub fn index(self) -> usize {
        self.row as usize * BOARD_SIZE + self.col as usize
    }

    #[inline]
    pub fn row(self) -> usize {
        self.row as usize
    }

    #[inline]
    pub fn col(self) -> usize {
        self.col as usize
    }

    /// Grid position as a vector (x = col, y = row)
    #[inline]
    pub fn as_ivec2(self) -> IVec2 {
        IVec2::new(self.col as i32, self.row as i32)
    }

    /// Cell at a grid vector, or `None` if it lies off the board
    pub fn from_ivec2(pos: IVec2) -> Option<Self> {
        let size = BOARD_SIZE as i32;
        if (0..size).contains(&pos.x) && (0..size).contains(&pos.y) {
            Some(Self {
                row: pos.y as u8,
                col: pos.x as u8,
            })
        } else {
            None
        }
    }

    /// The neighbouring cell one step in `dir`, or `None` at the board edge
    #[inline]
    pub fn step(self, dir: Direction) -> Option<Self> {
        Self::from_ivec2(self.as_ivec2() + dir.delta())
    }

    /// Manhattan distance between two cells
    pub fn manhattan(self, other: Cell) -> u32 {
        let d = (self.as_ivec2() - other.as_ivec2()).abs();
        (d.x + d.y) as u32
    }

    /// Orthogonal neighbours that exist on the board (N, E, S, W order)
    pub fn neighbors(self) -> impl Iterator<Item = Cell> {
        Direction::ALL.into_iter().filter_map(move |dir| self.step(dir))
    }

    /// Every cell on the board in row-major order
    pub fn all() -> impl Iterator<Item = Cell> {
        (0..BOARD_SIZE * BOARD_SIZE).map(|i| Cell {
            row: (i / BOARD_SIZE) as u8,
            col: (i % BOARD_SIZE) as u8,
        })
    }
}

impl TryFrom<[u8; 2]> for Cell {
    type Error = EngineError;

    fn try_from([row, col]: [u8; 2]) -> Result<Self, Self::Error> {
        Cell::new(row as usize, col as usize)
    }
}

impl From<Cell> for [u8; 2] {
    fn from(cell: Cell) -> Self {
        [cell.row, cell.col]
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Orthogonal direction of travel, listed clockwise from North
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Unit step on the grid (x = col, y = row, South is +y)
    #[inline]
    pub fn delta(self) -> IVec2 {
        match self {
            Direction::North => IVec2::NEG_Y,
            Direction::East => IVec2::X,
            Direction::South => IVec2::Y,
            Direction::West => IVec2::NEG_X,
        }
    }

    #[inline]
    pub fn opposite(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    #[inline]
    pub fn rotate_cw(self) -> Self {
        match self {
            Direction::North => Direction::East,
            Direction::East => Direction::South,
            Direction::South => Direction::West,
            Direction::West => Direction::North,
        }
    }

    #[inline]
    pub fn rotate_ccw(self) -> Self {
        self.rotate_cw().opposite()
    }
}

/// A diagonal mirror inside a cell
///
/// `Slash` runs bottom-left to top-right (`/`), `Backslash` top-left to
/// bottom-right (`\`). Reflection always turns the travel direction by 90°.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mirror {
    Slash,
    Backslash,
}

impl Mirror {
    /// Mirror that separates `face` and the face clockwise of it from the
    /// other two faces of the cell
    pub fn splitting(face: Direction) -> Self {
        match face {
            Direction::North | Direction::South => Mirror::Backslash,
            Direction::East | Direction::West => Mirror::Slash,
        }
    }

    /// New travel direction after bouncing off this mirror
    pub fn reflect(self, travel: Direction) -> Direction {
        match (self, travel) {
            (Mirror::Slash, Direction::East) => Direction::North,
            (Mirror::Slash, Direction::North) => Direction::East,
            (Mirror::Slash, Direction::West) => Direction::South,
            (Mirror::Slash, Direction::South) => Direction::West,
            (Mirror::Backslash, Direction::East) => Direction::South,
            (Mirror::Backslash, Direction::South) => Direction::East,
            (Mirror::Backslash, Direction::West) => Direction::North,
            (Mirror::Backslash, Direction::North) => Direction::West,
        }
    }
}
