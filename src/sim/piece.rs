//! Players, piece kinds and piece identity

use std::fmt;

use serde::{Deserialize, Serialize};

use super::cell::{Cell, Direction, Mirror};

/// One of the two sides. Black is player A and moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Player {
    Black,
    White,
}

impl Player {
    pub const BOTH: [Player; 2] = [Player::Black, Player::White];

    #[inline]
    pub fn opponent(self) -> Player {
        match self {
            Player::Black => Player::White,
            Player::White => Player::Black,
        }
    }

    /// Slot in per-player arrays
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Player::Black => 0,
            Player::White => 1,
        }
    }

    /// Row holding this player's pieces in the starting layout
    pub fn home_row(self) -> usize {
        match self {
            Player::Black => 0,
            Player::White => crate::consts::BOARD_SIZE - 1,
        }
    }

    /// Direction toward the opponent's home row
    pub fn forward(self) -> Direction {
        match self {
            Player::Black => Direction::South,
            Player::White => Direction::North,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Player::Black => "black",
            Player::White => "white",
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PieceKind {
    /// Losing it to a bullet ends the game
    Titan,
    /// Lets bullets through its front face, absorbs them elsewhere
    Tank,
    /// Two-sided diagonal mirror
    Ricochet,
    /// One-sided diagonal mirror, absorbs on its back faces
    SemiRicochet,
    /// The only piece that fires
    Cannon,
}

impl PieceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PieceKind::Titan => "titan",
            PieceKind::Tank => "tank",
            PieceKind::Ricochet => "ricochet",
            PieceKind::SemiRicochet => "semi-ricochet",
            PieceKind::Cannon => "cannon",
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable piece identifier, assigned in placement order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PieceId(pub u32);

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A piece on the board
///
/// `orientation` is fixed at placement and interpreted per kind:
/// - tank: the front face (bullets striking it pass through)
/// - ricochet: selects the mirror diagonal via [`Mirror::splitting`]
/// - semi-ricochet: the reflective faces are `orientation` and the face
///   clockwise of it; the other two absorb
/// - titan, cannon: unused
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    pub id: PieceId,
    pub kind: PieceKind,
    pub owner: Player,
    pub position: Cell,
    pub orientation: Direction,
}

impl Piece {
    /// Mirror diagonal for reflecting pieces
    pub fn mirror(&self) -> Option<Mirror> {
        match self.kind {
            PieceKind::Ricochet | PieceKind::SemiRicochet => {
                Some(Mirror::splitting(self.orientation))
            }
            _ => None,
        }
    }

    /// Whether a bullet entering through `face` bounces off this piece
    pub fn reflects_from(&self, face: Direction) -> bool {
        match self.kind {
            PieceKind::Ricochet => true,
            PieceKind::SemiRicochet => {
                face == self.orientation || face == self.orientation.rotate_cw()
            }
            _ => false,
        }
    }
}
