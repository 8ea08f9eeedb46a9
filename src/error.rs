//! Rejection taxonomy for engine intents
//!
//! Every error here is a local, recoverable rejection: the state is left
//! exactly as it was before the intent.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::{Cell, PieceId, Player};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("cell ({row}, {col}) is outside the board")]
    CellOutOfBounds { row: usize, col: usize },
    #[error("cell index {0} is outside the board")]
    InvalidCellIndex(usize),
    #[error("unknown piece {0}")]
    UnknownPiece(PieceId),
    #[error("cell {0} is already occupied")]
    CellOccupied(Cell),
    #[error("piece {piece} cannot move to {to}")]
    IllegalMove { piece: PieceId, to: Cell },
    #[error("piece {piece} belongs to {owner}, who is not on turn")]
    NotYourTurn { piece: PieceId, owner: Player },
    #[error("{0} is not on turn")]
    WrongPlayer(Player),
    #[error("{0} has no cannon left to fire")]
    NoCannon(Player),
    #[error("game is paused")]
    Paused,
    #[error("game is over; only reset is accepted")]
    GameOver,
}

/// Coarse rejection category reported alongside an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    InvalidArgument,
    IllegalMove,
    InactiveTurn,
    TerminalState,
}

impl EngineError {
    pub fn reason(&self) -> RejectReason {
        match self {
            EngineError::CellOutOfBounds { .. }
            | EngineError::InvalidCellIndex(_)
            | EngineError::UnknownPiece(_)
            | EngineError::CellOccupied(_) => RejectReason::InvalidArgument,
            EngineError::IllegalMove { .. } | EngineError::NoCannon(_) => {
                RejectReason::IllegalMove
            }
            EngineError::NotYourTurn { .. } | EngineError::WrongPlayer(_) | EngineError::Paused => {
                RejectReason::InactiveTurn
            }
            EngineError::GameOver => RejectReason::TerminalState,
        }
    }
}
