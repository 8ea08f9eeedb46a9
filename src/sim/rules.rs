//! Move validation
//!
//! Every piece moves a single step to an orthogonally adjacent cell. The
//! destination must be empty, unless capture-on-move is enabled, in which
//! case an opposing piece may be taken.

use super::board::Board;
use super::cell::Cell;
use super::piece::{Piece, Player};

/// Legality under the default rules (no capture on move)
#[inline]
pub fn is_legal_move(board: &Board, piece: &Piece, to: Cell) -> bool {
    is_legal_move_with(board, piece, to, false)
}

pub fn is_legal_move_with(board: &Board, piece: &Piece, to: Cell, capture_on_move: bool) -> bool {
    if piece.position.manhattan(to) != 1 {
        return false;
    }
    match board.cell_at(to) {
        None => true,
        Some(other) => capture_on_move && other.owner != piece.owner,
    }
}

/// All cells `piece` may move to, in N, E, S, W order
pub fn legal_destinations(board: &Board, piece: &Piece, capture_on_move: bool) -> Vec<Cell> {
    piece
        .position
        .neighbors()
        .filter(|&to| is_legal_move_with(board, piece, to, capture_on_move))
        .collect()
}

/// Every (piece, destination) pair available to `player`, sorted by piece id
pub fn legal_moves(board: &Board, player: Player, capture_on_move: bool) -> Vec<(Piece, Cell)> {
    board
        .pieces_of(player)
        .flat_map(|piece| {
            legal_destinations(board, piece, capture_on_move)
                .into_iter()
                .map(move |to| (piece.clone(), to))
        })
        .collect()
}
