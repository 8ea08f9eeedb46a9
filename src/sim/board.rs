//! Board model and piece registry
//!
//! The registry (`pieces`) owns every piece; grid slots only hold the id of
//! the occupant. Both live in one value so a snapshot always captures them
//! together, and every mutation goes through methods that update both sides
//! in a single step.

use serde::{Deserialize, Serialize};

use super::cell::{Cell, Direction};
use super::piece::{Piece, PieceId, PieceKind, Player};
use crate::consts::BOARD_SIZE;
use crate::error::EngineError;

/// Grid of cell occupants plus the registry of live pieces
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    grid: [[Option<PieceId>; BOARD_SIZE]; BOARD_SIZE],
    /// Live pieces, sorted by id for deterministic iteration
    pieces: Vec<Piece>,
    next_id: u32,
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl Board {
    pub fn empty() -> Self {
        Self {
            grid: [[None; BOARD_SIZE]; BOARD_SIZE],
            pieces: Vec::new(),
            next_id: 1,
        }
    }

    /// Starting layout: each side fills its home row with
    /// tank, ricochet, semi-ricochet, titan, semi-ricochet, ricochet, tank, cannon.
    pub fn standard() -> Self {
        use Direction::*;
        use PieceKind::*;

        // (kind, black orientation, white orientation) per column
        const LAYOUT: [(PieceKind, Direction, Direction); BOARD_SIZE] = [
            (Tank, South, North),
            (Ricochet, East, North),
            (SemiRicochet, South, West),
            (Titan, South, North),
            (SemiRicochet, East, North),
            (Ricochet, North, East),
            (Tank, South, North),
            (Cannon, South, North),
        ];

        let mut board = Self::empty();
        for player in Player::BOTH {
            let row = player.home_row();
            for (col, &(kind, black_facing, white_facing)) in LAYOUT.iter().enumerate() {
                let orientation = match player {
                    Player::Black => black_facing,
                    Player::White => white_facing,
                };
                let cell = Cell::new(row, col).expect("layout is within the board");
                board
                    .spawn(kind, player, cell, orientation)
                    .expect("layout cells are distinct");
            }
        }
        board
    }

    /// Create a new piece at an empty cell
    pub fn spawn(
        &mut self,
        kind: PieceKind,
        owner: Player,
        cell: Cell,
        orientation: Direction,
    ) -> Result<PieceId, EngineError> {
        if self.occupant(cell).is_some() {
            return Err(EngineError::CellOccupied(cell));
        }
        let id = PieceId(self.next_id);
        self.next_id += 1;
        self.pieces.push(Piece {
            id,
            kind,
            owner,
            position: cell,
            orientation,
        });
        self.grid[cell.row()][cell.col()] = Some(id);
        self.assert_consistent();
        Ok(id)
    }

    /// Id of the piece standing on `cell`
    #[inline]
    pub fn occupant(&self, cell: Cell) -> Option<PieceId> {
        self.grid[cell.row()][cell.col()]
    }

    /// Piece standing on `cell`
    pub fn cell_at(&self, cell: Cell) -> Option<&Piece> {
        self.occupant(cell).and_then(|id| self.piece(id))
    }

    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.slot(id).map(|i| &self.pieces[i])
    }

    /// Look up a piece, reporting unknown ids as an error
    pub fn get(&self, id: PieceId) -> Result<&Piece, EngineError> {
        self.piece(id).ok_or(EngineError::UnknownPiece(id))
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    /// Pieces owned by `player`
    pub fn pieces_of(&self, player: Player) -> impl Iterator<Item = &Piece> {
        self.pieces.iter().filter(move |p| p.owner == player)
    }

    /// The first (lowest id) piece of a kind owned by `player`
    pub fn find(&self, player: Player, kind: PieceKind) -> Option<&Piece> {
        self.pieces_of(player).find(|p| p.kind == kind)
    }

    /// Move an existing piece to `to`, updating the grid and the piece's
    /// position together. The destination must be empty.
    pub fn place(&mut self, id: PieceId, to: Cell) -> Result<(), EngineError> {
        let slot = self.slot(id).ok_or(EngineError::UnknownPiece(id))?;
        let from = self.pieces[slot].position;
        if from == to {
            return Ok(());
        }
        if self.occupant(to).is_some() {
            return Err(EngineError::CellOccupied(to));
        }
        self.grid[from.row()][from.col()] = None;
        self.grid[to.row()][to.col()] = Some(id);
        self.pieces[slot].position = to;
        self.assert_consistent();
        Ok(())
    }

    /// Take the piece on `cell` off the board and out of the registry
    pub fn remove(&mut self, cell: Cell) -> Option<Piece> {
        let id = self.grid[cell.row()][cell.col()].take()?;
        let slot = self
            .slot(id)
            .expect("grid references a piece missing from the registry");
        let piece = self.pieces.remove(slot);
        self.assert_consistent();
        Some(piece)
    }

    /// Every occupied cell matches its piece's position and no two pieces
    /// share a cell
    pub fn is_consistent(&self) -> bool {
        let occupied = Cell::all().filter(|&c| self.occupant(c).is_some()).count();
        occupied == self.pieces.len()
            && self.pieces.windows(2).all(|w| w[0].id < w[1].id)
            && self
                .pieces
                .iter()
                .all(|p| self.occupant(p.position) == Some(p.id))
    }

    /// Internal consistency check, compiled out of release builds
    #[inline]
    pub fn assert_consistent(&self) {
        debug_assert!(self.is_consistent(), "board and piece registry out of sync");
    }

    fn slot(&self, id: PieceId) -> Option<usize> {
        self.pieces.binary_search_by_key(&id, |p| p.id).ok()
    }

    /// Text rendering for logs and debugging, one line per row
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(BOARD_SIZE * (BOARD_SIZE + 1));
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                let ch = Cell::new(row, col)
                    .ok()
                    .and_then(|c| self.cell_at(c))
                    .map(|p| {
                        let ch = match p.kind {
                            PieceKind::Titan => 'i',
                            PieceKind::Tank => 't',
                            PieceKind::Ricochet => 'r',
                            PieceKind::SemiRicochet => 's',
                            PieceKind::Cannon => 'c',
                        };
                        match p.owner {
                            Player::Black => ch,
                            Player::White => ch.to_ascii_uppercase(),
                        }
                    })
                    .unwrap_or('.');
                out.push(ch);
            }
            out.push('\n');
        }
        out
    }
}
