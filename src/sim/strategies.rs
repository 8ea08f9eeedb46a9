//! Proptest strategies for random board configurations

use proptest::prelude::*;

use super::board::Board;
use super::cell::{Cell, Direction};
use super::piece::{PieceKind, Player};

pub fn arb_kind() -> impl Strategy<Value = PieceKind> {
    prop_oneof![
        Just(PieceKind::Titan),
        Just(PieceKind::Tank),
        Just(PieceKind::Ricochet),
        Just(PieceKind::SemiRicochet),
        Just(PieceKind::Cannon),
    ]
}

pub fn arb_player() -> impl Strategy<Value = Player> {
    prop_oneof![Just(Player::Black), Just(Player::White)]
}

pub fn arb_direction() -> impl Strategy<Value = Direction> {
    prop_oneof![
        Just(Direction::North),
        Just(Direction::East),
        Just(Direction::South),
        Just(Direction::West),
    ]
}

fn spawn_all(board: &mut Board, specs: Vec<(usize, PieceKind, Player, Direction)>) {
    for (index, kind, owner, orientation) in specs {
        let cell = Cell::from_index(index).unwrap();
        // Duplicate cells are simply skipped
        let _ = board.spawn(kind, owner, cell, orientation);
    }
}

/// Up to 24 pieces scattered over the board
pub fn arb_board() -> impl Strategy<Value = Board> {
    prop::collection::vec(
        (0usize..64, arb_kind(), arb_player(), arb_direction()),
        0..24,
    )
    .prop_map(|specs| {
        let mut board = Board::empty();
        spawn_all(&mut board, specs);
        board
    })
}

/// A random board on which black owns a cannon (always the lowest id)
pub fn arb_board_with_black_cannon() -> impl Strategy<Value = Board> {
    (
        0usize..64,
        prop::collection::vec(
            (0usize..64, arb_kind(), arb_player(), arb_direction()),
            0..32,
        ),
    )
        .prop_map(|(cannon_at, specs)| {
            let mut board = Board::empty();
            let cell = Cell::from_index(cannon_at).unwrap();
            board
                .spawn(PieceKind::Cannon, Player::Black, cell, Direction::South)
                .unwrap();
            spawn_all(&mut board, specs);
            board
        })
}
