//! Deterministic rules engine
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - State changes only through intents and clock ticks
//! - Stable iteration order (pieces sorted by id)
//! - Shots resolved synchronously, replayed by the caller
//! - No rendering or platform dependencies

pub mod board;
pub mod cell;
pub mod clock;
pub mod engine;
pub mod history;
pub mod piece;
pub mod rules;
pub mod state;
pub mod trajectory;

#[cfg(test)]
pub(crate) mod strategies;

pub use board::Board;
pub use cell::{Cell, Direction, Mirror};
pub use clock::{Clock, format_clock};
pub use engine::{GameEvent, Intent, ShotReplay, advance, apply, tick};
pub use history::History;
pub use piece::{Piece, PieceId, PieceKind, Player};
pub use rules::{is_legal_move, is_legal_move_with, legal_destinations, legal_moves};
pub use state::{GameOverReason, GamePhase, GameResult, GameState, StateView, TimeRemaining};
pub use trajectory::{
    BulletStep, BulletTrace, FiringModel, Impact, ShotOutcome, Termination, fire,
};
