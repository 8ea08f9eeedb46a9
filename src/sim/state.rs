//! Game state
//!
//! One explicitly owned value holds everything a match needs. It is only
//! mutated through [`crate::sim::engine`], which keeps the board, the turn
//! and the clocks consistent with each other.

use serde::{Deserialize, Serialize};

use super::board::Board;
use super::clock::Clock;
use super::history::History;
use super::piece::{Piece, PieceId, Player};
use crate::settings::Settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameOverReason {
    TitanDestroyed,
    Timeout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    pub winner: Player,
    pub reason: GameOverReason,
}

/// Coarse phase of play, derived from the state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the given player to move or fire
    AwaitingMove(Player),
    /// Clock stopped; only resume (or reset) is accepted
    Paused,
    /// Finished; only reset is accepted
    GameOver(GameResult),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub(crate) settings: Settings,
    pub(crate) board: Board,
    pub(crate) current_player: Player,
    pub(crate) paused: bool,
    pub(crate) clock: Clock,
    /// Board snapshots taken right before each accepted mutation
    pub(crate) history: History<Board>,
    pub(crate) selected: Option<PieceId>,
    pub(crate) result: Option<GameResult>,
    /// Bumped on every reset so stale presentation callbacks can be dropped
    pub(crate) generation: u64,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl GameState {
    /// Fresh match with the standard starting layout
    pub fn new(settings: Settings) -> Self {
        Self::with_board(settings, Board::standard())
    }

    /// Fresh match on a custom board; black moves first
    pub fn with_board(settings: Settings, board: Board) -> Self {
        board.assert_consistent();
        Self {
            clock: Clock::new(settings.initial_time_secs),
            settings,
            board,
            current_player: Player::Black,
            paused: false,
            history: History::new(),
            selected: None,
            result: None,
            generation: 0,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_player(&self) -> Player {
        self.current_player
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn selected(&self) -> Option<PieceId> {
        self.selected
    }

    pub fn result(&self) -> Option<GameResult> {
        self.result
    }

    pub fn is_over(&self) -> bool {
        self.result.is_some()
    }

    pub fn time_remaining(&self, player: Player) -> u32 {
        self.clock.remaining(player)
    }

    pub fn history(&self) -> &History<Board> {
        &self.history
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether a callback scheduled under `generation` still applies
    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    pub fn phase(&self) -> GamePhase {
        match (self.result, self.paused) {
            (Some(result), _) => GamePhase::GameOver(result),
            (None, true) => GamePhase::Paused,
            (None, false) => GamePhase::AwaitingMove(self.current_player),
        }
    }

    /// Serializable snapshot for the presentation layer
    pub fn view(&self) -> StateView {
        StateView {
            generation: self.generation,
            current_player: self.current_player,
            phase: self.phase(),
            paused: self.paused,
            time_remaining: TimeRemaining {
                black: self.clock.remaining(Player::Black),
                white: self.clock.remaining(Player::White),
            },
            pieces: self.board.pieces().to_vec(),
            selected: self.selected,
            result: self.result,
            can_undo: self.history.can_undo(),
            can_redo: self.history.can_redo(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRemaining {
    pub black: u32,
    pub white: u32,
}

/// What the presentation layer needs to draw the current state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateView {
    pub generation: u64,
    pub current_player: Player,
    pub phase: GamePhase,
    pub paused: bool,
    pub time_remaining: TimeRemaining,
    pub pieces: Vec<Piece>,
    pub selected: Option<PieceId>,
    pub result: Option<GameResult>,
    pub can_undo: bool,
    pub can_redo: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_game() {
        let state = GameState::default();
        assert_eq!(state.current_player(), Player::Black);
        assert_eq!(state.phase(), GamePhase::AwaitingMove(Player::Black));
        assert_eq!(state.time_remaining(Player::Black), 300);
        assert_eq!(state.time_remaining(Player::White), 300);
        assert!(!state.history().can_undo());
        assert_eq!(state.board().pieces().len(), 16);
    }

    #[test]
    fn test_custom_timer() {
        let state = GameState::new(Settings {
            initial_time_secs: 90,
            ..Default::default()
        });
        assert_eq!(state.time_remaining(Player::White), 90);
    }

    #[test]
    fn test_view_serializes() {
        let view = GameState::default().view();
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["current_player"], "black");
        assert_eq!(json["time_remaining"]["white"], 300);
        assert_eq!(json["pieces"].as_array().unwrap().len(), 16);
        assert_eq!(json["pieces"][0]["position"], serde_json::json!([0, 0]));
    }
}
