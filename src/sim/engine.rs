//! Intent/event boundary of the rules engine
//!
//! The presentation layer sends [`Intent`]s through [`apply`] and drives the
//! clock with [`tick`] (one call per tick period) or [`advance`] (raw elapsed
//! wall time). Every call returns the [`GameEvent`]s to display. A rejected
//! intent returns an error and leaves the state untouched.

use serde::{Deserialize, Serialize};

use super::cell::Cell;
use super::piece::{PieceId, PieceKind, Player};
use super::rules::{is_legal_move_with, legal_destinations};
use super::state::{GameOverReason, GameResult, GameState, StateView};
use super::trajectory::{self, BulletStep};
use crate::error::EngineError;

/// A user intent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Intent {
    /// Highlight a piece and its legal destinations
    SelectPiece { piece: PieceId },
    /// Move a piece one step
    Move { piece: PieceId, to: Cell },
    /// Fire `player`'s cannon as their turn action
    Fire { player: Player },
    Pause,
    Resume,
    TogglePause,
    /// Replace the state with a fresh match (accepted in every phase)
    Reset,
    Undo,
    Redo,
}

/// Bullet path of one shot, ready to be animated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShotReplay {
    /// State generation the shot belongs to
    pub generation: u64,
    /// Delay between consecutive steps
    pub step_ms: u64,
    pub steps: Vec<BulletStep>,
}

impl ShotReplay {
    /// Offset from the start of the replay at which step `index` is shown
    pub fn delay_of(&self, index: usize) -> u64 {
        index as u64 * self.step_ms
    }

    /// Total length of the replay
    pub fn duration_ms(&self) -> u64 {
        self.delay_of(self.steps.len())
    }
}

/// Something the presentation layer should show
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum GameEvent {
    StateChanged {
        state: StateView,
    },
    PieceSelected {
        piece: PieceId,
        destinations: Vec<Cell>,
    },
    PieceMoved {
        piece: PieceId,
        from: Cell,
        to: Cell,
    },
    ShotFired {
        shooter: Player,
        origin: Cell,
        replay: ShotReplay,
    },
    BulletStep {
        from: Cell,
        to: Cell,
    },
    PieceCaptured {
        piece: PieceId,
        kind: PieceKind,
        owner: Player,
        at: Cell,
    },
    GameOver {
        winner: Player,
        reason: GameOverReason,
    },
}

/// Apply a user intent
pub fn apply(state: &mut GameState, intent: Intent) -> Result<Vec<GameEvent>, EngineError> {
    let result = dispatch(state, intent);
    match &result {
        Ok(_) => state.board.assert_consistent(),
        Err(err) => log::debug!("Rejected {:?}: {}", intent, err),
    }
    result
}

fn dispatch(state: &mut GameState, intent: Intent) -> Result<Vec<GameEvent>, EngineError> {
    if intent == Intent::Reset {
        return Ok(reset(state));
    }
    if state.is_over() {
        return Err(EngineError::GameOver);
    }
    match intent {
        Intent::Pause => return Ok(set_paused(state, true)),
        Intent::Resume => return Ok(set_paused(state, false)),
        Intent::TogglePause => return Ok(set_paused(state, !state.paused)),
        _ if state.paused => return Err(EngineError::Paused),
        _ => {}
    }

    match intent {
        Intent::SelectPiece { piece } => select(state, piece),
        Intent::Move { piece, to } => move_piece(state, piece, to),
        Intent::Fire { player } => fire(state, player),
        Intent::Undo => Ok(undo(state)),
        Intent::Redo => Ok(redo(state)),
        Intent::Pause | Intent::Resume | Intent::TogglePause | Intent::Reset => Ok(Vec::new()),
    }
}

/// Advance the active player's clock by one tick
///
/// Does nothing while paused or after the game is over.
pub fn tick(state: &mut GameState) -> Vec<GameEvent> {
    if state.is_over() || state.paused {
        return Vec::new();
    }
    let mut events = Vec::new();
    let player = state.current_player;
    if state.clock.tick(player) {
        log::info!("{} ran out of time", player);
        finish(state, player.opponent(), GameOverReason::Timeout, &mut events);
    }
    events.push(changed(state));
    events
}

/// Feed elapsed wall time and run every tick that became due
pub fn advance(state: &mut GameState, elapsed_ms: u64) -> Vec<GameEvent> {
    if state.is_over() || state.paused {
        state.clock.clear_pending();
        return Vec::new();
    }
    let ticks = state
        .clock
        .accumulate(elapsed_ms, state.settings.tick_period_ms);
    let mut events = Vec::new();
    for _ in 0..ticks {
        events.extend(tick(state));
        if state.is_over() {
            break;
        }
    }
    events
}

fn changed(state: &GameState) -> GameEvent {
    GameEvent::StateChanged {
        state: state.view(),
    }
}

fn reset(state: &mut GameState) -> Vec<GameEvent> {
    let generation = state.generation + 1;
    *state = GameState::new(state.settings.clone());
    state.generation = generation;
    log::info!("Game reset (generation {})", generation);
    vec![changed(state)]
}

fn set_paused(state: &mut GameState, paused: bool) -> Vec<GameEvent> {
    if state.paused == paused {
        return Vec::new();
    }
    state.paused = paused;
    state.clock.clear_pending();
    log::info!("Game {}", if paused { "paused" } else { "resumed" });
    vec![changed(state)]
}

/// Look up a piece and make sure it belongs to the player on turn
fn own_piece(state: &GameState, id: PieceId) -> Result<(), EngineError> {
    let piece = state.board.get(id)?;
    if piece.owner != state.current_player {
        return Err(EngineError::NotYourTurn {
            piece: id,
            owner: piece.owner,
        });
    }
    Ok(())
}

fn select(state: &mut GameState, id: PieceId) -> Result<Vec<GameEvent>, EngineError> {
    own_piece(state, id)?;
    let piece = state.board.get(id)?;
    let destinations = legal_destinations(&state.board, piece, state.settings.capture_on_move);
    state.selected = Some(id);
    Ok(vec![GameEvent::PieceSelected {
        piece: id,
        destinations,
    }])
}

fn move_piece(
    state: &mut GameState,
    id: PieceId,
    to: Cell,
) -> Result<Vec<GameEvent>, EngineError> {
    own_piece(state, id)?;
    let piece = state.board.get(id)?;
    let from = piece.position;
    if !is_legal_move_with(&state.board, piece, to, state.settings.capture_on_move) {
        return Err(EngineError::IllegalMove { piece: id, to });
    }

    state.history.record(state.board.clone());
    let mover = state.current_player;
    let mut events = Vec::new();

    if let Some(taken) = state.board.remove(to) {
        log::info!("{} took {} {} at {}", mover, taken.owner, taken.kind, to);
        events.push(GameEvent::PieceCaptured {
            piece: taken.id,
            kind: taken.kind,
            owner: taken.owner,
            at: to,
        });
        if taken.kind == PieceKind::Titan {
            let winner = taken.owner.opponent();
            finish(state, winner, GameOverReason::TitanDestroyed, &mut events);
        }
    }
    state.board.place(id, to)?;
    state.selected = None;
    events.push(GameEvent::PieceMoved { piece: id, from, to });

    let can_fire = state.board.find(mover, PieceKind::Cannon).is_some();
    if !state.is_over() && state.settings.auto_fire && can_fire {
        resolve_shot(state, mover, &mut events)?;
    }
    if !state.is_over() {
        end_turn(state);
    }
    events.push(changed(state));
    Ok(events)
}

fn fire(state: &mut GameState, player: Player) -> Result<Vec<GameEvent>, EngineError> {
    if player != state.current_player {
        return Err(EngineError::WrongPlayer(player));
    }
    if state.board.find(player, PieceKind::Cannon).is_none() {
        return Err(EngineError::NoCannon(player));
    }

    state.history.record(state.board.clone());
    let mut events = Vec::new();
    resolve_shot(state, player, &mut events)?;
    if !state.is_over() {
        end_turn(state);
    }
    events.push(changed(state));
    Ok(events)
}

/// Fire `shooter`'s cannon on the live board and report what happened
fn resolve_shot(
    state: &mut GameState,
    shooter: Player,
    events: &mut Vec<GameEvent>,
) -> Result<(), EngineError> {
    let outcome = trajectory::fire(&mut state.board, shooter, state.settings.firing_model)?;

    let steps: Vec<BulletStep> = outcome.steps().copied().collect();
    events.push(GameEvent::ShotFired {
        shooter,
        origin: outcome.origin,
        replay: ShotReplay {
            generation: state.generation,
            step_ms: state.settings.bullet_step_ms,
            steps: steps.clone(),
        },
    });
    events.extend(
        steps
            .into_iter()
            .map(|s| GameEvent::BulletStep { from: s.from, to: s.to }),
    );
    for piece in &outcome.captured {
        events.push(GameEvent::PieceCaptured {
            piece: piece.id,
            kind: piece.kind,
            owner: piece.owner,
            at: piece.position,
        });
    }
    if let Some(winner) = outcome.winner {
        finish(state, winner, GameOverReason::TitanDestroyed, events);
    }
    Ok(())
}

fn end_turn(state: &mut GameState) {
    state.current_player = state.current_player.opponent();
    state.selected = None;
    state.clock.clear_pending();
}

fn finish(
    state: &mut GameState,
    winner: Player,
    reason: GameOverReason,
    events: &mut Vec<GameEvent>,
) {
    if state.result.is_some() {
        return;
    }
    state.result = Some(GameResult { winner, reason });
    state.selected = None;
    state.clock.clear_pending();
    log::info!("Game over: {} wins ({:?})", winner, reason);
    events.push(GameEvent::GameOver { winner, reason });
}

fn undo(state: &mut GameState) -> Vec<GameEvent> {
    if !state.history.undo(&mut state.board) {
        return Vec::new();
    }
    end_turn(state);
    vec![changed(state)]
}

fn redo(state: &mut GameState) -> Vec<GameEvent> {
    if !state.history.redo(&mut state.board) {
        return Vec::new();
    }
    end_turn(state);
    vec![changed(state)]
}
