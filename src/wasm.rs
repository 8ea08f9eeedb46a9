//! WASM bindings for the rules engine
//!
//! Provides a JavaScript-friendly API over the intent/event boundary.
//! Events and state are handed over as JSON strings.

use wasm_bindgen::prelude::*;

use crate::error::EngineError;
use crate::settings::Settings;
use crate::sim::{self, Cell, GameEvent, GameState, Intent, PieceId, Player};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    // Fails only if a logger is already installed
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("Ricochet Rumble engine loaded");
}

/// Result object returned to JavaScript
#[derive(serde::Serialize)]
struct Reply {
    ok: bool,
    events: Vec<GameEvent>,
    error: Option<String>,
    reason: Option<crate::error::RejectReason>,
}

impl From<Result<Vec<GameEvent>, EngineError>> for Reply {
    fn from(result: Result<Vec<GameEvent>, EngineError>) -> Self {
        match result {
            Ok(events) => Reply {
                ok: true,
                events,
                error: None,
                reason: None,
            },
            Err(err) => Reply {
                ok: false,
                events: Vec::new(),
                reason: Some(err.reason()),
                error: Some(err.to_string()),
            },
        }
    }
}

fn to_json(reply: Reply) -> String {
    serde_json::to_string(&reply).unwrap_or_else(|e| {
        format!(
            r#"{{"ok":false,"events":[],"error":{},"reason":null}}"#,
            serde_json::Value::String(e.to_string())
        )
    })
}

fn player_from(n: u8) -> Player {
    if n == 2 { Player::White } else { Player::Black }
}

/// WASM-friendly wrapper around GameState
#[wasm_bindgen]
pub struct WasmGame {
    inner: GameState,
}

#[wasm_bindgen]
impl WasmGame {
    /// Create a match with default settings
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmGame {
        WasmGame {
            inner: GameState::default(),
        }
    }

    /// Create a match from a JSON settings object; falls back to defaults
    /// on malformed input
    #[wasm_bindgen(js_name = withSettings)]
    pub fn with_settings(json: &str) -> WasmGame {
        let settings = Settings::from_json(json).unwrap_or_else(|e| {
            log::warn!("{}; using default settings", e);
            Settings::default()
        });
        WasmGame {
            inner: GameState::new(settings),
        }
    }

    /// Current state as JSON
    pub fn state(&self) -> String {
        serde_json::to_string(&self.inner.view()).unwrap_or_default()
    }

    pub fn generation(&self) -> u64 {
        self.inner.generation()
    }

    /// Whether an animation scheduled under `generation` is still valid
    #[wasm_bindgen(js_name = isCurrent)]
    pub fn is_current(&self, generation: u64) -> bool {
        self.inner.is_current(generation)
    }

    #[wasm_bindgen(js_name = selectPiece)]
    pub fn select_piece(&mut self, id: u32) -> String {
        self.send(Intent::SelectPiece { piece: PieceId(id) })
    }

    #[wasm_bindgen(js_name = attemptMove)]
    pub fn attempt_move(&mut self, id: u32, row: usize, col: usize) -> String {
        match Cell::new(row, col) {
            Ok(to) => self.send(Intent::Move {
                piece: PieceId(id),
                to,
            }),
            Err(err) => to_json(Err(err).into()),
        }
    }

    /// Fire for player 1 (black) or 2 (white)
    pub fn fire(&mut self, player: u8) -> String {
        self.send(Intent::Fire {
            player: player_from(player),
        })
    }

    pub fn pause(&mut self) -> String {
        self.send(Intent::Pause)
    }

    pub fn resume(&mut self) -> String {
        self.send(Intent::Resume)
    }

    #[wasm_bindgen(js_name = togglePause)]
    pub fn toggle_pause(&mut self) -> String {
        self.send(Intent::TogglePause)
    }

    pub fn reset(&mut self) -> String {
        self.send(Intent::Reset)
    }

    pub fn undo(&mut self) -> String {
        self.send(Intent::Undo)
    }

    pub fn redo(&mut self) -> String {
        self.send(Intent::Redo)
    }

    /// Call once per tick period
    pub fn tick(&mut self) -> String {
        to_json(Ok(sim::tick(&mut self.inner)).into())
    }

    /// Feed elapsed wall time (ms) from requestAnimationFrame
    pub fn advance(&mut self, elapsed_ms: u32) -> String {
        to_json(Ok(sim::advance(&mut self.inner, elapsed_ms as u64)).into())
    }

    /// Apply an intent given as JSON, e.g. `{"type":"undo"}`
    #[wasm_bindgen(js_name = applyJson)]
    pub fn apply_json(&mut self, json: &str) -> String {
        match serde_json::from_str::<Intent>(json) {
            Ok(intent) => self.send(intent),
            Err(e) => format!(
                r#"{{"ok":false,"events":[],"error":{},"reason":"InvalidArgument"}}"#,
                serde_json::Value::String(e.to_string())
            ),
        }
    }
}

impl WasmGame {
    fn send(&mut self, intent: Intent) -> String {
        to_json(sim::apply(&mut self.inner, intent).into())
    }
}

impl Default for WasmGame {
    fn default() -> Self {
        Self::new()
    }
}
