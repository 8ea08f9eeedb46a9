//! Ricochet Rumble - a two-player board game with ricocheting cannon shots
//!
//! Core modules:
//! - `sim`: Deterministic rules engine (board, moves, shots, clocks, undo/redo)
//! - `settings`: Match tunables
//! - `error`: Rejection taxonomy for intents
//! - `wasm`: JavaScript bindings (wasm32 only)

pub mod error;
pub mod settings;
pub mod sim;
#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use error::{EngineError, RejectReason};
pub use settings::{Settings, SettingsError};
pub use sim::{GameEvent, GameState, Intent};

/// Game configuration constants
pub mod consts {
    /// Board is BOARD_SIZE x BOARD_SIZE cells
    pub const BOARD_SIZE: usize = 8;

    /// Starting time on each clock (5 minutes)
    pub const DEFAULT_INITIAL_TIME_SECS: u32 = 300;
    /// Wall time per clock tick
    pub const TICK_PERIOD_MS: u64 = 1000;
    /// Delay between replayed bullet steps (presentation only)
    pub const BULLET_STEP_MS: u64 = 100;

    /// Step budget for a single bullet. Mirror serpentines can run longer
    /// than this; the bullet is dropped where the budget runs out
    pub const MAX_STEPS_PER_DIRECTION: usize = BOARD_SIZE * BOARD_SIZE;
}
