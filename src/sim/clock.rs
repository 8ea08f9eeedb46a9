//! Per-player countdown clocks
//!
//! Whole seconds only. Wall time fed in through [`Clock::accumulate`] is
//! turned into whole ticks at a fixed period, the same way a fixed-timestep
//! loop drains its accumulator.

use serde::{Deserialize, Serialize};

use super::piece::Player;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clock {
    /// Seconds left, indexed by [`Player::index`]
    remaining: [u32; 2],
    /// Wall time not yet converted into ticks
    #[serde(skip)]
    pending_ms: u64,
}

impl Clock {
    pub fn new(initial_secs: u32) -> Self {
        Self {
            remaining: [initial_secs; 2],
            pending_ms: 0,
        }
    }

    #[inline]
    pub fn remaining(&self, player: Player) -> u32 {
        self.remaining[player.index()]
    }

    /// Take one second from `player`. Returns true once their time is gone.
    pub fn tick(&mut self, player: Player) -> bool {
        let slot = &mut self.remaining[player.index()];
        *slot = slot.saturating_sub(1);
        *slot == 0
    }

    /// Add elapsed wall time and return how many whole ticks are now due
    pub fn accumulate(&mut self, elapsed_ms: u64, period_ms: u64) -> u64 {
        let period_ms = period_ms.max(1);
        self.pending_ms = self.pending_ms.saturating_add(elapsed_ms);
        let ticks = self.pending_ms / period_ms;
        self.pending_ms %= period_ms;
        ticks
    }

    /// Drop any partially accumulated wall time (pause, turn change)
    pub fn clear_pending(&mut self) {
        self.pending_ms = 0;
    }
}

/// `m:ss` display form of a number of seconds
pub fn format_clock(secs: u32) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}
