//! Turn narration events
//!
//! When a turn resolves, the engine materializes an ordered list of events
//! describing what happened: card reveals, judged results, then each
//! player's damage exchange. The list is pure data; the presentation layer
//! owns all pacing and may use the suggested durations or ignore them.

use crate::core::{Card, Player};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReplayEvent {
    /// Hit/Blow counts revealed for one player's guess.
    ResultReveal { player: Player, hit: u8, blow: u8 },
    /// A card's activation is revealed (buff at round start, support in-turn).
    CardEffect { player: Player, card: Card },
    /// Damage lands on `to`. `from == to` for mutual-correct self damage.
    Attack { from: Player, to: Player, amount: i32 },
    /// A defense buff is shown on the player's side.
    Defense { player: Player },
    Heal { player: Player, amount: i32 },
    /// Invincibility swallowed incoming damage.
    Barrier { player: Player },
    /// Counter stance triggered; an Attack back at the aggressor follows.
    Counter { player: Player },
    StealHp { from: Player, to: Player, amount: i32 },
}

impl ReplayEvent {
    /// Suggested playback duration in milliseconds. Advisory only: engine
    /// correctness never depends on timing.
    pub fn suggested_duration_ms(&self) -> u64 {
        match self {
            ReplayEvent::ResultReveal { .. } | ReplayEvent::Attack { .. } => 2000,
            ReplayEvent::Heal { .. } | ReplayEvent::StealHp { .. } => 1000,
            ReplayEvent::Defense { .. }
            | ReplayEvent::Barrier { .. }
            | ReplayEvent::Counter { .. } => 800,
            ReplayEvent::CardEffect { .. } => 600,
        }
    }
}
