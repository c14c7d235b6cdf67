//! Match state machine, damage resolution, and turn narration

pub mod damage;
pub mod logger;
pub mod modifiers;
pub mod phase;
pub mod replay;
pub mod state;

pub use damage::DamageOutcome;
pub use logger::{BattleLogger, LogEntry, OutputMode, VerbosityLevel};
pub use modifiers::ModifierState;
pub use phase::GamePhase;
pub use replay::ReplayEvent;
pub use state::{MatchOutcome, MatchState, HP_MAX, STARTING_HP};
