//! Hit-and-Blow battle engine
//!
//! Rules engine for a two-player number-deduction duel ("Hit and Blow") with
//! an optional card-augmented combat mode. The engine owns the phase state
//! machine, the Hit/Blow judge, card effects and damage formulas, and emits
//! an ordered event list for each resolved turn. Rendering, animation, and
//! input widgets live outside this crate and drive it through `MatchState`'s
//! public operations.

pub mod core;
pub mod error;
pub mod game;

pub use error::{GameError, Result};
