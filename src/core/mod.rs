//! Core game types: players, digit sequences, judging, and the card catalog

pub mod card;
pub mod digits;
pub mod judge;
pub mod player;

pub use card::{Card, CardCategory, CardEffect};
pub use digits::DigitSequence;
pub use judge::{judge, GuessRecord, GuessResult};
pub use player::{PerPlayer, Player};
