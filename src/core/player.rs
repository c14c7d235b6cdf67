//! Player identity and per-player storage

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};

/// One side of the match. There are never more than two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    P1,
    P2,
}

impl Player {
    pub const BOTH: [Player; 2] = [Player::P1, Player::P2];

    pub fn opponent(&self) -> Player {
        match self {
            Player::P1 => Player::P2,
            Player::P2 => Player::P1,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::P1 => write!(f, "P1"),
            Player::P2 => write!(f, "P2"),
        }
    }
}

/// Two-slot container keyed by `Player`.
///
/// Holds one value per side for any concern (HP, modifiers, logs, hands),
/// replacing scattered per-player variables and their duplicated branching.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerPlayer<T> {
    pub p1: T,
    pub p2: T,
}

impl<T> PerPlayer<T> {
    pub fn new(p1: T, p2: T) -> Self {
        PerPlayer { p1, p2 }
    }

    pub fn get(&self, player: Player) -> &T {
        match player {
            Player::P1 => &self.p1,
            Player::P2 => &self.p2,
        }
    }

    pub fn get_mut(&mut self, player: Player) -> &mut T {
        match player {
            Player::P1 => &mut self.p1,
            Player::P2 => &mut self.p2,
        }
    }

    /// Split borrow: `player`'s slot first, the opponent's second.
    pub fn both_mut(&mut self, player: Player) -> (&mut T, &mut T) {
        match player {
            Player::P1 => (&mut self.p1, &mut self.p2),
            Player::P2 => (&mut self.p2, &mut self.p1),
        }
    }
}

impl<T> Index<Player> for PerPlayer<T> {
    type Output = T;

    fn index(&self, player: Player) -> &T {
        self.get(player)
    }
}

impl<T> IndexMut<Player> for PerPlayer<T> {
    fn index_mut(&mut self, player: Player) -> &mut T {
        self.get_mut(player)
    }
}
