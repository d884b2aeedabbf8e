//! Difficulty levels
//!
//! A level fixes both the number of symbol pairs on the board and the
//! number of mismatches the player may make before losing.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_LEVEL, MIN_LEVEL, MISTAKES_PER_PAIR};
use crate::error::GameError;

/// A level within `MIN_LEVEL..=MAX_LEVEL`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Level(u8);

impl Level {
    pub const MIN: Level = Level(MIN_LEVEL);
    pub const MAX: Level = Level(MAX_LEVEL);

    /// Validate a raw level number
    pub fn new(level: u8) -> Result<Self, GameError> {
        if (MIN_LEVEL..=MAX_LEVEL).contains(&level) {
            Ok(Self(level))
        } else {
            Err(GameError::out_of_range(level))
        }
    }

    /// Parse a level typed by the player or read from storage
    pub fn from_u32(level: u32) -> Result<Self, GameError> {
        u8::try_from(level)
            .map_err(|_| GameError::out_of_range(level))
            .and_then(Self::new)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Number of distinct symbols (each appears twice)
    pub fn pair_count(self) -> usize {
        self.0 as usize
    }

    /// Number of cards on the board
    pub fn card_count(self) -> usize {
        self.pair_count() * 2
    }

    /// Mismatches allowed before the round is lost
    pub fn mistake_budget(self) -> u32 {
        self.0 as u32 * MISTAKES_PER_PAIR
    }

    /// The following level, if any
    pub fn next(self) -> Option<Level> {
        Level::new(self.0 + 1).ok()
    }

    /// 1-based position in the level list (the menu shows level 2 as "1")
    pub fn ordinal(self) -> u8 {
        self.0 - MIN_LEVEL + 1
    }

    /// Every playable level in ascending order
    pub fn all() -> impl Iterator<Item = Level> {
        (MIN_LEVEL..=MAX_LEVEL).map(Level)
    }
}

impl TryFrom<u8> for Level {
    type Error = GameError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Level::new(value)
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> u8 {
        level.0
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
