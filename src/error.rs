//! Error taxonomy
//!
//! Nothing here is fatal: the session recovers from every variant.

use std::path::PathBuf;

use thiserror::Error;

use crate::consts::{MAX_LEVEL, MIN_LEVEL};

/// Why a level could not be selected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidLevelReason {
    #[error("outside {}..={}", MIN_LEVEL, MAX_LEVEL)]
    OutOfRange,
    #[error("locked (highest unlocked is {highest})")]
    Locked { highest: u8 },
}

/// Why a card sequence is not a playable deck
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidDeckReason {
    #[error("{0} cards is not a level's worth of pairs")]
    BadLength(usize),
    #[error("symbol {symbol} is outside the first {pairs} letters")]
    UnknownSymbol { symbol: u8, pairs: usize },
    #[error("symbol {symbol} appears {count} times")]
    Unpaired { symbol: u8, count: usize },
}

/// Why a card selection was ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("card {index} does not exist (deck has {len} cards)")]
    OutOfBounds { index: usize, len: usize },
    #[error("card {index} is already face up")]
    AlreadyFlipped { index: usize },
    #[error("card {index} is already solved")]
    AlreadySolved { index: usize },
    #[error("a pair is being resolved")]
    Resolving,
    #[error("the round is over")]
    RoundOver,
    #[error("no round is in progress")]
    NoActiveRound,
}

/// Durable storage failures
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to {action} {}: {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode record: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl PersistenceError {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }
}

#[derive(Debug, Error)]
pub enum GameError {
    #[error("invalid level {level}: {reason}")]
    InvalidLevel {
        level: u32,
        reason: InvalidLevelReason,
    },
    #[error("invalid deck: {0}")]
    InvalidDeck(#[from] InvalidDeckReason),
    #[error("input ignored: {0}")]
    IllegalInput(#[from] Rejection),
    #[error("progress not saved: {0}")]
    Persistence(#[from] PersistenceError),
    #[error("cannot {action} from the {screen} screen")]
    WrongScreen {
        action: &'static str,
        screen: &'static str,
    },
}

impl GameError {
    pub fn out_of_range(level: impl Into<u32>) -> Self {
        Self::InvalidLevel {
            level: level.into(),
            reason: InvalidLevelReason::OutOfRange,
        }
    }

    /// True for rejected input that the UI may show as a soft warning
    pub fn is_soft(&self) -> bool {
        matches!(self, GameError::IllegalInput(_))
    }
}
