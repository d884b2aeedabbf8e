//! Memory Match - a tile-matching puzzle with progressive levels
//!
//! Core modules:
//! - `sim`: Deterministic round rules (deck generation, flips, win/lose)
//! - `progress`: Level unlock ledger and its storage backends
//! - `persistence`: Durable on-disk unlock log
//! - `session`: Level selection, round lifecycle, advancement
//! - `settings`: User preferences
//! - `audio`: Sound cues for game events
//! - `ui`: ratatui widgets and key mapping for the terminal front end

pub mod audio;
pub mod error;
pub mod persistence;
pub mod progress;
pub mod session;
pub mod settings;
pub mod sim;
pub mod ui;

#[cfg(test)]
pub(crate) mod test_log;

pub use error::{GameError, InvalidDeckReason, InvalidLevelReason, PersistenceError, Rejection};
pub use progress::{MemoryLedger, ProgressionStore, UnlockLedger};
pub use session::{EventSink, GameSession, Screen, SessionSnapshot, Turn};
pub use settings::Settings;
pub use sim::{Deck, GameEvent, Level, RoundPhase, RoundState, Symbol};

/// Game configuration constants
pub mod consts {
    /// Lowest playable level (two pairs)
    pub const MIN_LEVEL: u8 = 2;
    /// Highest playable level (25 pairs, symbols A..=Y)
    pub const MAX_LEVEL: u8 = 25;
    /// Mismatches tolerated per pair on the board
    pub const MISTAKES_PER_PAIR: u32 = 2;
}
