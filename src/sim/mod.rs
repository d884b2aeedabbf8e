//! Deterministic round simulation
//!
//! All game rules live here. This module must stay pure:
//! - Seeded RNG only
//! - No I/O, rendering, or timing side effects
//! - Every transition is a function of the current state and one input

pub mod clock;
pub mod deck;
pub mod level;
pub mod round;
pub mod state;

pub use clock::RoundClock;
pub use deck::{Deck, Symbol, generate};
pub use level::Level;
pub use round::{remaining_lives, select_card, start_round};
pub use state::{CardFace, GameEvent, Outcome, RoundPhase, RoundState, RoundView};
