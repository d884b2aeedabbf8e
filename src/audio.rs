//! Sound cues for game events
//!
//! The terminal front end has no mixer, so cues are rendered as bell
//! characters. Sound never influences game logic.

use std::io::{self, Write};

use crate::session::EventSink;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Round begins
    Touch,
    /// Card turned over
    Press,
    /// Pair matched
    Match,
    /// Pair mismatched
    Mismatch,
    /// Round won
    Win,
    /// Round lost
    Lose,
}

impl SoundEffect {
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::RoundStarted { .. } => Some(SoundEffect::Touch),
            GameEvent::CardFlipped { .. } => Some(SoundEffect::Press),
            GameEvent::MatchFound { .. } => Some(SoundEffect::Match),
            GameEvent::MismatchFound { .. } => Some(SoundEffect::Mismatch),
            GameEvent::RoundWon { .. } => Some(SoundEffect::Win),
            GameEvent::RoundLost { .. } => Some(SoundEffect::Lose),
            GameEvent::LevelUnlocked { .. } => None,
        }
    }

    /// Bell characters used to render this cue
    fn bells(self) -> usize {
        match self {
            SoundEffect::Touch | SoundEffect::Press | SoundEffect::Match => 0,
            SoundEffect::Mismatch => 1,
            SoundEffect::Win => 2,
            SoundEffect::Lose => 3,
        }
    }
}

/// Audio manager for the game
pub struct AudioManager<W: Write = io::Stdout> {
    out: W,
    muted: bool,
}

impl AudioManager {
    pub fn new(enabled: bool) -> Self {
        Self::with_writer(io::stdout(), enabled)
    }
}

impl<W: Write> AudioManager<W> {
    pub fn with_writer(out: W, enabled: bool) -> Self {
        Self {
            out,
            muted: !enabled,
        }
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn play(&mut self, effect: SoundEffect) {
        log::trace!("Sound {:?}", effect);
        if self.muted || effect.bells() == 0 {
            return;
        }
        let bells = "\x07".repeat(effect.bells());
        if let Err(err) = self.out.write_all(bells.as_bytes()).and_then(|_| self.out.flush()) {
            log::warn!("Failed to play sound: {}", err);
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> EventSink for AudioManager<W> {
    fn on_event(&mut self, event: &GameEvent) {
        if let Some(effect) = SoundEffect::for_event(event) {
            self.play(effect);
        }
    }
}
