//! Round state and core simulation types
//!
//! Everything the presentation layer needs to draw a round lives here, and
//! all of it is serializable.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::deck::{Deck, Symbol};
use super::level::Level;

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// No card face up
    AwaitingFirstFlip,
    /// One card face up
    AwaitingSecondFlip,
    /// Two cards face up, input locked while the pair is evaluated
    Resolving,
    /// Every symbol solved
    Won,
    /// Mistake budget exhausted
    Lost,
}

impl RoundPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, RoundPhase::Won | RoundPhase::Lost)
    }

    /// Terminal classification, if the round has ended
    pub fn outcome(self) -> Option<Outcome> {
        match self {
            RoundPhase::Won => Some(Outcome::Win),
            RoundPhase::Lost => Some(Outcome::Lose),
            _ => None,
        }
    }
}

/// How a round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Win,
    Lose,
}

/// Discrete events for presentation collaborators (sound, animation)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    RoundStarted { level: Level },
    CardFlipped { index: usize, symbol: Symbol },
    MatchFound { symbol: Symbol, first: usize, second: usize },
    /// Both cards stay face up only until the caller's next selection
    MismatchFound {
        first: usize,
        second: usize,
        symbols: [Symbol; 2],
        mistakes: u32,
    },
    RoundWon { level: Level, mistakes: u32 },
    RoundLost { level: Level },
    LevelUnlocked { level: Level },
}

/// Complete state of one round (created on level start, discarded on exit)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundState {
    pub level: Level,
    /// Seed the deck was shuffled with
    pub seed: u64,
    pub deck: Deck,
    /// Face-up, unresolved cards in the order they were picked (at most two)
    pub flipped: Vec<usize>,
    pub solved: BTreeSet<Symbol>,
    pub mistakes: u32,
    pub phase: RoundPhase,
}

impl RoundState {
    /// Fresh round over an existing deck
    pub fn with_deck(level: Level, seed: u64, deck: Deck) -> Self {
        Self {
            level,
            seed,
            deck,
            flipped: Vec::with_capacity(2),
            solved: BTreeSet::new(),
            mistakes: 0,
            phase: RoundPhase::AwaitingFirstFlip,
        }
    }

    /// True while new selections are refused
    pub fn is_locked(&self) -> bool {
        self.phase == RoundPhase::Resolving || self.phase.is_terminal()
    }

    pub fn mistake_budget(&self) -> u32 {
        self.level.mistake_budget()
    }

    pub fn is_solved(&self, index: usize) -> bool {
        self.deck
            .get(index)
            .is_some_and(|s| self.solved.contains(&s))
    }

    /// What the card at `index` currently shows
    pub fn face(&self, index: usize) -> CardFace {
        match self.deck.get(index) {
            Some(s) if self.solved.contains(&s) => CardFace::Solved(s),
            Some(s) if self.flipped.contains(&index) => CardFace::Up(s),
            _ => CardFace::Down,
        }
    }

    /// Render-boundary view of this round
    pub fn view(&self) -> RoundView {
        RoundView {
            level: self.level,
            cards: (0..self.deck.len()).map(|i| self.face(i)).collect(),
            flipped: self.flipped.clone(),
            solved: self.solved.iter().copied().collect(),
            mistakes: self.mistakes,
            remaining_lives: super::round::remaining_lives(self),
            phase: self.phase,
        }
    }
}

/// A card as the player sees it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardFace {
    Down,
    Up(Symbol),
    Solved(Symbol),
}

/// Snapshot of a round for rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundView {
    pub level: Level,
    pub cards: Vec<CardFace>,
    pub flipped: Vec<usize>,
    pub solved: Vec<Symbol>,
    pub mistakes: u32,
    pub remaining_lives: u32,
    pub phase: RoundPhase,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round() -> RoundState {
        let deck = Deck::from_symbols(vec![Symbol(0), Symbol(1), Symbol(0), Symbol(1)]).unwrap();
        RoundState::with_deck(Level::MIN, 0, deck)
    }

    #[test]
    fn test_faces() {
        let mut state = round();
        state.flipped.push(1);
        state.solved.insert(Symbol(0));
        assert_eq!(state.face(0), CardFace::Solved(Symbol(0)));
        assert_eq!(state.face(1), CardFace::Up(Symbol(1)));
        assert_eq!(state.face(3), CardFace::Down);
        assert_eq!(state.face(99), CardFace::Down);
        assert!(state.is_solved(2));
        assert!(!state.is_solved(3));
    }

    #[test]
    fn test_lock_follows_phase() {
        let mut state = round();
        assert!(!state.is_locked());
        state.phase = RoundPhase::Resolving;
        assert!(state.is_locked());
        state.phase = RoundPhase::Lost;
        assert!(state.is_locked());
        assert_eq!(state.phase.outcome(), Some(Outcome::Lose));
    }

    #[test]
    fn test_state_serializes() {
        let mut state = round();
        state.mistakes = 2;
        state.solved.insert(Symbol(1));
        let json = serde_json::to_string(&state).unwrap();
        let back: RoundState = serde_json::from_str(&json).unwrap();
        assert_eq!(state, back);
    }
}
