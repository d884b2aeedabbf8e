//! Deck generation
//!
//! A deck holds two copies of each of the level's first N letters, shuffled
//! with a seeded PCG stream so any round can be replayed from its seed.

use std::fmt;

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::level::Level;
use crate::consts::{MAX_LEVEL, MIN_LEVEL};
use crate::error::{GameError, InvalidDeckReason};

/// A card symbol: index into the alphabet (0 = 'A')
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Symbol(pub u8);

impl Symbol {
    pub fn as_char(self) -> char {
        char::from_u32('A' as u32 + self.0 as u32).unwrap_or('?')
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Shuffled, pair-matched card sequence for one round (immutable once built)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDeck")]
pub struct Deck {
    cards: Vec<Symbol>,
}

/// Unchecked wire form of a deck
#[derive(Deserialize)]
struct RawDeck {
    cards: Vec<Symbol>,
}

impl TryFrom<RawDeck> for Deck {
    type Error = InvalidDeckReason;

    fn try_from(raw: RawDeck) -> Result<Self, Self::Error> {
        check_pairs(&raw.cards)?;
        Ok(Self { cards: raw.cards })
    }
}

/// A deck holds the first N symbols twice each, N within the level range
fn check_pairs(cards: &[Symbol]) -> Result<(), InvalidDeckReason> {
    let pairs = cards.len() / 2;
    if cards.len() % 2 != 0 || !(MIN_LEVEL as usize..=MAX_LEVEL as usize).contains(&pairs) {
        return Err(InvalidDeckReason::BadLength(cards.len()));
    }
    let mut counts = vec![0usize; pairs];
    for symbol in cards {
        let count = counts
            .get_mut(symbol.0 as usize)
            .ok_or(InvalidDeckReason::UnknownSymbol {
                symbol: symbol.0,
                pairs,
            })?;
        *count += 1;
    }
    match counts.iter().position(|&c| c != 2) {
        Some(symbol) => Err(InvalidDeckReason::Unpaired {
            symbol: symbol as u8,
            count: counts[symbol],
        }),
        None => Ok(()),
    }
}

impl Deck {
    /// Build and shuffle a deck for `level` from `seed`
    pub fn for_level(level: Level, seed: u64) -> Self {
        let mut cards: Vec<Symbol> = (0..level.get())
            .flat_map(|s| [Symbol(s), Symbol(s)])
            .collect();
        let mut rng = Pcg32::seed_from_u64(seed);
        cards.shuffle(&mut rng);
        Self { cards }
    }

    /// Build a deck in a fixed order (tests and replays)
    pub fn from_symbols(cards: Vec<Symbol>) -> Result<Self, GameError> {
        check_pairs(&cards)?;
        Ok(Self { cards })
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Symbol> {
        self.cards.get(index).copied()
    }

    pub fn cards(&self) -> &[Symbol] {
        &self.cards
    }

    /// Number of distinct symbols on the board
    pub fn pair_count(&self) -> usize {
        self.cards.len() / 2
    }

    /// Positions of both copies of `symbol`
    pub fn positions_of(&self, symbol: Symbol) -> Vec<usize> {
        self.cards
            .iter()
            .enumerate()
            .filter(|(_, s)| **s == symbol)
            .map(|(i, _)| i)
            .collect()
    }
}

/// Generate a deck for a raw level number.
///
/// With no seed the deck is drawn from thread entropy.
pub fn generate(level: u32, seed: Option<u64>) -> Result<Deck, GameError> {
    let level = Level::from_u32(level)?;
    let seed = seed.unwrap_or_else(rand::random);
    Ok(Deck::for_level(level, seed))
}
