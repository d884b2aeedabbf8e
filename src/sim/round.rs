//! Round transitions
//!
//! Pure functions over `RoundState`. Pair resolution is synchronous: the
//! caller decides how long a mismatched pair stays visible before the next
//! selection.

use super::deck::Deck;
use super::level::Level;
use super::state::{GameEvent, RoundPhase, RoundState};
use crate::error::Rejection;

/// Begin a round at `level` with a freshly shuffled deck
pub fn start_round(level: Level, seed: u64) -> RoundState {
    RoundState::with_deck(level, seed, Deck::for_level(level, seed))
}

/// Mismatches left before the round is lost
pub fn remaining_lives(state: &RoundState) -> u32 {
    state.mistake_budget().saturating_sub(state.mistakes)
}

/// Flip the card at `index`.
///
/// A rejected selection leaves `state` untouched. The second card of a
/// pair is resolved before returning.
pub fn select_card(state: &mut RoundState, index: usize) -> Result<Vec<GameEvent>, Rejection> {
    match state.phase {
        RoundPhase::Won | RoundPhase::Lost => return Err(Rejection::RoundOver),
        RoundPhase::Resolving => return Err(Rejection::Resolving),
        RoundPhase::AwaitingFirstFlip | RoundPhase::AwaitingSecondFlip => {}
    }

    let symbol = state.deck.get(index).ok_or(Rejection::OutOfBounds {
        index,
        len: state.deck.len(),
    })?;
    if state.solved.contains(&symbol) {
        return Err(Rejection::AlreadySolved { index });
    }
    if state.flipped.contains(&index) {
        return Err(Rejection::AlreadyFlipped { index });
    }

    state.flipped.push(index);
    log::debug!("Flipped card {index} ({symbol})");
    let mut events = vec![GameEvent::CardFlipped { index, symbol }];

    if state.flipped.len() < 2 {
        state.phase = RoundPhase::AwaitingSecondFlip;
        return Ok(events);
    }

    state.phase = RoundPhase::Resolving;
    resolve_pair(state, &mut events);
    Ok(events)
}

fn resolve_pair(state: &mut RoundState, events: &mut Vec<GameEvent>) {
    let &[first, second] = state.flipped.as_slice() else {
        return;
    };
    let (Some(a), Some(b)) = (state.deck.get(first), state.deck.get(second)) else {
        return;
    };

    if a == b {
        state.solved.insert(a);
        events.push(GameEvent::MatchFound {
            symbol: a,
            first,
            second,
        });
        if state.solved.len() >= state.deck.pair_count() {
            log::info!(
                "Level {} won with {} mistakes",
                state.level,
                state.mistakes
            );
            state.phase = RoundPhase::Won;
            events.push(GameEvent::RoundWon {
                level: state.level,
                mistakes: state.mistakes,
            });
            return;
        }
    } else {
        state.mistakes += 1;
        events.push(GameEvent::MismatchFound {
            first,
            second,
            symbols: [a, b],
            mistakes: state.mistakes,
        });
        if state.mistakes >= state.mistake_budget() {
            log::info!("Level {} lost", state.level);
            state.phase = RoundPhase::Lost;
            events.push(GameEvent::RoundLost { level: state.level });
            return;
        }
    }

    state.flipped.clear();
    state.phase = RoundPhase::AwaitingFirstFlip;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::deck::Symbol;
    use crate::sim::state::Outcome;
    use proptest::prelude::*;

    const A: Symbol = Symbol(0);
    const B: Symbol = Symbol(1);

    /// Level 2 board laid out A B A B
    fn abab() -> RoundState {
        RoundState::with_deck(Level::MIN, 0, Deck::from_symbols(vec![A, B, A, B]).unwrap())
    }

    #[test]
    fn test_start_round() {
        let state = start_round(Level::new(6).unwrap(), 7);
        assert_eq!(state.deck.len(), 12);
        assert_eq!(state.phase, RoundPhase::AwaitingFirstFlip);
        assert!(state.flipped.is_empty());
        assert!(state.solved.is_empty());
        assert_eq!(state.mistakes, 0);
        assert_eq!(remaining_lives(&state), 12);
    }

    #[test]
    fn test_first_flip_awaits_second() {
        let mut state = abab();
        let events = select_card(&mut state, 1).unwrap();
        assert_eq!(events, vec![GameEvent::CardFlipped { index: 1, symbol: B }]);
        assert_eq!(state.phase, RoundPhase::AwaitingSecondFlip);
        assert_eq!(state.flipped, vec![1]);
    }

    #[test]
    fn test_sequential_matches_win() {
        let mut state = abab();
        select_card(&mut state, 0).unwrap();
        let events = select_card(&mut state, 2).unwrap();
        assert!(events.contains(&GameEvent::MatchFound {
            symbol: A,
            first: 0,
            second: 2
        }));
        assert_eq!(state.phase, RoundPhase::AwaitingFirstFlip);
        assert!(state.flipped.is_empty());
        assert_eq!(state.solved.len(), 1);

        select_card(&mut state, 3).unwrap();
        let events = select_card(&mut state, 1).unwrap();
        assert_eq!(
            events.last(),
            Some(&GameEvent::RoundWon {
                level: Level::MIN,
                mistakes: 0
            })
        );
        assert_eq!(state.phase.outcome(), Some(Outcome::Win));
        assert_eq!(select_card(&mut state, 0), Err(Rejection::RoundOver));
    }

    #[test]
    fn test_budget_exhaustion_loses() {
        let mut state = abab();
        for attempt in 1..=4 {
            select_card(&mut state, 0).unwrap();
            let events = select_card(&mut state, 1).unwrap();
            assert_eq!(state.mistakes, attempt);
            if attempt < 4 {
                assert_eq!(state.phase, RoundPhase::AwaitingFirstFlip);
                assert_eq!(remaining_lives(&state), 4 - attempt);
            } else {
                assert_eq!(events.last(), Some(&GameEvent::RoundLost { level: Level::MIN }));
            }
        }
        assert_eq!(state.phase, RoundPhase::Lost);
        assert_eq!(remaining_lives(&state), 0);
        // The losing pair stays visible
        assert_eq!(state.flipped, vec![0, 1]);
        assert!(state.solved.is_empty());
    }

    #[test]
    fn test_accepted_flips_are_logged() {
        crate::test_log::capture();
        let mut state = abab();
        select_card(&mut state, 0).unwrap();
        select_card(&mut state, 3).unwrap();
        let lines = crate::test_log::lines();
        assert!(lines.contains(&"DEBUG Flipped card 0 (A)".to_string()));
        assert!(lines.contains(&"DEBUG Flipped card 3 (B)".to_string()));
    }

    #[test]
    fn test_same_card_twice_is_rejected() {
        let mut state = abab();
        select_card(&mut state, 0).unwrap();
        let before = state.clone();
        assert_eq!(
            select_card(&mut state, 0),
            Err(Rejection::AlreadyFlipped { index: 0 })
        );
        assert_eq!(state, before);
    }

    #[test]
    fn test_solved_card_is_rejected() {
        let mut state = abab();
        select_card(&mut state, 0).unwrap();
        select_card(&mut state, 2).unwrap();
        let before = state.clone();
        assert_eq!(
            select_card(&mut state, 2),
            Err(Rejection::AlreadySolved { index: 2 })
        );
        assert_eq!(
            select_card(&mut state, 0),
            Err(Rejection::AlreadySolved { index: 0 })
        );
        assert_eq!(state, before);
    }

    #[test]
    fn test_resolving_and_out_of_bounds_are_rejected() {
        let mut state = abab();
        assert_eq!(
            select_card(&mut state, 4),
            Err(Rejection::OutOfBounds { index: 4, len: 4 })
        );
        state.phase = RoundPhase::Resolving;
        let before = state.clone();
        assert_eq!(select_card(&mut state, 1), Err(Rejection::Resolving));
        assert_eq!(state, before);
    }

    proptest! {
        #[test]
        fn prop_flip_accounting(
            level in 2u8..=6,
            seed in any::<u64>(),
            picks in prop::collection::vec(0usize..12, 0..80),
        ) {
            let level = Level::new(level).unwrap();
            let mut state = start_round(level, seed);

            for pick in picks {
                let before = state.clone();
                match select_card(&mut state, pick) {
                    Err(_) => prop_assert_eq!(&state, &before),
                    Ok(events) => {
                        let matched = events.iter().any(|e| matches!(e, GameEvent::MatchFound { .. }));
                        let mismatched = events.iter().any(|e| matches!(e, GameEvent::MismatchFound { .. }));
                        if matched {
                            prop_assert_eq!(state.solved.len(), before.solved.len() + 1);
                            prop_assert_eq!(state.mistakes, before.mistakes);
                        } else if mismatched {
                            prop_assert_eq!(state.mistakes, before.mistakes + 1);
                            prop_assert_eq!(&state.solved, &before.solved);
                        } else {
                            prop_assert_eq!(state.phase, RoundPhase::AwaitingSecondFlip);
                        }
                    }
                }

                prop_assert!(state.flipped.len() <= 2);
                prop_assert_ne!(state.phase, RoundPhase::Resolving);
                prop_assert_eq!(
                    state.phase == RoundPhase::Won,
                    state.solved.len() == level.pair_count()
                );
                prop_assert_eq!(
                    state.phase == RoundPhase::Lost,
                    state.mistakes >= level.mistake_budget()
                );
            }
        }
    }
}
