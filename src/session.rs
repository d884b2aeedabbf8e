//! Game session controller
//!
//! Owns the current round and level, drives the round lifecycle (select,
//! restart, advance, exit), records completions with the progression store,
//! and forwards every event to the registered presentation sinks.

use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::error::{GameError, InvalidLevelReason, Rejection};
use crate::progress::{ProgressionStore, UnlockLedger};
use crate::sim::{self, GameEvent, Level, RoundClock, RoundPhase, RoundState, RoundView};

/// Presentation collaborator notified of game events (sound, animation).
///
/// Sinks observe only; nothing they do feeds back into the rules.
pub trait EventSink {
    fn on_event(&mut self, event: &GameEvent);
}

/// Which screen the session is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Screen {
    Title,
    LevelSelect,
    Playing,
    Won,
    Lost,
}

impl Screen {
    pub fn name(self) -> &'static str {
        match self {
            Screen::Title => "title",
            Screen::LevelSelect => "level select",
            Screen::Playing => "game",
            Screen::Won => "win",
            Screen::Lost => "lose",
        }
    }
}

/// Result of an accepted card selection
#[derive(Debug)]
pub struct Turn {
    pub events: Vec<GameEvent>,
    /// Set when the round was won but the unlock could not be saved
    pub save_error: Option<GameError>,
}

/// One row of the level select menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelEntry {
    pub level: Level,
    pub unlocked: bool,
}

/// Everything the render boundary needs for one frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub screen: Screen,
    pub highest_unlocked: Level,
    pub round: Option<RoundView>,
    pub elapsed_secs: u64,
    /// Win screen offers a next level
    pub can_advance: bool,
    /// An unlock is waiting to be written
    pub unsaved_progress: bool,
    /// Saved progress could not be read; only the first level is open
    pub progress_unreadable: bool,
}

pub struct GameSession<L: UnlockLedger> {
    progress: ProgressionStore<L>,
    screen: Screen,
    round: Option<RoundState>,
    clock: RoundClock,
    /// Seed stream for round decks
    seeds: Pcg32,
    sinks: Vec<Box<dyn EventSink>>,
}

impl<L: UnlockLedger> GameSession<L> {
    /// Create a session on the title screen.
    ///
    /// A fixed `seed` makes every deck of the session reproducible.
    pub fn new(progress: ProgressionStore<L>, seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(rand::random);
        log::debug!("Session seed {seed}");
        Self {
            progress,
            screen: Screen::Title,
            round: None,
            clock: RoundClock::default(),
            seeds: Pcg32::seed_from_u64(seed),
            sinks: Vec::new(),
        }
    }

    pub fn add_sink(&mut self, sink: Box<dyn EventSink>) {
        self.sinks.push(sink);
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn round(&self) -> Option<&RoundState> {
        self.round.as_ref()
    }

    pub fn level(&self) -> Option<Level> {
        self.round.as_ref().map(|r| r.level)
    }

    pub fn highest_unlocked(&self) -> Level {
        self.progress.highest_unlocked()
    }

    pub fn progress(&self) -> &ProgressionStore<L> {
        &self.progress
    }

    pub fn progress_mut(&mut self) -> &mut ProgressionStore<L> {
        &mut self.progress
    }

    pub fn clock(&self) -> &RoundClock {
        &self.clock
    }

    /// Level select listing with lock state
    pub fn levels(&self) -> Vec<LevelEntry> {
        Level::all()
            .map(|level| LevelEntry {
                level,
                unlocked: self.progress.is_unlocked(level),
            })
            .collect()
    }

    /// Leave the title screen
    pub fn start(&mut self) -> Result<(), GameError> {
        self.require(Screen::Title, "start")?;
        self.screen = Screen::LevelSelect;
        Ok(())
    }

    /// Return from level select to the title screen
    pub fn back_to_title(&mut self) -> Result<(), GameError> {
        self.require(Screen::LevelSelect, "go back")?;
        self.screen = Screen::Title;
        Ok(())
    }

    /// Start a round at `level`; locked or out-of-range levels are rejected
    pub fn select_level(&mut self, level: u32) -> Result<(), GameError> {
        if self.screen == Screen::Title {
            return Err(self.wrong_screen("select a level"));
        }
        let level = Level::from_u32(level)?;
        let highest = self.progress.highest_unlocked();
        if !self.progress.is_unlocked(level) {
            return Err(GameError::InvalidLevel {
                level: level.get() as u32,
                reason: InvalidLevelReason::Locked {
                    highest: highest.get(),
                },
            });
        }
        self.begin_round(level);
        Ok(())
    }

    /// Flip a card in the active round
    pub fn select_card(&mut self, index: usize) -> Result<Turn, GameError> {
        let round = self.round.as_mut().ok_or(Rejection::NoActiveRound)?;
        let events = match sim::select_card(round, index) {
            Ok(events) => events,
            Err(rejection) => {
                log::debug!("Ignored selection of card {index}: {rejection}");
                return Err(rejection.into());
            }
        };
        let phase = round.phase;
        let level = round.level;

        let mut turn = Turn {
            events,
            save_error: None,
        };

        match phase {
            RoundPhase::Won => {
                self.screen = Screen::Won;
                self.clock.pause();
                let before = self.progress.highest_unlocked();
                if let Err(err) = self.progress.record_completion(level) {
                    turn.save_error = Some(err);
                }
                let after = self.progress.highest_unlocked();
                if after > before {
                    turn.events.push(GameEvent::LevelUnlocked { level: after });
                }
            }
            RoundPhase::Lost => {
                self.screen = Screen::Lost;
                self.clock.pause();
            }
            _ => {}
        }

        self.emit(&turn.events);
        Ok(turn)
    }

    /// Replay the current level with a new deck
    pub fn restart(&mut self) -> Result<(), GameError> {
        if !matches!(self.screen, Screen::Playing | Screen::Lost) {
            return Err(self.wrong_screen("restart"));
        }
        let level = self.level().ok_or(Rejection::NoActiveRound)?;
        self.begin_round(level);
        Ok(())
    }

    /// Move on to the next level after a win.
    ///
    /// Past the last level there is nothing to advance to: the error is
    /// returned and the session goes back to the level list.
    pub fn advance(&mut self) -> Result<(), GameError> {
        self.require(Screen::Won, "advance")?;
        let level = self.level().ok_or(Rejection::NoActiveRound)?;
        match level.next() {
            Some(next) => self.select_level(next.get() as u32),
            None => {
                log::info!("Level {} was the last one", level);
                self.exit_to_menu()?;
                Err(GameError::out_of_range(level.get() as u32 + 1))
            }
        }
    }

    /// Abandon any round and show the level list
    pub fn exit_to_menu(&mut self) -> Result<(), GameError> {
        if self.screen == Screen::Title {
            return Err(self.wrong_screen("exit to menu"));
        }
        if let Some(round) = self.round.take() {
            if !round.phase.is_terminal() {
                log::info!("Abandoned level {}", round.level);
            }
        }
        self.clock.stop();
        self.screen = Screen::LevelSelect;
        Ok(())
    }

    /// Advance the round timer (only runs during play)
    pub fn tick(&mut self, dt: Duration) {
        self.clock.tick(dt);
    }

    /// Retry a progress read that failed at startup, then any unsaved unlock
    pub fn retry_save(&mut self) -> Result<(), GameError> {
        if self.progress.load_error().is_some() {
            self.progress.reload()?;
        }
        self.progress.flush()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            screen: self.screen,
            highest_unlocked: self.progress.highest_unlocked(),
            round: self.round.as_ref().map(RoundState::view),
            elapsed_secs: self.clock.elapsed_secs(),
            can_advance: self.screen == Screen::Won
                && self.level().and_then(Level::next).is_some(),
            unsaved_progress: self.progress.has_unsaved(),
            progress_unreadable: self.progress.load_error().is_some(),
        }
    }

    fn begin_round(&mut self, level: Level) {
        let seed = self.seeds.random::<u64>();
        self.round = Some(sim::start_round(level, seed));
        self.screen = Screen::Playing;
        self.clock.restart();
        log::info!("Starting level {} ({} pairs)", level, level.pair_count());
        self.emit(&[GameEvent::RoundStarted { level }]);
    }

    fn emit(&mut self, events: &[GameEvent]) {
        for sink in &mut self.sinks {
            for event in events {
                sink.on_event(event);
            }
        }
    }

    fn require(&self, screen: Screen, action: &'static str) -> Result<(), GameError> {
        if self.screen == screen {
            Ok(())
        } else {
            Err(self.wrong_screen(action))
        }
    }

    fn wrong_screen(&self, action: &'static str) -> GameError {
        GameError::WrongScreen {
            action,
            screen: self.screen.name(),
        }
    }
}
