//! Level unlock progression
//!
//! Unlocks are kept as an append-only ledger of level numbers; the highest
//! unlocked level is the largest valid entry, or `MIN_LEVEL` when the ledger
//! is empty. The storage technology sits behind `UnlockLedger`.

use crate::consts::{MAX_LEVEL, MIN_LEVEL};
use crate::error::{GameError, PersistenceError};
use crate::sim::Level;

/// Durable storage for unlock records
pub trait UnlockLedger {
    /// Largest level ever recorded, if any
    fn read_highest(&self) -> Result<Option<u8>, PersistenceError>;

    /// Append a record unlocking `level`
    fn append_unlock(&mut self, level: Level) -> Result<(), PersistenceError>;
}

/// In-process ledger (tests, and sessions without a data directory)
#[derive(Debug, Clone, Default)]
pub struct MemoryLedger {
    pub entries: Vec<u8>,
    /// Make reads and/or appends fail
    pub fail_reads: bool,
    pub fail_writes: bool,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UnlockLedger for MemoryLedger {
    fn read_highest(&self) -> Result<Option<u8>, PersistenceError> {
        if self.fail_reads {
            return Err(PersistenceError::Unavailable("memory ledger read".into()));
        }
        Ok(self.entries.iter().copied().max())
    }

    fn append_unlock(&mut self, level: Level) -> Result<(), PersistenceError> {
        if self.fail_writes {
            return Err(PersistenceError::Unavailable("memory ledger write".into()));
        }
        self.entries.push(level.get());
        Ok(())
    }
}

impl<L: UnlockLedger + ?Sized> UnlockLedger for Box<L> {
    fn read_highest(&self) -> Result<Option<u8>, PersistenceError> {
        (**self).read_highest()
    }

    fn append_unlock(&mut self, level: Level) -> Result<(), PersistenceError> {
        (**self).append_unlock(level)
    }
}

/// Highest-unlocked cache over a ledger
#[derive(Debug)]
pub struct ProgressionStore<L> {
    ledger: L,
    highest: Level,
    /// Unlock advanced in memory but not yet written
    unsaved: Option<Level>,
    /// Set when the ledger could not be read at open
    load_error: Option<PersistenceError>,
}

impl<L: UnlockLedger> ProgressionStore<L> {
    /// Load progress, surfacing a read failure
    pub fn try_open(ledger: L) -> Result<Self, GameError> {
        let record = ledger.read_highest()?;
        Ok(Self::loaded(ledger, highest_from_record(record), None))
    }

    /// Load progress, starting from `MIN_LEVEL` if the ledger can't be read.
    ///
    /// The read failure is kept in `load_error` for the caller to report.
    pub fn open(ledger: L) -> Self {
        match ledger.read_highest() {
            Ok(record) => Self::loaded(ledger, highest_from_record(record), None),
            Err(err) => {
                log::warn!("Could not read progress, starting at level {MIN_LEVEL}: {err}");
                Self::loaded(ledger, Level::MIN, Some(err))
            }
        }
    }

    fn loaded(ledger: L, highest: Level, load_error: Option<PersistenceError>) -> Self {
        log::info!("Highest unlocked level: {}", highest);
        Self {
            ledger,
            highest,
            unsaved: None,
            load_error,
        }
    }

    /// Read failure from `open`, until a `reload` succeeds
    pub fn load_error(&self) -> Option<&PersistenceError> {
        self.load_error.as_ref()
    }

    /// Re-read the ledger. Unlocks made since opening are kept.
    pub fn reload(&mut self) -> Result<(), GameError> {
        let record = self.ledger.read_highest()?;
        self.highest = self.highest.max(highest_from_record(record));
        self.load_error = None;
        log::info!("Highest unlocked level: {}", self.highest);
        Ok(())
    }

    pub fn highest_unlocked(&self) -> Level {
        self.highest
    }

    pub fn is_unlocked(&self, level: Level) -> bool {
        level <= self.highest
    }

    /// Record that `level` was completed.
    ///
    /// Only completing the frontier level unlocks the next one; anything
    /// else is a no-op. The in-memory frontier advances even when the write
    /// fails, and the failed write is retried by `flush`. Returns the newly
    /// unlocked level.
    pub fn record_completion(&mut self, level: Level) -> Result<Option<Level>, GameError> {
        if level != self.highest {
            return Ok(None);
        }
        let Some(next) = level.next() else {
            return Ok(None);
        };

        self.highest = next;
        self.unsaved = Some(next);
        log::info!("Level {} unlocked", next);
        self.flush()?;
        Ok(Some(next))
    }

    /// Retry a pending unlock write
    pub fn flush(&mut self) -> Result<(), GameError> {
        let Some(level) = self.unsaved else {
            return Ok(());
        };
        match self.ledger.append_unlock(level) {
            Ok(()) => {
                self.unsaved = None;
                Ok(())
            }
            Err(err) => {
                log::warn!("Failed to save unlock of level {}: {}", level, err);
                Err(err.into())
            }
        }
    }

    pub fn has_unsaved(&self) -> bool {
        self.unsaved.is_some()
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }
}

fn highest_from_record(record: Option<u8>) -> Level {
    record
        .map(|l| l.clamp(MIN_LEVEL, MAX_LEVEL))
        .and_then(|l| Level::new(l).ok())
        .unwrap_or(Level::MIN)
}
