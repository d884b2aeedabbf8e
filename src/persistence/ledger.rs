//! Append-only unlock log on disk
//!
//! One JSON record per line: `{"v":1,"level":3,"unlocked_at":1700000000}`.

use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_LEVEL, MIN_LEVEL};
use crate::error::PersistenceError;
use crate::progress::UnlockLedger;
use crate::sim::Level;

pub const LEDGER_FILE_NAME: &str = "progress.jsonl";
const RECORD_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct UnlockRecord {
    v: u32,
    level: u32,
    /// Unix seconds
    #[serde(default)]
    unlocked_at: u64,
}

/// Unlock ledger stored as a JSON-lines file
#[derive(Debug, Clone)]
pub struct FileLedger {
    path: PathBuf,
}

impl FileLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Ledger inside `dir` using the default file name
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(LEDGER_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All valid unlocked levels, in file order
    pub fn read_levels(&self) -> Result<Vec<u8>, PersistenceError> {
        let file = match fs::File::open(&self.path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(PersistenceError::io("open", &self.path, err)),
        };

        let mut levels = Vec::new();
        for (line_no, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| PersistenceError::io("read", &self.path, e))?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<UnlockRecord>(&line) {
                Ok(record) if record.v == RECORD_VERSION => {
                    match u8::try_from(record.level)
                        .ok()
                        .filter(|l| (MIN_LEVEL..=MAX_LEVEL).contains(l))
                    {
                        Some(level) => levels.push(level),
                        None => log::warn!(
                            "Skipping unlock of level {} outside {}..={} ({}:{})",
                            record.level,
                            MIN_LEVEL,
                            MAX_LEVEL,
                            self.path.display(),
                            line_no + 1
                        ),
                    }
                }
                Ok(record) => log::warn!(
                    "Skipping record with unknown version {} ({}:{})",
                    record.v,
                    self.path.display(),
                    line_no + 1
                ),
                Err(err) => log::warn!(
                    "Skipping corrupt record ({}:{}): {}",
                    self.path.display(),
                    line_no + 1,
                    err
                ),
            }
        }
        Ok(levels)
    }
}

impl UnlockLedger for FileLedger {
    fn read_highest(&self) -> Result<Option<u8>, PersistenceError> {
        Ok(self.read_levels()?.into_iter().max())
    }

    fn append_unlock(&mut self, level: Level) -> Result<(), PersistenceError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(|e| PersistenceError::io("create", dir, e))?;
        }

        let record = UnlockRecord {
            v: RECORD_VERSION,
            level: level.get() as u32,
            unlocked_at: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
        };
        let mut line = serde_json::to_string(&record)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| PersistenceError::io("open", &self.path, e))?;
        file.write_all(line.as_bytes())
            .map_err(|e| PersistenceError::io("append to", &self.path, e))?;
        file.sync_data()
            .map_err(|e| PersistenceError::io("sync", &self.path, e))?;

        log::debug!("Appended unlock of level {} to {}", level, self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::ProgressionStore;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = FileLedger::in_dir(dir.path());
        assert_eq!(ledger.read_highest().unwrap(), None);
    }

    #[test]
    fn test_progress_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join("nested").join("memory-match");

        let mut store = ProgressionStore::open(FileLedger::in_dir(&data_dir));
        store.record_completion(Level::MIN).unwrap();
        store.record_completion(Level::new(3).unwrap()).unwrap();
        drop(store);

        let store = ProgressionStore::open(FileLedger::in_dir(&data_dir));
        assert_eq!(store.highest_unlocked().get(), 4);
        assert_eq!(store.ledger().read_levels().unwrap(), vec![3, 4]);
    }

    #[test]
    fn test_corrupt_and_foreign_lines_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(LEDGER_FILE_NAME);
        fs::write(
            &path,
            concat!(
                "{\"v\":1,\"level\":3,\"unlocked_at\":1}\n",
                "not json\n",
                "\n",
                "{\"v\":1,\"level\":40}\n",
                "{\"v\":9,\"level\":20}\n",
                "{\"v\":1,\"level\":6}\n",
            ),
        )
        .unwrap();

        let ledger = FileLedger::new(&path);
        assert_eq!(ledger.read_levels().unwrap(), vec![3, 6]);
        assert_eq!(ledger.read_highest().unwrap(), Some(6));
    }

    #[test]
    fn test_unwritable_path_reports_error() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should be
        let path = dir.path().join("blocked");
        fs::create_dir(&path).unwrap();

        let mut ledger = FileLedger::new(&path);
        let err = ledger.append_unlock(Level::MIN).unwrap_err();
        assert!(matches!(err, PersistenceError::Io { .. }));
    }
}
