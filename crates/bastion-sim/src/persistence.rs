//! Level records: highest unlocked level and last played level.
//!
//! Stored as pretty JSON in a caller-chosen directory. A missing file reads
//! as the defaults; a corrupt one is an error.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

const RECORDS_FILE: &str = "level_records.json";

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("level records i/o at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("level records at {path} are malformed: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelRecords {
    pub unlocked_level: u32,
    pub last_played_level: u32,
}

impl Default for LevelRecords {
    fn default() -> Self {
        Self {
            unlocked_level: 1,
            last_played_level: 1,
        }
    }
}

impl LevelRecords {
    /// Record that `level` was cleared: the next level is unlocked if it is
    /// beyond the current unlock, and becomes the last played level.
    pub fn record_completion(&mut self, level: u32) {
        let next = level.saturating_add(1);
        self.unlocked_level = self.unlocked_level.max(next);
        self.last_played_level = next;
    }

    pub fn is_unlocked(&self, level: u32) -> bool {
        level >= 1 && level <= self.unlocked_level
    }
}

pub fn records_path(dir: &Path) -> PathBuf {
    dir.join(RECORDS_FILE)
}

pub fn save_to_file(dir: &Path, records: &LevelRecords) -> Result<(), PersistenceError> {
    let path = records_path(dir);
    let io_err = |source| PersistenceError::Io {
        path: path.clone(),
        source,
    };
    fs::create_dir_all(dir).map_err(io_err)?;
    let json = serde_json::to_string_pretty(records).map_err(|source| PersistenceError::Json {
        path: path.clone(),
        source,
    })?;
    fs::write(&path, json).map_err(io_err)?;
    Ok(())
}

pub fn load_from_file(dir: &Path) -> Result<LevelRecords, PersistenceError> {
    let path = records_path(dir);
    let json = match fs::read_to_string(&path) {
        Ok(json) => json,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(LevelRecords::default()),
        Err(source) => return Err(PersistenceError::Io { path, source }),
    };
    serde_json::from_str(&json).map_err(|source| PersistenceError::Json { path, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("bastion_test_{name}"));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn completion_unlocks_next() {
        let mut records = LevelRecords::default();
        records.record_completion(1);
        assert_eq!(records.unlocked_level, 2);
        assert_eq!(records.last_played_level, 2);
        assert!(records.is_unlocked(2));
        assert!(!records.is_unlocked(3));
        assert!(!records.is_unlocked(0));
    }

    #[test]
    fn replaying_old_level_keeps_unlock() {
        let mut records = LevelRecords {
            unlocked_level: 5,
            last_played_level: 5,
        };
        records.record_completion(2);
        assert_eq!(records.unlocked_level, 5);
        assert_eq!(records.last_played_level, 3);
    }

    #[test]
    fn missing_file_is_default() {
        let dir = temp_dir("missing");
        assert_eq!(load_from_file(&dir).unwrap(), LevelRecords::default());
    }

    #[test]
    fn save_and_load_file() {
        let dir = temp_dir("save_load");
        let records = LevelRecords {
            unlocked_level: 4,
            last_played_level: 3,
        };
        save_to_file(&dir, &records).unwrap();
        assert_eq!(load_from_file(&dir).unwrap(), records);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn corrupt_file_is_error() {
        let dir = temp_dir("corrupt");
        fs::create_dir_all(&dir).unwrap();
        fs::write(records_path(&dir), "not json").unwrap();
        assert!(matches!(
            load_from_file(&dir),
            Err(PersistenceError::Json { .. })
        ));
        let _ = fs::remove_dir_all(&dir);
    }
}
