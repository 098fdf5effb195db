//! CSV connection management.
//!
//! A [`CsvConnection`] owns the base data directory and hands out the
//! per-file repositories. All journal data lives in two files:
//!
//! ```text
//! <base_directory>/
//! ├── moods.csv       (append-only mood log)
//! └── journal.yaml    (reminder marker, retention window)
//! ```

use log::info;
use std::fs;
use std::path::{Path, PathBuf};

use crate::storage::csv::journal_state_repository::JournalStateRepository;
use crate::storage::csv::mood_repository::MoodRepository;
use crate::storage::traits::{Connection, StorageError};

const MOODS_FILE: &str = "moods.csv";
const JOURNAL_STATE_FILE: &str = "journal.yaml";

/// Handle to a CSV-backed data directory.
#[derive(Clone, Debug)]
pub struct CsvConnection {
    base_directory: PathBuf,
}

impl CsvConnection {
    /// Open (and create if needed) the given data directory.
    pub fn new(base_directory: impl AsRef<Path>) -> Result<Self, StorageError> {
        let base_directory = base_directory.as_ref().to_path_buf();
        fs::create_dir_all(&base_directory).map_err(StorageError::unavailable)?;
        info!("📁 CSV storage initialized at {}", base_directory.display());
        Ok(Self { base_directory })
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    /// Full path of the mood log file.
    pub fn moods_file_path(&self) -> PathBuf {
        self.base_directory.join(MOODS_FILE)
    }

    /// Full path of the journal state file.
    pub fn journal_state_file_path(&self) -> PathBuf {
        self.base_directory.join(JOURNAL_STATE_FILE)
    }

    /// Write a file atomically by going through a temp file and a
    /// rename, so readers never observe a half-written file.
    pub(crate) fn write_atomic(
        &self,
        path: &Path,
        contents: impl AsRef<[u8]>,
    ) -> Result<(), StorageError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(StorageError::unavailable)?;
        }
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, contents).map_err(StorageError::unavailable)?;
        fs::rename(&temp_path, path).map_err(StorageError::unavailable)?;
        Ok(())
    }
}

impl Connection for CsvConnection {
    type MoodRepository = MoodRepository;
    type StateRepository = JournalStateRepository;

    fn create_mood_repository(&self) -> Self::MoodRepository {
        MoodRepository::new(self.clone())
    }

    fn create_state_repository(&self) -> Self::StateRepository {
        JournalStateRepository::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_new_creates_base_directory() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let nested = temp_dir.path().join("data").join("journal");

        let connection = CsvConnection::new(&nested)?;

        assert!(nested.exists());
        assert_eq!(connection.base_directory(), nested.as_path());
        Ok(())
    }

    #[test]
    fn test_file_paths_live_under_base_directory() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let connection = CsvConnection::new(temp_dir.path())?;

        assert_eq!(
            connection.moods_file_path(),
            temp_dir.path().join("moods.csv")
        );
        assert_eq!(
            connection.journal_state_file_path(),
            temp_dir.path().join("journal.yaml")
        );
        Ok(())
    }

    #[test]
    fn test_write_atomic_replaces_contents() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let connection = CsvConnection::new(temp_dir.path())?;
        let target = temp_dir.path().join("journal.yaml");

        connection.write_atomic(&target, "first")?;
        connection.write_atomic(&target, "second")?;

        assert_eq!(fs::read_to_string(&target)?, "second");
        assert!(!temp_dir.path().join("journal.tmp").exists());
        Ok(())
    }
}
