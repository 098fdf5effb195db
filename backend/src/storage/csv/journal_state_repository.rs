//! YAML-backed repository for journal-level state.
//!
//! File structure:
//!
//! ```text
//! <base_directory>/journal.yaml
//! ```
//!
//! Holds the reminder marker (date of the most recent mood entry) and
//! the retention window. Saved atomically through a temp file so the
//! state never ends up half-written.

use chrono::{NaiveDate, Utc};
use log::info;
use std::fs;

use crate::storage::csv::connection::CsvConnection;
use crate::storage::traits::{JournalState, JournalStateStorage, StorageError};

#[derive(Clone)]
pub struct JournalStateRepository {
    connection: CsvConnection,
}

impl JournalStateRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    /// Load the state file, creating a default one on first use.
    fn load_or_create(&self) -> Result<JournalState, StorageError> {
        let path = self.connection.journal_state_file_path();
        if path.exists() {
            let contents = fs::read_to_string(&path).map_err(StorageError::unavailable)?;
            serde_yaml::from_str(&contents)
                .map_err(|e| StorageError::corrupt(format!("{}: {}", path.display(), e)))
        } else {
            let state = JournalState::default();
            self.save(&state)?;
            info!("Created journal state at {}", path.display());
            Ok(state)
        }
    }

    fn save(&self, state: &JournalState) -> Result<(), StorageError> {
        let contents = serde_yaml::to_string(state).map_err(StorageError::unavailable)?;
        self.connection
            .write_atomic(&self.connection.journal_state_file_path(), &contents)
    }

    fn update<F>(&self, apply: F) -> Result<(), StorageError>
    where
        F: FnOnce(&mut JournalState),
    {
        let mut state = self.load_or_create()?;
        apply(&mut state);
        state.updated_at = Utc::now().to_rfc3339();
        self.save(&state)
    }
}

impl JournalStateStorage for JournalStateRepository {
    fn get_journal_state(&self) -> Result<JournalState, StorageError> {
        self.load_or_create()
    }

    fn set_last_mood_date(&self, date: NaiveDate) -> Result<(), StorageError> {
        self.update(|state| state.last_mood_date = Some(date))?;
        info!("Updated last mood date to {}", date);
        Ok(())
    }

    fn set_retention_days(&self, days: u32) -> Result<(), StorageError> {
        self.update(|state| state.retention_days = days)?;
        info!("Updated retention window to {} days", days);
        Ok(())
    }
}
