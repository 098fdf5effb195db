//! Runtime-selected storage backend.
//!
//! [`AnyConnection`] dispatches between the CSV and in-memory backends
//! so callers can decide at startup which one to run on, without making
//! everything downstream generic. The facade uses it to fall back to
//! in-memory storage when the data directory cannot be opened.

use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::models::mood_record::MoodRecord;
use crate::storage::csv::{CsvConnection, JournalStateRepository, MoodRepository};
use crate::storage::memory::{MemoryConnection, MemoryMoodRepository, MemoryStateRepository};
use crate::storage::traits::{
    Connection, JournalState, JournalStateStorage, MoodStorage, StorageError,
};

#[derive(Clone)]
pub enum AnyConnection {
    Csv(CsvConnection),
    Memory(MemoryConnection),
}

impl AnyConnection {
    /// Whether records written through this connection survive a
    /// restart.
    pub fn is_persistent(&self) -> bool {
        matches!(self, AnyConnection::Csv(_))
    }
}

impl Connection for AnyConnection {
    type MoodRepository = AnyMoodRepository;
    type StateRepository = AnyStateRepository;

    fn create_mood_repository(&self) -> Self::MoodRepository {
        match self {
            AnyConnection::Csv(connection) => {
                AnyMoodRepository::Csv(connection.create_mood_repository())
            }
            AnyConnection::Memory(connection) => {
                AnyMoodRepository::Memory(connection.create_mood_repository())
            }
        }
    }

    fn create_state_repository(&self) -> Self::StateRepository {
        match self {
            AnyConnection::Csv(connection) => {
                AnyStateRepository::Csv(connection.create_state_repository())
            }
            AnyConnection::Memory(connection) => {
                AnyStateRepository::Memory(connection.create_state_repository())
            }
        }
    }
}

pub enum AnyMoodRepository {
    Csv(MoodRepository),
    Memory(MemoryMoodRepository),
}

impl MoodStorage for AnyMoodRepository {
    fn append_mood(&self, record: &MoodRecord) -> Result<(), StorageError> {
        match self {
            AnyMoodRepository::Csv(repo) => repo.append_mood(record),
            AnyMoodRepository::Memory(repo) => repo.append_mood(record),
        }
    }

    fn load_all_moods(&self) -> Result<Vec<MoodRecord>, StorageError> {
        match self {
            AnyMoodRepository::Csv(repo) => repo.load_all_moods(),
            AnyMoodRepository::Memory(repo) => repo.load_all_moods(),
        }
    }

    fn prune_older_than(&self, cutoff: DateTime<Utc>) -> Result<usize, StorageError> {
        match self {
            AnyMoodRepository::Csv(repo) => repo.prune_older_than(cutoff),
            AnyMoodRepository::Memory(repo) => repo.prune_older_than(cutoff),
        }
    }
}

pub enum AnyStateRepository {
    Csv(JournalStateRepository),
    Memory(MemoryStateRepository),
}

impl JournalStateStorage for AnyStateRepository {
    fn get_journal_state(&self) -> Result<JournalState, StorageError> {
        match self {
            AnyStateRepository::Csv(repo) => repo.get_journal_state(),
            AnyStateRepository::Memory(repo) => repo.get_journal_state(),
        }
    }

    fn set_last_mood_date(&self, date: NaiveDate) -> Result<(), StorageError> {
        match self {
            AnyStateRepository::Csv(repo) => repo.set_last_mood_date(date),
            AnyStateRepository::Memory(repo) => repo.set_last_mood_date(date),
        }
    }

    fn set_retention_days(&self, days: u32) -> Result<(), StorageError> {
        match self {
            AnyStateRepository::Csv(repo) => repo.set_retention_days(days),
            AnyStateRepository::Memory(repo) => repo.set_retention_days(days),
        }
    }
}
