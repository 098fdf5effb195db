//! Storage trait abstractions for the mood journal.
//!
//! These traits define the interface between the domain layer and the
//! storage backends. Repositories are synchronous and cheap to create;
//! a [`Connection`] acts as a factory so services can stay generic over
//! the backing store (CSV files in production, in-memory for tests and
//! degraded operation).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::models::mood_record::MoodRecord;

/// How many days of mood history to keep when no explicit retention
/// window has been configured.
pub const DEFAULT_RETENTION_DAYS: u32 = 7;

/// Errors surfaced by the storage layer.
///
/// Callers distinguish the two cases: an unavailable store is an
/// environment problem (missing directory, permissions, disk), while a
/// corrupt store means the files exist but their contents no longer
/// parse into the expected schema.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("stored data is corrupt: {0}")]
    Corrupt(String),
}

impl StorageError {
    pub fn unavailable(err: impl std::fmt::Display) -> Self {
        StorageError::Unavailable(err.to_string())
    }

    pub fn corrupt(err: impl std::fmt::Display) -> Self {
        StorageError::Corrupt(err.to_string())
    }
}

/// Persistent journal-level state that sits alongside the mood log:
/// the reminder marker and the retention window, plus bookkeeping
/// fields mirroring the on-disk file format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalState {
    /// Calendar date of the most recent logged mood, used to decide
    /// whether today's reminder is still due.
    pub last_mood_date: Option<NaiveDate>,

    /// Retention window in days for pruning old records.
    pub retention_days: u32,

    /// Version of the data format for future migrations.
    pub data_format_version: String,

    /// When this state file was first created.
    pub created_at: String,

    /// When this state file was last updated.
    pub updated_at: String,
}

impl Default for JournalState {
    fn default() -> Self {
        let now = Utc::now().to_rfc3339();
        Self {
            last_mood_date: None,
            retention_days: DEFAULT_RETENTION_DAYS,
            data_format_version: "1.0".to_string(),
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

/// Storage operations for the append-only mood log.
pub trait MoodStorage: Send + Sync {
    /// Append a single record to the log.
    fn append_mood(&self, record: &MoodRecord) -> Result<(), StorageError>;

    /// Load every stored record, oldest first.
    fn load_all_moods(&self) -> Result<Vec<MoodRecord>, StorageError>;

    /// Remove records older than the cutoff and report how many were
    /// dropped.
    fn prune_older_than(&self, cutoff: DateTime<Utc>) -> Result<usize, StorageError>;
}

/// Storage operations for journal-level state.
pub trait JournalStateStorage: Send + Sync {
    /// Load the current state, creating a default one if none exists.
    fn get_journal_state(&self) -> Result<JournalState, StorageError>;

    /// Record the calendar date of the most recent mood entry.
    fn set_last_mood_date(&self, date: NaiveDate) -> Result<(), StorageError>;

    /// Change the retention window used by pruning.
    fn set_retention_days(&self, days: u32) -> Result<(), StorageError>;
}

/// Factory for the repositories of one storage backend.
pub trait Connection: Send + Sync + Clone {
    type MoodRepository: MoodStorage;
    type StateRepository: JournalStateStorage;

    fn create_mood_repository(&self) -> Self::MoodRepository;
    fn create_state_repository(&self) -> Self::StateRepository;
}
