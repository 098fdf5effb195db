//! In-memory storage backend.
//!
//! Used by tests and as a fallback when the data directory cannot be
//! opened: the journal keeps working for the session, it just does not
//! persist. Repositories share state through `Arc`, so every
//! repository created from one [`MemoryConnection`] sees the same
//! records.

use chrono::{DateTime, NaiveDate, Utc};
use std::sync::{Arc, Mutex};

use crate::domain::models::mood_record::MoodRecord;
use crate::storage::traits::{
    Connection, JournalState, JournalStateStorage, MoodStorage, StorageError,
};

#[derive(Clone, Default)]
pub struct MemoryConnection {
    moods: Arc<Mutex<Vec<MoodRecord>>>,
    state: Arc<Mutex<JournalState>>,
}

impl MemoryConnection {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Connection for MemoryConnection {
    type MoodRepository = MemoryMoodRepository;
    type StateRepository = MemoryStateRepository;

    fn create_mood_repository(&self) -> Self::MoodRepository {
        MemoryMoodRepository {
            moods: self.moods.clone(),
        }
    }

    fn create_state_repository(&self) -> Self::StateRepository {
        MemoryStateRepository {
            state: self.state.clone(),
        }
    }
}

#[derive(Clone)]
pub struct MemoryMoodRepository {
    moods: Arc<Mutex<Vec<MoodRecord>>>,
}

impl MoodStorage for MemoryMoodRepository {
    fn append_mood(&self, record: &MoodRecord) -> Result<(), StorageError> {
        let mut moods = self.moods.lock().unwrap();
        moods.push(record.clone());
        moods.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        Ok(())
    }

    fn load_all_moods(&self) -> Result<Vec<MoodRecord>, StorageError> {
        Ok(self.moods.lock().unwrap().clone())
    }

    fn prune_older_than(&self, cutoff: DateTime<Utc>) -> Result<usize, StorageError> {
        let mut moods = self.moods.lock().unwrap();
        let before = moods.len();
        moods.retain(|m| m.timestamp >= cutoff);
        Ok(before - moods.len())
    }
}

#[derive(Clone)]
pub struct MemoryStateRepository {
    state: Arc<Mutex<JournalState>>,
}

impl JournalStateStorage for MemoryStateRepository {
    fn get_journal_state(&self) -> Result<JournalState, StorageError> {
        Ok(self.state.lock().unwrap().clone())
    }

    fn set_last_mood_date(&self, date: NaiveDate) -> Result<(), StorageError> {
        let mut state = self.state.lock().unwrap();
        state.last_mood_date = Some(date);
        state.updated_at = Utc::now().to_rfc3339();
        Ok(())
    }

    fn set_retention_days(&self, days: u32) -> Result<(), StorageError> {
        let mut state = self.state.lock().unwrap();
        state.retention_days = days;
        state.updated_at = Utc::now().to_rfc3339();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use shared::{MoodSource, MoodType};

    fn sample_record(id: &str, timestamp: DateTime<Utc>) -> MoodRecord {
        MoodRecord {
            id: id.to_string(),
            timestamp,
            mood_type: MoodType::Happy,
            intensity: 4.0,
            note: None,
            source: MoodSource::Manual,
        }
    }

    #[test]
    fn test_repositories_share_the_connection_state() -> anyhow::Result<()> {
        let connection = MemoryConnection::new();
        let writer = connection.create_mood_repository();
        let reader = connection.create_mood_repository();

        writer.append_mood(&sample_record("mood::1::0", Utc::now()))?;

        assert_eq!(reader.load_all_moods()?.len(), 1);
        Ok(())
    }

    #[test]
    fn test_load_returns_records_oldest_first() -> anyhow::Result<()> {
        let connection = MemoryConnection::new();
        let repo = connection.create_mood_repository();
        let now = Utc::now();

        repo.append_mood(&sample_record("mood::2::0", now))?;
        repo.append_mood(&sample_record("mood::1::0", now - Duration::hours(1)))?;

        let moods = repo.load_all_moods()?;
        assert_eq!(moods[0].id, "mood::1::0");
        assert_eq!(moods[1].id, "mood::2::0");
        Ok(())
    }

    #[test]
    fn test_prune_drops_old_records() -> anyhow::Result<()> {
        let connection = MemoryConnection::new();
        let repo = connection.create_mood_repository();
        let now = Utc::now();

        repo.append_mood(&sample_record("mood::1::0", now - Duration::days(10)))?;
        repo.append_mood(&sample_record("mood::2::0", now))?;

        let removed = repo.prune_older_than(now - Duration::days(7))?;

        assert_eq!(removed, 1);
        assert_eq!(repo.load_all_moods()?.len(), 1);
        Ok(())
    }

    #[test]
    fn test_state_round_trip() -> anyhow::Result<()> {
        let connection = MemoryConnection::new();
        let repo = connection.create_state_repository();
        let date = NaiveDate::from_ymd_opt(2026, 8, 25).unwrap();

        repo.set_last_mood_date(date)?;
        repo.set_retention_days(14)?;

        let state = repo.get_journal_state()?;
        assert_eq!(state.last_mood_date, Some(date));
        assert_eq!(state.retention_days, 14);
        Ok(())
    }
}
