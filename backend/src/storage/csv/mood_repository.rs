//! CSV-backed repository for the append-only mood log.
//!
//! File structure:
//!
//! ```text
//! <base_directory>/moods.csv
//! ```
//!
//! Columns: `id,date,mood_type,intensity,note,source`. Dates are stored
//! as RFC 3339 strings in UTC. An empty note column maps to `None`.

use chrono::{DateTime, Utc};
use log::{debug, info};
use std::fs::File;
use std::io::BufReader;

use shared::{MoodSource, MoodType};

use crate::domain::models::mood_record::MoodRecord;
use crate::storage::csv::connection::CsvConnection;
use crate::storage::traits::{MoodStorage, StorageError};

const CSV_HEADERS: [&str; 6] = ["id", "date", "mood_type", "intensity", "note", "source"];

/// Repository for mood records stored in a CSV file.
#[derive(Clone)]
pub struct MoodRepository {
    connection: CsvConnection,
}

impl MoodRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    /// Create the log file with a header row if it does not exist yet.
    fn ensure_file_exists(&self) -> Result<(), StorageError> {
        let path = self.connection.moods_file_path();
        if !path.exists() {
            self.write_moods(&[])?;
            info!("Created mood log at {}", path.display());
        }
        Ok(())
    }

    /// Read all records from the file, oldest first.
    fn read_moods(&self) -> Result<Vec<MoodRecord>, StorageError> {
        self.ensure_file_exists()?;

        let path = self.connection.moods_file_path();
        let file = File::open(&path).map_err(StorageError::unavailable)?;
        let mut reader = csv::Reader::from_reader(BufReader::new(file));

        let mut moods = Vec::new();
        for (row, result) in reader.records().enumerate() {
            let record = result
                .map_err(|e| StorageError::corrupt(format!("row {}: {}", row + 1, e)))?;
            moods.push(Self::parse_row(&record, row + 1)?);
        }

        moods.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        Ok(moods)
    }

    fn parse_row(record: &csv::StringRecord, row: usize) -> Result<MoodRecord, StorageError> {
        let field = |index: usize, name: &str| -> Result<&str, StorageError> {
            record
                .get(index)
                .ok_or_else(|| StorageError::corrupt(format!("row {}: missing {} column", row, name)))
        };

        let id = field(0, "id")?.to_string();
        let date_str = field(1, "date")?;
        let timestamp = DateTime::parse_from_rfc3339(date_str)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| StorageError::corrupt(format!("row {}: bad date '{}': {}", row, date_str, e)))?;

        // Unknown mood labels normalize to neutral rather than failing
        // the whole load.
        let mood_type = MoodType::from_label_or_neutral(field(2, "mood_type")?);

        let intensity_str = field(3, "intensity")?;
        let intensity = intensity_str.parse::<f64>().map_err(|e| {
            StorageError::corrupt(format!("row {}: bad intensity '{}': {}", row, intensity_str, e))
        })?;

        let note_str = field(4, "note")?;
        let note = if note_str.is_empty() {
            None
        } else {
            Some(note_str.to_string())
        };

        let source_str = field(5, "source")?;
        let source = MoodSource::from_label(source_str).ok_or_else(|| {
            StorageError::corrupt(format!("row {}: unknown source '{}'", row, source_str))
        })?;

        Ok(MoodRecord {
            id,
            timestamp,
            mood_type,
            intensity: MoodRecord::clamp_intensity(intensity),
            note,
            source,
        })
    }

    /// Rewrite the whole file from the given records. The serialized
    /// log goes through the connection's temp file + rename, so a crash
    /// mid-write leaves the previous log intact.
    fn write_moods(&self, moods: &[MoodRecord]) -> Result<(), StorageError> {
        let mut writer = csv::Writer::from_writer(Vec::new());

        writer
            .write_record(CSV_HEADERS)
            .map_err(StorageError::unavailable)?;
        for mood in moods {
            writer
                .write_record([
                    mood.id.as_str(),
                    &mood.timestamp.to_rfc3339(),
                    mood.mood_type.label(),
                    &mood.intensity.to_string(),
                    mood.note.as_deref().unwrap_or(""),
                    mood.source.label(),
                ])
                .map_err(StorageError::unavailable)?;
        }
        let contents = writer
            .into_inner()
            .map_err(|e| StorageError::unavailable(e.into_error()))?;

        let path = self.connection.moods_file_path();
        self.connection.write_atomic(&path, contents)?;

        debug!("Wrote {} mood records to {}", moods.len(), path.display());
        Ok(())
    }
}

impl MoodStorage for MoodRepository {
    fn append_mood(&self, record: &MoodRecord) -> Result<(), StorageError> {
        let mut moods = self.read_moods()?;
        moods.push(record.clone());
        moods.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        self.write_moods(&moods)
    }

    fn load_all_moods(&self) -> Result<Vec<MoodRecord>, StorageError> {
        self.read_moods()
    }

    fn prune_older_than(&self, cutoff: DateTime<Utc>) -> Result<usize, StorageError> {
        let moods = self.read_moods()?;
        let before = moods.len();
        let kept: Vec<MoodRecord> = moods
            .into_iter()
            .filter(|m| m.timestamp >= cutoff)
            .collect();
        let removed = before - kept.len();
        if removed > 0 {
            self.write_moods(&kept)?;
            info!("Pruned {} mood records older than {}", removed, cutoff);
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::fs;
    use tempfile::TempDir;

    fn setup_test_repo() -> anyhow::Result<(MoodRepository, TempDir)> {
        let temp_dir = TempDir::new()?;
        let connection = CsvConnection::new(temp_dir.path())?;
        Ok((MoodRepository::new(connection), temp_dir))
    }

    fn sample_record(id: &str, timestamp: DateTime<Utc>, mood_type: MoodType) -> MoodRecord {
        MoodRecord {
            id: id.to_string(),
            timestamp,
            mood_type,
            intensity: 4.0,
            note: None,
            source: MoodSource::Manual,
        }
    }

    #[test]
    fn test_load_from_empty_store_returns_no_records() -> anyhow::Result<()> {
        let (repo, _temp_dir) = setup_test_repo()?;

        let moods = repo.load_all_moods()?;

        assert!(moods.is_empty());
        Ok(())
    }

    #[test]
    fn test_append_and_load_round_trip() -> anyhow::Result<()> {
        let (repo, _temp_dir) = setup_test_repo()?;
        let timestamp = Utc::now();
        let record = MoodRecord {
            id: "mood::1700000000000::0".to_string(),
            timestamp,
            mood_type: MoodType::Happy,
            intensity: 4.5,
            note: Some("sunny walk, coffee with a friend".to_string()),
            source: MoodSource::Text,
        };

        repo.append_mood(&record)?;
        let moods = repo.load_all_moods()?;

        assert_eq!(moods.len(), 1);
        assert_eq!(moods[0].id, record.id);
        assert_eq!(moods[0].mood_type, MoodType::Happy);
        assert_eq!(moods[0].intensity, 4.5);
        assert_eq!(moods[0].note.as_deref(), Some("sunny walk, coffee with a friend"));
        assert_eq!(moods[0].source, MoodSource::Text);
        // RFC 3339 keeps sub-second precision, so the timestamp survives
        assert_eq!(moods[0].timestamp, record.timestamp);
        Ok(())
    }

    #[test]
    fn test_load_returns_records_oldest_first() -> anyhow::Result<()> {
        let (repo, _temp_dir) = setup_test_repo()?;
        let now = Utc::now();

        repo.append_mood(&sample_record("mood::3::0", now, MoodType::Angry))?;
        repo.append_mood(&sample_record(
            "mood::1::0",
            now - Duration::days(2),
            MoodType::Happy,
        ))?;
        repo.append_mood(&sample_record(
            "mood::2::0",
            now - Duration::days(1),
            MoodType::Sad,
        ))?;

        let moods = repo.load_all_moods()?;

        let ids: Vec<&str> = moods.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["mood::1::0", "mood::2::0", "mood::3::0"]);
        Ok(())
    }

    #[test]
    fn test_note_with_commas_survives_round_trip() -> anyhow::Result<()> {
        let (repo, _temp_dir) = setup_test_repo()?;
        let mut record = sample_record("mood::5::0", Utc::now(), MoodType::Sad);
        record.note = Some("tired, stressed, \"overwhelmed\"".to_string());

        repo.append_mood(&record)?;
        let moods = repo.load_all_moods()?;

        assert_eq!(moods[0].note.as_deref(), Some("tired, stressed, \"overwhelmed\""));
        Ok(())
    }

    #[test]
    fn test_unknown_mood_label_normalizes_to_neutral() -> anyhow::Result<()> {
        let (repo, temp_dir) = setup_test_repo()?;
        let csv = "id,date,mood_type,intensity,note,source\n\
                   mood::1::0,2026-08-20T10:00:00+00:00,ecstatic,4,,manual\n";
        fs::write(temp_dir.path().join("moods.csv"), csv)?;

        let moods = repo.load_all_moods()?;

        assert_eq!(moods.len(), 1);
        assert_eq!(moods[0].mood_type, MoodType::Neutral);
        Ok(())
    }

    #[test]
    fn test_unparseable_date_reports_corrupt() -> anyhow::Result<()> {
        let (repo, temp_dir) = setup_test_repo()?;
        let csv = "id,date,mood_type,intensity,note,source\n\
                   mood::1::0,not-a-date,happy,4,,manual\n";
        fs::write(temp_dir.path().join("moods.csv"), csv)?;

        let result = repo.load_all_moods();

        assert!(matches!(result, Err(StorageError::Corrupt(_))));
        Ok(())
    }

    #[test]
    fn test_unparseable_intensity_reports_corrupt() -> anyhow::Result<()> {
        let (repo, temp_dir) = setup_test_repo()?;
        let csv = "id,date,mood_type,intensity,note,source\n\
                   mood::1::0,2026-08-20T10:00:00+00:00,happy,not-a-number,,manual\n";
        fs::write(temp_dir.path().join("moods.csv"), csv)?;

        let result = repo.load_all_moods();

        assert!(matches!(result, Err(StorageError::Corrupt(_))));
        Ok(())
    }

    #[test]
    fn test_out_of_range_intensity_clamps_on_load() -> anyhow::Result<()> {
        let (repo, temp_dir) = setup_test_repo()?;
        let csv = "id,date,mood_type,intensity,note,source\n\
                   mood::1::0,2026-08-20T10:00:00+00:00,happy,9.5,,manual\n\
                   mood::2::0,2026-08-20T11:00:00+00:00,sad,-2,,manual\n";
        fs::write(temp_dir.path().join("moods.csv"), csv)?;

        let moods = repo.load_all_moods()?;

        assert_eq!(moods[0].intensity, 5.0);
        assert_eq!(moods[1].intensity, 0.0);
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_append_replaces_the_log_file_instead_of_truncating() -> anyhow::Result<()> {
        use std::os::unix::fs::MetadataExt;

        let (repo, temp_dir) = setup_test_repo()?;
        let log_path = temp_dir.path().join("moods.csv");

        repo.append_mood(&sample_record("mood::1::0", Utc::now(), MoodType::Happy))?;
        let first_inode = fs::metadata(&log_path)?.ino();

        repo.append_mood(&sample_record("mood::2::0", Utc::now(), MoodType::Sad))?;
        let second_inode = fs::metadata(&log_path)?.ino();

        // The temp file + rename swap gives the log a fresh inode on
        // every rewrite; truncating in place would reuse the old one.
        assert_ne!(first_inode, second_inode);
        assert!(!temp_dir.path().join("moods.tmp").exists());
        Ok(())
    }

    #[test]
    fn test_prune_removes_only_records_before_cutoff() -> anyhow::Result<()> {
        let (repo, _temp_dir) = setup_test_repo()?;
        let now = Utc::now();

        repo.append_mood(&sample_record("mood::1::0", now - Duration::days(10), MoodType::Sad))?;
        repo.append_mood(&sample_record("mood::2::0", now - Duration::days(8), MoodType::Happy))?;
        repo.append_mood(&sample_record("mood::3::0", now - Duration::days(2), MoodType::Happy))?;

        let removed = repo.prune_older_than(now - Duration::days(7))?;

        assert_eq!(removed, 2);
        let moods = repo.load_all_moods()?;
        assert_eq!(moods.len(), 1);
        assert_eq!(moods[0].id, "mood::3::0");
        Ok(())
    }

    #[test]
    fn test_prune_keeps_record_exactly_at_cutoff() -> anyhow::Result<()> {
        let (repo, _temp_dir) = setup_test_repo()?;
        let cutoff = Utc::now() - Duration::days(7);

        repo.append_mood(&sample_record("mood::1::0", cutoff, MoodType::Neutral))?;

        let removed = repo.prune_older_than(cutoff)?;

        assert_eq!(removed, 0);
        assert_eq!(repo.load_all_moods()?.len(), 1);
        Ok(())
    }
}
