//! Domain model for a single mood observation.

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};

use shared::{MoodSource, MoodType};

/// Process-wide counter so records created in the same millisecond
/// still get distinct IDs.
static MOOD_ID_SEQ: AtomicU64 = AtomicU64::new(0);

/// A mood observation as the domain layer works with it.
///
/// The shared [`shared::MoodRecord`] DTO carries the timestamp as an
/// RFC 3339 string for the UI layers; here it is a typed UTC instant.
/// The timestamp is fixed at creation and never edited afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct MoodRecord {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub mood_type: MoodType,
    pub intensity: f64,
    pub note: Option<String>,
    pub source: MoodSource,
}

impl MoodRecord {
    /// Create a record stamped with the current time.
    pub fn new(
        mood_type: MoodType,
        intensity: f64,
        note: Option<String>,
        source: MoodSource,
    ) -> Self {
        Self::with_timestamp(Utc::now(), mood_type, intensity, note, source)
    }

    /// Create a record with an explicit timestamp (backfill, tests).
    pub fn with_timestamp(
        timestamp: DateTime<Utc>,
        mood_type: MoodType,
        intensity: f64,
        note: Option<String>,
        source: MoodSource,
    ) -> Self {
        Self {
            id: Self::generate_id(timestamp.timestamp_millis().max(0) as u64),
            timestamp,
            mood_type,
            intensity: Self::clamp_intensity(intensity),
            note,
            source,
        }
    }

    /// Generate a unique ID of the form `mood::<epoch_millis>::<seq>`.
    pub fn generate_id(epoch_millis: u64) -> String {
        let seq = MOOD_ID_SEQ.fetch_add(1, Ordering::Relaxed);
        shared::MoodRecord::generate_id(epoch_millis, seq)
    }

    /// Clamp an intensity into the valid 0 to 5 range. Non-finite
    /// inputs (a NaN confidence from an upstream sensor) collapse to 0.
    pub fn clamp_intensity(value: f64) -> f64 {
        if !value.is_finite() {
            return 0.0;
        }
        value.clamp(0.0, 5.0)
    }

    /// Convert to the wire DTO used by UI layers.
    pub fn to_dto(&self) -> shared::MoodRecord {
        shared::MoodRecord {
            id: self.id.clone(),
            date: self.timestamp.to_rfc3339(),
            mood_type: self.mood_type,
            intensity: self.intensity,
            note: self.note.clone(),
            source: self.source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_distinct_within_one_millisecond() {
        let a = MoodRecord::generate_id(1_700_000_000_000);
        let b = MoodRecord::generate_id(1_700_000_000_000);

        assert_ne!(a, b);
        assert!(a.starts_with("mood::1700000000000::"));
        assert!(b.starts_with("mood::1700000000000::"));
    }

    #[test]
    fn test_new_record_id_embeds_creation_timestamp() {
        let record = MoodRecord::new(MoodType::Happy, 4.0, None, MoodSource::Manual);

        let (epoch_millis, _seq) = shared::MoodRecord::parse_id(&record.id).unwrap();
        assert_eq!(epoch_millis as i64, record.timestamp.timestamp_millis());
    }

    #[test]
    fn test_intensity_clamps_to_valid_range() {
        assert_eq!(MoodRecord::clamp_intensity(7.2), 5.0);
        assert_eq!(MoodRecord::clamp_intensity(-1.0), 0.0);
        assert_eq!(MoodRecord::clamp_intensity(3.4), 3.4);
        assert_eq!(MoodRecord::clamp_intensity(f64::NAN), 0.0);
        assert_eq!(MoodRecord::clamp_intensity(f64::INFINITY), 0.0);
    }

    #[test]
    fn test_constructor_clamps_intensity() {
        let record = MoodRecord::new(MoodType::Excited, 99.0, None, MoodSource::Manual);

        assert_eq!(record.intensity, 5.0);
    }

    #[test]
    fn test_to_dto_formats_timestamp_as_rfc3339() {
        let record = MoodRecord::new(
            MoodType::Sad,
            2.0,
            Some("long day".to_string()),
            MoodSource::Text,
        );

        let dto = record.to_dto();

        assert_eq!(dto.id, record.id);
        assert_eq!(dto.mood_type, MoodType::Sad);
        assert_eq!(dto.note.as_deref(), Some("long day"));
        let parsed = DateTime::parse_from_rfc3339(&dto.date).unwrap();
        assert_eq!(parsed.with_timezone(&Utc), record.timestamp);
    }
}
