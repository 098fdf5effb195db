//! Domain models.

pub mod mood_record;

pub use mood_record::MoodRecord;
