//! Commands and results for mood journal operations.
//!
//! Commands are plain structs built by the calling layer (UI shell,
//! CLI, tests) and handed to the domain services; results carry the
//! domain records back out.

use chrono::{DateTime, Utc};

use shared::{MoodSource, MoodType};

use crate::domain::models::mood_record::MoodRecord;

/// Log a mood picked directly by the user.
#[derive(Debug, Clone)]
pub struct LogMoodCommand {
    /// Mood label as received from the caller; unknown labels are
    /// normalized to neutral.
    pub mood_label: String,
    /// Explicit intensity, or `None` to use the mood's base intensity.
    pub intensity: Option<f64>,
    pub note: Option<String>,
    pub source: MoodSource,
    /// Explicit timestamp for backfill; `None` means now.
    pub timestamp: Option<DateTime<Utc>>,
}

impl LogMoodCommand {
    /// A manual entry with defaults for everything but the label.
    pub fn manual(mood_label: impl Into<String>) -> Self {
        Self {
            mood_label: mood_label.into(),
            intensity: None,
            note: None,
            source: MoodSource::Manual,
            timestamp: None,
        }
    }
}

/// Result of logging a mood, with the advice to show for it.
#[derive(Debug, Clone)]
pub struct LoggedMood {
    pub record: MoodRecord,
    pub advice: String,
}

/// Classify a free-text note and log the result.
#[derive(Debug, Clone)]
pub struct AnalyzeNoteCommand {
    pub text: String,
}

/// Result of a note or transcript analysis.
#[derive(Debug, Clone)]
pub struct AnalyzedMood {
    pub record: MoodRecord,
    pub detected_mood: MoodType,
    pub advice: String,
}

/// Log the final transcript of a speech-recognition session.
#[derive(Debug, Clone)]
pub struct RecordTranscriptCommand {
    pub transcript: String,
}

/// Log one webcam expression observation.
#[derive(Debug, Clone)]
pub struct WebcamObservationCommand {
    /// Expression name from the face model (happy, surprised, sad,
    /// fearful, angry, disgusted, neutral).
    pub expression: String,
    /// Model confidence in the 0 to 1 range.
    pub confidence: f64,
}

/// Query over the stored mood log.
#[derive(Debug, Clone, Default)]
pub struct MoodListQuery {
    /// Inclusive lower bound on the record timestamp.
    pub start: Option<DateTime<Utc>>,
    /// Exclusive upper bound on the record timestamp.
    pub end: Option<DateTime<Utc>>,
    /// Keep only the most recent N matches.
    pub limit: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct MoodListResult {
    pub records: Vec<MoodRecord>,
}

/// Ask for the weekly summary containing the reference instant.
#[derive(Debug, Clone, Default)]
pub struct WeeklySummaryQuery {
    /// Any instant inside the wanted week; `None` means the current
    /// week.
    pub reference: Option<DateTime<Utc>>,
}

/// Drop records older than the retention window.
#[derive(Debug, Clone, Default)]
pub struct PruneCommand {
    /// Override the configured retention window for this run.
    pub retain_days: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct PruneResult {
    pub removed: usize,
    pub cutoff: DateTime<Utc>,
}
