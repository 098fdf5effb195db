use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Minimum trimmed length a note or transcript must have before it can be
/// analyzed for mood content. Shorter input is a validation error, not a crash.
pub const MIN_ANALYZABLE_LEN: usize = 3;

/// The closed set of moods the journal understands.
///
/// Declaration order is load-bearing: every tie-break (classification,
/// dominant-mood computation) keeps the first maximum encountered in this
/// order. Unrecognized labels normalize to `Neutral` at ingestion boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoodType {
    Happy,
    Sad,
    Angry,
    Neutral,
    Excited,
}

impl MoodType {
    /// All moods in declaration order.
    pub const ALL: [MoodType; 5] = [
        MoodType::Happy,
        MoodType::Sad,
        MoodType::Angry,
        MoodType::Neutral,
        MoodType::Excited,
    ];

    /// Lowercase wire label, matching the serde representation.
    pub fn label(&self) -> &'static str {
        match self {
            MoodType::Happy => "happy",
            MoodType::Sad => "sad",
            MoodType::Angry => "angry",
            MoodType::Neutral => "neutral",
            MoodType::Excited => "excited",
        }
    }

    /// Emoji used wherever a mood is rendered.
    pub fn emoji(&self) -> &'static str {
        match self {
            MoodType::Happy => "😊",
            MoodType::Sad => "😢",
            MoodType::Angry => "😡",
            MoodType::Neutral => "😐",
            MoodType::Excited => "🤩",
        }
    }

    /// Fixed numeric mapping used when averaging moods for charting
    /// (happy=5, excited=4, neutral=3, sad=2, angry=1).
    pub fn chart_value(&self) -> f64 {
        match self {
            MoodType::Happy => 5.0,
            MoodType::Excited => 4.0,
            MoodType::Neutral => 3.0,
            MoodType::Sad => 2.0,
            MoodType::Angry => 1.0,
        }
    }

    /// Starting intensity assigned by the classifier before intensifier words
    /// are taken into account.
    pub fn base_intensity(&self) -> f64 {
        match self {
            MoodType::Happy | MoodType::Excited => 4.0,
            MoodType::Neutral => 3.0,
            MoodType::Sad => 2.0,
            MoodType::Angry => 1.0,
        }
    }

    /// Parse a label case-insensitively. Returns `None` for anything outside
    /// the closed set.
    pub fn from_label(label: &str) -> Option<MoodType> {
        match label.trim().to_lowercase().as_str() {
            "happy" => Some(MoodType::Happy),
            "sad" => Some(MoodType::Sad),
            "angry" => Some(MoodType::Angry),
            "neutral" => Some(MoodType::Neutral),
            "excited" => Some(MoodType::Excited),
            _ => None,
        }
    }

    /// Ingestion-boundary normalization: unknown labels become `Neutral`.
    pub fn from_label_or_neutral(label: &str) -> MoodType {
        Self::from_label(label).unwrap_or(MoodType::Neutral)
    }
}

/// Where a mood observation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoodSource {
    /// Picked directly by the user from the mood selector
    Manual,
    /// Inferred from a webcam facial-expression frame
    Webcam,
    /// Derived from a speech-recognition transcript
    Voice,
    /// Derived from a free-text journal note
    Text,
}

impl MoodSource {
    /// Lowercase wire label, matching the serde representation.
    pub fn label(&self) -> &'static str {
        match self {
            MoodSource::Manual => "manual",
            MoodSource::Webcam => "webcam",
            MoodSource::Voice => "voice",
            MoodSource::Text => "text",
        }
    }

    /// Parse a wire label back into a source. Case-insensitive.
    pub fn from_label(label: &str) -> Option<MoodSource> {
        match label.trim().to_lowercase().as_str() {
            "manual" => Some(MoodSource::Manual),
            "webcam" => Some(MoodSource::Webcam),
            "voice" => Some(MoodSource::Voice),
            "text" => Some(MoodSource::Text),
            _ => None,
        }
    }
}

/// Mood record ID in format: "mood::<epoch_millis>::<seq>"
///
/// The sequence component is a process-wide monotonic counter, so two records
/// created in the same millisecond still get distinct IDs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodRecord {
    pub id: String,
    /// Creation timestamp with timezone (RFC 3339); immutable after creation
    pub date: String,
    pub mood_type: MoodType,
    /// Strength of the observation, 0 to 5 inclusive (fractional values come
    /// from webcam confidence scaling)
    pub intensity: f64,
    /// Free text, present only for text/voice sources
    pub note: Option<String>,
    pub source: MoodSource,
}

impl MoodRecord {
    /// Generate a record ID from a timestamp and sequence number
    pub fn generate_id(epoch_millis: u64, seq: u64) -> String {
        format!("mood::{}::{}", epoch_millis, seq)
    }

    /// Parse a record ID to extract (epoch_millis, seq)
    pub fn parse_id(id: &str) -> Result<(u64, u64), MoodIdError> {
        let parts: Vec<&str> = id.split("::").collect();
        if parts.len() != 3 || parts[0] != "mood" {
            return Err(MoodIdError::InvalidFormat);
        }

        let epoch_millis = parts[1]
            .parse::<u64>()
            .map_err(|_| MoodIdError::InvalidTimestamp)?;
        let seq = parts[2]
            .parse::<u64>()
            .map_err(|_| MoodIdError::InvalidSequence)?;

        Ok((epoch_millis, seq))
    }

    /// Extract the epoch timestamp embedded in the record ID, for sorting
    pub fn extract_timestamp(&self) -> Result<u64, MoodIdError> {
        Self::parse_id(&self.id).map(|(timestamp, _)| timestamp)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MoodIdError {
    InvalidFormat,
    InvalidTimestamp,
    InvalidSequence,
}

impl fmt::Display for MoodIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoodIdError::InvalidFormat => write!(f, "Invalid mood record ID format"),
            MoodIdError::InvalidTimestamp => write!(f, "Invalid timestamp in mood record ID"),
            MoodIdError::InvalidSequence => write!(f, "Invalid sequence in mood record ID"),
        }
    }
}

impl std::error::Error for MoodIdError {}

/// Request for logging a mood picked manually or supplied by an external
/// collaborator. The label is normalized backend-side (unknown → neutral).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogMoodRequest {
    /// Raw mood label, e.g. "happy"
    pub mood_type: String,
    /// Optional intensity override; defaults to the mood's base intensity
    pub intensity: Option<f64>,
    pub note: Option<String>,
    pub source: MoodSource,
}

/// Response after a mood has been recorded
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggedMoodResponse {
    pub record: MoodRecord,
    /// One piece of pre-authored advice matching the recorded mood
    pub advice: String,
    pub success_message: String,
}

/// Request for analyzing a free-text journal note
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalyzeNoteRequest {
    pub text: String,
}

/// Response after a note has been analyzed and recorded
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalyzeNoteResponse {
    pub record: MoodRecord,
    pub detected_mood: MoodType,
    pub advice: String,
    pub success_message: String,
}

/// A webcam expression observation handed over by the face-model collaborator
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WebcamObservationRequest {
    /// Expression label reported by the model, e.g. "surprised"
    pub expression: String,
    /// Model confidence in [0, 1]
    pub confidence: f64,
}

/// Request for listing stored moods
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MoodListRequest {
    /// Start date for filtering, inclusive (RFC 3339)
    pub start_date: Option<String>,
    /// End date for filtering, exclusive (RFC 3339)
    pub end_date: Option<String>,
    /// Maximum number of moods to return
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MoodListResponse {
    pub moods: Vec<MoodRecord>,
}

/// Request for the weekly summary; defaults to the week containing today
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeeklySummaryRequest {
    /// Reference date inside the wanted week (RFC 3339)
    pub reference_date: Option<String>,
}

/// Per-mood tally within a summary window
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MoodCount {
    pub mood_type: MoodType,
    pub count: u32,
    /// Share of the window total, 0 to 100
    pub percentage: f64,
}

/// One day on the mood chart; `average` is absent when the day has no records
/// so charts can render gaps rather than false zeros
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyAveragePoint {
    /// ISO 8601 date (YYYY-MM-DD)
    pub date: String,
    pub average: Option<f64>,
}

/// Aggregated view of one Monday-to-Sunday week
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeeklySummaryResponse {
    /// Window start (RFC 3339), Monday 00:00:00
    pub start_date: String,
    /// Window end, exclusive (RFC 3339), the following Monday 00:00:00
    pub end_date: String,
    /// Human-readable range, e.g. "Jun 1 - 7"
    pub range_label: String,
    /// Counts in mood declaration order
    pub counts: Vec<MoodCount>,
    /// Highest-count mood; `None` when the window has no records
    pub dominant_mood: Option<MoodType>,
    pub total_entries: u32,
    /// One entry per day, Monday first
    pub daily_averages: Vec<DailyAveragePoint>,
}

/// Journaling progress across the whole store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProgressSummaryResponse {
    /// Number of distinct calendar days with at least one record
    pub days_tracked: u32,
    /// Last seven days, oldest first
    pub daily_averages: Vec<DailyAveragePoint>,
}

/// Type of calendar day for explicit rendering logic
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum CalendarDayType {
    /// Empty padding day before the start of the month
    PaddingBefore,
    /// Actual day within the month
    MonthDay,
    /// Empty padding day after the end of the month (if needed for grid alignment)
    PaddingAfter,
}

/// Represents a single day in the calendar
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalendarDay {
    pub day: u32,
    pub moods: Vec<MoodRecord>,
    /// Most frequent mood logged on this day, if any
    pub dominant_mood: Option<MoodType>,
    pub day_type: CalendarDayType,
}

/// Represents a calendar month with its associated mood data
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalendarMonth {
    pub month: u32,
    pub year: u32,
    pub days: Vec<CalendarDay>,
    /// Weekday index of the 1st, 0 = Monday (grids are Monday-first)
    pub first_day_of_week: u32,
}

/// Request for calendar month data
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalendarMonthRequest {
    pub month: u32,
    pub year: u32,
}

/// Represents the current focus date for calendar navigation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalendarFocusDate {
    pub month: u32,
    pub year: u32,
}

impl Default for CalendarFocusDate {
    fn default() -> Self {
        let now = chrono::Local::now();
        Self {
            month: now.month(),
            year: now.year() as u32,
        }
    }
}

/// Response after navigating the calendar focus
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpdateCalendarFocusResponse {
    pub focus_date: CalendarFocusDate,
    pub success_message: String,
}

/// Current date information from the backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CurrentDateResponse {
    pub month: u32,
    pub year: u32,
    pub day: u32,
    pub formatted_date: String, // e.g., "Friday, June 19, 2025"
    pub iso_date: String,       // e.g., "2025-06-19"
}

/// Home-screen header data: greeting, date line, one motivational quote
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HomeGreetingResponse {
    pub greeting: String,
    pub formatted_date: String,
    pub quote: String,
}

/// Whether the once-per-day mood reminder should be shown
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReminderStatusResponse {
    pub due: bool,
    pub message: Option<String>,
}

/// Validation result for note form input
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NoteFormValidation {
    pub is_valid: bool,
    pub errors: Vec<MoodValidationError>,
    pub cleaned_text: Option<String>,
}

/// Specific validation errors for mood input forms
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum MoodValidationError {
    EmptyText,
    TextTooShort(usize),
    IntensityOutOfRange(f64),
}

/// Validate note text the same way the analyzer will, so forms can reject
/// hopeless input before submitting it.
pub fn validate_note_text(text: &str) -> NoteFormValidation {
    let trimmed = text.trim();
    let mut errors = Vec::new();

    let length = trimmed.chars().count();
    if trimmed.is_empty() {
        errors.push(MoodValidationError::EmptyText);
    } else if length < MIN_ANALYZABLE_LEN {
        errors.push(MoodValidationError::TextTooShort(length));
    }

    NoteFormValidation {
        is_valid: errors.is_empty(),
        cleaned_text: if errors.is_empty() {
            Some(trimmed.to_string())
        } else {
            None
        },
        errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_mood_record_id() {
        let id = MoodRecord::generate_id(1702516122000, 0);
        assert_eq!(id, "mood::1702516122000::0");

        let id = MoodRecord::generate_id(1702516122000, 17);
        assert_eq!(id, "mood::1702516122000::17");
    }

    #[test]
    fn test_parse_mood_record_id() {
        let (timestamp, seq) = MoodRecord::parse_id("mood::1702516122000::3").unwrap();
        assert_eq!(timestamp, 1702516122000);
        assert_eq!(seq, 3);

        // Invalid format
        assert!(MoodRecord::parse_id("invalid::format").is_err());
        assert!(MoodRecord::parse_id("mood::1702516122000").is_err());
        assert!(MoodRecord::parse_id("not_mood::123::0").is_err());

        // Invalid components
        assert!(MoodRecord::parse_id("mood::not_a_number::0").is_err());
        assert!(MoodRecord::parse_id("mood::123::not_a_number").is_err());
    }

    #[test]
    fn test_extract_timestamp() {
        let record = MoodRecord {
            id: "mood::1702516122000::5".to_string(),
            date: "2023-12-14T01:08:42.000Z".to_string(),
            mood_type: MoodType::Happy,
            intensity: 4.0,
            note: None,
            source: MoodSource::Manual,
        };

        assert_eq!(record.extract_timestamp().unwrap(), 1702516122000);
    }

    #[test]
    fn test_same_millisecond_ids_are_distinct() {
        let first = MoodRecord::generate_id(1702516122000, 1);
        let second = MoodRecord::generate_id(1702516122000, 2);
        assert_ne!(first, second);
    }

    #[test]
    fn test_mood_type_labels_round_trip() {
        for mood in MoodType::ALL {
            assert_eq!(MoodType::from_label(mood.label()), Some(mood));
        }
    }

    #[test]
    fn test_each_mood_has_a_distinct_emoji() {
        let emojis: Vec<&str> = MoodType::ALL.iter().map(|m| m.emoji()).collect();

        for emoji in &emojis {
            assert!(!emoji.is_empty());
        }
        for (i, a) in emojis.iter().enumerate() {
            for b in &emojis[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_mood_type_from_label_normalizes_case_and_whitespace() {
        assert_eq!(MoodType::from_label("  HAPPY "), Some(MoodType::Happy));
        assert_eq!(MoodType::from_label("Excited"), Some(MoodType::Excited));
        assert_eq!(MoodType::from_label("grumpy"), None);
    }

    #[test]
    fn test_unknown_labels_normalize_to_neutral() {
        assert_eq!(MoodType::from_label_or_neutral("confused"), MoodType::Neutral);
        assert_eq!(MoodType::from_label_or_neutral(""), MoodType::Neutral);
        assert_eq!(MoodType::from_label_or_neutral("sad"), MoodType::Sad);
    }

    #[test]
    fn test_mood_type_wire_labels() {
        // The serde representation must match the lowercase labels used by
        // stored data and the embedding UI.
        assert_eq!(serde_json::to_string(&MoodType::Happy).unwrap(), "\"happy\"");
        assert_eq!(serde_json::to_string(&MoodType::Excited).unwrap(), "\"excited\"");
        assert_eq!(
            serde_json::from_str::<MoodType>("\"angry\"").unwrap(),
            MoodType::Angry
        );

        assert_eq!(serde_json::to_string(&MoodSource::Webcam).unwrap(), "\"webcam\"");
    }

    #[test]
    fn test_chart_values() {
        assert_eq!(MoodType::Happy.chart_value(), 5.0);
        assert_eq!(MoodType::Excited.chart_value(), 4.0);
        assert_eq!(MoodType::Neutral.chart_value(), 3.0);
        assert_eq!(MoodType::Sad.chart_value(), 2.0);
        assert_eq!(MoodType::Angry.chart_value(), 1.0);
    }

    #[test]
    fn test_base_intensities() {
        assert_eq!(MoodType::Happy.base_intensity(), 4.0);
        assert_eq!(MoodType::Excited.base_intensity(), 4.0);
        assert_eq!(MoodType::Neutral.base_intensity(), 3.0);
        assert_eq!(MoodType::Sad.base_intensity(), 2.0);
        assert_eq!(MoodType::Angry.base_intensity(), 1.0);
    }

    #[test]
    fn test_validate_note_text() {
        let ok = validate_note_text("  feeling good today  ");
        assert!(ok.is_valid);
        assert_eq!(ok.cleaned_text.as_deref(), Some("feeling good today"));

        let empty = validate_note_text("   ");
        assert!(!empty.is_valid);
        assert_eq!(empty.errors, vec![MoodValidationError::EmptyText]);

        let short = validate_note_text("ok");
        assert!(!short.is_valid);
        assert_eq!(short.errors, vec![MoodValidationError::TextTooShort(2)]);
    }
}
