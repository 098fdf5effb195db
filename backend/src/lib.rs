//! # Mood Tracker Backend
//!
//! Core library for the mood journal. An embedding desktop shell gets
//! direct, synchronous access to the domain services through the
//! [`Backend`] facade:
//! - logging moods (manual picks, analyzed notes, voice transcripts,
//!   webcam observations)
//! - querying the journal and its weekly/progress summaries
//! - calendar grids and focus-date navigation
//! - the once-per-day reminder and home-screen greeting
//!
//! There is no IO/REST layer; the shell calls these methods from its
//! own event loop. Storage is pluggable through
//! [`storage::Connection`]: CSV files in production, in-memory for
//! tests, with an automatic in-memory fallback when the data directory
//! cannot be opened.
//!
//! The library never initializes logging; the embedding binary owns
//! that (tests use `env_logger` with `is_test`).

pub mod domain;
pub mod storage;

// Re-export commonly used types
pub use domain::commands::moods::PruneResult;
pub use domain::{MoodService, RecognitionController};
pub use storage::{AnyConnection, Connection, CsvConnection, MemoryConnection, StorageError};

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use log::warn;
use std::path::Path;

use shared::{
    AnalyzeNoteRequest, AnalyzeNoteResponse, CalendarFocusDate, CalendarMonth,
    CalendarMonthRequest, CurrentDateResponse, HomeGreetingResponse, LogMoodRequest,
    LoggedMoodResponse, MoodListRequest, MoodListResponse, ProgressSummaryResponse,
    ReminderStatusResponse, UpdateCalendarFocusResponse, WebcamObservationRequest,
    WeeklySummaryRequest, WeeklySummaryResponse,
};

use domain::commands::moods::{
    AnalyzeNoteCommand, LogMoodCommand, MoodListQuery, PruneCommand, RecordTranscriptCommand,
    WebcamObservationCommand, WeeklySummaryQuery,
};
use domain::recognition::{RecognitionSession, TranscriptFeed};
use domain::{AdviceService, CalendarService, ClassifierService, InsightsService};

/// Main backend struct that orchestrates all services.
pub struct Backend<C: Connection = AnyConnection> {
    connection: C,
    pub mood_service: MoodService<C>,
    pub calendar_service: CalendarService,
    pub classifier_service: ClassifierService,
    pub advice_service: AdviceService,
    pub insights_service: InsightsService,
    pub recognition_controller: RecognitionController,
}

impl Backend<AnyConnection> {
    /// Create a backend over a CSV data directory (created if missing).
    ///
    /// When the directory cannot be opened at all, the backend falls
    /// back to in-memory storage so the journal keeps working for the
    /// session; records then do not persist.
    pub fn new(data_directory: impl AsRef<Path>) -> Self {
        let connection = match CsvConnection::new(&data_directory) {
            Ok(connection) => AnyConnection::Csv(connection),
            Err(e) => {
                warn!(
                    "Could not open data directory {} ({}), moods will not persist this session",
                    data_directory.as_ref().display(),
                    e
                );
                AnyConnection::Memory(MemoryConnection::new())
            }
        };
        Self::with_connection(connection)
    }

    /// Whether records written through this backend survive a restart.
    pub fn is_persistent(&self) -> bool {
        self.connection.is_persistent()
    }
}

impl Backend<MemoryConnection> {
    /// A backend over in-memory storage, for tests and previews.
    pub fn in_memory() -> Self {
        Self::with_connection(MemoryConnection::new())
    }
}

impl<C: Connection> Backend<C> {
    /// Wire all services over an existing storage connection.
    pub fn with_connection(connection: C) -> Self {
        let classifier_service = ClassifierService::new();
        let advice_service = AdviceService::new();
        let insights_service = InsightsService::new();
        let calendar_service = CalendarService::new();
        let mood_service = MoodService::new(
            connection.clone(),
            classifier_service.clone(),
            advice_service.clone(),
            insights_service.clone(),
            calendar_service.clone(),
        );

        Backend {
            connection,
            mood_service,
            calendar_service,
            classifier_service,
            advice_service,
            insights_service,
            recognition_controller: RecognitionController::new(),
        }
    }

    /// Record a mood picked by the user.
    pub fn log_mood(&self, request: LogMoodRequest) -> Result<LoggedMoodResponse> {
        let logged = self.mood_service.log_mood(LogMoodCommand {
            mood_label: request.mood_type,
            intensity: request.intensity,
            note: request.note,
            source: request.source,
            timestamp: None,
        })?;

        Ok(LoggedMoodResponse {
            success_message: format!(
                "You're feeling {} today. Take care of yourself!",
                logged.record.mood_type.label()
            ),
            advice: logged.advice,
            record: logged.record.to_dto(),
        })
    }

    /// Analyze a free-text journal note and record the detected mood.
    pub fn analyze_note(&self, request: AnalyzeNoteRequest) -> Result<AnalyzeNoteResponse> {
        let analyzed = self.mood_service.analyze_note(AnalyzeNoteCommand {
            text: request.text,
        })?;

        Ok(AnalyzeNoteResponse {
            detected_mood: analyzed.detected_mood,
            advice: analyzed.advice,
            success_message: "Your text has been analyzed and your mood has been saved."
                .to_string(),
            record: analyzed.record.to_dto(),
        })
    }

    /// Record the final transcript of a speech-recognition session.
    pub fn record_transcript(&self, transcript: &str) -> Result<AnalyzeNoteResponse> {
        let analyzed = self.mood_service.record_transcript(RecordTranscriptCommand {
            transcript: transcript.to_string(),
        })?;

        Ok(AnalyzeNoteResponse {
            detected_mood: analyzed.detected_mood,
            advice: analyzed.advice,
            success_message: "Your mood has been analyzed based on your speech.".to_string(),
            record: analyzed.record.to_dto(),
        })
    }

    /// Record one webcam expression observation.
    pub fn record_webcam_observation(
        &self,
        request: WebcamObservationRequest,
    ) -> Result<LoggedMoodResponse> {
        let logged = self
            .mood_service
            .record_webcam_observation(WebcamObservationCommand {
                expression: request.expression,
                confidence: request.confidence,
            })?;

        Ok(LoggedMoodResponse {
            success_message: "Your expression has been analyzed and your mood has been saved."
                .to_string(),
            advice: logged.advice,
            record: logged.record.to_dto(),
        })
    }

    /// List stored moods, optionally date-filtered and limited.
    pub fn list_moods(&self, request: MoodListRequest) -> Result<MoodListResponse> {
        let result = self.mood_service.list_moods(MoodListQuery {
            start: parse_date_bound(request.start_date.as_deref())?,
            end: parse_date_bound(request.end_date.as_deref())?,
            limit: request.limit,
        })?;

        Ok(MoodListResponse {
            moods: result.records.iter().map(|r| r.to_dto()).collect(),
        })
    }

    /// Summary of the week containing the reference date (today when
    /// absent).
    pub fn weekly_summary(&self, request: WeeklySummaryRequest) -> Result<WeeklySummaryResponse> {
        let reference = parse_date_bound(request.reference_date.as_deref())?;
        self.mood_service
            .weekly_summary(WeeklySummaryQuery { reference })
    }

    /// Journaling progress across the whole store.
    pub fn progress_summary(&self) -> Result<ProgressSummaryResponse> {
        self.mood_service.progress_summary(None)
    }

    /// Calendar month grid populated with the moods logged in it.
    pub fn calendar_month(&self, request: CalendarMonthRequest) -> Result<CalendarMonth> {
        self.calendar_service
            .get_calendar_month_with_moods(request.month, request.year, &self.mood_service)
    }

    /// Calendar grid for the currently focused month.
    pub fn focused_calendar_month(&self) -> Result<CalendarMonth> {
        let focus = self.calendar_service.get_focus_date();
        self.calendar_service
            .get_calendar_month_with_moods(focus.month, focus.year, &self.mood_service)
    }

    /// Move the calendar focus one month back.
    pub fn navigate_previous_month(&self) -> UpdateCalendarFocusResponse {
        let focus_date = self.calendar_service.navigate_previous_month();
        let success_message = self.focus_message(&focus_date);
        UpdateCalendarFocusResponse {
            focus_date,
            success_message,
        }
    }

    /// Move the calendar focus one month forward.
    pub fn navigate_next_month(&self) -> UpdateCalendarFocusResponse {
        let focus_date = self.calendar_service.navigate_next_month();
        let success_message = self.focus_message(&focus_date);
        UpdateCalendarFocusResponse {
            focus_date,
            success_message,
        }
    }

    /// Jump the calendar focus to an explicit month.
    pub fn set_calendar_focus(&self, month: u32, year: u32) -> Result<UpdateCalendarFocusResponse> {
        let focus_date = self
            .calendar_service
            .set_focus_date(month, year)
            .map_err(|e| anyhow!(e))?;
        let success_message = self.focus_message(&focus_date);
        Ok(UpdateCalendarFocusResponse {
            focus_date,
            success_message,
        })
    }

    fn focus_message(&self, focus_date: &CalendarFocusDate) -> String {
        format!(
            "Calendar set to {} {}",
            self.calendar_service.month_name(focus_date.month),
            focus_date.year
        )
    }

    /// Today's date in the forms the UI renders.
    pub fn current_date(&self) -> CurrentDateResponse {
        self.calendar_service.get_current_date()
    }

    /// Greeting, date line and quote for the home screen header.
    pub fn home_greeting(&self) -> HomeGreetingResponse {
        self.mood_service.home_greeting()
    }

    /// Whether the once-per-day mood reminder should be shown.
    pub fn reminder_status(&self) -> ReminderStatusResponse {
        self.mood_service.reminder_status()
    }

    /// Drop records older than the retention window.
    pub fn prune_old_moods(&self, retain_days: Option<u32>) -> Result<PruneResult> {
        self.mood_service
            .prune_old_moods(PruneCommand { retain_days })
    }

    /// Change the configured retention window.
    pub fn set_retention_days(&self, days: u32) -> Result<()> {
        self.mood_service.set_retention_days(days)
    }

    /// Start the single speech-recognition session. The session drains
    /// recognition events; the feed is handed to the engine driver.
    pub fn start_recognition_session(&self) -> Result<(RecognitionSession, TranscriptFeed)> {
        let pair = self.recognition_controller.start_session()?;
        Ok(pair)
    }
}

/// Parse an optional date filter. Accepts RFC 3339 instants and plain
/// `YYYY-MM-DD` dates (read as UTC midnight). Empty strings count as
/// absent.
fn parse_date_bound(value: Option<&str>) -> Result<Option<DateTime<Utc>>> {
    let raw = match value {
        Some(raw) if !raw.trim().is_empty() => raw.trim(),
        _ => return Ok(None),
    };

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(parsed.with_timezone(&Utc)));
    }

    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("invalid date filter: {}", raw))?;
    Ok(Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).unwrap())))
}
