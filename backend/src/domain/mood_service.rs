//! Mood journal orchestration.
//!
//! `MoodService` is the entry point for everything that touches the
//! mood log: logging manual picks, classifying notes and transcripts,
//! recording webcam observations, querying, summarizing, and pruning.
//! It is generic over the storage [`Connection`] so the same logic runs
//! against CSV files in production and in-memory stores in tests.
//!
//! Reads degrade: when the store is unavailable or corrupt the service
//! logs a warning and behaves as if the journal were empty. Writes do
//! not degrade; a failed append surfaces as an error.

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use log::{info, warn};

use shared::{
    HomeGreetingResponse, MoodSource, MoodType, ProgressSummaryResponse, ReminderStatusResponse,
    WeeklySummaryResponse,
};

use crate::domain::advice::AdviceService;
use crate::domain::calendar::CalendarService;
use crate::domain::classifier::ClassifierService;
use crate::domain::commands::moods::{
    AnalyzeNoteCommand, AnalyzedMood, LogMoodCommand, LoggedMood, MoodListQuery, MoodListResult,
    PruneCommand, PruneResult, RecordTranscriptCommand, WebcamObservationCommand,
    WeeklySummaryQuery,
};
use crate::domain::insights::InsightsService;
use crate::domain::models::mood_record::MoodRecord;
use crate::storage::traits::{Connection, JournalStateStorage, MoodStorage, StorageError};
use crate::storage::DEFAULT_RETENTION_DAYS;

/// Map a face-model expression label onto a mood. Surprise reads as
/// positive, fear as negative; anything unrecognized is neutral.
pub fn mood_for_expression(expression: &str) -> MoodType {
    match expression.trim().to_lowercase().as_str() {
        "happy" | "surprised" => MoodType::Happy,
        "sad" | "fearful" => MoodType::Sad,
        "angry" | "disgusted" => MoodType::Angry,
        "neutral" => MoodType::Neutral,
        _ => MoodType::Neutral,
    }
}

/// Domain service for the mood journal.
#[derive(Clone)]
pub struct MoodService<C: Connection> {
    connection: C,
    classifier: ClassifierService,
    advice: AdviceService,
    insights: InsightsService,
    calendar: CalendarService,
}

impl<C: Connection> MoodService<C> {
    pub fn new(
        connection: C,
        classifier: ClassifierService,
        advice: AdviceService,
        insights: InsightsService,
        calendar: CalendarService,
    ) -> Self {
        Self {
            connection,
            classifier,
            advice,
            insights,
            calendar,
        }
    }

    fn mood_repository(&self) -> C::MoodRepository {
        self.connection.create_mood_repository()
    }

    fn state_repository(&self) -> C::StateRepository {
        self.connection.create_state_repository()
    }

    /// Log a mood picked by the user (or supplied with an explicit
    /// timestamp for backfill).
    pub fn log_mood(&self, command: LogMoodCommand) -> Result<LoggedMood> {
        let mood_type = match MoodType::from_label(&command.mood_label) {
            Some(mood) => mood,
            None => {
                warn!(
                    "Unknown mood label '{}', defaulting to neutral",
                    command.mood_label
                );
                MoodType::Neutral
            }
        };
        let intensity = command
            .intensity
            .unwrap_or_else(|| mood_type.base_intensity());

        let record = match command.timestamp {
            Some(timestamp) => MoodRecord::with_timestamp(
                timestamp,
                mood_type,
                intensity,
                command.note,
                command.source,
            ),
            None => MoodRecord::new(mood_type, intensity, command.note, command.source),
        };
        self.persist(&record)?;

        info!(
            "📝 Logged {} mood (intensity {:.1}, source {})",
            mood_type.label(),
            record.intensity,
            record.source.label()
        );

        Ok(LoggedMood {
            advice: self.advice.advice_for(mood_type),
            record,
        })
    }

    /// Classify a journal note and log the detected mood with the note
    /// attached.
    pub fn analyze_note(&self, command: AnalyzeNoteCommand) -> Result<AnalyzedMood> {
        let classification = self.classifier.classify(&command.text)?;

        let record = MoodRecord::new(
            classification.mood,
            classification.intensity,
            Some(command.text.trim().to_string()),
            MoodSource::Text,
        );
        self.persist(&record)?;

        info!(
            "📝 Note classified as {} (intensity {:.1})",
            classification.mood.label(),
            classification.intensity
        );

        Ok(AnalyzedMood {
            detected_mood: classification.mood,
            advice: self.advice.advice_for(classification.mood),
            record,
        })
    }

    /// Run the transcript sentiment rules over a finished recognition
    /// session and log the result.
    pub fn record_transcript(&self, command: RecordTranscriptCommand) -> Result<AnalyzedMood> {
        let classification = self.classifier.analyze_transcript(&command.transcript)?;

        let record = MoodRecord::new(
            classification.mood,
            classification.intensity,
            Some(command.transcript.trim().to_string()),
            MoodSource::Voice,
        );
        self.persist(&record)?;

        info!(
            "🎤 Transcript classified as {} (intensity {:.1})",
            classification.mood.label(),
            classification.intensity
        );

        Ok(AnalyzedMood {
            detected_mood: classification.mood,
            advice: self.advice.advice_for(classification.mood),
            record,
        })
    }

    /// Log one webcam expression observation. Intensity is the model
    /// confidence scaled onto the 0 to 5 range.
    pub fn record_webcam_observation(
        &self,
        command: WebcamObservationCommand,
    ) -> Result<LoggedMood> {
        let mood_type = mood_for_expression(&command.expression);
        let intensity = MoodRecord::clamp_intensity(command.confidence * 5.0);

        let record = MoodRecord::new(mood_type, intensity, None, MoodSource::Webcam);
        self.persist(&record)?;

        info!(
            "📷 Webcam expression '{}' recorded as {} (intensity {:.2})",
            command.expression,
            mood_type.label(),
            record.intensity
        );

        Ok(LoggedMood {
            advice: self.advice.advice_for(mood_type),
            record,
        })
    }

    fn persist(&self, record: &MoodRecord) -> Result<()> {
        self.mood_repository()
            .append_mood(record)
            .context("failed to persist mood record")?;

        // The record itself is already saved; a failed marker update
        // only affects the reminder.
        if let Err(e) = self
            .state_repository()
            .set_last_mood_date(record.timestamp.date_naive())
        {
            warn!("Failed to update last mood date: {}", e);
        }
        Ok(())
    }

    /// List stored records, optionally bounded to `[start, end)` and
    /// truncated to the most recent `limit` matches. Always
    /// chronological, oldest first.
    pub fn list_moods(&self, query: MoodListQuery) -> Result<MoodListResult> {
        let mut records = self.load_records_lenient();
        if let Some(start) = query.start {
            records.retain(|r| r.timestamp >= start);
        }
        if let Some(end) = query.end {
            records.retain(|r| r.timestamp < end);
        }
        if let Some(limit) = query.limit {
            let limit = limit as usize;
            if records.len() > limit {
                records.drain(..records.len() - limit);
            }
        }
        Ok(MoodListResult { records })
    }

    fn load_records_lenient(&self) -> Vec<MoodRecord> {
        match self.mood_repository().load_all_moods() {
            Ok(records) => records,
            Err(StorageError::Corrupt(reason)) => {
                warn!(
                    "Stored mood data is corrupt ({}), continuing with an empty journal",
                    reason
                );
                Vec::new()
            }
            Err(StorageError::Unavailable(reason)) => {
                warn!(
                    "Mood storage unavailable ({}), continuing with an empty journal",
                    reason
                );
                Vec::new()
            }
        }
    }

    /// Aggregate the Monday-to-Sunday week containing the reference
    /// instant (now by default).
    pub fn weekly_summary(&self, query: WeeklySummaryQuery) -> Result<WeeklySummaryResponse> {
        let reference = query.reference.unwrap_or_else(Utc::now);
        let (start, end) = self.insights.week_window(reference);
        let records = self.load_records_lenient();
        let summary = self.insights.summarize_window(&records, start, end);

        // The label shows the last day inside the window, not the
        // exclusive bound.
        let range_label = self
            .calendar
            .format_week_range(start.date_naive(), end.date_naive() - Duration::days(1));

        Ok(WeeklySummaryResponse {
            start_date: start.to_rfc3339(),
            end_date: end.to_rfc3339(),
            range_label,
            counts: summary.counts,
            dominant_mood: summary.dominant_mood,
            total_entries: summary.total_entries,
            daily_averages: summary.daily_averages,
        })
    }

    /// Journaling progress: distinct tracked days plus the last seven
    /// days of averages.
    pub fn progress_summary(
        &self,
        reference: Option<DateTime<Utc>>,
    ) -> Result<ProgressSummaryResponse> {
        let reference = reference.unwrap_or_else(Utc::now);
        let records = self.load_records_lenient();

        Ok(ProgressSummaryResponse {
            days_tracked: self.insights.tracked_days(&records),
            daily_averages: self.insights.recent_daily_averages(&records, reference, 7),
        })
    }

    /// Drop records older than the retention window (the configured
    /// window unless the command overrides it).
    pub fn prune_old_moods(&self, command: PruneCommand) -> Result<PruneResult> {
        let days = command.retain_days.unwrap_or_else(|| self.retention_days());
        if days == 0 {
            return Err(anyhow!("Retention window must be at least one day"));
        }

        let cutoff = Utc::now() - Duration::days(days as i64);
        let removed = self
            .mood_repository()
            .prune_older_than(cutoff)
            .context("failed to prune old mood records")?;

        if removed > 0 {
            info!("🧹 Pruned {} mood records older than {} days", removed, days);
        }

        Ok(PruneResult { removed, cutoff })
    }

    fn retention_days(&self) -> u32 {
        match self.state_repository().get_journal_state() {
            Ok(state) => state.retention_days,
            Err(e) => {
                warn!(
                    "Could not read journal state ({}), using default retention",
                    e
                );
                DEFAULT_RETENTION_DAYS
            }
        }
    }

    /// Change the configured retention window.
    pub fn set_retention_days(&self, days: u32) -> Result<()> {
        if days == 0 {
            return Err(anyhow!("Retention window must be at least one day"));
        }
        self.state_repository()
            .set_retention_days(days)
            .context("failed to update retention window")?;
        Ok(())
    }

    /// Whether the once-per-day reminder should be shown right now.
    pub fn reminder_status(&self) -> ReminderStatusResponse {
        self.reminder_status_on(Utc::now().date_naive())
    }

    /// Reminder decision for an explicit day: due unless a mood was
    /// already logged on that day.
    pub fn reminder_status_on(&self, today: NaiveDate) -> ReminderStatusResponse {
        let last_mood_date = match self.state_repository().get_journal_state() {
            Ok(state) => state.last_mood_date,
            Err(e) => {
                warn!("Could not read journal state ({}), assuming reminder is due", e);
                None
            }
        };

        let due = last_mood_date != Some(today);
        ReminderStatusResponse {
            due,
            message: if due {
                Some("Don't forget to log your mood today!".to_string())
            } else {
                None
            },
        }
    }

    /// Header data for the home screen.
    pub fn home_greeting(&self) -> HomeGreetingResponse {
        let current = self.calendar.get_current_date();
        HomeGreetingResponse {
            greeting: self.calendar.current_greeting(),
            formatted_date: current.formatted_date,
            quote: self.advice.random_quote(),
        }
    }
}
