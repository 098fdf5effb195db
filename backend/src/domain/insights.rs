//! Aggregation of mood records over time windows.
//!
//! Everything here is deterministic: counts iterate moods in
//! declaration order, days are walked oldest first, and ties always
//! resolve to the first-declared mood, so the same records produce the
//! same summary every time.

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};

use shared::{DailyAveragePoint, MoodCount, MoodType};

use crate::domain::models::mood_record::MoodRecord;

/// Aggregate of one time window, ready to be wrapped into a response.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowSummary {
    pub start: DateTime<Utc>,
    /// Exclusive end of the window.
    pub end: DateTime<Utc>,
    /// Per-mood tallies in declaration order, always all five moods.
    pub counts: Vec<MoodCount>,
    /// `None` only when the window holds no records.
    pub dominant_mood: Option<MoodType>,
    pub total_entries: u32,
    /// One point per calendar day in the window, oldest first.
    pub daily_averages: Vec<DailyAveragePoint>,
}

/// The mood occurring most often, ties going to the first mood in
/// declaration order. `None` for an empty set.
pub fn dominant_mood<I>(moods: I) -> Option<MoodType>
where
    I: IntoIterator<Item = MoodType>,
{
    let mut counts = [0u32; 5];
    let mut total = 0u32;
    for mood in moods {
        if let Some(index) = MoodType::ALL.iter().position(|m| *m == mood) {
            counts[index] += 1;
            total += 1;
        }
    }
    if total == 0 {
        return None;
    }
    let max = counts.iter().copied().max().unwrap_or(0);
    MoodType::ALL
        .iter()
        .zip(counts.iter())
        .find(|(_, count)| **count == max)
        .map(|(mood, _)| *mood)
}

fn day_start(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).unwrap())
}

/// Read-only statistics over the mood log.
#[derive(Clone)]
pub struct InsightsService;

impl InsightsService {
    pub fn new() -> Self {
        Self
    }

    /// The Monday-to-Monday week containing the reference instant:
    /// Monday 00:00:00 UTC inclusive up to the following Monday
    /// exclusive.
    pub fn week_window(&self, reference: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        let date = reference.date_naive();
        let monday = date - Duration::days(date.weekday().num_days_from_monday() as i64);
        let start = day_start(monday);
        (start, start + Duration::days(7))
    }

    /// Summarize the records falling inside `[start, end)`.
    pub fn summarize_window(
        &self,
        records: &[MoodRecord],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> WindowSummary {
        let in_window: Vec<&MoodRecord> = records
            .iter()
            .filter(|r| r.timestamp >= start && r.timestamp < end)
            .collect();

        let mut raw_counts = [0u32; 5];
        for record in &in_window {
            if let Some(index) = MoodType::ALL.iter().position(|m| *m == record.mood_type) {
                raw_counts[index] += 1;
            }
        }
        let total_entries = in_window.len() as u32;

        let counts = MoodType::ALL
            .iter()
            .zip(raw_counts.iter())
            .map(|(mood, count)| MoodCount {
                mood_type: *mood,
                count: *count,
                percentage: if total_entries == 0 {
                    0.0
                } else {
                    (*count as f64 / total_entries as f64) * 100.0
                },
            })
            .collect();

        let dominant_mood = dominant_mood(in_window.iter().map(|r| r.mood_type));

        WindowSummary {
            start,
            end,
            counts,
            dominant_mood,
            total_entries,
            daily_averages: self.daily_averages(records, start, end),
        }
    }

    /// One point per calendar day in `[start, end)`, oldest first. Days
    /// without records carry `None` so charts show gaps instead of
    /// false zeros.
    pub fn daily_averages(
        &self,
        records: &[MoodRecord],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Vec<DailyAveragePoint> {
        let mut points = Vec::new();
        let mut day = start.date_naive();
        while day_start(day) < end {
            let values: Vec<f64> = records
                .iter()
                .filter(|r| {
                    r.timestamp >= start && r.timestamp < end && r.timestamp.date_naive() == day
                })
                .map(|r| r.mood_type.chart_value())
                .collect();

            let average = if values.is_empty() {
                None
            } else {
                Some(values.iter().sum::<f64>() / values.len() as f64)
            };
            points.push(DailyAveragePoint {
                date: day.format("%Y-%m-%d").to_string(),
                average,
            });

            match day.succ_opt() {
                Some(next) => day = next,
                None => break,
            }
        }
        points
    }

    /// Daily averages for the `days` most recent calendar days, ending
    /// with the reference date itself.
    pub fn recent_daily_averages(
        &self,
        records: &[MoodRecord],
        reference: DateTime<Utc>,
        days: u32,
    ) -> Vec<DailyAveragePoint> {
        if days == 0 {
            return Vec::new();
        }
        let end = day_start(reference.date_naive()) + Duration::days(1);
        let start = end - Duration::days(days as i64);
        self.daily_averages(records, start, end)
    }

    /// Number of distinct calendar days with at least one record.
    pub fn tracked_days(&self, records: &[MoodRecord]) -> u32 {
        let mut days: Vec<NaiveDate> = records.iter().map(|r| r.timestamp.date_naive()).collect();
        days.sort();
        days.dedup();
        days.len() as u32
    }
}

impl Default for InsightsService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::MoodSource;

    // 2026-06-01 is a Monday.
    fn at(day: u32, hour: u32, mood: MoodType) -> MoodRecord {
        MoodRecord::with_timestamp(
            Utc.with_ymd_and_hms(2026, 6, day, hour, 0, 0).unwrap(),
            mood,
            mood.base_intensity(),
            None,
            MoodSource::Manual,
        )
    }

    fn week_of_june_first() -> (DateTime<Utc>, DateTime<Utc>) {
        InsightsService::new().week_window(Utc.with_ymd_and_hms(2026, 6, 3, 12, 0, 0).unwrap())
    }

    #[test]
    fn test_week_window_starts_on_monday_midnight() {
        let service = InsightsService::new();
        let wednesday = Utc.with_ymd_and_hms(2026, 6, 3, 15, 30, 0).unwrap();

        let (start, end) = service.week_window(wednesday);

        assert_eq!(start, Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2026, 6, 8, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_week_window_on_monday_midnight_is_its_own_week() {
        let service = InsightsService::new();
        let monday = Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap();

        let (start, _end) = service.week_window(monday);

        assert_eq!(start, monday);
    }

    #[test]
    fn test_week_window_on_sunday_night_stays_in_week() {
        let service = InsightsService::new();
        let sunday = Utc.with_ymd_and_hms(2026, 6, 7, 23, 59, 59).unwrap();

        let (start, end) = service.week_window(sunday);

        assert_eq!(start, Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2026, 6, 8, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_summary_counts_and_dominant_mood() {
        let service = InsightsService::new();
        let records = vec![
            at(1, 9, MoodType::Happy),
            at(3, 14, MoodType::Sad),
            at(5, 19, MoodType::Happy),
        ];
        let (start, end) = week_of_june_first();

        let summary = service.summarize_window(&records, start, end);

        assert_eq!(summary.total_entries, 3);
        assert_eq!(summary.dominant_mood, Some(MoodType::Happy));
        let by_mood: Vec<(MoodType, u32)> = summary
            .counts
            .iter()
            .map(|c| (c.mood_type, c.count))
            .collect();
        assert_eq!(
            by_mood,
            vec![
                (MoodType::Happy, 2),
                (MoodType::Sad, 1),
                (MoodType::Angry, 0),
                (MoodType::Neutral, 0),
                (MoodType::Excited, 0),
            ]
        );
    }

    #[test]
    fn test_summary_percentages_sum_to_hundred() {
        let service = InsightsService::new();
        let records = vec![
            at(1, 9, MoodType::Happy),
            at(2, 9, MoodType::Happy),
            at(3, 9, MoodType::Sad),
            at(4, 9, MoodType::Angry),
        ];
        let (start, end) = week_of_june_first();

        let summary = service.summarize_window(&records, start, end);

        assert_eq!(summary.counts[0].percentage, 50.0);
        assert_eq!(summary.counts[1].percentage, 25.0);
        assert_eq!(summary.counts[2].percentage, 25.0);
        let total: f64 = summary.counts.iter().map(|c| c.percentage).sum();
        assert!((total - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_summary_of_empty_window_has_no_dominant_mood() {
        let service = InsightsService::new();
        let (start, end) = week_of_june_first();

        let summary = service.summarize_window(&[], start, end);

        assert_eq!(summary.total_entries, 0);
        assert_eq!(summary.dominant_mood, None);
        assert!(summary.counts.iter().all(|c| c.percentage == 0.0));
        assert_eq!(summary.daily_averages.len(), 7);
        assert!(summary.daily_averages.iter().all(|p| p.average.is_none()));
    }

    #[test]
    fn test_summary_ignores_records_outside_window() {
        let service = InsightsService::new();
        let records = vec![
            at(1, 9, MoodType::Happy),
            // Following Monday 00:00 is already the next week.
            at(8, 0, MoodType::Angry),
            MoodRecord::with_timestamp(
                Utc.with_ymd_and_hms(2026, 5, 31, 23, 59, 59).unwrap(),
                MoodType::Sad,
                2.0,
                None,
                MoodSource::Manual,
            ),
        ];
        let (start, end) = week_of_june_first();

        let summary = service.summarize_window(&records, start, end);

        assert_eq!(summary.total_entries, 1);
        assert_eq!(summary.dominant_mood, Some(MoodType::Happy));
    }

    #[test]
    fn test_daily_averages_leave_gaps_for_untracked_days() {
        let service = InsightsService::new();
        let records = vec![
            at(1, 9, MoodType::Happy),
            at(3, 14, MoodType::Sad),
            at(5, 19, MoodType::Happy),
        ];
        let (start, end) = week_of_june_first();

        let points = service.daily_averages(&records, start, end);

        assert_eq!(points.len(), 7);
        assert_eq!(points[0].date, "2026-06-01");
        assert_eq!(points[6].date, "2026-06-07");
        let averages: Vec<Option<f64>> = points.iter().map(|p| p.average).collect();
        assert_eq!(
            averages,
            vec![
                Some(5.0),
                None,
                Some(2.0),
                None,
                Some(5.0),
                None,
                None,
            ]
        );
    }

    #[test]
    fn test_daily_average_is_mean_of_chart_values() {
        let service = InsightsService::new();
        // Happy (5) and Sad (2) on the same day.
        let records = vec![at(2, 9, MoodType::Happy), at(2, 20, MoodType::Sad)];
        let (start, end) = week_of_june_first();

        let points = service.daily_averages(&records, start, end);

        assert_eq!(points[1].average, Some(3.5));
    }

    #[test]
    fn test_dominant_mood_tie_keeps_declaration_order() {
        let moods = vec![MoodType::Sad, MoodType::Happy];

        assert_eq!(dominant_mood(moods), Some(MoodType::Happy));
    }

    #[test]
    fn test_dominant_mood_of_empty_set_is_none() {
        assert_eq!(dominant_mood(Vec::new()), None);
    }

    #[test]
    fn test_tracked_days_counts_distinct_calendar_days() {
        let service = InsightsService::new();
        let records = vec![
            at(1, 9, MoodType::Happy),
            at(1, 21, MoodType::Sad),
            at(4, 12, MoodType::Neutral),
        ];

        assert_eq!(service.tracked_days(&records), 2);
    }

    #[test]
    fn test_recent_daily_averages_end_on_reference_date() {
        let service = InsightsService::new();
        let records = vec![at(7, 9, MoodType::Excited)];
        let reference = Utc.with_ymd_and_hms(2026, 6, 7, 18, 0, 0).unwrap();

        let points = service.recent_daily_averages(&records, reference, 7);

        assert_eq!(points.len(), 7);
        assert_eq!(points[0].date, "2026-06-01");
        assert_eq!(points[6].date, "2026-06-07");
        assert_eq!(points[6].average, Some(4.0));
    }
}
