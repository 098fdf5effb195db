//! Calendar domain logic for the mood journal.
//!
//! This module contains all business logic related to calendar
//! operations: month grids, date calculations, and grouping mood
//! records by day. The UI should only handle presentation concerns,
//! while all calendar computations and business rules live here.

use chrono::{Datelike, Local, NaiveDate, TimeZone, Timelike, Utc};
use log::{self, info};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use shared::{
    CalendarDay, CalendarDayType, CalendarFocusDate, CalendarMonth, CurrentDateResponse,
    MoodRecord,
};

use crate::domain::commands::moods::MoodListQuery;
use crate::domain::insights;
use crate::domain::mood_service::MoodService;
use crate::storage::Connection;
use anyhow::Result;

/// Calendar service that handles all calendar-related business logic.
#[derive(Clone)]
pub struct CalendarService {
    /// Current focus date for calendar navigation (month/year only).
    /// Kept in memory and not persisted.
    current_focus_date: Arc<Mutex<CalendarFocusDate>>,
}

impl CalendarService {
    pub fn new() -> Self {
        Self {
            current_focus_date: Arc::new(Mutex::new(CalendarFocusDate::default())),
        }
    }

    /// Get a calendar month populated with mood records, fetching them
    /// through the mood service.
    pub fn get_calendar_month_with_moods<C: Connection>(
        &self,
        month: u32,
        year: u32,
        mood_service: &MoodService<C>,
    ) -> Result<CalendarMonth> {
        info!("🗓️ CALENDAR: Getting calendar month with moods for {}/{}", month, year);

        let start = Utc.from_utc_datetime(
            &NaiveDate::from_ymd_opt(year as i32, month, 1)
                .ok_or_else(|| anyhow::anyhow!("invalid month {}/{}", month, year))?
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        );
        let (next_month, next_year) = self.next_month(month, year);
        let end = Utc.from_utc_datetime(
            &NaiveDate::from_ymd_opt(next_year as i32, next_month, 1)
                .ok_or_else(|| anyhow::anyhow!("invalid month {}/{}", next_month, next_year))?
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        );

        let result = mood_service.list_moods(MoodListQuery {
            start: Some(start),
            end: Some(end),
            limit: None,
        })?;
        info!(
            "🗓️ CALENDAR: Mood service returned {} records for {}/{}",
            result.records.len(),
            month,
            year
        );

        let dto_moods: Vec<MoodRecord> = result.records.iter().map(|r| r.to_dto()).collect();
        Ok(self.generate_calendar_month(month, year, dto_moods))
    }

    /// Generate a Monday-first month grid with mood data.
    ///
    /// The grid starts with padding cells up to the weekday of the 1st,
    /// then one cell per day of the month, then padding cells to
    /// complete the final week row.
    pub fn generate_calendar_month(
        &self,
        month: u32,
        year: u32,
        moods: Vec<MoodRecord>,
    ) -> CalendarMonth {
        let days_in_month = self.days_in_month(month, year);
        let first_day = self.first_day_of_month(month, year);

        log::debug!(
            "🗓️ CALENDAR DEBUG: {}/{} has {} days, first weekday index {}",
            month,
            year,
            days_in_month,
            first_day
        );

        let moods_by_day = self.group_moods_by_day(month, year, &moods);

        let mut calendar_days = Vec::new();

        for _ in 0..first_day {
            calendar_days.push(CalendarDay {
                day: 0,
                moods: Vec::new(),
                dominant_mood: None,
                day_type: CalendarDayType::PaddingBefore,
            });
        }

        for day in 1..=days_in_month {
            let mut day_moods = moods_by_day.get(&day).cloned().unwrap_or_default();
            // All stored dates carry the same UTC offset, so string
            // order is chronological order.
            day_moods.sort_by(|a, b| a.date.cmp(&b.date));
            let dominant_mood = insights::dominant_mood(day_moods.iter().map(|m| m.mood_type));

            calendar_days.push(CalendarDay {
                day,
                moods: day_moods,
                dominant_mood,
                day_type: CalendarDayType::MonthDay,
            });
        }

        while calendar_days.len() % 7 != 0 {
            calendar_days.push(CalendarDay {
                day: 0,
                moods: Vec::new(),
                dominant_mood: None,
                day_type: CalendarDayType::PaddingAfter,
            });
        }

        CalendarMonth {
            month,
            year,
            days: calendar_days,
            first_day_of_week: first_day,
        }
    }

    /// Get the number of days in a given month and year.
    pub fn days_in_month(&self, month: u32, year: u32) -> u32 {
        match month {
            2 => {
                if self.is_leap_year(year) {
                    29
                } else {
                    28
                }
            }
            4 | 6 | 9 | 11 => 30,
            _ => 31,
        }
    }

    /// Check if a year is a leap year.
    pub fn is_leap_year(&self, year: u32) -> bool {
        year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
    }

    /// Get the weekday index of the 1st of the month (0 = Monday, ...,
    /// 6 = Sunday), matching the Monday-first grid.
    pub fn first_day_of_month(&self, month: u32, year: u32) -> u32 {
        if let Some(date) = NaiveDate::from_ymd_opt(year as i32, month, 1) {
            date.weekday().num_days_from_monday()
        } else {
            0
        }
    }

    /// Get the human-readable name for a month number.
    pub fn month_name(&self, month: u32) -> &'static str {
        match month {
            1 => "January",
            2 => "February",
            3 => "March",
            4 => "April",
            5 => "May",
            6 => "June",
            7 => "July",
            8 => "August",
            9 => "September",
            10 => "October",
            11 => "November",
            12 => "December",
            _ => "Invalid Month",
        }
    }

    /// Abbreviated month name used for compact range labels.
    pub fn month_abbrev(&self, month: u32) -> &'static str {
        match month {
            1 => "Jan",
            2 => "Feb",
            3 => "Mar",
            4 => "Apr",
            5 => "May",
            6 => "Jun",
            7 => "Jul",
            8 => "Aug",
            9 => "Sep",
            10 => "Oct",
            11 => "Nov",
            12 => "Dec",
            _ => "???",
        }
    }

    fn weekday_name(&self, date: NaiveDate) -> &'static str {
        match date.weekday() {
            chrono::Weekday::Mon => "Monday",
            chrono::Weekday::Tue => "Tuesday",
            chrono::Weekday::Wed => "Wednesday",
            chrono::Weekday::Thu => "Thursday",
            chrono::Weekday::Fri => "Friday",
            chrono::Weekday::Sat => "Saturday",
            chrono::Weekday::Sun => "Sunday",
        }
    }

    /// Group mood records by day for a specific month and year.
    fn group_moods_by_day(
        &self,
        month: u32,
        year: u32,
        moods: &[MoodRecord],
    ) -> HashMap<u32, Vec<MoodRecord>> {
        let mut moods_by_day: HashMap<u32, Vec<MoodRecord>> = HashMap::new();

        for mood in moods {
            if let Some((m_year, m_month, m_day)) = self.parse_mood_date(&mood.date) {
                if m_month == month && m_year == year {
                    moods_by_day.entry(m_day).or_default().push(mood.clone());
                }
            }
        }

        moods_by_day
    }

    /// Parse an RFC 3339 date string to extract year, month, day.
    pub fn parse_mood_date(&self, date_str: &str) -> Option<(u32, u32, u32)> {
        if let Some(date_part) = date_str.split('T').next() {
            let parts: Vec<&str> = date_part.split('-').collect();
            if parts.len() == 3 {
                if let (Ok(year), Ok(month), Ok(day)) = (
                    parts[0].parse::<u32>(),
                    parts[1].parse::<u32>(),
                    parts[2].parse::<u32>(),
                ) {
                    return Some((year, month, day));
                }
            }
        }
        None
    }

    /// Format a record date for human-readable display.
    pub fn format_date_for_display(&self, date_str: &str) -> String {
        if let Some((year, month, day)) = self.parse_mood_date(date_str) {
            format!("{} {}, {}", self.month_name(month), day, year)
        } else {
            date_str.to_string()
        }
    }

    /// Compact label for a date range, e.g. "Jun 1 - 7" within one
    /// month or "May 30 - Jun 5" across a month boundary.
    pub fn format_week_range(&self, start: NaiveDate, end: NaiveDate) -> String {
        if start.month() == end.month() && start.year() == end.year() {
            format!("{} {} - {}", self.month_abbrev(start.month()), start.day(), end.day())
        } else {
            format!(
                "{} {} - {} {}",
                self.month_abbrev(start.month()),
                start.day(),
                self.month_abbrev(end.month()),
                end.day()
            )
        }
    }

    /// Time-of-day greeting: morning from 5:00, afternoon from 12:00,
    /// evening from 18:00 through the night.
    pub fn greeting_for_hour(&self, hour: u32) -> &'static str {
        if (5..12).contains(&hour) {
            "Good Morning"
        } else if (12..18).contains(&hour) {
            "Good Afternoon"
        } else {
            "Good Evening"
        }
    }

    /// Greeting for the current local time.
    pub fn current_greeting(&self) -> String {
        self.greeting_for_hour(Local::now().hour()).to_string()
    }

    /// Get current date information.
    pub fn get_current_date(&self) -> CurrentDateResponse {
        let now = Local::now();
        let month = now.month();
        let year = now.year() as u32;
        let day = now.day();

        let formatted_date = format!(
            "{}, {} {}, {}",
            self.weekday_name(now.date_naive()),
            self.month_name(month),
            day,
            year
        );
        let iso_date = format!("{:04}-{:02}-{:02}", year, month, day);

        CurrentDateResponse {
            month,
            year,
            day,
            formatted_date,
            iso_date,
        }
    }

    /// Get the current focus date for calendar navigation.
    pub fn get_focus_date(&self) -> CalendarFocusDate {
        self.current_focus_date.lock().unwrap().clone()
    }

    /// Set the focus date for calendar navigation.
    pub fn set_focus_date(&self, month: u32, year: u32) -> Result<CalendarFocusDate, String> {
        if !(1..=12).contains(&month) {
            return Err(format!("Invalid month: {}. Must be between 1 and 12", month));
        }

        let new_focus_date = CalendarFocusDate { month, year };

        {
            let mut focus_date = self.current_focus_date.lock().unwrap();
            *focus_date = new_focus_date.clone();
        }

        Ok(new_focus_date)
    }

    /// Navigate to the previous month.
    pub fn navigate_previous_month(&self) -> CalendarFocusDate {
        let current_focus = self.get_focus_date();
        let (prev_month, prev_year) = self.previous_month(current_focus.month, current_focus.year);

        // This never fails since previous_month returns valid values
        self.set_focus_date(prev_month, prev_year).unwrap()
    }

    /// Navigate to the next month.
    pub fn navigate_next_month(&self) -> CalendarFocusDate {
        let current_focus = self.get_focus_date();
        let (next_month, next_year) = self.next_month(current_focus.month, current_focus.year);

        // This never fails since next_month returns valid values
        self.set_focus_date(next_month, next_year).unwrap()
    }

    /// Month arithmetic with year rollover. The year saturates at the
    /// `u32` bounds so navigating past them cannot panic.
    pub fn previous_month(&self, current_month: u32, current_year: u32) -> (u32, u32) {
        if current_month == 1 {
            (12, current_year.saturating_sub(1))
        } else {
            (current_month - 1, current_year)
        }
    }

    pub fn next_month(&self, current_month: u32, current_year: u32) -> (u32, u32) {
        if current_month == 12 {
            (1, current_year.saturating_add(1))
        } else {
            (current_month + 1, current_year)
        }
    }
}

impl Default for CalendarService {
    fn default() -> Self {
        Self::new()
    }
}
