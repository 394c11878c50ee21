use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;

pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Hour of the late-afternoon boundary after which an active slot reports
/// [`FreeTimeStatus::DayOver`] (hostel curfew).
pub const DAY_OVER_HOUR: u32 = 17;
pub const DAY_OVER_MINUTE: u32 = 10;

const DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Day number used as the weekly table key: Sunday=1 through Saturday=7.
pub fn weekday_number(weekday: Weekday) -> u8 {
    weekday.number_from_sunday() as u8
}

/// Full day name for a table key (1=Sunday), `None` outside 1..=7.
pub fn day_name(day_number: u8) -> Option<&'static str> {
    day_number
        .checked_sub(1)
        .and_then(|index| DAY_NAMES.get(index as usize))
        .copied()
}

/// The day after `day_number`, wrapping Saturday (7) back to Sunday (1).
pub fn next_day_number(day_number: u8) -> u8 {
    (day_number % 7) + 1
}

fn minutes_since_midnight(hour: u32, minute: u32) -> u32 {
    hour * 60 + minute
}

/// Format an hour/minute pair on a 12-hour clock, e.g. `5:10 PM`.
pub fn format_12_hour(hour: u32, minute: u32) -> String {
    let period = if hour >= 12 { "PM" } else { "AM" };
    let display_hour = match hour {
        0 => 12,
        h if h > 12 => h - 12,
        h => h,
    };
    format!("{}:{:02} {}", display_hour, minute, period)
}

// ==================== TimeSlot ====================

/// A half-open time-of-day interval during which both partners are free.
///
/// An end of 23:59 marks a slot that runs through midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TimeSlot {
    start_hour: u32,
    start_minute: u32,
    end_hour: u32,
    end_minute: u32,
}

impl TimeSlot {
    /// Build a slot without validation. Intended for literal tables.
    pub const fn new(start_hour: u32, start_minute: u32, end_hour: u32, end_minute: u32) -> Self {
        Self {
            start_hour,
            start_minute,
            end_hour,
            end_minute,
        }
    }

    /// Build a slot, rejecting out-of-range fields and inverted intervals.
    pub fn try_new(
        start_hour: u32,
        start_minute: u32,
        end_hour: u32,
        end_minute: u32,
    ) -> Result<Self, ScheduleError> {
        let invalid = |reason| ScheduleError::InvalidSlot {
            start_hour,
            start_minute,
            end_hour,
            end_minute,
            reason,
        };

        if start_hour > 23 || end_hour > 23 {
            return Err(invalid("hour must be within 0-23"));
        }
        if start_minute > 59 || end_minute > 59 {
            return Err(invalid("minute must be within 0-59"));
        }

        let slot = Self::new(start_hour, start_minute, end_hour, end_minute);
        if slot.start_minutes() > slot.end_minutes() {
            return Err(invalid("start is after end"));
        }
        Ok(slot)
    }

    pub fn start_hour(&self) -> u32 {
        self.start_hour
    }

    pub fn start_minute(&self) -> u32 {
        self.start_minute
    }

    pub fn end_hour(&self) -> u32 {
        self.end_hour
    }

    pub fn end_minute(&self) -> u32 {
        self.end_minute
    }

    /// Whether the end is the 23:59 marker meaning "through midnight".
    pub fn extends_to_end_of_day(&self) -> bool {
        self.end_hour == 23 && self.end_minute == 59
    }

    pub fn start_minutes(&self) -> u32 {
        minutes_since_midnight(self.start_hour, self.start_minute)
    }

    /// End as minutes since midnight; the end-of-day marker maps to 24:00.
    pub fn end_minutes(&self) -> u32 {
        if self.extends_to_end_of_day() {
            MINUTES_PER_DAY
        } else {
            minutes_since_midnight(self.end_hour, self.end_minute)
        }
    }

    /// Check a minutes-since-midnight value against `[start, end)`.
    pub fn contains_minute(&self, minutes: u32) -> bool {
        (self.start_minutes()..self.end_minutes()).contains(&minutes)
    }

    /// Check if the slot is active at the wall-clock time of `now`.
    pub fn is_active<T: Timelike>(&self, now: &T) -> bool {
        self.contains_minute(minutes_since_midnight(now.hour(), now.minute()))
    }

    /// Human readable range, e.g. `9:00 AM - 5:10 PM` or `12:00 AM - onwards`.
    pub fn time_string(&self) -> String {
        let start = format_12_hour(self.start_hour, self.start_minute);
        let end = if self.extends_to_end_of_day() {
            "onwards".to_string()
        } else {
            format_12_hour(self.end_hour, self.end_minute)
        };
        format!("{} - {}", start, end)
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.time_string())
    }
}

impl FromStr for TimeSlot {
    type Err = ScheduleError;

    /// Parse `HH:MM-HH:MM` (24-hour clock).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ScheduleError::InvalidTime(s.to_string());

        let (start, end) = s.split_once('-').ok_or_else(invalid)?;
        let start = NaiveTime::parse_from_str(start.trim(), "%H:%M").map_err(|_| invalid())?;
        let end = NaiveTime::parse_from_str(end.trim(), "%H:%M").map_err(|_| invalid())?;

        Self::try_new(start.hour(), start.minute(), end.hour(), end.minute())
    }
}

// ==================== DaySchedule / WeeklySchedule ====================

/// A named day and its chronological, non-overlapping slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DaySchedule {
    pub day_name: String,
    pub slots: Vec<TimeSlot>,
}

impl DaySchedule {
    pub fn new(day_name: impl Into<String>, slots: Vec<TimeSlot>) -> Self {
        Self {
            day_name: day_name.into(),
            slots,
        }
    }
}

/// Read-only mapping from day number (Sunday=1 .. Saturday=7) to that day's slots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WeeklySchedule {
    days: BTreeMap<u8, DaySchedule>,
}

impl WeeklySchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a day to the table, replacing any previous entry for that number.
    pub fn with_day(mut self, day_number: u8, day: DaySchedule) -> Self {
        self.days.insert(day_number, day);
        self
    }

    pub fn day(&self, day_number: u8) -> Option<&DaySchedule> {
        self.days.get(&day_number)
    }

    /// Days in key order (Sunday first).
    pub fn iter(&self) -> impl Iterator<Item = (u8, &DaySchedule)> {
        self.days.iter().map(|(number, day)| (*number, day))
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// The couple's reference week.
    pub fn couple_default() -> Self {
        let onwards = |hour, minute| TimeSlot::new(hour, minute, 23, 59);

        Self::new()
            .with_day(
                2,
                DaySchedule::new(
                    "Monday",
                    vec![
                        TimeSlot::new(8, 0, 10, 30),
                        TimeSlot::new(12, 10, 13, 50),
                        TimeSlot::new(14, 40, 15, 30),
                        onwards(17, 10),
                    ],
                ),
            )
            .with_day(3, DaySchedule::new("Tuesday", vec![TimeSlot::new(13, 0, 13, 50)]))
            .with_day(
                4,
                DaySchedule::new(
                    "Wednesday",
                    vec![
                        TimeSlot::new(8, 0, 8, 50),
                        TimeSlot::new(13, 0, 13, 50),
                        onwards(16, 20),
                    ],
                ),
            )
            .with_day(
                5,
                DaySchedule::new(
                    "Thursday",
                    vec![
                        TimeSlot::new(8, 0, 8, 50),
                        TimeSlot::new(13, 0, 13, 50),
                        onwards(17, 10),
                    ],
                ),
            )
            .with_day(
                6,
                DaySchedule::new(
                    "Friday",
                    vec![TimeSlot::new(13, 0, 13, 50), onwards(17, 10)],
                ),
            )
            .with_day(7, DaySchedule::new("Saturday", vec![onwards(0, 0)]))
            .with_day(1, DaySchedule::new("Sunday", vec![onwards(0, 0)]))
    }

    /// Build a table from `(day name, ["HH:MM-HH:MM", ..])` pairs.
    ///
    /// Day names accept anything `chrono::Weekday` parses ("Monday", "mon").
    /// Slots are sorted by start time.
    pub fn from_day_entries<'a, I>(entries: I) -> Result<Self, ScheduleError>
    where
        I: IntoIterator<Item = (&'a str, &'a [String])>,
    {
        let mut schedule = Self::new();

        for (name, ranges) in entries {
            let weekday: Weekday = name
                .trim()
                .parse()
                .map_err(|_| ScheduleError::UnknownDay(name.to_string()))?;
            let number = weekday_number(weekday);
            let canonical = day_name(number).unwrap_or(name);

            if schedule.days.contains_key(&number) {
                return Err(ScheduleError::DuplicateDay(canonical.to_string()));
            }

            let mut slots = ranges
                .iter()
                .map(|range| range.parse::<TimeSlot>())
                .collect::<Result<Vec<_>, _>>()?;
            slots.sort_by_key(TimeSlot::start_minutes);

            schedule
                .days
                .insert(number, DaySchedule::new(canonical, slots));
        }

        Ok(schedule)
    }
}

// ==================== FreeTimeStatus ====================

/// The couple's free-time status at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FreeTimeStatus {
    NoSchedule,
    DayOver,
    CurrentlyFree {
        slot: TimeSlot,
        day_name: String,
    },
    NextSlotToday {
        slot: TimeSlot,
        day_name: String,
    },
    NextSlotOtherDay {
        slot: TimeSlot,
        day_name: String,
        days_ahead: u32,
    },
}

impl FreeTimeStatus {
    /// The slot the status refers to, if any.
    pub fn slot(&self) -> Option<&TimeSlot> {
        match self {
            Self::CurrentlyFree { slot, .. }
            | Self::NextSlotToday { slot, .. }
            | Self::NextSlotOtherDay { slot, .. } => Some(slot),
            Self::NoSchedule | Self::DayOver => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::NoSchedule => "no schedule",
            Self::DayOver => "day over",
            Self::CurrentlyFree { .. } => "currently free",
            Self::NextSlotToday { .. } => "next slot today",
            Self::NextSlotOtherDay { .. } => "next slot other day",
        }
    }
}

/// How the 17:10 "day over" boundary is compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayOverRule {
    /// `hour >= 17 && minute >= 10`. Times such as 17:05 or 18:00 do not count.
    #[default]
    Literal,
    /// Any time at or after 17:10.
    Cutoff,
}

impl DayOverRule {
    pub fn is_day_over(self, hour: u32, minute: u32) -> bool {
        match self {
            Self::Literal => hour >= DAY_OVER_HOUR && minute >= DAY_OVER_MINUTE,
            Self::Cutoff => {
                minutes_since_midnight(hour, minute)
                    >= minutes_since_midnight(DAY_OVER_HOUR, DAY_OVER_MINUTE)
            }
        }
    }
}

// ==================== ScheduleEngine ====================

/// Answers "what is our free-time status right now?" from a fixed weekly table.
///
/// Holds no mutable state; share it behind an `Arc` to query from several
/// threads.
#[derive(Debug, Clone)]
pub struct ScheduleEngine {
    schedule: WeeklySchedule,
    day_over_rule: DayOverRule,
}

impl ScheduleEngine {
    pub fn new(schedule: WeeklySchedule, day_over_rule: DayOverRule) -> Self {
        Self {
            schedule,
            day_over_rule,
        }
    }

    pub fn schedule(&self) -> &WeeklySchedule {
        &self.schedule
    }

    pub fn day_over_rule(&self) -> DayOverRule {
        self.day_over_rule
    }

    /// Slots for the weekday of `now`.
    pub fn today_schedule<T: Datelike>(&self, now: &T) -> Option<&DaySchedule> {
        self.schedule.day(weekday_number(now.weekday()))
    }

    /// Compute the status for the local wall-clock time `now`.
    pub fn current_status<T: Datelike + Timelike>(&self, now: &T) -> FreeTimeStatus {
        self.status_for_day(weekday_number(now.weekday()), now)
    }

    /// Compute the status for an explicit day number and time of day.
    ///
    /// Day numbers without a table entry (including anything outside 1..=7)
    /// yield [`FreeTimeStatus::NoSchedule`].
    pub fn status_for_day<T: Timelike>(&self, day_number: u8, now: &T) -> FreeTimeStatus {
        let Some(today) = self.schedule.day(day_number) else {
            return FreeTimeStatus::NoSchedule;
        };

        let (hour, minute) = (now.hour(), now.minute());

        if let Some(slot) = today.slots.iter().find(|slot| slot.is_active(now)) {
            if self.day_over_rule.is_day_over(hour, minute) {
                return FreeTimeStatus::DayOver;
            }
            return FreeTimeStatus::CurrentlyFree {
                slot: *slot,
                day_name: today.day_name.clone(),
            };
        }

        let now_minutes = minutes_since_midnight(hour, minute);
        if let Some(slot) = today
            .slots
            .iter()
            .find(|slot| slot.start_minutes() > now_minutes)
        {
            return FreeTimeStatus::NextSlotToday {
                slot: *slot,
                day_name: today.day_name.clone(),
            };
        }

        let mut next_day = next_day_number(day_number);
        for days_ahead in 1..=7 {
            if let Some(day) = self.schedule.day(next_day) {
                if let Some(first) = day.slots.first() {
                    return FreeTimeStatus::NextSlotOtherDay {
                        slot: *first,
                        day_name: day.day_name.clone(),
                        days_ahead,
                    };
                }
            }
            next_day = next_day_number(next_day);
        }

        FreeTimeStatus::NoSchedule
    }
}

impl Default for ScheduleEngine {
    fn default() -> Self {
        Self::new(WeeklySchedule::couple_default(), DayOverRule::default())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};

    use super::*;

    fn at(year: i32, month: u32, day: u32, hour: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .unwrap()
            .and_hms_opt(hour, min, 0)
            .unwrap()
    }

    // 2024-02-12 is a Monday.
    fn monday(hour: u32, min: u32) -> NaiveDateTime {
        at(2024, 2, 12, hour, min)
    }

    fn tuesday(hour: u32, min: u32) -> NaiveDateTime {
        at(2024, 2, 13, hour, min)
    }

    fn wednesday(hour: u32, min: u32) -> NaiveDateTime {
        at(2024, 2, 14, hour, min)
    }

    fn saturday(hour: u32, min: u32) -> NaiveDateTime {
        at(2024, 2, 17, hour, min)
    }

    fn time(hour: u32, min: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, min, 0).unwrap()
    }

    // ==================== Formatting ====================

    #[test]
    fn test_time_string_regular_slot() {
        assert_eq!(TimeSlot::new(9, 0, 17, 10).time_string(), "9:00 AM - 5:10 PM");
    }

    #[test]
    fn test_time_string_all_day_slot() {
        assert_eq!(
            TimeSlot::new(0, 0, 23, 59).time_string(),
            "12:00 AM - onwards"
        );
    }

    #[test]
    fn test_format_12_hour_noon_and_midnight() {
        assert_eq!(format_12_hour(0, 5), "12:05 AM");
        assert_eq!(format_12_hour(12, 0), "12:00 PM");
        assert_eq!(format_12_hour(13, 50), "1:50 PM");
        assert_eq!(format_12_hour(11, 59), "11:59 AM");
    }

    #[test]
    fn test_display_matches_time_string() {
        let slot = TimeSlot::new(12, 10, 13, 50);
        assert_eq!(slot.to_string(), "12:10 PM - 1:50 PM");
    }

    // ==================== Weekday numbering ====================

    #[test]
    fn test_weekday_number_starts_on_sunday() {
        assert_eq!(weekday_number(Weekday::Sun), 1);
        assert_eq!(weekday_number(Weekday::Mon), 2);
        assert_eq!(weekday_number(Weekday::Sat), 7);
    }

    #[test]
    fn test_day_name_lookup() {
        assert_eq!(day_name(1), Some("Sunday"));
        assert_eq!(day_name(7), Some("Saturday"));
        assert_eq!(day_name(0), None);
        assert_eq!(day_name(8), None);
    }

    #[test]
    fn test_next_day_wraps_saturday() {
        assert_eq!(next_day_number(7), 1);
        assert_eq!(next_day_number(1), 2);
    }

    // ==================== TimeSlot ====================

    #[test]
    fn test_is_active_half_open() {
        let slot = TimeSlot::new(8, 0, 10, 30);
        assert!(slot.is_active(&time(8, 0)));
        assert!(slot.is_active(&time(10, 29)));
        assert!(!slot.is_active(&time(10, 30)));
        assert!(!slot.is_active(&time(7, 59)));
    }

    #[test]
    fn test_onwards_slot_includes_last_minute() {
        let slot = TimeSlot::new(17, 10, 23, 59);
        assert!(slot.is_active(&time(23, 59)));
        assert_eq!(slot.end_minutes(), MINUTES_PER_DAY);
    }

    #[test]
    fn test_try_new_rejects_out_of_range() {
        assert!(TimeSlot::try_new(24, 0, 23, 0).is_err());
        assert!(TimeSlot::try_new(8, 60, 9, 0).is_err());
        assert!(TimeSlot::try_new(10, 0, 9, 0).is_err());
        assert!(TimeSlot::try_new(9, 0, 9, 0).is_ok());
    }

    #[test]
    fn test_parse_slot() {
        let slot: TimeSlot = "08:00-10:30".parse().unwrap();
        assert_eq!(slot, TimeSlot::new(8, 0, 10, 30));

        let spaced: TimeSlot = " 17:10 - 23:59 ".parse().unwrap();
        assert!(spaced.extends_to_end_of_day());
    }

    #[test]
    fn test_parse_slot_rejects_garbage() {
        assert_eq!(
            "8am-9am".parse::<TimeSlot>(),
            Err(ScheduleError::InvalidTime("8am-9am".to_string()))
        );
        assert!("10:00".parse::<TimeSlot>().is_err());
        assert!(matches!(
            "11:00-10:00".parse::<TimeSlot>(),
            Err(ScheduleError::InvalidSlot { .. })
        ));
    }

    // ==================== WeeklySchedule ====================

    #[test]
    fn test_couple_default_covers_whole_week() {
        let schedule = WeeklySchedule::couple_default();
        for number in 1..=7 {
            let day = schedule.day(number).unwrap();
            assert_eq!(Some(day.day_name.as_str()), day_name(number));
        }
        assert_eq!(schedule.day(2).unwrap().slots.len(), 4);
    }

    #[test]
    fn test_from_day_entries_sorts_and_canonicalizes() {
        let slots = vec!["13:00-13:50".to_string(), "08:00-08:50".to_string()];
        let schedule = WeeklySchedule::from_day_entries([("mon", slots.as_slice())]).unwrap();

        let day = schedule.day(2).unwrap();
        assert_eq!(day.day_name, "Monday");
        assert_eq!(day.slots[0], TimeSlot::new(8, 0, 8, 50));
    }

    #[test]
    fn test_from_day_entries_rejects_duplicates_and_unknown_days() {
        let slots = vec!["08:00-09:00".to_string()];
        let duplicate = WeeklySchedule::from_day_entries([
            ("Monday", slots.as_slice()),
            ("Mon", slots.as_slice()),
        ]);
        assert_eq!(
            duplicate,
            Err(ScheduleError::DuplicateDay("Monday".to_string()))
        );

        let unknown = WeeklySchedule::from_day_entries([("Funday", slots.as_slice())]);
        assert_eq!(unknown, Err(ScheduleError::UnknownDay("Funday".to_string())));
    }

    // ==================== Engine: same day ====================

    #[test]
    fn test_monday_morning_currently_free() {
        let engine = ScheduleEngine::default();
        assert_eq!(
            engine.current_status(&monday(9, 0)),
            FreeTimeStatus::CurrentlyFree {
                slot: TimeSlot::new(8, 0, 10, 30),
                day_name: "Monday".to_string(),
            }
        );
    }

    #[test]
    fn test_monday_gap_next_slot_today() {
        let engine = ScheduleEngine::default();
        assert_eq!(
            engine.current_status(&monday(11, 0)),
            FreeTimeStatus::NextSlotToday {
                slot: TimeSlot::new(12, 10, 13, 50),
                day_name: "Monday".to_string(),
            }
        );
    }

    #[test]
    fn test_monday_late_evening_day_over() {
        let engine = ScheduleEngine::default();
        assert_eq!(engine.current_status(&monday(23, 30)), FreeTimeStatus::DayOver);
    }

    #[test]
    fn test_slot_end_boundary_moves_to_next_slot() {
        let engine = ScheduleEngine::default();
        assert!(matches!(
            engine.current_status(&monday(10, 30)),
            FreeTimeStatus::NextSlotToday { slot, .. } if slot == TimeSlot::new(12, 10, 13, 50)
        ));
    }

    // ==================== Engine: day over boundary ====================

    #[test]
    fn test_literal_boundary_while_active() {
        // Wednesday 16:20 onwards is active through the evening.
        let engine = ScheduleEngine::default();
        let free = |status: FreeTimeStatus| matches!(status, FreeTimeStatus::CurrentlyFree { .. });

        assert!(free(engine.current_status(&wednesday(17, 0))));
        assert!(free(engine.current_status(&wednesday(17, 9))));
        assert_eq!(engine.current_status(&wednesday(17, 10)), FreeTimeStatus::DayOver);
        assert!(free(engine.current_status(&wednesday(18, 0))));
        assert!(free(engine.current_status(&wednesday(18, 5))));
        assert_eq!(engine.current_status(&wednesday(18, 10)), FreeTimeStatus::DayOver);
    }

    #[test]
    fn test_cutoff_boundary_while_active() {
        let engine = ScheduleEngine::new(WeeklySchedule::couple_default(), DayOverRule::Cutoff);

        assert!(matches!(
            engine.current_status(&wednesday(17, 9)),
            FreeTimeStatus::CurrentlyFree { .. }
        ));
        assert_eq!(engine.current_status(&wednesday(17, 10)), FreeTimeStatus::DayOver);
        assert_eq!(engine.current_status(&wednesday(18, 0)), FreeTimeStatus::DayOver);
    }

    #[test]
    fn test_day_over_requires_active_slot() {
        // Tuesday 17:30 is past the boundary but outside any slot.
        let engine = ScheduleEngine::default();
        assert!(matches!(
            engine.current_status(&tuesday(17, 30)),
            FreeTimeStatus::NextSlotOtherDay { .. }
        ));
    }

    #[test]
    fn test_weekend_all_day_slot() {
        let engine = ScheduleEngine::default();
        assert_eq!(
            engine.current_status(&saturday(0, 0)),
            FreeTimeStatus::CurrentlyFree {
                slot: TimeSlot::new(0, 0, 23, 59),
                day_name: "Saturday".to_string(),
            }
        );
        assert_eq!(engine.current_status(&saturday(21, 45)), FreeTimeStatus::DayOver);
    }

    // ==================== Engine: other days ====================

    #[test]
    fn test_tuesday_afternoon_next_is_wednesday() {
        let engine = ScheduleEngine::default();
        assert_eq!(
            engine.current_status(&tuesday(14, 0)),
            FreeTimeStatus::NextSlotOtherDay {
                slot: TimeSlot::new(8, 0, 8, 50),
                day_name: "Wednesday".to_string(),
                days_ahead: 1,
            }
        );
    }

    #[test]
    fn test_walk_skips_missing_and_empty_days() {
        let schedule = WeeklySchedule::new()
            .with_day(2, DaySchedule::new("Monday", vec![TimeSlot::new(8, 0, 9, 0)]))
            .with_day(3, DaySchedule::new("Tuesday", Vec::new()))
            .with_day(5, DaySchedule::new("Thursday", vec![TimeSlot::new(10, 0, 11, 0)]));
        let engine = ScheduleEngine::new(schedule, DayOverRule::Literal);

        assert_eq!(
            engine.current_status(&monday(12, 0)),
            FreeTimeStatus::NextSlotOtherDay {
                slot: TimeSlot::new(10, 0, 11, 0),
                day_name: "Thursday".to_string(),
                days_ahead: 3,
            }
        );
    }

    #[test]
    fn test_walk_wraps_back_to_same_weekday() {
        let schedule = WeeklySchedule::new()
            .with_day(2, DaySchedule::new("Monday", vec![TimeSlot::new(8, 0, 9, 0)]));
        let engine = ScheduleEngine::new(schedule, DayOverRule::Literal);

        assert_eq!(
            engine.current_status(&monday(9, 30)),
            FreeTimeStatus::NextSlotOtherDay {
                slot: TimeSlot::new(8, 0, 9, 0),
                day_name: "Monday".to_string(),
                days_ahead: 7,
            }
        );
    }

    #[test]
    fn test_saturday_wraps_to_sunday() {
        let schedule = WeeklySchedule::new()
            .with_day(7, DaySchedule::new("Saturday", vec![TimeSlot::new(8, 0, 9, 0)]))
            .with_day(1, DaySchedule::new("Sunday", vec![TimeSlot::new(10, 0, 12, 0)]));
        let engine = ScheduleEngine::new(schedule, DayOverRule::Literal);

        assert!(matches!(
            engine.current_status(&saturday(10, 0)),
            FreeTimeStatus::NextSlotOtherDay { ref day_name, days_ahead: 1, .. } if day_name == "Sunday"
        ));
    }

    // ==================== Engine: no schedule ====================

    #[test]
    fn test_missing_day_is_no_schedule() {
        let schedule = WeeklySchedule::new()
            .with_day(3, DaySchedule::new("Tuesday", vec![TimeSlot::new(8, 0, 9, 0)]));
        let engine = ScheduleEngine::new(schedule, DayOverRule::Literal);

        assert_eq!(engine.current_status(&monday(8, 30)), FreeTimeStatus::NoSchedule);
    }

    #[test]
    fn test_out_of_range_day_number_is_no_schedule() {
        let engine = ScheduleEngine::default();
        assert_eq!(engine.status_for_day(0, &time(9, 0)), FreeTimeStatus::NoSchedule);
        assert_eq!(engine.status_for_day(8, &time(9, 0)), FreeTimeStatus::NoSchedule);
    }

    #[test]
    fn test_exhausted_walk_is_no_schedule() {
        let schedule = WeeklySchedule::new().with_day(2, DaySchedule::new("Monday", Vec::new()));
        let engine = ScheduleEngine::new(schedule, DayOverRule::Literal);

        assert_eq!(engine.current_status(&monday(9, 0)), FreeTimeStatus::NoSchedule);
    }

    #[test]
    fn test_today_schedule() {
        let engine = ScheduleEngine::default();
        let today = engine.today_schedule(&tuesday(9, 0)).unwrap();
        assert_eq!(today.day_name, "Tuesday");
        assert_eq!(today.slots, vec![TimeSlot::new(13, 0, 13, 50)]);
    }

    #[test]
    fn test_status_is_idempotent() {
        let engine = ScheduleEngine::default();
        let now = monday(12, 30);
        assert_eq!(engine.current_status(&now), engine.current_status(&now));
    }

    #[test]
    fn test_status_serializes_with_tag() {
        let status = FreeTimeStatus::NextSlotOtherDay {
            slot: TimeSlot::new(8, 0, 8, 50),
            day_name: "Wednesday".to_string(),
            days_ahead: 1,
        };
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["status"], "next_slot_other_day");
        assert_eq!(json["days_ahead"], 1);
        assert_eq!(json["slot"]["start_hour"], 8);
    }

    // ==================== Property-Based Tests ====================

    #[cfg(test)]
    mod proptest_tests {
        use proptest::prelude::*;

        use super::*;

        proptest! {
            #[test]
            fn onwards_slot_active_from_start_to_midnight(
                start in 0u32..MINUTES_PER_DAY,
                offset in 0u32..MINUTES_PER_DAY,
            ) {
                let slot = TimeSlot::new(start / 60, start % 60, 23, 59);
                let now = start + offset;
                if now < MINUTES_PER_DAY {
                    prop_assert!(slot.is_active(&time(now / 60, now % 60)));
                }
            }

            #[test]
            fn slot_is_closed_at_start_and_open_at_end(
                start in 0u32..(MINUTES_PER_DAY - 2),
                len in 1u32..600,
            ) {
                let end = (start + len).min(MINUTES_PER_DAY - 2);
                prop_assume!(end > start);
                let slot = TimeSlot::new(start / 60, start % 60, end / 60, end % 60);
                prop_assert!(slot.is_active(&time(start / 60, start % 60)));
                prop_assert!(!slot.is_active(&time(end / 60, end % 60)));
            }

            #[test]
            fn status_is_pure(hour in 0u32..24, minute in 0u32..60, day in 0u32..7) {
                let engine = ScheduleEngine::default();
                let now = at(2024, 2, 11 + day, hour, minute);
                prop_assert_eq!(engine.current_status(&now), engine.current_status(&now));
            }

            #[test]
            fn twelve_hour_format_has_two_digit_minutes(hour in 0u32..24, minute in 0u32..60) {
                let formatted = format_12_hour(hour, minute);
                let (clock, period) = formatted.split_once(' ').unwrap();
                let (h, m) = clock.split_once(':').unwrap();
                prop_assert_eq!(m.len(), 2);
                let h: u32 = h.parse().unwrap();
                prop_assert!((1..=12).contains(&h));
                prop_assert_eq!(period, if hour < 12 { "AM" } else { "PM" });
            }
        }
    }
}
