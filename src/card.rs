//! Display text for the free-time card and today's agenda.

use std::fmt;

use chrono::{Datelike, NaiveDate, TimeDelta, Timelike};
use serde::Serialize;

use crate::schedule::{FreeTimeStatus, ScheduleEngine, TimeSlot};

pub const DEFAULT_DATE_FORMAT: &str = "%a, %b %-d";

/// Text content of the free-time card for one status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCard {
    pub title: String,
    pub subtitle: String,
    pub detail: Option<String>,
    /// Date badge: today, or the date of the next free day.
    pub indicator: Option<String>,
    pub leading_emoji: &'static str,
    pub trailing_emoji: &'static str,
}

impl StatusCard {
    /// Build the card for `status` as seen on `today`.
    ///
    /// `date_format` is a chrono strftime pattern.
    pub fn new(status: &FreeTimeStatus, today: NaiveDate, date_format: &str) -> Self {
        let format_date = |date: NaiveDate| date.format(date_format).to_string();

        match status {
            FreeTimeStatus::CurrentlyFree { slot, .. } => Self {
                title: "We're Both Free Now! 💖".to_string(),
                subtitle: slot.time_string(),
                detail: Some("Perfect time to spend together! 💖✨".to_string()),
                indicator: Some(format_date(today)),
                leading_emoji: "💕",
                trailing_emoji: "✨",
            },
            FreeTimeStatus::DayOver => Self {
                title: "College is Over!".to_string(),
                subtitle: "Time to be together before hostel! 🏠".to_string(),
                detail: Some("Enjoying our moments together! 💕".to_string()),
                indicator: Some(format_date(today)),
                leading_emoji: "🌅",
                trailing_emoji: "🏠",
            },
            FreeTimeStatus::NextSlotToday { slot, .. } => Self {
                title: "Next Free Time Today".to_string(),
                subtitle: slot.time_string(),
                detail: Some("Looking forward to our time together! 🥰".to_string()),
                indicator: Some(format_date(today)),
                leading_emoji: "⏰",
                trailing_emoji: "💫",
            },
            FreeTimeStatus::NextSlotOtherDay {
                slot, days_ahead, ..
            } => {
                let title = if *days_ahead == 1 {
                    "Next Free Tomorrow"
                } else {
                    "Next Free Time"
                };
                let future = today
                    .checked_add_signed(TimeDelta::days(i64::from(*days_ahead)))
                    .unwrap_or(today);

                Self {
                    title: title.to_string(),
                    subtitle: slot.time_string(),
                    detail: Some("Can't wait to see you, my love! 💝".to_string()),
                    indicator: Some(format_date(future)),
                    leading_emoji: "📅",
                    trailing_emoji: "🌟",
                }
            }
            FreeTimeStatus::NoSchedule => Self {
                title: "Schedule Loading...".to_string(),
                subtitle: "Checking your schedule...".to_string(),
                detail: None,
                indicator: None,
                leading_emoji: "💝",
                trailing_emoji: "💤",
            },
        }
    }
}

impl fmt::Display for StatusCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.leading_emoji, self.title)?;
        if let Some(indicator) = &self.indicator {
            write!(f, "  [{}]", indicator)?;
        }
        writeln!(f)?;
        writeln!(f, "   {} {}", self.subtitle, self.trailing_emoji)?;
        if let Some(detail) = &self.detail {
            writeln!(f, "   {}", detail)?;
        }
        Ok(())
    }
}

/// One row of today's agenda.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgendaEntry {
    pub slot: TimeSlot,
    pub is_current: bool,
}

/// Today's slots with the active one marked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TodayAgenda {
    pub day_name: Option<String>,
    pub entries: Vec<AgendaEntry>,
}

impl TodayAgenda {
    pub fn new<T: Datelike + Timelike>(engine: &ScheduleEngine, now: &T) -> Self {
        match engine.today_schedule(now) {
            Some(day) => Self {
                day_name: Some(day.day_name.clone()),
                entries: day
                    .slots
                    .iter()
                    .map(|slot| AgendaEntry {
                        slot: *slot,
                        is_current: slot.is_active(now),
                    })
                    .collect(),
            },
            None => Self {
                day_name: None,
                entries: Vec::new(),
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for TodayAgenda {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.day_name {
            Some(day) => writeln!(f, "Our free time together ({})", day)?,
            None => writeln!(f, "Our free time together")?,
        }

        if self.is_empty() {
            writeln!(f, "   No free time scheduled for today")?;
            return writeln!(f, "   But we'll find time anyway! 💖");
        }

        for entry in &self.entries {
            if entry.is_current {
                writeln!(f, " 🟢 {}  Free time together", entry.slot)?;
            } else {
                writeln!(f, " ⏰ {}", entry.slot)?;
            }
        }
        Ok(())
    }
}
