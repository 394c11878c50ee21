//! Together Time Library
//!
//! Free-time scheduling for a couple: given a fixed weekly table of shared
//! availability windows and the current local time, work out whether both
//! partners are free now, when the next window opens, or whether the day's
//! shared time is over.

pub mod card;
pub mod config;
pub mod error;
pub mod monitor;
pub mod schedule;
pub mod traits;

// Re-export commonly used types
pub use card::{AgendaEntry, StatusCard, TodayAgenda};
pub use crate::config::AppConfig;
pub use error::ScheduleError;
pub use monitor::{StatusMonitor, StatusUpdate};
pub use schedule::{
    DayOverRule, DaySchedule, FreeTimeStatus, ScheduleEngine, TimeSlot, WeeklySchedule,
    day_name, format_12_hour, weekday_number,
};
pub use traits::{Clock, MockClock, SystemClock};
