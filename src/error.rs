use thiserror::Error;

/// Errors raised while building a weekly schedule from untrusted input.
///
/// Status queries never fail; these only surface when slots or days come
/// from configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("invalid time slot {start_hour:02}:{start_minute:02}-{end_hour:02}:{end_minute:02}: {reason}")]
    InvalidSlot {
        start_hour: u32,
        start_minute: u32,
        end_hour: u32,
        end_minute: u32,
        reason: &'static str,
    },
    #[error("invalid time range '{0}', expected HH:MM-HH:MM")]
    InvalidTime(String),
    #[error("unknown day '{0}'")]
    UnknownDay(String),
    #[error("day '{0}' is configured more than once")]
    DuplicateDay(String),
}
