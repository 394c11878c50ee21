//! Abstraction over wall-clock time so status queries can be tested
//! deterministically.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{Local, NaiveDateTime, TimeDelta};

/// Source of the current local wall-clock time.
pub trait Clock: Send + Sync {
    /// Current date and time in the local timezone, without offset.
    fn now_local(&self) -> NaiveDateTime;
}

/// System clock implementation using real time.
#[derive(Debug, Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_local(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Clock frozen at a controllable time. Also backs the CLI `--at` flag.
#[derive(Debug, Clone)]
pub struct MockClock {
    local_time: Arc<Mutex<NaiveDateTime>>,
}

impl MockClock {
    pub fn new(time: NaiveDateTime) -> Self {
        Self {
            local_time: Arc::new(Mutex::new(time)),
        }
    }

    /// Set the mock clock to a new time.
    pub fn set_time(&self, time: NaiveDateTime) {
        *self.lock() = time;
    }

    /// Advance the clock by a duration.
    pub fn advance(&self, duration: TimeDelta) {
        let mut time = self.lock();
        *time += duration;
    }

    fn lock(&self) -> MutexGuard<'_, NaiveDateTime> {
        self.local_time
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Clock for MockClock {
    fn now_local(&self) -> NaiveDateTime {
        *self.lock()
    }
}
