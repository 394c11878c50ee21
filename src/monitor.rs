use std::sync::Arc;

use crate::schedule::{FreeTimeStatus, ScheduleEngine};
use crate::traits::Clock;

/// Result of one [`StatusMonitor::refresh`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusUpdate {
    pub status: FreeTimeStatus,
    /// True on the first evaluation and whenever the status differs from the
    /// previous one.
    pub changed: bool,
}

/// Re-evaluates the engine against a clock and tracks status transitions.
///
/// The engine has no timer of its own; whoever owns the monitor decides how
/// often to call [`refresh`](Self::refresh).
pub struct StatusMonitor {
    engine: Arc<ScheduleEngine>,
    clock: Arc<dyn Clock>,
    last_status: Option<FreeTimeStatus>,
}

impl StatusMonitor {
    pub fn new(engine: Arc<ScheduleEngine>, clock: Arc<dyn Clock>) -> Self {
        Self {
            engine,
            clock,
            last_status: None,
        }
    }

    pub fn engine(&self) -> &ScheduleEngine {
        &self.engine
    }

    /// Last evaluated status, if `refresh` has run.
    pub fn current(&self) -> Option<&FreeTimeStatus> {
        self.last_status.as_ref()
    }

    pub fn refresh(&mut self) -> StatusUpdate {
        let now = self.clock.now_local();
        let status = self.engine.current_status(&now);
        let changed = self.last_status.as_ref() != Some(&status);

        if changed {
            match &self.last_status {
                Some(previous) => tracing::info!(
                    "Free-time status changed at {}: {} -> {}",
                    now.format("%a %H:%M"),
                    previous.label(),
                    status.label()
                ),
                None => tracing::info!(
                    "Free-time status at {}: {}",
                    now.format("%a %H:%M"),
                    status.label()
                ),
            }
        } else {
            tracing::debug!("Status unchanged at {}: {}", now.format("%H:%M"), status.label());
        }

        self.last_status = Some(status.clone());
        StatusUpdate { status, changed }
    }
}
