use std::time::Duration;

use crate::source::LogTime;

/// Rate-limits time broadcasts, measured in log time rather than wall time.
#[derive(Debug, Clone)]
pub struct NotifyThrottle {
    last_notified: Option<LogTime>,
    interval_ns: u64,
}

impl NotifyThrottle {
    pub fn new(interval: Duration) -> Self {
        Self {
            last_notified: None,
            interval_ns: interval.as_nanos().min(u128::from(u64::MAX)) as u64,
        }
    }

    /// Return `log_time` if a broadcast is due for it.
    pub fn notify(&mut self, log_time: LogTime) -> Option<LogTime> {
        let due = match self.last_notified {
            None => true,
            Some(last) => log_time.saturating_sub(last) >= self.interval_ns,
        };
        if due {
            self.last_notified = Some(log_time);
            Some(log_time)
        } else {
            None
        }
    }

    /// Forget the last broadcast so the next record notifies immediately.
    pub fn reset(&mut self) {
        self.last_notified = None;
    }
}
