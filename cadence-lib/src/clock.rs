//! Virtual clock mapping recorded log time onto wall-clock deadlines.

use std::time::{Duration, Instant};

use crate::source::LogTime;

/// Slowest playback speed accepted; anything lower (or non-finite) is clamped.
pub const MIN_PLAYBACK_SPEED: f32 = 0.01;

/// Delay reported by [`VirtualClock::wakeup_for`] if the speed is somehow not
/// positive.
const FALLBACK_WAKEUP: Duration = Duration::from_secs(1);

/// Clamp a requested playback speed into the supported range.
pub fn clamp_speed(speed: f32) -> f32 {
    if speed.is_finite() && speed >= MIN_PLAYBACK_SPEED {
        speed
    } else {
        MIN_PLAYBACK_SPEED
    }
}

/// Tracks the relationship between log time and the monotonic wall clock.
///
/// While running, `current = log_anchor + (now - wall_anchor) * speed`. While
/// paused the clock reads `log_anchor`. Each mutation first commits the time
/// elapsed under the previous configuration into `log_anchor`, so pause,
/// resume, and speed changes compose without keeping a history.
///
/// Every operation has an `*_at` form taking an explicit `now`; the plain form
/// reads [`Instant::now`].
#[derive(Debug, Clone)]
pub struct VirtualClock {
    wall_anchor: Instant,
    log_anchor: LogTime,
    speed: f32,
    paused: bool,
}

impl VirtualClock {
    /// Create a running clock reading `offset` now.
    pub fn new(offset: LogTime, speed: f32) -> Self {
        Self::new_at(offset, speed, Instant::now())
    }

    pub fn new_at(offset: LogTime, speed: f32, now: Instant) -> Self {
        Self {
            wall_anchor: now,
            log_anchor: offset,
            speed: clamp_speed(speed),
            paused: false,
        }
    }

    /// Create a clock frozen at `offset` until [`resume`](Self::resume).
    pub fn paused(offset: LogTime, speed: f32) -> Self {
        let mut clock = Self::new(offset, speed);
        clock.paused = true;
        clock
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn current_log_time(&self) -> LogTime {
        self.current_log_time_at(Instant::now())
    }

    pub fn current_log_time_at(&self, now: Instant) -> LogTime {
        if self.paused {
            self.log_anchor
        } else {
            self.log_anchor.saturating_add(self.scaled_elapsed(now))
        }
    }

    /// Wall-clock instant at which `target` becomes due.
    pub fn wakeup_for(&self, target: LogTime) -> Instant {
        self.wakeup_for_at(target, Instant::now())
    }

    pub fn wakeup_for_at(&self, target: LogTime, now: Instant) -> Instant {
        let current = self.current_log_time_at(now);
        if target <= current {
            return now;
        }
        let log_diff = (target - current) as f64;
        let delay = if self.speed > 0.0 {
            Duration::from_nanos((log_diff / f64::from(self.speed)).round() as u64)
        } else {
            FALLBACK_WAKEUP
        };
        now + delay
    }

    pub fn pause(&mut self) {
        self.pause_at(Instant::now());
    }

    pub fn pause_at(&mut self, now: Instant) {
        if self.paused {
            return;
        }
        self.fold_elapsed(now);
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.resume_at(Instant::now());
    }

    pub fn resume_at(&mut self, now: Instant) {
        if self.paused {
            self.wall_anchor = now;
            self.paused = false;
        }
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.set_speed_at(speed, Instant::now());
    }

    pub fn set_speed_at(&mut self, speed: f32, now: Instant) {
        if !self.paused {
            self.fold_elapsed(now);
        }
        self.speed = clamp_speed(speed);
    }

    /// Commit log time elapsed at the current speed and re-anchor at `now`.
    fn fold_elapsed(&mut self, now: Instant) {
        self.log_anchor = self.log_anchor.saturating_add(self.scaled_elapsed(now));
        self.wall_anchor = now;
    }

    fn scaled_elapsed(&self, now: Instant) -> u64 {
        let wall_ns = now.saturating_duration_since(self.wall_anchor).as_nanos() as f64;
        (wall_ns * f64::from(self.speed)) as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: u64 = 1_000_000;

    fn at(base: Instant, ms: u64) -> Instant {
        base + Duration::from_millis(ms)
    }

    #[test]
    fn clamps_invalid_speeds() {
        assert_eq!(clamp_speed(f32::NAN), MIN_PLAYBACK_SPEED);
        assert_eq!(clamp_speed(f32::INFINITY), MIN_PLAYBACK_SPEED);
        assert_eq!(clamp_speed(-2.0), MIN_PLAYBACK_SPEED);
        assert_eq!(clamp_speed(0.0), MIN_PLAYBACK_SPEED);
        assert_eq!(clamp_speed(0.001), MIN_PLAYBACK_SPEED);
        assert_eq!(clamp_speed(2.5), 2.5);
    }

    #[test]
    fn advances_at_speed() {
        let t0 = Instant::now();
        let clock = VirtualClock::new_at(5_000 * MS, 2.0, t0);
        assert_eq!(clock.current_log_time_at(t0), 5_000 * MS);
        assert_eq!(clock.current_log_time_at(at(t0, 250)), 5_500 * MS);
    }

    #[test]
    fn pause_freezes_time() {
        let t0 = Instant::now();
        let mut clock = VirtualClock::new_at(0, 1.0, t0);
        clock.pause_at(at(t0, 100));
        assert_eq!(clock.current_log_time_at(at(t0, 100)), 100 * MS);
        assert_eq!(clock.current_log_time_at(at(t0, 900)), 100 * MS);
    }

    #[test]
    fn pause_and_resume_are_idempotent() {
        let t0 = Instant::now();
        let mut clock = VirtualClock::new_at(0, 1.0, t0);
        clock.pause_at(at(t0, 100));
        clock.pause_at(at(t0, 300));
        assert_eq!(clock.current_log_time_at(at(t0, 400)), 100 * MS);

        clock.resume_at(at(t0, 400));
        clock.resume_at(at(t0, 450));
        assert_eq!(clock.current_log_time_at(at(t0, 500)), 200 * MS);
    }

    #[test]
    fn speed_change_is_continuous() {
        let t0 = Instant::now();
        let mut clock = VirtualClock::new_at(0, 1.0, t0);
        let change = at(t0, 500);
        let before = clock.current_log_time_at(change);
        clock.set_speed_at(2.0, change);
        assert_eq!(clock.current_log_time_at(change), before);
        assert_eq!(clock.current_log_time_at(at(t0, 750)), 1_000 * MS);
    }

    #[test]
    fn speed_change_while_paused_applies_on_resume() {
        let t0 = Instant::now();
        let mut clock = VirtualClock::new_at(0, 1.0, t0);
        clock.pause_at(at(t0, 100));
        clock.set_speed_at(4.0, at(t0, 200));
        assert_eq!(clock.current_log_time_at(at(t0, 300)), 100 * MS);
        clock.resume_at(at(t0, 300));
        assert_eq!(clock.current_log_time_at(at(t0, 400)), 500 * MS);
    }

    #[test]
    fn wakeup_is_now_for_due_targets() {
        let t0 = Instant::now();
        let clock = VirtualClock::new_at(1_000 * MS, 1.0, t0);
        assert_eq!(clock.wakeup_for_at(0, t0), t0);
        assert_eq!(clock.wakeup_for_at(1_000 * MS, t0), t0);
    }

    #[test]
    fn wakeup_scales_with_speed() {
        let t0 = Instant::now();
        let clock = VirtualClock::new_at(0, 4.0, t0);
        let wakeup = clock.wakeup_for_at(2_000 * MS, t0);
        let delay = wakeup.duration_since(t0);
        assert!((delay.as_secs_f64() - 0.5).abs() < 1e-6, "delay was {delay:?}");
    }

    #[test]
    fn tracks_real_time() {
        let clock = VirtualClock::new(0, 2.0);
        std::thread::sleep(Duration::from_millis(50));
        let now = clock.current_log_time();
        assert!(now >= 100 * MS, "clock read {now}");
        assert!(now < 1_000 * MS, "clock read {now}");
    }

    #[test]
    fn paused_clock_ignores_real_time() {
        let clock = VirtualClock::paused(42, 1.0);
        let first = clock.current_log_time();
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(clock.current_log_time(), first);
        assert_eq!(first, 42);
    }
}
