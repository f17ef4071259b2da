//! Runtime configuration for the pacer.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::clock::clamp_speed;
use crate::error::SettingsError;

const DEFAULT_IDLE_INTERVAL_MS: f32 = 10.0;
const DEFAULT_MAX_SLEEP_MS: f32 = 1000.0;
const DEFAULT_NOTIFY_HZ: f64 = 60.0;
/// Longest the pacer may sleep in one go, so control changes and shutdown are
/// seen within a second.
const MAX_POLL_MS: f32 = 1000.0;

/// Pacer tuning knobs.
///
/// Every field is optional in JSON; missing fields take their defaults and
/// out-of-range values are sanitized on load.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PacerSettings {
    /// Sleep between ticks while playback is not running.
    pub idle_interval_ms: f32,
    /// Upper bound on a single wait, so control changes are seen promptly.
    pub max_sleep_ms: f32,
    /// Time broadcasts per second of log time.
    pub notify_hz: f64,
    /// Speed the player starts with.
    pub initial_speed: f32,
}

impl Default for PacerSettings {
    fn default() -> Self {
        Self {
            idle_interval_ms: DEFAULT_IDLE_INTERVAL_MS,
            max_sleep_ms: DEFAULT_MAX_SLEEP_MS,
            notify_hz: DEFAULT_NOTIFY_HZ,
            initial_speed: 1.0,
        }
    }
}

impl PacerSettings {
    /// Load settings from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(text)?;
        Ok(settings.sanitized())
    }

    /// Copy with every field clamped into its supported range.
    pub fn sanitized(mut self) -> Self {
        self.set_idle_interval_ms(self.idle_interval_ms);
        self.set_max_sleep_ms(self.max_sleep_ms);
        self.set_notify_hz(self.notify_hz);
        self.set_initial_speed(self.initial_speed);
        self
    }

    /// Configure the idle sleep, capped at one second.
    pub fn set_idle_interval_ms(&mut self, ms: f32) {
        self.idle_interval_ms = if ms.is_finite() {
            ms.clamp(0.0, MAX_POLL_MS)
        } else {
            DEFAULT_IDLE_INTERVAL_MS
        };
    }

    /// Configure the wait cap, kept between one millisecond and one second.
    pub fn set_max_sleep_ms(&mut self, ms: f32) {
        self.max_sleep_ms = if ms.is_finite() {
            ms.clamp(1.0, MAX_POLL_MS)
        } else {
            DEFAULT_MAX_SLEEP_MS
        };
    }

    pub fn set_notify_hz(&mut self, hz: f64) {
        self.notify_hz = if hz.is_finite() && hz > 0.0 {
            hz
        } else {
            DEFAULT_NOTIFY_HZ
        };
    }

    pub fn set_initial_speed(&mut self, speed: f32) {
        self.initial_speed = clamp_speed(speed);
    }

    pub fn idle_interval(&self) -> Duration {
        Duration::from_micros((self.idle_interval_ms * 1000.0).round() as u64)
    }

    pub fn max_sleep(&self) -> Duration {
        Duration::from_micros((self.max_sleep_ms * 1000.0).round() as u64)
    }

    /// Log-time spacing between time broadcasts.
    pub fn notify_interval(&self) -> Duration {
        Duration::from_nanos((1e9 / self.notify_hz) as u64)
    }
}
