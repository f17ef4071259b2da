//! Stdin control input.
//!
//! A line is either a full JSON [`PlaybackControlRequest`] or one of the
//! shorthand commands `play`, `pause`, `seek <seconds>`, `speed <factor>`,
//! `status` and `quit`. Shorthand requests keep the current speed and
//! play/pause state unless they change it.

use cadence_lib::playback::{PlaybackPosition, PlaybackStatus};
use cadence_lib::protocol::{PlaybackCommand, PlaybackControlRequest};
use cadence_lib::source::LogTime;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ControlParseError {
    #[error("invalid control request: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown command `{0}`")]
    UnknownCommand(String),
    #[error("`{0}` needs a numeric argument")]
    MissingArgument(&'static str),
    #[error("invalid number `{0}`")]
    InvalidNumber(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ControlInput {
    Request(PlaybackControlRequest),
    Status,
    Quit,
}

/// Turns stdin lines into control inputs, numbering shorthand requests.
#[derive(Debug, Default)]
pub struct ControlParser {
    issued: u64,
}

impl ControlParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse one line. Blank lines yield `None`.
    ///
    /// `position` supplies the current speed and status for shorthand
    /// commands; `start` anchors `seek` offsets.
    pub fn parse(
        &mut self,
        line: &str,
        position: PlaybackPosition,
        start: LogTime,
    ) -> Result<Option<ControlInput>, ControlParseError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        if line.starts_with('{') {
            let request = serde_json::from_str(line)?;
            return Ok(Some(ControlInput::Request(request)));
        }

        let mut words = line.split_whitespace();
        let keyword = words.next().unwrap_or_default().to_lowercase();
        let current = current_command(position.status);
        let input = match keyword.as_str() {
            "play" => ControlInput::Request(self.request(PlaybackCommand::Play, position.speed)),
            "pause" => ControlInput::Request(self.request(PlaybackCommand::Pause, position.speed)),
            "seek" => {
                let seconds = parse_number::<f64>(words.next(), "seek")?;
                let request = self.request(current, position.speed);
                ControlInput::Request(request.with_seek(seconds_to_log_time(start, seconds)))
            }
            "speed" => {
                let speed = parse_number::<f32>(words.next(), "speed")?;
                ControlInput::Request(self.request(current, speed))
            }
            "status" => ControlInput::Status,
            "quit" | "exit" => ControlInput::Quit,
            _ => return Err(ControlParseError::UnknownCommand(keyword)),
        };
        Ok(Some(input))
    }

    fn request(&mut self, command: PlaybackCommand, speed: f32) -> PlaybackControlRequest {
        self.issued += 1;
        PlaybackControlRequest::new(format!("cli-{}", self.issued), command, speed)
    }
}

/// Command that keeps the player in its current state.
fn current_command(status: PlaybackStatus) -> PlaybackCommand {
    match status {
        PlaybackStatus::Playing => PlaybackCommand::Play,
        PlaybackStatus::Paused | PlaybackStatus::Ended => PlaybackCommand::Pause,
    }
}

fn parse_number<T: std::str::FromStr>(
    word: Option<&str>,
    command: &'static str,
) -> Result<T, ControlParseError> {
    let word = word.ok_or(ControlParseError::MissingArgument(command))?;
    word.parse()
        .map_err(|_| ControlParseError::InvalidNumber(word.to_string()))
}

/// Log time `seconds` past `start`. Negative offsets map to `start`.
pub fn seconds_to_log_time(start: LogTime, seconds: f64) -> LogTime {
    let offset = if seconds.is_finite() {
        (seconds.max(0.0) * 1e9).round() as u64
    } else if seconds > 0.0 {
        u64::MAX
    } else {
        0
    };
    start.saturating_add(offset)
}
