//! Translates client control requests into player transitions.

use std::sync::{Arc, Mutex};

use log::{debug, warn};

use crate::protocol::{PlaybackCommand, PlaybackControlRequest, PlaybackState};

use super::{runtime::lock, PlaybackSource};

/// Callback a transport invokes for each inbound control request.
///
/// Called from the transport's own threads, possibly concurrently with the
/// pacer and with other requests.
pub trait ControlListener: Send + Sync {
    fn on_playback_control_request(&self, request: PlaybackControlRequest)
        -> Option<PlaybackState>;
}

/// Applies control requests to a shared [`PlaybackSource`].
pub struct ControlHandler<P: PlaybackSource> {
    player: Arc<Mutex<P>>,
}

impl<P: PlaybackSource> Clone for ControlHandler<P> {
    fn clone(&self) -> Self {
        Self {
            player: self.player.clone(),
        }
    }
}

impl<P: PlaybackSource> ControlHandler<P> {
    pub fn new(player: Arc<Mutex<P>>) -> Self {
        Self { player }
    }

    /// Apply `request` and return the resulting state.
    ///
    /// The seek is applied before speed and command so that a client looping
    /// back to the start (seek followed by play) resumes from the new position.
    /// Handling never fails: a failed seek is logged and reported through
    /// `did_seek = false`.
    pub fn handle(&self, request: &PlaybackControlRequest) -> PlaybackState {
        let mut player = lock(&self.player);

        let did_seek = match request.seek_time {
            Some(seek_time) => match player.seek(seek_time) {
                Ok(()) => true,
                Err(err) => {
                    warn!("failed to seek to {}: {}", seek_time, err);
                    false
                }
            },
            None => false,
        };

        player.set_speed(request.speed);

        match request.command {
            PlaybackCommand::Play => player.play(),
            PlaybackCommand::Pause => player.pause(),
            PlaybackCommand::Unrecognized => {
                debug!("ignoring unrecognized command in request {}", request.request_id)
            }
        }

        PlaybackState::reply(request, player.position(), did_seek)
    }
}

impl<P: PlaybackSource> ControlListener for ControlHandler<P> {
    fn on_playback_control_request(
        &self,
        request: PlaybackControlRequest,
    ) -> Option<PlaybackState> {
        Some(self.handle(&request))
    }
}
