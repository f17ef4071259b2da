//! Destination for delivered messages and playback broadcasts.

use crate::protocol::PlaybackState;
use crate::source::{ChannelId, LogTime};

/// Receives everything the pacer emits.
///
/// Delivery is fire-and-forget: the pacer applies no backpressure, so a sink
/// that cannot keep up must queue or drop on its own. Time broadcasts may
/// require a host capability; a sink with that capability disabled should
/// ignore [`broadcast_time`](Sink::broadcast_time).
pub trait Sink: Send + Sync {
    fn deliver(&self, channel_id: ChannelId, payload: &[u8], log_time: LogTime);

    fn broadcast_time(&self, log_time: LogTime);

    fn broadcast_playback_state(&self, state: &PlaybackState);
}

impl<T: Sink + ?Sized> Sink for std::sync::Arc<T> {
    fn deliver(&self, channel_id: ChannelId, payload: &[u8], log_time: LogTime) {
        (**self).deliver(channel_id, payload, log_time);
    }

    fn broadcast_time(&self, log_time: LogTime) {
        (**self).broadcast_time(log_time);
    }

    fn broadcast_playback_state(&self, state: &PlaybackState) {
        (**self).broadcast_playback_state(state);
    }
}
