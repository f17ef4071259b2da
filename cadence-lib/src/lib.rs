//! # Cadence
//!
//! Paced playback of recorded, timestamped messages. A [`playback::Player`]
//! replays a [`source::MessageSource`] against a [`clock::VirtualClock`] so
//! each record reaches its [`sink::Sink`] at the wall-clock moment matching
//! its log time, scaled by the playback speed. Clients steer playback through
//! [`protocol::PlaybackControlRequest`]s handled by a
//! [`playback::ControlHandler`] while a [`playback::Pacer`] drives delivery.

pub mod clock;
pub mod error;
pub mod playback;
pub mod protocol;
pub mod settings;
pub mod sink;
pub mod source;
pub mod test_data;
