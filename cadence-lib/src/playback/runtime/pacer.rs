use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::thread;

use log::{debug, error};

use crate::error::PlaybackError;
use crate::playback::{PlaybackSource, Tick};
use crate::settings::PacerSettings;
use crate::sink::Sink;

use super::lock;

/// Run the delivery loop until `done` is set.
///
/// Each tick holds the player lock only while deciding and delivering; all
/// sleeping happens with the lock released so control requests take effect
/// mid-wait. Waits are capped at [`PacerSettings::max_sleep`]. Errors end the
/// current playback (the player transitions to `Ended`) and are handed to
/// `on_error`; the loop keeps running so a later seek can revive playback.
pub fn run_pacer<P, F>(
    player: &Mutex<P>,
    sink: &dyn Sink,
    settings: &PacerSettings,
    done: &AtomicBool,
    mut on_error: F,
) where
    P: PlaybackSource + ?Sized,
    F: FnMut(PlaybackError),
{
    let idle = settings.idle_interval();
    let max_sleep = settings.max_sleep();
    debug!("pacer started");

    while !done.load(Ordering::Relaxed) {
        let tick = lock(player).deliver_next(sink);
        match tick {
            Ok(Tick::Delivered) => {}
            Ok(Tick::Idle) | Ok(Tick::Ended) => thread::sleep(idle),
            Ok(Tick::Wait(delay)) => thread::sleep(delay.min(max_sleep)),
            Err(err) => {
                error!("playback stopped: {}", err);
                on_error(err);
            }
        }
    }

    debug!("pacer stopped");
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    use super::*;
    use crate::playback::{PlaybackStatus, Player};
    use crate::test_data::{corpus, CollectingSink};

    #[test]
    fn stops_when_done_is_set() {
        let player = Mutex::new(Player::new(corpus(&[0])).unwrap());
        let sink = CollectingSink::new();
        let done = AtomicBool::new(true);
        run_pacer(&player, &sink, &PacerSettings::default(), &done, |_| {});
        assert!(sink.events().is_empty());
    }

    #[test]
    fn plays_corpus_to_the_end() {
        let ms = 1_000_000;
        let player = Arc::new(Mutex::new(Player::new(corpus(&[0, ms, 2 * ms])).unwrap()));
        let sink = Arc::new(CollectingSink::new());
        let done = Arc::new(AtomicBool::new(false));
        lock(&player).play();

        let worker = {
            let (player, sink, done) = (player.clone(), sink.clone(), done.clone());
            thread::spawn(move || {
                run_pacer(&*player, &*sink, &PacerSettings::default(), &done, |_| {});
            })
        };

        let deadline = Instant::now() + Duration::from_secs(5);
        while lock(&player).status() != PlaybackStatus::Ended && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        done.store(true, Ordering::Relaxed);
        worker.join().unwrap();

        assert_eq!(sink.delivered_times(), vec![0, ms, 2 * ms]);
        assert_eq!(sink.states().len(), 1);
    }
}
