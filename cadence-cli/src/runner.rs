use std::io::{self, BufRead};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, sleep};
use std::time::Duration;

use cadence_lib::error::{PlaybackError, SettingsError, SourceError};
use cadence_lib::playback::{
    ControlHandler, ControlListener, Pacer, PlaybackSource, PlaybackStatus, Player,
};
use cadence_lib::protocol::PlaybackState;
use cadence_lib::settings::PacerSettings;
use cadence_lib::sink::Sink;
use cadence_lib::source::JsonLinesSource;
use clap::ArgMatches;
use log::{debug, error, info, warn};
use thiserror::Error;

use crate::controls::{self, ControlInput, ControlParser};
use crate::sink::StdoutSink;

const POLL_INTERVAL: Duration = Duration::from_millis(20);

#[derive(Debug, Error)]
pub enum RunError {
    #[error("no input file given")]
    MissingInput,
    #[error("failed to open {path}: {source}")]
    Source {
        path: String,
        #[source]
        source: SourceError,
    },
    #[error("failed to load settings from {path}: {source}")]
    Settings {
        path: String,
        #[source]
        source: SettingsError,
    },
    #[error(transparent)]
    Playback(#[from] PlaybackError),
}

type SharedPlayer = Arc<Mutex<Player<JsonLinesSource>>>;

fn lock(player: &SharedPlayer) -> MutexGuard<'_, Player<JsonLinesSource>> {
    player.lock().unwrap_or_else(PoisonError::into_inner)
}

pub fn run(args: &ArgMatches) -> Result<i32, RunError> {
    let path = args
        .get_one::<String>("INPUT")
        .cloned()
        .ok_or(RunError::MissingInput)?;

    let mut settings = match args.get_one::<String>("config") {
        Some(config) => {
            PacerSettings::from_json_file(config).map_err(|source| RunError::Settings {
                path: config.clone(),
                source,
            })?
        }
        None => PacerSettings::default(),
    };
    if let Some(speed) = args.get_one::<f32>("speed") {
        settings.set_initial_speed(*speed);
    }

    let source = JsonLinesSource::open(&path).map_err(|source| RunError::Source {
        path: path.clone(),
        source,
    })?;
    info!("loaded {} records from {}", source.len(), path);

    let mut player = Player::with_settings(source, &settings)?;
    if let Some(seconds) = args.get_one::<f64>("seek") {
        let start = player.time_range().start;
        player.seek(controls::seconds_to_log_time(start, *seconds))?;
    }
    if !args.get_flag("paused") {
        player.play();
    }

    let player: SharedPlayer = Arc::new(Mutex::new(player));
    let sink = Arc::new(StdoutSink::new(!args.get_flag("no-time")));
    let quit = Arc::new(AtomicBool::new(false));
    let interrupted = quit.clone();
    if let Err(err) = ctrlc::set_handler(move || interrupted.store(true, Ordering::SeqCst)) {
        warn!("failed to install interrupt handler: {}", err);
    }
    spawn_control_thread(player.clone(), sink.clone(), quit.clone());

    let mut pacer = Pacer::spawn(player.clone(), sink, settings);
    let exit_on_end = args.get_flag("exit-on-end");
    let mut code = 0;

    // Host loop: the pacer and the control thread do the work.
    loop {
        if quit.load(Ordering::SeqCst) {
            info!("quit requested");
            break;
        }
        if let Some(err) = pacer.take_error() {
            error!("{}", err);
            code = 1;
            if exit_on_end {
                break;
            }
        }
        if exit_on_end && lock(&player).status() == PlaybackStatus::Ended {
            break;
        }
        if !pacer.is_running() {
            warn!("pacer thread exited unexpectedly");
            code = 1;
            break;
        }
        sleep(POLL_INTERVAL);
    }

    pacer.stop();
    Ok(code)
}

/// Read control input from stdin until EOF or `quit`.
///
/// Stdin stands in for the transport: each request goes through the
/// [`ControlListener`] callback and the reply is printed like any other
/// playback state.
fn spawn_control_thread(player: SharedPlayer, sink: Arc<StdoutSink>, quit: Arc<AtomicBool>) {
    thread::spawn(move || {
        let listener = ControlHandler::new(player.clone());
        let mut parser = ControlParser::new();
        for line in io::stdin().lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    warn!("failed to read stdin: {}", err);
                    break;
                }
            };

            let (position, start) = {
                let player = lock(&player);
                (player.position(), player.time_range().start)
            };
            match parser.parse(&line, position, start) {
                Ok(Some(ControlInput::Request(request))) => {
                    debug!("control request {}", request.request_id);
                    if let Some(reply) = listener.on_playback_control_request(request) {
                        sink.broadcast_playback_state(&reply);
                    }
                }
                Ok(Some(ControlInput::Status)) => {
                    sink.broadcast_playback_state(&PlaybackState::broadcast(position));
                }
                Ok(Some(ControlInput::Quit)) => {
                    quit.store(true, Ordering::SeqCst);
                    break;
                }
                Ok(None) => {}
                Err(err) => warn!("{}", err),
            }
        }
        debug!("control input closed");
    });
}
